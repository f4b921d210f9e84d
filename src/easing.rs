//! CSS-style cubic Bézier timing curves.

/// Timing curve through (0,0), (x1,y1), (x2,y2), (1,1), evaluated the way
/// `cubic-bezier()` is in CSS: solve x(t) = progress, return y(t).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 40;
const EPSILON: f64 = 1e-7;

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub const fn from_tuple(points: (f64, f64, f64, f64)) -> Self {
        Self::new(points.0, points.1, points.2, points.3)
    }

    #[inline]
    fn coordinate(t: f64, p1: f64, p2: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }

    #[inline]
    fn slope(t: f64, p1: f64, p2: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
    }

    fn solve_t(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = Self::coordinate(t, self.x1, self.x2) - x;
            if err.abs() < EPSILON {
                return t;
            }
            let d = Self::slope(t, self.x1, self.x2);
            if d.abs() < EPSILON {
                break;
            }
            t -= err / d;
        }

        // Newton stalled or left [0, 1]
        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..BISECTION_ITERATIONS {
            let value = Self::coordinate(t, self.x1, self.x2);
            if (value - x).abs() < EPSILON {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Eased value for `progress`, clamped to [0, 1] at both ends.
    pub fn ease(&self, progress: f64) -> f64 {
        if progress <= 0.0 {
            return 0.0;
        }
        if progress >= 1.0 {
            return 1.0;
        }
        let t = self.solve_t(progress);
        Self::coordinate(t, self.y1, self.y2)
    }
}
