//! Rotating-wheel physics: exponential deceleration, boundary ticks and
//! the fixed-pointer winner lookup.
//!
//! The pointer sits at 0° (top) and never moves; the wheel turns clockwise
//! under it. Segment `i` covers `[i * a, (i + 1) * a)` in wheel coordinates,
//! measured clockwise from the pointer when the rotation is zero, where
//! `a = 360 / n`.
//!
//! # Integration
//! Velocity follows `v(f) = v0 * decay^f` where `f` counts reference frames
//! of [`WheelConfig::frame_ms`]. Each [`WheelPhysics::advance`] call adds the
//! exact integral of that curve over the elapsed time, so the trajectory does
//! not depend on how the caller slices time into frames. When velocity would
//! drop below the settle threshold inside a step, integration stops at the
//! crossing instant. The total rotation of a spin is therefore exactly
//! `(v0 - threshold) / λ` with `λ = -ln(decay)`.
//!
//! # Fairness
//! Total rotation is linear in `v0`. The initial velocity is drawn uniformly
//! from a band whose width is a whole number of turns' worth of velocity
//! (`spread_turns * 360 * λ`), so the landing angle modulo 360° is uniform
//! and every segment is equally likely.

use crate::config::{
    WHEEL_DECAY_PER_FRAME, WHEEL_FRAME_MS, WHEEL_MIN_VELOCITY, WHEEL_SETTLE_THRESHOLD,
    WHEEL_SPREAD_TURNS,
};
use log::{debug, warn};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// Physics parameters for [`WheelPhysics`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelConfig {
    /// Length of one reference frame in milliseconds.
    pub frame_ms: f64,
    /// Lower bound of the initial velocity band, degrees per frame.
    pub min_velocity: f64,
    /// Width of the velocity band expressed in whole turns of total rotation.
    pub spread_turns: u32,
    /// Multiplicative velocity decay per reference frame (< 1).
    pub decay_per_frame: f64,
    /// Velocity below which the wheel is considered stopped.
    pub settle_threshold: f64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            frame_ms: WHEEL_FRAME_MS,
            min_velocity: WHEEL_MIN_VELOCITY,
            spread_turns: WHEEL_SPREAD_TURNS,
            decay_per_frame: WHEEL_DECAY_PER_FRAME,
            settle_threshold: WHEEL_SETTLE_THRESHOLD,
        }
    }
}

impl WheelConfig {
    /// Decay rate λ per frame.
    #[inline]
    pub fn lambda(&self) -> f64 {
        -self.decay_per_frame.ln()
    }

    /// Upper bound of the velocity band.
    pub fn max_velocity(&self) -> f64 {
        self.min_velocity + self.spread_turns as f64 * 360.0 * self.lambda()
    }

    /// Degrees turned between launch at `v0` and settle.
    pub fn total_rotation(&self, v0: f64) -> f64 {
        ((v0 - self.settle_threshold) / self.lambda()).max(0.0)
    }

    /// Smallest total rotation any spin can produce.
    pub fn min_total_rotation(&self) -> f64 {
        self.total_rotation(self.min_velocity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelPhase {
    Idle,
    Spinning,
    /// Stopped on `winner`; waiting for the controller to report it.
    Settling { winner: usize },
}

/// What one [`WheelPhysics::advance`] call produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WheelStep {
    /// Segment boundaries crossed during the step.
    pub ticks: u32,
    /// Set on the step that brought the wheel to rest.
    pub settled: Option<usize>,
}

/// Segment under the fixed pointer for a wheel turned `rotation_deg`
/// clockwise.
pub fn winning_segment(rotation_deg: f64, segment_count: usize) -> usize {
    assert!(segment_count >= 1, "A wheel needs at least one segment");
    let angle_per_segment = 360.0 / segment_count as f64;
    let normalized = rotation_deg.rem_euclid(360.0);
    let effective = (360.0 - normalized).rem_euclid(360.0);
    let index = (effective / angle_per_segment).floor() as usize;
    // rem_euclid may round up to exactly 360.0
    index.min(segment_count - 1)
}

/// Spin state for a single wheel. Owned by one controller; never shared.
#[derive(Debug, Clone)]
pub struct WheelPhysics {
    config: WheelConfig,
    segment_count: usize,
    rotation: f64,
    velocity: f64,
    phase: WheelPhase,
    last_tick: i64,
}

impl WheelPhysics {
    pub fn new(segment_count: usize) -> Self {
        Self::with_config(segment_count, WheelConfig::default())
    }

    pub fn with_config(segment_count: usize, config: WheelConfig) -> Self {
        assert!(segment_count >= 1, "A wheel needs at least one segment");
        Self {
            config,
            segment_count,
            rotation: 0.0,
            velocity: 0.0,
            phase: WheelPhase::Idle,
            last_tick: 0,
        }
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    pub fn angle_per_segment(&self) -> f64 {
        360.0 / self.segment_count as f64
    }

    /// Current rotation in degrees, clockwise.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn phase(&self) -> WheelPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == WheelPhase::Idle
    }

    /// Change the number of segments. Ignored unless idle.
    pub fn set_segment_count(&mut self, segment_count: usize) -> bool {
        assert!(segment_count >= 1, "A wheel needs at least one segment");
        if !self.is_idle() {
            return false;
        }
        self.segment_count = segment_count;
        true
    }

    fn tick_index(&self) -> i64 {
        (self.rotation / self.angle_per_segment()).floor() as i64
    }

    /// Launch the wheel. Returns `false` and changes nothing unless idle.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if !self.is_idle() {
            return false;
        }
        let (low, high) = (self.config.min_velocity, self.config.max_velocity());
        let v0 = match Uniform::new(low, high) {
            Ok(band) => band.sample(rng),
            Err(e) => {
                warn!("Invalid wheel velocity band [{}, {}): {}", low, high, e);
                low
            }
        };
        self.launch(v0);
        true
    }

    /// Launch with an explicit initial velocity (degrees per frame).
    pub fn launch(&mut self, v0: f64) {
        // Keep the visible angle, drop accumulated turns from earlier spins
        self.rotation = self.rotation.rem_euclid(360.0);
        self.velocity = v0;
        self.last_tick = self.tick_index();
        self.phase = WheelPhase::Spinning;
        debug!(
            "Wheel launched at {:.3} deg/frame from {:.2} deg, expecting {:.1} deg of travel",
            v0,
            self.rotation,
            self.config.total_rotation(v0)
        );
        if v0 <= self.config.settle_threshold {
            self.settle();
        }
    }

    /// Integrate `dt_ms` of motion. No-op unless spinning.
    pub fn advance(&mut self, dt_ms: f64) -> WheelStep {
        if self.phase != WheelPhase::Spinning || dt_ms <= 0.0 {
            return WheelStep::default();
        }

        let lambda = self.config.lambda();
        let frames = dt_ms / self.config.frame_ms;
        let frames_to_settle = (self.velocity / self.config.settle_threshold).ln() / lambda;

        let settles = frames >= frames_to_settle;
        if settles {
            self.rotation += (self.velocity - self.config.settle_threshold) / lambda;
            self.velocity = 0.0;
        } else {
            let next_velocity = self.velocity * (-lambda * frames).exp();
            self.rotation += (self.velocity - next_velocity) / lambda;
            self.velocity = next_velocity;
        }

        let tick = self.tick_index();
        let ticks = (tick - self.last_tick).max(0) as u32;
        self.last_tick = tick;

        let settled = if settles { Some(self.settle()) } else { None };
        WheelStep { ticks, settled }
    }

    fn settle(&mut self) -> usize {
        self.velocity = 0.0;
        let winner = winning_segment(self.rotation, self.segment_count);
        self.phase = WheelPhase::Settling { winner };
        debug!(
            "Wheel settled at {:.3} deg on segment {}",
            self.rotation.rem_euclid(360.0),
            winner
        );
        winner
    }

    /// Winning segment while settling.
    pub fn winner(&self) -> Option<usize> {
        match self.phase {
            WheelPhase::Settling { winner } => Some(winner),
            _ => None,
        }
    }

    /// Return to idle once the result has been reported.
    pub fn finish(&mut self) -> Option<usize> {
        let winner = self.winner()?;
        self.phase = WheelPhase::Idle;
        Some(winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_convention_on_four_segments() {
        assert_eq!(winning_segment(0.0, 4), 0);
        // Turning clockwise by 10 degrees brings the last segment under the pointer
        assert_eq!(winning_segment(10.0, 4), 3);
        assert_eq!(winning_segment(100.0, 4), 2);
        assert_eq!(winning_segment(190.0, 4), 1);
        assert_eq!(winning_segment(280.0, 4), 0);
        assert_eq!(winning_segment(720.0 + 280.0, 4), 0);
    }

    #[test]
    fn default_band_guarantees_several_turns() {
        let config = WheelConfig::default();
        assert!(config.min_total_rotation() >= 5.0 * 360.0);
        let span = config.total_rotation(config.max_velocity()) - config.min_total_rotation();
        assert!((span - 4.0 * 360.0).abs() < 1e-6);
    }

    #[test]
    fn start_is_rejected_while_spinning() {
        let mut wheel = WheelPhysics::new(6);
        wheel.launch(40.0);
        let velocity = wheel.velocity();
        let mut rng = rand::rng();
        assert!(!wheel.start(&mut rng));
        assert_eq!(wheel.velocity(), velocity);
    }

    #[test]
    fn settles_after_travelling_the_closed_form_distance() {
        let mut wheel = WheelPhysics::new(8);
        wheel.launch(42.0);
        let mut steps = 0;
        let winner = loop {
            let step = wheel.advance(16.0);
            steps += 1;
            if let Some(winner) = step.settled {
                break winner;
            }
            assert!(steps < 10_000, "wheel never settled");
        };
        let expected = wheel.config().total_rotation(42.0);
        assert!((wheel.rotation() - expected).abs() < 1e-6);
        assert_eq!(winner, winning_segment(expected, 8));
        assert_eq!(wheel.finish(), Some(winner));
        assert!(wheel.is_idle());
    }

    #[test]
    fn single_segment_always_wins() {
        let mut wheel = WheelPhysics::new(1);
        wheel.launch(33.3);
        let settled = wheel.advance(60_000.0).settled;
        assert_eq!(settled, Some(0));
    }

    #[test]
    fn segment_count_is_locked_while_spinning() {
        let mut wheel = WheelPhysics::new(4);
        wheel.launch(30.0);
        assert!(!wheel.set_segment_count(5));
        assert_eq!(wheel.segment_count(), 4);
    }
}
