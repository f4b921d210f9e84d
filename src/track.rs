//! Scrolling roller alignment.
//!
//! The roller shows the options tiled `repetitions` times as one long
//! virtual list of "slots"; slot `k` shows option `k % n`. A fixed marker sits
//! at the vertical center of the viewport. The winner is drawn first, then a
//! single eased transition scrolls from a start slot to a target slot deep in
//! the list so that the target's center lands on the marker.
//!
//! Offsets are in pixels, measured from the top of the list to the top of the
//! viewport. Item and viewport extents come from an [`ExtentProbe`] and are
//! re-read on every frame, so a resize mid-spin moves the rendered position
//! but never the chosen winner.

use crate::config::{
    TRACK_COMPLETION_BUFFER_MS, TRACK_DURATION_MS, TRACK_EASING, TRACK_JITTER_LOOPS,
    TRACK_MIN_LOOPS, TRACK_REPETITIONS, TRACK_START_LOOPS,
};
use crate::easing::CubicBezier;
use crate::selector::choose_index;
use log::debug;
use rand::Rng;

/// Live layout measurements.
pub trait ExtentProbe {
    /// Height of one rendered item, in pixels.
    fn item_extent(&self) -> f64;
    /// Height of the visible window, in pixels.
    fn viewport_extent(&self) -> f64;
}

/// Constant measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedExtent {
    pub item: f64,
    pub viewport: f64,
}

impl ExtentProbe for FixedExtent {
    fn item_extent(&self) -> f64 {
        self.item
    }

    fn viewport_extent(&self) -> f64 {
        self.viewport
    }
}

impl<P: ExtentProbe + ?Sized> ExtentProbe for Box<P> {
    fn item_extent(&self) -> f64 {
        (**self).item_extent()
    }

    fn viewport_extent(&self) -> f64 {
        (**self).viewport_extent()
    }
}

/// Offset that puts the center of `slot` on the marker.
pub fn slot_offset(slot: usize, probe: &(impl ExtentProbe + ?Sized)) -> f64 {
    let item = probe.item_extent();
    let centering = (probe.viewport_extent() - item) / 2.0;
    slot as f64 * item - centering
}

/// Slot whose span contains the marker at `offset`.
pub fn slot_at(offset: f64, probe: &(impl ExtentProbe + ?Sized)) -> usize {
    let item = probe.item_extent();
    if item <= 0.0 {
        return 0;
    }
    let marker = offset + probe.viewport_extent() / 2.0;
    (marker / item).floor().max(0.0) as usize
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackConfig {
    /// How many times the option list is tiled.
    pub repetitions: usize,
    /// Full loops travelled before reaching the target, at minimum.
    pub min_loops: usize,
    /// Extra loops drawn uniformly from `0..=jitter_loops`.
    pub jitter_loops: usize,
    /// Loop holding the start slot.
    pub start_loops: usize,
    pub duration_ms: f64,
    /// Delay after the transition before the result is reported.
    pub completion_buffer_ms: f64,
    pub easing: CubicBezier,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            repetitions: TRACK_REPETITIONS,
            min_loops: TRACK_MIN_LOOPS,
            jitter_loops: TRACK_JITTER_LOOPS,
            start_loops: TRACK_START_LOOPS,
            duration_ms: TRACK_DURATION_MS,
            completion_buffer_ms: TRACK_COMPLETION_BUFFER_MS,
            easing: CubicBezier::from_tuple(TRACK_EASING),
        }
    }
}

/// A decided roll: winner first, slots derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackPlan {
    pub winner_index: usize,
    pub start_slot: usize,
    pub target_slot: usize,
}

impl TrackPlan {
    pub fn start_offset(&self, probe: &(impl ExtentProbe + ?Sized)) -> f64 {
        slot_offset(self.start_slot, probe)
    }

    pub fn target_offset(&self, probe: &(impl ExtentProbe + ?Sized)) -> f64 {
        slot_offset(self.target_slot, probe)
    }

    /// Offset at linear `progress` in [0, 1] under `easing`.
    pub fn offset_at(
        &self,
        progress: f64,
        easing: &CubicBezier,
        probe: &(impl ExtentProbe + ?Sized),
    ) -> f64 {
        let start = self.start_offset(probe);
        let target = self.target_offset(probe);
        start + (target - start) * easing.ease(progress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TrackPhase {
    Idle,
    Rolling {
        plan: TrackPlan,
        elapsed_ms: f64,
        last_slot: usize,
    },
}

/// What one [`TrackAlignment::advance`] call produced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackStep {
    pub offset: f64,
    /// Item boundaries that passed the marker.
    pub ticks: u32,
    /// Winner, set on the step that ends the roll.
    pub completed: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct TrackAlignment {
    config: TrackConfig,
    option_count: usize,
    last_winning_index: Option<usize>,
    phase: TrackPhase,
}

impl TrackAlignment {
    pub fn new(option_count: usize) -> Self {
        Self::with_config(option_count, TrackConfig::default())
    }

    pub fn with_config(option_count: usize, config: TrackConfig) -> Self {
        assert!(option_count >= 1, "A track needs at least one option");
        assert!(
            config.start_loops < config.min_loops,
            "Start loop must precede the minimum target loop"
        );
        assert!(
            config.min_loops + config.jitter_loops < config.repetitions,
            "Track is too short for the configured loops"
        );
        Self {
            config,
            option_count,
            last_winning_index: None,
            phase: TrackPhase::Idle,
        }
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    pub fn option_count(&self) -> usize {
        self.option_count
    }

    pub fn last_winning_index(&self) -> Option<usize> {
        self.last_winning_index
    }

    pub fn is_rolling(&self) -> bool {
        matches!(self.phase, TrackPhase::Rolling { .. })
    }

    /// Number of slots in the virtual list.
    pub fn slot_count(&self) -> usize {
        self.config.repetitions * self.option_count
    }

    /// Option shown in `slot`.
    pub fn option_at(&self, slot: usize) -> usize {
        slot % self.option_count
    }

    /// Rebuild for a new option count. The remembered winner belongs to the
    /// old layout and is dropped. Refused while rolling.
    pub fn sync_option_count(&mut self, option_count: usize) -> bool {
        assert!(option_count >= 1, "A track needs at least one option");
        if self.is_rolling() {
            return false;
        }
        if option_count != self.option_count {
            debug!(
                "Track rebuilt for {} options (was {})",
                option_count, self.option_count
            );
            self.option_count = option_count;
            self.last_winning_index = None;
        }
        true
    }

    /// Slot the roller rests on between spins.
    pub fn resting_slot(&self) -> usize {
        self.config.start_loops * self.option_count + self.last_winning_index.unwrap_or(0)
    }

    pub fn resting_offset(&self, probe: &(impl ExtentProbe + ?Sized)) -> f64 {
        slot_offset(self.resting_slot(), probe)
    }

    /// Decide the winner and the slots for the next roll.
    pub fn plan<R: Rng + ?Sized>(&self, rng: &mut R) -> TrackPlan {
        let n = self.option_count;
        let winner_index = choose_index(rng, n);
        let jitter = rng.random_range(0..=self.config.jitter_loops);
        TrackPlan {
            winner_index,
            start_slot: self.resting_slot(),
            target_slot: (self.config.min_loops + jitter) * n + winner_index,
        }
    }

    /// Plan and start a roll. `None` while a roll is already running.
    pub fn begin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TrackPlan> {
        if self.is_rolling() {
            return None;
        }
        let plan = self.plan(rng);
        debug!(
            "Track plan: winner {} from slot {} to slot {}",
            plan.winner_index, plan.start_slot, plan.target_slot
        );
        self.phase = TrackPhase::Rolling {
            plan,
            elapsed_ms: 0.0,
            last_slot: plan.start_slot,
        };
        Some(plan)
    }

    /// Current plan while rolling.
    pub fn plan_in_progress(&self) -> Option<TrackPlan> {
        match self.phase {
            TrackPhase::Rolling { plan, .. } => Some(plan),
            TrackPhase::Idle => None,
        }
    }

    /// Offset to render right now.
    pub fn current_offset(&self, probe: &(impl ExtentProbe + ?Sized)) -> f64 {
        match self.phase {
            TrackPhase::Rolling {
                plan, elapsed_ms, ..
            } => plan.offset_at(
                elapsed_ms / self.config.duration_ms,
                &self.config.easing,
                probe,
            ),
            TrackPhase::Idle => self.resting_offset(probe),
        }
    }

    /// Move the transition forward by `dt_ms`, re-measuring through `probe`.
    pub fn advance(&mut self, dt_ms: f64, probe: &(impl ExtentProbe + ?Sized)) -> TrackStep {
        let TrackPhase::Rolling {
            plan,
            elapsed_ms,
            last_slot,
        } = self.phase
        else {
            return TrackStep {
                offset: self.resting_offset(probe),
                ..TrackStep::default()
            };
        };

        let elapsed_ms = elapsed_ms + dt_ms.max(0.0);
        let progress = (elapsed_ms / self.config.duration_ms).min(1.0);
        let offset = plan.offset_at(progress, &self.config.easing, probe);
        let slot = if progress >= 1.0 {
            plan.target_slot
        } else {
            slot_at(offset, probe)
        };
        let ticks = slot.saturating_sub(last_slot) as u32;

        if elapsed_ms >= self.config.duration_ms + self.config.completion_buffer_ms {
            self.last_winning_index = Some(plan.winner_index);
            self.phase = TrackPhase::Idle;
            debug!("Track stopped on option {}", plan.winner_index);
            return TrackStep {
                offset: plan.target_offset(probe),
                ticks,
                completed: Some(plan.winner_index),
            };
        }

        self.phase = TrackPhase::Rolling {
            plan,
            elapsed_ms,
            last_slot: slot.max(last_slot),
        };
        TrackStep {
            offset,
            ticks,
            completed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const PROBE: FixedExtent = FixedExtent {
        item: 80.0,
        viewport: 208.0,
    };

    #[test]
    fn slot_offset_centers_item_on_marker() {
        let offset = slot_offset(10, &PROBE);
        let item_center = 10.0 * 80.0 + 40.0 - offset;
        assert!((item_center - 104.0).abs() < 1e-9);
        assert_eq!(slot_at(offset, &PROBE), 10);
    }

    #[test]
    fn target_slot_stays_inside_the_track() {
        let track = TrackAlignment::new(7);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..1_000 {
            let plan = track.plan(&mut rng);
            assert!(plan.target_slot < track.slot_count());
            assert!(plan.target_slot > plan.start_slot);
            assert_eq!(track.option_at(plan.target_slot), plan.winner_index);
        }
    }

    #[test]
    fn second_begin_is_ignored_while_rolling() {
        let mut track = TrackAlignment::new(4);
        let mut rng = StdRng::seed_from_u64(3);
        let first = track.begin(&mut rng).unwrap();
        assert_eq!(track.begin(&mut rng), None);
        assert_eq!(track.plan_in_progress(), Some(first));
    }

    #[test]
    fn option_count_change_drops_remembered_winner() {
        let mut track = TrackAlignment::new(4);
        let mut rng = StdRng::seed_from_u64(5);
        track.begin(&mut rng).unwrap();
        assert!(!track.sync_option_count(6));
        let step = track.advance(10_000.0, &PROBE);
        assert!(step.completed.is_some());
        assert!(track.last_winning_index().is_some());

        assert!(track.sync_option_count(6));
        assert_eq!(track.last_winning_index(), None);
        assert_eq!(track.slot_count(), 300);
        assert_eq!(track.resting_slot(), 6);
    }

    #[test]
    fn single_option_track_resolves_to_it() {
        let mut track = TrackAlignment::new(1);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let plan = track.begin(&mut rng).unwrap();
            assert_eq!(plan.winner_index, 0);
            assert_eq!(track.advance(5_000.0, &PROBE).completed, Some(0));
        }
    }
}
