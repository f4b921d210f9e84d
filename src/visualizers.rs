//! The seven randomizer variants. Each one decides (or physically settles on)
//! its outcome, animates toward it, and reports it through the shared
//! [`Visualizer`] contract.

use crate::config::{
    COIN_FLIP_MS, COIN_HEADS_LABEL, COIN_MIN_TURNS, COIN_TAILS_LABEL, DEFAULT_DICE,
    DEFAULT_DIGITS, DICE_FRAME_MS, DICE_SHAKE_FRAMES, DIE_FACES, GRID_BASE_DELAY_MS,
    GRID_DELAY_SPAN_MS, GRID_HOLD_MS, GRID_MIN_LOOPS, MAX_DICE, MAX_DIGITS, MIN_DICE, MIN_DIGITS,
    NUMBER_SHUFFLE_MS, NUMBER_TICK_INTERVAL_MS, PULSE_HOLD_MS, PULSE_INITIAL_INTERVAL_MS,
    PULSE_INTERVAL_GROWTH, PULSE_MIN_DURATION_MS, PULSE_SLOWDOWN_FRACTION, PULSE_STOP_INTERVAL_MS,
    WHEEL_RESULT_DELAY_MS,
};
use crate::controller::Visualizer;
use crate::feedback::{Cue, FeedbackSink, VisualizerKind};
use crate::selector::choose_index;
use crate::track::{ExtentProbe, TrackAlignment, TrackConfig};
use crate::utils::{format_dice_result, format_digits};
use crate::wheel::{WheelConfig, WheelPhysics};
use crate::{SelectionResult, SpinError, TemplateOptionSet};
use log::warn;
use rand::Rng;

fn emit_ticks(feedback: &mut dyn FeedbackSink, kind: VisualizerKind, ticks: u32) {
    for _ in 0..ticks {
        feedback.cue(kind, Cue::Tick);
    }
}

/// Count down a post-reveal hold. `true` once it has run out.
fn hold_elapsed(hold_ms: &mut f64, dt_ms: f64) -> bool {
    *hold_ms -= dt_ms;
    *hold_ms <= 0.0
}

// ──────────────────────────────────────────────────────────────────────────────
// Wheel

/// Spinning wheel. The winner falls out of the physics; nothing is drawn
/// up front.
#[derive(Debug, Clone)]
pub struct WheelVisualizer {
    options: TemplateOptionSet,
    physics: WheelPhysics,
    hold_ms: Option<f64>,
}

impl WheelVisualizer {
    pub fn new(options: TemplateOptionSet) -> Self {
        Self::with_config(options, WheelConfig::default())
    }

    pub fn with_config(options: TemplateOptionSet, config: WheelConfig) -> Self {
        let physics = WheelPhysics::with_config(options.len().max(1), config);
        Self {
            options,
            physics,
            hold_ms: None,
        }
    }

    pub fn options(&self) -> &TemplateOptionSet {
        &self.options
    }

    /// Replace the options. Refused unless the wheel is at rest.
    pub fn set_options(&mut self, options: TemplateOptionSet) -> bool {
        if !self.physics.set_segment_count(options.len().max(1)) {
            return false;
        }
        self.options = options;
        true
    }

    pub fn physics(&self) -> &WheelPhysics {
        &self.physics
    }

    pub fn rotation(&self) -> f64 {
        self.physics.rotation()
    }
}

impl Visualizer for WheelVisualizer {
    fn kind(&self) -> VisualizerKind {
        VisualizerKind::Wheel
    }

    fn begin<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Result<(), SpinError> {
        self.options.validate()?;
        // Drop a settle that was never reported
        self.physics.finish();
        self.physics.set_segment_count(self.options.len());
        self.hold_ms = None;
        if !self.physics.start(rng) {
            warn!("Wheel launch refused: physics not at rest");
        }
        feedback.cue(self.kind(), Cue::Start);
        Ok(())
    }

    fn advance<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f64,
        _rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Option<SelectionResult> {
        if let Some(hold) = self.hold_ms.as_mut() {
            if !hold_elapsed(hold, dt_ms) {
                return None;
            }
            self.hold_ms = None;
            let winner = self.physics.finish()?;
            return Some(SelectionResult::from_option(&self.options, winner));
        }

        let step = self.physics.advance(dt_ms);
        emit_ticks(feedback, self.kind(), step.ticks);
        // A launch at or below the settle threshold is already at rest
        if self.physics.winner().is_some() {
            feedback.cue(self.kind(), Cue::Reveal);
            self.hold_ms = Some(WHEEL_RESULT_DELAY_MS);
        }
        None
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Digital roller

/// Slot-style roller over the tiled option list.
pub struct RollerVisualizer {
    options: TemplateOptionSet,
    track: TrackAlignment,
    probe: Box<dyn ExtentProbe>,
    offset: f64,
}

impl std::fmt::Debug for RollerVisualizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollerVisualizer")
            .field("options", &self.options)
            .field("track", &self.track)
            .field("offset", &self.offset)
            .finish()
    }
}

impl RollerVisualizer {
    pub fn new(options: TemplateOptionSet, probe: Box<dyn ExtentProbe>) -> Self {
        Self::with_config(options, probe, TrackConfig::default())
    }

    pub fn with_config(
        options: TemplateOptionSet,
        probe: Box<dyn ExtentProbe>,
        config: TrackConfig,
    ) -> Self {
        let track = TrackAlignment::with_config(options.len().max(1), config);
        let offset = track.resting_offset(&*probe);
        Self {
            options,
            track,
            probe,
            offset,
        }
    }

    pub fn options(&self) -> &TemplateOptionSet {
        &self.options
    }

    /// Replace the options, rebuilding the virtual list. Refused mid-roll.
    pub fn set_options(&mut self, options: TemplateOptionSet) -> bool {
        if !self.track.sync_option_count(options.len().max(1)) {
            return false;
        }
        self.options = options;
        self.offset = self.track.resting_offset(&*self.probe);
        true
    }

    pub fn track(&self) -> &TrackAlignment {
        &self.track
    }

    pub fn slot_count(&self) -> usize {
        self.track.slot_count()
    }

    pub fn slot_label(&self, slot: usize) -> &str {
        self.options.label(self.track.option_at(slot))
    }

    /// Offset to render. Re-measured while idle so a resize between spins
    /// keeps the resting item centered.
    pub fn offset(&self) -> f64 {
        if self.track.is_rolling() {
            self.offset
        } else {
            self.track.resting_offset(&*self.probe)
        }
    }
}

impl Visualizer for RollerVisualizer {
    fn kind(&self) -> VisualizerKind {
        VisualizerKind::DigitalRoller
    }

    fn begin<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Result<(), SpinError> {
        self.options.validate()?;
        self.track.sync_option_count(self.options.len());
        if let Some(plan) = self.track.begin(rng) {
            self.offset = plan.start_offset(&*self.probe);
        }
        feedback.cue(self.kind(), Cue::Start);
        Ok(())
    }

    fn advance<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f64,
        _rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Option<SelectionResult> {
        let step = self.track.advance(dt_ms, &*self.probe);
        self.offset = step.offset;
        emit_ticks(feedback, self.kind(), step.ticks);
        let winner = step.completed?;
        feedback.cue(self.kind(), Cue::Reveal);
        Some(SelectionResult::from_option(&self.options, winner))
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Grid highlighter

/// Highlight steps needed to leave `start`, make the minimum loops and stop
/// on `winner`.
pub fn grid_total_steps(option_count: usize, start: usize, winner: usize) -> usize {
    let n = option_count;
    GRID_MIN_LOOPS * n + (winner + n - start % n) % n
}

/// Wait after highlight step `step` of `total`: fast at first, slowing
/// cubically toward the end.
pub fn grid_step_delay(step: usize, total: usize) -> f64 {
    let progress = step as f64 / total.max(1) as f64;
    GRID_BASE_DELAY_MS + GRID_DELAY_SPAN_MS * progress.powi(3)
}

#[derive(Debug, Clone)]
struct GridRun {
    winner: usize,
    start: usize,
    total_steps: usize,
    step: usize,
    wait_ms: f64,
    hold_ms: Option<f64>,
}

/// Tile grid with a highlight that hops from tile to tile and slows down
/// onto the pre-drawn winner.
#[derive(Debug, Clone)]
pub struct GridVisualizer {
    options: TemplateOptionSet,
    active: Option<usize>,
    run: Option<GridRun>,
}

impl GridVisualizer {
    pub fn new(options: TemplateOptionSet) -> Self {
        Self {
            options,
            active: None,
            run: None,
        }
    }

    pub fn options(&self) -> &TemplateOptionSet {
        &self.options
    }

    pub fn set_options(&mut self, options: TemplateOptionSet) -> bool {
        if self.run.is_some() {
            return false;
        }
        self.active = self.active.filter(|&index| index < options.len());
        self.options = options;
        true
    }

    /// Highlighted tile, if any.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }
}

impl Visualizer for GridVisualizer {
    fn kind(&self) -> VisualizerKind {
        VisualizerKind::Grid
    }

    fn begin<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Result<(), SpinError> {
        self.options.validate()?;
        let n = self.options.len();
        let winner = choose_index(rng, n);
        let start = self.active.filter(|&index| index < n).unwrap_or(0);
        self.run = Some(GridRun {
            winner,
            start,
            total_steps: grid_total_steps(n, start, winner),
            step: 0,
            wait_ms: 0.0,
            hold_ms: None,
        });
        feedback.cue(self.kind(), Cue::Start);
        Ok(())
    }

    fn advance<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f64,
        _rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Option<SelectionResult> {
        let kind = self.kind();
        let n = self.options.len();
        let run = self.run.as_mut()?;
        let mut budget = dt_ms.max(0.0);

        loop {
            if let Some(hold) = run.hold_ms.as_mut() {
                if !hold_elapsed(hold, budget) {
                    return None;
                }
                let winner = run.winner;
                self.run = None;
                return Some(SelectionResult::from_option(&self.options, winner));
            }

            if budget < run.wait_ms {
                run.wait_ms -= budget;
                return None;
            }
            budget -= run.wait_ms;

            run.step += 1;
            self.active = Some((run.start + run.step) % n);
            feedback.cue(kind, Cue::Tick);

            if run.step >= run.total_steps {
                feedback.cue(kind, Cue::Reveal);
                run.hold_ms = Some(GRID_HOLD_MS);
            } else {
                run.wait_ms = grid_step_delay(run.step, run.total_steps);
            }
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Pulse flicker

#[derive(Debug, Clone)]
struct PulseRun {
    winner: usize,
    interval_ms: f64,
    total_ms: f64,
    wait_ms: f64,
    hold_ms: Option<f64>,
}

/// Single display that flickers through random options, slowing down until
/// it lands on the pre-drawn winner.
#[derive(Debug, Clone)]
pub struct PulseVisualizer {
    options: TemplateOptionSet,
    shown: usize,
    highlight: bool,
    run: Option<PulseRun>,
}

impl PulseVisualizer {
    pub fn new(options: TemplateOptionSet) -> Self {
        Self {
            options,
            shown: 0,
            highlight: false,
            run: None,
        }
    }

    pub fn options(&self) -> &TemplateOptionSet {
        &self.options
    }

    pub fn set_options(&mut self, options: TemplateOptionSet) -> bool {
        if self.run.is_some() {
            return false;
        }
        if self.shown >= options.len() {
            self.shown = 0;
        }
        self.options = options;
        self.highlight = false;
        true
    }

    pub fn shown_label(&self) -> &str {
        self.options.label(self.shown)
    }

    pub fn shown_index(&self) -> usize {
        self.shown
    }

    /// True once the winner is on display.
    pub fn is_highlighted(&self) -> bool {
        self.highlight
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }
}

impl Visualizer for PulseVisualizer {
    fn kind(&self) -> VisualizerKind {
        VisualizerKind::Pulse
    }

    fn begin<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Result<(), SpinError> {
        self.options.validate()?;
        self.highlight = false;
        self.run = Some(PulseRun {
            winner: choose_index(rng, self.options.len()),
            interval_ms: PULSE_INITIAL_INTERVAL_MS,
            total_ms: 0.0,
            wait_ms: 0.0,
            hold_ms: None,
        });
        feedback.cue(self.kind(), Cue::Start);
        Ok(())
    }

    fn advance<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f64,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Option<SelectionResult> {
        let kind = self.kind();
        let n = self.options.len();
        let run = self.run.as_mut()?;
        let mut budget = dt_ms.max(0.0);

        loop {
            if let Some(hold) = run.hold_ms.as_mut() {
                if !hold_elapsed(hold, budget) {
                    return None;
                }
                let winner = run.winner;
                self.run = None;
                return Some(SelectionResult::from_option(&self.options, winner));
            }

            if budget < run.wait_ms {
                run.wait_ms -= budget;
                return None;
            }
            budget -= run.wait_ms;

            // Cosmetic flicker; the winner is already fixed
            self.shown = choose_index(rng, n);
            feedback.cue(kind, Cue::Tick);
            run.total_ms += run.interval_ms;

            if run.total_ms > PULSE_MIN_DURATION_MS && run.interval_ms > PULSE_STOP_INTERVAL_MS {
                self.shown = run.winner;
                self.highlight = true;
                feedback.cue(kind, Cue::Reveal);
                run.hold_ms = Some(PULSE_HOLD_MS);
            } else {
                if run.total_ms > PULSE_MIN_DURATION_MS * PULSE_SLOWDOWN_FRACTION {
                    run.interval_ms *= PULSE_INTERVAL_GROWTH;
                }
                run.wait_ms = run.interval_ms;
            }
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Dice

fn roll_die<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    choose_index(rng, DIE_FACES) as u8 + 1
}

#[derive(Debug, Clone)]
struct DiceRun {
    final_faces: Vec<u8>,
    frames_left: u32,
    wait_ms: f64,
}

/// One to four six-sided dice.
#[derive(Debug, Clone)]
pub struct DiceVisualizer {
    faces: Vec<u8>,
    run: Option<DiceRun>,
}

impl Default for DiceVisualizer {
    fn default() -> Self {
        Self {
            faces: vec![1; DEFAULT_DICE],
            run: None,
        }
    }
}

impl DiceVisualizer {
    pub fn new(dice_count: usize) -> Result<Self, SpinError> {
        let mut dice = Self::default();
        dice.set_dice_count(dice_count)?;
        Ok(dice)
    }

    pub fn dice_count(&self) -> usize {
        self.faces.len()
    }

    /// Change the number of dice; faces reset to one pip.
    pub fn set_dice_count(&mut self, dice_count: usize) -> Result<(), SpinError> {
        if !(MIN_DICE..=MAX_DICE).contains(&dice_count) {
            return Err(SpinError::DiceCountOutOfRange {
                requested: dice_count,
                min: MIN_DICE,
                max: MAX_DICE,
            });
        }
        if self.run.is_none() {
            self.faces = vec![1; dice_count];
        }
        Ok(())
    }

    pub fn faces(&self) -> &[u8] {
        &self.faces
    }

    pub fn is_rolling(&self) -> bool {
        self.run.is_some()
    }
}

impl Visualizer for DiceVisualizer {
    fn kind(&self) -> VisualizerKind {
        VisualizerKind::Dice
    }

    fn begin<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Result<(), SpinError> {
        let final_faces = (0..self.faces.len()).map(|_| roll_die(rng)).collect();
        self.run = Some(DiceRun {
            final_faces,
            frames_left: DICE_SHAKE_FRAMES,
            wait_ms: DICE_FRAME_MS,
        });
        feedback.cue(self.kind(), Cue::Start);
        Ok(())
    }

    fn advance<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f64,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Option<SelectionResult> {
        let kind = self.kind();
        let run = self.run.as_mut()?;
        let mut budget = dt_ms.max(0.0);

        loop {
            if budget < run.wait_ms {
                run.wait_ms -= budget;
                return None;
            }
            budget -= run.wait_ms;

            run.frames_left = run.frames_left.saturating_sub(1);
            feedback.cue(kind, Cue::Tick);

            if run.frames_left == 0 {
                self.faces = std::mem::take(&mut run.final_faces);
                self.run = None;
                feedback.cue(kind, Cue::Reveal);
                return Some(SelectionResult::from_value(format_dice_result(&self.faces)));
            }

            for face in self.faces.iter_mut() {
                *face = roll_die(rng);
            }
            run.wait_ms = DICE_FRAME_MS;
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Coin

/// Rotation (degrees about the vertical axis) that ends a flip on the
/// requested face: heads faces the viewer at multiples of 360, tails at
/// 180 past them. Always moves forward from `current`.
pub fn coin_target_rotation(current: f64, heads: bool) -> f64 {
    let base = (current / 360.0).ceil() * 360.0;
    base + COIN_MIN_TURNS as f64 * 360.0 + if heads { 0.0 } else { 180.0 }
}

/// Which face a coin turned to `rotation` shows.
pub fn coin_shows_heads(rotation: f64) -> bool {
    let r = rotation.rem_euclid(360.0);
    !(90.0..=270.0).contains(&r)
}

#[derive(Debug, Clone)]
struct CoinRun {
    heads: bool,
    remaining_ms: f64,
}

#[derive(Debug, Clone)]
pub struct CoinVisualizer {
    rotation: f64,
    heads_label: String,
    tails_label: String,
    run: Option<CoinRun>,
}

impl Default for CoinVisualizer {
    fn default() -> Self {
        Self::with_labels(COIN_HEADS_LABEL, COIN_TAILS_LABEL)
    }
}

impl CoinVisualizer {
    pub fn with_labels(heads: impl Into<String>, tails: impl Into<String>) -> Self {
        Self {
            rotation: 0.0,
            heads_label: heads.into(),
            tails_label: tails.into(),
            run: None,
        }
    }

    /// Target rotation; the view animates toward it with a CSS transition
    /// of [`COIN_FLIP_MS`].
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_flipping(&self) -> bool {
        self.run.is_some()
    }

    pub fn heads_label(&self) -> &str {
        &self.heads_label
    }

    pub fn tails_label(&self) -> &str {
        &self.tails_label
    }
}

impl Visualizer for CoinVisualizer {
    fn kind(&self) -> VisualizerKind {
        VisualizerKind::Coin
    }

    fn begin<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Result<(), SpinError> {
        let heads = choose_index(rng, 2) == 0;
        self.rotation = coin_target_rotation(self.rotation, heads);
        self.run = Some(CoinRun {
            heads,
            remaining_ms: COIN_FLIP_MS,
        });
        feedback.cue(self.kind(), Cue::Start);
        Ok(())
    }

    fn advance<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f64,
        _rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Option<SelectionResult> {
        let run = self.run.as_mut()?;
        if !hold_elapsed(&mut run.remaining_ms, dt_ms) {
            return None;
        }
        let heads = run.heads;
        self.run = None;
        feedback.cue(self.kind(), Cue::Reveal);
        let label = if heads {
            &self.heads_label
        } else {
            &self.tails_label
        };
        Some(SelectionResult::from_value(label.clone()))
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Digit generator

#[derive(Debug, Clone)]
struct NumberRun {
    final_digits: Vec<u8>,
    elapsed_ms: f64,
    since_tick_ms: f64,
}

/// Row of one to six decimal digits that shuffle, then settle.
#[derive(Debug, Clone)]
pub struct NumberVisualizer {
    digits: Vec<u8>,
    run: Option<NumberRun>,
}

impl Default for NumberVisualizer {
    fn default() -> Self {
        Self {
            digits: vec![0; DEFAULT_DIGITS],
            run: None,
        }
    }
}

impl NumberVisualizer {
    pub fn new(digit_count: usize) -> Result<Self, SpinError> {
        let mut number = Self::default();
        number.set_digit_count(digit_count)?;
        Ok(number)
    }

    pub fn digit_count(&self) -> usize {
        self.digits.len()
    }

    /// Change the number of digits; the display resets to zeros.
    pub fn set_digit_count(&mut self, digit_count: usize) -> Result<(), SpinError> {
        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digit_count) {
            return Err(SpinError::DigitCountOutOfRange {
                requested: digit_count,
                min: MIN_DIGITS,
                max: MAX_DIGITS,
            });
        }
        if self.run.is_none() {
            self.digits = vec![0; digit_count];
        }
        Ok(())
    }

    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    pub fn is_shuffling(&self) -> bool {
        self.run.is_some()
    }
}

impl Visualizer for NumberVisualizer {
    fn kind(&self) -> VisualizerKind {
        VisualizerKind::Number
    }

    fn begin<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Result<(), SpinError> {
        let final_digits = (0..self.digits.len())
            .map(|_| choose_index(rng, 10) as u8)
            .collect();
        self.run = Some(NumberRun {
            final_digits,
            elapsed_ms: 0.0,
            since_tick_ms: NUMBER_TICK_INTERVAL_MS,
        });
        feedback.cue(self.kind(), Cue::Start);
        Ok(())
    }

    fn advance<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f64,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Option<SelectionResult> {
        let kind = self.kind();
        let run = self.run.as_mut()?;
        run.elapsed_ms += dt_ms.max(0.0);
        run.since_tick_ms += dt_ms.max(0.0);

        if run.elapsed_ms < NUMBER_SHUFFLE_MS {
            for digit in self.digits.iter_mut() {
                *digit = choose_index(rng, 10) as u8;
            }
            if run.since_tick_ms >= NUMBER_TICK_INTERVAL_MS {
                run.since_tick_ms = 0.0;
                feedback.cue(kind, Cue::Tick);
            }
            return None;
        }

        self.digits = std::mem::take(&mut run.final_digits);
        self.run = None;
        feedback.cue(kind, Cue::Reveal);
        Some(SelectionResult::from_value(format_digits(&self.digits)))
    }
}
