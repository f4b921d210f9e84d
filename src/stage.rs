//! All seven visualizers behind one facade, keyed by [`VisualizerKind`].
//!
//! Only one spin may run at a time across the whole stage; option, dice and
//! digit changes are refused while it runs.

use crate::controller::{SpinController, SpinTicket};
use crate::feedback::{FeedbackSink, VisualizerKind};
use crate::track::ExtentProbe;
use crate::visualizers::{
    CoinVisualizer, DiceVisualizer, GridVisualizer, NumberVisualizer, PulseVisualizer,
    RollerVisualizer, WheelVisualizer,
};
use crate::{SelectionResult, SpinError, TemplateOptionSet};
use log::debug;
use rand::Rng;

#[derive(Debug)]
pub struct Stages {
    options: TemplateOptionSet,
    wheel: SpinController<WheelVisualizer>,
    roller: SpinController<RollerVisualizer>,
    grid: SpinController<GridVisualizer>,
    pulse: SpinController<PulseVisualizer>,
    dice: SpinController<DiceVisualizer>,
    coin: SpinController<CoinVisualizer>,
    number: SpinController<NumberVisualizer>,
}

impl Stages {
    pub fn new(options: TemplateOptionSet, probe: Box<dyn ExtentProbe>) -> Self {
        Self {
            wheel: SpinController::new(WheelVisualizer::new(options.clone())),
            roller: SpinController::new(RollerVisualizer::new(options.clone(), probe)),
            grid: SpinController::new(GridVisualizer::new(options.clone())),
            pulse: SpinController::new(PulseVisualizer::new(options.clone())),
            dice: SpinController::new(DiceVisualizer::default()),
            coin: SpinController::new(CoinVisualizer::default()),
            number: SpinController::new(NumberVisualizer::default()),
            options,
        }
    }

    pub fn options(&self) -> &TemplateOptionSet {
        &self.options
    }

    pub fn is_active(&self, kind: VisualizerKind) -> bool {
        match kind {
            VisualizerKind::Wheel => self.wheel.is_active(),
            VisualizerKind::DigitalRoller => self.roller.is_active(),
            VisualizerKind::Grid => self.grid.is_active(),
            VisualizerKind::Pulse => self.pulse.is_active(),
            VisualizerKind::Dice => self.dice.is_active(),
            VisualizerKind::Coin => self.coin.is_active(),
            VisualizerKind::Number => self.number.is_active(),
        }
    }

    pub fn any_active(&self) -> bool {
        VisualizerKind::ALL.into_iter().any(|kind| self.is_active(kind))
    }

    /// Push a new option set to the option-based visualizers. Returns
    /// `false` and keeps the current set while a spin runs.
    pub fn set_options(&mut self, options: TemplateOptionSet) -> bool {
        if self.any_active() {
            debug!("Option update ignored: spin in progress");
            return false;
        }
        if let Some(wheel) = self.wheel.visualizer_mut() {
            wheel.set_options(options.clone());
        }
        if let Some(roller) = self.roller.visualizer_mut() {
            roller.set_options(options.clone());
        }
        if let Some(grid) = self.grid.visualizer_mut() {
            grid.set_options(options.clone());
        }
        if let Some(pulse) = self.pulse.visualizer_mut() {
            pulse.set_options(options.clone());
        }
        self.options = options;
        true
    }

    /// `Ok(false)` when a spin is running and the change was not applied.
    pub fn set_dice_count(&mut self, dice_count: usize) -> Result<bool, SpinError> {
        match self.dice.visualizer_mut() {
            Some(dice) => dice.set_dice_count(dice_count).map(|_| true),
            None => Ok(false),
        }
    }

    /// `Ok(false)` when a spin is running and the change was not applied.
    pub fn set_digit_count(&mut self, digit_count: usize) -> Result<bool, SpinError> {
        match self.number.visualizer_mut() {
            Some(number) => number.set_digit_count(digit_count).map(|_| true),
            None => Ok(false),
        }
    }

    /// Start a spin on `kind`. `Ok(None)` while any spin is running.
    pub fn spin<R: Rng + ?Sized>(
        &mut self,
        kind: VisualizerKind,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Result<Option<SpinTicket>, SpinError> {
        if self.any_active() {
            debug!("{} spin ignored: stage busy", kind);
            return Ok(None);
        }
        match kind {
            VisualizerKind::Wheel => self.wheel.spin(rng, feedback),
            VisualizerKind::DigitalRoller => self.roller.spin(rng, feedback),
            VisualizerKind::Grid => self.grid.spin(rng, feedback),
            VisualizerKind::Pulse => self.pulse.spin(rng, feedback),
            VisualizerKind::Dice => self.dice.spin(rng, feedback),
            VisualizerKind::Coin => self.coin.spin(rng, feedback),
            VisualizerKind::Number => self.number.spin(rng, feedback),
        }
    }

    /// Drive `kind` by one frame.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        kind: VisualizerKind,
        dt_ms: f64,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Option<SelectionResult> {
        match kind {
            VisualizerKind::Wheel => self.wheel.advance(dt_ms, rng, feedback),
            VisualizerKind::DigitalRoller => self.roller.advance(dt_ms, rng, feedback),
            VisualizerKind::Grid => self.grid.advance(dt_ms, rng, feedback),
            VisualizerKind::Pulse => self.pulse.advance(dt_ms, rng, feedback),
            VisualizerKind::Dice => self.dice.advance(dt_ms, rng, feedback),
            VisualizerKind::Coin => self.coin.advance(dt_ms, rng, feedback),
            VisualizerKind::Number => self.number.advance(dt_ms, rng, feedback),
        }
    }

    pub fn wheel(&self) -> &WheelVisualizer {
        self.wheel.visualizer()
    }

    pub fn roller(&self) -> &RollerVisualizer {
        self.roller.visualizer()
    }

    pub fn grid(&self) -> &GridVisualizer {
        self.grid.visualizer()
    }

    pub fn pulse(&self) -> &PulseVisualizer {
        self.pulse.visualizer()
    }

    pub fn dice(&self) -> &DiceVisualizer {
        self.dice.visualizer()
    }

    pub fn coin(&self) -> &CoinVisualizer {
        self.coin.visualizer()
    }

    pub fn number(&self) -> &NumberVisualizer {
        self.number.visualizer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::NullFeedback;
    use crate::track::FixedExtent;
    use futures::executor::block_on;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn stages() -> Stages {
        let options = TemplateOptionSet::new(["A", "B", "C"], None).unwrap();
        Stages::new(
            options,
            Box::new(FixedExtent {
                item: 80.0,
                viewport: 208.0,
            }),
        )
    }

    #[test]
    fn every_kind_completes_and_unlocks() {
        let mut stages = stages();
        let mut rng = StdRng::seed_from_u64(30);
        for kind in VisualizerKind::ALL {
            let ticket = stages
                .spin(kind, &mut rng, &mut NullFeedback)
                .unwrap()
                .unwrap();
            let mut delivered = None;
            for _ in 0..2_000 {
                if let Some(result) = stages.advance(kind, 16.0, &mut rng, &mut NullFeedback) {
                    delivered = Some(result);
                    break;
                }
            }
            let delivered = delivered.expect("spin should finish within 32 s");
            assert!(!stages.any_active());
            assert_eq!(block_on(ticket), Some(delivered.clone()));
            if kind.uses_options() {
                let index = delivered.index.unwrap();
                assert_eq!(stages.options().label(index), delivered.value);
            }
        }
    }

    #[test]
    fn busy_stage_refuses_spins_and_changes() {
        let mut stages = stages();
        let mut rng = StdRng::seed_from_u64(31);
        stages
            .spin(VisualizerKind::Grid, &mut rng, &mut NullFeedback)
            .unwrap()
            .unwrap();
        assert!(stages
            .spin(VisualizerKind::Coin, &mut rng, &mut NullFeedback)
            .unwrap()
            .is_none());
        let replacement = TemplateOptionSet::new(["X", "Y"], None).unwrap();
        assert!(!stages.set_options(replacement.clone()));
        assert_eq!(stages.options().len(), 3);

        while stages.any_active() {
            stages.advance(VisualizerKind::Grid, 50.0, &mut rng, &mut NullFeedback);
        }
        assert!(stages.set_options(replacement));
        assert_eq!(stages.grid().options().len(), 2);
        assert_eq!(stages.roller().track().option_count(), 2);
    }

    #[test]
    fn counts_are_validated() {
        let mut stages = stages();
        assert_eq!(stages.set_dice_count(3), Ok(true));
        assert_eq!(stages.dice().dice_count(), 3);
        assert!(stages.set_dice_count(9).is_err());
        assert_eq!(stages.set_digit_count(2), Ok(true));
        assert_eq!(stages.number().digit_count(), 2);
        assert!(stages.set_digit_count(0).is_err());
    }
}
