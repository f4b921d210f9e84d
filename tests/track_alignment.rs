mod common;

use common::CueCounter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use spin_decide::controller::SpinController;
use spin_decide::feedback::NullFeedback;
use spin_decide::track::{slot_offset, ExtentProbe, FixedExtent, TrackAlignment};
use spin_decide::visualizers::RollerVisualizer;
use spin_decide::TemplateOptionSet;
use std::cell::Cell;
use std::rc::Rc;

/// Probe whose item height can change while a roll is running.
#[derive(Clone)]
struct ResizableProbe {
    item: Rc<Cell<f64>>,
    viewport: f64,
}

impl ExtentProbe for ResizableProbe {
    fn item_extent(&self) -> f64 {
        self.item.get()
    }

    fn viewport_extent(&self) -> f64 {
        self.viewport
    }
}

/// Distance between the target item's center and the viewport center.
fn misalignment(offset: f64, slot: usize, probe: &impl ExtentProbe) -> f64 {
    let item = probe.item_extent();
    let item_center = slot as f64 * item + item / 2.0 - offset;
    (item_center - probe.viewport_extent() / 2.0).abs()
}

#[test]
fn target_lands_on_marker_for_several_item_sizes() {
    let mut rng = StdRng::seed_from_u64(404);
    for item in [40.0, 64.0, 80.0, 97.5] {
        for viewport in [208.0, 333.0] {
            let probe = FixedExtent { item, viewport };
            let mut track = TrackAlignment::new(5);
            for _ in 0..10 {
                let plan = track.begin(&mut rng).unwrap();
                let step = loop {
                    let step = track.advance(16.0, &probe);
                    if step.completed.is_some() {
                        break step;
                    }
                };
                assert_eq!(step.completed, Some(plan.winner_index));
                assert!(misalignment(step.offset, plan.target_slot, &probe) < 1.0);
                assert_eq!(track.option_at(plan.target_slot), plan.winner_index);
                assert_eq!(track.last_winning_index(), Some(plan.winner_index));
            }
        }
    }
}

#[test]
fn resize_mid_roll_keeps_winner_and_alignment() {
    let mut rng = StdRng::seed_from_u64(12);
    let probe = ResizableProbe {
        item: Rc::new(Cell::new(80.0)),
        viewport: 208.0,
    };
    let mut track = TrackAlignment::new(4);
    let plan = track.begin(&mut rng).unwrap();

    let mut frames = 0;
    let step = loop {
        frames += 1;
        if frames == 60 {
            probe.item.set(56.0);
        }
        let step = track.advance(16.0, &probe);
        if step.completed.is_some() {
            break step;
        }
    };

    assert_eq!(step.completed, Some(plan.winner_index));
    assert!((step.offset - slot_offset(plan.target_slot, &probe)).abs() < 1e-9);
    assert!(misalignment(step.offset, plan.target_slot, &probe) < 1.0);
}

#[test]
fn roller_reports_item_under_marker() {
    let options = TemplateOptionSet::new(["A", "B", "C", "D", "E"], None).unwrap();
    let probe = ResizableProbe {
        item: Rc::new(Cell::new(72.0)),
        viewport: 240.0,
    };
    let mut controller =
        SpinController::new(RollerVisualizer::new(options, Box::new(probe.clone())));
    let mut rng = StdRng::seed_from_u64(55);
    let mut cues = CueCounter::default();

    for round in 0..5 {
        controller.spin(&mut rng, &mut cues).unwrap().unwrap();
        if round == 2 {
            probe.item.set(90.0);
        }
        let result = loop {
            if let Some(result) = controller.advance(20.0, &mut rng, &mut NullFeedback) {
                break result;
            }
        };
        let roller = controller.visualizer();
        let winner = result.index.unwrap();
        assert_eq!(roller.track().last_winning_index(), Some(winner));
        // The resting slot shows the winner, centered under the marker
        let rest = roller.track().resting_slot();
        assert_eq!(roller.slot_label(rest), result.value);
        assert!(misalignment(roller.offset(), rest, &probe) < 1.0);
    }
    assert_eq!(cues.starts, 5);
}
