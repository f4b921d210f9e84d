mod common;

use common::CueCounter;
use futures::executor::block_on;
use rand::rngs::StdRng;
use rand::SeedableRng;
use spin_decide::controller::SpinController;
use spin_decide::feedback::NullFeedback;
use spin_decide::track::{FixedExtent, TrackAlignment};
use spin_decide::visualizers::{GridVisualizer, RollerVisualizer, WheelVisualizer};
use spin_decide::wheel::{WheelConfig, WheelPhysics};
use spin_decide::{SpinError, TemplateOptionSet};

fn options() -> TemplateOptionSet {
    TemplateOptionSet::new(["Pizza", "Sushi", "Tacos", "Salad"], Some("ocean")).unwrap()
}

const PROBE: FixedExtent = FixedExtent {
    item: 80.0,
    viewport: 208.0,
};

#[test]
fn double_spin_yields_one_result() {
    let mut controller = SpinController::new(WheelVisualizer::new(options()));
    let mut rng = StdRng::seed_from_u64(1);
    let mut cues = CueCounter::default();

    let first = controller.spin(&mut rng, &mut cues).unwrap();
    let second = controller.spin(&mut rng, &mut cues).unwrap();
    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(cues.starts, 1);

    let mut results = Vec::new();
    for _ in 0..2_000 {
        if let Some(result) = controller.advance(16.0, &mut rng, &mut cues) {
            results.push(result);
        }
    }
    assert_eq!(results.len(), 1);
    assert_eq!(cues.reveals, 1);
    assert_eq!(block_on(first.unwrap()), Some(results[0].clone()));
    assert_eq!(controller.completed_spins(), 1);
}

#[test]
fn wheel_launched_below_settle_threshold_still_reports() {
    let config = WheelConfig {
        min_velocity: 0.01,
        spread_turns: 0,
        ..WheelConfig::default()
    };
    let mut controller = SpinController::new(WheelVisualizer::with_config(
        TemplateOptionSet::new(["A", "B", "C"], None).unwrap(),
        config,
    ));
    let mut rng = StdRng::seed_from_u64(7);
    let mut cues = CueCounter::default();

    for round in 0..3 {
        let ticket = controller.spin(&mut rng, &mut cues).unwrap().unwrap();
        let mut delivered = None;
        for _ in 0..10_000 {
            if let Some(result) = controller.advance(16.0, &mut rng, &mut cues) {
                delivered = Some(result);
                break;
            }
        }
        let delivered = delivered.expect("wheel at rest should still report a result");
        assert!(!controller.is_active());
        assert_eq!(block_on(ticket), Some(delivered));
        assert_eq!(cues.reveals, round + 1);
    }
}

#[test]
fn single_option_engines_are_deterministic() {
    let mut rng = StdRng::seed_from_u64(2);

    let mut wheel = WheelPhysics::new(1);
    for _ in 0..10 {
        wheel.start(&mut rng);
        assert_eq!(wheel.advance(1.0e7).settled, Some(0));
        wheel.finish();
    }

    let mut track = TrackAlignment::new(1);
    for _ in 0..10 {
        assert_eq!(track.begin(&mut rng).unwrap().winner_index, 0);
        assert_eq!(track.advance(1.0e5, &PROBE).completed, Some(0));
    }
}

#[test]
fn invalid_options_fail_before_starting() {
    let solo: TemplateOptionSet = serde_json::from_str(r#"{"options":["Only"]}"#).unwrap();
    let mut controller = SpinController::new(GridVisualizer::new(solo));
    let mut rng = StdRng::seed_from_u64(3);
    let err = controller.spin(&mut rng, &mut NullFeedback).unwrap_err();
    assert_eq!(err, SpinError::TooFewOptions { found: 1 });
    assert!(!controller.is_active());
}

#[test]
fn leftover_state_does_not_change_the_draw() {
    // A used and a fresh visualizer fed identical generator states pick
    // the same winner; only the start position differs.
    let mut used = SpinController::new(GridVisualizer::new(options()));
    let mut warmup = StdRng::seed_from_u64(4);
    for _ in 0..3 {
        used.spin(&mut warmup, &mut NullFeedback).unwrap();
        while used.advance(50.0, &mut warmup, &mut NullFeedback).is_none() {}
    }
    let mut fresh = SpinController::new(GridVisualizer::new(options()));

    let mut rng_used = StdRng::seed_from_u64(99);
    let mut rng_fresh = StdRng::seed_from_u64(99);
    used.spin(&mut rng_used, &mut NullFeedback).unwrap();
    fresh.spin(&mut rng_fresh, &mut NullFeedback).unwrap();
    let a = loop {
        if let Some(r) = used.advance(50.0, &mut rng_used, &mut NullFeedback) {
            break r;
        }
    };
    let b = loop {
        if let Some(r) = fresh.advance(50.0, &mut rng_fresh, &mut NullFeedback) {
            break r;
        }
    };
    assert_eq!(a, b);
}

#[test]
fn roller_restarts_from_previous_winner() {
    let mut controller =
        SpinController::new(RollerVisualizer::new(options(), Box::new(PROBE)));
    let mut rng = StdRng::seed_from_u64(5);
    let mut previous = None;
    for _ in 0..4 {
        controller.spin(&mut rng, &mut NullFeedback).unwrap();
        let plan = controller.visualizer().track().plan_in_progress().unwrap();
        assert_eq!(plan.start_slot, 4 + previous.unwrap_or(0));
        let result = loop {
            if let Some(r) = controller.advance(40.0, &mut rng, &mut NullFeedback) {
                break r;
            }
        };
        previous = result.index;
    }
}
