use rand::rngs::StdRng;
use rand::SeedableRng;
use spin_decide::controller::SpinController;
use spin_decide::feedback::NullFeedback;
use spin_decide::selector::{chi_square_uniform, choose_index};
use spin_decide::visualizers::WheelVisualizer;
use spin_decide::wheel::WheelPhysics;
use spin_decide::TemplateOptionSet;

// Chi-square critical values at p = 0.001, indexed by degrees of freedom
const CHI_SQUARE_CRITICAL: [f64; 8] = [0.0, 10.83, 13.82, 16.27, 18.47, 20.52, 22.46, 24.32];

#[test]
fn choose_index_is_uniform() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for n in [2usize, 4, 7] {
        let mut counts = vec![0usize; n];
        for _ in 0..100_000 {
            counts[choose_index(&mut rng, n)] += 1;
        }
        let stat = chi_square_uniform(&counts);
        assert!(
            stat < CHI_SQUARE_CRITICAL[n - 1],
            "n = {}: chi-square {:.2} for {:?}",
            n,
            stat,
            counts
        );
    }
}

#[test]
fn wheel_landing_is_uniform_over_segments() {
    let mut rng = StdRng::seed_from_u64(77);
    let mut wheel = WheelPhysics::new(8);
    let mut counts = [0usize; 8];
    for _ in 0..20_000 {
        assert!(wheel.start(&mut rng));
        // One oversized step integrates the whole spin exactly
        let winner = wheel.advance(1.0e7).settled.expect("settles in one step");
        assert_eq!(wheel.finish(), Some(winner));
        counts[winner] += 1;
    }
    let stat = chi_square_uniform(&counts);
    assert!(stat < CHI_SQUARE_CRITICAL[7], "chi-square {:.2} for {:?}", stat, counts);
}

#[test]
fn wheel_travel_does_not_depend_on_frame_rate() {
    let mut travelled = Vec::new();
    for dt in [4.0, 16.0, 16.7, 33.3, 100.0] {
        let mut wheel = WheelPhysics::new(6);
        wheel.launch(47.5);
        while wheel.advance(dt).settled.is_none() {}
        travelled.push(wheel.rotation());
    }
    let expected = WheelPhysics::new(6).config().total_rotation(47.5);
    for rotation in travelled {
        assert!((rotation - expected).abs() < 1e-6, "{} vs {}", rotation, expected);
    }
}

#[test]
fn thousand_wheel_sessions_split_evenly() {
    let options = TemplateOptionSet::new(["A", "B", "C", "D"], Some("berry")).unwrap();
    let mut controller = SpinController::new(WheelVisualizer::new(options));
    let mut rng = StdRng::seed_from_u64(1000);
    let mut counts = [0usize; 4];

    for _ in 0..1_000 {
        controller.spin(&mut rng, &mut NullFeedback).unwrap().unwrap();
        let result = loop {
            if let Some(result) = controller.advance(100.0, &mut rng, &mut NullFeedback) {
                break result;
            }
        };
        counts[result.index.unwrap()] += 1;
    }

    assert_eq!(counts.iter().sum::<usize>(), 1_000);
    for count in counts {
        // Roughly 250 each; 60 is more than four standard deviations
        assert!((190..=310).contains(&count), "{:?}", counts);
    }
}
