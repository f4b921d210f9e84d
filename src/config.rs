//! Tuning constants for the randomizers and the UI.

// Option sets
pub const MIN_OPTIONS: usize = 2;
pub const DEFAULT_THEME: &str = "berry";
pub const DEFAULT_TEMPLATE_TITLE: &str = "What to eat today";
pub const DEFAULT_OPTIONS: [&str; 8] = [
    "Hot pot",
    "Barbecue",
    "Sushi",
    "Spicy soup",
    "Fried chicken",
    "Pizza",
    "Salad",
    "Home cooking",
];

// Wheel physics. Velocities are degrees per reference frame.
pub const WHEEL_FRAME_MS: f64 = 1000.0 / 60.0;
pub const WHEEL_MIN_VELOCITY: f64 = 30.0;
pub const WHEEL_SPREAD_TURNS: u32 = 4;
pub const WHEEL_DECAY_PER_FRAME: f64 = 0.985;
pub const WHEEL_SETTLE_THRESHOLD: f64 = 0.02;
pub const WHEEL_RESULT_DELAY_MS: f64 = 300.0;
pub const WHEEL_LABEL_MAX_CHARS: usize = 7;

// Roller track
pub const TRACK_REPETITIONS: usize = 50;
pub const TRACK_MIN_LOOPS: usize = 35;
pub const TRACK_JITTER_LOOPS: usize = 5;
pub const TRACK_START_LOOPS: usize = 1;
pub const TRACK_DURATION_MS: f64 = 3000.0;
pub const TRACK_COMPLETION_BUFFER_MS: f64 = 200.0;
pub const TRACK_EASING: (f64, f64, f64, f64) = (0.15, 0.5, 0.15, 1.0);
pub const TRACK_FALLBACK_ITEM_PX: f64 = 80.0;
pub const TRACK_FALLBACK_VIEWPORT_PX: f64 = 208.0;

// Grid highlighter
pub const GRID_MIN_LOOPS: usize = 3;
pub const GRID_BASE_DELAY_MS: f64 = 50.0;
pub const GRID_DELAY_SPAN_MS: f64 = 300.0;
pub const GRID_HOLD_MS: f64 = 500.0;

// Pulse flicker
pub const PULSE_INITIAL_INTERVAL_MS: f64 = 50.0;
pub const PULSE_MIN_DURATION_MS: f64 = 2500.0;
pub const PULSE_SLOWDOWN_FRACTION: f64 = 0.4;
pub const PULSE_INTERVAL_GROWTH: f64 = 1.1;
pub const PULSE_STOP_INTERVAL_MS: f64 = 300.0;
pub const PULSE_HOLD_MS: f64 = 800.0;

// Dice
pub const DIE_FACES: usize = 6;
pub const MIN_DICE: usize = 1;
pub const MAX_DICE: usize = 4;
pub const DEFAULT_DICE: usize = 1;
pub const DICE_SHAKE_FRAMES: u32 = 12;
pub const DICE_FRAME_MS: f64 = 100.0;

// Coin
pub const COIN_MIN_TURNS: u32 = 5;
pub const COIN_FLIP_MS: f64 = 2000.0;
pub const COIN_HEADS_LABEL: &str = "Heads";
pub const COIN_TAILS_LABEL: &str = "Tails";

// Digit generator
pub const MIN_DIGITS: usize = 1;
pub const MAX_DIGITS: usize = 6;
pub const DEFAULT_DIGITS: usize = 4;
pub const NUMBER_SHUFFLE_MS: f64 = 1500.0;
pub const NUMBER_TICK_INTERVAL_MS: f64 = 80.0;

// UI behavior
pub const DRIVER_FRAME_MS: u32 = 16;
pub const HISTORY_CAPACITY: usize = 50;
pub const HAPTIC_TICK_MS: u32 = 5;
