//! Browser feedback: Web Audio cues through audio_helpers.js plus a short
//! vibration on every tick where the device supports it.

use spin_decide::config::HAPTIC_TICK_MS;
use spin_decide::feedback::{Cue, FeedbackSink, VisualizerKind};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/audio_helpers.js")]
extern "C" {
    /// Create the shared audio context on first use and resume it. Must run
    /// inside a user gesture.
    #[wasm_bindgen(js_name = resumeAudio)]
    pub fn resume_audio();

    #[wasm_bindgen(js_name = playCue)]
    fn play_cue(kind: &str, cue: &str);
}

fn vibrate(duration_ms: u32) {
    // Unsupported on most desktops; the return value only says whether the
    // pattern was accepted.
    let _ = gloo_utils::window()
        .navigator()
        .vibrate_with_duration(duration_ms);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserFeedback;

impl FeedbackSink for BrowserFeedback {
    fn cue(&mut self, kind: VisualizerKind, cue: Cue) {
        play_cue(kind.as_str(), cue.as_str());
        if cue == Cue::Tick {
            vibrate(HAPTIC_TICK_MS);
        }
    }
}
