//! Audio/haptic side channel. Cues never influence an outcome.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualizerKind {
    Wheel,
    DigitalRoller,
    Grid,
    Pulse,
    Dice,
    Coin,
    Number,
}

impl VisualizerKind {
    pub const ALL: [VisualizerKind; 7] = [
        VisualizerKind::Wheel,
        VisualizerKind::DigitalRoller,
        VisualizerKind::Grid,
        VisualizerKind::Pulse,
        VisualizerKind::Dice,
        VisualizerKind::Coin,
        VisualizerKind::Number,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VisualizerKind::Wheel => "wheel",
            VisualizerKind::DigitalRoller => "roller",
            VisualizerKind::Grid => "grid",
            VisualizerKind::Pulse => "pulse",
            VisualizerKind::Dice => "dice",
            VisualizerKind::Coin => "coin",
            VisualizerKind::Number => "number",
        }
    }

    pub fn from_str_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == id)
    }

    /// Whether this visualizer draws from the template options.
    pub fn uses_options(self) -> bool {
        matches!(
            self,
            VisualizerKind::Wheel
                | VisualizerKind::DigitalRoller
                | VisualizerKind::Grid
                | VisualizerKind::Pulse
        )
    }

    pub fn title(self) -> &'static str {
        match self {
            VisualizerKind::Wheel => "Wheel",
            VisualizerKind::DigitalRoller => "Roller",
            VisualizerKind::Grid => "Grid",
            VisualizerKind::Pulse => "Pulse",
            VisualizerKind::Dice => "Dice",
            VisualizerKind::Coin => "Coin",
            VisualizerKind::Number => "Number",
        }
    }
}

impl fmt::Display for VisualizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Spin accepted and animation started.
    Start,
    /// A segment or item boundary passed the marker.
    Tick,
    /// The outcome became visible.
    Reveal,
}

impl Cue {
    pub fn as_str(self) -> &'static str {
        match self {
            Cue::Start => "start",
            Cue::Tick => "tick",
            Cue::Reveal => "reveal",
        }
    }
}

/// Receiver for animation cues, injected into every `advance` call so the
/// engines stay testable without an audio backend.
pub trait FeedbackSink {
    fn cue(&mut self, kind: VisualizerKind, cue: Cue);
}

/// Discards every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn cue(&mut self, _kind: VisualizerKind, _cue: Cue) {}
}

/// Counts cues by type.
#[cfg(test)]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct CueCounter {
    pub starts: usize,
    pub ticks: usize,
    pub reveals: usize,
}

#[cfg(test)]
impl FeedbackSink for CueCounter {
    fn cue(&mut self, _kind: VisualizerKind, cue: Cue) {
        match cue {
            Cue::Start => self.starts += 1,
            Cue::Tick => self.ticks += 1,
            Cue::Reveal => self.reveals += 1,
        }
    }
}
