#![allow(dead_code)]

use spin_decide::feedback::{Cue, FeedbackSink, VisualizerKind};

/// Counts cues by type.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CueCounter {
    pub starts: usize,
    pub ticks: usize,
    pub reveals: usize,
}

impl FeedbackSink for CueCounter {
    fn cue(&mut self, _kind: VisualizerKind, cue: Cue) {
        match cue {
            Cue::Start => self.starts += 1,
            Cue::Tick => self.ticks += 1,
            Cue::Reveal => self.reveals += 1,
        }
    }
}
