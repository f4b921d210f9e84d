//! Thread-local log of recent spin outcomes.
//!
//! Lives for the page session only; newest entries come first and the log is
//! capped at [`HISTORY_CAPACITY`]. Thread-local because the wasm build is
//! single-threaded and the UI reads it from several components.
//!
//! Notes are kept per outcome value: annotating an entry also attaches the
//! note to later entries with the same value.

use crate::config::HISTORY_CAPACITY;
use crate::feedback::VisualizerKind;
use crate::SelectionResult;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub value: String,
    pub visualizer: VisualizerKind,
    #[serde(rename = "templateTitle")]
    pub template_title: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

thread_local! {
    static HISTORY_STORE: RefCell<VecDeque<HistoryEntry>> =
        RefCell::new(VecDeque::with_capacity(HISTORY_CAPACITY));
    static NEXT_ID: Cell<u64> = const { Cell::new(1) };
    static OUTCOME_NOTES: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
}

/// Wall-clock time in milliseconds.
pub fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Store an outcome and return the new entry.
pub fn record(
    result: &SelectionResult,
    visualizer: VisualizerKind,
    template_title: &str,
) -> HistoryEntry {
    let id = NEXT_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    });
    let entry = HistoryEntry {
        id,
        value: result.value.clone(),
        visualizer,
        template_title: template_title.to_string(),
        timestamp: now_ms(),
        note: note_for(&result.value),
    };
    HISTORY_STORE.with(|store| {
        let mut store = store.borrow_mut();
        store.push_front(entry.clone());
        store.truncate(HISTORY_CAPACITY);
    });
    debug!("History entry {} recorded: '{}'", entry.id, entry.value);
    entry
}

/// All entries, newest first.
pub fn entries() -> Vec<HistoryEntry> {
    HISTORY_STORE.with(|store| store.borrow().iter().cloned().collect())
}

pub fn len() -> usize {
    HISTORY_STORE.with(|store| store.borrow().len())
}

/// Drop every entry. Outcome notes survive.
pub fn clear() {
    HISTORY_STORE.with(|store| store.borrow_mut().clear());
}

/// Note remembered for an outcome value.
pub fn note_for(value: &str) -> Option<String> {
    OUTCOME_NOTES.with(|notes| notes.borrow().get(value).cloned())
}

/// Set or clear (blank `note`) the note on entry `id` and remember it for
/// its value. Returns the updated entry, or `None` for an unknown id.
pub fn annotate(id: u64, note: &str) -> Option<HistoryEntry> {
    let note = note.trim();
    let note = (!note.is_empty()).then(|| note.to_string());
    let entry = HISTORY_STORE.with(|store| {
        let mut store = store.borrow_mut();
        let entry = store.iter_mut().find(|entry| entry.id == id)?;
        entry.note = note.clone();
        Some(entry.clone())
    })?;
    OUTCOME_NOTES.with(|notes| {
        let mut notes = notes.borrow_mut();
        match &note {
            Some(text) => notes.insert(entry.value.clone(), text.clone()),
            None => notes.remove(&entry.value),
        };
    });
    debug!("History entry {} note set: {:?}", id, note);
    Some(entry)
}

/// Entries as a JSON array, newest first.
pub fn export_json() -> Result<String, serde_json::Error> {
    HISTORY_STORE.with(|store| serde_json::to_string_pretty(&*store.borrow()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_and_capped() {
        clear();
        for i in 0..HISTORY_CAPACITY + 5 {
            record(
                &SelectionResult::from_value(i.to_string()),
                VisualizerKind::Number,
                "Numbers",
            );
        }
        let all = entries();
        assert_eq!(all.len(), HISTORY_CAPACITY);
        assert_eq!(all[0].value, (HISTORY_CAPACITY + 4).to_string());
        assert!(all.windows(2).all(|pair| pair[0].id > pair[1].id));
    }

    #[test]
    fn export_and_clear() {
        clear();
        record(
            &SelectionResult::from_value("Heads"),
            VisualizerKind::Coin,
            "Coin toss",
        );
        let json = export_json().unwrap();
        let parsed: Vec<HistoryEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].visualizer, VisualizerKind::Coin);
        assert!(json.contains("\"templateTitle\": \"Coin toss\""));

        clear();
        assert_eq!(len(), 0);
    }

    #[test]
    fn notes_follow_the_outcome_value() {
        clear();
        let first = record(
            &SelectionResult::from_value("Sushi"),
            VisualizerKind::Wheel,
            "Lunch",
        );
        assert_eq!(first.note, None);
        assert_eq!(annotate(u64::MAX, "lost"), None);

        let noted = annotate(first.id, "  try the new place  ").unwrap();
        assert_eq!(noted.note.as_deref(), Some("try the new place"));
        assert_eq!(entries()[0].note, noted.note);

        let again = record(
            &SelectionResult::from_value("Sushi"),
            VisualizerKind::Grid,
            "Lunch",
        );
        assert_eq!(again.note.as_deref(), Some("try the new place"));
        let other = record(
            &SelectionResult::from_value("Tacos"),
            VisualizerKind::Grid,
            "Lunch",
        );
        assert_eq!(other.note, None);

        let json = export_json().unwrap();
        assert!(json.contains("\"note\": \"try the new place\""));

        annotate(again.id, " ");
        assert_eq!(note_for("Sushi"), None);
        assert_eq!(entries()[1].note, None);
    }
}
