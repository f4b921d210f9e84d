use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod controller;
pub mod easing;
pub mod feedback;
pub mod history;
pub mod selector;
pub mod stage;
pub mod theme;
pub mod track;
pub mod utils;
pub mod visualizers;
pub mod wheel;

use config::MIN_OPTIONS;
use theme::ColorTheme;

/// Position of an option inside a [`TemplateOptionSet`].
pub type OptionIndex = usize;

// Errors reported synchronously, before any animation starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinError {
    TooFewOptions {
        found: usize,
    },
    EmptyOption {
        position: usize,
    },
    DuplicateOption {
        label: String,
    },
    DiceCountOutOfRange {
        requested: usize,
        min: usize,
        max: usize,
    },
    DigitCountOutOfRange {
        requested: usize,
        min: usize,
        max: usize,
    },
}

impl fmt::Display for SpinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpinError::TooFewOptions { found } => write!(
                f,
                "At least {} options are required, found {}",
                MIN_OPTIONS, found
            ),
            SpinError::EmptyOption { position } => {
                write!(f, "Option {} is empty", position + 1)
            }
            SpinError::DuplicateOption { label } => {
                write!(f, "Option '{}' appears more than once", label)
            }
            SpinError::DiceCountOutOfRange {
                requested,
                min,
                max,
            } => write!(
                f,
                "Dice count {} is outside the supported range [{} to {}]",
                requested, min, max
            ),
            SpinError::DigitCountOutOfRange {
                requested,
                min,
                max,
            } => write!(
                f,
                "Digit count {} is outside the supported range [{} to {}]",
                requested, min, max
            ),
        }
    }
}

impl std::error::Error for SpinError {}

/// Ordered, distinct option labels plus the palette used to draw them.
///
/// Built through [`TemplateOptionSet::new`], which trims every label and
/// rejects blank, duplicated or too few options. Values that arrive through
/// serde skip that check, so visualizers call [`TemplateOptionSet::validate`]
/// again before each spin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOptionSet {
    options: Vec<String>,
    #[serde(default, rename = "colorTheme", skip_serializing_if = "Option::is_none")]
    color_theme: Option<String>,
}

impl TemplateOptionSet {
    pub fn new<I, S>(options: I, color_theme: Option<&str>) -> Result<Self, SpinError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = Self {
            options: options
                .into_iter()
                .map(|label| label.as_ref().trim().to_string())
                .collect(),
            color_theme: color_theme.map(str::to_string),
        };
        if let Err(err) = set.validate() {
            warn!("Rejected option set: {}", err);
            return Err(err);
        }
        Ok(set)
    }

    pub fn validate(&self) -> Result<(), SpinError> {
        let mut seen = HashSet::with_capacity(self.options.len());
        for (position, label) in self.options.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(SpinError::EmptyOption { position });
            }
            if !seen.insert(label.as_str()) {
                return Err(SpinError::DuplicateOption {
                    label: label.clone(),
                });
            }
        }
        if self.options.len() < MIN_OPTIONS {
            return Err(SpinError::TooFewOptions {
                found: self.options.len(),
            });
        }
        Ok(())
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn label(&self, index: OptionIndex) -> &str {
        &self.options[index]
    }

    pub fn color_theme(&self) -> Option<&str> {
        self.color_theme.as_deref()
    }

    /// Palette for this set, falling back to the default theme for unknown ids.
    pub fn theme(&self) -> &'static ColorTheme {
        theme::theme_by_id(self.color_theme())
    }
}

/// The single outcome reported at the end of a spin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub value: String,
    /// Winning position for option-based visualizers; `None` for dice,
    /// coin and number draws.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<OptionIndex>,
}

impl SelectionResult {
    pub fn from_option(options: &TemplateOptionSet, index: OptionIndex) -> Self {
        Self {
            value: options.label(index).to_string(),
            index: Some(index),
        }
    }

    pub fn from_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            index: None,
        }
    }
}

/// Non-animated draw for JavaScript callers.
///
/// Expects `{ options: string[], colorTheme?: string }` and returns a
/// serialized [`SelectionResult`], or an error message string.
#[wasm_bindgen]
pub fn pick_option(options_js: JsValue) -> JsValue {
    let set: TemplateOptionSet = match serde_wasm_bindgen::from_value(options_js) {
        Ok(set) => set,
        Err(e) => {
            return serde_wasm_bindgen::to_value(&format!("Failed to deserialize options: {}", e))
                .unwrap_or(JsValue::NULL);
        }
    };

    if let Err(e) = set.validate() {
        return serde_wasm_bindgen::to_value(&format!("Invalid options: {}", e))
            .unwrap_or(JsValue::NULL);
    }

    let index = selector::choose_index_thread(set.len());
    let result = SelectionResult::from_option(&set, index);
    info!("Picked '{}' without animation", result.value);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_labels_and_keeps_order() {
        let set = TemplateOptionSet::new(["  A ", "B", "C  "], Some("ocean")).unwrap();
        assert_eq!(set.options(), ["A", "B", "C"]);
        assert_eq!(set.color_theme(), Some("ocean"));
        assert_eq!(set.theme().id, "ocean");
    }

    #[test]
    fn rejects_single_option() {
        let err = TemplateOptionSet::new(["Only"], None).unwrap_err();
        assert_eq!(err, SpinError::TooFewOptions { found: 1 });
    }

    #[test]
    fn rejects_blank_and_duplicate_labels() {
        assert_eq!(
            TemplateOptionSet::new(["A", "   ", "C"], None).unwrap_err(),
            SpinError::EmptyOption { position: 1 }
        );
        assert_eq!(
            TemplateOptionSet::new(["A", "B", " A"], None).unwrap_err(),
            SpinError::DuplicateOption {
                label: "A".to_string()
            }
        );
    }

    #[test]
    fn deserialized_sets_are_revalidated() {
        let set: TemplateOptionSet = serde_json::from_str(r#"{"options":["solo"]}"#).unwrap();
        assert!(set.validate().is_err());

        let set: TemplateOptionSet =
            serde_json::from_str(r#"{"options":["A","B"],"colorTheme":"forest"}"#).unwrap();
        assert!(set.validate().is_ok());
        assert_eq!(set.theme().id, "forest");
    }

    #[test]
    fn result_from_option_carries_index() {
        let set = TemplateOptionSet::new(["A", "B", "C"], None).unwrap();
        let result = SelectionResult::from_option(&set, 2);
        assert_eq!(result.value, "C");
        assert_eq!(result.index, Some(2));
        assert_eq!(
            serde_json::to_string(&SelectionResult::from_value("7")).unwrap(),
            r#"{"value":"7"}"#
        );
    }
}
