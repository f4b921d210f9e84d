use crate::config::{MAX_DICE, MAX_DIGITS, MIN_DICE, MIN_DIGITS};
use crate::{SpinError, TemplateOptionSet};
use once_cell::sync::Lazy;
use regex::Regex;

// Newlines plus ASCII and full-width list punctuation
static OPTION_SEPARATOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\r\n,;\u{FF0C}\u{3001}\u{FF1B}]+").unwrap());

/// Split free-form editor text into an option set.
///
/// Options may be separated by newlines, commas or semicolons (full-width
/// variants included). Surrounding whitespace is trimmed and blank entries
/// are dropped before validation.
///
/// # Examples
/// ```
/// use spin_decide::utils::parse_options;
/// let set = parse_options("Pizza, Sushi\nTacos", None).unwrap();
/// assert_eq!(set.options(), ["Pizza", "Sushi", "Tacos"]);
/// ```
pub fn parse_options(text: &str, color_theme: Option<&str>) -> Result<TemplateOptionSet, SpinError> {
    let labels = OPTION_SEPARATOR_REGEX
        .split(text)
        .map(str::trim)
        .filter(|label| !label.is_empty());
    TemplateOptionSet::new(labels, color_theme)
}

/// Options joined one per line, the inverse of [`parse_options`].
pub fn options_to_text(options: &TemplateOptionSet) -> String {
    options.options().join("\n")
}

/// Shorten a label for a wheel segment: anything over `max_chars`
/// characters keeps its first `max_chars - 1` and gains "..".
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() > max_chars {
        let kept: String = label.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}..", kept)
    } else {
        label.to_string()
    }
}

/// "7" for one die, "9 (3+6)" for several.
pub fn format_dice_result(faces: &[u8]) -> String {
    let sum: u32 = faces.iter().map(|&face| face as u32).sum();
    if faces.len() > 1 {
        let parts: Vec<String> = faces.iter().map(u8::to_string).collect();
        format!("{} ({})", sum, parts.join("+"))
    } else {
        sum.to_string()
    }
}

/// Digits concatenated, leading zeros kept.
pub fn format_digits(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d % 10)).collect()
}

/// Generic numeric input validation
pub fn validate_numeric_input<T>(
    input: &str,
    min: Option<T>,
    max: Option<T>,
    field_name: &str,
) -> Result<T, String>
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field_name));
    }

    match trimmed.parse::<T>() {
        Ok(val) => {
            if let Some(min_val) = min {
                if val < min_val {
                    return Err(format!("{} must be at least {}", field_name, min_val));
                }
            }
            if let Some(max_val) = max {
                if val > max_val {
                    return Err(format!("{} cannot exceed {}", field_name, max_val));
                }
            }
            Ok(val)
        }
        Err(_) => Err(format!("{} must be a valid number", field_name)),
    }
}

/// Validate dice count input
pub fn validate_dice_count(input: &str) -> Result<usize, String> {
    validate_numeric_input(input, Some(MIN_DICE), Some(MAX_DICE), "Dice count")
}

/// Validate digit count input
pub fn validate_digit_count(input: &str) -> Result<usize, String> {
    validate_numeric_input(input, Some(MIN_DIGITS), Some(MAX_DIGITS), "Digit count")
}
