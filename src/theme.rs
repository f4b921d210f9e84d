//! Segment palettes. Purely presentational; selection never reads them.

use crate::config::DEFAULT_THEME;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTheme {
    pub id: &'static str,
    pub name: &'static str,
    pub colors: [&'static str; 8],
}

pub const THEMES: [ColorTheme; 4] = [
    ColorTheme {
        id: "berry",
        name: "Berry Burst",
        colors: [
            "#845EC2", "#D65DB1", "#FF6F91", "#FF9671", "#FFC75F", "#008F7A", "#4E8397", "#C34A36",
        ],
    },
    ColorTheme {
        id: "sunset",
        name: "Sunset Glow",
        colors: [
            "#F94144", "#F3722C", "#F8961E", "#F9844A", "#F9C74F", "#90BE6D", "#43AA8B", "#577590",
        ],
    },
    ColorTheme {
        id: "ocean",
        name: "Deep Ocean",
        colors: [
            "#0077B6", "#0096C7", "#00B4D8", "#48CAE4", "#90E0EF", "#ADE8F4", "#023E8A", "#03045E",
        ],
    },
    ColorTheme {
        id: "forest",
        name: "Fresh Forest",
        colors: [
            "#264653", "#2A9D8F", "#E9C46A", "#F4A261", "#E76F51", "#2D6A4F", "#40916C", "#52B788",
        ],
    },
];

impl ColorTheme {
    /// Fill color for segment/tile `index`, cycling through the palette.
    pub fn segment_color(&self, index: usize) -> &'static str {
        self.colors[index % self.colors.len()]
    }

    /// Highlight color for single-accent visualizers (grid, pulse).
    pub fn accent(&self) -> &'static str {
        self.colors[0]
    }
}

/// Look up a theme, falling back to the default palette.
pub fn theme_by_id(id: Option<&str>) -> &'static ColorTheme {
    let wanted = id.unwrap_or(DEFAULT_THEME);
    THEMES
        .iter()
        .find(|theme| theme.id == wanted)
        .unwrap_or(&THEMES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_falls_back_to_berry() {
        assert_eq!(theme_by_id(Some("neon")).id, "berry");
        assert_eq!(theme_by_id(None).id, "berry");
        assert_eq!(theme_by_id(Some("sunset")).id, "sunset");
    }

    #[test]
    fn segment_colors_cycle() {
        let theme = theme_by_id(Some("ocean"));
        assert_eq!(theme.segment_color(0), theme.segment_color(8));
        assert_ne!(theme.segment_color(0), theme.segment_color(1));
    }
}
