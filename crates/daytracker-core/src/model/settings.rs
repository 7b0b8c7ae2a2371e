use super::{Argb, ColorMeaning};

/// Global application settings. Exactly one instance exists process-wide;
/// calendars do not carry their own copy (the palette on a calendar is
/// seeded from here at creation time).
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub selected_color: Argb,
    pub is_dark_mode: bool,
    pub follow_system_theme: bool,
    pub available_colors: Vec<ColorMeaning>,
    pub has_seen_onboarding: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        let available_colors = default_colors();
        Self {
            selected_color: available_colors[0].color,
            is_dark_mode: false,
            follow_system_theme: true,
            available_colors,
            has_seen_onboarding: false,
        }
    }
}

/// The built-in three-color palette (Bad / Okay / Good).
pub fn default_colors() -> Vec<ColorMeaning> {
    vec![
        ColorMeaning::new(Argb(0xFFE5_3E3E), "Bad"),
        ColorMeaning::new(Argb(0xFFFF_C107), "Okay"),
        ColorMeaning::new(Argb(0xFF4C_AF50), "Good"),
    ]
}
