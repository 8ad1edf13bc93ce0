//! Color theme, passed explicitly to everything that renders.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    // Palette. The light palette leans on the terminal's default background
    // and darker foregrounds; the dark palette mirrors the hosted site.

    pub fn text(&self) -> Color {
        match self {
            Theme::Dark => Color::White,
            Theme::Light => Color::Black,
        }
    }

    pub fn dim(&self) -> Color {
        match self {
            Theme::Dark => Color::DarkGray,
            Theme::Light => Color::Gray,
        }
    }

    pub fn accent(&self) -> Color {
        match self {
            Theme::Dark => Color::Cyan,
            Theme::Light => Color::Blue,
        }
    }

    pub fn heading(&self) -> Color {
        match self {
            Theme::Dark => Color::Yellow,
            Theme::Light => Color::Magenta,
        }
    }

    pub fn code(&self) -> Color {
        match self {
            Theme::Dark => Color::Green,
            Theme::Light => Color::Rgb(0, 100, 0),
        }
    }

    pub fn error(&self) -> Color {
        Color::Red
    }

    pub fn success(&self) -> Color {
        Color::Green
    }
}

// --- Persisted preference ---

#[derive(Serialize, Deserialize, Default)]
struct ThemeData {
    theme: Option<Theme>,
}

fn theme_data_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".toolhub").join("theme.json"))
}

/// The preference saved by a previous run, if any.
pub fn load_preference() -> Option<Theme> {
    let path = theme_data_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    let data: ThemeData = serde_json::from_str(&content).ok()?;
    data.theme
}

pub fn save_preference(theme: Theme) {
    if let Some(path) = theme_data_path() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let data = ThemeData { theme: Some(theme) };
        if let Ok(json) = serde_json::to_string_pretty(&data) {
            let _ = std::fs::write(&path, json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("light"), Theme::Light);
        assert_eq!(Theme::from_name("dark"), Theme::Dark);
        assert_eq!(Theme::from_name("anything-else"), Theme::Dark);
    }

    #[test]
    fn test_toggle_roundtrip() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        let back: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(back, Theme::Light);
    }
}
