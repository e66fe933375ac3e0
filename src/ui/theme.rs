//! Theme management and terminal color conversion.
//!
//! This module defines the color scheme used by the renderer, supporting both
//! built-in themes and custom themes loaded from TOML files. Colors are hex
//! strings converted to `crossterm` true-color values at paint time.
//!
//! # Built-in Themes
//!
//! - `linesift-dark`: Dark theme (default)
//! - `linesift-light`: Light theme
//! - `monochrome`: No colors; cursor and selection use reverse video
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! prompt_fg = "#89b4fa"
//! query_fg = "#cdd6f4"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! cursor_fg = "#1e1e2e"
//! cursor_bg = "#cba6f7"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#a6e3a1"
//! match_highlight_fg = "#f9e2af"
//! status_fg = "#f38ba8"
//! ```
//!
//! Any color may also be `"default"`, which leaves the terminal's own color.
//!
//! # Example
//!
//! ```rust
//! use linesift::ui::Theme;
//!
//! let theme = Theme::from_name("linesift-light").unwrap();
//! assert_eq!(theme.name, "linesift-light");
//! ```

use crate::domain::{LinesiftError, Result};
use crate::infrastructure::paths;
use crossterm::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the theme used when none is configured.
pub const DEFAULT_THEME: &str = "linesift-dark";

/// Name of the built-in colorless theme.
pub const MONOCHROME_THEME: &str = "monochrome";

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements.
///
/// All colors are hex strings (e.g. `"#cdd6f4"`) or `"default"`. Optional
/// fields fall back to the terminal's color.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Prompt text.
    pub prompt_fg: String,
    /// Query text.
    pub query_fg: String,

    /// Result rows.
    pub text_normal: String,
    /// Filter name and page counter.
    pub text_dim: String,

    /// Row under the cursor, foreground.
    pub cursor_fg: String,
    /// Row under the cursor, background.
    pub cursor_bg: String,

    /// Selected rows, foreground.
    pub selection_fg: String,
    /// Selected rows, background.
    pub selection_bg: String,

    /// Matched ranges, foreground.
    pub match_highlight_fg: String,
    /// Matched ranges, background.
    #[serde(default)]
    pub match_highlight_bg: Option<String>,

    /// Status line.
    pub status_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// # Returns
    ///
    /// - `Some(Theme)` if the theme name is recognized
    /// - `None` if the theme name is unknown
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "linesift-dark" => include_str!("../../themes/linesift-dark.toml"),
            "linesift-light" => include_str!("../../themes/linesift-light.toml"),
            MONOCHROME_THEME => return Some(Self::monochrome()),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`LinesiftError::Theme`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| LinesiftError::Theme(format!("{}: {e}", path.display())))?;

        toml::from_str(&contents)
            .map_err(|e| LinesiftError::Theme(format!("{}: {e}", path.display())))
    }

    /// Resolves a configured theme: a built-in name, else a file path.
    ///
    /// # Errors
    ///
    /// Returns [`LinesiftError::Theme`] if `name` is neither a built-in name
    /// nor a readable theme file. A leading `~` in a path is expanded.
    pub fn resolve(name: Option<&str>) -> Result<Self> {
        match name {
            None => Ok(Self::default()),
            Some(name) => Self::from_name(name)
                .map_or_else(|| Self::from_file(paths::expand_tilde(name)), Ok),
        }
    }

    /// A theme that only uses the terminal's own colors.
    #[must_use]
    pub fn monochrome() -> Self {
        let default = || "default".to_string();
        Self {
            name: MONOCHROME_THEME.to_string(),
            colors: ThemeColors {
                prompt_fg: default(),
                query_fg: default(),
                text_normal: default(),
                text_dim: default(),
                cursor_fg: default(),
                cursor_bg: default(),
                selection_fg: default(),
                selection_bg: default(),
                match_highlight_fg: default(),
                match_highlight_bg: None,
                status_fg: default(),
            },
        }
    }

    /// `true` when the theme carries no colors and the renderer should fall
    /// back to text attributes.
    #[must_use]
    pub fn is_monochrome(&self) -> bool {
        self.name == MONOCHROME_THEME
    }

    /// Converts a hex color string to a terminal color.
    ///
    /// `"default"` and malformed values map to [`Color::Reset`].
    #[must_use]
    pub fn color(hex: &str) -> Color {
        Self::hex_to_rgb(hex).map_or(Color::Reset, |(r, g, b)| Color::Rgb { r, g, b })
    }

    /// Like [`Theme::color`] for optional fields.
    #[must_use]
    pub fn color_opt(hex: Option<&String>) -> Color {
        hex.map_or(Color::Reset, |h| Self::color(h))
    }

    fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some((r, g, b))
    }
}

impl Default for Theme {
    /// Returns the default theme, or [`Theme::monochrome`] if the built-in
    /// file fails to parse.
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).unwrap_or_else(Self::monochrome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn builtins_parse() {
        for name in ["linesift-dark", "linesift-light", MONOCHROME_THEME] {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name);
        }
        assert_eq!(Theme::default().name, DEFAULT_THEME);
        assert!(Theme::from_name("nope").is_none());
    }

    #[test]
    fn hex_conversion() {
        assert_eq!(Theme::color("#ff8000"), Color::Rgb { r: 255, g: 128, b: 0 });
        assert_eq!(Theme::color("default"), Color::Reset);
        assert_eq!(Theme::color("#zzzzzz"), Color::Reset);
    }

    #[test]
    fn resolve_falls_back_to_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut theme = Theme::monochrome();
        theme.name = "custom".into();
        write!(file, "{}", toml::to_string(&theme).unwrap()).unwrap();

        let loaded = Theme::resolve(Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(loaded.name, "custom");
        assert!(matches!(
            Theme::resolve(Some("/nonexistent/theme.toml")),
            Err(LinesiftError::Theme(_))
        ));
    }
}
