//! Widget configuration
//!
//! One TOML document configures the display and the widget defaults:
//!
//! ```toml
//! [display]
//! hor_res = 320
//! ver_res = 240
//!
//! [text_area]
//! max_length = 64
//! cursor_blink_ms = 500
//! ```

use std::path::Path;

use kiln_core::{Coord, DisplayConfig, Result};
use serde::{Deserialize, Serialize};

/// Defaults of newly created text areas
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAreaConfig {
    /// Maximum number of characters the text may hold
    pub max_length: usize,
    /// Cursor blink half-period in milliseconds
    pub cursor_blink_ms: u32,
    pub width: Coord,
    pub height: Coord,
    /// Text shown by a freshly created text area
    pub default_text: String,
}

impl Default for TextAreaConfig {
    fn default() -> Self {
        Self {
            max_length: 255,
            cursor_blink_ms: 400,
            width: 120,
            height: 80,
            default_text: "Text area".to_string(),
        }
    }
}

/// Configuration of the display and the built-in widgets
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub display: DisplayConfig,
    pub text_area: TextAreaConfig,
}

impl WidgetConfig {
    /// Set the text area length limit
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.text_area.max_length = max_length;
        self
    }

    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }

    /// Parse a configuration from a TOML document
    pub fn from_toml_str(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    /// Read and parse a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WidgetConfig::default();
        assert_eq!(config.text_area.max_length, 255);
        assert_eq!(config.text_area.cursor_blink_ms, 400);
        assert_eq!((config.text_area.width, config.text_area.height), (120, 80));
        assert_eq!(config.text_area.default_text, "Text area");
        assert_eq!(config.display, DisplayConfig::standard());
    }

    #[test]
    fn test_tables_override_defaults() {
        let config = WidgetConfig::from_toml_str(
            "[display]\nhor_res = 320\n\n[text_area]\nmax_length = 64\ndefault_text = \"\"\n",
        )
        .unwrap();
        assert_eq!(config.display.hor_res, 320);
        assert_eq!(config.display.ver_res, 320);
        assert_eq!(config.text_area.max_length, 64);
        assert_eq!(config.text_area.default_text, "");
        assert_eq!(config.text_area.cursor_blink_ms, 400);
    }
}
