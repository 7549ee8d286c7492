//! Display configuration
//!
//! Constructed once at startup and handed to [`ObjTree::new`](crate::ObjTree::new).
//! Every field has a default, so a TOML document only needs to name the
//! values it changes:
//!
//! ```
//! use kiln_core::DisplayConfig;
//!
//! let config = DisplayConfig::from_toml_str("hor_res = 320\nver_res = 240").unwrap();
//! assert_eq!(config.hor_res, 320);
//! assert_eq!(config.inv_buf_size, 32);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geom::{Area, Coord};

/// Cell size of the built-in fixed-width font
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Advance of every glyph in pixels
    pub width: Coord,
    /// Line height in pixels
    pub height: Coord,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 16,
        }
    }
}

/// Configuration of the display the tree renders to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Horizontal resolution in pixels
    pub hor_res: Coord,
    /// Vertical resolution in pixels
    pub ver_res: Coord,
    /// Number of invalid areas queued before the queue collapses to the full screen
    pub inv_buf_size: usize,
    /// Width of a freshly created plain object
    pub obj_def_width: Coord,
    /// Height of a freshly created plain object
    pub obj_def_height: Coord,
    /// Metrics of the default font (font id 0)
    pub font: FontConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl DisplayConfig {
    /// 480x320 display with default queue and object sizes
    pub fn standard() -> Self {
        Self {
            hor_res: 480,
            ver_res: 320,
            inv_buf_size: 32,
            obj_def_width: 80,
            obj_def_height: 60,
            font: FontConfig::default(),
        }
    }

    /// Small monochrome-class display
    pub fn small() -> Self {
        Self {
            hor_res: 128,
            ver_res: 64,
            inv_buf_size: 8,
            obj_def_width: 40,
            obj_def_height: 30,
            font: FontConfig {
                width: 6,
                height: 8,
            },
        }
    }

    /// Set the resolution
    pub fn with_resolution(mut self, hor_res: Coord, ver_res: Coord) -> Self {
        self.hor_res = hor_res;
        self.ver_res = ver_res;
        self
    }

    /// Set the invalid area queue capacity
    pub fn with_inv_buf_size(mut self, size: usize) -> Self {
        self.inv_buf_size = size;
        self
    }

    /// Set the default font cell
    pub fn with_font(mut self, width: Coord, height: Coord) -> Self {
        self.font = FontConfig { width, height };
        self
    }

    /// The whole display as an area
    pub fn screen_area(&self) -> Area {
        Area::with_size(0, 0, self.hor_res, self.ver_res)
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
    use crate::error::ObjError;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = DisplayConfig::from_toml_str("ver_res = 100\n[font]\nwidth = 5\nheight = 7")
            .unwrap();
        assert_eq!(config.hor_res, 480);
        assert_eq!(config.ver_res, 100);
        assert_eq!(config.font, FontConfig { width: 5, height: 7 });
        assert_eq!(config.screen_area(), Area::new(0, 0, 479, 99));
    }

    #[test]
    fn test_invalid_document_is_reported() {
        let err = DisplayConfig::from_toml_str("hor_res = \"wide\"").unwrap_err();
        assert!(matches!(err, ObjError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = DisplayConfig::load("/nonexistent/kiln.toml").unwrap_err();
        assert!(matches!(err, ObjError::ConfigRead(_)));
    }
}
