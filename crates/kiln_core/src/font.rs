//! Glyph metrics
//!
//! Provides a trait for querying glyph sizes. Rasterization is not part of
//! the toolkit; the metrics are all the object and text code needs to place
//! characters and cursors.

use std::sync::Arc;

use crate::geom::Coord;

/// Index of a font in the tree's [`FontRegistry`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontId(pub u16);

/// Trait for measuring glyphs of one font
///
/// Implement this trait to plug the real font tables of a display into the
/// toolkit. Without one, [`FixedFont`] cells are used.
pub trait Font: Send + Sync {
    /// Line height in pixels
    fn height(&self) -> Coord;

    /// Horizontal advance of a character in pixels
    ///
    /// Control characters (`'\n'`, `'\r'`) have no width.
    fn glyph_width(&self, ch: char) -> Coord;
}

/// A monospace font where every printable glyph has the same advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedFont {
    pub width: Coord,
    pub height: Coord,
}

impl FixedFont {
    pub const fn new(width: Coord, height: Coord) -> Self {
        Self { width, height }
    }
}

impl Font for FixedFont {
    fn height(&self) -> Coord {
        self.height
    }

    fn glyph_width(&self, ch: char) -> Coord {
        if ch.is_control() {
            0
        } else {
            self.width
        }
    }
}

/// Fonts known to a tree
///
/// Font 0 always exists; unknown ids fall back to it.
pub struct FontRegistry {
    fonts: Vec<Arc<dyn Font>>,
}

impl FontRegistry {
    /// Create a registry whose font 0 is `default`
    pub fn new(default: Arc<dyn Font>) -> Self {
        Self {
            fonts: vec![default],
        }
    }

    /// Register a font and return its id
    pub fn register(&mut self, font: Arc<dyn Font>) -> FontId {
        self.fonts.push(font);
        FontId((self.fonts.len() - 1) as u16)
    }

    /// Look up a font, falling back to the default font
    pub fn get(&self, id: FontId) -> &dyn Font {
        self.fonts
            .get(id.0 as usize)
            .unwrap_or(&self.fonts[0])
            .as_ref()
    }

    /// Number of registered fonts
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_font_control_chars_are_zero_width() {
        let font = FixedFont::new(6, 8);
        assert_eq!(font.glyph_width('a'), 6);
        assert_eq!(font.glyph_width('\n'), 0);
        assert_eq!(font.height(), 8);
    }

    #[test]
    fn test_unknown_font_falls_back_to_default() {
        let mut fonts = FontRegistry::new(Arc::new(FixedFont::new(6, 8)));
        let big = fonts.register(Arc::new(FixedFont::new(12, 24)));
        assert_eq!(big, FontId(1));
        assert_eq!(fonts.get(big).height(), 24);
        assert_eq!(fonts.get(FontId(9)).height(), 8);
        assert_eq!(fonts.len(), 2);
    }
}
