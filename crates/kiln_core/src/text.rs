//! Text line breaking and glyph placement
//!
//! All indices are character indices (not bytes). A text is split into
//! lines at `'\n'` and, when a maximum width is given, at the last break
//! character that still fits. A line range includes its terminating `'\n'`.
//! A text that is empty or ends with `'\n'` has a trailing empty line, so a
//! cursor after the final newline has a row of its own.

use std::ops::Range;

use crate::font::Font;
use crate::geom::{Coord, Point};

/// Characters after which a wrapped line may break
pub const BREAK_CHARS: &[char] = &[' ', ',', '.', ';', '-'];

/// Spacing parameters shared by all measurement functions
#[derive(Clone, Copy)]
pub struct TextMetrics<'a> {
    pub font: &'a dyn Font,
    pub letter_space: Coord,
    pub line_space: Coord,
    /// Wrapping width, `None` to break only at newlines
    pub max_width: Option<Coord>,
}

impl<'a> TextMetrics<'a> {
    /// Distance between the tops of two consecutive lines
    pub fn line_pitch(&self) -> Coord {
        self.font.height() + self.line_space
    }

    /// Length of the first line of `chars` (always at least 1 for non-empty input)
    pub fn next_line(&self, chars: &[char]) -> usize {
        let mut width = 0;
        let mut last_break = None;
        for (i, &ch) in chars.iter().enumerate() {
            if ch == '\n' {
                return i + 1;
            }
            width += self.font.glyph_width(ch);
            if let Some(max) = self.max_width {
                if width > max {
                    return match last_break {
                        Some(b) => b,
                        None => i.max(1),
                    };
                }
            }
            if BREAK_CHARS.contains(&ch) {
                last_break = Some(i + 1);
            }
            width += self.letter_space;
        }
        chars.len()
    }

    /// Split a text into line ranges
    pub fn lines(&self, chars: &[char]) -> Vec<Range<usize>> {
        let mut out = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let len = self.next_line(&chars[start..]);
            out.push(start..start + len);
            start += len;
        }
        if chars.last().map_or(true, |&c| c == '\n') {
            out.push(chars.len()..chars.len());
        }
        out
    }

    /// Width of a single line, ignoring a terminating newline
    pub fn line_width(&self, chars: &[char]) -> Coord {
        let visible = match chars.last() {
            Some('\n') => &chars[..chars.len() - 1],
            _ => chars,
        };
        if visible.is_empty() {
            return 0;
        }
        let glyphs: Coord = visible.iter().map(|&c| self.font.glyph_width(c)).sum();
        glyphs + self.letter_space * (visible.len() as Coord - 1)
    }

    /// Width of the widest line and total height of the text
    pub fn text_size(&self, chars: &[char]) -> (Coord, Coord) {
        let lines = self.lines(chars);
        let width = lines
            .iter()
            .map(|r| self.line_width(&chars[r.clone()]))
            .max()
            .unwrap_or(0);
        let height = lines.len() as Coord * self.line_pitch() - self.line_space;
        (width, height)
    }

    /// Position of the top-left corner of the character at `index`,
    /// relative to the text origin
    ///
    /// `index == chars.len()` gives the position after the last character.
    pub fn letter_pos(&self, chars: &[char], index: usize) -> Point {
        let index = index.min(chars.len());
        let lines = self.lines(chars);
        let last = lines.len() - 1;
        for (row, range) in lines.iter().enumerate() {
            if index < range.end || row == last {
                let x = chars[range.start..index]
                    .iter()
                    .map(|&c| self.font.glyph_width(c) + self.letter_space)
                    .sum();
                return Point::new(x, row as Coord * self.line_pitch());
            }
        }
        Point::ZERO
    }

    /// Index of the character under a position relative to the text origin
    ///
    /// Positions past the end of a line resolve to the end of that line;
    /// positions above or below the text resolve to the first or last line.
    pub fn letter_on(&self, chars: &[char], pos: Point) -> usize {
        let lines = self.lines(chars);
        let last = lines.len() - 1;
        let mut y = 0;
        let mut line = &lines[last];
        for (row, range) in lines.iter().enumerate() {
            if pos.y <= y + self.font.height() || row == last {
                line = range;
                break;
            }
            y += self.line_pitch();
        }

        let mut x = 0;
        for i in line.clone() {
            if chars[i] == '\n' {
                return i;
            }
            x += self.font.glyph_width(chars[i]) + self.letter_space;
            if pos.x < x {
                return i;
            }
        }
        if std::ptr::eq(line, &lines[last]) {
            line.end
        } else {
            line.end.saturating_sub(1).max(line.start)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FixedFont;

    const FONT: FixedFont = FixedFont::new(10, 20);

    fn metrics(max_width: Option<Coord>) -> TextMetrics<'static> {
        TextMetrics {
            font: &FONT,
            letter_space: 0,
            line_space: 2,
            max_width,
        }
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_lines_break_at_newline() {
        let m = metrics(None);
        let text = chars("ab\ncd");
        assert_eq!(m.lines(&text), vec![0..3, 3..5]);
        assert_eq!(m.lines(&chars("ab\n")), vec![0..3, 3..3]);
        assert_eq!(m.lines(&[]), vec![0..0]);
    }

    #[test]
    fn test_wrap_at_last_break_char() {
        let m = metrics(Some(60));
        let text = chars("hello world");
        assert_eq!(m.lines(&text), vec![0..6, 6..11]);
    }

    #[test]
    fn test_wrap_without_break_char_splits_word() {
        let m = metrics(Some(30));
        let text = chars("abcdefg");
        assert_eq!(m.lines(&text), vec![0..3, 3..6, 6..7]);
    }

    #[test]
    fn test_text_size() {
        let m = metrics(None);
        assert_eq!(m.text_size(&chars("abc\nde")), (30, 42));
        assert_eq!(m.text_size(&[]), (0, 20));
    }

    #[test]
    fn test_letter_pos() {
        let m = metrics(None);
        let text = chars("abc\nde\n");
        assert_eq!(m.letter_pos(&text, 0), Point::new(0, 0));
        assert_eq!(m.letter_pos(&text, 3), Point::new(30, 0));
        assert_eq!(m.letter_pos(&text, 5), Point::new(10, 22));
        assert_eq!(m.letter_pos(&text, 7), Point::new(0, 44));
        assert_eq!(m.letter_pos(&text, 99), Point::new(0, 44));
    }

    #[test]
    fn test_letter_on() {
        let m = metrics(None);
        let text = chars("abc\nde");
        assert_eq!(m.letter_on(&text, Point::new(0, 0)), 0);
        assert_eq!(m.letter_on(&text, Point::new(15, 5)), 1);
        assert_eq!(m.letter_on(&text, Point::new(500, 5)), 3);
        assert_eq!(m.letter_on(&text, Point::new(10, 23)), 5);
        assert_eq!(m.letter_on(&text, Point::new(500, 23)), 6);
        assert_eq!(m.letter_on(&text, Point::new(-5, 900)), 4);
    }

    #[test]
    fn test_letter_on_inverts_letter_pos() {
        let m = metrics(Some(60));
        let text = chars("the quick brown fox");
        for i in 0..text.len() {
            let p = m.letter_pos(&text, i);
            if text[i] != ' ' {
                assert_eq!(m.letter_on(&text, p), i, "index {}", i);
            }
        }
    }
}
