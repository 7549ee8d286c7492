//! Text area widget
//!
//! A page whose scrollable part holds a wrapping label and a blinking
//! cursor. The cursor is a character index into the label's text; the page
//! scrolls so that the cursor's line stays visible.
//!
//! Edits that would break a limit are refused and reported through
//! [`EditOutcome`]; the text and the cursor are left untouched.

use kiln_core::{
    impl_extension, impl_style, Area, Color, Coord, DesignMode, LabelStyle, ObjId, ObjStyle,
    ObjTree, Painter, Point, RectStyle, Result, Signal, StyleId, Validity,
};
use tracing::{debug, warn};

use crate::label::{self, LongMode};
use crate::page::{self, PageExt, PageStyle};
use crate::theme::Theme;

/// Cursor position meaning "after the last character"
pub const CURSOR_LAST: i32 = 0x7fff;

/// Extra pixels added when stepping one line down
const LINE_DOWN_FIXUP: Coord = 1;
/// Pixels taken back when stepping one line up
const LINE_UP_FIXUP: Coord = 1;

/// Text area style: a page style plus the label and cursor looks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextAreaStyle {
    pub page: PageStyle,
    /// Style of the text label
    pub label: StyleId,
    pub cursor_color: Color,
    pub cursor_width: Coord,
    /// Draw the cursor at all
    pub cursor_show: bool,
}
impl_style!(TextAreaStyle => page);

/// Text area state, built on the page's
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextAreaExt {
    page: PageExt,
    label: ObjId,
    cursor_pos: usize,
    /// Column the cursor returns to when moving between lines
    cursor_valid_x: Coord,
    cursor_hidden: bool,
    max_length: usize,
}
impl_extension!(TextAreaExt => page);

/// Why an edit or cursor move was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// The text would exceed the maximum length
    TooLong,
    /// Nothing before the cursor
    AtStart,
    /// Nothing after the cursor
    AtEnd,
    /// The cursor is on the last line
    LastLine,
    /// The handle is not a live text area
    NotTextArea,
}

/// Result of a text area edit or cursor move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    /// Applied after cutting the text to the maximum length
    Truncated,
    Rejected(RejectReason),
}

impl EditOutcome {
    /// Whether the text area changed
    pub fn is_applied(self) -> bool {
        !matches!(self, EditOutcome::Rejected(_))
    }
}

/// Create a text area
///
/// With `copy` pointing at another text area, its text, style, limit and
/// cursor position are taken over.
pub fn create(tree: &mut ObjTree, theme: &Theme, parent: Option<ObjId>, copy: Option<ObjId>) -> Result<ObjId> {
    let ta = page::create(tree, theme, parent, copy)?;
    let src = copy.and_then(|c| tree.ext::<TextAreaExt>(c).cloned());
    let label = label::create(tree, theme, Some(ta), src.as_ref().map(|s| s.label))?;

    let config = &theme.config().text_area;
    let max_length = src.as_ref().map_or(config.max_length, |s| s.max_length);
    let upgraded = tree.upgrade_ext(ta, |page: PageExt| TextAreaExt {
        page,
        label,
        cursor_pos: 0,
        cursor_valid_x: 0,
        cursor_hidden: false,
        max_length,
    });
    if !upgraded {
        warn!("text area {:?} has no page state", ta);
    }
    tree.extend_signal(ta, text_area_signal);
    if let Some(scrl) = page::scrollable(tree, ta) {
        tree.extend_design(scrl, scrollable_design);
    }
    page::glue(tree, label, true);

    match src {
        None => {
            let default_text = &config.default_text[..byte_index(&config.default_text, max_length)];
            label::set_long_mode(tree, label, LongMode::Break);
            label::set_text(tree, label, default_text);
            tree.set_style(ta, theme.text_area.default);
            tree.set_size(ta, config.width, config.height);
        }
        Some(src) => {
            tree.refresh_style(ta);
            set_cursor_pos(tree, ta, src.cursor_pos as i32);
        }
    }
    save_valid_x(tree, ta);
    tree.schedule(ta, config.cursor_blink_ms, blink);
    debug!("created text area {:?} (label {:?})", ta, label);
    Ok(ta)
}

/// The label holding the text
pub fn label(tree: &ObjTree, ta: ObjId) -> Option<ObjId> {
    tree.ext::<TextAreaExt>(ta).map(|e| e.label)
}

pub fn text(tree: &ObjTree, ta: ObjId) -> Option<&str> {
    label(tree, ta).and_then(|l| label::text(tree, l))
}

pub fn cursor_pos(tree: &ObjTree, ta: ObjId) -> usize {
    tree.ext::<TextAreaExt>(ta).map_or(0, |e| e.cursor_pos)
}

/// Remembered cursor column in pixels, relative to the label
pub fn cursor_valid_x(tree: &ObjTree, ta: ObjId) -> Coord {
    tree.ext::<TextAreaExt>(ta).map_or(0, |e| e.cursor_valid_x)
}

pub fn cursor_hidden(tree: &ObjTree, ta: ObjId) -> bool {
    tree.ext::<TextAreaExt>(ta).is_some_and(|e| e.cursor_hidden)
}

/// Maximum number of characters the text may hold
pub fn max_length(tree: &ObjTree, ta: ObjId) -> usize {
    tree.ext::<TextAreaExt>(ta).map_or(0, |e| e.max_length)
}

/// Hide or show the cursor; redraws only when the state changes
pub fn set_cursor_hidden(tree: &mut ObjTree, ta: ObjId, hidden: bool) -> bool {
    let Some(ext) = tree.ext_mut::<TextAreaExt>(ta) else {
        return false;
    };
    if ext.cursor_hidden == hidden {
        return false;
    }
    ext.cursor_hidden = hidden;
    tree.invalidate(ta);
    true
}

/// Byte offset of the character at `index`, or the length for the end
fn byte_index(text: &str, index: usize) -> usize {
    text.char_indices().nth(index).map_or(text.len(), |(i, _)| i)
}

fn font_height(tree: &ObjTree, label: ObjId) -> Coord {
    tree.style_as::<LabelStyle>(label)
        .map_or(0, |s| tree.fonts().get(s.font).height())
}

/// Insert a character at the cursor
pub fn add_char(tree: &mut ObjTree, ta: ObjId, c: char) -> EditOutcome {
    let mut buf = [0u8; 4];
    add_text(tree, ta, c.encode_utf8(&mut buf))
}

/// Insert a text at the cursor and move the cursor after it
pub fn add_text(tree: &mut ObjTree, ta: ObjId, txt: &str) -> EditOutcome {
    let Some(ext) = tree.ext::<TextAreaExt>(ta) else {
        return EditOutcome::Rejected(RejectReason::NotTextArea);
    };
    let (label, pos, max) = (ext.label, ext.cursor_pos, ext.max_length);
    let current = label::text(tree, label).unwrap_or_default();
    let added = txt.chars().count();
    if current.chars().count() + added > max {
        debug!("text area {:?}: insert of {} chars rejected (max {})", ta, added, max);
        return EditOutcome::Rejected(RejectReason::TooLong);
    }

    let at = byte_index(current, pos);
    let mut new_text = String::with_capacity(current.len() + txt.len());
    new_text.push_str(&current[..at]);
    new_text.push_str(txt);
    new_text.push_str(&current[at..]);

    label::set_text(tree, label, &new_text);
    set_cursor_pos(tree, ta, (pos + added) as i32);
    save_valid_x(tree, ta);
    EditOutcome::Applied
}

/// Delete the character before the cursor
pub fn del(tree: &mut ObjTree, ta: ObjId) -> EditOutcome {
    let Some(ext) = tree.ext::<TextAreaExt>(ta) else {
        return EditOutcome::Rejected(RejectReason::NotTextArea);
    };
    let (label, pos) = (ext.label, ext.cursor_pos);
    if pos == 0 {
        return EditOutcome::Rejected(RejectReason::AtStart);
    }
    let current = label::text(tree, label).unwrap_or_default();
    let start = byte_index(current, pos - 1);
    let end = byte_index(current, pos);
    let new_text = format!("{}{}", &current[..start], &current[end..]);

    label::set_text(tree, label, &new_text);
    set_cursor_pos(tree, ta, pos as i32 - 1);
    save_valid_x(tree, ta);
    EditOutcome::Applied
}

/// Replace the whole text and put the cursor at its end
///
/// A text longer than the maximum length is cut to it.
pub fn set_text(tree: &mut ObjTree, ta: ObjId, txt: &str) -> EditOutcome {
    let Some(ext) = tree.ext::<TextAreaExt>(ta) else {
        return EditOutcome::Rejected(RejectReason::NotTextArea);
    };
    let (label, max) = (ext.label, ext.max_length);
    let truncated = txt.chars().count() > max;
    let txt = if truncated { &txt[..byte_index(txt, max)] } else { txt };

    label::set_text(tree, label, txt);
    set_cursor_pos(tree, ta, CURSOR_LAST);
    save_valid_x(tree, ta);
    if truncated {
        debug!("text area {:?}: text cut to {} chars", ta, max);
        EditOutcome::Truncated
    } else {
        EditOutcome::Applied
    }
}

/// Move the cursor and scroll it into view
///
/// A negative `pos` counts back from the end of the text; positions past the
/// end and [`CURSOR_LAST`] mean the end. Returns the resulting position.
pub fn set_cursor_pos(tree: &mut ObjTree, ta: ObjId, pos: i32) -> usize {
    let Some(label) = label(tree, ta) else {
        return 0;
    };
    let len = label::text_len(tree, label) as i32;
    let mut pos = if pos < 0 { len + pos } else { pos };
    if pos > len || pos == CURSOR_LAST {
        pos = len;
    }
    let pos = pos.max(0) as usize;
    if let Some(ext) = tree.ext_mut::<TextAreaExt>(ta) {
        ext.cursor_pos = pos;
    }

    scroll_to_cursor(tree, ta, label, pos);
    tree.invalidate(ta);
    pos
}

fn scroll_to_cursor(tree: &mut ObjTree, ta: ObjId, label: ObjId, pos: usize) {
    let (Some(scrl), Some(label_area), Some(ta_area)) = (
        page::scrollable(tree, ta),
        tree.coords(label),
        tree.coords(ta),
    ) else {
        return;
    };
    let cur = label::letter_pos(tree, label, pos);
    let font_h = font_height(tree, label);
    let vpad = tree.style_as::<RectStyle>(scrl).map_or(0, |s| s.vpad);

    if tree.y(scrl) + cur.y < 0 {
        tree.set_y(scrl, -cur.y);
    }
    if label_area.y1 + cur.y + font_h + vpad > ta_area.y2 {
        tree.set_y(scrl, -(cur.y - ta_area.height() + font_h + 2 * vpad));
    }
}

/// Remember the cursor's current column
fn save_valid_x(tree: &mut ObjTree, ta: ObjId) {
    let Some(ext) = tree.ext::<TextAreaExt>(ta) else {
        return;
    };
    let x = label::letter_pos(tree, ext.label, ext.cursor_pos).x;
    if let Some(ext) = tree.ext_mut::<TextAreaExt>(ta) {
        ext.cursor_valid_x = x;
    }
}

/// Move the cursor one character right and remember its column
///
/// At the end of the text the cursor stays put, but the column is still
/// taken from it and `Rejected(AtEnd)` is reported.
pub fn cursor_right(tree: &mut ObjTree, ta: ObjId) -> EditOutcome {
    let Some(label) = label(tree, ta) else {
        return EditOutcome::Rejected(RejectReason::NotTextArea);
    };
    let pos = cursor_pos(tree, ta);
    let at_end = pos >= label::text_len(tree, label);
    set_cursor_pos(tree, ta, pos as i32 + 1);
    save_valid_x(tree, ta);
    if at_end {
        EditOutcome::Rejected(RejectReason::AtEnd)
    } else {
        EditOutcome::Applied
    }
}

pub fn cursor_left(tree: &mut ObjTree, ta: ObjId) -> EditOutcome {
    if label(tree, ta).is_none() {
        return EditOutcome::Rejected(RejectReason::NotTextArea);
    }
    let pos = cursor_pos(tree, ta);
    if pos == 0 {
        return EditOutcome::Rejected(RejectReason::AtStart);
    }
    set_cursor_pos(tree, ta, pos as i32 - 1);
    save_valid_x(tree, ta);
    EditOutcome::Applied
}

/// Cursor position one line below or above, at the remembered column
fn line_step(tree: &ObjTree, ta: ObjId, down: bool) -> Option<(ObjId, Point)> {
    let ext = tree.ext::<TextAreaExt>(ta)?;
    let style = tree.style_as::<LabelStyle>(ext.label)?;
    let line_h = tree.fonts().get(style.font).height() + style.line_space;
    let mut p = label::letter_pos(tree, ext.label, ext.cursor_pos);
    if down {
        p.y += line_h + LINE_DOWN_FIXUP;
    } else {
        p.y -= line_h - LINE_UP_FIXUP;
    }
    p.x = ext.cursor_valid_x;
    Some((ext.label, p))
}

/// Move the cursor one line down, keeping the remembered column
pub fn cursor_down(tree: &mut ObjTree, ta: ObjId) -> EditOutcome {
    let Some((label, p)) = line_step(tree, ta, true) else {
        return EditOutcome::Rejected(RejectReason::NotTextArea);
    };
    if p.y >= tree.height(label) {
        return EditOutcome::Rejected(RejectReason::LastLine);
    }
    let index = label::letter_on(tree, label, p);
    set_cursor_pos(tree, ta, index as i32);
    EditOutcome::Applied
}

/// Move the cursor one line up, keeping the remembered column
pub fn cursor_up(tree: &mut ObjTree, ta: ObjId) -> EditOutcome {
    let Some((label, p)) = line_step(tree, ta, false) else {
        return EditOutcome::Rejected(RejectReason::NotTextArea);
    };
    let index = label::letter_on(tree, label, p);
    set_cursor_pos(tree, ta, index as i32);
    EditOutcome::Applied
}

fn blink(tree: &mut ObjTree, ta: ObjId, fired: u32) {
    set_cursor_hidden(tree, ta, fired % 2 == 1);
}

/// Re-derive the label's position and wrapping width from the box size
fn layout_label(tree: &mut ObjTree, ta: ObjId) {
    let (Some(label), Some(scrl)) = (label(tree, ta), page::scrollable(tree, ta)) else {
        return;
    };
    let bg_hpad = tree.style_as::<RectStyle>(ta).map_or(0, |s| s.hpad);
    let (scrl_hpad, scrl_vpad) = tree
        .style_as::<RectStyle>(scrl)
        .map_or((0, 0), |s| (s.hpad, s.vpad));

    tree.set_pos(label, scrl_hpad, scrl_vpad);
    let width = tree.width(ta) - 2 * (bg_hpad + scrl_hpad);
    tree.set_width(label, width.max(0));
    label::refresh_text(tree, label);
}

fn text_area_signal(tree: &mut ObjTree, ta: ObjId, signal: &Signal) -> Validity {
    match signal {
        Signal::StyleChanged => {
            let style = tree.style_as::<TextAreaStyle>(ta).map(|s| s.label);
            if let (Some(style), Some(label)) = (style, label(tree, ta)) {
                tree.set_style(label, style);
            }
            layout_label(tree, ta);
        }
        Signal::CoordChanged(old) => {
            let now = tree.coords(ta).unwrap_or(*old);
            if old.width() != now.width() || old.height() != now.height() {
                layout_label(tree, ta);
            }
        }
        _ => {}
    }
    Validity::Valid
}

/// Draws the cursor on top of the scrollable part
fn scrollable_design(
    tree: &ObjTree,
    scrl: ObjId,
    mask: &Area,
    mode: DesignMode,
    painter: &mut dyn Painter,
    inherited: bool,
) -> bool {
    if mode != DesignMode::DrawPost {
        return inherited;
    }
    let Some(ta) = tree.parent(scrl) else {
        return inherited;
    };
    let (Some(ext), Some(style)) = (tree.ext::<TextAreaExt>(ta), tree.style_as::<TextAreaStyle>(ta)) else {
        return inherited;
    };
    if !style.cursor_show || ext.cursor_hidden {
        return true;
    }
    let Some(label_area) = tree.coords(ext.label) else {
        return true;
    };

    let p = label::letter_pos(tree, ext.label, ext.cursor_pos);
    let half = style.cursor_width >> 1;
    let x = label_area.x1 + p.x;
    let y = label_area.y1 + p.y;
    let area = Area::new(x - half, y, x + half, y + font_height(tree, ext.label));
    let rect = RectStyle::from_obj(ObjStyle {
        color: style.cursor_color,
        transp: false,
    });
    painter.draw_rect(&area, mask, &rect, tree.opa(ta));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use kiln_core::DisplayConfig;

    fn setup() -> (ObjTree, ObjId) {
        let mut tree = ObjTree::new(DisplayConfig::standard());
        let theme = Theme::install(&mut tree, &WidgetConfig::default());
        let scr = tree.create(None, None).unwrap();
        let ta = create(&mut tree, &theme, Some(scr), None).unwrap();
        (tree, ta)
    }

    #[test]
    fn test_byte_index_counts_chars() {
        assert_eq!(byte_index("aé b", 2), 3);
        assert_eq!(byte_index("ab", 5), 2);
    }

    #[test]
    fn test_create_defaults() {
        let (tree, ta) = setup();
        assert_eq!(text(&tree, ta), Some("Text area"));
        assert_eq!((tree.width(ta), tree.height(ta)), (120, 80));
        assert_eq!(cursor_pos(&tree, ta), 0);
        assert_eq!(max_length(&tree, ta), 255);

        let label = label(&tree, ta).unwrap();
        let scrl = page::scrollable(&tree, ta).unwrap();
        assert_eq!(tree.parent(label), Some(scrl));
        assert_eq!(label::long_mode(&tree, label), LongMode::Break);
        // bg pad 4, scrollable pad 8 on both sides
        assert_eq!(tree.width(label), 96);
        assert_eq!((tree.x(label), tree.y(label)), (8, 8));
        assert!(tree.ext::<PageExt>(ta).is_some());
    }

    #[test]
    fn test_unicode_edit() {
        let (mut tree, ta) = setup();
        set_text(&mut tree, ta, "añb");
        set_cursor_pos(&mut tree, ta, 2);
        assert_eq!(del(&mut tree, ta), EditOutcome::Applied);
        assert_eq!(text(&tree, ta), Some("ab"));
        assert_eq!(add_char(&mut tree, ta, 'ü'), EditOutcome::Applied);
        assert_eq!(text(&tree, ta), Some("aüb"));
        assert_eq!(cursor_pos(&tree, ta), 2);
    }

    #[test]
    fn test_set_text_truncates_to_limit() {
        let mut tree = ObjTree::new(DisplayConfig::standard());
        let theme = Theme::install(&mut tree, &WidgetConfig::default().with_max_length(4));
        let scr = tree.create(None, None).unwrap();
        let ta = create(&mut tree, &theme, Some(scr), None).unwrap();
        assert_eq!(text(&tree, ta), Some("Text"));
        assert_eq!(set_text(&mut tree, ta, "abcdef"), EditOutcome::Truncated);
        assert_eq!(text(&tree, ta), Some("abcd"));
        assert_eq!(cursor_pos(&tree, ta), 4);
    }

    #[test]
    fn test_edits_on_plain_object_are_rejected() {
        let (mut tree, ta) = setup();
        let scr = tree.parent(ta).unwrap();
        let plain = tree.create(Some(scr), None).unwrap();
        let rejected = EditOutcome::Rejected(RejectReason::NotTextArea);
        assert_eq!(add_text(&mut tree, plain, "x"), rejected);
        assert_eq!(del(&mut tree, plain), rejected);
        assert_eq!(cursor_down(&mut tree, plain), rejected);
        assert_eq!(set_cursor_pos(&mut tree, plain, 3), 0);
    }
}
