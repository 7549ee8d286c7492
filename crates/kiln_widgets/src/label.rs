//! Label widget
//!
//! Holds a text and sizes itself to it. In [`LongMode::Expand`] the label
//! grows in both directions; in [`LongMode::Break`] its width is fixed, lines
//! wrap and only the height follows the text.

use kiln_core::text::TextMetrics;
use kiln_core::{
    impl_extension, Area, DesignMode, LabelStyle, ObjId, ObjTree, Painter, Point, Result, Signal,
    Validity,
};
use tracing::debug;

use crate::theme::Theme;

/// How a label handles text longer than its width
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LongMode {
    /// Resize to the text
    #[default]
    Expand,
    /// Keep the width and wrap lines
    Break,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelExt {
    text: String,
    long_mode: LongMode,
}
impl_extension!(LabelExt);

/// Create a label, copying text and long mode from `copy` if it is a label
pub fn create(tree: &mut ObjTree, theme: &Theme, parent: Option<ObjId>, copy: Option<ObjId>) -> Result<ObjId> {
    let label = tree.create(parent, copy)?;
    let ext = copy
        .and_then(|c| tree.ext::<LabelExt>(c).cloned())
        .unwrap_or_else(|| LabelExt {
            text: "Text".to_string(),
            long_mode: LongMode::Expand,
        });
    tree.set_ext(label, ext);
    tree.extend_signal(label, label_signal);
    tree.extend_design(label, label_design);

    if copy.is_none() {
        tree.set_click(label, false);
        tree.set_style(label, theme.label.text);
    } else {
        refresh_text(tree, label);
    }
    debug!("created label {:?}", label);
    Ok(label)
}

pub fn text(tree: &ObjTree, label: ObjId) -> Option<&str> {
    tree.ext::<LabelExt>(label).map(|e| e.text.as_str())
}

/// Number of characters in the text
pub fn text_len(tree: &ObjTree, label: ObjId) -> usize {
    text(tree, label).map_or(0, |t| t.chars().count())
}

pub fn set_text(tree: &mut ObjTree, label: ObjId, text: &str) {
    let Some(ext) = tree.ext_mut::<LabelExt>(label) else {
        return;
    };
    ext.text.clear();
    ext.text.push_str(text);
    refresh_text(tree, label);
}

pub fn long_mode(tree: &ObjTree, label: ObjId) -> LongMode {
    tree.ext::<LabelExt>(label).map_or_else(LongMode::default, |e| e.long_mode)
}

pub fn set_long_mode(tree: &mut ObjTree, label: ObjId, mode: LongMode) {
    let Some(ext) = tree.ext_mut::<LabelExt>(label) else {
        return;
    };
    ext.long_mode = mode;
    refresh_text(tree, label);
}

fn measure<R>(tree: &ObjTree, label: ObjId, f: impl FnOnce(&TextMetrics<'_>, &[char]) -> R) -> Option<R> {
    let ext = tree.ext::<LabelExt>(label)?;
    let style = tree.style_as::<LabelStyle>(label)?;
    let metrics = TextMetrics {
        font: tree.fonts().get(style.font),
        letter_space: style.letter_space,
        line_space: style.line_space,
        max_width: match ext.long_mode {
            LongMode::Expand => None,
            LongMode::Break => Some(tree.width(label)),
        },
    };
    let chars: Vec<char> = ext.text.chars().collect();
    Some(f(&metrics, &chars))
}

/// Resize the label to its text and redraw it
pub fn refresh_text(tree: &mut ObjTree, label: ObjId) {
    let Some((w, h)) = measure(tree, label, |m, chars| m.text_size(chars)) else {
        return;
    };
    match long_mode(tree, label) {
        LongMode::Expand => tree.set_size(label, w, h),
        LongMode::Break => tree.set_height(label, h),
    }
    tree.invalidate(label);
}

/// Position of the character at `index` relative to the label's top-left corner
pub fn letter_pos(tree: &ObjTree, label: ObjId, index: usize) -> Point {
    measure(tree, label, |m, chars| m.letter_pos(chars, index)).unwrap_or(Point::ZERO)
}

/// Index of the character under a position relative to the label's top-left corner
pub fn letter_on(tree: &ObjTree, label: ObjId, pos: Point) -> usize {
    measure(tree, label, |m, chars| m.letter_on(chars, pos)).unwrap_or(0)
}

fn label_signal(tree: &mut ObjTree, label: ObjId, signal: &Signal) -> Validity {
    match signal {
        Signal::StyleChanged => refresh_text(tree, label),
        Signal::CoordChanged(old) => {
            if long_mode(tree, label) == LongMode::Break && old.width() != tree.width(label) {
                refresh_text(tree, label);
            }
        }
        _ => {}
    }
    Validity::Valid
}

fn label_design(
    tree: &ObjTree,
    label: ObjId,
    mask: &Area,
    mode: DesignMode,
    painter: &mut dyn Painter,
    inherited: bool,
) -> bool {
    if mode != DesignMode::DrawMain {
        return inherited;
    }
    let (Some(obj), Some(style), Some(txt)) = (
        tree.get(label),
        tree.style_as::<LabelStyle>(label),
        text(tree, label),
    ) else {
        return inherited;
    };
    painter.draw_label(&obj.coords(), mask, style, obj.opa(), txt);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use kiln_core::{DisplayConfig, DrawCommand, RecordingPainter};

    fn setup() -> (ObjTree, Theme, ObjId) {
        let mut tree = ObjTree::new(DisplayConfig::standard());
        let theme = Theme::install(&mut tree, &WidgetConfig::default());
        let scr = tree.create(None, None).unwrap();
        (tree, theme, scr)
    }

    #[test]
    fn test_expand_fits_text() {
        let (mut tree, theme, scr) = setup();
        let label = create(&mut tree, &theme, Some(scr), None).unwrap();
        assert_eq!(text(&tree, label), Some("Text"));
        assert_eq!((tree.width(label), tree.height(label)), (32, 16));

        set_text(&mut tree, label, "ab\ncdef");
        assert_eq!((tree.width(label), tree.height(label)), (32, 34));
    }

    #[test]
    fn test_break_wraps_at_fixed_width() {
        let (mut tree, theme, scr) = setup();
        let label = create(&mut tree, &theme, Some(scr), None).unwrap();
        set_long_mode(&mut tree, label, LongMode::Break);
        tree.set_width(label, 40);
        set_text(&mut tree, label, "one two three");
        assert_eq!(tree.width(label), 40);
        assert_eq!(tree.height(label), 3 * 18 - 2);
        assert_eq!(letter_pos(&tree, label, 4), Point::new(0, 18));
        assert_eq!(letter_on(&tree, label, Point::new(9, 20)), 5);
    }

    #[test]
    fn test_copy_takes_text() {
        let (mut tree, theme, scr) = setup();
        let src = create(&mut tree, &theme, Some(scr), None).unwrap();
        set_text(&mut tree, src, "copied");
        let copy = create(&mut tree, &theme, Some(scr), Some(src)).unwrap();
        assert_eq!(text(&tree, copy), Some("copied"));
        assert_eq!(tree.width(copy), tree.width(src));
    }

    #[test]
    fn test_draws_through_label_primitive() {
        let (mut tree, theme, scr) = setup();
        let label = create(&mut tree, &theme, Some(scr), None).unwrap();
        let mut painter = RecordingPainter::new();
        let mask = tree.config().screen_area();
        tree.draw(label, &mask, &mut painter);
        assert!(matches!(
            painter.commands(),
            [DrawCommand::Label { text, .. }] if text == "Text"
        ));
    }
}
