//! Page widget
//!
//! A page owns a scrollable child (`scrl`) that holds the content. Children
//! added to the page itself are moved onto the scrollable part unless they
//! are protected with [`Protect::PARENT`]. The scrollable part is as wide as
//! the page's inner area, as tall as its content, and is kept inside the
//! page: content shorter than the page sticks to the top, taller content can
//! be scrolled but never leaves a gap at either end.

use kiln_core::{
    impl_extension, impl_style, Area, Coord, DesignMode, ObjId, ObjTree, Painter, Protect,
    RectStyle, Result, Signal, StyleId, Validity,
};
use tracing::{debug, warn};

use crate::theme::Theme;

/// Shortest scrollbar drawn, in pixels
pub const SB_MIN_SIZE: Coord = 10;

/// When the scrollbars are shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollbarMode {
    Off,
    /// Always
    On,
    /// While the content is dragged and overflows
    Drag,
    /// While the content overflows
    #[default]
    Auto,
}

/// Page style: background, scrollable part and scrollbars
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageStyle {
    pub bg: RectStyle,
    /// Style of the scrollable part
    pub scrl: StyleId,
    pub sb: RectStyle,
    pub sb_width: Coord,
    pub sb_mode: ScrollbarMode,
}
impl_style!(PageStyle => bg);

/// Page state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageExt {
    scrl: ObjId,
    sbh: Area,
    sbv: Area,
    sbh_draw: bool,
    sbv_draw: bool,
    dragging: bool,
}
impl_extension!(PageExt);

impl PageExt {
    fn new(scrl: ObjId) -> Self {
        Self {
            scrl,
            sbh: Area::default(),
            sbv: Area::default(),
            sbh_draw: false,
            sbv_draw: false,
            dragging: false,
        }
    }

    /// The scrollable child
    pub fn scrollable(&self) -> ObjId {
        self.scrl
    }
}

/// Create a page
pub fn create(tree: &mut ObjTree, theme: &Theme, parent: Option<ObjId>, copy: Option<ObjId>) -> Result<ObjId> {
    let page = tree.create(parent, copy)?;
    let copy_scrl = copy.and_then(|c| scrollable(tree, c));
    let scrl = tree.create(Some(page), copy_scrl)?;

    tree.set_ext(page, PageExt::new(scrl));
    tree.extend_signal(page, page_signal);
    tree.extend_design(page, page_design);
    tree.extend_signal(scrl, scrollable_signal);

    if copy_scrl.is_none() {
        tree.set_drag(scrl, true);
        tree.set_drag_throw(scrl, true);
        tree.set_protect(scrl, Protect::PARENT);
    }
    if copy.is_none() {
        tree.set_style(page, theme.page.default);
    } else {
        tree.refresh_style(page);
    }
    debug!("created page {:?} (scrollable {:?})", page, scrl);
    Ok(page)
}

/// The scrollable child of a page
pub fn scrollable(tree: &ObjTree, page: ObjId) -> Option<ObjId> {
    tree.ext::<PageExt>(page).map(|e| e.scrl)
}

/// Make dragging `obj` scroll the page it is on
pub fn glue(tree: &mut ObjTree, obj: ObjId, glue: bool) {
    tree.set_drag_parent(obj, glue);
    tree.set_drag(obj, glue);
}

/// Horizontal and vertical scrollbar areas, `None` when not shown
pub fn scrollbar_areas(tree: &ObjTree, page: ObjId) -> (Option<Area>, Option<Area>) {
    match tree.ext::<PageExt>(page) {
        Some(e) => (e.sbh_draw.then_some(e.sbh), e.sbv_draw.then_some(e.sbv)),
        None => (None, None),
    }
}

fn page_signal(tree: &mut ObjTree, page: ObjId, signal: &Signal) -> Validity {
    let Some(scrl) = scrollable(tree, page) else {
        return Validity::Valid;
    };
    match *signal {
        Signal::ChildChanged(Some(child)) => {
            let adopt = child != scrl
                && tree.parent(child) == Some(page)
                && !tree.protect(child).contains(Protect::PARENT);
            if adopt {
                if let Err(err) = tree.set_parent(child, scrl) {
                    warn!("page {:?} could not adopt {:?}: {}", page, child, err);
                }
            }
        }
        Signal::StyleChanged => {
            if let Some(style) = tree.style_as::<PageStyle>(page).copied() {
                tree.set_style(scrl, style.scrl);
                fit_width(tree, page, scrl);
            }
        }
        Signal::CoordChanged(old) => {
            let now = tree.coords(page).unwrap_or(old);
            if old.width() != now.width() || old.height() != now.height() {
                fit_width(tree, page, scrl);
                clamp(tree, page);
            }
        }
        _ => {}
    }
    Validity::Valid
}

fn scrollable_signal(tree: &mut ObjTree, scrl: ObjId, signal: &Signal) -> Validity {
    let Some(page) = tree.parent(scrl) else {
        return Validity::Valid;
    };
    if scrollable(tree, page) != Some(scrl) {
        return Validity::Valid;
    }
    match signal {
        Signal::ChildChanged(_) | Signal::StyleChanged => {
            fit_content(tree, scrl);
            clamp(tree, page);
        }
        Signal::CoordChanged(_) => clamp(tree, page),
        Signal::DragBegin | Signal::DragEnd => {
            if let Some(ext) = tree.ext_mut::<PageExt>(page) {
                ext.dragging = matches!(signal, Signal::DragBegin);
            }
            refresh_scrollbars(tree, page);
        }
        _ => {}
    }
    Validity::Valid
}

fn fit_width(tree: &mut ObjTree, page: ObjId, scrl: ObjId) {
    let Some(hpad) = tree.style_as::<RectStyle>(page).map(|s| s.hpad) else {
        return;
    };
    let w = (tree.width(page) - 2 * hpad).max(0);
    tree.set_width(scrl, w);
}

/// Fit the scrollable part's height to its children plus padding
fn fit_content(tree: &mut ObjTree, scrl: ObjId) {
    let (Some(area), Some(vpad)) = (
        tree.coords(scrl),
        tree.style_as::<RectStyle>(scrl).map(|s| s.vpad),
    ) else {
        return;
    };
    let bottom = tree
        .children(scrl)
        .iter()
        .filter_map(|&c| tree.coords(c))
        .map(|c| c.y2)
        .max();
    let h = match bottom {
        Some(y2) => y2 - area.y1 + 1 + vpad,
        None => 2 * vpad,
    };
    tree.set_height(scrl, h.max(0));
}

/// Relative position that keeps `[s1, s2]` inside `[p1, p2]` with `pad` margins
fn clamp_axis(p1: Coord, p2: Coord, s1: Coord, s2: Coord, pad: Coord) -> Coord {
    let page_len = p2 - p1 + 1;
    let scrl_len = s2 - s1 + 1;
    if scrl_len <= page_len - 2 * pad || s1 > p1 + pad {
        pad
    } else if s2 < p2 - pad {
        page_len - scrl_len - pad
    } else {
        s1 - p1
    }
}

/// Keep the scrollable part inside the page and update the scrollbars
///
/// A scrollable part protected with [`Protect::POS`] is left where it is.
fn clamp(tree: &mut ObjTree, page: ObjId) {
    let Some(scrl) = scrollable(tree, page) else {
        return;
    };
    if tree.protect(scrl).contains(Protect::POS) {
        refresh_scrollbars(tree, page);
        return;
    }
    let (Some(p), Some(s), Some(bg)) = (
        tree.coords(page),
        tree.coords(scrl),
        tree.style_as::<RectStyle>(page).copied(),
    ) else {
        return;
    };
    let x = clamp_axis(p.x1, p.x2, s.x1, s.x2, bg.hpad);
    let y = clamp_axis(p.y1, p.y2, s.y1, s.y2, bg.vpad);
    tree.set_pos(scrl, x, y);
    refresh_scrollbars(tree, page);
}

/// Position and length of a scrollbar along one axis
fn bar(track: Coord, content: Coord, scrolled: Coord) -> (Coord, Coord) {
    if content <= track {
        return (0, track);
    }
    let len = (track * track / content).max(SB_MIN_SIZE).min(track);
    let range = content - track;
    let pos = (scrolled.clamp(0, range) * (track - len)) / range;
    (pos, len)
}

fn refresh_scrollbars(tree: &mut ObjTree, page: ObjId) {
    let Some(scrl) = scrollable(tree, page) else {
        return;
    };
    let (Some(p), Some(s), Some(style), Some(ext)) = (
        tree.coords(page),
        tree.coords(scrl),
        tree.style_as::<PageStyle>(page).copied(),
        tree.ext::<PageExt>(page),
    ) else {
        return;
    };
    let (hpad, vpad) = (style.bg.hpad, style.bg.vpad);
    let w = style.sb_width;

    let v_content = s.height() + 2 * vpad;
    let h_content = s.width() + 2 * hpad;
    let show = |overflow: bool| match style.sb_mode {
        ScrollbarMode::Off => false,
        ScrollbarMode::On => true,
        ScrollbarMode::Auto => overflow,
        ScrollbarMode::Drag => ext.dragging && overflow,
    };
    let sbv_draw = show(v_content > p.height());
    let sbh_draw = show(h_content > p.width());

    let (vpos, vlen) = bar(p.height(), v_content, p.y1 + vpad - s.y1);
    let sbv = Area::new(p.x2 - w + 1, p.y1 + vpos, p.x2, p.y1 + vpos + vlen - 1);
    let (hpos, hlen) = bar(p.width(), h_content, p.x1 + hpad - s.x1);
    let sbh = Area::new(p.x1 + hpos, p.y2 - w + 1, p.x1 + hpos + hlen - 1, p.y2);

    let updated = PageExt {
        sbh,
        sbv,
        sbh_draw,
        sbv_draw,
        ..ext.clone()
    };
    if *ext == updated {
        return;
    }
    if let Some(ext) = tree.ext_mut::<PageExt>(page) {
        *ext = updated;
    }
    tree.invalidate(page);
}

fn page_design(
    tree: &ObjTree,
    page: ObjId,
    mask: &Area,
    mode: DesignMode,
    painter: &mut dyn Painter,
    inherited: bool,
) -> bool {
    if mode != DesignMode::DrawPost {
        return inherited;
    }
    let (Some(ext), Some(style), opa) = (
        tree.ext::<PageExt>(page),
        tree.style_as::<PageStyle>(page),
        tree.opa(page),
    ) else {
        return inherited;
    };
    if ext.sbh_draw {
        painter.draw_rect(&ext.sbh, mask, &style.sb, opa);
    }
    if ext.sbv_draw {
        painter.draw_rect(&ext.sbv, mask, &style.sb, opa);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use kiln_core::{DisplayConfig, RecordingPainter};

    fn setup() -> (ObjTree, Theme, ObjId) {
        let mut tree = ObjTree::new(DisplayConfig::standard());
        let theme = Theme::install(&mut tree, &WidgetConfig::default());
        let scr = tree.create(None, None).unwrap();
        (tree, theme, scr)
    }

    #[test]
    fn test_children_move_onto_scrollable() {
        let (mut tree, theme, scr) = setup();
        let page = create(&mut tree, &theme, Some(scr), None).unwrap();
        let scrl = scrollable(&tree, page).unwrap();
        let child = tree.create(Some(page), None).unwrap();
        assert_eq!(tree.parent(child), Some(scrl));
        assert_eq!(tree.children(page), &[scrl]);

        let kept = tree.create(Some(scr), None).unwrap();
        tree.set_protect(kept, Protect::PARENT);
        tree.set_parent(kept, page).unwrap();
        assert_eq!(tree.parent(kept), Some(page));
    }

    #[test]
    fn test_scrollable_fits_width_and_content() {
        let (mut tree, theme, scr) = setup();
        let page = create(&mut tree, &theme, Some(scr), None).unwrap();
        tree.set_size(page, 100, 100);
        let scrl = scrollable(&tree, page).unwrap();
        // default page: bg pad 4, scrollable pad 8
        assert_eq!(tree.width(scrl), 92);
        assert_eq!((tree.x(scrl), tree.y(scrl)), (4, 4));
        assert_eq!(tree.height(scrl), 16);

        let child = tree.create(Some(page), None).unwrap();
        tree.set_pos(child, 8, 8);
        tree.set_size(child, 20, 200);
        assert_eq!(tree.height(scrl), 8 + 200 + 8);
    }

    #[test]
    fn test_scrollable_stays_inside_page() {
        let (mut tree, theme, scr) = setup();
        let page = create(&mut tree, &theme, Some(scr), None).unwrap();
        tree.set_size(page, 100, 100);
        let scrl = scrollable(&tree, page).unwrap();
        let child = tree.create(Some(page), None).unwrap();
        tree.set_size(child, 20, 300);

        tree.set_y(scrl, 50);
        assert_eq!(tree.y(scrl), 4);
        tree.set_y(scrl, -1000);
        assert_eq!(tree.y(scrl), 100 - tree.height(scrl) - 4);
        tree.set_y(scrl, -40);
        assert_eq!(tree.y(scrl), -40);

        tree.set_size(child, 20, 10);
        assert_eq!(tree.y(scrl), 4);
    }

    #[test]
    fn test_pos_protected_scrollable_is_not_clamped() {
        let (mut tree, theme, scr) = setup();
        let page = create(&mut tree, &theme, Some(scr), None).unwrap();
        tree.set_size(page, 100, 100);
        let scrl = scrollable(&tree, page).unwrap();
        tree.set_protect(scrl, Protect::POS);

        tree.set_y(scrl, 50);
        assert_eq!(tree.y(scrl), 50);

        tree.clear_protect(scrl, Protect::POS);
        tree.set_y(scrl, 60);
        assert_eq!(tree.y(scrl), 4);
    }

    #[test]
    fn test_auto_scrollbar_shown_on_overflow() {
        let (mut tree, theme, scr) = setup();
        let page = create(&mut tree, &theme, Some(scr), None).unwrap();
        tree.set_size(page, 100, 100);
        assert_eq!(scrollbar_areas(&tree, page), (None, None));

        let child = tree.create(Some(page), None).unwrap();
        tree.set_size(child, 20, 300);
        let (h, v) = scrollbar_areas(&tree, page);
        assert!(h.is_none());
        let v = v.unwrap();
        assert_eq!((v.x1, v.x2), (94, 99));
        assert_eq!(v.y1, 0);
        assert!(v.height() < 100);

        let mut painter = RecordingPainter::new();
        let mask = tree.config().screen_area();
        tree.draw(page, &mask, &mut painter);
        let last = painter.commands().last().unwrap();
        assert_eq!(last.area(), v);
    }

    #[test]
    fn test_glue() {
        let (mut tree, theme, scr) = setup();
        let page = create(&mut tree, &theme, Some(scr), None).unwrap();
        let child = tree.create(Some(page), None).unwrap();
        glue(&mut tree, child, true);
        let flags = tree.flags(child);
        assert!(flags.contains(kiln_core::ObjFlags::DRAG | kiln_core::ObjFlags::DRAG_PARENT));
    }
}
