//! Object tree
//!
//! [`ObjTree`] owns every node in a slotmap arena. Nodes refer to each other
//! by [`ObjId`]; a handle to a deleted node stays invalid forever, so every
//! operation checks it first. Mutators called with a stale handle log a
//! warning and do nothing; structural operations return
//! [`ObjError::Stale`].
//!
//! Roots of the tree are screens. Only nodes on the active screen produce
//! invalid areas.

use std::any::Any;
use std::sync::Arc;

use slotmap::SlotMap;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::config::DisplayConfig;
use crate::error::{ObjError, Result};
use crate::ext::{self, Extension};
use crate::font::{FixedFont, Font, FontId, FontRegistry};
use crate::geom::{Area, Coord, Point};
use crate::invalidate::InvalidAreas;
use crate::obj::{Obj, ObjFlags, ObjId, Protect};
use crate::signal::Signal;
use crate::style::{ObjStyle, Opa, StyleId, StyleStore};
use crate::timer::Timers;

/// Placement of a node relative to a reference node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Align {
    Center,
    InTopLeft,
    InTopMid,
    InTopRight,
    InBottomLeft,
    InBottomMid,
    InBottomRight,
    InLeftMid,
    InRightMid,
    OutTopLeft,
    OutTopMid,
    OutTopRight,
    OutBottomLeft,
    OutBottomMid,
    OutBottomRight,
    OutLeftTop,
    OutLeftMid,
    OutLeftBottom,
    OutRightTop,
    OutRightMid,
    OutRightBottom,
}

impl Align {
    /// Offset of a `w`x`h` node from the top-left corner of a `base_w`x`base_h` reference
    pub fn offset(self, base_w: Coord, base_h: Coord, w: Coord, h: Coord) -> Point {
        let mid_x = base_w / 2 - w / 2;
        let mid_y = base_h / 2 - h / 2;
        let (x, y) = match self {
            Align::Center => (mid_x, mid_y),
            Align::InTopLeft => (0, 0),
            Align::InTopMid => (mid_x, 0),
            Align::InTopRight => (base_w - w, 0),
            Align::InBottomLeft => (0, base_h - h),
            Align::InBottomMid => (mid_x, base_h - h),
            Align::InBottomRight => (base_w - w, base_h - h),
            Align::InLeftMid => (0, mid_y),
            Align::InRightMid => (base_w - w, mid_y),
            Align::OutTopLeft => (0, -h),
            Align::OutTopMid => (mid_x, -h),
            Align::OutTopRight => (base_w - w, -h),
            Align::OutBottomLeft => (0, base_h),
            Align::OutBottomMid => (mid_x, base_h),
            Align::OutBottomRight => (base_w - w, base_h),
            Align::OutLeftTop => (-w, 0),
            Align::OutLeftMid => (-w, mid_y),
            Align::OutLeftBottom => (-w, base_h - h),
            Align::OutRightTop => (base_w, 0),
            Align::OutRightMid => (base_w, mid_y),
            Align::OutRightBottom => (base_w, base_h - h),
        };
        Point::new(x, y)
    }
}

fn stale(op: &str, obj: ObjId) {
    warn!("{}: object {:?} does not exist", op, obj);
}

/// The object tree of one display
pub struct ObjTree {
    pub(crate) objs: SlotMap<ObjId, Obj>,
    pub(crate) screens: Vec<ObjId>,
    pub(crate) act_scr: Option<ObjId>,
    pub(crate) styles: StyleStore,
    pub(crate) invalid: InvalidAreas,
    pub(crate) timers: Timers,
    fonts: FontRegistry,
    config: DisplayConfig,
    default_style: StyleId,
    screen_style: StyleId,
}

impl ObjTree {
    /// Create an empty tree for a display
    pub fn new(config: DisplayConfig) -> Self {
        let mut styles = StyleStore::new();
        let default_style = styles.register(ObjStyle::plain());
        let screen_style = styles.register(ObjStyle::screen());
        let font: Arc<dyn Font> = Arc::new(FixedFont::new(config.font.width, config.font.height));
        Self {
            objs: SlotMap::with_key(),
            screens: Vec::new(),
            act_scr: None,
            styles,
            invalid: InvalidAreas::new(config.screen_area(), config.inv_buf_size),
            timers: Timers::default(),
            fonts: FontRegistry::new(font),
            config,
            default_style,
            screen_style,
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    /// Register an additional font
    pub fn register_font(&mut self, font: Arc<dyn Font>) -> FontId {
        self.fonts.register(font)
    }

    /// Style given to new plain objects
    pub fn default_style(&self) -> StyleId {
        self.default_style
    }

    /// Style given to new screens
    pub fn screen_style(&self) -> StyleId {
        self.screen_style
    }

    pub fn get(&self, obj: ObjId) -> Option<&Obj> {
        self.objs.get(obj)
    }

    pub fn contains(&self, obj: ObjId) -> bool {
        self.objs.contains_key(obj)
    }

    /// Number of live nodes, screens included
    pub fn len(&self) -> usize {
        self.objs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objs.is_empty()
    }

    // ---- Structure ----

    /// Create a node under `parent`, or a new screen when `parent` is `None`
    ///
    /// With `copy`, geometry, flags, opacity, tags and the style binding are
    /// taken from that node; children are not copied.
    pub fn create(&mut self, parent: Option<ObjId>, copy: Option<ObjId>) -> Result<ObjId> {
        for handle in parent.iter().chain(copy.iter()) {
            if !self.contains(*handle) {
                return Err(ObjError::Stale(*handle));
            }
        }

        let id = match parent {
            None => {
                let id = self
                    .objs
                    .insert(Obj::new(None, self.config.screen_area(), self.screen_style));
                self.screens.push(id);
                if self.act_scr.is_none() {
                    self.act_scr = Some(id);
                }
                id
            }
            Some(p) => {
                let origin = self.objs[p].coords;
                let coords = Area::with_size(
                    origin.x1,
                    origin.y1,
                    self.config.obj_def_width,
                    self.config.obj_def_height,
                );
                let id = self.objs.insert(Obj::new(Some(p), coords, self.default_style));
                self.objs[p].children.push(id);
                id
            }
        };

        if let Some(src) = copy {
            self.copy_attributes(id, src);
        }
        debug!("created {:?} under {:?}", id, parent);

        if parent.is_some() {
            self.notify_parent(id);
        }
        self.invalidate(id);
        Ok(id)
    }

    fn copy_attributes(&mut self, id: ObjId, src: ObjId) {
        let s = &self.objs[src];
        let src_origin = self.origin_of(s.parent);
        let rel = Point::new(s.coords.x1 - src_origin.x, s.coords.y1 - src_origin.y);
        let (w, h) = (s.coords.width(), s.coords.height());
        let (flags, protect, opa, ext_size, free_num, style) =
            (s.flags, s.protect, s.opa, s.ext_size, s.free_num, s.style);

        let style = if flags.contains(ObjFlags::STYLE_ISO) {
            match self.styles.clone_data(style) {
                Some(data) => self.styles.insert_isolated(data, id),
                None => style,
            }
        } else {
            style
        };

        let origin = self.origin_of(self.objs[id].parent);
        let o = &mut self.objs[id];
        o.coords = Area::with_size(origin.x + rel.x, origin.y + rel.y, w, h);
        o.flags = flags;
        o.protect = protect;
        o.opa = opa;
        o.ext_size = ext_size;
        o.free_num = free_num;
        o.style = style;
    }

    /// Delete a node with its whole subtree
    ///
    /// Every node receives [`Signal::Cleanup`] before its children are
    /// deleted. The parent is notified with `ChildChanged(None)`.
    pub fn delete(&mut self, obj: ObjId) -> Result<()> {
        let Some(o) = self.objs.get(obj) else {
            return Err(ObjError::Stale(obj));
        };
        let parent = o.parent;
        self.invalidate(obj);
        self.delete_subtree(obj);
        debug!("deleted {:?}", obj);

        match parent {
            Some(p) => {
                if self.contains(p) {
                    let _ = self.send_signal(p, Signal::ChildChanged(None));
                }
            }
            None => {
                self.screens.retain(|&s| s != obj);
                if self.act_scr == Some(obj) {
                    self.act_scr = self.screens.first().copied();
                }
            }
        }
        Ok(())
    }

    fn delete_subtree(&mut self, obj: ObjId) {
        if self.send_signal(obj, Signal::Cleanup).is_deleted() {
            return;
        }
        let children = self.objs[obj].children.clone();
        for child in children {
            self.delete_subtree(child);
        }

        self.unlink(obj);
        self.timers.cancel_for(obj);
        if let Some(o) = self.objs.remove(obj) {
            self.styles.release(o.style, obj);
        }
    }

    fn unlink(&mut self, obj: ObjId) {
        if let Some(p) = self.objs.get(obj).and_then(|o| o.parent) {
            if let Some(po) = self.objs.get_mut(p) {
                po.children.retain(|c| *c != obj);
            }
        }
    }

    /// Delete every child of a node
    pub fn clean(&mut self, obj: ObjId) -> Result<()> {
        let children: SmallVec<[ObjId; 4]> = match self.objs.get(obj) {
            Some(o) => o.children.clone(),
            None => return Err(ObjError::Stale(obj)),
        };
        for child in children {
            if self.contains(child) {
                self.delete(child)?;
            }
        }
        Ok(())
    }

    /// Move a node under another parent, keeping its absolute position
    pub fn set_parent(&mut self, obj: ObjId, parent: ObjId) -> Result<()> {
        let Some(o) = self.objs.get(obj) else {
            return Err(ObjError::Stale(obj));
        };
        if !self.contains(parent) {
            return Err(ObjError::Stale(parent));
        }
        let Some(old) = o.parent else {
            return Err(ObjError::Screen(obj));
        };
        if parent == obj || self.is_ancestor(obj, parent) {
            return Err(ObjError::Cycle { obj, parent });
        }
        if old == parent {
            return Ok(());
        }

        self.invalidate(obj);
        self.unlink(obj);
        self.objs[parent].children.push(obj);
        self.objs[obj].parent = Some(parent);
        debug!("moved {:?} from {:?} to {:?}", obj, old, parent);

        let notify = !self.objs[obj].protect.contains(Protect::CHILD_CHG);
        if notify {
            if self.contains(old) {
                let _ = self.send_signal(old, Signal::ChildChanged(None));
            }
            if self.contains(obj) && self.contains(parent) {
                let _ = self.send_signal(parent, Signal::ChildChanged(Some(obj)));
            }
        }
        self.invalidate(obj);
        Ok(())
    }

    /// Whether `ancestor` is a proper ancestor of `obj`
    pub fn is_ancestor(&self, ancestor: ObjId, obj: ObjId) -> bool {
        let mut cur = self.parent(obj);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.parent(p);
        }
        false
    }

    pub fn parent(&self, obj: ObjId) -> Option<ObjId> {
        self.objs.get(obj).and_then(|o| o.parent)
    }

    /// Children in z-order, the topmost last
    pub fn children(&self, obj: ObjId) -> &[ObjId] {
        self.objs
            .get(obj)
            .map(|o| o.children.as_slice())
            .unwrap_or_default()
    }

    pub fn child_count(&self, obj: ObjId) -> usize {
        self.children(obj).len()
    }

    /// Raise a node above its siblings
    pub fn move_foreground(&mut self, obj: ObjId) {
        let Some(p) = self.parent(obj) else {
            return;
        };
        let children = &mut self.objs[p].children;
        if children.last() == Some(&obj) {
            return;
        }
        children.retain(|c| *c != obj);
        children.push(obj);
        self.invalidate(obj);
    }

    pub(crate) fn collect_subtree(&self, obj: ObjId, out: &mut Vec<ObjId>) {
        if let Some(o) = self.objs.get(obj) {
            out.push(obj);
            for &child in o.children.iter() {
                self.collect_subtree(child, out);
            }
        }
    }

    // ---- Screens ----

    pub fn screens(&self) -> &[ObjId] {
        &self.screens
    }

    pub fn active_screen(&self) -> Option<ObjId> {
        self.act_scr
    }

    /// Make a screen the active one and redraw it entirely
    pub fn load_screen(&mut self, scr: ObjId) {
        if !self.screens.contains(&scr) {
            warn!("load_screen: {:?} is not a screen", scr);
            return;
        }
        self.act_scr = Some(scr);
        debug!("loaded screen {:?}", scr);
        self.invalidate(scr);
    }

    /// The screen a node belongs to
    pub fn screen_of(&self, obj: ObjId) -> Option<ObjId> {
        let mut cur = obj;
        loop {
            match self.objs.get(cur)?.parent {
                Some(p) => cur = p,
                None => return Some(cur),
            }
        }
    }

    // ---- Geometry ----

    fn origin_of(&self, parent: Option<ObjId>) -> Point {
        parent
            .and_then(|p| self.objs.get(p))
            .map_or(Point::ZERO, |p| Point::new(p.coords.x1, p.coords.y1))
    }

    /// Absolute coordinates
    pub fn coords(&self, obj: ObjId) -> Option<Area> {
        self.objs.get(obj).map(|o| o.coords)
    }

    /// X position relative to the parent
    pub fn x(&self, obj: ObjId) -> Coord {
        self.objs
            .get(obj)
            .map_or(0, |o| o.coords.x1 - self.origin_of(o.parent).x)
    }

    /// Y position relative to the parent
    pub fn y(&self, obj: ObjId) -> Coord {
        self.objs
            .get(obj)
            .map_or(0, |o| o.coords.y1 - self.origin_of(o.parent).y)
    }

    pub fn width(&self, obj: ObjId) -> Coord {
        self.objs.get(obj).map_or(0, |o| o.coords.width())
    }

    pub fn height(&self, obj: ObjId) -> Coord {
        self.objs.get(obj).map_or(0, |o| o.coords.height())
    }

    /// Move a node (and its subtree) to a position relative to its parent
    pub fn set_pos(&mut self, obj: ObjId, x: Coord, y: Coord) {
        let Some(o) = self.objs.get(obj) else {
            return stale("set_pos", obj);
        };
        let origin = self.origin_of(o.parent);
        let old = o.coords;
        let dx = x + origin.x - old.x1;
        let dy = y + origin.y - old.y1;
        if dx == 0 && dy == 0 {
            return;
        }

        self.invalidate(obj);
        self.translate_subtree(obj, dx, dy);
        self.coords_changed(obj, old);
    }

    pub fn set_x(&mut self, obj: ObjId, x: Coord) {
        let y = self.y(obj);
        self.set_pos(obj, x, y);
    }

    pub fn set_y(&mut self, obj: ObjId, y: Coord) {
        let x = self.x(obj);
        self.set_pos(obj, x, y);
    }

    /// Resize a node, keeping its top-left corner
    pub fn set_size(&mut self, obj: ObjId, w: Coord, h: Coord) {
        let Some(o) = self.objs.get_mut(obj) else {
            return stale("set_size", obj);
        };
        let old = o.coords;
        if old.width() == w && old.height() == h {
            return;
        }

        self.invalidate(obj);
        let o = &mut self.objs[obj];
        o.coords.set_width(w);
        o.coords.set_height(h);
        self.coords_changed(obj, old);
        self.refresh_ext_size(obj);
    }

    pub fn set_width(&mut self, obj: ObjId, w: Coord) {
        let h = self.height(obj);
        self.set_size(obj, w, h);
    }

    pub fn set_height(&mut self, obj: ObjId, h: Coord) {
        let w = self.width(obj);
        self.set_size(obj, w, h);
    }

    /// Place a node relative to `base` (the parent when `None`)
    pub fn align(&mut self, obj: ObjId, base: Option<ObjId>, align: Align, x_mod: Coord, y_mod: Coord) {
        let Some(o) = self.objs.get(obj) else {
            return stale("align", obj);
        };
        let base_area = base
            .or(o.parent)
            .and_then(|b| self.coords(b))
            .unwrap_or_else(|| self.config.screen_area());
        let offset = align.offset(
            base_area.width(),
            base_area.height(),
            o.coords.width(),
            o.coords.height(),
        );
        let origin = self.origin_of(o.parent);
        self.set_pos(
            obj,
            offset.x + x_mod + base_area.x1 - origin.x,
            offset.y + y_mod + base_area.y1 - origin.y,
        );
    }

    fn translate_subtree(&mut self, obj: ObjId, dx: Coord, dy: Coord) {
        let mut stack = vec![obj];
        while let Some(id) = stack.pop() {
            if let Some(o) = self.objs.get_mut(id) {
                o.coords.translate(dx, dy);
                stack.extend(o.children.iter().copied());
            }
        }
    }

    fn coords_changed(&mut self, obj: ObjId, old: Area) {
        if self.send_signal(obj, Signal::CoordChanged(old)).is_deleted() {
            return;
        }
        self.notify_parent(obj);
        self.invalidate(obj);
    }

    /// Send `ChildChanged(Some(obj))` to the parent unless `obj` is protected
    fn notify_parent(&mut self, obj: ObjId) {
        let Some(o) = self.objs.get(obj) else {
            return;
        };
        if o.protect.contains(Protect::CHILD_CHG) {
            return;
        }
        if let Some(p) = o.parent {
            let _ = self.send_signal(p, Signal::ChildChanged(Some(obj)));
        }
    }

    // ---- Flags and attributes ----

    pub fn flags(&self, obj: ObjId) -> ObjFlags {
        self.objs.get(obj).map_or(ObjFlags::empty(), |o| o.flags)
    }

    fn set_flag(&mut self, obj: ObjId, flag: ObjFlags, on: bool) {
        match self.objs.get_mut(obj) {
            Some(o) => o.flags.set(flag, on),
            None => stale("set_flag", obj),
        }
    }

    pub fn is_hidden(&self, obj: ObjId) -> bool {
        self.flags(obj).contains(ObjFlags::HIDDEN)
    }

    /// Hide or show a node with its subtree
    pub fn set_hidden(&mut self, obj: ObjId, hidden: bool) {
        if !self.contains(obj) {
            return stale("set_hidden", obj);
        }
        if self.is_hidden(obj) == hidden {
            return;
        }
        if hidden {
            self.invalidate(obj);
        }
        self.set_flag(obj, ObjFlags::HIDDEN, hidden);
        if !hidden {
            self.invalidate(obj);
        }
        self.notify_parent(obj);
    }

    pub fn set_click(&mut self, obj: ObjId, on: bool) {
        self.set_flag(obj, ObjFlags::CLICK, on);
    }

    pub fn set_drag(&mut self, obj: ObjId, on: bool) {
        self.set_flag(obj, ObjFlags::DRAG, on);
    }

    pub fn set_drag_throw(&mut self, obj: ObjId, on: bool) {
        self.set_flag(obj, ObjFlags::DRAG_THROW, on);
    }

    pub fn set_drag_parent(&mut self, obj: ObjId, on: bool) {
        self.set_flag(obj, ObjFlags::DRAG_PARENT, on);
    }

    /// Raise the node to the foreground whenever it is pressed
    pub fn set_top(&mut self, obj: ObjId, on: bool) {
        self.set_flag(obj, ObjFlags::TOP, on);
    }

    pub fn protect(&self, obj: ObjId) -> Protect {
        self.objs.get(obj).map_or(Protect::empty(), |o| o.protect)
    }

    pub fn set_protect(&mut self, obj: ObjId, prot: Protect) {
        match self.objs.get_mut(obj) {
            Some(o) => o.protect.insert(prot),
            None => stale("set_protect", obj),
        }
    }

    pub fn clear_protect(&mut self, obj: ObjId, prot: Protect) {
        match self.objs.get_mut(obj) {
            Some(o) => o.protect.remove(prot),
            None => stale("clear_protect", obj),
        }
    }

    pub fn opa(&self, obj: ObjId) -> Opa {
        self.objs.get(obj).map_or(0, |o| o.opa)
    }

    pub fn set_opa(&mut self, obj: ObjId, opa: Opa) {
        let Some(o) = self.objs.get_mut(obj) else {
            return stale("set_opa", obj);
        };
        o.opa = opa;
        self.invalidate(obj);
    }

    /// Set the opacity of a whole subtree, skipping nodes protected with [`Protect::OPA`]
    pub fn set_opa_recursive(&mut self, obj: ObjId, opa: Opa) {
        let mut nodes = Vec::new();
        self.collect_subtree(obj, &mut nodes);
        for id in nodes {
            let o = &mut self.objs[id];
            if !o.protect.contains(Protect::OPA) {
                o.opa = opa;
            }
        }
        self.invalidate(obj);
    }

    pub fn ext_size(&self, obj: ObjId) -> Coord {
        self.objs.get(obj).map_or(0, |o| o.ext_size)
    }

    /// Set the extra drawn margin around a node
    pub fn set_ext_size(&mut self, obj: ObjId, size: Coord) {
        let Some(o) = self.objs.get_mut(obj) else {
            return stale("set_ext_size", obj);
        };
        o.ext_size = size;
        self.invalidate(obj);
    }

    /// Recompute the extra drawn margin: reset it and let the widget enlarge it
    pub fn refresh_ext_size(&mut self, obj: ObjId) {
        let Some(o) = self.objs.get_mut(obj) else {
            return;
        };
        o.ext_size = 0;
        if self.send_signal(obj, Signal::RefreshExtSize).is_valid() {
            self.invalidate(obj);
        }
    }

    pub fn free_num(&self, obj: ObjId) -> u8 {
        self.objs.get(obj).map_or(0, |o| o.free_num)
    }

    pub fn set_free_num(&mut self, obj: ObjId, num: u8) {
        match self.objs.get_mut(obj) {
            Some(o) => o.free_num = num,
            None => stale("set_free_num", obj),
        }
    }

    /// Attach an application value to a node, replacing any previous one
    pub fn set_app_data<T: Any>(&mut self, obj: ObjId, data: T) {
        match self.objs.get_mut(obj) {
            Some(o) => o.app_data = Some(Box::new(data)),
            None => stale("set_app_data", obj),
        }
    }

    pub fn app_data<T: Any>(&self, obj: ObjId) -> Option<&T> {
        self.objs.get(obj)?.app_data.as_ref()?.downcast_ref::<T>()
    }

    pub fn take_app_data(&mut self, obj: ObjId) -> Option<Box<dyn Any>> {
        self.objs.get_mut(obj)?.app_data.take()
    }

    // ---- Extensions ----

    /// Attach a widget extension, replacing any previous one
    pub fn set_ext<T: Extension>(&mut self, obj: ObjId, ext: T) {
        match self.objs.get_mut(obj) {
            Some(o) => o.ext = Some(Box::new(ext)),
            None => stale("set_ext", obj),
        }
    }

    /// The node's extension viewed as `T` (or an ancestor record of type `T`)
    pub fn ext<T: Extension>(&self, obj: ObjId) -> Option<&T> {
        let e = self.objs.get(obj)?.ext.as_deref()?;
        ext::downcast_ref::<T>(e)
    }

    pub fn ext_mut<T: Extension>(&mut self, obj: ObjId) -> Option<&mut T> {
        let e = self.objs.get_mut(obj)?.ext.as_deref_mut()?;
        ext::downcast_mut::<T>(e)
    }

    /// Replace an extension of type `P` with a specialized record built from it
    ///
    /// Returns false and leaves the node untouched if its extension is not a `P`.
    pub fn upgrade_ext<P: Extension, T: Extension>(&mut self, obj: ObjId, build: impl FnOnce(P) -> T) -> bool {
        let Some(o) = self.objs.get_mut(obj) else {
            return false;
        };
        if !o.ext.as_ref().is_some_and(|e| e.as_any().is::<P>()) {
            return false;
        }
        let Some(prev) = o.ext.take() else {
            return false;
        };
        match prev.into_any().downcast::<P>() {
            Ok(prev) => {
                o.ext = Some(Box::new(build(*prev)));
                true
            }
            Err(_) => false,
        }
    }
}
