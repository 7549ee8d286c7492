//! Style records and binding
//!
//! Styles live in a [`StyleStore`] owned by the tree and are referenced by
//! [`StyleId`]. A style record belongs to a family: a widget style embeds the
//! style of the widget it is built on, and [`StyleData::ancestor`] exposes the
//! embedded record so that base drawing code can read the fields it knows.
//!
//! Many nodes may share one record. A node can also get a private
//! ("isolated") copy that it owns; the copy is freed when the node is
//! deleted or its style is replaced.

use std::any::Any;

use slotmap::{new_key_type, SlotMap};
use tracing::{debug, warn};

use crate::font::FontId;
use crate::geom::Coord;
use crate::obj::{ObjFlags, ObjId};
use crate::signal::Signal;
use crate::tree::ObjTree;

/// Opacity, 0 is fully transparent
pub type Opa = u8;

pub const OPA_TRANSP: Opa = 0;
pub const OPA_50: Opa = 127;
pub const OPA_COVER: Opa = 255;

/// 24-bit RGB color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const SILVER: Color = Color::rgb(0xc0, 0xc0, 0xc0);
    pub const GRAY: Color = Color::rgb(0x80, 0x80, 0x80);
    pub const NAVY: Color = Color::rgb(0x00, 0x00, 0x80);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

new_key_type! {
    /// Handle to a record in the [`StyleStore`]
    pub struct StyleId;
}

/// Trait for style records
///
/// Implement it with [`impl_style!`](crate::impl_style).
pub trait StyleData: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Boxed copy of the whole record, used when isolating a style
    fn clone_style(&self) -> Box<dyn StyleData>;

    /// The embedded record of the family this style extends
    fn ancestor(&self) -> Option<&(dyn StyleData + 'static)> {
        None
    }

    fn ancestor_mut(&mut self) -> Option<&mut (dyn StyleData + 'static)> {
        None
    }
}

/// Implement [`StyleData`] for a `Clone` type, optionally naming the field
/// that holds the embedded ancestor style
#[macro_export]
macro_rules! impl_style {
    ($ty:ty) => {
        impl $crate::style::StyleData for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
            fn clone_style(&self) -> Box<dyn $crate::style::StyleData> {
                Box::new(self.clone())
            }
        }
    };
    ($ty:ty => $field:ident) => {
        impl $crate::style::StyleData for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
            fn clone_style(&self) -> Box<dyn $crate::style::StyleData> {
                Box::new(self.clone())
            }
            fn ancestor(&self) -> Option<&(dyn $crate::style::StyleData + 'static)> {
                Some(&self.$field)
            }
            fn ancestor_mut(&mut self) -> Option<&mut (dyn $crate::style::StyleData + 'static)> {
                Some(&mut self.$field)
            }
        }
    };
}

/// Find `T` in a style record or any of its embedded ancestors
pub fn downcast_ref<'a, T: StyleData>(style: &'a (dyn StyleData + 'static)) -> Option<&'a T> {
    let mut cur = Some(style);
    while let Some(s) = cur {
        if let Some(t) = s.as_any().downcast_ref::<T>() {
            return Some(t);
        }
        cur = s.ancestor();
    }
    None
}

/// Mutable variant of [`downcast_ref`]
pub fn downcast_mut<'a, T: StyleData>(style: &'a mut (dyn StyleData + 'static)) -> Option<&'a mut T> {
    if style.as_any().is::<T>() {
        return style.as_any_mut().downcast_mut::<T>();
    }
    match style.ancestor_mut() {
        Some(ancestor) => downcast_mut::<T>(ancestor),
        None => None,
    }
}

/// Fields every style has
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjStyle {
    /// Main (fill or text) color
    pub color: Color,
    /// Draw nothing for the body
    pub transp: bool,
}
impl_style!(ObjStyle);

impl ObjStyle {
    /// Opaque white body
    pub const fn plain() -> Self {
        Self {
            color: Color::WHITE,
            transp: false,
        }
    }

    /// Background of a screen
    pub const fn screen() -> Self {
        Self {
            color: Color::SILVER,
            transp: false,
        }
    }

    pub const fn transparent() -> Self {
        Self {
            color: Color::BLACK,
            transp: true,
        }
    }
}

/// Rectangle style: fill, border, corner radius and padding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RectStyle {
    pub obj: ObjStyle,
    /// Gradient color at the bottom; equal to `obj.color` for a flat fill
    pub gcolor: Color,
    pub bcolor: Color,
    pub bwidth: Coord,
    pub bopa: Opa,
    pub radius: Coord,
    /// Horizontal padding
    pub hpad: Coord,
    /// Vertical padding
    pub vpad: Coord,
    /// Padding between children
    pub opad: Coord,
    /// Draw only the border
    pub empty: bool,
}
impl_style!(RectStyle => obj);

impl RectStyle {
    /// Flat rectangle derived from a plain object style
    pub const fn from_obj(obj: ObjStyle) -> Self {
        Self {
            obj,
            gcolor: obj.color,
            bcolor: Color::BLACK,
            bwidth: 0,
            bopa: OPA_COVER,
            radius: 0,
            hpad: 0,
            vpad: 0,
            opad: 0,
            empty: false,
        }
    }

    pub const fn plain() -> Self {
        Self::from_obj(ObjStyle::plain())
    }

    pub const fn transparent() -> Self {
        Self::from_obj(ObjStyle::transparent())
    }

    /// Set both paddings
    pub const fn with_pad(mut self, hpad: Coord, vpad: Coord) -> Self {
        self.hpad = hpad;
        self.vpad = vpad;
        self
    }

    /// Set the border
    pub const fn with_border(mut self, color: Color, width: Coord) -> Self {
        self.bcolor = color;
        self.bwidth = width;
        self
    }

    pub const fn with_radius(mut self, radius: Coord) -> Self {
        self.radius = radius;
        self
    }

    /// Whether drawing this style fully covers its area
    pub fn is_opaque(&self) -> bool {
        !self.obj.transp && !self.empty && self.radius == 0
    }
}

/// Text style
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelStyle {
    pub obj: ObjStyle,
    pub font: FontId,
    pub letter_space: Coord,
    pub line_space: Coord,
    /// Center each line horizontally
    pub mid: bool,
}
impl_style!(LabelStyle => obj);

impl LabelStyle {
    /// Dark text on a transparent body
    pub const fn text() -> Self {
        Self {
            obj: ObjStyle {
                color: Color::BLACK,
                transp: true,
            },
            font: FontId(0),
            letter_space: 0,
            line_space: 2,
            mid: false,
        }
    }

    pub const fn with_font(mut self, font: FontId) -> Self {
        self.font = font;
        self
    }
}

struct StyleEntry {
    data: Box<dyn StyleData>,
    /// Node owning an isolated copy; `None` for shared records
    owner: Option<ObjId>,
}

/// Arena of style records
#[derive(Default)]
pub struct StyleStore {
    entries: SlotMap<StyleId, StyleEntry>,
}

impl StyleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared style record
    pub fn register<S: StyleData>(&mut self, style: S) -> StyleId {
        self.entries.insert(StyleEntry {
            data: Box::new(style),
            owner: None,
        })
    }

    pub fn contains(&self, id: StyleId) -> bool {
        self.entries.contains_key(id)
    }

    /// The raw record
    pub fn get(&self, id: StyleId) -> Option<&dyn StyleData> {
        self.entries.get(id).map(|e| e.data.as_ref())
    }

    /// The record viewed as family member `T`
    pub fn get_as<T: StyleData>(&self, id: StyleId) -> Option<&T> {
        self.entries
            .get(id)
            .and_then(|e| downcast_ref::<T>(e.data.as_ref()))
    }

    /// Node owning the record, if it is an isolated copy
    pub fn owner(&self, id: StyleId) -> Option<ObjId> {
        self.entries.get(id).and_then(|e| e.owner)
    }

    /// Number of records, shared and isolated
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn get_as_mut<T: StyleData>(&mut self, id: StyleId) -> Option<&mut T> {
        self.entries
            .get_mut(id)
            .and_then(|e| downcast_mut::<T>(e.data.as_mut()))
    }

    pub(crate) fn insert_isolated(&mut self, data: Box<dyn StyleData>, owner: ObjId) -> StyleId {
        self.entries.insert(StyleEntry {
            data,
            owner: Some(owner),
        })
    }

    pub(crate) fn clone_data(&self, id: StyleId) -> Option<Box<dyn StyleData>> {
        self.entries.get(id).map(|e| e.data.clone_style())
    }

    /// Free an isolated record owned by `owner`; shared records are kept
    pub(crate) fn release(&mut self, id: StyleId, owner: ObjId) {
        if self.owner(id) == Some(owner) {
            self.entries.remove(id);
        }
    }
}

impl ObjTree {
    /// The style store
    pub fn styles(&self) -> &StyleStore {
        &self.styles
    }

    /// Register a shared style record
    pub fn register_style<S: StyleData>(&mut self, style: S) -> StyleId {
        self.styles.register(style)
    }

    /// Style bound to a node
    pub fn style(&self, obj: ObjId) -> Option<StyleId> {
        self.objs.get(obj).map(|o| o.style)
    }

    /// The node's style viewed as family member `T`
    pub fn style_as<T: StyleData>(&self, obj: ObjId) -> Option<&T> {
        let id = self.objs.get(obj)?.style;
        self.styles.get_as::<T>(id)
    }

    /// Mutable access to the node's style, only for an isolated style
    ///
    /// Call [`refresh_style`](Self::refresh_style) after editing.
    pub fn style_as_mut<T: StyleData>(&mut self, obj: ObjId) -> Option<&mut T> {
        let id = self.objs.get(obj)?.style;
        if self.styles.owner(id) != Some(obj) {
            return None;
        }
        self.styles.get_as_mut::<T>(id)
    }

    /// Bind a style to a node and notify it
    ///
    /// An isolated style previously owned by the node is freed.
    pub fn set_style(&mut self, obj: ObjId, style: StyleId) {
        if !self.styles.contains(style) {
            warn!("set_style: unknown style {:?}", style);
            return;
        }
        let Some(o) = self.objs.get_mut(obj) else {
            return;
        };
        let old = o.style;
        o.style = style;
        o.flags.remove(ObjFlags::STYLE_ISO);
        if old != style {
            self.styles.release(old, obj);
        }
        self.refresh_style(obj);
    }

    /// Give a node its own copy of its current style
    pub fn isolate_style(&mut self, obj: ObjId) -> Option<StyleId> {
        let old = self.objs.get(obj)?.style;
        let data = self.styles.clone_data(old)?;
        let id = self.styles.insert_isolated(data, obj);
        if let Some(o) = self.objs.get_mut(obj) {
            o.style = id;
            o.flags.insert(ObjFlags::STYLE_ISO);
        }
        self.styles.release(old, obj);
        debug!("isolated style of {:?} as {:?}", obj, id);
        self.refresh_style(obj);
        Some(id)
    }

    /// Notify a node that its style changed and redraw it
    pub fn refresh_style(&mut self, obj: ObjId) {
        if !self.contains(obj) {
            return;
        }
        self.invalidate(obj);
        if self.send_signal(obj, Signal::StyleChanged).is_deleted() {
            return;
        }
        self.invalidate(obj);
    }

    /// Refresh every node bound to `style`, or every node when `None`
    pub fn refresh_style_all(&mut self, style: Option<StyleId>) {
        let mut matching = Vec::new();
        for &scr in &self.screens {
            self.collect_subtree(scr, &mut matching);
        }
        matching.retain(|&id| style.map_or(true, |s| self.objs[id].style == s));
        for id in matching {
            let still_bound = self
                .objs
                .get(id)
                .is_some_and(|o| style.map_or(true, |s| o.style == s));
            if still_bound {
                self.refresh_style(id);
            }
        }
    }

    /// Edit a shared style record and refresh every node bound to it
    pub fn edit_shared_style<T: StyleData>(&mut self, style: StyleId, edit: impl FnOnce(&mut T)) -> bool {
        if self.styles.owner(style).is_some() {
            warn!("edit_shared_style: {:?} is an isolated style", style);
            return false;
        }
        let Some(data) = self.styles.get_as_mut::<T>(style) else {
            return false;
        };
        edit(data);
        self.refresh_style_all(Some(style));
        true
    }
}
