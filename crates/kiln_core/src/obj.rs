//! Object nodes
//!
//! An [`Obj`] is one node of the [`ObjTree`](crate::ObjTree). Coordinates are
//! stored in absolute screen pixels; the public position setters take values
//! relative to the parent.

use std::any::Any;

use bitflags::bitflags;
use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::ext::Extension;
use crate::geom::{Area, Coord};
use crate::signal::{DesignFn, SignalFn};
use crate::style::{Opa, StyleId, OPA_COVER};

new_key_type! {
    /// Handle to a node of an [`ObjTree`](crate::ObjTree)
    ///
    /// Handles of deleted nodes are never reused for live nodes.
    pub struct ObjId;
}

bitflags! {
    /// Behavior switches of a node
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ObjFlags: u8 {
        /// Receives press events
        const CLICK = 1 << 0;
        /// Can be dragged
        const DRAG = 1 << 1;
        /// Keeps moving after a drag is released
        const DRAG_THROW = 1 << 2;
        /// Dragging moves the parent instead
        const DRAG_PARENT = 1 << 3;
        /// Bound to its own copy of a style
        const STYLE_ISO = 1 << 4;
        /// Neither drawn nor invalidated
        const HIDDEN = 1 << 5;
        /// Raised to the foreground when pressed
        const TOP = 1 << 6;
    }
}

bitflags! {
    /// Operations the tree must not apply to a node automatically
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Protect: u8 {
        /// Do not notify the parent when this node changes
        const CHILD_CHG = 1 << 0;
        /// Keep the opacity when the parent's is set recursively
        const OPA = 1 << 1;
        /// Do not let the parent adopt this node somewhere else
        const PARENT = 1 << 2;
        /// Do not reposition automatically
        const POS = 1 << 3;
    }
}

/// A node of the object tree
pub struct Obj {
    pub(crate) parent: Option<ObjId>,
    /// Children in z-order, the last one is on top
    pub(crate) children: SmallVec<[ObjId; 4]>,
    pub(crate) coords: Area,
    /// Specialization layers, most generic first
    pub(crate) signal_layers: SmallVec<[SignalFn; 4]>,
    pub(crate) design_layers: SmallVec<[DesignFn; 4]>,
    pub(crate) ext: Option<Box<dyn Extension>>,
    pub(crate) style: StyleId,
    pub(crate) flags: ObjFlags,
    pub(crate) protect: Protect,
    /// Extra drawn margin around `coords`
    pub(crate) ext_size: Coord,
    pub(crate) opa: Opa,
    pub(crate) free_num: u8,
    pub(crate) app_data: Option<Box<dyn Any>>,
}

impl Obj {
    pub(crate) fn new(parent: Option<ObjId>, coords: Area, style: StyleId) -> Self {
        Self {
            parent,
            children: SmallVec::new(),
            coords,
            signal_layers: SmallVec::new(),
            design_layers: SmallVec::new(),
            ext: None,
            style,
            flags: ObjFlags::CLICK,
            protect: Protect::empty(),
            ext_size: 0,
            opa: OPA_COVER,
            free_num: 0,
            app_data: None,
        }
    }

    pub fn parent(&self) -> Option<ObjId> {
        self.parent
    }

    pub fn children(&self) -> &[ObjId] {
        &self.children
    }

    /// Absolute coordinates
    pub fn coords(&self) -> Area {
        self.coords
    }

    pub fn flags(&self) -> ObjFlags {
        self.flags
    }

    pub fn protect(&self) -> Protect {
        self.protect
    }

    pub fn ext_size(&self) -> Coord {
        self.ext_size
    }

    pub fn opa(&self) -> Opa {
        self.opa
    }

    /// Area touched when drawing: coordinates grown by the extra size
    pub fn draw_area(&self) -> Area {
        self.coords.expanded(self.ext_size)
    }
}

impl std::fmt::Debug for Obj {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Obj")
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("coords", &self.coords)
            .field("flags", &self.flags)
            .field("protect", &self.protect)
            .field("layers", &self.signal_layers.len())
            .finish_non_exhaustive()
    }
}
