//! Signal and design dispatch
//!
//! Every node runs the base object handler first, then each specialization
//! layer in the order it was added (generic to specific). A widget adds its
//! layer with [`ObjTree::extend_signal`] / [`ObjTree::extend_design`] after
//! creating the node of the widget it is built on.
//!
//! Signal handlers may mutate the tree, including deleting the node they
//! run for. Dispatch stops as soon as a handler reports
//! [`Validity::Deleted`] or the node is gone, and the caller sees
//! `Deleted` and must not touch the node again.

use tracing::trace;

use crate::draw::Painter;
use crate::geom::Area;
use crate::obj::{ObjFlags, ObjId};
use crate::style::{ObjStyle, RectStyle};
use crate::tree::ObjTree;

/// Notifications delivered to a node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// The node is about to be deleted; release resources
    Cleanup,
    Pressed,
    Pressing,
    PressLost,
    Released,
    LongPress,
    LongPressRepeat,
    DragBegin,
    DragEnd,
    /// A child was added (`Some`) or removed (`None`)
    ChildChanged(Option<ObjId>),
    /// The node moved or resized; carries the previous coordinates
    CoordChanged(Area),
    StyleChanged,
    /// Recompute the extra drawn size
    RefreshExtSize,
}

/// Whether the node survived a signal
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Deleted,
}

impl Validity {
    pub fn is_valid(self) -> bool {
        self == Validity::Valid
    }

    pub fn is_deleted(self) -> bool {
        self == Validity::Deleted
    }
}

/// Phase of a design call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DesignMode {
    /// Draw the body, before the children
    DrawMain,
    /// Draw on top of the children
    DrawPost,
    /// Report whether the node fully covers the mask
    CoverCheck,
}

/// Signal handler layer
pub type SignalFn = fn(&mut ObjTree, ObjId, &Signal) -> Validity;

/// Design layer
///
/// The last argument is the result of the less specific layers, so a layer
/// can refine a cover check instead of recomputing it. The return value is
/// the cover answer for [`DesignMode::CoverCheck`] and ignored otherwise.
pub type DesignFn = fn(&ObjTree, ObjId, &Area, DesignMode, &mut dyn Painter, bool) -> bool;

impl ObjTree {
    /// Add a signal layer on top of the node's existing ones
    pub fn extend_signal(&mut self, obj: ObjId, layer: SignalFn) {
        if let Some(o) = self.objs.get_mut(obj) {
            o.signal_layers.push(layer);
        }
    }

    /// Add a design layer on top of the node's existing ones
    pub fn extend_design(&mut self, obj: ObjId, layer: DesignFn) {
        if let Some(o) = self.objs.get_mut(obj) {
            o.design_layers.push(layer);
        }
    }

    /// Number of specialization layers (excluding the base handler)
    pub fn signal_depth(&self, obj: ObjId) -> usize {
        self.objs.get(obj).map_or(0, |o| o.signal_layers.len())
    }

    /// Deliver a signal through the node's full handler chain
    pub fn send_signal(&mut self, obj: ObjId, signal: Signal) -> Validity {
        let Some(o) = self.objs.get(obj) else {
            return Validity::Deleted;
        };
        let layers = o.signal_layers.clone();
        trace!("signal {:?} -> {:?} ({} layers)", signal, obj, layers.len());

        if base_signal(self, obj, &signal).is_deleted() || !self.contains(obj) {
            return Validity::Deleted;
        }
        for layer in layers {
            if layer(self, obj, &signal).is_deleted() || !self.contains(obj) {
                return Validity::Deleted;
            }
        }
        Validity::Valid
    }

    /// Run the node's design chain for one phase
    pub fn design(&self, obj: ObjId, mask: &Area, mode: DesignMode, painter: &mut dyn Painter) -> bool {
        let Some(o) = self.objs.get(obj) else {
            return false;
        };
        let mut result = base_design(self, obj, mask, mode, painter, false);
        for layer in o.design_layers.iter() {
            result = layer(self, obj, mask, mode, painter, result);
        }
        result
    }

    /// Draw a node and its visible subtree into `mask`
    ///
    /// Children are clipped to their parent's coordinates and drawn in
    /// z-order between the parent's main and post phases.
    pub fn draw(&self, obj: ObjId, mask: &Area, painter: &mut dyn Painter) {
        let Some(o) = self.objs.get(obj) else {
            return;
        };
        if o.flags.contains(ObjFlags::HIDDEN) {
            return;
        }
        let Some(clip) = o.draw_area().intersect(mask) else {
            return;
        };
        self.design(obj, &clip, DesignMode::DrawMain, painter);
        if let Some(child_mask) = o.coords.intersect(mask) {
            for &child in o.children.iter() {
                self.draw(child, &child_mask, painter);
            }
        }
        self.design(obj, &clip, DesignMode::DrawPost, painter);
    }

    /// Draw the active screen into `mask`
    pub fn draw_active_screen(&self, mask: &Area, painter: &mut dyn Painter) {
        if let Some(scr) = self.active_screen() {
            self.draw(scr, mask, painter);
        }
    }
}

fn base_signal(tree: &mut ObjTree, obj: ObjId, signal: &Signal) -> Validity {
    if let Signal::Pressed = signal {
        let mut cur = Some(obj);
        while let Some(id) = cur {
            if tree.flags(id).contains(ObjFlags::TOP) {
                tree.move_foreground(id);
                break;
            }
            cur = tree.parent(id);
        }
    }
    Validity::Valid
}

fn base_design(
    tree: &ObjTree,
    obj: ObjId,
    mask: &Area,
    mode: DesignMode,
    painter: &mut dyn Painter,
    _inherited: bool,
) -> bool {
    let Some(o) = tree.get(obj) else {
        return false;
    };
    let rect = match tree.style_as::<RectStyle>(obj) {
        Some(rect) => *rect,
        None => RectStyle::from_obj(tree.style_as::<ObjStyle>(obj).copied().unwrap_or(ObjStyle::plain())),
    };
    match mode {
        DesignMode::CoverCheck => rect.is_opaque() && o.opa() == crate::style::OPA_COVER && o.coords().includes(mask),
        DesignMode::DrawMain => {
            if !rect.obj.transp {
                painter.draw_rect(&o.coords(), mask, &rect, o.opa());
            }
            true
        }
        DesignMode::DrawPost => true,
    }
}
