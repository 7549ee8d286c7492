//! Kiln Core
//!
//! Retained object tree for small displays: nodes with absolute coordinates,
//! layered signal and design handlers, an invalid area producer, shared and
//! isolated styles, widget extension records and periodic timers.
//!
//! # Example
//!
//! ```rust
//! use kiln_core::prelude::*;
//!
//! let mut tree = ObjTree::new(DisplayConfig::standard());
//! let scr = tree.create(None, None).unwrap();
//! let panel = tree.create(Some(scr), None).unwrap();
//! tree.set_size(panel, 100, 40);
//! tree.align(panel, None, Align::Center, 0, 0);
//!
//! assert_eq!(tree.coords(panel), Some(Area::new(190, 140, 289, 179)));
//! assert!(!tree.take_invalid().is_empty());
//! ```

pub mod config;
pub mod draw;
pub mod error;
pub mod ext;
pub mod font;
pub mod geom;
pub mod invalidate;
pub mod obj;
pub mod signal;
pub mod style;
pub mod text;
pub mod timer;
pub mod tree;

pub use config::{DisplayConfig, FontConfig};
pub use draw::{DrawCommand, Painter, RecordingPainter};
pub use error::{ObjError, Result};
pub use ext::Extension;
pub use font::{FixedFont, Font, FontId, FontRegistry};
pub use geom::{Area, Coord, Point};
pub use invalidate::InvalidAreas;
pub use obj::{Obj, ObjFlags, ObjId, Protect};
pub use signal::{DesignFn, DesignMode, Signal, SignalFn, Validity};
pub use style::{
    Color, LabelStyle, ObjStyle, Opa, RectStyle, StyleData, StyleId, StyleStore, OPA_50, OPA_COVER,
    OPA_TRANSP,
};
pub use text::TextMetrics;
pub use timer::{TimerFn, TimerId};
pub use tree::{Align, ObjTree};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::DisplayConfig;
    pub use crate::draw::{DrawCommand, Painter, RecordingPainter};
    pub use crate::error::{ObjError, Result};
    pub use crate::geom::{Area, Coord, Point};
    pub use crate::obj::{ObjFlags, ObjId, Protect};
    pub use crate::signal::{DesignMode, Signal, Validity};
    pub use crate::style::{Color, LabelStyle, ObjStyle, RectStyle, StyleId};
    pub use crate::tree::{Align, ObjTree};
}
