//! Kiln Widgets
//!
//! Widgets built on the [`kiln_core`] object tree:
//!
//! - [`label`]: text with expanding or wrapping layout
//! - [`page`]: container with a scrollable part and scrollbars
//! - [`text_area`]: editable, scrolling text with a blinking cursor
//!
//! Every widget is a plain tree node with a widget extension and extra
//! signal/design layers. Factories take the [`Theme`] installed in the tree.
//!
//! # Example
//!
//! ```rust
//! use kiln_core::ObjTree;
//! use kiln_widgets::{text_area, Theme, WidgetConfig};
//!
//! let config = WidgetConfig::default();
//! let mut tree = ObjTree::new(config.display.clone());
//! let theme = Theme::install(&mut tree, &config);
//!
//! let scr = tree.create(None, None).unwrap();
//! let ta = text_area::create(&mut tree, &theme, Some(scr), None).unwrap();
//! text_area::set_text(&mut tree, ta, "Hello");
//! text_area::set_cursor_pos(&mut tree, ta, -1);
//! text_area::add_char(&mut tree, ta, '!');
//!
//! assert_eq!(text_area::text(&tree, ta), Some("Hell!o"));
//! assert_eq!(text_area::cursor_pos(&tree, ta), 5);
//! ```

pub mod config;
pub mod label;
pub mod page;
pub mod text_area;
pub mod theme;

pub use config::{TextAreaConfig, WidgetConfig};
pub use label::{LabelExt, LongMode};
pub use page::{PageExt, PageStyle, ScrollbarMode};
pub use text_area::{EditOutcome, RejectReason, TextAreaExt, TextAreaStyle, CURSOR_LAST};
pub use theme::{TextAreaStyleKind, Theme};
