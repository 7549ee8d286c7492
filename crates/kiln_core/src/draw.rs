//! Drawing primitives
//!
//! Objects draw through the [`Painter`] trait; a display backend implements
//! it to rasterize. [`RecordingPainter`] captures the calls as
//! [`DrawCommand`]s for inspection.

use crate::geom::Area;
use crate::style::{LabelStyle, Opa, RectStyle};

/// Sink for draw calls
///
/// `mask` is the clip rectangle; nothing outside it may be touched.
pub trait Painter {
    /// Fill and stroke a rectangle
    fn draw_rect(&mut self, area: &Area, mask: &Area, style: &RectStyle, opa: Opa);

    /// Draw a text inside `area`
    fn draw_label(&mut self, area: &Area, mask: &Area, style: &LabelStyle, opa: Opa, text: &str);
}

/// A recorded draw call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Rect {
        area: Area,
        mask: Area,
        style: RectStyle,
        opa: Opa,
    },
    Label {
        area: Area,
        mask: Area,
        style: LabelStyle,
        opa: Opa,
        text: String,
    },
}

impl DrawCommand {
    /// Area the command draws into
    pub fn area(&self) -> Area {
        match self {
            DrawCommand::Rect { area, .. } | DrawCommand::Label { area, .. } => *area,
        }
    }
}

/// Painter that records commands instead of rasterizing
#[derive(Debug, Default)]
pub struct RecordingPainter {
    commands: Vec<DrawCommand>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the painter empty
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Painter for RecordingPainter {
    fn draw_rect(&mut self, area: &Area, mask: &Area, style: &RectStyle, opa: Opa) {
        self.commands.push(DrawCommand::Rect {
            area: *area,
            mask: *mask,
            style: *style,
            opa,
        });
    }

    fn draw_label(&mut self, area: &Area, mask: &Area, style: &LabelStyle, opa: Opa, text: &str) {
        self.commands.push(DrawCommand::Label {
            area: *area,
            mask: *mask,
            style: *style,
            opa,
            text: text.to_string(),
        });
    }
}
