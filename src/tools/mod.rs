use std::fmt;
use std::str::FromStr;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::CanvasError;
use crate::stroke::{Composite, PaintState};

mod draw_stroke_tool;
mod shape_tool;

pub use draw_stroke_tool::FreehandPath;
pub use shape_tool::{ShapeDraft, ShapeKind, draw_shape};

/// The drawing tools offered to the player. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
    Fill,
    Line,
    Rectangle,
    Circle,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Pen,
        ToolKind::Eraser,
        ToolKind::Fill,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Circle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Eraser => "eraser",
            ToolKind::Fill => "fill",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
        }
    }

    /// The shape drawn by drag tools
    pub fn shape(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Circle => Some(ShapeKind::Circle),
            _ => None,
        }
    }

    /// Pen and eraser paint continuously while dragging
    pub fn is_freehand(self) -> bool {
        matches!(self, ToolKind::Pen | ToolKind::Eraser)
    }

    /// Write this tool's attributes into the surface paint state.
    ///
    /// Fill reads the color when it fills and only resets composition;
    /// the eraser keeps whatever color is set and removes pixels instead.
    pub fn apply_attributes(self, paint: &mut PaintState, color: Color32, line_width: u32) {
        match self {
            ToolKind::Pen | ToolKind::Line | ToolKind::Rectangle | ToolKind::Circle => {
                paint.color = color;
                paint.line_width = line_width as f32;
                paint.composite = Composite::SourceOver;
            }
            ToolKind::Eraser => {
                paint.line_width = line_width as f32;
                paint.composite = Composite::DestinationOut;
            }
            ToolKind::Fill => {
                paint.composite = Composite::SourceOver;
            }
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|tool| tool.name() == s)
            .ok_or_else(|| CanvasError::UnknownTool(s.to_owned()))
    }
}

/// Transient state of a drag in progress
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Freehand(FreehandPath),
    Shape(ShapeDraft),
}
