use egui::Pos2;
use image::RgbaImage;

use crate::stroke::{PaintState, stroke_circle, stroke_rect, stroke_segment};
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Circle,
}

/// Rasterize a shape dragged from `anchor` to `to`.
///
/// Returns false for degenerate geometry, which is skipped silently.
pub fn draw_shape(kind: ShapeKind, pixels: &mut RgbaImage, anchor: Pos2, to: Pos2, paint: &PaintState) -> bool {
    match kind {
        ShapeKind::Line => {
            if anchor == to {
                return false;
            }
            stroke_segment(pixels, anchor, to, paint);
            true
        }
        ShapeKind::Rectangle => stroke_rect(pixels, anchor, to, paint),
        ShapeKind::Circle => stroke_circle(pixels, anchor, anchor.distance(to), paint),
    }
}

/// A line, rectangle or circle being dragged out.
///
/// The draft keeps the pixels from before the drag began. Every redraw
/// puts them back before drawing the shape at its new extent, so exactly
/// one speculative shape is ever visible.
#[derive(Debug, Clone)]
pub struct ShapeDraft {
    kind: ShapeKind,
    anchor: Pos2,
    preview: RgbaImage,
}

impl ShapeDraft {
    pub fn begin(kind: ShapeKind, anchor: Pos2, surface: &Surface) -> Self {
        Self {
            kind,
            anchor,
            preview: surface.pixels().clone(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Restore the pre-drag pixels, then draw the shape up to `to`
    pub fn redraw(&self, surface: &mut Surface, to: Pos2) -> bool {
        self.restore(surface);
        let (kind, anchor) = (self.kind, self.anchor);
        surface.draw(|pixels, paint| draw_shape(kind, pixels, anchor, to, paint))
    }

    /// Put back the pixels from before the drag
    pub fn restore(&self, surface: &mut Surface) {
        surface.put_image(&self.preview);
    }
}
