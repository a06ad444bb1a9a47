use egui::Pos2;

use crate::stroke::stroke_segment;
use crate::surface::Surface;

/// An open pen or eraser path.
///
/// Each move strokes one segment straight onto the surface; there is no
/// preview and nothing to undo until the path is closed.
#[derive(Debug, Clone)]
pub struct FreehandPath {
    last: Pos2,
    painted: bool,
}

impl FreehandPath {
    pub fn begin(at: Pos2) -> Self {
        Self {
            last: at,
            painted: false,
        }
    }

    /// Extend the path to `to`, stroking the new segment
    pub fn extend(&mut self, surface: &mut Surface, to: Pos2) {
        let from = self.last;
        surface.draw(|pixels, paint| stroke_segment(pixels, from, to, paint));
        self.last = to;
        self.painted = true;
    }

    /// Whether any segment reached the surface
    pub fn painted(&self) -> bool {
        self.painted
    }
}
