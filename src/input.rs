use egui::{Context, Pos2, Rect};

use crate::engine::CanvasEngine;
use crate::error::CanvasResult;

/// Canvas-local pointer events fed to the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasInput {
    /// Primary button pressed inside the canvas
    Begin(Pos2),
    /// Pointer moved while pressed
    Update(Pos2),
    /// Drag finished, by release or by leaving the canvas
    End(Pos2),
    /// Pressed and released inside the canvas
    Click(Pos2),
}

/// One frame of primary-pointer state. egui reports touches the same way.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerSample {
    pub pos: Option<Pos2>,
    pub pressed: bool,
    pub released: bool,
}

impl PointerSample {
    pub fn from_context(ctx: &Context) -> Self {
        ctx.input(|input| Self {
            pos: input.pointer.latest_pos(),
            pressed: input.pointer.primary_pressed(),
            released: input.pointer.primary_released(),
        })
    }
}

/// Turns raw pointer samples into canvas events.
///
/// Leaving the canvas mid-drag ends the drag where the pointer crossed the
/// edge, so every drag resolves to a final coordinate.
#[derive(Debug)]
pub struct InputHandler {
    canvas_rect: Rect,
    dragging: bool,
    last_local: Pos2,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            canvas_rect,
            dragging: false,
            last_local: Pos2::ZERO,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn to_local(&self, pos: Pos2) -> Pos2 {
        (pos - self.canvas_rect.min).to_pos2()
    }

    fn clamped_local(&self, pos: Pos2) -> Pos2 {
        let size = self.canvas_rect.size();
        let local = self.to_local(pos);
        Pos2::new(local.x.clamp(0.0, size.x), local.y.clamp(0.0, size.y))
    }

    /// Process raw egui input and generate canvas events
    pub fn process_input(&mut self, ctx: &Context) -> Vec<CanvasInput> {
        self.handle(PointerSample::from_context(ctx))
    }

    pub fn handle(&mut self, sample: PointerSample) -> Vec<CanvasInput> {
        let mut events = Vec::new();
        let inside = sample.pos.filter(|pos| self.canvas_rect.contains(*pos));

        if sample.pressed {
            if let Some(pos) = inside {
                let local = self.to_local(pos);
                self.dragging = true;
                self.last_local = local;
                events.push(CanvasInput::Begin(local));
            }
        }

        if !self.dragging {
            return events;
        }

        match (sample.pos, inside) {
            (_, Some(pos)) => {
                let local = self.to_local(pos);
                if local != self.last_local {
                    self.last_local = local;
                    events.push(CanvasInput::Update(local));
                }
                if sample.released {
                    self.dragging = false;
                    events.push(CanvasInput::End(local));
                    events.push(CanvasInput::Click(local));
                }
            }
            (Some(outside), None) => {
                self.dragging = false;
                events.push(CanvasInput::End(self.clamped_local(outside)));
            }
            (None, None) => {
                self.dragging = false;
                events.push(CanvasInput::End(self.last_local));
            }
        }
        events
    }
}

/// Feed one event to the engine. Returns whether history was committed.
pub fn route(engine: &mut CanvasEngine, input: CanvasInput) -> CanvasResult<bool> {
    match input {
        CanvasInput::Begin(pos) => engine.begin(pos).map(|()| false),
        CanvasInput::Update(pos) => {
            engine.update(pos);
            Ok(false)
        }
        CanvasInput::End(pos) => engine.end(pos),
        CanvasInput::Click(pos) => engine.click(pos),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> InputHandler {
        InputHandler::new(Rect::from_min_size(Pos2::new(100.0, 50.0), egui::vec2(200.0, 100.0)))
    }

    fn at(x: f32, y: f32) -> PointerSample {
        PointerSample {
            pos: Some(Pos2::new(x, y)),
            ..Default::default()
        }
    }

    #[test]
    fn press_drag_release_inside() {
        let mut input = handler();
        let down = input.handle(PointerSample { pressed: true, ..at(110.0, 60.0) });
        assert_eq!(down, vec![CanvasInput::Begin(Pos2::new(10.0, 10.0))]);

        let moved = input.handle(at(120.0, 70.0));
        assert_eq!(moved, vec![CanvasInput::Update(Pos2::new(20.0, 20.0))]);

        let up = input.handle(PointerSample { released: true, ..at(120.0, 70.0) });
        assert_eq!(
            up,
            vec![
                CanvasInput::End(Pos2::new(20.0, 20.0)),
                CanvasInput::Click(Pos2::new(20.0, 20.0)),
            ]
        );
        assert!(!input.is_dragging());
    }

    #[test]
    fn leaving_the_canvas_ends_at_the_edge() {
        let mut input = handler();
        input.handle(PointerSample { pressed: true, ..at(150.0, 100.0) });
        let left = input.handle(at(400.0, 120.0));
        assert_eq!(left, vec![CanvasInput::End(Pos2::new(200.0, 70.0))]);

        // Releasing later outside produces nothing more
        assert!(input.handle(PointerSample { released: true, ..at(400.0, 120.0) }).is_empty());
    }

    #[test]
    fn lost_pointer_ends_at_last_position() {
        let mut input = handler();
        input.handle(PointerSample { pressed: true, ..at(150.0, 100.0) });
        input.handle(at(160.0, 90.0));
        let gone = input.handle(PointerSample::default());
        assert_eq!(gone, vec![CanvasInput::End(Pos2::new(60.0, 40.0))]);
    }

    #[test]
    fn presses_outside_are_ignored() {
        let mut input = handler();
        assert!(input.handle(PointerSample { pressed: true, ..at(10.0, 10.0) }).is_empty());
        assert!(input.handle(at(150.0, 100.0)).is_empty());
    }
}
