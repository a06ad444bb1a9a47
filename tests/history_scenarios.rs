use artflow_canvas::{CanvasConfig, CanvasEngine, CanvasError, RestoredSurface, ToolKind};
use egui::Pos2;
use image::{Rgba, RgbaImage};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

fn create_test_engine() -> CanvasEngine {
    let config = CanvasConfig {
        width: 40,
        height: 40,
        ..CanvasConfig::default()
    };
    CanvasEngine::new(&config).unwrap()
}

fn pixels(engine: &CanvasEngine) -> RgbaImage {
    engine.surface().pixels().clone()
}

fn pen_stroke(engine: &mut CanvasEngine, from: Pos2, to: Pos2) {
    engine.select_tool(ToolKind::Pen).unwrap();
    engine.begin(from).unwrap();
    engine.update(to);
    assert!(engine.end(to).unwrap());
}

fn rect_drag(engine: &mut CanvasEngine, from: Pos2, to: Pos2) {
    engine.select_tool(ToolKind::Rectangle).unwrap();
    engine.begin(from).unwrap();
    engine.update(to);
    assert!(engine.end(to).unwrap());
}

#[test]
fn test_pen_rect_undo_redo_scenario() {
    let mut engine = create_test_engine();
    let s0 = pixels(&engine);
    assert!(!engine.can_undo());

    pen_stroke(&mut engine, Pos2::new(5.0, 5.0), Pos2::new(30.0, 5.0));
    let s1 = pixels(&engine);
    assert_ne!(s0, s1);
    assert_eq!(engine.surface().pixel(15, 5).unwrap(), BLACK);

    rect_drag(&mut engine, Pos2::new(10.0, 15.0), Pos2::new(30.0, 35.0));
    let s2 = pixels(&engine);
    assert_ne!(s1, s2);
    assert_eq!(engine.history().undo_depth(), 3);

    assert!(engine.undo_now());
    assert_eq!(pixels(&engine), s1);

    assert!(engine.undo_now());
    assert_eq!(pixels(&engine), s0);

    // Only the blank state remains
    assert!(!engine.undo_now());
    assert_eq!(pixels(&engine), s0);

    assert!(engine.redo_now());
    assert_eq!(pixels(&engine), s1);
    assert!(engine.redo_now());
    assert_eq!(pixels(&engine), s2);
    assert!(!engine.redo_now());
}

#[test]
fn test_undo_walks_back_to_blank_then_stops() {
    let mut engine = create_test_engine();
    let blank = pixels(&engine);

    let strokes = 5;
    for i in 0..strokes {
        let y = 4.0 + 6.0 * i as f32;
        pen_stroke(&mut engine, Pos2::new(2.0, y), Pos2::new(38.0, y));
    }
    assert_eq!(engine.history().undo_depth(), strokes + 1);

    for _ in 0..strokes {
        assert!(engine.undo_now());
    }
    assert_eq!(pixels(&engine), blank);
    assert!(!engine.can_undo());
    assert!(engine.undo().is_none());
    assert_eq!(engine.history().redo_depth(), strokes);
}

#[test]
fn test_commit_after_undo_clears_redo() {
    let mut engine = create_test_engine();
    pen_stroke(&mut engine, Pos2::new(5.0, 5.0), Pos2::new(30.0, 5.0));
    pen_stroke(&mut engine, Pos2::new(5.0, 20.0), Pos2::new(30.0, 20.0));

    assert!(engine.undo_now());
    assert!(engine.can_redo());

    pen_stroke(&mut engine, Pos2::new(5.0, 30.0), Pos2::new(30.0, 30.0));
    assert!(!engine.can_redo());
    assert!(engine.redo().is_none());
    // The undone stroke stays gone
    assert_eq!(engine.surface().pixel(15, 20).unwrap(), WHITE);
    assert_eq!(engine.surface().pixel(15, 30).unwrap(), BLACK);
}

#[test]
fn test_history_capacity_evicts_oldest() {
    let config = CanvasConfig {
        width: 40,
        height: 40,
        history_capacity: 3,
        ..CanvasConfig::default()
    };
    let mut engine = CanvasEngine::new(&config).unwrap();
    for i in 0..5 {
        let y = 4.0 + 6.0 * i as f32;
        pen_stroke(&mut engine, Pos2::new(2.0, y), Pos2::new(38.0, y));
    }
    assert_eq!(engine.history().undo_depth(), 3);

    assert!(engine.undo_now());
    assert!(engine.undo_now());
    assert!(!engine.undo_now());
    // The oldest kept state still has the first three strokes
    assert_eq!(engine.surface().pixel(20, 4).unwrap(), BLACK);
    assert_eq!(engine.surface().pixel(20, 16).unwrap(), BLACK);
    assert_eq!(engine.surface().pixel(20, 22).unwrap(), WHITE);
}

#[test]
fn test_latest_restore_wins() {
    let mut engine = create_test_engine();
    let blank = pixels(&engine);
    pen_stroke(&mut engine, Pos2::new(5.0, 5.0), Pos2::new(30.0, 5.0));
    pen_stroke(&mut engine, Pos2::new(5.0, 20.0), Pos2::new(30.0, 20.0));

    let first = engine.undo().unwrap();
    let second = engine.undo().unwrap();
    assert!(second.seq() > first.seq());

    // Decodes finish out of order
    let second = futures::executor::block_on(second.decode());
    let first = futures::executor::block_on(first.decode());
    assert!(engine.apply_restore(second));
    assert_eq!(pixels(&engine), blank);

    assert!(!engine.apply_restore(first));
    assert_eq!(pixels(&engine), blank);
}

#[test]
fn test_restore_is_dropped_after_a_new_commit() {
    let mut engine = create_test_engine();
    pen_stroke(&mut engine, Pos2::new(5.0, 5.0), Pos2::new(30.0, 5.0));

    let ticket = engine.undo().unwrap();
    pen_stroke(&mut engine, Pos2::new(5.0, 20.0), Pos2::new(30.0, 20.0));
    let drawn = pixels(&engine);

    let restored = futures::executor::block_on(ticket.decode());
    assert!(!engine.apply_restore(restored));
    assert_eq!(pixels(&engine), drawn);
}

#[test]
fn test_failed_decode_leaves_surface_unchanged() {
    let mut engine = create_test_engine();
    pen_stroke(&mut engine, Pos2::new(5.0, 5.0), Pos2::new(30.0, 5.0));
    let drawn = pixels(&engine);

    let ticket = engine.undo().unwrap();
    let restored = RestoredSurface {
        seq: ticket.seq(),
        reason: ticket.reason(),
        pixels: Err(CanvasError::InvalidDataUrl("corrupt".to_owned())),
    };
    assert!(!engine.apply_restore(restored));
    assert_eq!(pixels(&engine), drawn);
    // The stacks already moved
    assert!(engine.can_redo());
}

#[test]
fn test_clear_restarts_history() {
    let mut engine = create_test_engine();
    let blank = pixels(&engine);
    pen_stroke(&mut engine, Pos2::new(5.0, 5.0), Pos2::new(30.0, 5.0));
    pen_stroke(&mut engine, Pos2::new(5.0, 20.0), Pos2::new(30.0, 20.0));
    assert!(engine.undo_now());

    engine.clear().unwrap();
    assert_eq!(pixels(&engine), blank);
    assert!(!engine.can_undo());
    assert!(!engine.can_redo());
}
