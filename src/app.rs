use egui::{TextureHandle, TextureOptions};
use futures::channel::oneshot;
use serde::{Deserialize, Serialize};

use crate::config::CanvasConfig;
use crate::engine::CanvasEngine;
use crate::error::CanvasResult;
use crate::input::{self, InputHandler};
use crate::panels::{central_panel, tools_panel};
use crate::snapshot::{RestoreTicket, RestoredSurface};
use crate::tools::ToolKind;
use crate::{color, command::Submission};

/// Tool choices restored when the app restarts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct PersistedSettings {
    tool: ToolKind,
    color: String,
    line_width: u32,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        let config = CanvasConfig::default();
        Self {
            tool: ToolKind::default(),
            color: config.color,
            line_width: config.line_width,
        }
    }
}

/// Desktop host for a single drawing canvas
pub struct ArtflowApp {
    config: CanvasConfig,
    engine: CanvasEngine,
    input: InputHandler,
    texture: Option<TextureHandle>,
    uploaded_revision: Option<u64>,
    /// Undo/redo decodes running on worker threads
    pending_restores: Vec<oneshot::Receiver<RestoredSurface>>,
    status: Option<String>,
}

impl ArtflowApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: CanvasConfig) -> CanvasResult<Self> {
        let settings: PersistedSettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        let mut engine = CanvasEngine::new(&config)?;
        engine.select_tool(settings.tool)?;
        if let Err(err) = engine.set_color(&settings.color) {
            log::warn!("Ignoring saved color: {err}");
        }
        if let Err(err) = engine.set_line_width(settings.line_width) {
            log::warn!("Ignoring saved line width: {err}");
        }

        Ok(Self {
            config,
            engine,
            input: InputHandler::new(egui::Rect::NOTHING),
            texture: None,
            uploaded_revision: None,
            pending_restores: Vec::new(),
            status: None,
        })
    }

    pub fn engine(&self) -> &CanvasEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut CanvasEngine {
        &mut self.engine
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub(crate) fn report<T>(&mut self, result: CanvasResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("Canvas operation failed: {err}");
                self.status = Some(err.to_string());
                None
            }
        }
    }

    pub fn undo(&mut self) {
        if let Some(ticket) = self.engine.undo() {
            self.spawn_restore(ticket);
        }
    }

    pub fn redo(&mut self) {
        if let Some(ticket) = self.engine.redo() {
            self.spawn_restore(ticket);
        }
    }

    /// Start a fresh drawing phase with a new engine at the current size
    pub fn new_round(&mut self) {
        let (width, height) = self.engine.surface().dimensions();
        let config = CanvasConfig {
            width,
            height,
            color: color::to_hex(self.engine.color()),
            line_width: self.engine.line_width(),
            ..self.config.clone()
        };
        let tool = self.engine.tool();
        let started = CanvasEngine::new(&config).and_then(|mut engine| {
            engine.select_tool(tool)?;
            Ok(engine)
        });
        if let Some(engine) = self.report(started) {
            self.engine = engine;
            self.pending_restores.clear();
            self.uploaded_revision = None;
            self.status = None;
        }
    }

    /// Serialize the `submit_drawing` message and put it on the clipboard
    pub fn submit(&mut self, ctx: &egui::Context) {
        let message = self
            .engine
            .submission()
            .and_then(|msg: Submission| Ok(serde_json::to_string(&msg)?));
        if let Some(json) = self.report(message) {
            log::info!("Drawing submitted ({} bytes)", json.len());
            ctx.copy_text(json);
            self.status = Some("Drawing copied to clipboard".to_owned());
        }
    }

    fn spawn_restore(&mut self, ticket: RestoreTicket) {
        let (tx, rx) = oneshot::channel();
        std::thread::spawn(move || {
            let restored = futures::executor::block_on(ticket.decode());
            // The receiver is gone when a new round started meanwhile
            let _ = tx.send(restored);
        });
        self.pending_restores.push(rx);
    }

    fn poll_restores(&mut self) {
        let mut ready = Vec::new();
        self.pending_restores.retain_mut(|rx| match rx.try_recv() {
            Ok(Some(restored)) => {
                ready.push(restored);
                false
            }
            Ok(None) => true,
            Err(_) => false,
        });
        for restored in ready {
            self.engine.apply_restore(restored);
        }
    }

    pub(crate) fn has_pending_restores(&self) -> bool {
        !self.pending_restores.is_empty()
    }

    /// Follow the panel size and route this frame's pointer input
    pub(crate) fn handle_canvas_input(&mut self, ctx: &egui::Context, available: egui::Rect) -> egui::Rect {
        let width = available.width().floor().max(0.0) as u32;
        let height = available.height().floor().max(0.0) as u32;
        let resized = self.engine.resize(width, height);
        self.report(resized);

        let (w, h) = self.engine.surface().dimensions();
        let canvas_rect = egui::Rect::from_min_size(available.min, egui::vec2(w as f32, h as f32));
        self.input.set_canvas_rect(canvas_rect);

        for event in self.input.process_input(ctx) {
            let routed = input::route(&mut self.engine, event);
            self.report(routed);
        }
        canvas_rect
    }

    /// The surface as a texture, re-uploaded only when pixels changed
    pub(crate) fn canvas_texture(&mut self, ctx: &egui::Context) -> &TextureHandle {
        let surface = self.engine.surface();
        let revision = surface.revision();
        let stale = self.uploaded_revision != Some(revision);
        let texture = self.texture.get_or_insert_with(|| {
            ctx.load_texture("artflow-canvas", surface.to_color_image(), TextureOptions::NEAREST)
        });
        if stale {
            texture.set(surface.to_color_image(), TextureOptions::NEAREST);
            self.uploaded_revision = Some(revision);
        }
        texture
    }
}

impl eframe::App for ArtflowApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            tool: self.engine.tool(),
            color: color::to_hex(self.engine.color()),
            line_width: self.engine.line_width(),
        };
        eframe::set_value(storage, eframe::APP_KEY, &settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_restores();

        tools_panel(self, ctx);
        central_panel(self, ctx);

        if self.has_pending_restores() {
            ctx.request_repaint();
        }
    }
}
