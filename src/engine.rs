use egui::{Color32, Pos2};
use image::imageops::{self, FilterType};
use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::color;
use crate::command::{Command, History, Submission};
use crate::config::CanvasConfig;
use crate::error::{CanvasError, CanvasResult};
use crate::fill::flood_fill;
use crate::snapshot::{RestoreReason, RestoreTicket, RestoredSurface, Snapshot};
use crate::surface::{self, Surface};
use crate::tools::{FreehandPath, Gesture, ShapeDraft, ToolKind};

/// The drawing canvas of one drawing phase.
///
/// Owns the surface, the tool state and the undo/redo history; they are
/// created together and dropped together. All operations run to
/// completion on the caller's thread.
#[derive(Debug)]
pub struct CanvasEngine {
    session: Uuid,
    surface: Surface,
    tool: ToolKind,
    color: Color32,
    line_width: u32,
    gesture: Gesture,
    history: History,
    /// Advanced by every commit and restore request. Restores carrying an
    /// older value arrive after something newer and are dropped.
    generation: u64,
}

impl CanvasEngine {
    /// Start a session with a blank surface committed as the first state
    pub fn new(config: &CanvasConfig) -> CanvasResult<Self> {
        config.validate()?;
        let surface = Surface::new(config.width, config.height, config.background_color()?)?;
        let mut engine = Self {
            session: Uuid::new_v4(),
            surface,
            tool: ToolKind::default(),
            color: config.stroke_color()?,
            line_width: config.line_width,
            gesture: Gesture::Idle,
            history: History::new(config.history_capacity),
            generation: 0,
        };
        engine.apply_tool_attributes();
        engine.commit()?;
        info!(
            "Canvas session {} started ({}x{})",
            engine.session, config.width, config.height
        );
        Ok(engine)
    }

    pub fn session_id(&self) -> Uuid {
        self.session
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn line_width(&self) -> u32 {
        self.line_width
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// True between pointer-down and pointer-up of a line, rectangle or circle
    pub fn is_drawing_shape(&self) -> bool {
        matches!(self.gesture, Gesture::Shape(_))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Switch tools, cancelling any drag in progress.
    ///
    /// A pen or eraser stroke that already painted is committed; a shape
    /// draft is rolled back to the pixels it started from.
    pub fn select_tool(&mut self, tool: ToolKind) -> CanvasResult<()> {
        self.cancel_gesture()?;
        if self.tool != tool {
            info!("Tool changed: {} -> {}", self.tool, tool);
        }
        self.tool = tool;
        self.apply_tool_attributes();
        Ok(())
    }

    /// Set the color from a `#RRGGBB` string
    pub fn set_color(&mut self, hex: &str) -> CanvasResult<()> {
        let color = color::parse_hex(hex)?;
        self.set_color32(color);
        Ok(())
    }

    pub fn set_color32(&mut self, color: Color32) {
        self.color = Color32::from_rgb(color.r(), color.g(), color.b());
        self.apply_tool_attributes();
    }

    pub fn set_line_width(&mut self, width: u32) -> CanvasResult<()> {
        if width == 0 {
            return Err(CanvasError::InvalidLineWidth(width));
        }
        self.line_width = width;
        self.apply_tool_attributes();
        Ok(())
    }

    fn apply_tool_attributes(&mut self) {
        let mut paint = *self.surface.paint();
        self.tool.apply_attributes(&mut paint, self.color, self.line_width);
        self.surface.set_paint(paint);
    }

    fn cancel_gesture(&mut self) -> CanvasResult<()> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Freehand(path) => {
                if path.painted() {
                    self.commit()?;
                }
            }
            Gesture::Shape(draft) => {
                debug!("Discarding {:?} draft", draft.kind());
                draft.restore(&mut self.surface);
            }
        }
        Ok(())
    }

    /// Pointer down. Opens a path or starts a shape; fill ignores it.
    pub fn begin(&mut self, pos: Pos2) -> CanvasResult<()> {
        if self.tool == ToolKind::Fill {
            return Ok(());
        }
        self.cancel_gesture()?;
        self.apply_tool_attributes();

        self.gesture = if self.tool.is_freehand() {
            Gesture::Freehand(FreehandPath::begin(pos))
        } else if let Some(kind) = self.tool.shape() {
            Gesture::Shape(ShapeDraft::begin(kind, pos, &self.surface))
        } else {
            Gesture::Idle
        };
        Ok(())
    }

    /// Pointer move while pressed
    pub fn update(&mut self, pos: Pos2) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Freehand(path) => path.extend(&mut self.surface, pos),
            Gesture::Shape(draft) => {
                draft.redraw(&mut self.surface, pos);
            }
        }
    }

    /// Pointer up at the final coordinate. Returns whether a state was
    /// committed to the history.
    pub fn end(&mut self, pos: Pos2) -> CanvasResult<bool> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => Ok(false),
            Gesture::Freehand(path) => {
                if !path.painted() {
                    return Ok(false);
                }
                self.commit()?;
                Ok(true)
            }
            Gesture::Shape(draft) => {
                if !draft.redraw(&mut self.surface, pos) {
                    debug!("Skipping degenerate {:?}", draft.kind());
                    return Ok(false);
                }
                self.commit()?;
                Ok(true)
            }
        }
    }

    /// A click on the canvas. Only the fill tool acts on clicks.
    pub fn click(&mut self, pos: Pos2) -> CanvasResult<bool> {
        if self.tool != ToolKind::Fill || !matches!(self.gesture, Gesture::Idle) {
            return Ok(false);
        }
        self.fill_at(pos.x.floor() as i64, pos.y.floor() as i64)
    }

    /// Flood fill from an integer seed with the current color.
    ///
    /// Returns whether anything changed. Seeds outside the surface are
    /// rejected with [`CanvasError::SeedOutOfBounds`] before any pixel is read.
    pub fn fill_at(&mut self, x: i64, y: i64) -> CanvasResult<bool> {
        let fill = color::rgb(self.color);
        let (width, height) = self.surface.dimensions();
        if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
            warn!("Rejected fill seed ({x}, {y}) outside {width}x{height} surface");
            return Err(CanvasError::SeedOutOfBounds {
                x,
                y,
                width,
                height,
            });
        }

        let filled = self.surface.draw(|pixels, _| flood_fill(pixels, x, y, fill))?;
        if filled == 0 {
            debug!("Fill at ({x}, {y}) already has color {}", color::to_hex(self.color));
            return Ok(false);
        }
        debug!("Filled {filled} pixels from ({x}, {y})");
        self.commit()?;
        Ok(true)
    }

    /// Blank the surface and restart the history from it
    pub fn clear(&mut self) -> CanvasResult<()> {
        self.gesture = Gesture::Idle;
        self.surface.fill_background();
        self.history.clear();
        self.commit()?;
        info!("Canvas session {} cleared", self.session);
        Ok(())
    }

    /// Replace the drawing with an encoded image scaled to the surface.
    ///
    /// The image is decoded before anything is touched, so a bad payload
    /// leaves the canvas as it was.
    pub fn apply_external_image(&mut self, bytes: &[u8]) -> CanvasResult<()> {
        let decoded = image::load_from_memory(bytes)
            .map_err(CanvasError::SnapshotDecode)?
            .to_rgba8();
        let (width, height) = self.surface.dimensions();
        let scaled = if decoded.dimensions() == (width, height) {
            decoded
        } else {
            imageops::resize(&decoded, width, height, FilterType::Triangle)
        };

        self.gesture = Gesture::Idle;
        self.surface.restore_from(&scaled);
        self.commit()?;
        info!("Applied external image to canvas session {}", self.session);
        Ok(())
    }

    /// [`Self::apply_external_image`] for a `data:image/...;base64,` URL
    pub fn apply_image_data_url(&mut self, data_url: &str) -> CanvasResult<()> {
        let snapshot = Snapshot::from_data_url(data_url)?;
        self.apply_external_image(snapshot.as_bytes())
    }

    /// Follow the container to a new size.
    ///
    /// Returns `Ok(false)` when nothing changed, including the deferred
    /// case of a zero-sized container. Existing content stays at the top
    /// left, clipped or padded with background.
    pub fn resize(&mut self, width: u32, height: u32) -> CanvasResult<bool> {
        if width == 0 || height == 0 {
            debug!("Deferring resize to {width}x{height}");
            return Ok(false);
        }
        if self.surface.dimensions() == (width, height) {
            return Ok(false);
        }
        surface::check_dimensions(width, height)?;

        if matches!(self.gesture, Gesture::Shape(_)) {
            self.cancel_gesture()?;
        }
        let (old_w, old_h) = self.surface.dimensions();
        self.surface.resize(width, height)?;
        // Resizing resets the surface paint state
        self.apply_tool_attributes();
        self.commit()?;
        info!("Canvas resized {old_w}x{old_h} -> {width}x{height}");
        Ok(true)
    }

    /// Encode the current surface
    pub fn snapshot(&self) -> CanvasResult<Snapshot> {
        Snapshot::encode(self.surface.pixels())
    }

    /// The `submit_drawing` message for the current surface
    pub fn submission(&self) -> CanvasResult<Submission> {
        Ok(Submission::SubmitDrawing {
            drawing: self.snapshot()?.to_data_url(),
        })
    }

    fn commit(&mut self) -> CanvasResult<()> {
        let snapshot = self.snapshot()?;
        self.history.commit(snapshot);
        self.generation += 1;
        debug!(
            "Committed canvas state (undo: {}, redo: {})",
            self.history.undo_depth(),
            self.history.redo_depth()
        );
        Ok(())
    }

    /// Step back in the history.
    ///
    /// The stacks change immediately; the surface changes once the
    /// returned ticket is decoded and passed to [`Self::apply_restore`].
    /// Returns `None` when only the oldest state remains.
    pub fn undo(&mut self) -> Option<RestoreTicket> {
        let snapshot = self.history.undo()?.clone();
        Some(self.issue_restore(RestoreReason::Undo, snapshot))
    }

    /// Step forward in the history, see [`Self::undo`]
    pub fn redo(&mut self) -> Option<RestoreTicket> {
        let snapshot = self.history.redo()?.clone();
        Some(self.issue_restore(RestoreReason::Redo, snapshot))
    }

    fn issue_restore(&mut self, reason: RestoreReason, snapshot: Snapshot) -> RestoreTicket {
        self.gesture = Gesture::Idle;
        self.generation += 1;
        RestoreTicket::new(self.generation, reason, snapshot)
    }

    /// Apply a decoded restore if it is still the newest request.
    ///
    /// Returns whether the surface changed. Stale results and decode
    /// failures leave the surface untouched.
    pub fn apply_restore(&mut self, restored: RestoredSurface) -> bool {
        if restored.seq != self.generation {
            debug!(
                "Dropping stale {:?} restore #{} (current #{})",
                restored.reason, restored.seq, self.generation
            );
            return false;
        }
        match restored.pixels {
            Ok(pixels) => {
                self.gesture = Gesture::Idle;
                self.surface.restore_from(&pixels);
                true
            }
            Err(err) => {
                error!("Error loading image for {:?}: {err}", restored.reason);
                false
            }
        }
    }

    /// Undo and decode inline
    pub fn undo_now(&mut self) -> bool {
        match self.undo() {
            Some(ticket) => self.restore_blocking(ticket),
            None => false,
        }
    }

    /// Redo and decode inline
    pub fn redo_now(&mut self) -> bool {
        match self.redo() {
            Some(ticket) => self.restore_blocking(ticket),
            None => false,
        }
    }

    fn restore_blocking(&mut self, ticket: RestoreTicket) -> bool {
        let restored = futures::executor::block_on(ticket.decode());
        self.apply_restore(restored)
    }

    /// Dispatch a message from the game UI.
    ///
    /// Undo and redo hand back their restore ticket for the caller to
    /// decode.
    pub fn execute(&mut self, command: Command) -> CanvasResult<Option<RestoreTicket>> {
        match command {
            Command::SelectTool { tool } => self.select_tool(tool)?,
            Command::SetColor { color } => self.set_color(&color)?,
            Command::SetLineWidth { width } => self.set_line_width(width)?,
            Command::Clear => self.clear()?,
            Command::ApplyImage { data_url } => self.apply_image_data_url(&data_url)?,
            Command::Undo => return Ok(self.undo()),
            Command::Redo => return Ok(self.redo()),
            Command::Resize { width, height } => {
                self.resize(width, height)?;
            }
        }
        Ok(None)
    }
}

impl Drop for CanvasEngine {
    fn drop(&mut self) {
        debug!("Canvas session {} ended", self.session);
    }
}
