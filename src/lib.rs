#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod color;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod fill;
pub mod input;
pub mod panels;
pub mod snapshot;
pub mod stroke;
pub mod surface;
pub mod tools;

pub use app::ArtflowApp;
pub use command::{Command, History, Submission};
pub use config::CanvasConfig;
pub use engine::CanvasEngine;
pub use error::{CanvasError, CanvasResult};
pub use input::{CanvasInput, InputHandler};
pub use snapshot::{RestoreReason, RestoreTicket, RestoredSurface, Snapshot};
pub use surface::Surface;
pub use tools::ToolKind;
