use thiserror::Error;

/// Errors raised by the drawing canvas engine
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("invalid canvas dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid color {0:?}, expected #RRGGBB")]
    InvalidColor(String),

    #[error("line width must be at least 1, got {0}")]
    InvalidLineWidth(u32),

    #[error("unknown tool {0:?}")]
    UnknownTool(String),

    /// Fill seed outside the surface; nothing was read or written
    #[error("fill seed ({x}, {y}) lies outside the {width}x{height} surface")]
    SeedOutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("failed to encode snapshot: {0}")]
    SnapshotEncode(#[source] image::ImageError),

    #[error("failed to decode snapshot: {0}")]
    SnapshotDecode(#[source] image::ImageError),

    #[error("invalid data url: {0}")]
    InvalidDataUrl(String),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type CanvasResult<T> = Result<T, CanvasError>;
