use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::color;
use crate::command::DEFAULT_CAPACITY;
use crate::error::{CanvasError, CanvasResult};
use crate::surface;

/// Environment variable naming a JSON config file
pub const CONFIG_ENV: &str = "ARTFLOW_CANVAS_CONFIG";

/// Settings for one drawing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Initial surface width in pixels
    pub width: u32,
    /// Initial surface height in pixels
    pub height: u32,
    /// `#RRGGBB` shown wherever nothing is painted
    pub background: String,
    /// Initial `#RRGGBB` stroke and fill color
    pub color: String,
    pub line_width: u32,
    /// Maximum number of states kept for undo
    pub history_capacity: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: "#FFFFFF".to_owned(),
            color: "#000000".to_owned(),
            line_width: 5,
            history_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON config. Missing keys take their defaults.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file named by `ARTFLOW_CANVAS_CONFIG`, or the defaults when
    /// the variable is unset.
    pub fn from_env() -> CanvasResult<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                log::info!("Loading canvas config from {}", path.to_string_lossy());
                Self::from_json(&std::fs::read_to_string(path)?)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> CanvasResult<()> {
        surface::check_dimensions(self.width, self.height)?;
        if self.line_width == 0 {
            return Err(CanvasError::InvalidLineWidth(self.line_width));
        }
        if self.history_capacity == 0 {
            return Err(CanvasError::InvalidConfig(
                "history_capacity must be at least 1".to_owned(),
            ));
        }
        self.background_color()?;
        self.stroke_color()?;
        Ok(())
    }

    pub fn background_color(&self) -> CanvasResult<Color32> {
        color::parse_hex(&self.background)
    }

    pub fn stroke_color(&self) -> CanvasResult<Color32> {
        color::parse_hex(&self.color)
    }
}
