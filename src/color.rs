use egui::Color32;

use crate::error::{CanvasError, CanvasResult};

/// Parse a `#RRGGBB` color as sent by the color picker.
pub fn parse_hex(hex: &str) -> CanvasResult<Color32> {
    let hex = hex.trim();
    if hex.len() != 7 || !hex.starts_with('#') {
        return Err(CanvasError::InvalidColor(hex.to_owned()));
    }
    Color32::from_hex(hex).map_err(|_| CanvasError::InvalidColor(hex.to_owned()))
}

/// Format an opaque color as `#RRGGBB`.
pub fn to_hex(color: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}

/// The RGB channels used for flood fill matching
pub fn rgb(color: Color32) -> [u8; 3] {
    [color.r(), color.g(), color.b()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_picker_values() {
        assert_eq!(parse_hex("#FF8000").unwrap(), Color32::from_rgb(255, 128, 0));
        assert_eq!(parse_hex("#1f1f1f").unwrap(), Color32::from_rgb(31, 31, 31));
    }

    #[test]
    fn rejects_other_notations() {
        assert!(parse_hex("FF8000").is_err());
        assert!(parse_hex("#F80").is_err());
        assert!(parse_hex("#FF800080").is_err());
        assert!(parse_hex("#GG0000").is_err());
    }

    #[test]
    fn formats_uppercase() {
        assert_eq!(to_hex(Color32::from_rgb(0, 171, 255)), "#00ABFF");
    }
}
