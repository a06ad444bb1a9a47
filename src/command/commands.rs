use serde::{Deserialize, Serialize};

use crate::tools::ToolKind;

/// Instructions the surrounding game UI sends to the canvas.
///
/// Uses the same `{"type": ..., "payload": {...}}` envelope as the room's
/// socket messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Command {
    /// Switch the active tool
    SelectTool { tool: ToolKind },

    /// Change the stroke and fill color, `#RRGGBB`
    SetColor { color: String },

    SetLineWidth { width: u32 },

    /// Blank the canvas and forget the history
    Clear,

    /// Replace the drawing with an image given as a data URL
    ApplyImage { data_url: String },

    Undo,

    Redo,

    /// The canvas container changed size
    Resize { width: u32, height: u32 },
}

/// Messages the canvas produces for the game server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Submission {
    /// The finished drawing as a PNG data URL
    SubmitDrawing { drawing: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_socket_envelopes() {
        let cmd: Command =
            serde_json::from_str(r#"{"type": "select_tool", "payload": {"tool": "rectangle"}}"#).unwrap();
        assert_eq!(cmd, Command::SelectTool { tool: ToolKind::Rectangle });

        let cmd: Command = serde_json::from_str(r#"{"type": "clear"}"#).unwrap();
        assert_eq!(cmd, Command::Clear);

        let cmd: Command =
            serde_json::from_str(r#"{"type": "resize", "payload": {"width": 640, "height": 480}}"#).unwrap();
        assert_eq!(cmd, Command::Resize { width: 640, height: 480 });
    }

    #[test]
    fn unknown_tools_fail_to_parse() {
        let result = serde_json::from_str::<Command>(r#"{"type": "select_tool", "payload": {"tool": "spray"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn submission_matches_server_format() {
        let msg = Submission::SubmitDrawing {
            drawing: "data:image/png;base64,AAAA".to_owned(),
        };
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"type":"submit_drawing","payload":{"drawing":"data:image/png;base64,AAAA"}}"#
        );
    }
}
