use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::{CardSession, GridSize, Rgb};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    SetCell {
        row: usize,
        col: usize,
        value: String,
    },
    Resize {
        size: i64,
    },
    SetWordList {
        text: String,
    },
    FillFromList,
    UpdateListFromGrid,
    Shuffle,
    SetColor {
        color: String,
    },
    ToggleListVisibility,
    Export,
    GetState,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    CardState {
        size: GridSize,
        rows: Vec<Vec<String>>,
        color: Rgb,
        list_visible: bool,
    },
    WordList {
        text: String,
    },
    Notice {
        level: NoticeLevel,
        message: String,
    },
    ExportReady {
        file_name: String,
        mime_type: String,
        /// Base64-encoded image bytes
        data: String,
        exported_at: DateTime<Utc>,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl ServerMessage {
    pub fn card_state(session: &CardSession) -> Self {
        let view = session.view();
        ServerMessage::CardState {
            size: view.size,
            rows: view.rows,
            color: view.color,
            list_visible: session.list_visible(),
        }
    }

    pub fn notice(level: NoticeLevel, message: impl Into<String>) -> Self {
        ServerMessage::Notice {
            level,
            message: message.into(),
        }
    }
}
