use crate::types::Stroke;

/// Literal frame that signals "something was deleted, refresh yourself".
pub const DELETE_SENTINEL: &str = "delete";

/// One WebSocket text frame, in either direction: the delete sentinel, or a
/// single JSON-encoded stroke. Strokes are never batched.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncMessage {
    Delete,
    NewStroke(Stroke),
}

impl SyncMessage {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        match self {
            SyncMessage::Delete => Ok(DELETE_SENTINEL.to_string()),
            SyncMessage::NewStroke(stroke) => serde_json::to_string(stroke),
        }
    }

    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        if text == DELETE_SENTINEL {
            Ok(SyncMessage::Delete)
        } else {
            serde_json::from_str::<Stroke>(text).map(SyncMessage::NewStroke)
        }
    }
}
