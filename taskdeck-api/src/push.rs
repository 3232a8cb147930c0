//! Push-channel frames for server-initiated notifications.
//!
//! The backend exposes a WebSocket endpoint at [`PUSH_PATH`] carrying JSON
//! text frames. After connecting, the client sends a single [`ClientFrame::Subscribe`]
//! naming the event stream it wants; the server then pushes [`PushFrame`]s
//! as events occur. The client never sends anything else on this channel.

use serde::{Deserialize, Serialize};

/// WebSocket path of the push endpoint, relative to the backend host.
pub const PUSH_PATH: &str = "/ws";

/// Event name for share notifications.
pub const NOTIFICATION_EVENT: &str = "notification";

/// Error type for push frame encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Serialization of an outbound frame failed.
    #[error("frame encode error: {0}")]
    Encode(String),
    /// An inbound frame was not valid JSON or had the wrong shape.
    #[error("frame decode error: {0}")]
    Decode(String),
}

/// Frames the client sends on the push channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Subscribe to a named event stream.
    ///
    /// Must be the first (and only) frame sent after connecting.
    Subscribe {
        /// Event name to subscribe to, e.g. [`NOTIFICATION_EVENT`].
        event: String,
    },
}

/// A server-pushed event frame.
///
/// `event` routes the frame; `data` is the event-specific payload and is
/// left undecoded here so unknown event types pass through harmlessly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushFrame {
    /// Name of the event stream this frame belongs to.
    pub event: String,
    /// Event payload. Shape depends on `event`.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Payload of a [`NOTIFICATION_EVENT`] frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Human-readable notification text.
    pub message: String,
    /// Payload fields the client does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PushFrame {
    /// Decodes the payload as a [`Notification`] if this is a notification
    /// frame.
    ///
    /// Returns `Ok(None)` for frames of other event types.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::Decode` if the frame is a notification but its
    /// payload is missing the `message` field or otherwise malformed.
    pub fn notification(&self) -> Result<Option<Notification>, FrameError> {
        if self.event != NOTIFICATION_EVENT {
            return Ok(None);
        }
        serde_json::from_value(self.data.clone())
            .map(Some)
            .map_err(|e| FrameError::Decode(format!("notification payload: {e}")))
    }
}

/// Builds the subscribe frame for the notification stream.
#[must_use]
pub fn subscribe_notifications() -> ClientFrame {
    ClientFrame::Subscribe {
        event: NOTIFICATION_EVENT.to_string(),
    }
}

/// Encodes a [`ClientFrame`] into JSON text.
///
/// # Errors
///
/// Returns `FrameError::Encode` if serialization fails.
pub fn encode_client(frame: &ClientFrame) -> Result<String, FrameError> {
    serde_json::to_string(frame).map_err(|e| FrameError::Encode(e.to_string()))
}

/// Decodes a [`PushFrame`] from JSON text.
///
/// # Errors
///
/// Returns `FrameError::Decode` if the text is not a valid frame.
pub fn decode_server(text: &str) -> Result<PushFrame, FrameError> {
    serde_json::from_str(text).map_err(|e| FrameError::Decode(e.to_string()))
}
