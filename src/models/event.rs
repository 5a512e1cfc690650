//! Inbound chat event model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single inbound unit of conversation delivered by the chat transport.
///
/// Events are ephemeral: they are owned by the transport and read-only to
/// the triage core. Only their evaluation outcome is ever persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[allow(clippy::struct_excessive_bools)] // transport-native message flags, not a state machine
pub struct ChatEvent {
    /// Transport-assigned message sequence number within the conversation.
    pub id: i64,
    /// Stable identity of the conversation this event belongs to.
    pub chat_id: String,
    /// Display name of the sender (person or group title).
    pub sender_name: String,
    /// Message text or caption. May be empty for pure-media messages.
    #[serde(default)]
    pub text: String,
    /// Whether the owner authored this event.
    #[serde(default)]
    pub is_self: bool,
    /// Whether the event mentions the owner.
    #[serde(default)]
    pub is_mention: bool,
    /// Whether the event replies to a message authored by the owner.
    #[serde(default)]
    pub is_reply_to_self: bool,
    /// Whether the event originates from a direct (one-to-one) chat.
    #[serde(default)]
    pub is_direct: bool,
    /// Transport-native canonical link for this event, when available.
    #[serde(default)]
    pub link: Option<String>,
    /// Delivery timestamp.
    pub timestamp: DateTime<Utc>,
}

impl ChatEvent {
    /// Whether this event comes from a group (non-direct, non-self) chat.
    ///
    /// Group events feed the discussion buffer in addition to triage.
    #[must_use]
    pub fn is_group(&self) -> bool {
        !self.is_direct && !self.is_self
    }

    /// Render the event as a single conversation line.
    ///
    /// Empty text is rendered as a `[Media]` placeholder so media-only
    /// messages still carry context for the oracle.
    #[must_use]
    pub fn render_line(&self) -> String {
        if self.text.is_empty() {
            format!("{}: [Media]", self.sender_name)
        } else {
            format!("{}: {}", self.sender_name, self.text)
        }
    }
}
