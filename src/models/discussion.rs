//! Discussion point model for buffered group-chat contributions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::event::ChatEvent;

/// A free-text contribution captured from a non-DM conversation.
///
/// Points accumulate in the discussion buffer between briefings and are
/// aggregated into a daily digest, after which the buffer is cleared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DiscussionPoint {
    /// Title of the group conversation the point was captured from.
    pub group: String,
    /// Display name of the contributor.
    pub sender: String,
    /// Contribution text.
    pub text: String,
    /// Capture timestamp.
    pub timestamp: DateTime<Utc>,
}

impl DiscussionPoint {
    /// Capture a discussion point from a group chat event.
    #[must_use]
    pub fn from_event(event: &ChatEvent) -> Self {
        Self {
            group: event.chat_id.clone(),
            sender: event.sender_name.clone(),
            text: event.text.clone(),
            timestamp: event.timestamp,
        }
    }
}
