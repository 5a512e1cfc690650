//! Task model and lifecycle helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status for a tracked task.
///
/// There is deliberately no terminal state: reopening is always legal,
/// because the source of truth is human judgment rather than the triage
/// engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task awaits human action.
    Active,
    /// Task completed (accepted outcome for the learning loop).
    Done,
    /// Task dismissed as not worth doing (rejected outcome).
    Rejected,
}

impl TaskStatus {
    /// Determine whether a lifecycle transition is permitted.
    ///
    /// Re-asserting the current status is also allowed so that status
    /// writes stay idempotent against an eventually consistent store.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next
            || matches!(
                (self, next),
                (Self::Active, Self::Done | Self::Rejected)
                    | (Self::Done | Self::Rejected, Self::Active)
            )
    }

    /// Canonical lowercase label used in store properties and the API.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Done => "done",
            Self::Rejected => "rejected",
        }
    }

    /// Parse a status label, defaulting unknown values to `Active`.
    ///
    /// The external document store may hold hand-edited values; an
    /// unrecognized label must not poison the whole task list.
    #[must_use]
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "done" => Self::Done,
            "rejected" => Self::Rejected,
            _ => Self::Active,
        }
    }
}

/// A threaded comment appended to a task.
///
/// Immutable once created except for deletion by id. Surfaced to humans
/// newest-first; storage order is append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Comment {
    /// Short random token identifying the comment within its task.
    pub id: String,
    /// Creation timestamp rendered as `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// Display name of the comment author.
    pub sender: String,
    /// Comment body.
    pub text: String,
}

impl Comment {
    /// Construct a new comment with a generated short id and current time.
    #[must_use]
    pub fn new(sender: String, text: String) -> Self {
        let mut id = Uuid::new_v4().to_string();
        id.truncate(8);
        Self {
            id,
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            sender,
            text,
        }
    }
}

/// The central persistent entity: an actionable item surfaced from chat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Task {
    /// Store-assigned identifier.
    pub id: String,
    /// One-sentence description of what needs doing.
    pub summary: String,
    /// Urgency score in `0..=10`; mutable post-creation.
    pub priority: u8,
    /// Display name of the originating sender.
    pub sender: String,
    /// Stable dedup key — a canonical URL-like identity for the source
    /// event. Unique among tasks when present.
    pub link: Option<String>,
    /// Free-text deadline, if the oracle extracted one.
    pub deadline: Option<String>,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Threaded comments, newest-first as surfaced.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a task; the store assigns the rest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct NewTask {
    /// One-sentence description of what needs doing.
    pub summary: String,
    /// Urgency score in `0..=10`.
    pub priority: u8,
    /// Display name of the originating sender.
    pub sender: String,
    /// Stable dedup key for the source event.
    pub link: Option<String>,
    /// Free-text deadline, if any.
    pub deadline: Option<String>,
}
