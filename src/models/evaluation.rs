//! Oracle evaluation result model.

use serde::{Deserialize, Serialize};

/// Highest value on the urgency scale (critical emergency).
pub const PRIORITY_MAX: u8 = 10;

/// Structured output of a single classification-oracle call.
///
/// Urgency is scored 0–10 where 10 is a critical emergency and 0 is
/// noise. An evaluation is produced once per triage decision and folded
/// into either a task or an audit entry; it is never persisted standalone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Evaluation {
    /// Urgency score in `0..=10`, higher is more urgent.
    pub priority: u8,
    /// One-sentence summary of the message content.
    pub summary: String,
    /// Whether the owner needs to reply or act.
    pub action_required: bool,
    /// Free-text deadline extracted from the message, if any.
    pub deadline: Option<String>,
}

impl Evaluation {
    /// Neutral evaluation substituted when the oracle call fails.
    ///
    /// Worst priority, no action required — the pipeline never raises
    /// past an oracle failure.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            priority: 0,
            summary: "Analysis failed".into(),
            action_required: false,
            deadline: None,
        }
    }

    /// Neutral evaluation returned by an unconfigured oracle collaborator.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            priority: 0,
            summary: "Oracle not configured".into(),
            action_required: false,
            deadline: None,
        }
    }

    /// Clamp the priority into the valid `0..=10` range.
    ///
    /// Oracle adapters parse model output and may hand back out-of-range
    /// scores; the triage core only ever sees clamped values.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.priority = self.priority.min(PRIORITY_MAX);
        self
    }
}
