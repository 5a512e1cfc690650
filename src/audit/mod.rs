//! Append-only audit trail of oracle evaluations.
//!
//! Every triage decision records the raw event text alongside the
//! evaluation the oracle produced, successful or not. The log exists
//! purely for observability and debugging of the learning loop — a
//! failed write is logged and swallowed, never propagated into triage.

pub mod ring;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::evaluation::Evaluation;

/// A single recorded oracle evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AuditEntry {
    /// When the evaluation happened.
    pub timestamp: DateTime<Utc>,
    /// Display name of the originating sender.
    pub sender: String,
    /// Raw text of the triggering event.
    pub raw_text: String,
    /// The evaluation the oracle returned (or the neutral substitute).
    pub evaluation: Evaluation,
}

impl AuditEntry {
    /// Construct an entry timestamped now.
    #[must_use]
    pub fn new(sender: String, raw_text: String, evaluation: Evaluation) -> Self {
        Self {
            timestamp: Utc::now(),
            sender,
            raw_text,
            evaluation,
        }
    }
}

/// Records audit entries in a persistent, ring-bounded store.
///
/// Implementations must be [`Send`] and [`Sync`] to allow sharing across
/// async task boundaries via [`std::sync::Arc`].
pub trait AuditSink: Send + Sync {
    /// Record a single entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying write fails. Callers treat the
    /// failure as diagnostic, not transactional.
    fn record(&self, entry: AuditEntry) -> crate::Result<()>;

    /// Snapshot the retained entries, newest-first.
    fn entries(&self) -> Vec<AuditEntry>;
}

pub use ring::JsonAuditLog;
