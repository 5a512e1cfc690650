//! Classification oracle boundary.
//!
//! The oracle is an external LLM service consumed as a pure function
//! from `(text, sender, memory digest)` to an [`Evaluation`]. Prompt
//! construction and the wire protocol live in the adapter behind this
//! trait, never in the triage core. Adapters must signal malformed or
//! non-JSON-shaped model output as an [`crate::AppError::Oracle`] error,
//! not a panic; the caller degrades to a neutral evaluation.

use async_trait::async_trait;
use tracing::info;

use crate::models::evaluation::Evaluation;
use crate::Result;

/// Scores an event's urgency and extracts structured fields.
///
/// Implementations must be [`Send`] and [`Sync`] to allow sharing across
/// async task boundaries via [`std::sync::Arc`].
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Evaluate a conversation excerpt for urgency and required action.
    ///
    /// `memory_digest` carries summaries of past task outcomes so the
    /// oracle can bias its scoring toward the owner's demonstrated
    /// preferences.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Oracle` on timeout, transport failure, or a
    /// malformed response.
    async fn evaluate(&self, text: &str, sender: &str, memory_digest: &str)
        -> Result<Evaluation>;

    /// Condense buffered group-discussion text into a short digest.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Oracle` on timeout, transport failure, or a
    /// malformed response.
    async fn summarize_discussion(&self, buffer_text: &str) -> Result<String>;
}

/// No-op oracle used when no API credential is configured.
///
/// Every evaluation comes back neutral, so nothing is ever surfaced as a
/// task — the pipeline keeps running instead of crashing at startup.
pub struct NullOracle;

impl NullOracle {
    /// Construct the no-op oracle, logging the degraded mode once.
    #[must_use]
    pub fn new() -> Self {
        info!("classification oracle not configured; evaluations will be neutral");
        Self
    }
}

impl Default for NullOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Oracle for NullOracle {
    async fn evaluate(
        &self,
        _text: &str,
        _sender: &str,
        _memory_digest: &str,
    ) -> Result<Evaluation> {
        Ok(Evaluation::unconfigured())
    }

    async fn summarize_discussion(&self, _buffer_text: &str) -> Result<String> {
        Err(crate::AppError::Oracle("oracle not configured".into()))
    }
}
