//! Per-event processing pipeline.
//!
//! Wires the relevance filter, context builder, triage engine, and
//! notification sink into a single entry point. All collaborators are
//! explicit dependencies constructed once at process start — no ambient
//! globals. Each inbound event is an independent unit of work; the only
//! cross-event state is the discussion buffer and the (immutable)
//! keyword set.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::briefing::DiscussionBuffer;
use crate::context::ContextBuilder;
use crate::models::discussion::DiscussionPoint;
use crate::models::event::ChatEvent;
use crate::notify::Notifier;
use crate::relevance::{self, KeywordSet};
use crate::triage::{TriageEngine, TriageOutcome};

/// The assembled event pipeline.
pub struct Pipeline {
    keywords: KeywordSet,
    context: ContextBuilder,
    engine: TriageEngine,
    buffer: Arc<DiscussionBuffer>,
    notifier: Arc<dyn Notifier>,
}

impl Pipeline {
    /// Assemble the pipeline from its collaborators.
    #[must_use]
    pub fn new(
        keywords: KeywordSet,
        context: ContextBuilder,
        engine: TriageEngine,
        buffer: Arc<DiscussionBuffer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            keywords,
            context,
            engine,
            buffer,
            notifier,
        }
    }

    /// Process one inbound event end to end.
    ///
    /// Returns the triage outcome when the event reached the engine, or
    /// `None` when the length guard or relevance filter dropped it (in
    /// which case no oracle call happens and no task is created).
    pub async fn handle_event(&self, event: ChatEvent) -> Option<TriageOutcome> {
        if !relevance::passes_length_guard(&event) {
            debug!(chat_id = %event.chat_id, "dropped: text too short");
            return None;
        }
        if !relevance::is_relevant(&event, &self.keywords) {
            debug!(chat_id = %event.chat_id, "dropped: not relevant");
            return None;
        }

        if event.is_group() {
            self.buffer.push(DiscussionPoint::from_event(&event)).await;
        }

        let context = self.context.build(&event).await;
        let outcome = self.engine.triage(&event, &context).await;

        if let TriageOutcome::Created(ref task) = outcome {
            let text = format!(
                "Task added\nPriority: {}\nSummary: {}\nLink: {}",
                task.priority,
                task.summary,
                task.link.as_deref().unwrap_or("-"),
            );
            if let Err(err) = self.notifier.notify_owner(&text).await {
                warn!(%err, "task notification failed");
            }
        }

        info!(
            chat_id = %event.chat_id,
            outcome = outcome_label(&outcome),
            "event processed"
        );
        Some(outcome)
    }
}

fn outcome_label(outcome: &TriageOutcome) -> &'static str {
    match outcome {
        TriageOutcome::Created(_) => "created",
        TriageOutcome::Duplicate(_) => "duplicate",
        TriageOutcome::Skipped(_) => "skipped",
    }
}
