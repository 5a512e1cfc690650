//! Triage engine: the decision core of the pipeline.
//!
//! For each relevant event, the engine invokes the classification
//! oracle, records the evaluation in the audit log, and then decides
//! whether the event becomes a task, is a duplicate of one, or is noise.
//! Every external failure along the way degrades to a safe default; no
//! error escapes a triage call.

use std::sync::Arc;

use tracing::{info, warn};

use crate::audit::{AuditEntry, AuditSink};
use crate::config::TriageConfig;
use crate::context::EventContext;
use crate::models::evaluation::Evaluation;
use crate::models::event::ChatEvent;
use crate::models::task::{NewTask, Task};
use crate::oracle::Oracle;
use crate::store::TaskStore;

/// Result of triaging a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageOutcome {
    /// A new task was persisted.
    Created(Task),
    /// A task with the same dedup key already exists.
    Duplicate(String),
    /// The event was not worth a task.
    Skipped(SkipReason),
}

/// Why an event was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Evaluation fell below the worthiness threshold.
    BelowThreshold,
    /// The store could not be reached for the dedup lookup; creating
    /// anyway could violate the at-most-one-task guarantee.
    StoreUnavailable,
}

/// Compute the stable dedup key for an event.
///
/// Prefers the transport-native canonical link; otherwise synthesizes a
/// deterministic, reconstructable identity from the conversation and the
/// event sequence number.
#[must_use]
pub fn dedup_key(event: &ChatEvent) -> String {
    event
        .link
        .clone()
        .unwrap_or_else(|| format!("chat/{}/{}", event.chat_id, event.id))
}

/// Decides what becomes of each relevant event.
#[derive(Clone)]
pub struct TriageEngine {
    oracle: Arc<dyn Oracle>,
    store: TaskStore,
    audit: Arc<dyn AuditSink>,
    priority_threshold: u8,
}

impl TriageEngine {
    /// Build an engine over the injected collaborators.
    #[must_use]
    pub fn new(
        oracle: Arc<dyn Oracle>,
        store: TaskStore,
        audit: Arc<dyn AuditSink>,
        config: &TriageConfig,
    ) -> Self {
        Self {
            oracle,
            store,
            audit,
            priority_threshold: config.priority_threshold,
        }
    }

    /// Triage one event against its context.
    ///
    /// Oracle failures substitute a neutral evaluation; the audit entry
    /// is written unconditionally (failures logged, not raised); the
    /// decision gate passes when priority meets the threshold or the
    /// evaluation demands action.
    pub async fn triage(&self, event: &ChatEvent, context: &EventContext) -> TriageOutcome {
        let evaluation = match self
            .oracle
            .evaluate(
                &context.conversation,
                &event.sender_name,
                &context.memory_digest,
            )
            .await
        {
            Ok(evaluation) => evaluation.clamped(),
            Err(err) => {
                warn!(sender = %event.sender_name, %err, "oracle evaluation failed; substituting neutral result");
                Evaluation::failed()
            }
        };

        // Audit is unconditional and diagnostic: a write failure must not
        // block the decision.
        let entry = AuditEntry::new(
            event.sender_name.clone(),
            event.text.clone(),
            evaluation.clone(),
        );
        if let Err(err) = self.audit.record(entry) {
            warn!(%err, "audit log write failed");
        }

        if evaluation.priority < self.priority_threshold && !evaluation.action_required {
            return TriageOutcome::Skipped(SkipReason::BelowThreshold);
        }

        let key = dedup_key(event);
        match self.store.find_by_link(&key).await {
            Ok(Some(existing_id)) => {
                info!(link = %key, task_id = %existing_id, "duplicate event; no task created");
                TriageOutcome::Duplicate(existing_id)
            }
            Ok(None) => self.create_task(event, &evaluation, key).await,
            Err(err) => {
                warn!(link = %key, %err, "dedup lookup failed; skipping event");
                TriageOutcome::Skipped(SkipReason::StoreUnavailable)
            }
        }
    }

    async fn create_task(
        &self,
        event: &ChatEvent,
        evaluation: &Evaluation,
        link: String,
    ) -> TriageOutcome {
        let new = NewTask {
            summary: evaluation.summary.clone(),
            priority: evaluation.priority,
            sender: event.sender_name.clone(),
            link: Some(link),
            deadline: evaluation.deadline.clone(),
        };
        match self.store.create(new).await {
            Ok(task) => {
                info!(
                    task_id = %task.id,
                    priority = task.priority,
                    "task created from event"
                );
                TriageOutcome::Created(task)
            }
            Err(err) => {
                warn!(%err, "task creation failed; surfacing as absence");
                TriageOutcome::Skipped(SkipReason::StoreUnavailable)
            }
        }
    }
}
