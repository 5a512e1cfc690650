//! Conversation window and memory digest assembly.
//!
//! Builds the two pieces of context handed to the oracle: a bounded,
//! chronologically ordered excerpt of the triggering conversation, and a
//! digest of past task outcomes (the learning loop's feedback channel).
//! Both sides fail open — a transport or store hiccup degrades the
//! context, it never blocks triage.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::warn;

use crate::config::TriageConfig;
use crate::models::event::ChatEvent;
use crate::models::task::Task;
use crate::store::TaskStore;
use crate::transport::ChatTransport;

/// Context passed alongside an event into the triage engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    /// Recent conversation rendered oldest-first, one line per message.
    pub conversation: String,
    /// Textual summary of recent task outcomes.
    pub memory_digest: String,
}

/// Assembles [`EventContext`] values from transport and store reads.
#[derive(Clone)]
pub struct ContextBuilder {
    transport: Arc<dyn ChatTransport>,
    store: TaskStore,
    window: usize,
    examples: usize,
}

impl ContextBuilder {
    /// Create a builder using the configured window and example limits.
    #[must_use]
    pub fn new(transport: Arc<dyn ChatTransport>, store: TaskStore, config: &TriageConfig) -> Self {
        Self {
            transport,
            store,
            window: config.context_window,
            examples: config.memory_examples,
        }
    }

    /// Build the full context for an event.
    pub async fn build(&self, event: &ChatEvent) -> EventContext {
        EventContext {
            conversation: self.conversation_window(event).await,
            memory_digest: self.memory_digest().await,
        }
    }

    /// Render up to the last N messages of the event's conversation,
    /// oldest-first. On history failure, falls back to a single line
    /// containing only the triggering event.
    async fn conversation_window(&self, event: &ChatEvent) -> String {
        match self
            .transport
            .fetch_history(&event.chat_id, self.window)
            .await
        {
            Ok(history) if !history.is_empty() => history
                .iter()
                .map(ChatEvent::render_line)
                .collect::<Vec<_>>()
                .join("\n"),
            Ok(_) => event.render_line(),
            Err(err) => {
                warn!(chat_id = %event.chat_id, %err, "history fetch failed; using single-line context");
                event.render_line()
            }
        }
    }

    /// Compose the memory digest from recent task outcomes.
    ///
    /// The digest is advisory context for the oracle, not a hard rule:
    /// it concatenates recent completions plus accepted and rejected
    /// examples with their comments. Store failures degrade to whichever
    /// sections could be read.
    pub async fn memory_digest(&self) -> String {
        let mut digest = String::new();

        let done = self
            .store
            .recent_done(self.examples)
            .await
            .unwrap_or_else(|err| {
                warn!(%err, "memory digest: recent_done read failed");
                Vec::new()
            });
        if !done.is_empty() {
            digest.push_str("Recently completed tasks:\n");
            for task in &done {
                let _ = writeln!(digest, "- {}", task.summary);
            }
        }

        let accepted = self
            .store
            .accepted_examples(self.examples)
            .await
            .unwrap_or_else(|err| {
                warn!(%err, "memory digest: accepted examples read failed");
                Vec::new()
            });
        if !accepted.is_empty() {
            digest.push_str("Examples of tasks I accepted and completed:\n");
            for task in &accepted {
                let _ = writeln!(digest, "{}", example_line(task));
            }
        }

        let rejected = self
            .store
            .rejected_examples(self.examples)
            .await
            .unwrap_or_else(|err| {
                warn!(%err, "memory digest: rejected examples read failed");
                Vec::new()
            });
        if !rejected.is_empty() {
            digest.push_str("Examples of tasks I rejected as not worth doing:\n");
            for task in &rejected {
                let _ = writeln!(digest, "{}", example_line(task));
            }
        }

        digest
    }
}

/// Render one past-task example with sender and any comments.
fn example_line(task: &Task) -> String {
    let mut line = format!("- [{}] {}", task.sender, task.summary);
    if !task.comments.is_empty() {
        let notes: Vec<&str> = task.comments.iter().map(|c| c.text.as_str()).collect();
        let _ = write!(line, " (notes: {})", notes.join("; "));
    }
    line
}
