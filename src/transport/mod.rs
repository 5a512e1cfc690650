//! Chat transport boundary.
//!
//! The connector that actually speaks to a chat network (session
//! management, reconnects, OAuth renewal) is an external collaborator.
//! This module fixes its interface: deliver events, fetch history, send
//! messages, list recent conversations.

pub mod stdio;

use async_trait::async_trait;
use tracing::info;

use crate::models::event::ChatEvent;
use crate::Result;

/// Capabilities the triage core needs from the chat connector.
///
/// Implementations must be [`Send`] and [`Sync`] to allow sharing across
/// async task boundaries via [`std::sync::Arc`].
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Fetch up to `limit` most recent messages of a conversation,
    /// ordered oldest-first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` when history is unavailable; callers
    /// fail open to a single-line context.
    async fn fetch_history(&self, conversation_id: &str, limit: usize) -> Result<Vec<ChatEvent>>;

    /// Send a text message to a conversation.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` if delivery fails.
    async fn send_message(&self, conversation_id: &str, text: &str) -> Result<()>;

    /// List identities of the `limit` most recently active conversations.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` if the listing fails.
    async fn list_recent_conversations(&self, limit: usize) -> Result<Vec<String>>;
}

/// No-op transport used when no chat session is configured.
///
/// History fetches fail (callers fail open) and sends are swallowed, so
/// the pipeline and dashboard stay usable in local-only mode.
pub struct NullTransport;

impl NullTransport {
    /// Construct the no-op transport, logging the degraded mode once.
    #[must_use]
    pub fn new() -> Self {
        info!("chat transport not configured; running in local-only mode");
        Self
    }
}

impl Default for NullTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for NullTransport {
    async fn fetch_history(&self, _conversation_id: &str, _limit: usize) -> Result<Vec<ChatEvent>> {
        Err(crate::AppError::Transport("transport not configured".into()))
    }

    async fn send_message(&self, conversation_id: &str, text: &str) -> Result<()> {
        tracing::debug!(conversation_id, text, "send dropped (transport not configured)");
        Ok(())
    }

    async fn list_recent_conversations(&self, _limit: usize) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
