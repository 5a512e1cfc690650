//! Owner notification sink.
//!
//! A one-shot, best-effort message-send capability injected into the
//! triage caller. At-most-once delivery, no retry guarantee — a failed
//! notification surfaces as a log line and nothing else.

use std::sync::Arc;

use async_trait::async_trait;

use crate::transport::ChatTransport;
use crate::Result;

/// Fire-and-forget delivery of text to the owner.
///
/// Implementations must be [`Send`] and [`Sync`] to allow sharing across
/// async task boundaries via [`std::sync::Arc`].
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` to the owner's private channel.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` if delivery fails; callers log and
    /// move on.
    async fn notify_owner(&self, text: &str) -> Result<()>;
}

/// Notifier that delivers to the owner's saved channel via the transport.
pub struct OwnerNotifier {
    transport: Arc<dyn ChatTransport>,
    saved_channel_id: String,
}

impl OwnerNotifier {
    /// Build a notifier targeting the owner's saved channel.
    #[must_use]
    pub fn new(transport: Arc<dyn ChatTransport>, saved_channel_id: String) -> Self {
        Self {
            transport,
            saved_channel_id,
        }
    }
}

#[async_trait]
impl Notifier for OwnerNotifier {
    async fn notify_owner(&self, text: &str) -> Result<()> {
        self.transport
            .send_message(&self.saved_channel_id, text)
            .await
    }
}
