//! Briefing composition and scheduling.
//!
//! Periodically (or on demand) aggregates active tasks and the buffered
//! group discussions into a human-readable summary for the owner. When
//! there is nothing to report the briefing says so explicitly, so an
//! operator can tell "ran with nothing to say" from "did not run".

pub mod buffer;

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::models::task::Task;
use crate::oracle::Oracle;
use crate::store::TaskStore;

pub use buffer::{DiscussionArchive, DiscussionBuffer};

/// Composes briefings from the task store and the discussion buffer.
pub struct BriefingComposer {
    store: TaskStore,
    oracle: Arc<dyn Oracle>,
    buffer: Arc<DiscussionBuffer>,
    archive: DiscussionArchive,
}

impl BriefingComposer {
    /// Build a composer over the injected collaborators.
    #[must_use]
    pub fn new(
        store: TaskStore,
        oracle: Arc<dyn Oracle>,
        buffer: Arc<DiscussionBuffer>,
        archive: DiscussionArchive,
    ) -> Self {
        Self {
            store,
            oracle,
            buffer,
            archive,
        }
    }

    /// Compose the briefing text.
    ///
    /// Drains the discussion buffer (atomically with respect to
    /// concurrent appends) and archives its digest under today's date.
    /// Store and oracle failures degrade to partial content; composing
    /// never fails outright.
    pub async fn compose(&self) -> String {
        let today = Utc::now().format("%A, %B %e").to_string();
        let mut text = format!("Good morning! Briefing for {today}.\n");

        let briefing = self
            .store
            .daily_briefing_tasks()
            .await
            .unwrap_or_else(|err| {
                warn!(%err, "briefing task read failed; reporting without tasks");
                crate::store::BriefingTasks::default()
            });

        let discussion = self.discussion_digest().await;

        if briefing.top.is_empty() && briefing.with_deadlines.is_empty() && discussion.is_none() {
            text.push_str("\nAll clear — no active tasks and no discussions to report.\n");
            return text;
        }

        if briefing.top.is_empty() {
            text.push_str("\nNo active tasks right now.\n");
        } else {
            text.push_str("\nTop priorities:\n");
            for (idx, task) in briefing.top.iter().enumerate() {
                let _ = writeln!(text, "{}. {}", idx + 1, task_line(task));
            }
        }

        if !briefing.with_deadlines.is_empty() {
            text.push_str("\nUpcoming deadlines:\n");
            for task in &briefing.with_deadlines {
                let deadline = task.deadline.as_deref().unwrap_or("unspecified");
                let _ = writeln!(text, "- {} — due {deadline}", task.summary);
            }
        }

        if let Some(digest) = discussion {
            text.push_str("\nGroup discussions:\n");
            text.push_str(&digest);
            if !digest.ends_with('\n') {
                text.push('\n');
            }
        }

        text
    }

    /// Drain the buffer and turn it into a digest, archiving the result.
    ///
    /// Returns `None` when no points were buffered. On oracle failure the
    /// raw grouped text stands in for the summary so drained points are
    /// never lost.
    async fn discussion_digest(&self) -> Option<String> {
        let points = self.buffer.drain().await;
        if points.is_empty() {
            return None;
        }

        let raw = buffer::grouped_text(&points);
        let digest = match self.oracle.summarize_discussion(&raw).await {
            Ok(summary) => summary,
            Err(err) => {
                warn!(%err, "discussion summarization failed; archiving raw text");
                raw
            }
        };

        let date = Utc::now().format("%Y-%m-%d").to_string();
        if let Err(err) = self.archive.store(&date, &digest) {
            warn!(%err, "failed to archive discussion digest");
        }
        Some(digest)
    }
}

/// One-line rendering of a task for the priorities block.
fn task_line(task: &Task) -> String {
    match &task.deadline {
        Some(deadline) => format!(
            "[P{}] {} (from {}, due {deadline})",
            task.priority, task.summary, task.sender
        ),
        None => format!("[P{}] {} (from {})", task.priority, task.summary, task.sender),
    }
}

/// Delivers a composed briefing somewhere visible to the owner.
type BriefingSender = Arc<dyn crate::notify::Notifier>;

/// Spawn the recurring briefing task.
///
/// Runs every `interval_hours`; the first tick fires after a full
/// interval so startup does not immediately broadcast. Send failures are
/// logged and retried on the next tick. Independent of the per-event
/// pipeline; never blocks it.
#[must_use]
pub fn spawn_briefing_task(
    composer: Arc<BriefingComposer>,
    notifier: BriefingSender,
    interval_hours: u64,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = Duration::from_secs(interval_hours.saturating_mul(3600));
        let mut interval = tokio::time::interval(period);
        interval.tick().await; // immediate first tick consumed

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("briefing task shutting down");
                    break;
                }
                _ = interval.tick() => {
                    let text = composer.compose().await;
                    if let Err(err) = notifier.notify_owner(&text).await {
                        error!(%err, "briefing delivery failed; will retry next cycle");
                    } else {
                        info!("briefing delivered");
                    }
                }
            }
        }
    })
}
