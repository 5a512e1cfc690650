//! Discussion buffer and dated archive.
//!
//! Group-chat contributions accumulate here between briefings. The
//! drain is a single swap under the lock, so an append racing a drain
//! lands either in this cycle or the next — never in both, never lost.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use tokio::sync::Mutex;
use tracing::warn;

use crate::models::discussion::DiscussionPoint;
use crate::{AppError, Result};

/// Shared in-process buffer of discussion points.
pub struct DiscussionBuffer {
    points: Mutex<Vec<DiscussionPoint>>,
}

impl DiscussionBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            points: Mutex::new(Vec::new()),
        }
    }

    /// Append a point captured from a group event.
    pub async fn push(&self, point: DiscussionPoint) {
        self.points.lock().await.push(point);
    }

    /// Atomically take all buffered points, leaving the buffer empty.
    pub async fn drain(&self) -> Vec<DiscussionPoint> {
        let mut guard = self.points.lock().await;
        std::mem::take(&mut *guard)
    }

    /// Clone the buffered points without clearing them.
    pub async fn snapshot(&self) -> Vec<DiscussionPoint> {
        self.points.lock().await.clone()
    }

    /// Number of currently buffered points.
    pub async fn len(&self) -> usize {
        self.points.lock().await.len()
    }

    /// Whether the buffer currently holds no points.
    pub async fn is_empty(&self) -> bool {
        self.points.lock().await.is_empty()
    }
}

impl Default for DiscussionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render drained points grouped by conversation, for summarization.
#[must_use]
pub fn grouped_text(points: &[DiscussionPoint]) -> String {
    let mut by_group: BTreeMap<&str, Vec<&DiscussionPoint>> = BTreeMap::new();
    for point in points {
        by_group.entry(point.group.as_str()).or_default().push(point);
    }

    let mut text = String::new();
    for (group, entries) in by_group {
        let _ = writeln!(text, "## {group}");
        for point in entries {
            let _ = writeln!(text, "{}: {}", point.sender, point.text);
        }
    }
    text
}

/// Durable archive of daily discussion summaries, keyed by date.
pub struct DiscussionArchive {
    path: PathBuf,
}

impl DiscussionArchive {
    /// Create an archive backed by the given file.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store a summary under today's date, appending when the date
    /// already has one (a second briefing in the same day).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the archive cannot be written.
    pub fn store(&self, date: &str, summary: &str) -> Result<()> {
        let mut history = self.history();
        history
            .entry(date.to_owned())
            .and_modify(|existing| {
                existing.push_str("\n\n");
                existing.push_str(summary);
            })
            .or_insert_with(|| summary.to_owned());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| AppError::Io(format!("failed to create archive dir: {err}")))?;
        }
        let raw = serde_json::to_string_pretty(&history)?;
        std::fs::write(&self.path, raw)
            .map_err(|err| AppError::Io(format!("failed to write discussion archive: {err}")))
    }

    /// All archived summaries, keyed by date. Unreadable or corrupt
    /// archives degrade to empty with a warning.
    #[must_use]
    pub fn history(&self) -> BTreeMap<String, String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(%err, path = %self.path.display(), "corrupt discussion archive; treating as empty");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        }
    }
}
