//! Ring-bounded JSON audit log file.
//!
//! Keeps the most recent `max_entries` evaluations, newest-first, and
//! rewrites the whole JSON array on every record. The file is small by
//! construction (hundreds of entries), so a full rewrite keeps the
//! on-disk shape human-inspectable without a compaction step.

use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use super::{AuditEntry, AuditSink};
use crate::{AppError, Result};

/// Default retention count for audit entries.
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// A capped, newest-first JSON-array audit log.
pub struct JsonAuditLog {
    path: PathBuf,
    max_entries: usize,
    entries: Mutex<VecDeque<AuditEntry>>,
}

impl JsonAuditLog {
    /// Open (or create) the audit log at `path`, retaining `max_entries`.
    ///
    /// Existing entries are loaded so retention carries across restarts.
    /// An unreadable or corrupt file is treated as empty with a warning,
    /// never a startup failure.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Audit`] if the parent directory cannot be
    /// created.
    pub fn open(path: PathBuf, max_entries: usize) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                AppError::Audit(format!(
                    "failed to create audit log directory {}: {err}",
                    parent.display()
                ))
            })?;
        }

        let mut entries: VecDeque<AuditEntry> = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<AuditEntry>>(&raw) {
                Ok(list) => list.into(),
                Err(err) => {
                    warn!(%err, path = %path.display(), "corrupt audit log; starting empty");
                    VecDeque::new()
                }
            },
            Err(_) => VecDeque::new(),
        };
        entries.truncate(max_entries);

        Ok(Self {
            path,
            max_entries,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &VecDeque<AuditEntry>) -> Result<()> {
        let list: Vec<&AuditEntry> = entries.iter().collect();
        let raw = serde_json::to_string_pretty(&list)
            .map_err(|err| AppError::Audit(format!("failed to serialize audit log: {err}")))?;
        fs::write(&self.path, raw).map_err(|err| {
            AppError::Audit(format!(
                "failed to write audit log {}: {err}",
                self.path.display()
            ))
        })
    }
}

impl AuditSink for JsonAuditLog {
    fn record(&self, entry: AuditEntry) -> Result<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| AppError::Audit("audit log mutex poisoned".into()))?;
        guard.push_front(entry);
        guard.truncate(self.max_entries);
        self.persist(&guard)
    }

    fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .map(|guard| guard.iter().cloned().collect())
            .unwrap_or_default()
    }
}
