//! Document-store record schema (version 1).
//!
//! The external document database exposes pages as key-typed property
//! maps. This module owns the property-naming contract so the triage
//! core never touches external field names. Comments are encoded into a
//! single text property as `[id] YYYY-MM-DD HH:MM:SS sender: text`
//! lines, matching the mirror database's column format.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::task::{Comment, NewTask, Task, TaskStatus};

/// Version of the property schema below. Bump when property names or
/// encodings change so store adapters can migrate.
pub const SCHEMA_VERSION: u32 = 1;

/// Title property holding the task summary.
pub const PROP_NAME: &str = "Name";
/// Status property (`active` / `done` / `rejected`).
pub const PROP_STATUS: &str = "Status";
/// Numeric priority property.
pub const PROP_PRIORITY: &str = "Priority";
/// Sender display-name property.
pub const PROP_SENDER: &str = "Sender";
/// Canonical source-link property (dedup key).
pub const PROP_LINK: &str = "Link";
/// Free-text deadline property.
pub const PROP_DEADLINE: &str = "Deadline";
/// Encoded comment-thread property.
pub const PROP_COMMENTS: &str = "AgentComments";
/// Creation timestamp property (RFC 3339).
pub const PROP_CREATED_AT: &str = "CreatedAt";

/// Maximum stored length of the encoded comment thread, in characters.
const COMMENTS_MAX_CHARS: usize = 2000;

/// A page in the document store: an identifier plus a property map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskRecord {
    /// Store-assigned page identifier (empty before creation).
    pub id: String,
    /// Key-typed property values.
    pub properties: BTreeMap<String, Value>,
}

impl TaskRecord {
    /// Build the property map for a task being created.
    #[must_use]
    pub fn from_new_task(new: &NewTask) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(PROP_NAME.to_owned(), Value::from(new.summary.clone()));
        properties.insert(
            PROP_STATUS.to_owned(),
            Value::from(TaskStatus::Active.as_str()),
        );
        properties.insert(PROP_PRIORITY.to_owned(), Value::from(new.priority));
        properties.insert(PROP_SENDER.to_owned(), Value::from(new.sender.clone()));
        properties.insert(
            PROP_LINK.to_owned(),
            new.link.clone().map_or(Value::Null, Value::from),
        );
        properties.insert(
            PROP_DEADLINE.to_owned(),
            new.deadline.clone().map_or(Value::Null, Value::from),
        );
        properties.insert(PROP_COMMENTS.to_owned(), Value::from(""));
        properties.insert(
            PROP_CREATED_AT.to_owned(),
            Value::from(Utc::now().to_rfc3339()),
        );
        Self {
            id: String::new(),
            properties,
        }
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Convert the record into the internal task representation.
    ///
    /// Extraction is lossy by design: missing or hand-mangled properties
    /// degrade to defaults instead of failing the whole listing.
    #[must_use]
    pub fn to_task(&self) -> Task {
        let status = self
            .text(PROP_STATUS)
            .map_or(TaskStatus::Active, TaskStatus::parse_lossy);
        let priority = self
            .properties
            .get(PROP_PRIORITY)
            .and_then(Value::as_u64)
            .map_or(0, |p| u8::try_from(p.min(10)).unwrap_or(10));
        let created_at = self
            .text(PROP_CREATED_AT)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc));

        Task {
            id: self.id.clone(),
            summary: self.text(PROP_NAME).unwrap_or("Untitled").to_owned(),
            priority,
            sender: self.text(PROP_SENDER).unwrap_or("Unknown").to_owned(),
            link: self.text(PROP_LINK).map(str::to_owned),
            deadline: self.text(PROP_DEADLINE).map(str::to_owned),
            status,
            comments: parse_comments(self.text(PROP_COMMENTS).unwrap_or_default()),
            created_at,
        }
    }

    /// The raw encoded comment thread, append-order.
    #[must_use]
    pub fn comments_text(&self) -> String {
        self.text(PROP_COMMENTS).unwrap_or_default().to_owned()
    }

    /// The canonical source link, if set.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.text(PROP_LINK)
    }
}

fn comment_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // pattern is a compile-time literal
        Regex::new(r"^\[(.*?)\] (\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) (.*?): (.*)$").unwrap()
    })
}

/// Append a comment line to an encoded thread, capping total length.
#[must_use]
pub fn append_comment_line(existing: &str, comment: &Comment) -> String {
    let line = format!(
        "[{}] {} {}: {}",
        comment.id, comment.timestamp, comment.sender, comment.text
    );
    let joined = if existing.is_empty() {
        line
    } else {
        format!("{existing}\n{line}")
    };
    joined.chars().take(COMMENTS_MAX_CHARS).collect()
}

/// Remove the line carrying `comment_id` from an encoded thread.
///
/// Returns `None` when no line matched.
#[must_use]
pub fn remove_comment_line(existing: &str, comment_id: &str) -> Option<String> {
    let needle = format!("[{comment_id}]");
    let kept: Vec<&str> = existing
        .lines()
        .filter(|line| !line.contains(&needle))
        .collect();
    if kept.len() == existing.lines().count() {
        None
    } else {
        Some(kept.join("\n"))
    }
}

/// Parse an encoded comment thread into structured comments, newest-first.
///
/// Lines that do not match the expected format are preserved as comments
/// with unknown metadata rather than dropped.
#[must_use]
pub fn parse_comments(encoded: &str) -> Vec<Comment> {
    let mut comments: Vec<Comment> = Vec::new();
    for line in encoded.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(caps) = comment_line_re().captures(line) {
            let group = |i: usize| caps.get(i).map_or("", |m| m.as_str()).to_owned();
            comments.push(Comment {
                id: group(1),
                timestamp: group(2),
                sender: group(3),
                text: group(4),
            });
        } else {
            comments.push(Comment {
                id: "unknown".to_owned(),
                timestamp: String::new(),
                sender: "Unknown".to_owned(),
                text: line.to_owned(),
            });
        }
    }
    comments.reverse();
    comments
}
