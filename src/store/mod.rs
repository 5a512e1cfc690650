//! Task store façade: lifecycle, comments, and preference-learning reads.
//!
//! All reads and writes delegate to a [`DocumentStore`]. The façade owns
//! the task-level contract: idempotent status transitions, priority
//! coerced into the valid range, unique comment ids within a task, and
//! "not found" as a logged non-fatal result — the external store may be
//! eventually consistent or momentarily unreachable.

pub mod document;
pub mod record;
pub mod sqlite;

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::models::evaluation::PRIORITY_MAX;
use crate::models::task::{Comment, NewTask, Task, TaskStatus};
use crate::Result;

pub use document::DocumentStore;
pub use sqlite::SqliteDocumentStore;

/// Active tasks surfaced in a daily briefing.
#[derive(Debug, Clone, Default)]
pub struct BriefingTasks {
    /// Top active tasks by priority, highest first (at most three).
    pub top: Vec<Task>,
    /// All active tasks carrying a deadline.
    pub with_deadlines: Vec<Task>,
}

/// Number of top-priority tasks included in a briefing.
const BRIEFING_TOP_COUNT: usize = 3;

/// Façade over the durable task store.
#[derive(Clone)]
pub struct TaskStore {
    docs: Arc<dyn DocumentStore>,
}

impl TaskStore {
    /// Create a façade over the given document store.
    #[must_use]
    pub fn new(docs: Arc<dyn DocumentStore>) -> Self {
        Self { docs }
    }

    /// Persist a new task with status `active`.
    ///
    /// Priority is coerced into `0..=10` before the write.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store write fails.
    pub async fn create(&self, mut new: NewTask) -> Result<Task> {
        new.priority = new.priority.min(PRIORITY_MAX);
        let record = record::TaskRecord::from_new_task(&new);
        let id = self.docs.create_page(&record).await?;
        info!(task_id = %id, summary = %new.summary, "task created");

        let mut task = record.to_task();
        task.id = id;
        Ok(task)
    }

    /// Fetch all tasks, most recently edited first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store read fails.
    pub async fn list_all(&self) -> Result<Vec<Task>> {
        let records = self.docs.search().await?;
        Ok(records.iter().map(record::TaskRecord::to_task).collect())
    }

    /// Fetch a single task by id. A missing task is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store read fails.
    pub async fn get(&self, id: &str) -> Result<Option<Task>> {
        let record = self.docs.retrieve(id).await?;
        Ok(record.map(|r| r.to_task()))
    }

    /// Apply a status transition, enforcing the lifecycle state machine.
    ///
    /// Returns `true` when the status was written (or already held, for
    /// idempotency). A missing task or an illegal transition logs a
    /// warning and returns `false`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if a store operation fails.
    pub async fn set_status(&self, id: &str, status: TaskStatus) -> Result<bool> {
        let Some(record) = self.docs.retrieve(id).await? else {
            warn!(task_id = %id, "set_status: task not found");
            return Ok(false);
        };
        let current = record.to_task().status;
        if current == status {
            return Ok(true);
        }
        if !current.can_transition_to(status) {
            warn!(
                task_id = %id,
                from = current.as_str(),
                to = status.as_str(),
                "set_status: transition not permitted"
            );
            return Ok(false);
        }
        self.docs
            .update_property(id, record::PROP_STATUS, Value::from(status.as_str()))
            .await
    }

    /// Overwrite a task's priority, coerced into `0..=10`.
    ///
    /// Returns `false` (logged) when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store write fails.
    pub async fn set_priority(&self, id: &str, priority: i64) -> Result<bool> {
        let coerced = u8::try_from(priority.clamp(0, i64::from(PRIORITY_MAX))).unwrap_or(0);
        let updated = self
            .docs
            .update_property(id, record::PROP_PRIORITY, Value::from(coerced))
            .await?;
        if !updated {
            warn!(task_id = %id, "set_priority: task not found");
        }
        Ok(updated)
    }

    /// Append a comment to a task's thread.
    ///
    /// Returns the created comment, or `None` (logged) when the task does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if a store operation fails.
    pub async fn add_comment(
        &self,
        id: &str,
        text: String,
        sender: String,
    ) -> Result<Option<Comment>> {
        let Some(record) = self.docs.retrieve(id).await? else {
            warn!(task_id = %id, "add_comment: task not found");
            return Ok(None);
        };
        let comment = Comment::new(sender, text);
        let encoded = record::append_comment_line(&record.comments_text(), &comment);
        self.docs
            .update_property(id, record::PROP_COMMENTS, Value::from(encoded))
            .await?;
        Ok(Some(comment))
    }

    /// Delete a comment by id from a task's thread.
    ///
    /// Returns `false` (logged) when the task or comment does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if a store operation fails.
    pub async fn delete_comment(&self, id: &str, comment_id: &str) -> Result<bool> {
        let Some(record) = self.docs.retrieve(id).await? else {
            warn!(task_id = %id, "delete_comment: task not found");
            return Ok(false);
        };
        let Some(encoded) = record::remove_comment_line(&record.comments_text(), comment_id)
        else {
            warn!(task_id = %id, comment_id, "delete_comment: comment not found");
            return Ok(false);
        };
        self.docs
            .update_property(id, record::PROP_COMMENTS, Value::from(encoded))
            .await
    }

    /// Fetch a task's comments, newest-first. Missing task yields empty.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store read fails.
    pub async fn comments(&self, id: &str) -> Result<Vec<Comment>> {
        let Some(record) = self.docs.retrieve(id).await? else {
            return Ok(Vec::new());
        };
        Ok(record::parse_comments(&record.comments_text()))
    }

    /// Look up an existing task id by its dedup link.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store read fails.
    pub async fn find_by_link(&self, link: &str) -> Result<Option<String>> {
        let records = self.docs.search().await?;
        Ok(records
            .into_iter()
            .find(|r| r.link() == Some(link))
            .map(|r| r.id))
    }

    /// Most recently completed tasks, for the memory digest.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store read fails.
    pub async fn recent_done(&self, limit: usize) -> Result<Vec<Task>> {
        self.by_status(TaskStatus::Done, limit).await
    }

    /// Recent accepted (done) examples with sender and comments.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store read fails.
    pub async fn accepted_examples(&self, limit: usize) -> Result<Vec<Task>> {
        self.by_status(TaskStatus::Done, limit).await
    }

    /// Recent rejected examples with sender and comments.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store read fails.
    pub async fn rejected_examples(&self, limit: usize) -> Result<Vec<Task>> {
        self.by_status(TaskStatus::Rejected, limit).await
    }

    async fn by_status(&self, status: TaskStatus, limit: usize) -> Result<Vec<Task>> {
        let tasks = self.list_all().await?;
        Ok(tasks
            .into_iter()
            .filter(|t| t.status == status)
            .take(limit)
            .collect())
    }

    /// Active tasks worth surfacing in the daily briefing: the top three
    /// by priority plus every active task carrying a deadline.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store read fails.
    pub async fn daily_briefing_tasks(&self) -> Result<BriefingTasks> {
        let mut active: Vec<Task> = self
            .list_all()
            .await?
            .into_iter()
            .filter(|t| t.status == TaskStatus::Active)
            .collect();

        let with_deadlines: Vec<Task> = active
            .iter()
            .filter(|t| t.deadline.is_some())
            .cloned()
            .collect();

        active.sort_by(|a, b| b.priority.cmp(&a.priority));
        active.truncate(BRIEFING_TOP_COUNT);

        Ok(BriefingTasks {
            top: active,
            with_deadlines,
        })
    }
}
