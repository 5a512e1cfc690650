//! Dashboard HTTP API.
//!
//! A thin JSON CRUD surface over the task store façade plus read-only
//! views of the discussion buffer and archive. No HTML is rendered; a
//! dashboard frontend is expected to live elsewhere and consume these
//! endpoints.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::briefing::{buffer, DiscussionArchive, DiscussionBuffer};
use crate::models::task::TaskStatus;
use crate::notify::Notifier;
use crate::store::TaskStore;
use crate::{AppError, Result};

/// Shared state handed to every request handler.
pub struct ApiState {
    /// Task store façade.
    pub store: TaskStore,
    /// Owner notification sink for completion messages.
    pub notifier: Arc<dyn Notifier>,
    /// Live discussion buffer.
    pub buffer: Arc<DiscussionBuffer>,
    /// Archived daily discussion summaries.
    pub archive: Arc<DiscussionArchive>,
}

/// Handler for `GET /health` — returns 200 OK with a plain-text body.
async fn health() -> &'static str {
    "ok"
}

fn internal_error(err: &AppError) -> Response {
    warn!(%err, "dashboard request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}

async fn list_tasks(State(state): State<Arc<ApiState>>) -> Response {
    match state.store.list_all().await {
        Ok(tasks) => Json(tasks).into_response(),
        Err(err) => internal_error(&err),
    }
}

async fn set_status(
    state: &ApiState,
    id: &str,
    status: TaskStatus,
) -> std::result::Result<bool, Response> {
    state
        .store
        .set_status(id, status)
        .await
        .map_err(|err| internal_error(&err))
}

async fn mark_done(State(state): State<Arc<ApiState>>, Path(id): Path<String>) -> Response {
    match set_status(&state, &id, TaskStatus::Done).await {
        Ok(true) => {
            // Best-effort completion notification, mirroring the chat-side
            // acknowledgment when a task is closed from the dashboard.
            let summary = match state.store.get(&id).await {
                Ok(Some(task)) => task.summary,
                _ => id.clone(),
            };
            if let Err(err) = state
                .notifier
                .notify_owner(&format!("Task completed: {summary}"))
                .await
            {
                warn!(%err, "completion notification failed");
            }
            Json(json!({ "status": "success", "task": id })).into_response()
        }
        Ok(false) => not_found(&id),
        Err(resp) => resp,
    }
}

async fn reject_task(State(state): State<Arc<ApiState>>, Path(id): Path<String>) -> Response {
    match set_status(&state, &id, TaskStatus::Rejected).await {
        Ok(true) => Json(json!({ "status": "success", "task": id })).into_response(),
        Ok(false) => not_found(&id),
        Err(resp) => resp,
    }
}

async fn reopen_task(State(state): State<Arc<ApiState>>, Path(id): Path<String>) -> Response {
    match set_status(&state, &id, TaskStatus::Active).await {
        Ok(true) => Json(json!({ "status": "success", "task": id })).into_response(),
        Ok(false) => not_found(&id),
        Err(resp) => resp,
    }
}

fn not_found(id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("task {id} not found or transition refused") })),
    )
        .into_response()
}

/// Request body for adding a comment.
#[derive(Debug, Deserialize)]
struct CommentRequest {
    text: String,
    #[serde(default = "default_comment_sender")]
    sender: String,
}

fn default_comment_sender() -> String {
    "User".to_owned()
}

async fn get_comments(State(state): State<Arc<ApiState>>, Path(id): Path<String>) -> Response {
    match state.store.comments(&id).await {
        Ok(comments) => Json(comments).into_response(),
        Err(err) => internal_error(&err),
    }
}

async fn add_comment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(body): Json<CommentRequest>,
) -> Response {
    match state.store.add_comment(&id, body.text, body.sender).await {
        Ok(Some(comment)) => Json(comment).into_response(),
        Ok(None) => not_found(&id),
        Err(err) => internal_error(&err),
    }
}

async fn delete_comment(
    State(state): State<Arc<ApiState>>,
    Path((id, comment_id)): Path<(String, String)>,
) -> Response {
    match state.store.delete_comment(&id, &comment_id).await {
        Ok(true) => Json(json!({ "status": "success" })).into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "comment not found" })),
        )
            .into_response(),
        Err(err) => internal_error(&err),
    }
}

/// Request body for a priority update.
#[derive(Debug, Deserialize)]
struct PriorityRequest {
    priority: i64,
}

async fn update_priority(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(body): Json<PriorityRequest>,
) -> Response {
    match state.store.set_priority(&id, body.priority).await {
        Ok(true) => {
            Json(json!({ "status": "success", "task": id, "priority": body.priority }))
                .into_response()
        }
        Ok(false) => not_found(&id),
        Err(err) => internal_error(&err),
    }
}

async fn discussions_today(State(state): State<Arc<ApiState>>) -> Response {
    let points = state.buffer.snapshot().await;
    let text = if points.is_empty() {
        "No discussions yet.".to_owned()
    } else {
        buffer::grouped_text(&points)
    };
    Json(json!({ "text": text })).into_response()
}

async fn discussions_history(State(state): State<Arc<ApiState>>) -> Response {
    Json(state.archive.history()).into_response()
}

/// Build the dashboard router over the given state.
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tasks", get(list_tasks))
        .route("/api/done/{id}", post(mark_done))
        .route("/api/reject/{id}", post(reject_task))
        .route("/api/reopen/{id}", post(reopen_task))
        .route("/api/comments/{id}", get(get_comments).post(add_comment))
        .route("/api/comments/{id}/{comment_id}", delete(delete_comment))
        .route("/api/priority/{id}", post(update_priority))
        .route("/api/discussions/today", get(discussions_today))
        .route("/api/discussions/history", get(discussions_history))
        .with_state(state)
}

/// Serve the dashboard API until the cancellation token fires.
///
/// # Errors
///
/// Returns `AppError::Config` if the listener fails to bind or the
/// server errors out.
pub async fn serve(state: Arc<ApiState>, port: u16, ct: CancellationToken) -> Result<()> {
    let bind = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|err| AppError::Config(format!("dashboard bind failed: {err}")))?;
    info!(%bind, "dashboard API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(ct.cancelled_owned())
        .await
        .map_err(|err| AppError::Config(format!("dashboard server failed: {err}")))?;

    info!("dashboard API shut down");
    Ok(())
}
