//! Stdin event source for local runs and piping.
//!
//! Reads one JSON-encoded [`ChatEvent`] per line from stdin and feeds it
//! into the triage pipeline until EOF or cancellation. Malformed lines
//! are logged and skipped; a bad line must never stop the stream.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::models::event::ChatEvent;
use crate::pipeline::Pipeline;
use crate::Result;

/// Serve events from stdin until EOF or the cancellation token fires.
///
/// Each parsed event is handed to the pipeline inline; the per-event
/// concurrency model still holds because stdin delivers events one at a
/// time, matching the one-in-flight-triage-per-event assumption.
///
/// # Errors
///
/// Returns `AppError::Io` if reading from stdin fails.
pub async fn serve_stdin(pipeline: Arc<Pipeline>, ct: CancellationToken) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    info!("stdin event source started");
    loop {
        let line = tokio::select! {
            () = ct.cancelled() => {
                info!("stdin event source shutting down");
                return Ok(());
            }
            line = lines.next_line() => line,
        };

        match line {
            Ok(Some(raw)) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    continue;
                }
                match serde_json::from_str::<ChatEvent>(raw) {
                    Ok(event) => {
                        pipeline.handle_event(event).await;
                    }
                    Err(err) => {
                        warn!(%err, "skipping malformed stdin event");
                    }
                }
            }
            Ok(None) => {
                info!("stdin closed; event source finished");
                return Ok(());
            }
            Err(err) => {
                return Err(crate::AppError::Io(format!("stdin read failed: {err}")));
            }
        }
    }
}
