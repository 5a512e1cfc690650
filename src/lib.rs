#![forbid(unsafe_code)]

//! Taskscout library: chat-event triage with an LLM scoring loop.
//!
//! Ingests chat events, filters them for relevance, scores them via an
//! external classification oracle, deduplicates against the task store,
//! and feeds past task outcomes back into future triage decisions.

pub mod audit;
pub mod briefing;
pub mod config;
pub mod context;
pub mod errors;
pub mod models;
pub mod notify;
pub mod oracle;
pub mod pipeline;
pub mod relevance;
pub mod server;
pub mod store;
pub mod transport;
pub mod triage;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
