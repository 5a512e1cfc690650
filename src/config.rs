//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

/// Identity fields for the owner on whose behalf the agent triages.
///
/// First/last name and handle seed the dynamic keyword set; the saved
/// channel is where notifications and briefings are delivered.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct OwnerConfig {
    /// Owner's first name (keyword seed).
    #[serde(default)]
    pub first_name: String,
    /// Owner's last name (keyword seed).
    #[serde(default)]
    pub last_name: String,
    /// Owner's chat handle, without any `@` prefix (keyword seed).
    #[serde(default)]
    pub handle: String,
    /// Conversation identity of the owner's own saved/self channel.
    pub saved_channel_id: String,
}

/// Tunables for the triage decision gate and context construction.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TriageConfig {
    /// Minimum priority (0–10 scale, higher is more urgent) for a task
    /// to be created. `action_required` evaluations bypass this gate.
    #[serde(default = "default_priority_threshold")]
    pub priority_threshold: u8,
    /// Number of recent conversation messages passed to the oracle.
    #[serde(default = "default_context_window")]
    pub context_window: usize,
    /// Number of past-task examples per section of the memory digest.
    #[serde(default = "default_memory_examples")]
    pub memory_examples: usize,
}

fn default_priority_threshold() -> u8 {
    4
}

fn default_context_window() -> usize {
    10
}

fn default_memory_examples() -> usize {
    5
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            priority_threshold: default_priority_threshold(),
            context_window: default_context_window(),
            memory_examples: default_memory_examples(),
        }
    }
}

/// Briefing scheduler settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct BriefingConfig {
    /// Hours between briefing compositions.
    #[serde(default = "default_briefing_interval_hours")]
    pub interval_hours: u64,
}

fn default_briefing_interval_hours() -> u64 {
    24
}

impl Default for BriefingConfig {
    fn default() -> Self {
        Self {
            interval_hours: default_briefing_interval_hours(),
        }
    }
}

fn default_audit_max_entries() -> usize {
    500
}

fn default_http_port() -> u16 {
    8000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".taskscout")
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Owner identity and self-channel settings.
    pub owner: OwnerConfig,
    /// Operator-configured relevance keywords (case-insensitive).
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Triage gate and context tunables.
    #[serde(default)]
    pub triage: TriageConfig,
    /// Briefing scheduler settings.
    #[serde(default)]
    pub briefing: BriefingConfig,
    /// Directory holding the database, audit log, and discussion archive.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Maximum retained audit entries.
    #[serde(default = "default_audit_max_entries")]
    pub audit_max_entries: usize,
    /// HTTP port for the dashboard API.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Classification oracle API key (populated at runtime).
    #[serde(skip)]
    pub oracle_api_key: String,
    /// Chat transport session token (populated at runtime).
    #[serde(skip)]
    pub chat_session_token: String,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load collaborator credentials from OS keychain with env-var fallback.
    ///
    /// Tries the `taskscout` keyring service first, then falls back to the
    /// `ORACLE_API_KEY` / `CHAT_SESSION_TOKEN` environment variables. A
    /// missing credential is not an error: the affected collaborator runs
    /// as a no-op and the condition is logged once at startup.
    pub async fn load_credentials(&mut self) {
        self.oracle_api_key = load_credential("oracle_api_key", "ORACLE_API_KEY")
            .await
            .unwrap_or_default();
        if self.oracle_api_key.is_empty() {
            warn!("oracle credential missing; triage will run with a no-op oracle");
        }

        self.chat_session_token = load_credential("chat_session_token", "CHAT_SESSION_TOKEN")
            .await
            .unwrap_or_default();
        if self.chat_session_token.is_empty() {
            warn!("chat session token missing; transport runs in local-only mode");
        }
    }

    /// Path of the `SQLite` database backing the task store.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("tasks.db")
    }

    /// Path of the ring-bounded audit log file.
    #[must_use]
    pub fn audit_log_path(&self) -> PathBuf {
        self.data_dir.join("audit_log.json")
    }

    /// Path of the discussion archive file (daily summaries by date).
    #[must_use]
    pub fn discussion_archive_path(&self) -> PathBuf {
        self.data_dir.join("discussion_archive.json")
    }

    fn validate(&self) -> Result<()> {
        if self.owner.saved_channel_id.is_empty() {
            return Err(AppError::Config(
                "owner.saved_channel_id must not be empty".into(),
            ));
        }
        if self.triage.priority_threshold > crate::models::evaluation::PRIORITY_MAX {
            return Err(AppError::Config(
                "triage.priority_threshold must be within 0..=10".into(),
            ));
        }
        if self.triage.context_window == 0 {
            return Err(AppError::Config(
                "triage.context_window must be greater than zero".into(),
            ));
        }
        if self.briefing.interval_hours == 0 {
            return Err(AppError::Config(
                "briefing.interval_hours must be greater than zero".into(),
            ));
        }
        if self.audit_max_entries == 0 {
            return Err(AppError::Config(
                "audit_max_entries must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Option<String> {
    let key = keyring_key.to_owned();

    // Keyring is synchronous I/O; keep it off the async worker threads.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new("taskscout", &key).and_then(|entry| entry.get_password())
    })
    .await;

    match keychain_result {
        Ok(Ok(value)) if !value.is_empty() => return Some(value),
        Ok(Ok(_)) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Ok(Err(err)) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
        Err(err) => {
            warn!(key = keyring_key, %err, "keychain task panicked, trying env var");
        }
    }

    env::var(env_key).ok().filter(|v| !v.is_empty())
}
