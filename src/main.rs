#![forbid(unsafe_code)]

//! `taskscout` — chat triage agent binary.
//!
//! Bootstraps configuration, the task store, the audit log, and the
//! triage pipeline; serves the dashboard API; feeds events from stdin
//! (the local transport) until shutdown.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use taskscout::audit::{AuditSink, JsonAuditLog};
use taskscout::briefing::{
    spawn_briefing_task, BriefingComposer, DiscussionArchive, DiscussionBuffer,
};
use taskscout::config::GlobalConfig;
use taskscout::context::ContextBuilder;
use taskscout::notify::{Notifier, OwnerNotifier};
use taskscout::oracle::{NullOracle, Oracle};
use taskscout::pipeline::Pipeline;
use taskscout::relevance::KeywordSet;
use taskscout::server::{self, ApiState};
use taskscout::store::{sqlite, SqliteDocumentStore, TaskStore};
use taskscout::transport::{stdio, ChatTransport, NullTransport};
use taskscout::triage::TriageEngine;
use taskscout::{AppError, Result};

/// Grace period for in-flight work after the shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "taskscout", about = "Chat triage agent", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the configured data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("taskscout bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = GlobalConfig::load_from_path(&args.config)?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    config.load_credentials().await;
    let config = Arc::new(config);
    info!("configuration loaded");

    // ── Persistence and audit ───────────────────────────
    let pool = sqlite::connect(&config.db_path()).await?;
    let store = TaskStore::new(Arc::new(SqliteDocumentStore::new(pool)));
    info!("task store connected");

    let audit: Arc<dyn AuditSink> = Arc::new(JsonAuditLog::open(
        config.audit_log_path(),
        config.audit_max_entries,
    )?);

    // ── External collaborators ──────────────────────────
    // The real chat connector and LLM adapter live outside this crate;
    // without credentials both degrade to configured no-ops.
    let transport: Arc<dyn ChatTransport> = Arc::new(NullTransport::new());
    let oracle: Arc<dyn Oracle> = Arc::new(NullOracle::new());
    let notifier: Arc<dyn Notifier> = Arc::new(OwnerNotifier::new(
        Arc::clone(&transport),
        config.owner.saved_channel_id.clone(),
    ));

    // ── Assemble the pipeline ───────────────────────────
    let keywords = KeywordSet::from_config(&config);
    let buffer = Arc::new(DiscussionBuffer::new());
    let context = ContextBuilder::new(Arc::clone(&transport), store.clone(), &config.triage);
    let engine = TriageEngine::new(
        Arc::clone(&oracle),
        store.clone(),
        Arc::clone(&audit),
        &config.triage,
    );
    let pipeline = Arc::new(Pipeline::new(
        keywords,
        context,
        engine,
        Arc::clone(&buffer),
        Arc::clone(&notifier),
    ));

    // ── Background tasks ────────────────────────────────
    let ct = CancellationToken::new();

    let composer = Arc::new(BriefingComposer::new(
        store.clone(),
        Arc::clone(&oracle),
        Arc::clone(&buffer),
        DiscussionArchive::new(config.discussion_archive_path()),
    ));
    let briefing_handle = spawn_briefing_task(
        composer,
        Arc::clone(&notifier),
        config.briefing.interval_hours,
        ct.clone(),
    );
    info!("briefing scheduler started");

    let api_state = Arc::new(ApiState {
        store: store.clone(),
        notifier: Arc::clone(&notifier),
        buffer: Arc::clone(&buffer),
        archive: Arc::new(DiscussionArchive::new(config.discussion_archive_path())),
    });
    let server_ct = ct.clone();
    let http_port = config.http_port;
    let server_handle = tokio::spawn(async move {
        if let Err(err) = server::serve(api_state, http_port, server_ct).await {
            error!(%err, "dashboard server failed");
        }
    });

    let stdin_ct = ct.clone();
    let stdin_pipeline = Arc::clone(&pipeline);
    let stdin_handle = tokio::spawn(async move {
        if let Err(err) = stdio::serve_stdin(stdin_pipeline, stdin_ct).await {
            error!(%err, "stdin event source failed");
        }
    });

    // Startup banner, best-effort.
    if let Err(err) = notifier.notify_owner("Taskscout started and listening.").await {
        warn!(%err, "startup notification failed");
    }

    info!("taskscout ready");

    // ── Wait for shutdown signal ────────────────────────
    shutdown_signal().await;
    info!("shutdown signal received");
    ct.cancel();

    // Bounded grace period: in-flight triage operations hold no partial
    // store state, so timing out here cannot corrupt the task store.
    let joined = tokio::time::timeout(
        SHUTDOWN_GRACE,
        async {
            let _ = tokio::join!(briefing_handle, server_handle, stdin_handle);
        },
    )
    .await;
    if joined.is_err() {
        warn!("grace period elapsed; aborting remaining background tasks");
    }

    info!("taskscout shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
