//! `SQLite`-backed document store.
//!
//! Emulates the page-oriented document database with a single table
//! keeping the property map as a JSON column. Schema bootstrap uses
//! `CREATE TABLE IF NOT EXISTS` — safe to re-run on every startup.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::document::DocumentStore;
use super::record::TaskRecord;
use crate::{AppError, Result};

/// Connect to the on-disk database, creating file and schema as needed.
///
/// # Errors
///
/// Returns `AppError::Db` if the connection or schema bootstrap fails.
pub async fn connect(path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| AppError::Db(format!("failed to create db dir: {err}")))?;
    }
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    bootstrap_schema(&pool).await?;
    Ok(pool)
}

/// Connect to an in-memory database (tests) and apply the schema.
///
/// # Errors
///
/// Returns `AppError::Db` if the connection or schema bootstrap fails.
pub async fn connect_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    bootstrap_schema(&pool).await?;
    Ok(pool)
}

async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS page (
            id          TEXT PRIMARY KEY NOT NULL,
            properties  TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct PageRow {
    id: String,
    properties: String,
}

impl PageRow {
    fn into_record(self) -> Result<TaskRecord> {
        let properties: BTreeMap<String, Value> = serde_json::from_str(&self.properties)
            .map_err(|err| AppError::Db(format!("invalid properties json: {err}")))?;
        Ok(TaskRecord {
            id: self.id,
            properties,
        })
    }
}

/// Document store backed by a local `SQLite` database.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    /// Create a new store over an already connected pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn create_page(&self, record: &TaskRecord) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let properties = serde_json::to_string(&record.properties)
            .map_err(|err| AppError::Db(format!("failed to encode properties: {err}")))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO page (id, properties, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
        )
        .bind(&id)
        .bind(&properties)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn retrieve(&self, id: &str) -> Result<Option<TaskRecord>> {
        let row: Option<PageRow> = sqlx::query_as("SELECT id, properties FROM page WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(PageRow::into_record).transpose()
    }

    async fn search(&self) -> Result<Vec<TaskRecord>> {
        let rows: Vec<PageRow> =
            sqlx::query_as("SELECT id, properties FROM page ORDER BY updated_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(PageRow::into_record).collect()
    }

    async fn update_property(&self, id: &str, key: &str, value: Value) -> Result<bool> {
        let Some(mut record) = self.retrieve(id).await? else {
            return Ok(false);
        };
        record.properties.insert(key.to_owned(), value);

        let properties = serde_json::to_string(&record.properties)
            .map_err(|err| AppError::Db(format!("failed to encode properties: {err}")))?;
        let now = Utc::now().to_rfc3339();

        let result =
            sqlx::query("UPDATE page SET properties = ?1, updated_at = ?2 WHERE id = ?3")
                .bind(&properties)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
