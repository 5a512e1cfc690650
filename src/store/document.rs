//! Document-store boundary.
//!
//! The durable task store is an external document database reached
//! through this trait. The bundled [`super::sqlite::SqliteDocumentStore`]
//! backend implements it locally; a remote adapter would live outside
//! this crate and speak the same page-oriented contract.

use async_trait::async_trait;
use serde_json::Value;

use super::record::TaskRecord;
use crate::Result;

/// Page-oriented CRUD over the durable task store.
///
/// Implementations must be [`Send`] and [`Sync`] to allow sharing across
/// async task boundaries via [`std::sync::Arc`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a page from `record.properties` and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails.
    async fn create_page(&self, record: &TaskRecord) -> Result<String>;

    /// Retrieve a single page by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails. A missing page is
    /// `Ok(None)`, not an error.
    async fn retrieve(&self, id: &str) -> Result<Option<TaskRecord>>;

    /// Fetch all pages, most recently edited first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    async fn search(&self) -> Result<Vec<TaskRecord>>;

    /// Overwrite a single property on a page.
    ///
    /// Returns `false` when the page does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the update fails.
    async fn update_property(&self, id: &str, key: &str, value: Value) -> Result<bool>;
}
