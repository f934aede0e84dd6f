//! Remote data client for the hosted Postgres backend.
//!
//! The façade talks to the backend through the `RemoteStore` trait; the
//! production implementation is `RestClient`, a thin PostgREST client.
//! Rows cross this boundary as raw JSON values; typed mapping lives with
//! the models.

pub mod client;
pub mod error;
#[cfg(test)]
pub(crate) mod mock;

pub use client::RestClient;
pub use error::RemoteError;

use async_trait::async_trait;
use serde_json::Value;

/// Sort direction for a select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Projection, filtering, and ordering for a select.
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    /// Comma-separated projection; `None` selects all columns
    pub columns: Option<String>,
    /// Equality filter on a single column
    pub filter: Option<(String, String)>,
    /// Ordering column and direction
    pub order: Option<(String, Direction)>,
}

impl SelectQuery {
    /// Select all columns, unfiltered and unordered.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = Some(columns.to_string());
        self
    }

    pub fn filter_eq(mut self, column: &str, value: &str) -> Self {
        self.filter = Some((column.to_string(), value.to_string()));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }
}

/// CRUD operations against the backend collections.
///
/// Implementations own transport-level concerns (timeouts, authentication);
/// callers own error policy. Rows are JSON objects keyed by backend column
/// names.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn select(&self, table: &str, query: SelectQuery) -> Result<Vec<Value>, RemoteError>;

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<(), RemoteError>;

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), RemoteError>;

    async fn delete(&self, table: &str, id: &str) -> Result<(), RemoteError>;
}
