//! REST client for a Supabase-style PostgREST endpoint.
//!
//! Tables are addressed as `{base}/rest/v1/{table}`; filters use the
//! `column=eq.value` query convention and writes send
//! `Prefer: return=minimal` since callers never consume write responses.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;

use super::{Direction, RemoteError, RemoteStore, SelectQuery};

/// HTTP request timeout in seconds.
/// Long enough for photo payload transfers, short enough to fail visibly.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// REST client for the hosted backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RemoteError> {
        Self::new(&config.base_url, &config.api_key)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json")
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(RemoteError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl RemoteStore for RestClient {
    async fn select(&self, table: &str, query: SelectQuery) -> Result<Vec<Value>, RemoteError> {
        let mut request = self
            .request(self.client.get(self.table_url(table)))
            .query(&[("select", query.columns.as_deref().unwrap_or("*"))]);

        if let Some((column, value)) = &query.filter {
            request = request.query(&[(column.as_str(), format!("eq.{}", value))]);
        }
        if let Some((column, direction)) = &query.order {
            let direction = match direction {
                Direction::Ascending => "asc",
                Direction::Descending => "desc",
            };
            request = request.query(&[("order", format!("{}.{}", column, direction))]);
        }

        let response = Self::check(request.send().await?).await?;
        let rows: Vec<Value> = response.json().await?;
        debug!(table, count = rows.len(), "Selected rows");
        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<(), RemoteError> {
        let request = self
            .request(self.client.post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(&rows);

        Self::check(request.send().await?).await?;
        debug!(table, count = rows.len(), "Inserted rows");
        Ok(())
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), RemoteError> {
        let request = self
            .request(self.client.patch(self.table_url(table)))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(&patch);

        Self::check(request.send().await?).await?;
        debug!(table, id, "Updated row");
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), RemoteError> {
        let request = self
            .request(self.client.delete(self.table_url(table)))
            .query(&[("id", format!("eq.{}", id))]);

        Self::check(request.send().await?).await?;
        debug!(table, id, "Deleted row");
        Ok(())
    }
}
