//! Persistence seam for completed checklists.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use shared::{error::StoreError, protocol::SubmissionRecord};
use tracing::{info, warn};
use url::Url;

pub const DTO_TABLE: &str = "dto_registros";

const REST_PATH: &str = "rest/v1/";

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, table: &str, record: &SubmissionRecord) -> Result<(), StoreError>;
}

/// Inserts rows through a PostgREST endpoint (`{project_url}/rest/v1/{table}`).
pub struct RestRecordStore {
    http: Client,
    rest_url: Url,
    api_key: String,
}

impl RestRecordStore {
    pub fn new(project_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Self::with_client(Client::new(), project_url, api_key)
    }

    pub fn with_client(
        http: Client,
        project_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let mut base = Url::parse(project_url.trim())
            .with_context(|| format!("invalid persistence service url '{project_url}'"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let rest_url = base
            .join(REST_PATH)
            .with_context(|| format!("failed to derive REST endpoint from '{project_url}'"))?;

        Ok(Self {
            http,
            rest_url,
            api_key: api_key.into(),
        })
    }

    pub fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        self.rest_url
            .join(table)
            .map_err(|err| StoreError::from_message(format!("invalid table name '{table}': {err}")))
    }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn insert(&self, table: &str, record: &SubmissionRecord) -> Result<(), StoreError> {
        let url = self.table_url(table)?;
        let response = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await
            .map_err(|err| {
                warn!(table, "persistence request failed: {err}");
                StoreError::from_message(err.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            info!(table, status = status.as_u16(), "row inserted");
            return Ok(());
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("json"));
        let body = response.text().await.unwrap_or_default();
        let err = decode_error_body(status, is_json, &body);
        warn!(
            table,
            status = status.as_u16(),
            code = err.code.as_deref().unwrap_or("-"),
            "persistence service rejected insert"
        );
        Err(err)
    }
}

fn decode_error_body(status: StatusCode, is_json: bool, body: &str) -> StoreError {
    if is_json {
        if let Ok(err) = serde_json::from_str::<StoreError>(body) {
            return err;
        }
    }

    let body = body.trim();
    if body.is_empty() {
        StoreError::from_message(status.to_string())
    } else {
        StoreError::from_message(body)
    }
}

/// Logs the would-be row instead of sending it.
pub struct DryRunRecordStore;

#[async_trait]
impl RecordStore for DryRunRecordStore {
    async fn insert(&self, table: &str, record: &SubmissionRecord) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&[record])
            .map_err(|err| StoreError::from_message(err.to_string()))?;
        info!(table, %payload, "dry run: insert skipped");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
