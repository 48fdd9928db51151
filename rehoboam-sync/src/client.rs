//! HTTP client for the sync gateway's `tech_tree_states` table.
//!
//! The gateway is a generic REST table (PostgREST dialect): reads filter
//! by owner, writes are batched upserts keyed server-side by
//! (user_id, node_id, effective_year, effective_month). This client is
//! the only place wire rows exist; everything past it speaks
//! [`StateRecord`].

use chrono::{DateTime, Utc};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use rehoboam_core::{AdoptionStatus, StateRecord, YearMonth};

use crate::config::{AuthSession, GatewayConfig};
use crate::error::{Result, SyncError};

const TABLE_PATH: &str = "/rest/v1/tech_tree_states";
const SELECT_COLUMNS: &str = "node_id,status,effective_year,effective_month,updated_at";

/// One wire row of the `tech_tree_states` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateRow {
    /// Owner id; present on writes, not selected on reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub node_id: String,
    pub status: AdoptionStatus,
    #[serde(default)]
    pub effective_year: Option<i32>,
    #[serde(default)]
    pub effective_month: Option<u32>,
    /// ISO-8601 timestamp; absent rows are stamped on arrival.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl StateRow {
    /// Map a fetched row into a state record.
    ///
    /// A missing or unparseable timestamp degrades to "now" rather than
    /// dropping the row.
    pub fn into_record(self) -> StateRecord {
        let updated_at = self
            .updated_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|parsed| parsed.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        let effective = match (self.effective_year, self.effective_month) {
            (Some(year), Some(month)) => Some(YearMonth::new(year, month)),
            _ => None,
        };

        StateRecord {
            node_id: self.node_id,
            status: self.status,
            effective,
            updated_at,
        }
    }

    /// Build the wire row for an owned record.
    pub fn from_record(user_id: &str, record: &StateRecord) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            node_id: record.node_id.clone(),
            status: record.status,
            effective_year: record.effective.map(|e| e.year),
            effective_month: record.effective.map(|e| e.month),
            updated_at: Some(record.updated_at.to_rfc3339()),
        }
    }
}

/// Shape of a gateway error body.
#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// HTTP client for the sync gateway.
pub struct GatewayClient {
    config: GatewayConfig,
    session: Option<AuthSession>,
    client: Client,
}

impl GatewayClient {
    /// Create a new gateway client.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            session: None,
            client,
        })
    }

    /// Attach an authenticated session; its token supersedes the anon key.
    pub fn with_session(mut self, session: AuthSession) -> Self {
        self.session = Some(session);
        self
    }

    fn bearer(&self) -> &str {
        self.session
            .as_ref()
            .map(|s| s.access_token.as_str())
            .unwrap_or(&self.config.anon_key)
    }

    fn table_url(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), TABLE_PATH)
    }

    /// Fetch all adoption records owned by a user.
    pub async fn fetch_states(&self, user_id: &str) -> Result<Vec<StateRecord>> {
        let url = format!(
            "{}?user_id=eq.{}&select={}",
            self.table_url(),
            urlencoding::encode(user_id),
            SELECT_COLUMNS,
        );

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(self.bearer())
            .send()
            .await?;

        let response = Self::check(response).await?;
        let rows: Vec<StateRow> = response.json().await?;
        debug!(user_id, rows = rows.len(), "Fetched adoption records");
        Ok(rows.into_iter().map(StateRow::into_record).collect())
    }

    /// Upsert one adoption record.
    pub async fn upsert_state(&self, user_id: &str, record: &StateRecord) -> Result<()> {
        self.upsert_states(user_id, std::slice::from_ref(record)).await
    }

    /// Upsert a batch of adoption records. Duplicate-keyed rows merge
    /// server-side, so replaying a record is safe.
    pub async fn upsert_states(&self, user_id: &str, records: &[StateRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let payload: Vec<StateRow> = records
            .iter()
            .map(|record| StateRow::from_record(user_id, record))
            .collect();

        let response = self
            .client
            .post(self.table_url())
            .header("apikey", &self.config.anon_key)
            .header("Prefer", "return=minimal,resolution=merge-duplicates")
            .bearer_auth(self.bearer())
            .json(&payload)
            .send()
            .await?;

        Self::check(response).await?;
        debug!(user_id, rows = payload.len(), "Upserted adoption records");
        Ok(())
    }

    /// Turn a non-success response into a structured error.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            return Err(SyncError::Unauthorized(body));
        }

        let parsed: Option<GatewayErrorBody> = serde_json::from_str(&body).ok();
        let (code, message) = match parsed {
            Some(parsed) => (parsed.code, parsed.message.unwrap_or(body)),
            None => (None, body),
        };

        Err(SyncError::Gateway {
            status: status.as_u16(),
            code,
            message,
        })
    }
}
