use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{HistoryResponse, RosterResponse, RoundScore};
use crate::flow::EntityId;

/// Public fantasy-football API used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://fantasy.premierleague.com/api";
/// Listing resource: one entry per tracked entity.
pub const DEFAULT_ROSTER_PATH: &str = "/bootstrap-static/";
/// Detail resource; `{id}` is replaced with the entity identifier.
pub const DEFAULT_HISTORY_PATH: &str = "/element-summary/{id}/";

/// Read access to the two resources the pipeline needs: the entity roster
/// and one scoring history per entity. Implemented by [`StatsClient`] and
/// by in-memory sources in the demo and in tests.
#[allow(async_fn_in_trait)]
pub trait ScoreSource {
    async fn roster(&self) -> Result<Vec<EntityId>, ApiError>;
    async fn history(&self, id: EntityId) -> Result<Vec<RoundScore>, ApiError>;
}

/// HTTP client for the stats API.
#[derive(Debug, Clone)]
pub struct StatsClient {
    client: Client,
    base_url: String,
    roster_path: String,
    history_path: String,
}

impl StatsClient {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Build a client against an alternate base URL, e.g. a mock server in tests.
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: base_url.into(),
            roster_path: DEFAULT_ROSTER_PATH.to_string(),
            history_path: DEFAULT_HISTORY_PATH.to_string(),
        }
    }

    /// Override the endpoint paths relative to the base URL.
    pub fn with_paths(
        mut self,
        roster_path: impl Into<String>,
        history_path: impl Into<String>,
    ) -> Self {
        self.roster_path = roster_path.into();
        self.history_path = history_path.into();
        self
    }

    fn roster_url(&self) -> String {
        format!("{}{}", self.base_url, self.roster_path)
    }

    fn history_url(&self, id: EntityId) -> String {
        let path = self.history_path.replace("{id}", &id.to_string());
        format!("{}{}", self.base_url, path)
    }

    /// GET a resource and decode it, keeping transport, status and schema
    /// failures apart so the caller sees which layer broke.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Schema {
            url: url.to_string(),
            source,
        })
    }
}

impl ScoreSource for StatsClient {
    async fn roster(&self) -> Result<Vec<EntityId>, ApiError> {
        let response: RosterResponse = self.get_json(&self.roster_url()).await?;
        Ok(response.elements.into_iter().map(|e| e.id).collect())
    }

    async fn history(&self, id: EntityId) -> Result<Vec<RoundScore>, ApiError> {
        let response: HistoryResponse = self.get_json(&self.history_url(id)).await?;
        Ok(response.history)
    }
}
