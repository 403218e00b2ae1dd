//! Firebase Realtime Database REST client for the games collection.
//!
//! # Wire format
//!
//! - Range query:
//!   `GET {db}/{path}.json?orderBy="lastUpdated"&endAt={cutoff}`.
//!   The body is a JSON object keyed by child key, or `null` when nothing
//!   matches. Requires an `.indexOn: "lastUpdated"` rule on the collection.
//! - Batch delete: `PATCH {db}/{path}.json` with `{"<key>": null, ...}`.
//!   A multi-location update is applied atomically by the database.
//! - Probe: `GET {db}/{path}.json?orderBy="$key"&limitToFirst=1`.
//!
//! # Security
//!
//! The optional auth token travels as the `auth` query parameter. It is held
//! in a `SecretString` and URLs are stripped from client errors before they
//! are logged.

use crate::errors::ReaperError;
use crate::models::{GameKey, GameRecord};
use crate::observability::metrics::record_store_request;
use crate::store::GameStore;
use common::secret::{ExposeSecret, SecretString};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};
use tracing::{error, instrument, warn};

/// Connect timeout for database requests in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Indexed child the range query orders by.
const LAST_UPDATED_FIELD: &str = "\"lastUpdated\"";

/// REST-backed game store.
#[derive(Clone)]
pub struct RtdbGameStore {
    client: Client,
    /// `{db}/{games_path}.json`
    collection_url: String,
    auth_token: Option<SecretString>,
}

impl std::fmt::Debug for RtdbGameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RtdbGameStore")
            .field("collection_url", &self.collection_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl RtdbGameStore {
    /// Create a store for `games_path` under `database_url`.
    ///
    /// # Errors
    ///
    /// Returns `ReaperError::Internal` if the HTTP client cannot be built.
    pub fn new(
        database_url: &str,
        games_path: &str,
        auth_token: Option<SecretString>,
        request_timeout: Duration,
    ) -> Result<Self, ReaperError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                error!(target: "reaper.store", error = %e, "Failed to build HTTP client");
                ReaperError::Internal("failed to build HTTP client".to_string())
            })?;

        Ok(Self {
            client,
            collection_url: collection_url(database_url, games_path),
            auth_token,
        })
    }

    /// URL of the games collection, without credentials.
    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.query(&[("auth", token.expose_secret())]),
            None => request,
        }
    }

    /// Send a request and fail on non-2xx, recording store metrics either way.
    async fn execute(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, ReaperError> {
        let start = Instant::now();
        let result = send_checked(operation, self.with_auth(request)).await;

        let status = match &result {
            Ok(_) => "success",
            Err(e) => e.status_label(),
        };
        record_store_request(operation, status, start.elapsed());

        result
    }
}

async fn send_checked(
    operation: &'static str,
    request: RequestBuilder,
) -> Result<Response, ReaperError> {
    let response = request.send().await.map_err(|e| {
        let e = ReaperError::from(e);
        warn!(target: "reaper.store", operation, error = %e, "Database request failed");
        e
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 401 || status.as_u16() == 403 {
        error!(target: "reaper.store", operation, status = %status, "Database rejected credentials");
    } else {
        let body = response.text().await.unwrap_or_default();
        warn!(target: "reaper.store", operation, status = %status, body = %body, "Unexpected database response");
    }

    Err(ReaperError::UnexpectedStatus {
        operation,
        status: status.as_u16(),
    })
}

fn collection_url(database_url: &str, games_path: &str) -> String {
    format!(
        "{}/{}.json",
        database_url.trim_end_matches('/'),
        games_path.trim_matches('/')
    )
}

#[async_trait::async_trait]
impl GameStore for RtdbGameStore {
    #[instrument(skip_all, name = "reaper.store.find_stale_games", fields(cutoff = cutoff))]
    async fn find_stale_games(
        &self,
        cutoff: i64,
    ) -> Result<Vec<(GameKey, GameRecord)>, ReaperError> {
        let request = self.client.get(&self.collection_url).query(&[
            ("orderBy", LAST_UPDATED_FIELD.to_string()),
            ("endAt", cutoff.to_string()),
        ]);

        let response = self.execute("find_stale_games", request).await?;

        let body: Option<HashMap<String, Value>> = response.json().await.map_err(|e| {
            let e = e.without_url();
            warn!(target: "reaper.store", error = %e, "Failed to parse range query response");
            ReaperError::InvalidResponse("range query body is not a JSON object".to_string())
        })?;

        let mut games: Vec<(GameKey, GameRecord)> = body
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (GameKey::new(key), GameRecord::from_value(value)))
            .collect();

        // The REST API returns an unordered object; restore index order.
        games.sort_by(|(ka, ra), (kb, rb)| {
            ra.last_updated()
                .index_cmp(&rb.last_updated())
                .then_with(|| ka.cmp(kb))
        });

        Ok(games)
    }

    #[instrument(skip_all, name = "reaper.store.delete_games", fields(count = keys.len()))]
    async fn delete_games(&self, keys: &BTreeSet<GameKey>) -> Result<(), ReaperError> {
        if keys.is_empty() {
            return Ok(());
        }

        let updates: Map<String, Value> = keys
            .iter()
            .map(|key| (key.as_str().to_string(), Value::Null))
            .collect();

        let request = self
            .client
            .patch(&self.collection_url)
            .json(&Value::Object(updates));

        self.execute("delete_games", request).await?;
        Ok(())
    }

    #[instrument(skip_all, name = "reaper.store.ping")]
    async fn ping(&self) -> Result<(), ReaperError> {
        let request = self.client.get(&self.collection_url).query(&[
            ("orderBy", "\"$key\""),
            ("limitToFirst", "1"),
        ]);

        self.execute("ping", request).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "rtdb"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url_joins_cleanly() {
        assert_eq!(
            collection_url("https://fairway.firebaseio.com", "games"),
            "https://fairway.firebaseio.com/games.json"
        );
        assert_eq!(
            collection_url("https://fairway.firebaseio.com/", "/games/"),
            "https://fairway.firebaseio.com/games.json"
        );
        assert_eq!(
            collection_url("http://127.0.0.1:9000", "prod/games"),
            "http://127.0.0.1:9000/prod/games.json"
        );
    }

    #[test]
    fn test_debug_redacts_auth_token() {
        let store = RtdbGameStore::new(
            "https://fairway.firebaseio.com",
            "games",
            Some(SecretString::from("db-secret-token")),
            Duration::from_secs(5),
        )
        .unwrap();

        let debug = format!("{:?}", store);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("db-secret-token"));
    }

    #[test]
    fn test_backend_name() {
        let store =
            RtdbGameStore::new("http://localhost", "games", None, Duration::from_secs(1)).unwrap();
        assert_eq!(store.backend_name(), "rtdb");
        assert_eq!(store.collection_url(), "http://localhost/games.json");
    }
}
