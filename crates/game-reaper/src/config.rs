//! Game Reaper configuration.
//!
//! Configuration is loaded from environment variables. The database auth
//! token is redacted in Debug output.
//!
//! The staleness window and the schedule interval are independent: a record
//! can go stale up to one interval before it is removed.

use crate::tasks::stale_game_reaper::{
    DEFAULT_SCHEDULE_INTERVAL_SECONDS, DEFAULT_STALENESS_WINDOW_SECONDS,
};
use common::config::{self as env, EnvVarError};
use common::secret::SecretString;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default HTTP bind address for health and metrics.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default deployment region.
pub const DEFAULT_REGION: &str = "us-central1";

/// Default path of the games collection inside the database.
pub const DEFAULT_GAMES_PATH: &str = "games";

/// Default per-request timeout for database calls in seconds.
pub const DEFAULT_DATABASE_REQUEST_TIMEOUT_SECONDS: u64 = 10;

/// Default drain period after a shutdown signal in seconds.
pub const DEFAULT_DRAIN_SECONDS: u64 = 5;

/// Which game store implementation to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Firebase Realtime Database over REST.
    Rtdb,
    /// Process-local store; for local development only.
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Rtdb => "rtdb",
            StoreBackend::Memory => "memory",
        }
    }
}

/// Game Reaper configuration.
#[derive(Clone)]
pub struct Config {
    /// Realtime database root URL (e.g. `https://fairway.firebaseio.com`).
    /// Empty for the memory backend.
    pub database_url: String,

    /// Database secret or ID token sent as the `auth` query parameter.
    pub database_auth_token: Option<SecretString>,

    /// Path of the games collection (default: "games").
    pub games_path: String,

    /// Store implementation (default: rtdb).
    pub store_backend: StoreBackend,

    /// Records with `lastUpdated <= now - window` are deleted (default: 300).
    pub staleness_window_seconds: u64,

    /// Seconds between scheduled runs (default: 1200).
    pub schedule_interval_seconds: u64,

    /// Perform a single run and exit instead of scheduling.
    pub run_once: bool,

    /// Expose `POST /v1/reaper/run` to trigger a run over HTTP.
    pub http_trigger_enabled: bool,

    /// Per-request timeout for database calls in seconds (default: 10).
    pub database_request_timeout_seconds: u64,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Deployment region identifier.
    pub region: String,

    /// Seconds to keep serving after a shutdown signal (default: 5).
    pub drain_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field(
                "database_auth_token",
                &self.database_auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("games_path", &self.games_path)
            .field("store_backend", &self.store_backend)
            .field("staleness_window_seconds", &self.staleness_window_seconds)
            .field("schedule_interval_seconds", &self.schedule_interval_seconds)
            .field("run_once", &self.run_once)
            .field("http_trigger_enabled", &self.http_trigger_enabled)
            .field(
                "database_request_timeout_seconds",
                &self.database_request_timeout_seconds,
            )
            .field("bind_address", &self.bind_address)
            .field("region", &self.region)
            .field("drain_seconds", &self.drain_seconds)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] EnvVarError),

    #[error("Invalid DATABASE_URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Invalid GAMES_PATH: {0}")]
    InvalidGamesPath(String),

    #[error("Invalid GAME_STORE: expected 'rtdb' or 'memory', got '{0}'")]
    InvalidStoreBackend(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let store_backend = match vars.get("GAME_STORE").map(|s| s.trim().to_ascii_lowercase()) {
            None => StoreBackend::Rtdb,
            Some(s) if s == "rtdb" => StoreBackend::Rtdb,
            Some(s) if s == "memory" => StoreBackend::Memory,
            Some(other) => return Err(ConfigError::InvalidStoreBackend(other)),
        };

        let database_url = match store_backend {
            StoreBackend::Rtdb => {
                let url = env::required(vars, "DATABASE_URL")?;
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    return Err(ConfigError::InvalidDatabaseUrl(
                        "must start with http:// or https://".to_string(),
                    ));
                }
                if url.contains('?') {
                    return Err(ConfigError::InvalidDatabaseUrl(
                        "must not carry a query string; use DATABASE_AUTH_TOKEN for credentials"
                            .to_string(),
                    ));
                }
                url
            }
            StoreBackend::Memory => env::string_or(vars, "DATABASE_URL", ""),
        };

        let database_auth_token = vars
            .get("DATABASE_AUTH_TOKEN")
            .filter(|token| !token.is_empty())
            .map(|token| SecretString::from(token.clone()));

        let games_path = env::string_or(vars, "GAMES_PATH", DEFAULT_GAMES_PATH)
            .trim_matches('/')
            .to_string();
        if games_path.is_empty() {
            return Err(ConfigError::InvalidGamesPath(
                "must not be empty".to_string(),
            ));
        }
        if games_path
            .chars()
            .any(|c| matches!(c, '.' | '$' | '#' | '[' | ']'))
        {
            return Err(ConfigError::InvalidGamesPath(format!(
                "'{games_path}' contains a character the database forbids in paths"
            )));
        }

        let staleness_window_seconds = env::positive_u64_or(
            vars,
            "REAPER_STALENESS_WINDOW_SECONDS",
            DEFAULT_STALENESS_WINDOW_SECONDS,
        )?;

        let schedule_interval_seconds = env::positive_u64_or(
            vars,
            "REAPER_SCHEDULE_INTERVAL_SECONDS",
            DEFAULT_SCHEDULE_INTERVAL_SECONDS,
        )?;

        let run_once = env::bool_or(vars, "REAPER_RUN_ONCE", false)?;
        let http_trigger_enabled = env::bool_or(vars, "REAPER_HTTP_TRIGGER_ENABLED", false)?;

        let database_request_timeout_seconds = env::positive_u64_or(
            vars,
            "DATABASE_REQUEST_TIMEOUT_SECONDS",
            DEFAULT_DATABASE_REQUEST_TIMEOUT_SECONDS,
        )?;

        let bind_address = env::string_or(vars, "BIND_ADDRESS", DEFAULT_BIND_ADDRESS);
        let region = env::string_or(vars, "REGION", DEFAULT_REGION);
        let drain_seconds = env::u64_or(vars, "DRAIN_SECONDS", DEFAULT_DRAIN_SECONDS)?;

        Ok(Config {
            database_url,
            database_auth_token,
            games_path,
            store_backend,
            staleness_window_seconds,
            schedule_interval_seconds,
            run_once,
            http_trigger_enabled,
            database_request_timeout_seconds,
            bind_address,
            region,
            drain_seconds,
        })
    }

    pub fn staleness_window(&self) -> Duration {
        Duration::from_secs(self.staleness_window_seconds)
    }

    pub fn schedule_interval(&self) -> Duration {
        Duration::from_secs(self.schedule_interval_seconds)
    }

    pub fn database_request_timeout(&self) -> Duration {
        Duration::from_secs(self.database_request_timeout_seconds)
    }

    /// Whether the schedule loop runs less often than the staleness window.
    ///
    /// Stale games can then survive up to one interval past the window.
    /// Always false in run-once mode, where the interval is unused.
    pub fn interval_exceeds_window(&self) -> bool {
        !self.run_once && self.schedule_interval_seconds > self.staleness_window_seconds
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::secret::ExposeSecret;

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([(
            "DATABASE_URL".to_string(),
            "https://fairway-test.firebaseio.com".to_string(),
        )])
    }

    #[test]
    fn test_from_vars_success_with_defaults() {
        let config = Config::from_vars(&base_vars()).expect("Config should load successfully");

        assert_eq!(config.database_url, "https://fairway-test.firebaseio.com");
        assert!(config.database_auth_token.is_none());
        assert_eq!(config.games_path, DEFAULT_GAMES_PATH);
        assert_eq!(config.store_backend, StoreBackend::Rtdb);
        assert_eq!(config.staleness_window_seconds, 300);
        assert_eq!(config.schedule_interval_seconds, 1200);
        assert!(!config.run_once);
        assert!(!config.http_trigger_enabled);
        assert_eq!(
            config.database_request_timeout_seconds,
            DEFAULT_DATABASE_REQUEST_TIMEOUT_SECONDS
        );
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.region, DEFAULT_REGION);
        assert_eq!(config.drain_seconds, DEFAULT_DRAIN_SECONDS);
    }

    #[test]
    fn test_from_vars_success_with_custom_values() {
        let mut vars = base_vars();
        vars.insert("DATABASE_AUTH_TOKEN".to_string(), "s3cr3t".to_string());
        vars.insert("GAMES_PATH".to_string(), "/prod/games/".to_string());
        vars.insert("REAPER_STALENESS_WINDOW_SECONDS".to_string(), "1800".to_string());
        vars.insert("REAPER_SCHEDULE_INTERVAL_SECONDS".to_string(), "60".to_string());
        vars.insert("REAPER_RUN_ONCE".to_string(), "true".to_string());
        vars.insert("REAPER_HTTP_TRIGGER_ENABLED".to_string(), "1".to_string());
        vars.insert("DATABASE_REQUEST_TIMEOUT_SECONDS".to_string(), "3".to_string());
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:9000".to_string());
        vars.insert("REGION".to_string(), "europe-west1".to_string());
        vars.insert("DRAIN_SECONDS".to_string(), "0".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(
            config.database_auth_token.as_ref().unwrap().expose_secret(),
            "s3cr3t"
        );
        assert_eq!(config.games_path, "prod/games");
        assert_eq!(config.staleness_window(), Duration::from_secs(1800));
        assert_eq!(config.schedule_interval(), Duration::from_secs(60));
        assert!(config.run_once);
        assert!(config.http_trigger_enabled);
        assert_eq!(config.database_request_timeout(), Duration::from_secs(3));
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.region, "europe-west1");
        assert_eq!(config.drain_seconds, 0);
    }

    #[test]
    fn test_window_and_interval_are_independent() {
        let mut vars = base_vars();
        vars.insert("REAPER_STALENESS_WINDOW_SECONDS".to_string(), "7200".to_string());
        vars.insert("REAPER_SCHEDULE_INTERVAL_SECONDS".to_string(), "30".to_string());

        let config = Config::from_vars(&vars).unwrap();

        assert_eq!(config.staleness_window_seconds, 7200);
        assert_eq!(config.schedule_interval_seconds, 30);
    }

    #[test]
    fn test_interval_exceeds_window() {
        // Defaults: every 20 minutes against a 5 minute window.
        let config = Config::from_vars(&base_vars()).unwrap();
        assert!(config.interval_exceeds_window());

        let mut vars = base_vars();
        vars.insert("REAPER_SCHEDULE_INTERVAL_SECONDS".to_string(), "300".to_string());
        assert!(!Config::from_vars(&vars).unwrap().interval_exceeds_window());

        let mut vars = base_vars();
        vars.insert("REAPER_RUN_ONCE".to_string(), "true".to_string());
        assert!(!Config::from_vars(&vars).unwrap().interval_exceeds_window());
    }

    #[test]
    fn test_from_vars_missing_database_url() {
        let result = Config::from_vars(&HashMap::new());
        assert!(
            matches!(result, Err(ConfigError::Env(EnvVarError::Missing(v))) if v == "DATABASE_URL")
        );
    }

    #[test]
    fn test_memory_backend_does_not_need_database_url() {
        let vars = HashMap::from([("GAME_STORE".to_string(), "Memory".to_string())]);

        let config = Config::from_vars(&vars).unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.store_backend.as_str(), "memory");
        assert!(config.database_url.is_empty());
    }

    #[test]
    fn test_rejects_unknown_store_backend() {
        let vars = HashMap::from([("GAME_STORE".to_string(), "postgres".to_string())]);
        assert!(matches!(
            Config::from_vars(&vars),
            Err(ConfigError::InvalidStoreBackend(s)) if s == "postgres"
        ));
    }

    #[test]
    fn test_rejects_non_http_database_url() {
        let vars = HashMap::from([(
            "DATABASE_URL".to_string(),
            "fairway.firebaseio.com".to_string(),
        )]);
        assert!(matches!(
            Config::from_vars(&vars),
            Err(ConfigError::InvalidDatabaseUrl(_))
        ));
    }

    #[test]
    fn test_rejects_database_url_with_query() {
        let vars = HashMap::from([(
            "DATABASE_URL".to_string(),
            "https://fairway.firebaseio.com?auth=leaky".to_string(),
        )]);
        assert!(matches!(
            Config::from_vars(&vars),
            Err(ConfigError::InvalidDatabaseUrl(_))
        ));
    }

    #[test]
    fn test_rejects_bad_games_path() {
        let mut vars = base_vars();
        vars.insert("GAMES_PATH".to_string(), "/".to_string());
        assert!(matches!(
            Config::from_vars(&vars),
            Err(ConfigError::InvalidGamesPath(_))
        ));

        vars.insert("GAMES_PATH".to_string(), "games.v2".to_string());
        assert!(matches!(
            Config::from_vars(&vars),
            Err(ConfigError::InvalidGamesPath(_))
        ));
    }

    #[test]
    fn test_rejects_zero_window() {
        let mut vars = base_vars();
        vars.insert("REAPER_STALENESS_WINDOW_SECONDS".to_string(), "0".to_string());

        let err = Config::from_vars(&vars).unwrap_err();
        assert!(err.to_string().contains("must be greater than 0"));
    }

    #[test]
    fn test_rejects_non_numeric_interval() {
        let mut vars = base_vars();
        vars.insert(
            "REAPER_SCHEDULE_INTERVAL_SECONDS".to_string(),
            "twenty-minutes".to_string(),
        );

        let err = Config::from_vars(&vars).unwrap_err();
        assert!(err.to_string().contains("must be a valid positive integer"));
    }

    #[test]
    fn test_rejects_bad_run_once_flag() {
        let mut vars = base_vars();
        vars.insert("REAPER_RUN_ONCE".to_string(), "sometimes".to_string());

        assert!(matches!(
            Config::from_vars(&vars),
            Err(ConfigError::Env(EnvVarError::NotABool { .. }))
        ));
    }

    #[test]
    fn test_debug_redacts_auth_token() {
        let mut vars = base_vars();
        vars.insert("DATABASE_AUTH_TOKEN".to_string(), "very-secret".to_string());
        let config = Config::from_vars(&vars).unwrap();

        let debug_output = format!("{:?}", config);

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("very-secret"));
    }
}
