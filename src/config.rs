use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_MONGO_DB_NAME: &str = "newsdesk";

/// Runtime settings for composing a search session.
///
/// Built once by whoever owns the application and handed to constructors.
#[derive(Debug, Clone)]
pub struct Config {
    pub news_api_base_url: String,
    /// May be empty; searches then fail fast without touching the network.
    pub news_api_key: String,
    pub request_timeout: Duration,
    pub data_dir: PathBuf,
    pub mongo_uri: Option<String>,
    pub mongo_db_name: String,
}

impl Config {
    /// Load from the process environment, reading a `.env` file first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Used by `from_env` and by tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let timeout_secs = match lookup("NEWS_API_TIMEOUT_SECS").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("NEWS_API_TIMEOUT_SECS is not a number: {raw:?}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            bail!("NEWS_API_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            news_api_base_url: get_or_default("NEWS_API_BASE_URL", DEFAULT_BASE_URL),
            news_api_key: lookup("NEWS_API_KEY").unwrap_or_default(),
            request_timeout: Duration::from_secs(timeout_secs),
            data_dir: PathBuf::from(get_or_default("NEWSDESK_DATA_DIR", DEFAULT_DATA_DIR)),
            mongo_uri: lookup("MONGO_URI").filter(|v| !v.trim().is_empty()),
            mongo_db_name: get_or_default("MONGO_DB_NAME", DEFAULT_MONGO_DB_NAME),
        })
    }
}
