//! # Client settings
//!
//! Resolved in this order, later sources winning:
//!
//! 1. built-in defaults,
//! 2. an optional `config.toml` in the working directory,
//! 3. environment variables prefixed with `PLATFORM_` (a `.env` file is loaded first),
//!    e.g. `PLATFORM_BASE_URL`, `PLATFORM_SHOW_BACKEND_ERRORS=true`.

use std::path::PathBuf;

use chrono::Duration;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use store::ClientConfig;

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    /// Root of the REST API, e.g. `https://api.example.org/`.
    pub base_url: String,
    /// Public URL of the front end, used to build CAS service URLs.
    pub front_url: String,
    /// CAS server root.
    pub cas_url: String,
    /// Surface backend error bodies verbatim in notifications.
    pub show_backend_errors: bool,
    /// Seconds before a fetched list is refetched. 0 disables expiry.
    pub cache_ttl_secs: u64,
    /// Maximum in-flight requests when synchronising lists of links.
    pub sync_concurrency: usize,
    pub page_size: usize,
    /// Where to persist bearer tokens. Tokens are kept in memory when unset.
    pub token_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/".into(),
            front_url: "http://localhost:3000".into(),
            cas_url: "https://cas.example.org/cas".into(),
            show_backend_errors: false,
            cache_ttl_secs: 0,
            sync_concurrency: 4,
            page_size: store::pagination::DEFAULT_PAGE_SIZE,
            token_file: None,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("front_url", defaults.front_url)?
            .set_default("cas_url", defaults.cas_url)?
            .set_default("show_backend_errors", defaults.show_backend_errors)?
            .set_default("cache_ttl_secs", defaults.cache_ttl_secs)?
            .set_default("sync_concurrency", defaults.sync_concurrency as u64)?
            .set_default("page_size", defaults.page_size as u64)?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("PLATFORM")
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Client-side preferences derived from these settings.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.page_size, self.cache_ttl_secs)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.client_config().ttl()
    }

    /// CAS login page that sends the user back to `front_url{return_path}` with a ticket.
    pub fn cas_login_url(&self, return_path: &str) -> String {
        format!(
            "{}/login?service={}",
            self.cas_url.trim_end_matches('/'),
            encode_query_value(&self.service_url(return_path))
        )
    }

    /// The `service` value CAS associates with a ticket.
    pub fn service_url(&self, return_path: &str) -> String {
        format!("{}{}", self.front_url.trim_end_matches('/'), return_path)
    }
}

fn encode_query_value(value: &str) -> String {
    reqwest::Url::parse_with_params("http://x/", [("v", value)])
        .ok()
        .and_then(|url| url.query().map(|q| q.trim_start_matches("v=").to_string()))
        .unwrap_or_else(|| value.to_string())
}
