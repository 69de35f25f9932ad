//! # Client preferences — `client.toml`
//!
//! Preferences that shape the client-side state rather than the connection to the API:
//!
//! ```toml
//! [directory]
//! page_size = 15        # rows per directory page
//!
//! [cache]
//! ttl_secs = 0          # 0 keeps fetched lists until they are invalidated
//! ```
//!
//! All structs derive `Default` so that a missing or empty file is equivalent to the
//! default configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::pagination::{Paginator, DEFAULT_PAGE_SIZE};
use crate::state::AppState;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds before a fetched list is refetched. 0 disables expiry.
    #[serde(default)]
    pub ttl_secs: u64,
}

impl ClientConfig {
    pub fn new(page_size: usize, ttl_secs: u64) -> Self {
        Self {
            directory: DirectoryConfig { page_size },
            cache: CacheConfig { ttl_secs },
        }
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "client.toml"
    }

    pub fn ttl(&self) -> Option<Duration> {
        match self.cache.ttl_secs {
            0 => None,
            secs => Duration::try_seconds(i64::try_from(secs).ok()?),
        }
    }

    pub fn paginator(&self) -> Paginator {
        Paginator::new(self.directory.page_size)
    }

    pub fn app_state(&self) -> AppState {
        AppState::with_ttl(self.ttl())
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
