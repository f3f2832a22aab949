//! Server configuration from environment variables.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `NAVITIA_TOKEN` | API token for the live provider | empty (calls fail) |
//! | `NAVITIA_BASE_URL` | API base URL | `https://api.navitia.io/v1` |
//! | `NAVITIA_COVERAGE` | Coverage region | `fr-idf` |
//! | `MOCK_DATA_DIR` | Serve fixture files from this directory instead | unset |
//! | `BIND_ADDR` | Listen address | `127.0.0.1:3000` |
//! | `CACHE_TTL_SECS` | Journeys cache TTL | `60` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::cache::CacheConfig;
use crate::navitia::NavitiaConfig;
use crate::optimizer::OptimizerConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Error loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {name}: {value:?} ({message})")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub message: String,
}

/// Where the server gets its journeys from.
#[derive(Debug, Clone)]
pub enum SourceConfig {
    Live(NavitiaConfig),
    Mock(PathBuf),
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub source: SourceConfig,
    pub cache: CacheConfig,
    pub optimizer: OptimizerConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration using `lookup` to read variables.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_value = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value.trim().parse::<SocketAddr>().map_err(|e| ConfigError {
            name: "BIND_ADDR",
            value: bind_value.clone(),
            message: format!("{e}"),
        })?;

        let source = match get("MOCK_DATA_DIR") {
            Some(dir) => SourceConfig::Mock(PathBuf::from(dir)),
            None => {
                let token = get("NAVITIA_TOKEN").unwrap_or_else(|| {
                    warn!("NAVITIA_TOKEN not set, API calls will fail");
                    String::new()
                });
                let mut navitia = NavitiaConfig::new(token);
                if let Some(url) = get("NAVITIA_BASE_URL") {
                    navitia = navitia.with_base_url(url);
                }
                if let Some(coverage) = get("NAVITIA_COVERAGE") {
                    navitia = navitia.with_coverage(coverage);
                }
                SourceConfig::Live(navitia)
            }
        };

        let mut cache = CacheConfig::default();
        if let Some(ttl) = get("CACHE_TTL_SECS") {
            let secs: u64 = ttl.trim().parse().map_err(|e| ConfigError {
                name: "CACHE_TTL_SECS",
                value: ttl.clone(),
                message: format!("{e}"),
            })?;
            cache.ttl = Duration::from_secs(secs);
        }

        Ok(Self {
            bind_addr,
            source,
            cache,
            optimizer: OptimizerConfig::default(),
        })
    }
}
