//! Settings read from the environment.

use htmlget_fetch::PoolConfig;
use thiserror::Error;
use url::Url;

/// Outbound proxy for every request, e.g. `http://proxy.local:3128`.
pub const PROXY_VAR: &str = "HTMLGET_PROXY";
/// `tracing` filter directives for stderr logging.
pub const LOG_VAR: &str = "HTMLGET_LOG";

pub const DEFAULT_LOG_FILTER: &str = "off";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {var} '{value}': {source}")]
    InvalidProxy {
        var: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub proxy: Option<Url>,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Unset and blank values count as absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let proxy = read(PROXY_VAR)
            .map(|value| {
                Url::parse(&value).map_err(|source| ConfigError::InvalidProxy {
                    var: PROXY_VAR,
                    value,
                    source,
                })
            })
            .transpose()?;
        let log_filter = read(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self { proxy, log_filter })
    }

    pub fn pool(&self) -> PoolConfig {
        PoolConfig::default().proxy(self.proxy.clone())
    }
}
