use std::fmt;
use std::time::Duration;

use url::Url;

use super::limits::Limits;
use crate::error::PoolError;

/// Idle lifetime of a pooled keep-alive connection.
pub const KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Transport kind a pooled client is dedicated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Plain,
    Encrypted,
}

impl Scheme {
    /// Map a URL scheme to a transport kind.
    ///
    /// Only `http` and `https` are fetchable.
    pub fn from_url(url: &Url) -> Result<Self, PoolError> {
        match url.scheme() {
            "http" => Ok(Scheme::Plain),
            "https" => Ok(Scheme::Encrypted),
            other => Err(PoolError::UnsupportedScheme(other.to_string())),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Plain => write!(f, "http"),
            Scheme::Encrypted => write!(f, "https"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyMode {
    Direct,
    Proxied,
}

/// Settings for an [`AgentPool`](crate::AgentPool).
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Proxy every request goes through unless bypassed. `None` disables proxying.
    pub proxy: Option<Url>,

    /// Timeouts baked into each pooled client.
    pub limits: Limits,

    /// Idle lifetime of keep-alive connections, also used as the TCP keep-alive interval.
    pub keep_alive: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            limits: Limits::default(),
            keep_alive: KEEP_ALIVE,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn proxy(mut self, proxy: Option<Url>) -> Self {
        self.proxy = proxy;
        self
    }

    #[must_use]
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}
