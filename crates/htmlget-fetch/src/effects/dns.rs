//! DNS answer cache shared by every pooled client.
//!
//! Lookups go through one hickory resolver. Its cache keeps an answer for
//! the record TTL, capped at an hour for hits and thirty seconds for
//! failures. Every lookup goes through the cache; there is no uncached
//! fallback path.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::TokioResolver;
use hickory_resolver::config::{LookupIpStrategy, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use once_cell::sync::OnceCell;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use thiserror::Error;
use tracing::{debug, warn};

/// Longest time a successful answer is served from the cache.
pub const SUCCESS_TTL: Duration = Duration::from_secs(3600);
/// Longest time a failed lookup is served from the cache.
pub const ERROR_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dns lookup for {host} failed: {reason}")]
pub struct ResolveError {
    pub host: String,
    pub reason: String,
}

impl ResolveError {
    pub fn new(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            reason: reason.into(),
        }
    }
}

/// Resolver options: TTL caps, per-query timeout, both address families.
pub fn resolver_opts(timeout: Duration) -> ResolverOpts {
    let mut opts = ResolverOpts::default();
    opts.positive_max_ttl = Some(SUCCESS_TTL);
    opts.negative_max_ttl = Some(ERROR_TTL);
    opts.timeout = timeout;
    opts.ip_strategy = LookupIpStrategy::Ipv4AndIpv6;
    opts
}

/// Caching resolver plugged into reqwest with `ClientBuilder::dns_resolver`.
///
/// Clones share one resolver and so one cache. The resolver itself is built
/// on first lookup, inside the runtime that performs it.
#[derive(Debug, Clone)]
pub struct CachingResolver {
    timeout: Duration,
    state: Arc<OnceCell<TokioResolver>>,
}

impl CachingResolver {
    /// `timeout` bounds each whole lookup, cache misses included.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            state: Arc::new(OnceCell::new()),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve `host`, answering from the cache while the entry is fresh.
    ///
    /// Ports in the returned addresses are 0; the connector substitutes the
    /// URL port.
    pub async fn lookup(&self, host: &str) -> Result<Vec<SocketAddr>, ResolveError> {
        let resolver = self.state.get_or_init(|| build_resolver(self.timeout));

        match tokio::time::timeout(self.timeout, resolver.lookup_ip(host)).await {
            Ok(Ok(lookup)) => {
                let addrs: Vec<SocketAddr> =
                    lookup.iter().map(|ip| SocketAddr::new(ip, 0)).collect();
                debug!(host, count = addrs.len(), "dns lookup");
                Ok(addrs)
            }
            Ok(Err(err)) => {
                debug!(host, %err, "dns lookup failed");
                Err(ResolveError::new(host, err.to_string()))
            }
            Err(_) => Err(ResolveError::new(
                host,
                format!("lookup timeout of {}ms exceeded", self.timeout.as_millis()),
            )),
        }
    }

    /// Drop every cached answer.
    pub fn clear(&self) {
        if let Some(resolver) = self.state.get() {
            resolver.clear_cache();
        }
    }
}

fn build_resolver(timeout: Duration) -> TokioResolver {
    let mut builder = match TokioResolver::builder_tokio() {
        Ok(builder) => builder,
        Err(err) => {
            warn!(%err, "system resolver configuration unreadable, using defaults");
            TokioResolver::builder_with_config(
                ResolverConfig::default(),
                TokioConnectionProvider::default(),
            )
        }
    };
    *builder.options_mut() = resolver_opts(timeout);
    builder.build()
}

impl Resolve for CachingResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move {
            let addrs = resolver.lookup(name.as_str()).await?;
            let addrs: Addrs = Box::new(addrs.into_iter());
            Ok(addrs)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttls_capped() {
        let opts = resolver_opts(Duration::from_secs(30));
        assert_eq!(opts.positive_max_ttl, Some(Duration::from_secs(3600)));
        assert_eq!(opts.negative_max_ttl, Some(Duration::from_secs(30)));
        assert_eq!(opts.timeout, Duration::from_secs(30));
        assert_eq!(opts.ip_strategy, LookupIpStrategy::Ipv4AndIpv6);
    }

    #[test]
    fn test_timeout_set_at_construction() {
        let resolver = CachingResolver::new(Duration::from_secs(5));
        let shared = resolver.clone();
        assert_eq!(shared.timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_localhost_resolves_to_loopback() {
        let resolver = CachingResolver::new(Duration::from_secs(5));

        let first = resolver.lookup("localhost").await.unwrap();
        assert!(!first.is_empty());
        assert!(first.iter().all(|addr| addr.ip().is_loopback()));
        assert!(first.iter().all(|addr| addr.port() == 0));

        let second = resolver.lookup("localhost").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_clones_share_cache() {
        let resolver = CachingResolver::new(Duration::from_secs(5));
        resolver.lookup("localhost").await.unwrap();

        let clone = resolver.clone();
        assert!(clone.state.get().is_some());
        clone.clear();
    }

    #[tokio::test]
    async fn test_unresolvable_host_fails() {
        let resolver = CachingResolver::new(Duration::from_secs(2));
        let err = resolver.lookup("nowhere.invalid").await.unwrap_err();
        assert_eq!(err.host, "nowhere.invalid");
        assert!(err.to_string().starts_with("dns lookup for nowhere.invalid failed"));
    }

    #[tokio::test]
    async fn test_resolve_trait_yields_addresses() {
        let resolver = CachingResolver::new(Duration::from_secs(5));
        let name: Name = "localhost".parse().unwrap();
        let addrs: Vec<SocketAddr> = resolver.resolve(name).await.unwrap().collect();
        assert!(!addrs.is_empty());
    }
}
