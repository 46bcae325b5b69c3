use std::sync::Arc;

use once_cell::sync::OnceCell;
use reqwest::{Client, Proxy};
use tracing::debug;
use url::Url;

use super::dns::CachingResolver;
use crate::data::{PoolConfig, ProxyMode, Scheme};
use crate::error::PoolError;

const USER_AGENT: &str = concat!("htmlget/", env!("CARGO_PKG_VERSION"));

/// Long-lived keep-alive clients, one per (scheme, proxy mode).
///
/// Clients are built on first use and kept for the lifetime of the pool.
/// All of them resolve names through one shared [`CachingResolver`].
/// Share the pool with `Arc` rather than building one per request.
pub struct AgentPool {
    config: PoolConfig,
    resolver: CachingResolver,
    plain: OnceCell<Client>,
    encrypted: OnceCell<Client>,
    plain_proxied: OnceCell<Client>,
    encrypted_proxied: OnceCell<Client>,
}

impl AgentPool {
    /// Create a pool. A malformed proxy URL is rejected here.
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        if let Some(proxy) = &config.proxy {
            Proxy::all(proxy.as_str()).map_err(|source| PoolError::Proxy {
                url: proxy.to_string(),
                source,
            })?;
        }
        let resolver = CachingResolver::new(config.limits.phase_timeout);

        Ok(Self {
            config,
            resolver,
            plain: OnceCell::new(),
            encrypted: OnceCell::new(),
            plain_proxied: OnceCell::new(),
            encrypted_proxied: OnceCell::new(),
        })
    }

    pub fn shared(config: PoolConfig) -> Result<Arc<Self>, PoolError> {
        Self::new(config).map(Arc::new)
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn resolver(&self) -> &CachingResolver {
        &self.resolver
    }

    /// The proxy mode a request gets: proxied only if a proxy is configured
    /// and not bypassed.
    pub fn proxy_mode(&self, bypass_proxy: bool) -> ProxyMode {
        if self.config.proxy.is_some() && !bypass_proxy {
            ProxyMode::Proxied
        } else {
            ProxyMode::Direct
        }
    }

    /// Client for `scheme`, routed through the proxy unless bypassed.
    pub fn transport(&self, scheme: Scheme, bypass_proxy: bool) -> Result<&Client, PoolError> {
        let mode = self.proxy_mode(bypass_proxy);
        self.slot(scheme, mode).get_or_try_init(|| self.build(scheme, mode))
    }

    /// Client for the scheme of `url`.
    pub fn transport_for_url(&self, url: &Url, bypass_proxy: bool) -> Result<&Client, PoolError> {
        self.transport(Scheme::from_url(url)?, bypass_proxy)
    }

    /// Whether the client for this key has been built yet.
    pub fn is_initialized(&self, scheme: Scheme, mode: ProxyMode) -> bool {
        self.slot(scheme, mode).get().is_some()
    }

    fn slot(&self, scheme: Scheme, mode: ProxyMode) -> &OnceCell<Client> {
        match (scheme, mode) {
            (Scheme::Plain, ProxyMode::Direct) => &self.plain,
            (Scheme::Encrypted, ProxyMode::Direct) => &self.encrypted,
            (Scheme::Plain, ProxyMode::Proxied) => &self.plain_proxied,
            (Scheme::Encrypted, ProxyMode::Proxied) => &self.encrypted_proxied,
        }
    }

    fn build(&self, scheme: Scheme, mode: ProxyMode) -> Result<Client, PoolError> {
        debug!(%scheme, ?mode, "building pooled client");
        let limits = &self.config.limits;

        let mut cb = Client::builder()
            .user_agent(USER_AGENT)
            .http1_only()
            .pool_idle_timeout(self.config.keep_alive)
            .tcp_keepalive(self.config.keep_alive)
            .connect_timeout(limits.phase_timeout)
            .read_timeout(limits.phase_timeout)
            .timeout(limits.operation_timeout)
            .dns_resolver(Arc::new(self.resolver.clone()));

        // redirect hops to the other scheme must stay proxied
        cb = match (mode, &self.config.proxy) {
            (ProxyMode::Proxied, Some(url)) => {
                let proxy = Proxy::all(url.as_str()).map_err(|source| PoolError::Proxy {
                    url: url.to_string(),
                    source,
                })?;
                cb.proxy(proxy)
            }
            _ => cb.no_proxy(),
        };

        cb.build().map_err(PoolError::Build)
    }
}
