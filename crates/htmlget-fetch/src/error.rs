//! Error types for htmlget-fetch.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::effects::dns::ResolveError;

/// Which stage of the transport failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Dns,
    Connect,
    Tls,
    Timeout,
    Cancelled,
    Body,
    Request,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Dns => write!(f, "dns"),
            TransportKind::Connect => write!(f, "connect"),
            TransportKind::Tls => write!(f, "tls"),
            TransportKind::Timeout => write!(f, "timeout"),
            TransportKind::Cancelled => write!(f, "cancelled"),
            TransportKind::Body => write!(f, "body"),
            TransportKind::Request => write!(f, "request"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("invalid proxy URL {url}: {source}")]
    Proxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("failed to build client: {0}")]
    Build(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Non-2xx response. `text` is the reason phrase.
    #[error("{code} {text}")]
    Status { code: u16, text: String },

    #[error("not a html {}", content_type.as_deref().unwrap_or("(no content-type)"))]
    UnsupportedContent { content_type: Option<String> },

    #[error("{kind} failure: {reason}")]
    Transport { kind: TransportKind, reason: String },

    #[error(transparent)]
    Pool(#[from] PoolError),
}

pub type Result<T> = std::result::Result<T, FetchError>;

impl FetchError {
    pub fn transport(kind: TransportKind, reason: impl Into<String>) -> Self {
        FetchError::Transport {
            kind,
            reason: reason.into(),
        }
    }

    /// A timeout naming the bound that was exceeded.
    pub fn timeout(bound: &str, limit: Duration) -> Self {
        Self::transport(
            TransportKind::Timeout,
            format!("{bound} timeout of {}ms exceeded", limit.as_millis()),
        )
    }

    /// The status code carried by a [`FetchError::Status`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The transport kind carried by a [`FetchError::Transport`].
    pub fn transport_kind(&self) -> Option<TransportKind> {
        match self {
            FetchError::Transport { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if has_source::<ResolveError>(&err) {
            TransportKind::Dns
        } else if err.is_timeout() {
            TransportKind::Timeout
        } else if has_source::<native_tls::Error>(&err) {
            TransportKind::Tls
        } else if err.is_connect() {
            TransportKind::Connect
        } else if err.is_body() || err.is_decode() {
            TransportKind::Body
        } else {
            TransportKind::Request
        };
        Self::transport(kind, describe_chain(&err))
    }
}

fn has_source<T: StdError + 'static>(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<T>() {
            return true;
        }
        current = e.source();
    }
    false
}

// reqwest puts the useful part (refused, unknown host, ...) deep in the chain
fn describe_chain(err: &(dyn StdError + 'static)) -> String {
    let mut reason = err.to_string();
    let mut current = err.source();
    while let Some(e) = current {
        let part = e.to_string();
        if !reason.contains(&part) {
            reason.push_str(": ");
            reason.push_str(&part);
        }
        current = e.source();
    }
    reason
}
