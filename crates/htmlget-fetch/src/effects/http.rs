use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use hyper::ext::ReasonPhrase;

use super::pool::AgentPool;
use crate::data::{FetchRequest, ResponseHead};
use crate::error::{FetchError, Result};

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// A response whose headers have arrived and whose body has not been read.
///
/// Dropping `body` before it ends aborts the transfer and releases the
/// connection.
pub struct RawResponse {
    pub head: ResponseHead,
    pub body: BoxStream<'static, Result<Bytes>>,
}

/// Asynchronous HTTP client abstraction.
///
/// Implementations send the request and return as soon as the response
/// head is available. They follow redirects, never retry, and leave status
/// handling to the caller.
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation over an [`AgentPool`]
/// - In-memory clients in tests
pub trait HttpClient: Send + Sync {
    fn get(&self, request: &FetchRequest) -> impl Future<Output = Result<RawResponse>> + Send;
}

/// Production HTTP client using the pooled reqwest clients.
#[derive(Clone)]
pub struct ReqwestClient {
    pool: Arc<AgentPool>,
    bypass_proxy: bool,
}

impl ReqwestClient {
    pub fn new(pool: Arc<AgentPool>) -> Self {
        Self {
            pool,
            bypass_proxy: false,
        }
    }

    /// Always connect directly, even if the pool has a proxy.
    #[must_use]
    pub fn bypass_proxy(mut self, bypass: bool) -> Self {
        self.bypass_proxy = bypass;
        self
    }

    pub fn pool(&self) -> &Arc<AgentPool> {
        &self.pool
    }
}

impl HttpClient for ReqwestClient {
    async fn get(&self, request: &FetchRequest) -> Result<RawResponse> {
        let client = self.pool.transport_for_url(&request.url, self.bypass_proxy)?;

        let response = client
            .get(request.url.clone())
            .headers(request.headers.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        // hyper only records the phrase when it differs from the canonical one
        let status_text = response
            .extensions()
            .get::<ReasonPhrase>()
            .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
            .or_else(|| status.canonical_reason())
            .unwrap_or("Unknown")
            .to_string();
        let head = ResponseHead {
            url: response.url().clone(),
            status: status.as_u16(),
            status_text,
            headers: response.headers().clone(),
            content_length: response.content_length(),
        };
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(FetchError::from_reqwest));

        Ok(RawResponse {
            head,
            body: Box::pin(body),
        })
    }
}
