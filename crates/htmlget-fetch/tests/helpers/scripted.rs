use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use futures_util::{StreamExt, stream};
use htmlget_fetch::{FetchError, FetchRequest, HttpClient, RawResponse, ResponseHead};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use url::Url;

/// In-memory client replaying a fixed response head and body chunks.
///
/// `pulled` counts body chunks the fetcher asked for.
#[derive(Clone)]
pub struct ScriptedClient {
    head: ResponseHead,
    chunks: Vec<Bytes>,
    head_delay: Duration,
    chunk_delay: Duration,
    pub requests: Arc<AtomicUsize>,
    pub pulled: Arc<AtomicUsize>,
}

impl ScriptedClient {
    pub fn new(content_type: &str, chunks: Vec<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        Self {
            head: ResponseHead {
                url: Url::parse("http://example.test/page").unwrap(),
                status: 200,
                status_text: "OK".to_string(),
                headers,
                content_length: None,
            },
            chunks,
            head_delay: Duration::ZERO,
            chunk_delay: Duration::ZERO,
            requests: Arc::new(AtomicUsize::new(0)),
            pulled: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn html(chunks: Vec<Bytes>) -> Self {
        Self::new("text/html", chunks)
    }

    pub fn header(mut self, name: HeaderName, value: &str) -> Self {
        self.head.headers.insert(name, HeaderValue::from_str(value).unwrap());
        self
    }

    pub fn status(mut self, code: u16, text: &str) -> Self {
        self.head.status = code;
        self.head.status_text = text.to_string();
        self
    }

    pub fn content_length(mut self, length: Option<u64>) -> Self {
        self.head.content_length = length;
        self
    }

    pub fn head_delay(mut self, delay: Duration) -> Self {
        self.head_delay = delay;
        self
    }

    pub fn chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    pub fn pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl HttpClient for ScriptedClient {
    async fn get(&self, _request: &FetchRequest) -> htmlget_fetch::Result<RawResponse> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.head_delay).await;

        let pulled = Arc::clone(&self.pulled);
        let delay = self.chunk_delay;
        let body = stream::iter(self.chunks.clone()).then(move |chunk| {
            let pulled = Arc::clone(&pulled);
            async move {
                pulled.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                Ok::<_, FetchError>(chunk)
            }
        });

        Ok(RawResponse {
            head: self.head.clone(),
            body: Box::pin(body),
        })
    }
}

/// `count` chunks of `size` bytes each.
pub fn chunks(count: usize, size: usize) -> Vec<Bytes> {
    let chunk = Bytes::from(vec![b'a'; size]);
    vec![chunk; count]
}
