use bytes::Bytes;
use futures_util::StreamExt;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::cancel::CancelFlag;
use super::http::{HttpClient, RawResponse};
use crate::core::validation::{check_head, check_progress};
use crate::data::{FetchOutcome, FetchRequest, Limits, Progress};
use crate::error::{FetchError, Result, TransportKind};

/// Issues one GET with hard ceilings on wait time and received bytes.
///
/// # Lifecycle
///
/// 1. The whole call is bounded by `operation_timeout`.
/// 2. The client bounds each phase up to the response head (lookup,
///    connect, first byte) on its own; see [`AgentPool`](crate::AgentPool).
/// 3. Non-HTML content types and oversized `Content-Length` declarations
///    cancel the request before any body byte is read.
/// 4. Non-2xx statuses become [`FetchError::Status`].
/// 5. Each body read is bounded by `phase_timeout`; the running total is
///    checked against `max_response_size` after every chunk.
///
/// Whichever cancellation trigger fires first decides the error. The body
/// stream is dropped on every exit path, which releases the connection.
pub struct BoundedFetcher<C: HttpClient> {
    client: C,
    limits: Limits,
}

impl<C: HttpClient> BoundedFetcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            limits: Limits::default(),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome> {
        self.fetch_with_cancel(request, &CancelFlag::new()).await
    }

    /// Fetch with a caller-owned flag, so another task can abort the request.
    pub async fn fetch_with_cancel(
        &self,
        request: &FetchRequest,
        cancel: &CancelFlag,
    ) -> Result<FetchOutcome> {
        let limit = self.limits.operation_timeout;
        match timeout(limit, self.run(request, cancel)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(url = %request.url, "operation timeout exceeded");
                Err(FetchError::timeout("operation", limit))
            }
        }
    }

    async fn run(&self, request: &FetchRequest, cancel: &CancelFlag) -> Result<FetchOutcome> {
        let limits = self.limits;
        debug!(url = %request.url, "sending request");

        let RawResponse { head, mut body } = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(aborted(cancel)),
            sent = self.client.get(request) => sent?,
        };
        debug!(status = head.status, content_type = ?head.content_type(), "response head");

        if let Some(reason) = check_head(&head, limits.max_response_size) {
            cancel.cancel(reason);
        }
        if cancel.is_cancelled() {
            warn!(url = %request.url, reason = ?cancel.reason(), "request cancelled on response");
            return Err(aborted(cancel));
        }

        if !head.is_success() {
            return Err(FetchError::Status {
                code: head.status,
                text: head.status_text,
            });
        }

        let capacity = head
            .content_length
            .unwrap_or(0)
            .min(limits.max_response_size) as usize;
        let mut received = Vec::with_capacity(capacity);
        let mut progress = Progress::new(head.content_length);

        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                next = timeout(limits.phase_timeout, body.next()) => {
                    match next.map_err(|_| FetchError::timeout("read", limits.phase_timeout))? {
                        Some(chunk) => chunk?,
                        None => break,
                    }
                }
            };

            progress.advance(chunk.len());
            if let Some(reason) = check_progress(&progress, limits.max_response_size) {
                cancel.cancel(reason);
                break;
            }
            received.extend_from_slice(&chunk);
        }

        if cancel.is_cancelled() {
            warn!(url = %request.url, reason = ?cancel.reason(), "request cancelled while streaming");
            return Err(aborted(cancel));
        }

        debug!(bytes = progress.transferred, "response complete");
        Ok(FetchOutcome {
            url: head.url,
            status: head.status,
            headers: head.headers,
            body: Bytes::from(received),
        })
    }
}

fn aborted(cancel: &CancelFlag) -> FetchError {
    match cancel.reason() {
        Some(reason) => reason.clone().into(),
        None => FetchError::transport(TransportKind::Cancelled, "request cancelled"),
    }
}
