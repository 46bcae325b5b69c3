use std::sync::Arc;

use tracing::debug;

use super::fetcher::BoundedFetcher;
use super::http::{HttpClient, ReqwestClient};
use super::pool::AgentPool;
use crate::core::charset;
use crate::data::{DecodedDocument, FetchRequest};
use crate::error::Result;

/// Fetches a page and decodes it with the resolved charset.
pub struct DocumentLoader<C: HttpClient> {
    fetcher: BoundedFetcher<C>,
}

impl DocumentLoader<ReqwestClient> {
    /// Loader over the pooled reqwest clients with the default limits.
    pub fn with_pool(pool: Arc<AgentPool>) -> Self {
        let limits = pool.config().limits;
        Self::new(BoundedFetcher::new(ReqwestClient::new(pool)).with_limits(limits))
    }
}

impl<C: HttpClient> DocumentLoader<C> {
    pub fn new(fetcher: BoundedFetcher<C>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &BoundedFetcher<C> {
        &self.fetcher
    }

    /// Fetch `url` as HTML and decode it.
    ///
    /// Fetch errors propagate unchanged; decoding itself cannot fail.
    pub async fn get_document(&self, url: &str) -> Result<DecodedDocument> {
        let request = FetchRequest::parse(url)?.accept_html();
        let outcome = self.fetcher.fetch(&request).await?;

        let encoding = charset::resolve(outcome.content_type(), Some(&outcome.body[..]));
        let (text, had_errors) = charset::decode(&outcome.body, &encoding);
        debug!(%encoding, had_errors, bytes = outcome.body.len(), "decoded document");

        Ok(DecodedDocument {
            text,
            encoding,
            had_errors,
        })
    }
}
