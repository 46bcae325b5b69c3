//! I/O operations for fetching.
//!
//! Network access, the shared agent pool, DNS caching and cancellation live
//! here. The HTTP layer sits behind the [`HttpClient`] trait so the bounded
//! fetcher can be driven by in-memory clients.

pub mod cancel;
pub mod dns;
pub mod document;
pub mod fetcher;
pub mod http;
pub mod pool;

pub use cancel::CancelFlag;
pub use dns::{CachingResolver, ResolveError};
pub use document::DocumentLoader;
pub use fetcher::BoundedFetcher;
pub use http::{BoxStream, HttpClient, RawResponse, ReqwestClient};
pub use pool::AgentPool;
