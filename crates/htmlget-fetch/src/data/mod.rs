//! Immutable data types for bounded fetching and decoding.
//!
//! Configuration, request/response values and progress tracking live here.
//! Nothing in this module performs I/O.

pub mod charset;
pub mod limits;
pub mod pool;
pub mod progress;
pub mod request;

pub use charset::{CharsetCandidate, CharsetSource, DecodedDocument};
pub use limits::Limits;
pub use pool::{PoolConfig, ProxyMode, Scheme};
pub use progress::Progress;
pub use request::{FetchOutcome, FetchRequest, ResponseHead};
