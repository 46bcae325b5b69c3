//! Bounded HTML fetching with charset resolution.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and types
//! - [`core`] - Pure transformations (charset resolution, cancellation checks)
//! - [`effects`] - I/O operations with trait abstraction
//!
//! # Key Features
//!
//! - **Bounded**: per-phase and whole-operation timeouts, a hard response size ceiling
//! - **Early Abort**: non-HTML responses and oversized declarations are rejected before the body is read
//! - **Shared Agents**: keep-alive client pool keyed by scheme and proxy mode, with a DNS answer cache
//! - **Charset Resolution**: sniffed, embedded and declared encodings resolved in a fixed order

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use core::{decode, normalize, resolve};
pub use data::{
    CharsetCandidate, CharsetSource, DecodedDocument, FetchOutcome, FetchRequest, Limits,
    PoolConfig, Progress, ProxyMode, ResponseHead, Scheme,
};
pub use effects::{
    AgentPool, BoundedFetcher, BoxStream, CachingResolver, CancelFlag, DocumentLoader, HttpClient,
    RawResponse, ReqwestClient,
};

pub use error::{FetchError, PoolError, Result, TransportKind};
