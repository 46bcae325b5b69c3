//! Pure transformations for fetching and decoding.
//!
//! Charset resolution and the cancellation checks applied to response
//! headers and transfer progress. No I/O happens here.

pub mod charset;
pub mod validation;

pub use charset::{decode, decoder_for, normalize, resolve};
pub use validation::{CancelReason, check_head, check_progress, is_html};
