use std::fmt;

use crate::data::{Progress, ResponseHead};
use crate::error::{FetchError, TransportKind};

/// Why an in-flight request was aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelReason {
    /// The response is not `text/html`.
    NotHtml { content_type: Option<String> },
    /// The declared or received size is above the ceiling.
    TooLarge { size: u64, max: u64 },
    /// Cancelled by the caller.
    Manual(String),
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::NotHtml { content_type } => {
                write!(f, "not a html {}", content_type.as_deref().unwrap_or("(no content-type)"))
            }
            CancelReason::TooLarge { size, max } => {
                write!(f, "maxSize exceeded ({size} > {max}) on response")
            }
            CancelReason::Manual(reason) => write!(f, "{reason}"),
        }
    }
}

impl From<CancelReason> for FetchError {
    fn from(reason: CancelReason) -> Self {
        match reason {
            CancelReason::NotHtml { content_type } => FetchError::UnsupportedContent { content_type },
            other => FetchError::transport(TransportKind::Cancelled, other.to_string()),
        }
    }
}

/// Returns `true` if the content type starts with `text/html`, ignoring ASCII case.
///
/// # Examples
///
/// ```
/// use htmlget_fetch::core::is_html;
///
/// assert!(is_html(Some("text/html; charset=utf-8")));
/// assert!(is_html(Some("TEXT/HTML")));
/// assert!(!is_html(Some("application/json")));
/// assert!(!is_html(None));
/// ```
pub fn is_html(content_type: Option<&str>) -> bool {
    const PREFIX: &[u8] = b"text/html";
    content_type.is_some_and(|ct| {
        ct.as_bytes()
            .get(..PREFIX.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(PREFIX))
    })
}

/// Checks applied as soon as the response headers arrive.
///
/// The content type is checked before the declared length.
pub fn check_head(head: &ResponseHead, max: u64) -> Option<CancelReason> {
    if !is_html(head.content_type()) {
        return Some(CancelReason::NotHtml {
            content_type: head.content_type().map(str::to_string),
        });
    }

    match head.declared_length() {
        Some(size) if size > max => Some(CancelReason::TooLarge { size, max }),
        _ => None,
    }
}

/// Check applied after every received chunk.
///
/// A transfer that has reached exactly its expected length is let through.
pub fn check_progress(progress: &Progress, max: u64) -> Option<CancelReason> {
    if progress.transferred > max && !progress.is_complete() {
        Some(CancelReason::TooLarge {
            size: progress.transferred,
            max,
        })
    } else {
        None
    }
}
