use std::fmt;

/// Where a charset candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharsetSource {
    /// Statistical detection over the body bytes.
    Content,
    /// A `charset=` declaration embedded in the document.
    Meta,
    /// The `Content-Type` response header.
    Header,
}

impl CharsetSource {
    /// Resolution order, highest priority first.
    pub const PRECEDENCE: [CharsetSource; 3] =
        [CharsetSource::Content, CharsetSource::Meta, CharsetSource::Header];
}

impl fmt::Display for CharsetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharsetSource::Content => write!(f, "content"),
            CharsetSource::Meta => write!(f, "meta"),
            CharsetSource::Header => write!(f, "header"),
        }
    }
}

/// A raw, not yet normalized, encoding token and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharsetCandidate {
    pub source: CharsetSource,
    pub token: String,
}

/// The decoded text of a fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDocument {
    pub text: String,

    /// Encoding label the text was decoded with, e.g. `cp932` or `EUC-JP`.
    pub encoding: String,

    /// `true` if malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}
