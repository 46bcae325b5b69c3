//! Character encoding resolution.
//!
//! Candidates are tried in [`CharsetSource::PRECEDENCE`] order: sniffed from
//! the content, then the embedded `charset=` declaration, then the
//! `Content-Type` header. The first candidate that normalizes to a supported
//! encoding wins; if none does the result is `utf-8`.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, REPLACEMENT, SHIFT_JIS, UTF_8};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::data::{CharsetCandidate, CharsetSource};

/// Encoding used when no source yields a supported candidate.
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Bytes of the body scanned for an embedded declaration.
pub const META_SCAN_LIMIT: usize = 8192;

/// Windows-31J, the superset Shift_JIS-labelled pages actually use.
pub const CP932: &str = "cp932";

const SHIFT_JIS_ALIASES: [&str; 4] = ["shift_jis", "shift-jis", "windows-31j", "x-sjis"];

static CHARSET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([\w-]+)"#).expect("charset pattern is valid")
});

/// Resolve the encoding of `body` given the `Content-Type` header value.
///
/// Never fails: absence of a usable signal yields [`DEFAULT_CHARSET`].
///
/// # Examples
///
/// ```
/// use htmlget_fetch::resolve;
///
/// assert_eq!(resolve(Some("text/html; charset=Shift_JIS"), Some(b"<p>hi</p>")), "cp932");
/// assert_eq!(resolve(None, Some(b"<p>hi</p>")), "utf-8");
/// ```
pub fn resolve(header_value: Option<&str>, body: Option<&[u8]>) -> String {
    for source in CharsetSource::PRECEDENCE {
        let Some(candidate) = candidate(source, header_value, body) else {
            continue;
        };
        debug!("charset from {}: {}", candidate.source, candidate.token);
        let decided = normalize(&candidate.token);
        debug!(
            "charset from {} decided: {}",
            candidate.source,
            decided.as_deref().unwrap_or("(unsupported)")
        );
        if let Some(encoding) = decided {
            return encoding;
        }
    }
    DEFAULT_CHARSET.to_string()
}

/// Extract the raw candidate a single source offers, if any.
pub fn candidate(
    source: CharsetSource,
    header_value: Option<&str>,
    body: Option<&[u8]>,
) -> Option<CharsetCandidate> {
    let token = match source {
        CharsetSource::Content => body.and_then(sniff).map(str::to_string),
        CharsetSource::Meta => body.and_then(embedded_declaration),
        CharsetSource::Header => header_value.and_then(declared_charset),
    }?;
    Some(CharsetCandidate { source, token })
}

/// Accept `candidate` if it names a supported encoding.
///
/// Shift_JIS aliases are remapped to [`CP932`]; every other supported name
/// is returned verbatim.
///
/// # Examples
///
/// ```
/// use htmlget_fetch::normalize;
///
/// assert_eq!(normalize("X-SJIS").as_deref(), Some("cp932"));
/// assert_eq!(normalize("EUC-JP").as_deref(), Some("EUC-JP"));
/// assert_eq!(normalize("klingon"), None);
/// ```
pub fn normalize(candidate: &str) -> Option<String> {
    decoder_for(candidate)?;
    let lower = candidate.to_ascii_lowercase();
    if SHIFT_JIS_ALIASES.contains(&lower.as_str()) {
        return Some(CP932.to_string());
    }
    Some(candidate.to_string())
}

/// Decoder for an encoding label. `cp932` maps to the WHATWG Shift_JIS
/// decoder, which implements Windows-31J.
///
/// Labels WHATWG maps to the replacement encoding (`iso-2022-kr`,
/// `hz-gb-2312`, ...) have no usable decoder and yield `None`.
pub fn decoder_for(label: &str) -> Option<&'static Encoding> {
    if label.trim().eq_ignore_ascii_case(CP932) {
        return Some(SHIFT_JIS);
    }
    Encoding::for_label(label.as_bytes()).filter(|&encoding| encoding != REPLACEMENT)
}

/// Decode `body` with the encoding named by `label`.
///
/// A leading BOM for that encoding is stripped and malformed sequences
/// become U+FFFD. Unknown labels decode as UTF-8. Returns the text and
/// whether any replacement happened.
pub fn decode(body: &[u8], label: &str) -> (String, bool) {
    let encoding = decoder_for(label).unwrap_or(UTF_8);
    let (text, had_errors) = encoding.decode_with_bom_removal(body);
    (text.into_owned(), had_errors)
}

/// Statistical guess, kept only when confident.
///
/// Pure ASCII carries no signal. Guesses the detector itself rates as low
/// confidence, or under which the body does not decode cleanly, are discarded.
fn sniff(body: &[u8]) -> Option<&'static str> {
    if body.is_ascii() {
        return None;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(body, true);
    let (guess, confident) = detector.guess_assess(None, true);
    if !confident {
        return None;
    }
    let (_, malformed) = guess.decode_without_bom_handling(body);
    if malformed {
        return None;
    }
    Some(guess.name())
}

fn embedded_declaration(body: &[u8]) -> Option<String> {
    let prefix = &body[..body.len().min(META_SCAN_LIMIT)];
    let view: String = prefix.iter().map(|&b| char::from(b & 0x7f)).collect();
    declared_charset(&view)
}

fn declared_charset(text: &str) -> Option<String> {
    CHARSET_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
