//! URL builders for a gist.
//!
//! Filenames are percent-encoded into a single path segment or query value.
//! Only RFC 3986 unreserved characters pass through, so `/`, quotes and
//! spaces never reach the wire or an HTML attribute literally.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// RFC 3986 unreserved characters: A-Z a-z 0-9 - . _ ~
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Default host serving gists.
pub const GIST_HOST: &str = "https://gist.github.com";

/// URL of the raw body, optionally of a single file.
///
/// ```
/// use gist_fetch::urls::raw_url;
///
/// assert_eq!(raw_url("https://gist.github.com", "abc", None), "https://gist.github.com/abc/raw");
/// assert_eq!(
///     raw_url("https://gist.github.com/", "abc", Some("a.py")),
///     "https://gist.github.com/abc/raw/a.py"
/// );
/// ```
#[must_use]
pub fn raw_url(base: &str, gist_id: &str, filename: Option<&str>) -> String {
    let base = base.trim_end_matches('/');
    match filename {
        Some(file) => format!("{base}/{gist_id}/raw/{}", encode_filename(file)),
        None => format!("{base}/{gist_id}/raw"),
    }
}

/// URL of the embed script, with a `?file=` suffix when a filename is given.
#[must_use]
pub fn script_url(gist_id: &str, filename: Option<&str>) -> String {
    match filename {
        Some(file) => format!("{GIST_HOST}/{gist_id}.js?file={}", encode_filename(file)),
        None => format!("{GIST_HOST}/{gist_id}.js"),
    }
}

/// Human-facing page URL.
#[must_use]
pub fn page_url(gist_id: &str) -> String {
    format!("{GIST_HOST}/{gist_id}")
}

/// Percent-encode `file` as one opaque segment.
///
/// Dot-only names (`.`, `..`) would be normalized away as path segments, so
/// their dots are encoded too.
fn encode_filename(file: &str) -> String {
    if file.bytes().all(|b| b == b'.') {
        return utf8_percent_encode(file, NON_ALPHANUMERIC).to_string();
    }
    utf8_percent_encode(file, FILENAME_ENCODE_SET).to_string()
}
