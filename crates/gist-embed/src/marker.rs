//! Embed marker detection.
//!
//! Markers are paragraphs of the form:
//!
//! ```text
//! <p>[gist:id=<hex>]</p>
//! <p>[gist:id=<hex>,lexer=<name>]</p>
//! <p>[gist:id=<hex>,file=<name>]</p>
//! <p>[gist:id=<hex>,file=<name>,lexer=<name>]</p>
//! ```
//!
//! The paragraph wrapper comes from markup being rendered before this pass
//! runs. This grammar is what authored content relies on; all parsing of it
//! lives in [`MarkerMatcher`].

use regex::Regex;

/// Built-in marker grammar.
pub const MARKER_PATTERN: &str =
    r"<p>\[gist:id=(?<id>[0-9a-fA-F]+)(?:,file=(?<file>[^\],]+))?(?:,lexer=(?<lexer>[^\]]+))?\]</p>";

/// One embed marker found in a document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedMarker {
    /// Exact matched text, used as the replacement key.
    pub raw: String,
    /// Gist identifier (hex, either case).
    pub gist_id: String,
    /// Single file within the gist.
    pub filename: Option<String>,
    /// Lexer name; guessed from content when absent.
    pub lexer: Option<String>,
}

/// Finds [`EmbedMarker`]s in document text.
#[derive(Debug, Clone)]
pub struct MarkerMatcher {
    pattern: Regex,
}

impl MarkerMatcher {
    /// Matcher for the built-in grammar.
    #[must_use]
    pub fn new() -> Self {
        Self::with_pattern(MARKER_PATTERN).expect("built-in marker pattern is valid")
    }

    /// Matcher for a custom grammar.
    ///
    /// The pattern must define an `id` capture group and may define `file`
    /// and `lexer` groups.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error for an invalid pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Lazily yield markers in `body`, left to right.
    ///
    /// Calling again on the same body restarts from the beginning.
    pub fn find<'a>(&'a self, body: &'a str) -> impl Iterator<Item = EmbedMarker> + 'a {
        self.pattern.captures_iter(body).filter_map(|caps| {
            let owned = |name: &str| caps.name(name).map(|m| m.as_str().to_owned());
            Some(EmbedMarker {
                raw: caps.get(0)?.as_str().to_owned(),
                gist_id: owned("id")?,
                filename: owned("file"),
                lexer: owned("lexer"),
            })
        })
    }
}

impl Default for MarkerMatcher {
    fn default() -> Self {
        Self::new()
    }
}
