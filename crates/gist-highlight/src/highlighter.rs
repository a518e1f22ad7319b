//! Lexer resolution and HTML generation.

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::HighlightError;
use crate::guess::guess_token;

/// Class style shared by the generator and [`stylesheet`](crate::stylesheet).
pub(crate) const CLASS_STYLE: ClassStyle = ClassStyle::Spaced;

/// Common lexer names that do not match a bundled syntax token directly.
const ALIASES: &[(&str, &str)] = &[
    ("python3", "py"),
    ("py3", "py"),
    ("bash", "sh"),
    ("shell", "sh"),
    ("zsh", "sh"),
    ("console", "sh"),
    ("javascript", "js"),
    ("node", "js"),
    ("c++", "cpp"),
    ("csharp", "cs"),
    ("c#", "cs"),
    ("golang", "go"),
    ("rust", "rs"),
    ("ruby", "rb"),
    ("perl", "pl"),
    ("markdown", "md"),
    ("yml", "yaml"),
    ("objective-c", "m"),
    ("objc", "m"),
    ("text", "txt"),
    ("plain", "txt"),
    ("none", "txt"),
];

/// Renders source text as highlighted HTML.
///
/// The grammar set is loaded once at construction; a single `Highlighter`
/// can be shared across threads.
///
/// # Example
///
/// ```
/// use gist_highlight::Highlighter;
///
/// let highlighter = Highlighter::new();
/// let html = highlighter.highlight("fn main() {}\n", Some("rust")).unwrap();
/// assert!(html.starts_with("<div class=\"highlight\"><pre>"));
/// ```
pub struct Highlighter {
    syntaxes: SyntaxSet,
}

impl Highlighter {
    /// Create a highlighter with syntect's bundled grammars.
    #[must_use]
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Highlight `content` with the named lexer, or a guessed one when `lexer`
    /// is `None`.
    ///
    /// Output is `<div class="highlight"><pre>...</pre></div>` with all literal
    /// content HTML-escaped.
    ///
    /// # Errors
    ///
    /// Returns [`HighlightError::UnknownLexer`] when `lexer` names no known
    /// grammar. Guessing never fails; unrecognized content is rendered as
    /// plain text.
    pub fn highlight(&self, content: &str, lexer: Option<&str>) -> Result<String, HighlightError> {
        let syntax = match lexer {
            Some(name) => self.resolve(name)?,
            None => self.guess(content),
        };
        tracing::debug!(syntax = %syntax.name, "highlighting");

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(content) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(format!(
            "<div class=\"highlight\"><pre>{}</pre></div>",
            generator.finalize()
        ))
    }

    /// Look up a grammar by lexer name.
    ///
    /// Tries, in order: known aliases, file-extension tokens, then the
    /// grammar's display name (case-insensitive).
    pub fn resolve(&self, name: &str) -> Result<&SyntaxReference, HighlightError> {
        let lower = name.trim().to_lowercase();
        let token = ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map_or(lower.as_str(), |&(_, token)| token);

        self.syntaxes
            .find_syntax_by_token(token)
            .or_else(|| {
                self.syntaxes
                    .syntaxes()
                    .iter()
                    .find(|s| s.name.eq_ignore_ascii_case(&lower))
            })
            .ok_or_else(|| HighlightError::UnknownLexer(name.to_owned()))
    }

    /// Best-effort grammar guess; plain text when nothing fits.
    fn guess(&self, content: &str) -> &SyntaxReference {
        let first_line = content.lines().next().unwrap_or_default();
        self.syntaxes
            .find_syntax_by_first_line(first_line)
            .or_else(|| guess_token(content).and_then(|t| self.syntaxes.find_syntax_by_token(t)))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape `content` for embedding as HTML text.
#[must_use]
pub fn escape(content: &str) -> String {
    html_escape::encode_text(content).into_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_highlight_named_lexer() {
        let h = Highlighter::new();
        let html = h.highlight("def f():\n    return 1\n", Some("python")).unwrap();

        assert!(html.starts_with("<div class=\"highlight\"><pre>"));
        assert!(html.ends_with("</pre></div>"));
        assert!(html.contains("<span class=\""));
        assert!(html.contains("return"));
    }

    #[test]
    fn test_highlight_escapes_markup() {
        let h = Highlighter::new();
        let html = h
            .highlight("<script>alert(1)</script>\n", Some("text"))
            .unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_highlight_without_trailing_newline() {
        let h = Highlighter::new();
        let html = h.highlight("print(\"hi\")", None).unwrap();

        assert!(html.contains("hi"));
    }

    #[test]
    fn test_highlight_unknown_lexer() {
        let h = Highlighter::new();
        let err = h.highlight("x", Some("no-such-lexer")).unwrap_err();

        assert!(matches!(err, HighlightError::UnknownLexer(ref n) if n == "no-such-lexer"));
    }

    #[test]
    fn test_resolve_aliases_and_names() {
        let h = Highlighter::new();

        assert_eq!(h.resolve("python").unwrap().name, "Python");
        assert_eq!(h.resolve("python3").unwrap().name, "Python");
        assert_eq!(h.resolve("Python").unwrap().name, "Python");
        assert_eq!(h.resolve("rs").unwrap().name, "Rust");
        assert_eq!(h.resolve("rust").unwrap().name, "Rust");
        assert_eq!(h.resolve("javascript").unwrap().name, "JavaScript");
        assert_eq!(h.resolve("text").unwrap().name, "Plain Text");
    }

    #[test]
    fn test_guess_from_shebang() {
        let h = Highlighter::new();
        assert_eq!(h.guess("#!/usr/bin/env python\nprint(1)\n").name, "Python");
    }

    #[test]
    fn test_guess_falls_back_to_plain_text() {
        let h = Highlighter::new();
        assert_eq!(h.guess("just some words\n").name, "Plain Text");
    }

    #[test]
    fn test_guess_uses_content_heuristics() {
        let h = Highlighter::new();
        let rust = "use std::fmt;\n\nfn main() {\n    let x = 1;\n}\n";
        assert_eq!(h.guess(rust).name, "Rust");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }
}
