//! Syntax highlighting for embedded Gists.
//!
//! [`Highlighter`] resolves a lexer by name, or guesses one from the content,
//! and renders class-annotated HTML via syntect. [`stylesheet`] produces the
//! matching CSS from one of syntect's bundled themes.

mod guess;
mod highlighter;
mod style;

pub use highlighter::{Highlighter, escape};
pub use style::{DEFAULT_THEME, stylesheet};

/// Highlighting failure.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// No grammar is known under this name.
    #[error("unknown lexer: {0}")]
    UnknownLexer(String),
    /// No bundled theme is known under this name.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    /// syntect failed while parsing or generating HTML.
    #[error("highlighting failed: {0}")]
    Render(#[from] syntect::Error),
}
