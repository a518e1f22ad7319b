//! CLI error types.

use std::path::PathBuf;

use gist_config::ConfigError;
use gist_highlight::HighlightError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Highlight(#[from] HighlightError),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "{} and {} would both be written to {}",
        first.display(),
        second.display(),
        target.display()
    )]
    OutputCollision {
        first: PathBuf,
        second: PathBuf,
        target: PathBuf,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
