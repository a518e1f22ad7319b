//! `gistembed css` command implementation.

use clap::Args;
use gist_highlight::{DEFAULT_THEME, stylesheet};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the css command.
#[derive(Args)]
pub(crate) struct CssArgs {
    /// Bundled syntect theme to generate the stylesheet from.
    #[arg(short, long, default_value = DEFAULT_THEME)]
    theme: String,
}

impl CssArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let css = stylesheet(&self.theme)?;
        Output::new().print(&css)?;
        Ok(())
    }
}
