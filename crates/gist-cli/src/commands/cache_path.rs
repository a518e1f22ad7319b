//! `gistembed cache-path` command implementation.

use std::path::PathBuf;

use clap::Args;
use gist_cache::{CacheKey, FileCache};
use gist_config::{CliSettings, load_settings, prepare_settings};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the cache-path command.
#[derive(Args)]
pub(crate) struct CachePathArgs {
    /// Gist id.
    id: String,

    /// File within the gist.
    #[arg(short, long)]
    file: Option<String>,

    /// Cache directory (overrides config).
    #[arg(long, env = "GIST_CACHE_LOCATION")]
    cache_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover gistembed.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CachePathArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            cache_location: self.cache_dir,
            ..CliSettings::default()
        };
        let mut table = load_settings(self.config.as_deref(), Some(&cli_settings))?;
        let settings = prepare_settings(&mut table)?;

        let cache = FileCache::new(settings.cache_location);
        let path = cache.path_for(&CacheKey::new(&self.id, self.file.as_deref()));

        Output::new().print(&path.display().to_string())?;
        Ok(())
    }
}
