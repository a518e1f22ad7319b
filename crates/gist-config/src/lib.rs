//! Settings handling for Gist embedding.
//!
//! Settings form a flat host map (a [`toml::Table`] of upper-case keys, in the
//! style of static site generator settings). The recognized keys are:
//!
//! - `GIST_CACHE_ENABLED` (bool, default `true`)
//! - `GIST_CACHE_LOCATION` (path, default `<temp>/gist-cache`)
//! - `GIST_TEMPLATE` (template source, default [`DEFAULT_TEMPLATE`])
//! - `GIST_FETCH_TIMEOUT` (seconds, default 30)
//!
//! Any other scalar keys are passed through to the render context.
//!
//! [`load_settings`] reads the map from `gistembed.toml` (auto-discovered in
//! the current directory and its parents) and applies [`CliSettings`];
//! [`prepare_settings`] fills in defaults and resolves [`GistSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `GIST_CACHE_LOCATION` supports `~`, `${VAR}` and `${VAR:-default}`,
//! expanded by [`prepare_settings`]. A relative location in a settings file is
//! resolved against the file's directory unless it starts with `~` or `$`.

mod expand;
mod settings;

use std::path::{Path, PathBuf};

use toml::{Table, Value};

pub use settings::{
    CACHE_ENABLED_KEY, CACHE_LOCATION_KEY, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_TEMPLATE,
    FETCH_TIMEOUT_KEY, GistSettings, TEMPLATE_KEY, default_cache_location, prepare_settings,
};

/// Settings filename to search for.
const CONFIG_FILENAME: &str = "gistembed.toml";

/// CLI settings that override settings file values.
///
/// All fields are optional. Only non-None values override the loaded map.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override `GIST_CACHE_ENABLED`.
    pub cache_enabled: Option<bool>,
    /// Override `GIST_CACHE_LOCATION`.
    pub cache_location: Option<PathBuf>,
    /// Override `GIST_TEMPLATE` (template source, not a path).
    pub template: Option<String>,
    /// Override `GIST_FETCH_TIMEOUT` in seconds.
    pub fetch_timeout: Option<u64>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Setting key (e.g., "`GIST_CACHE_LOCATION`").
        field: String,
        /// Error message (e.g., "${`HOME`} not set").
        message: String,
    },
}

/// Load the host settings map.
///
/// If `config_path` is provided, loads from that file. Otherwise searches for
/// `gistembed.toml` in the current directory and parents, falling back to an
/// empty map. CLI settings are applied last and take precedence.
///
/// The result still needs [`prepare_settings`] to fill in defaults.
///
/// # Errors
///
/// Returns error if explicit `config_path` doesn't exist or parsing fails.
pub fn load_settings(
    config_path: Option<&Path>,
    cli_settings: Option<&CliSettings>,
) -> Result<Table, ConfigError> {
    let mut table = if let Some(path) = config_path {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        load_from_file(path)?
    } else if let Some(discovered) = discover_config() {
        load_from_file(&discovered)?
    } else {
        Table::new()
    };

    if let Some(cli) = cli_settings {
        apply_cli_settings(&mut table, cli);
    }

    Ok(table)
}

/// Load a settings file, resolving a relative cache location against its directory.
fn load_from_file(path: &Path) -> Result<Table, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut table: Table = toml::from_str(&content)?;
    tracing::debug!(path = %path.display(), keys = table.len(), "loaded settings file");

    // Expansion happens once, in `prepare_settings`; only plain relative
    // locations are anchored here.
    let relative = match table.get(CACHE_LOCATION_KEY) {
        Some(Value::String(location)) if !location.starts_with(['~', '$']) => {
            Some(location.clone())
        }
        _ => None,
    };
    if let Some(location) = relative {
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let resolved = config_dir.join(location);
        table.insert(
            CACHE_LOCATION_KEY.to_owned(),
            Value::String(resolved.to_string_lossy().into_owned()),
        );
    }

    Ok(table)
}

/// Apply CLI settings to the map.
fn apply_cli_settings(table: &mut Table, settings: &CliSettings) {
    if let Some(enabled) = settings.cache_enabled {
        table.insert(CACHE_ENABLED_KEY.to_owned(), Value::Boolean(enabled));
    }
    if let Some(location) = &settings.cache_location {
        table.insert(
            CACHE_LOCATION_KEY.to_owned(),
            Value::String(location.to_string_lossy().into_owned()),
        );
    }
    if let Some(template) = &settings.template {
        table.insert(TEMPLATE_KEY.to_owned(), Value::String(template.clone()));
    }
    if let Some(timeout) = settings.fetch_timeout {
        let secs = i64::try_from(timeout).unwrap_or(i64::MAX);
        table.insert(FETCH_TIMEOUT_KEY.to_owned(), Value::Integer(secs));
    }
}

/// Search for the settings file in current directory and parents.
fn discover_config() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
