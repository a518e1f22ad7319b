//! Host settings map: defaults, validation and the resolved [`GistSettings`].

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use toml::{Table, Value};

use crate::ConfigError;
use crate::expand::expand_env;

/// Whether fetched gists are cached on disk (bool).
pub const CACHE_ENABLED_KEY: &str = "GIST_CACHE_ENABLED";
/// Cache directory (string path).
pub const CACHE_LOCATION_KEY: &str = "GIST_CACHE_LOCATION";
/// Replacement template source (string).
pub const TEMPLATE_KEY: &str = "GIST_TEMPLATE";
/// Per-fetch timeout in seconds (positive integer).
pub const FETCH_TIMEOUT_KEY: &str = "GIST_FETCH_TIMEOUT";

/// Built-in replacement template.
pub const DEFAULT_TEMPLATE: &str = r#"<div class="gist">
    <script src='{{script_url}}'></script>
    <noscript>
        <pre><code>{{code}}</code></pre>
    </noscript>
</div>"#;

/// Default per-fetch timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: i64 = 30;

/// Default cache directory: `gist-cache` under the system temp directory.
#[must_use]
pub fn default_cache_location() -> PathBuf {
    std::env::temp_dir().join("gist-cache")
}

/// Settings resolved from the host settings map.
#[derive(Debug, Clone)]
pub struct GistSettings {
    /// Whether the on-disk cache is consulted and populated.
    pub cache_enabled: bool,
    /// Cache directory (expanded).
    pub cache_location: PathBuf,
    /// Replacement template source.
    pub template: String,
    /// Per-fetch network timeout.
    pub fetch_timeout: Duration,
    /// Every scalar host setting, stringified. Used as the base render context.
    pub context: BTreeMap<String, String>,
}

/// Fill in defaults, validate, and resolve the host settings map.
///
/// Missing keys are inserted into `settings` so the host sees the effective
/// values afterwards. When caching is enabled the cache directory is created.
///
/// # Errors
///
/// Returns `ConfigError::Validation` for values of the wrong type,
/// `ConfigError::EnvVar` when the cache location references an unset
/// variable, and `ConfigError::Io` when the cache directory cannot be created.
pub fn prepare_settings(settings: &mut Table) -> Result<GistSettings, ConfigError> {
    settings
        .entry(CACHE_ENABLED_KEY)
        .or_insert(Value::Boolean(true));
    settings.entry(CACHE_LOCATION_KEY).or_insert_with(|| {
        Value::String(default_cache_location().to_string_lossy().into_owned())
    });
    settings
        .entry(TEMPLATE_KEY)
        .or_insert_with(|| Value::String(DEFAULT_TEMPLATE.to_owned()));
    settings
        .entry(FETCH_TIMEOUT_KEY)
        .or_insert(Value::Integer(DEFAULT_FETCH_TIMEOUT_SECS));

    let cache_enabled = require_bool(settings, CACHE_ENABLED_KEY)?;
    let location = expand_env(require_str(settings, CACHE_LOCATION_KEY)?, CACHE_LOCATION_KEY)?;
    if location.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{CACHE_LOCATION_KEY} cannot be empty"
        )));
    }
    let template = require_str(settings, TEMPLATE_KEY)?.to_owned();
    let fetch_timeout = require_timeout(settings)?;

    let cache_location = PathBuf::from(location);
    if cache_enabled {
        std::fs::create_dir_all(&cache_location)?;
        tracing::debug!(path = %cache_location.display(), "gist cache directory ready");
    }

    Ok(GistSettings {
        cache_enabled,
        cache_location,
        template,
        fetch_timeout,
        context: scalar_context(settings),
    })
}

fn require_bool(settings: &Table, key: &str) -> Result<bool, ConfigError> {
    settings
        .get(key)
        .and_then(Value::as_bool)
        .ok_or_else(|| ConfigError::Validation(format!("{key} must be a boolean")))
}

fn require_str<'a>(settings: &'a Table, key: &str) -> Result<&'a str, ConfigError> {
    settings
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ConfigError::Validation(format!("{key} must be a string")))
}

fn require_timeout(settings: &Table) -> Result<Duration, ConfigError> {
    let secs = settings
        .get(FETCH_TIMEOUT_KEY)
        .and_then(Value::as_integer)
        .and_then(|s| u64::try_from(s).ok())
        .filter(|&s| s > 0)
        .ok_or_else(|| {
            ConfigError::Validation(format!("{FETCH_TIMEOUT_KEY} must be a positive integer"))
        })?;
    Ok(Duration::from_secs(secs))
}

/// Stringify every scalar setting. Arrays and tables are skipped.
fn scalar_context(settings: &Table) -> BTreeMap<String, String> {
    settings
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Integer(i) => i.to_string(),
                Value::Float(f) => f.to_string(),
                Value::Boolean(b) => b.to_string(),
                Value::Datetime(d) => d.to_string(),
                Value::Array(_) | Value::Table(_) => return None,
            };
            Some((key.clone(), text))
        })
        .collect()
}
