//! Replacement template rendering.
//!
//! Templates interpolate `{{name}}` placeholders (surrounding whitespace
//! inside the braces is allowed). A trailing filter such as `{{ code|safe }}`
//! is ignored, so templates written for Jinja keep working. Placeholders with
//! no value in the context render as the empty string. Interpolated values are
//! inserted verbatim and never re-expanded.

use std::collections::BTreeMap;

use regex::{Captures, Regex};

const PLACEHOLDER_PATTERN: &str = r"\{\{([^{}]*)\}\}";

/// Variables available to a template.
///
/// Built per marker from a base context (host settings) overlaid with the
/// marker-specific `script_url`, `gist_url` and `code` values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    vars: BTreeMap<String, String>,
}

impl RenderContext {
    /// Start from a copy of `base`.
    #[must_use]
    pub fn from_base(base: &BTreeMap<String, String>) -> Self {
        Self { vars: base.clone() }
    }

    /// Set `name`, replacing any base value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Value of `name`, if set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

/// Compiled replacement template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    placeholder: Regex,
}

impl Template {
    /// Wrap template `source`.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            placeholder: Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern is valid"),
        }
    }

    /// Template source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render with `context`. Never fails.
    #[must_use]
    pub fn render(&self, context: &RenderContext) -> String {
        self.placeholder
            .replace_all(&self.source, |caps: &Captures<'_>| {
                let name = caps[1].split('|').next().unwrap_or_default().trim();
                context.get(name).unwrap_or_default().to_owned()
            })
            .into_owned()
    }
}
