//! CSS for highlighted output.

use syntect::highlighting::ThemeSet;
use syntect::html::css_for_theme_with_class_style;

use crate::HighlightError;
use crate::highlighter::CLASS_STYLE;

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Generate a stylesheet for the classes [`Highlighter`](crate::Highlighter)
/// emits, from one of syntect's bundled themes.
///
/// # Errors
///
/// Returns [`HighlightError::UnknownTheme`] when `theme` is not bundled.
pub fn stylesheet(theme: &str) -> Result<String, HighlightError> {
    let themes = ThemeSet::load_defaults();
    let Some(theme_def) = themes.themes.get(theme) else {
        let mut known: Vec<&str> = themes.themes.keys().map(String::as_str).collect();
        known.sort_unstable();
        tracing::debug!(?known, "bundled themes");
        return Err(HighlightError::UnknownTheme(theme.to_owned()));
    };
    Ok(css_for_theme_with_class_style(theme_def, CLASS_STYLE)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_stylesheet() {
        let css = stylesheet(DEFAULT_THEME).unwrap();
        assert!(css.contains("color"));
        assert!(css.contains('{'));
    }

    #[test]
    fn test_unknown_theme() {
        let err = stylesheet("no-such-theme").unwrap_err();
        assert!(matches!(err, HighlightError::UnknownTheme(ref t) if t == "no-such-theme"));
    }
}
