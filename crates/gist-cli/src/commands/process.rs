//! `gistembed process` command implementation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use gist_config::{CliSettings, load_settings, prepare_settings};
use gist_embed::{Document, GistEmbedder};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the process command.
#[derive(Args)]
pub(crate) struct ProcessArgs {
    /// HTML files to process.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Write results here instead of rewriting the files in place.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover gistembed.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable the gist cache.
    #[arg(long)]
    no_cache: bool,

    /// Cache directory (overrides config).
    #[arg(long, env = "GIST_CACHE_LOCATION")]
    cache_dir: Option<PathBuf>,

    /// File containing the replacement template (overrides config).
    #[arg(long)]
    template: Option<PathBuf>,

    /// Per-fetch timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,

    /// Process files on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

/// An HTML file loaded as a [`Document`].
struct HtmlFile {
    path: PathBuf,
    name: String,
    body: String,
}

impl HtmlFile {
    fn read(path: &Path) -> Result<Self, CliError> {
        let body = fs::read_to_string(path).map_err(|source| CliError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            name: path.display().to_string(),
            body,
        })
    }

    /// Destination: `output_dir/<file name>`, or the source path itself.
    fn target(&self, output_dir: Option<&Path>) -> PathBuf {
        match (output_dir, self.path.file_name()) {
            (Some(dir), Some(file_name)) => dir.join(file_name),
            _ => self.path.clone(),
        }
    }

    fn write(&self, target: &Path) -> Result<(), CliError> {
        fs::write(target, &self.body).map_err(|source| CliError::File {
            path: target.to_path_buf(),
            source,
        })
    }
}

/// Resolve every file's destination, rejecting two files that share one.
fn output_targets(
    files: &[HtmlFile],
    output_dir: Option<&Path>,
) -> Result<Vec<PathBuf>, CliError> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
    let mut targets = Vec::with_capacity(files.len());
    for file in files {
        let target = file.target(output_dir);
        if let Some(first) = seen.insert(target.clone(), &file.path) {
            return Err(CliError::OutputCollision {
                first: first.to_path_buf(),
                second: file.path.clone(),
                target,
            });
        }
        targets.push(target);
    }
    Ok(targets)
}

impl Document for HtmlFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn body_mut(&mut self) -> &mut String {
        &mut self.body
    }
}

impl ProcessArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let template = self
            .template
            .as_deref()
            .map(|path| {
                fs::read_to_string(path).map_err(|source| CliError::File {
                    path: path.to_path_buf(),
                    source,
                })
            })
            .transpose()?;
        let cli_settings = CliSettings {
            cache_enabled: self.no_cache.then_some(false),
            cache_location: self.cache_dir.clone(),
            template,
            fetch_timeout: self.timeout,
        };
        let mut table = load_settings(self.config.as_deref(), Some(&cli_settings))?;
        let settings = prepare_settings(&mut table)?;

        if settings.cache_enabled {
            output.info(&format!("Cache: {}", settings.cache_location.display()));
        } else {
            output.info("Cache: disabled");
        }

        let mut files = self
            .files
            .iter()
            .map(|path| HtmlFile::read(path))
            .collect::<Result<Vec<_>, _>>()?;
        let targets = output_targets(&files, self.output_dir.as_deref())?;

        if let Some(dir) = &self.output_dir {
            fs::create_dir_all(dir).map_err(|source| CliError::File {
                path: dir.clone(),
                source,
            })?;
        }

        let embedder = GistEmbedder::from_settings(&settings);
        let report = if self.parallel {
            embedder.process_documents_parallel(&mut files)
        } else {
            embedder.process_documents(files.iter_mut())
        };

        for (file, target) in files.iter().zip(&targets) {
            file.write(target)?;
            tracing::debug!(path = %target.display(), "wrote document");
        }

        for skipped in &report.skipped {
            output.warning(&format!(
                "{}: gist {} left unreplaced ({})",
                skipped.document, skipped.gist_id, skipped.error
            ));
        }
        output.success(&format!(
            "Processed {} file(s): {} gist(s) embedded ({} cached, {} fetched), {} skipped",
            report.documents,
            report.substituted,
            report.from_cache,
            report.fetched,
            report.skipped.len()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_html_file_round_trip_in_place() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("post.html");
        fs::write(&path, "<p>[gist:id=ab]</p>").unwrap();

        let mut file = HtmlFile::read(&path).unwrap();
        assert_eq!(file.name(), path.display().to_string());
        file.body_mut().push_str("<p>more</p>");
        let target = file.target(None);
        file.write(&target).unwrap();

        assert_eq!(target, path);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "<p>[gist:id=ab]</p><p>more</p>"
        );
    }

    #[test]
    fn test_html_file_write_to_output_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("post.html");
        fs::write(&path, "original").unwrap();
        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();

        let mut file = HtmlFile::read(&path).unwrap();
        *file.body_mut() = "changed".to_owned();
        let target = file.target(Some(&out));
        file.write(&target).unwrap();

        assert_eq!(target, out.join("post.html"));
        assert_eq!(fs::read_to_string(target).unwrap(), "changed");
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_output_targets_reject_shared_basename() {
        let tmp = TempDir::new().unwrap();
        for (dir, body) in [("a", "A"), ("b", "B")] {
            fs::create_dir(tmp.path().join(dir)).unwrap();
            fs::write(tmp.path().join(dir).join("index.html"), body).unwrap();
        }
        let files = vec![
            HtmlFile::read(&tmp.path().join("a/index.html")).unwrap(),
            HtmlFile::read(&tmp.path().join("b/index.html")).unwrap(),
        ];
        let out = tmp.path().join("out");

        let err = output_targets(&files, Some(&out)).unwrap_err();

        match err {
            CliError::OutputCollision {
                first,
                second,
                target,
            } => {
                assert_eq!(first, tmp.path().join("a/index.html"));
                assert_eq!(second, tmp.path().join("b/index.html"));
                assert_eq!(target, out.join("index.html"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!out.exists());
    }

    #[test]
    fn test_output_targets_in_place_and_distinct() {
        let tmp = TempDir::new().unwrap();
        for dir in ["a", "b"] {
            fs::create_dir(tmp.path().join(dir)).unwrap();
            fs::write(tmp.path().join(dir).join("index.html"), "x").unwrap();
        }
        let files = vec![
            HtmlFile::read(&tmp.path().join("a/index.html")).unwrap(),
            HtmlFile::read(&tmp.path().join("b/index.html")).unwrap(),
        ];

        let targets = output_targets(&files, None).unwrap();

        assert_eq!(
            targets,
            vec![tmp.path().join("a/index.html"), tmp.path().join("b/index.html")]
        );
    }

    #[test]
    fn test_html_file_missing() {
        let tmp = TempDir::new().unwrap();
        let err = HtmlFile::read(&tmp.path().join("missing.html"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("missing.html"));
    }
}
