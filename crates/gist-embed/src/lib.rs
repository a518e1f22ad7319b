//! Gist embedding for rendered HTML.
//!
//! Finds `<p>[gist:id=...]</p>` markers in document bodies, fetches the
//! referenced gist (through an on-disk cache), highlights it, renders the
//! replacement template, and substitutes it for the marker.
//!
//! # Architecture
//!
//! - [`marker`]: marker grammar and [`MarkerMatcher`]
//! - [`template`]: `{{name}}` interpolation ([`Template`], [`RenderContext`])
//! - [`document`]: the [`Document`] seam hosts implement
//! - [`processor`]: [`GistEmbedder`], which drives the per-marker pipeline
//!
//! Host integration is two calls: [`prepare_settings`] once at startup, then
//! [`GistEmbedder::process_documents`] for each document batch.
//!
//! # Example
//!
//! ```no_run
//! use gist_embed::{GistEmbedder, TextDocument, prepare_settings};
//!
//! let mut settings = toml::Table::new();
//! let settings = prepare_settings(&mut settings)?;
//! let embedder = GistEmbedder::from_settings(&settings);
//!
//! let mut docs = vec![TextDocument::new("post.html", "<p>[gist:id=abc123]</p>")];
//! let report = embedder.process_documents(docs.iter_mut());
//! assert_eq!(report.substituted, 1);
//! # Ok::<(), gist_embed::ConfigError>(())
//! ```

pub mod document;
pub mod marker;
pub mod processor;
pub mod template;

pub use document::{Document, TextDocument};
pub use gist_config::{ConfigError, GistSettings, prepare_settings};
pub use marker::{EmbedMarker, MarkerMatcher};
pub use processor::{EmbedError, GistEmbedder, ProcessReport, SkippedMarker};
pub use template::{RenderContext, Template};
