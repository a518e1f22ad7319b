//! Per-document substitution pipeline.
//!
//! For each marker: consult the cache, fetch on a miss (populating the cache),
//! highlight, render the template, and replace every occurrence of the
//! marker's exact text in the body. A marker that fails to fetch or highlight
//! is left in the body untouched and reported; it never stops the remaining
//! markers or documents.

use std::collections::{BTreeMap, HashSet};

use gist_cache::{CacheKey, FileCache, GistCache, NullCache};
use gist_config::{DEFAULT_TEMPLATE, GistSettings};
use gist_fetch::urls::{page_url, script_url};
use gist_fetch::{FetchError, GistFetcher, HttpFetcher};
use gist_highlight::{HighlightError, Highlighter, escape};
use rayon::prelude::*;

use crate::document::Document;
use crate::marker::{EmbedMarker, MarkerMatcher};
use crate::template::{RenderContext, Template};

/// Failure that leaves a marker unreplaced.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("{0}")]
    Highlight(#[from] HighlightError),
}

impl EmbedError {
    /// Short label for log lines.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(e) => e.kind(),
            Self::Highlight(_) => "highlight",
        }
    }
}

/// A marker left in place.
#[derive(Debug)]
pub struct SkippedMarker {
    /// Name of the document containing the marker.
    pub document: String,
    /// Gist id from the marker.
    pub gist_id: String,
    /// Exact marker text still present in the body.
    pub raw: String,
    /// Why the marker was skipped.
    pub error: EmbedError,
}

/// Summary of a substitution pass.
#[derive(Debug, Default)]
pub struct ProcessReport {
    /// Documents visited.
    pub documents: usize,
    /// Distinct markers replaced.
    pub substituted: usize,
    /// Replaced markers whose body came from the cache.
    pub from_cache: usize,
    /// Replaced markers whose body was fetched.
    pub fetched: usize,
    /// Replaced markers rendered as escaped plain text (unknown lexer).
    pub unhighlighted: usize,
    /// Markers left in place.
    pub skipped: Vec<SkippedMarker>,
}

impl ProcessReport {
    /// Combine two reports.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.documents += other.documents;
        self.substituted += other.substituted;
        self.from_cache += other.from_cache;
        self.fetched += other.fetched;
        self.unhighlighted += other.unhighlighted;
        self.skipped.extend(other.skipped);
        self
    }
}

/// Where a gist body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Cache,
    Network,
}

/// Rendered replacement for one marker.
struct Replacement {
    html: String,
    origin: Origin,
    highlighted: bool,
}

/// Replaces gist markers in documents.
///
/// Holds everything the pipeline needs: marker grammar, template, base render
/// context, cache store, fetcher and highlighter. No process-wide state is
/// used, and one embedder can serve many documents, including from several
/// threads via [`process_documents_parallel`](Self::process_documents_parallel).
///
/// # Example
///
/// ```ignore
/// use gist_cache::FileCache;
/// use gist_embed::{GistEmbedder, TextDocument};
/// use gist_fetch::HttpFetcher;
///
/// let embedder = GistEmbedder::new(HttpFetcher::new())
///     .with_cache(Box::new(FileCache::new("/tmp/gist-cache")));
///
/// let mut doc = TextDocument::new("post", "<p>[gist:id=abc123,lexer=python]</p>");
/// embedder.process_document(&mut doc);
/// ```
pub struct GistEmbedder {
    matcher: MarkerMatcher,
    template: Template,
    base_context: BTreeMap<String, String>,
    cache: Box<dyn GistCache>,
    fetcher: Box<dyn GistFetcher>,
    highlighter: Highlighter,
}

impl GistEmbedder {
    /// Create an embedder with the default template and caching disabled.
    #[must_use]
    pub fn new(fetcher: impl GistFetcher + 'static) -> Self {
        Self {
            matcher: MarkerMatcher::new(),
            template: Template::new(DEFAULT_TEMPLATE),
            base_context: BTreeMap::new(),
            cache: Box::new(NullCache),
            fetcher: Box::new(fetcher),
            highlighter: Highlighter::new(),
        }
    }

    /// Create an embedder from prepared host settings.
    ///
    /// Uses an [`HttpFetcher`] with the configured timeout, a [`FileCache`] at
    /// the configured location when caching is enabled, the configured
    /// template, and every scalar setting as base render context.
    #[must_use]
    pub fn from_settings(settings: &GistSettings) -> Self {
        let cache: Box<dyn GistCache> = if settings.cache_enabled {
            Box::new(FileCache::new(&settings.cache_location))
        } else {
            Box::new(NullCache)
        };
        Self::new(HttpFetcher::new().timeout(settings.fetch_timeout))
            .with_cache(cache)
            .template(Template::new(settings.template.clone()))
            .base_context(settings.context.clone())
    }

    /// Set the cache store.
    #[must_use]
    pub fn with_cache(mut self, cache: Box<dyn GistCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Set the replacement template.
    #[must_use]
    pub fn template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    /// Set the base render context.
    #[must_use]
    pub fn base_context(mut self, context: BTreeMap<String, String>) -> Self {
        self.base_context = context;
        self
    }

    /// Set the marker grammar.
    #[must_use]
    pub fn matcher(mut self, matcher: MarkerMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Run the substitution pass over every document, in order.
    pub fn process_documents<'a, D, I>(&self, documents: I) -> ProcessReport
    where
        D: Document + ?Sized + 'a,
        I: IntoIterator<Item = &'a mut D>,
    {
        documents
            .into_iter()
            .map(|doc| self.process_document(doc))
            .fold(ProcessReport::default(), ProcessReport::merge)
    }

    /// Run the substitution pass over documents on the rayon thread pool.
    ///
    /// Documents share the cache store and fetcher. Output is identical to
    /// [`process_documents`](Self::process_documents); only the order of log
    /// lines and of `skipped` entries may differ.
    pub fn process_documents_parallel<D>(&self, documents: &mut [D]) -> ProcessReport
    where
        D: Document + Send,
    {
        documents
            .par_iter_mut()
            .map(|doc| self.process_document(doc))
            .reduce(ProcessReport::default, ProcessReport::merge)
    }

    /// Replace every marker in one document.
    ///
    /// Markers are collected before any replacement. Identical marker texts
    /// are handled once; replacing by exact text updates all occurrences.
    pub fn process_document<D: Document + ?Sized>(&self, document: &mut D) -> ProcessReport {
        let name = document.name().to_owned();
        let markers: Vec<EmbedMarker> = self.matcher.find(document.body_mut()).collect();
        let mut report = ProcessReport {
            documents: 1,
            ..ProcessReport::default()
        };

        let mut seen = HashSet::new();
        for marker in markers {
            if !seen.insert(marker.raw.clone()) {
                continue;
            }
            tracing::debug!(document = %name, gist_id = %marker.gist_id, "found gist marker");

            match self.render_marker(&marker) {
                Ok(replacement) => {
                    let body = document.body_mut();
                    *body = body.replace(&marker.raw, &replacement.html);

                    report.substituted += 1;
                    match replacement.origin {
                        Origin::Cache => report.from_cache += 1,
                        Origin::Network => report.fetched += 1,
                    }
                    if !replacement.highlighted {
                        report.unhighlighted += 1;
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        document = %name,
                        gist_id = %marker.gist_id,
                        kind = error.kind(),
                        "leaving gist marker in place: {error}"
                    );
                    report.skipped.push(SkippedMarker {
                        document: name.clone(),
                        gist_id: marker.gist_id,
                        raw: marker.raw,
                        error,
                    });
                }
            }
        }

        report
    }

    /// Produce the replacement HTML for one marker.
    fn render_marker(&self, marker: &EmbedMarker) -> Result<Replacement, EmbedError> {
        let gist_id = marker.gist_id.as_str();
        let filename = marker.filename.as_deref();

        let (body, origin) = match self.cached_body(gist_id, filename) {
            Some(body) => (body, Origin::Cache),
            None => (self.fetch_body(gist_id, filename)?, Origin::Network),
        };

        let (code, highlighted) = match self.highlighter.highlight(&body, marker.lexer.as_deref())
        {
            Ok(markup) => (markup, true),
            Err(HighlightError::UnknownLexer(lexer)) => {
                tracing::warn!(%gist_id, %lexer, "unknown lexer, embedding unhighlighted");
                (escape(&body), false)
            }
            Err(e) => return Err(e.into()),
        };

        let context = RenderContext::from_base(&self.base_context)
            .with("script_url", script_url(gist_id, filename))
            .with("gist_url", page_url(gist_id))
            .with("code", code);

        Ok(Replacement {
            html: self.template.render(&context),
            origin,
            highlighted,
        })
    }

    /// Cached body, if present and non-empty. Read failures count as a miss.
    fn cached_body(&self, gist_id: &str, filename: Option<&str>) -> Option<String> {
        let key = CacheKey::new(gist_id, filename);
        match self.cache.get(&key) {
            Ok(Some(body)) if !body.is_empty() => {
                tracing::debug!(%gist_id, "found gist in cache");
                Some(body)
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(%gist_id, kind = "cache-read", "{e}");
                None
            }
        }
    }

    /// Fetch a body and try to cache it. Cache write failures are logged only.
    fn fetch_body(&self, gist_id: &str, filename: Option<&str>) -> Result<String, FetchError> {
        tracing::info!(%gist_id, "gist not in cache, fetching");
        let body = self.fetcher.fetch(gist_id, filename)?;

        let key = CacheKey::new(gist_id, filename);
        if let Err(e) = self.cache.set(&key, &body) {
            tracing::warn!(%gist_id, kind = "cache-write", "{e}");
        }
        Ok(body)
    }
}
