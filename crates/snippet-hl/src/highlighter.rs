#![forbid(unsafe_code)]

//! Reusable highlighter with an optional document cache.

use crate::cache::{CacheStats, DocumentCache};
use crate::config::HighlightConfig;
use crate::document::{Document, format_with};
use crate::error::HighlightError;
use crate::language::Language;
use crate::style::StyleTable;

/// Long-lived highlighting entry point.
///
/// Owns a [`HighlightConfig`] and, when caching is enabled, a
/// [`DocumentCache`] sized from the config.
#[derive(Debug)]
pub struct Highlighter {
    config: HighlightConfig,
    cache: Option<DocumentCache>,
}

impl Highlighter {
    pub fn new(config: HighlightConfig) -> Self {
        let cache = config
            .cache_enabled
            .then(|| DocumentCache::new(config.cache_capacity));
        Self { config, cache }
    }

    /// Build from `SNIPPET_HL_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(HighlightConfig::from_env())
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Format `source` for the language named by `tag`.
    pub fn highlight(
        &mut self,
        source: &str,
        tag: &str,
        overrides: Option<&StyleTable>,
    ) -> Result<Document<'static>, HighlightError> {
        let language = Language::from_tag(tag)?;
        Ok(self.highlight_language(source, language, overrides))
    }

    /// Format `source` as an already resolved language.
    pub fn highlight_language(
        &mut self,
        source: &str,
        language: Language,
        overrides: Option<&StyleTable>,
    ) -> Document<'static> {
        match &mut self.cache {
            Some(cache) => cache.get_or_format(source, language, overrides, &self.config),
            None => format_with(source, language, overrides, &self.config).into_owned(),
        }
    }

    /// Cache statistics, or `None` when caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(DocumentCache::stats)
    }

    pub fn clear_cache(&mut self) {
        if let Some(cache) = &mut self.cache {
            cache.clear();
        }
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(HighlightConfig::default())
    }
}
