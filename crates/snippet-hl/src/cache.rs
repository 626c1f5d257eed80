#![forbid(unsafe_code)]

//! LRU cache of formatted documents.
//!
//! A presentation layer re-renders the same snippet many times (every
//! keystroke elsewhere on the page, theme toggles, fullscreen). The cache
//! memoizes [`format_with`] keyed strictly by everything that influences its
//! output: source text, language, palette, placeholder and overrides.
//!
//! Entries are looked up by a 64-bit `FxHasher` digest of the key, and the
//! stored key is compared on every hit, so a collision is a miss rather than
//! a wrong document.
//!
//! # Example
//! ```
//! use snippet_hl::{DocumentCache, HighlightConfig, Language};
//!
//! let mut cache = DocumentCache::new(16);
//! let config = HighlightConfig::default();
//!
//! let first = cache.get_or_format("ls -la", Language::Bash, None, &config);
//! let second = cache.get_or_format("ls -la", Language::Bash, None, &config);
//! assert_eq!(first, second);
//!
//! let stats = cache.stats();
//! assert_eq!(stats.hits, 1);
//! assert_eq!(stats.misses, 1);
//! ```

use lru::LruCache;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use crate::config::HighlightConfig;
use crate::document::{Document, format_with};
use crate::language::Language;
use crate::style::{Palette, StyleTable};

/// Statistics about cache performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Current number of entries.
    pub size: usize,
    /// Maximum capacity.
    pub capacity: usize,
}

impl CacheStats {
    /// Calculate hit rate (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source: String,
    language: Language,
    palette: Palette,
    placeholder: String,
    overrides: Option<StyleTable>,
}

impl CacheKey {
    fn matches(
        &self,
        source: &str,
        language: Language,
        overrides: Option<&StyleTable>,
        config: &HighlightConfig,
    ) -> bool {
        self.language == language
            && self.palette == config.palette
            && self.source == source
            && self.placeholder == config.placeholder
            && self.overrides.as_ref() == overrides
    }
}

#[derive(Debug)]
struct CacheEntry {
    key: CacheKey,
    document: Document<'static>,
}

/// LRU cache of formatted documents.
///
/// Not thread-safe; wrap in a mutex to share.
#[derive(Debug)]
pub struct DocumentCache {
    cache: LruCache<u64, CacheEntry>,
    hits: u64,
    misses: u64,
}

impl DocumentCache {
    /// Create a cache holding up to `capacity` documents (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached document for these inputs, formatting on a miss.
    pub fn get_or_format(
        &mut self,
        source: &str,
        language: Language,
        overrides: Option<&StyleTable>,
        config: &HighlightConfig,
    ) -> Document<'static> {
        let hash = hash_key(source, language, overrides, config);

        if let Some(entry) = self.cache.get(&hash)
            && entry.key.matches(source, language, overrides, config)
        {
            self.hits += 1;
            tracing::trace!(hash, language = language.as_str(), "document cache hit");
            return entry.document.clone();
        }

        self.misses += 1;
        tracing::trace!(hash, language = language.as_str(), "document cache miss");
        let document = format_with(source, language, overrides, config).into_owned();
        self.cache.put(
            hash,
            CacheEntry {
                key: CacheKey {
                    source: source.to_string(),
                    language,
                    palette: config.palette,
                    placeholder: config.placeholder.clone(),
                    overrides: overrides.cloned(),
                },
                document: document.clone(),
            },
        );
        document
    }

    /// Whether a document for these inputs is cached (does not touch LRU order).
    #[must_use]
    pub fn contains(
        &self,
        source: &str,
        language: Language,
        overrides: Option<&StyleTable>,
        config: &HighlightConfig,
    ) -> bool {
        let hash = hash_key(source, language, overrides, config);
        self.cache
            .peek(&hash)
            .is_some_and(|entry| entry.key.matches(source, language, overrides, config))
    }

    /// Clear all cached documents. Statistics are kept.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Reset hit/miss counters.
    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.cache.len(),
            capacity: self.cache.cap().get(),
        }
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CACHE_CAPACITY)
    }
}

#[inline]
fn hash_key(
    source: &str,
    language: Language,
    overrides: Option<&StyleTable>,
    config: &HighlightConfig,
) -> u64 {
    let mut hasher = FxHasher::default();
    source.hash(&mut hasher);
    language.hash(&mut hasher);
    config.palette.hash(&mut hasher);
    config.placeholder.hash(&mut hasher);
    overrides.hash(&mut hasher);
    hasher.finish()
}
