/*!
 * Translation caching functionality.
 *
 * This module keeps recently translated chunks so a translation can still
 * be served when every provider is unreachable. The cache is bounded in
 * both size (oldest entries are evicted first) and age (expired entries
 * are never served).
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;
use parking_lot::RwLock;

use crate::app_config::CacheConfig;

/// Cache key combining source text, source language, and target language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Source text to translate
    source_text: String,

    /// Source language code
    source_language: String,

    /// Target language code
    target_language: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(source_text: &str, source_language: &str, target_language: &str) -> Self {
        Self {
            source_text: source_text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedTranslation {
    translated_text: String,
    created_at: DateTime<Utc>,
}

/// A cache entry in its persistable form
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Source chunk text
    pub source_text: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Translated chunk text
    pub translated_text: String,
    /// When the translation was stored
    pub created_at: DateTime<Utc>,
}

/// Translation cache for storing and retrieving translations
pub struct TranslationCache {
    /// Internal cache storage
    cache: Arc<RwLock<HashMap<CacheKey, CachedTranslation>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,

    /// Whether caching is enabled
    enabled: bool,

    /// Maximum number of entries kept
    max_entries: usize,

    /// Entry lifetime
    max_age: Duration,
}

impl TranslationCache {
    /// Create a new translation cache
    pub fn new(enabled: bool, max_entries: usize, max_age: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
            enabled,
            max_entries,
            max_age,
        }
    }

    /// Create a cache from its configuration section
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.enabled, config.max_entries, Duration::from_secs(config.max_age_secs))
    }

    fn is_fresh(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(self.max_age) {
            Ok(max_age) => now.signed_duration_since(created_at) <= max_age,
            Err(_) => true,
        }
    }

    /// Get a fresh translation from the cache
    pub fn get(&self, source_text: &str, source_language: &str, target_language: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::new(source_text, source_language, target_language);
        let cache = self.cache.read();

        match cache.get(&key).filter(|entry| self.is_fresh(entry.created_at, Utc::now())) {
            Some(entry) => {
                // Increment hit counter
                let mut hits = self.hits.write();
                *hits += 1;

                debug!("Cache hit for '{}' ({} -> {})",
                       truncate_text(source_text, 30),
                       source_language,
                       target_language);

                Some(entry.translated_text.clone())
            },
            None => {
                // Increment miss counter
                let mut misses = self.misses.write();
                *misses += 1;

                debug!("Cache miss for '{}' ({} -> {})",
                       truncate_text(source_text, 30),
                       source_language,
                       target_language);

                None
            }
        }
    }

    /// Store a translation in the cache
    pub fn store(&self, source_text: &str, source_language: &str, target_language: &str, translation: &str) {
        self.insert(
            CacheKey::new(source_text, source_language, target_language),
            CachedTranslation {
                translated_text: translation.to_string(),
                created_at: Utc::now(),
            },
        );

        debug!("Cached translation for '{}' ({} -> {})",
               truncate_text(source_text, 30),
               source_language,
               target_language);
    }

    fn insert(&self, key: CacheKey, value: CachedTranslation) {
        if !self.enabled || self.max_entries == 0 {
            return;
        }

        let mut cache = self.cache.write();
        cache.insert(key, value);

        while cache.len() > self.max_entries {
            let oldest = cache
                .iter()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    cache.remove(&key);
                }
                None => break,
            }
        }
    }

    /// Drop expired entries, returning how many were removed
    pub fn prune_expired(&self) -> usize {
        let now = Utc::now();
        let mut cache = self.cache.write();
        let before = cache.len();
        cache.retain(|_, entry| self.is_fresh(entry.created_at, now));
        let removed = before - cache.len();
        if removed > 0 {
            debug!("Pruned {} expired cache entries", removed);
        }
        removed
    }

    /// Fresh entries, oldest first
    pub fn snapshot(&self) -> Vec<CacheEntry> {
        let now = Utc::now();
        let cache = self.cache.read();
        let mut entries: Vec<CacheEntry> = cache
            .iter()
            .filter(|(_, entry)| self.is_fresh(entry.created_at, now))
            .map(|(key, entry)| CacheEntry {
                source_text: key.source_text.clone(),
                source_language: key.source_language.clone(),
                target_language: key.target_language.clone(),
                translated_text: entry.translated_text.clone(),
                created_at: entry.created_at,
            })
            .collect();
        entries.sort_by_key(|entry| entry.created_at);
        entries
    }

    /// Load persisted entries, skipping expired ones and keeping their timestamps
    pub fn hydrate(&self, entries: Vec<CacheEntry>) -> usize {
        let now = Utc::now();
        let mut loaded = 0;
        for entry in entries {
            if !self.is_fresh(entry.created_at, now) {
                continue;
            }
            self.insert(
                CacheKey::new(&entry.source_text, &entry.source_language, &entry.target_language),
                CachedTranslation {
                    translated_text: entry.translated_text,
                    created_at: entry.created_at,
                },
            );
            loaded += 1;
        }
        debug!("Hydrated translation cache with {} entries", loaded);
        loaded
    }

    /// Get cache statistics
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Clear the cache
    pub fn clear(&self) {
        let mut cache = self.cache.write();
        cache.clear();

        let mut hits = self.hits.write();
        *hits = 0;

        let mut misses = self.misses.write();
        *misses = 0;

        debug!("Translation cache cleared");
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Maximum number of entries kept
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Entry lifetime
    pub fn max_age(&self) -> Duration {
        self.max_age
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

impl Clone for TranslationCache {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
            enabled: self.enabled,
            max_entries: self.max_entries,
            max_age: self.max_age,
        }
    }
}

impl std::fmt::Debug for TranslationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationCache")
            .field("entries", &self.len())
            .field("enabled", &self.enabled)
            .field("max_entries", &self.max_entries)
            .field("max_age", &self.max_age)
            .finish()
    }
}

/// Truncate text to a maximum number of chars with ellipsis
fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_length).collect::<String>())
    }
}
