/*!
 * Database entity models and DTOs.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::translation::cache::CacheEntry;

/// Number of chars shown in history previews
pub const PREVIEW_CHARS: usize = 60;

/// A completed translation kept in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Database ID
    pub id: i64,
    /// Text as submitted
    pub original: String,
    /// Final translated text
    pub translated: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

impl HistoryEntry {
    /// Create a new history entry (without database ID)
    pub fn new(
        original: String,
        translated: String,
        source_language: String,
        target_language: String,
    ) -> Self {
        Self {
            id: 0, // Will be assigned by database
            original,
            translated,
            source_language,
            target_language,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Shortened original text for listings
    pub fn original_preview(&self) -> String {
        preview(&self.original)
    }

    /// Shortened translated text for listings
    pub fn translated_preview(&self) -> String {
        preview(&self.translated)
    }
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > PREVIEW_CHARS {
        format!("{}...", flat.chars().take(PREVIEW_CHARS).collect::<String>())
    } else {
        flat
    }
}

/// A user-defined term replacement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    /// Database ID
    pub id: i64,
    /// Term to look for in translated text
    pub term: String,
    /// Replacement text
    pub translation: String,
    /// Target language the entry applies to
    pub target_language: String,
}

impl GlossaryEntry {
    /// Create a new glossary entry (without database ID)
    pub fn new(term: String, translation: String, target_language: String) -> Self {
        Self {
            id: 0, // Will be assigned by database
            term,
            translation,
            target_language,
        }
    }
}

/// Persisted response cache row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Database ID
    pub id: i64,
    /// SHA256 hash of source text
    pub source_text_hash: String,
    /// Original source text
    pub source_text: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Translated text
    pub translated_text: String,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

impl CacheRecord {
    /// Hash used to index source texts
    pub fn hash_text(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Parsed creation timestamp
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Convert into an in-memory cache entry, if the timestamp is readable
    pub fn into_cache_entry(self) -> Option<CacheEntry> {
        let created_at = self.created_at_utc()?;
        Some(CacheEntry {
            source_text: self.source_text,
            source_language: self.source_language,
            target_language: self.target_language,
            translated_text: self.translated_text,
            created_at,
        })
    }
}

impl From<&CacheEntry> for CacheRecord {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            id: 0, // Will be assigned by database
            source_text_hash: Self::hash_text(&entry.source_text),
            source_text: entry.source_text.clone(),
            source_language: entry.source_language.clone(),
            target_language: entry.target_language.clone(),
            translated_text: entry.translated_text.clone(),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}
