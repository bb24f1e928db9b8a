/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for all database operations,
 * abstracting away the SQL details and providing type-safe access.
 */

use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::debug;
use rusqlite::{params, Connection, Row};

use super::connection::DatabaseConnection;
use super::models::{CacheRecord, GlossaryEntry, HistoryEntry};
use crate::translation::cache::CacheEntry;

/// Default number of history entries returned by `list_history`
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // History Operations
    // =========================================================================

    /// Record a completed translation, returning its ID
    pub async fn add_history(&self, entry: &HistoryEntry) -> Result<i64> {
        let entry = entry.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO history (original, translated, source_language, target_language, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    params![
                        entry.original,
                        entry.translated,
                        entry.source_language,
                        entry.target_language,
                        entry.created_at,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
    }

    /// List the most recent history entries, newest first
    pub async fn list_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, original, translated, source_language, target_language, created_at
                    FROM history
                    ORDER BY id DESC
                    LIMIT ?1
                    "#,
                )?;

                let entries = stmt
                    .query_map([limit as i64], |row| {
                        Ok(HistoryEntry {
                            id: row.get(0)?,
                            original: row.get(1)?,
                            translated: row.get(2)?,
                            source_language: row.get(3)?,
                            target_language: row.get(4)?,
                            created_at: row.get(5)?,
                        })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;

                Ok(entries)
            })
            .await
    }

    /// Delete all history entries, returning how many were removed
    pub async fn clear_history(&self) -> Result<i64> {
        self.db
            .execute_async(|conn| {
                let deleted = conn.execute("DELETE FROM history", [])?;
                debug!("Cleared {} history entries", deleted);
                Ok(deleted as i64)
            })
            .await
    }

    /// Keep only the newest `keep` history entries, returning how many were removed
    pub async fn prune_history(&self, keep: usize) -> Result<usize> {
        self.db
            .execute_async(move |conn| {
                let deleted = conn.execute(
                    r#"
                    DELETE FROM history
                    WHERE id NOT IN (SELECT id FROM history ORDER BY id DESC LIMIT ?1)
                    "#,
                    [keep as i64],
                )?;
                if deleted > 0 {
                    debug!("Pruned {} history entries", deleted);
                }
                Ok(deleted)
            })
            .await
    }

    // =========================================================================
    // Glossary Operations
    // =========================================================================

    fn validate_glossary_entry(entry: &GlossaryEntry) -> Result<()> {
        if entry.term.trim().is_empty()
            || entry.translation.trim().is_empty()
            || entry.target_language.trim().is_empty()
        {
            return Err(anyhow!("Glossary term, translation and target language are all required"));
        }
        Ok(())
    }

    /// Add a glossary entry, returning its ID
    pub async fn add_glossary_entry(&self, entry: &GlossaryEntry) -> Result<i64> {
        Self::validate_glossary_entry(entry)?;
        let entry = entry.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "INSERT INTO glossary (term, translation, target_language) VALUES (?1, ?2, ?3)",
                    params![entry.term.trim(), entry.translation.trim(), entry.target_language.trim()],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
    }

    /// Update an existing glossary entry; returns false when the ID is unknown
    pub async fn update_glossary_entry(&self, entry: &GlossaryEntry) -> Result<bool> {
        Self::validate_glossary_entry(entry)?;
        let entry = entry.clone();

        self.db
            .execute_async(move |conn| {
                let updated = conn.execute(
                    "UPDATE glossary SET term = ?1, translation = ?2, target_language = ?3 WHERE id = ?4",
                    params![
                        entry.term.trim(),
                        entry.translation.trim(),
                        entry.target_language.trim(),
                        entry.id
                    ],
                )?;
                Ok(updated > 0)
            })
            .await
    }

    /// Delete a glossary entry; returns false when the ID is unknown
    pub async fn delete_glossary_entry(&self, id: i64) -> Result<bool> {
        self.db
            .execute_async(move |conn| {
                let deleted = conn.execute("DELETE FROM glossary WHERE id = ?1", [id])?;
                Ok(deleted > 0)
            })
            .await
    }

    /// List glossary entries, optionally only those for one target language
    pub async fn list_glossary(&self, target_language: Option<&str>) -> Result<Vec<GlossaryEntry>> {
        let target_language = target_language.map(|s| s.to_string());

        self.db
            .execute_async(move |conn| {
                let map_row = |row: &Row| -> rusqlite::Result<GlossaryEntry> {
                    Ok(GlossaryEntry {
                        id: row.get(0)?,
                        term: row.get(1)?,
                        translation: row.get(2)?,
                        target_language: row.get(3)?,
                    })
                };

                let entries = match target_language {
                    Some(lang) => {
                        let mut stmt = conn.prepare(
                            "SELECT id, term, translation, target_language FROM glossary WHERE target_language = ?1 ORDER BY id",
                        )?;
                        let rows = stmt.query_map([lang], map_row)?;
                        rows.collect::<rusqlite::Result<Vec<_>>>()?
                    }
                    None => {
                        let mut stmt = conn.prepare(
                            "SELECT id, term, translation, target_language FROM glossary ORDER BY id",
                        )?;
                        let rows = stmt.query_map([], map_row)?;
                        rows.collect::<rusqlite::Result<Vec<_>>>()?
                    }
                };

                Ok(entries)
            })
            .await
    }

    // =========================================================================
    // Cache Operations
    // =========================================================================

    /// Load cache entries younger than `max_age`, oldest first
    pub async fn load_cache_entries(&self, max_age: Duration) -> Result<Vec<CacheEntry>> {
        let max_age = chrono::Duration::from_std(max_age)?;

        self.db
            .execute_async(move |conn| {
                let cutoff = Utc::now() - max_age;
                let records = Self::all_cache_records(conn)?;

                let mut entries: Vec<CacheEntry> = records
                    .into_iter()
                    .filter_map(CacheRecord::into_cache_entry)
                    .filter(|entry| entry.created_at >= cutoff)
                    .collect();
                entries.sort_by_key(|entry| entry.created_at);

                Ok(entries)
            })
            .await
    }

    fn all_cache_records(conn: &Connection) -> Result<Vec<CacheRecord>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, source_text_hash, source_text, source_language, target_language,
                   translated_text, created_at
            FROM translation_cache
            "#,
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(CacheRecord {
                    id: row.get(0)?,
                    source_text_hash: row.get(1)?,
                    source_text: row.get(2)?,
                    source_language: row.get(3)?,
                    target_language: row.get(4)?,
                    translated_text: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    /// Upsert cache entries, keyed by source text and language pair
    pub async fn store_cache_entries(&self, entries: Vec<CacheEntry>) -> Result<usize> {
        let records: Vec<CacheRecord> = entries.iter().map(CacheRecord::from).collect();

        self.db
            .transaction_async(move |tx| {
                for record in &records {
                    tx.execute(
                        r#"
                        INSERT INTO translation_cache (
                            source_text_hash, source_text, source_language, target_language,
                            translated_text, created_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                        ON CONFLICT(source_text_hash, source_language, target_language)
                        DO UPDATE SET translated_text = excluded.translated_text,
                                      source_text = excluded.source_text,
                                      created_at = excluded.created_at
                        "#,
                        params![
                            record.source_text_hash,
                            record.source_text,
                            record.source_language,
                            record.target_language,
                            record.translated_text,
                            record.created_at,
                        ],
                    )?;
                }
                Ok(records.len())
            })
            .await
    }

    /// Drop expired entries and all but the newest `max_entries`
    ///
    /// Returns the number of rows deleted.
    pub async fn prune_cache(&self, max_entries: usize, max_age: Duration) -> Result<usize> {
        let max_age = chrono::Duration::from_std(max_age)?;

        self.db
            .transaction_async(move |tx| {
                let cutoff = Utc::now() - max_age;
                let mut records = Self::all_cache_records(tx)?;

                // Newest first; unreadable timestamps sort last and are dropped
                records.sort_by_key(|r| std::cmp::Reverse(r.created_at_utc()));

                let doomed: Vec<i64> = records
                    .iter()
                    .enumerate()
                    .filter(|(i, r)| match r.created_at_utc() {
                        Some(created_at) => *i >= max_entries || created_at < cutoff,
                        None => true,
                    })
                    .map(|(_, r)| r.id)
                    .collect();

                for id in &doomed {
                    tx.execute("DELETE FROM translation_cache WHERE id = ?1", [id])?;
                }

                if !doomed.is_empty() {
                    debug!("Pruned {} cache rows", doomed.len());
                }
                Ok(doomed.len())
            })
            .await
    }
}
