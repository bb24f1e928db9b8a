/*!
 * Tests for SQLite persistence
 */

use anyhow::Result;
use chrono::Utc;
use std::time::Duration;

use npc_translator::database::{DatabaseConnection, GlossaryEntry, HistoryEntry, Repository};
use npc_translator::translation::CacheEntry;
use crate::common;

fn cache_entry(source: &str, translated: &str) -> CacheEntry {
    CacheEntry {
        source_text: source.to_string(),
        source_language: "en".to_string(),
        target_language: "it".to_string(),
        translated_text: translated.to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_fileDatabase_shouldPersistAcrossReopen() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let db_path = temp_dir.path().join("data").join("npc.db");

    {
        let repository = Repository::new(DatabaseConnection::new(&db_path)?);
        repository
            .add_history(&HistoryEntry::new("Hello".into(), "Ciao".into(), "en".into(), "it".into()))
            .await?;
        repository
            .add_glossary_entry(&GlossaryEntry::new("cloud".into(), "nuvola".into(), "it".into()))
            .await?;
        repository.store_cache_entries(vec![cache_entry("Hello", "Ciao")]).await?;
    }

    let repository = Repository::new(DatabaseConnection::new(&db_path)?);
    let history = repository.list_history(10).await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].translated, "Ciao");

    let cached = repository.load_cache_entries(Duration::from_secs(3600)).await?;
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].translated_text, "Ciao");

    let stats = repository.connection().stats()?;
    assert_eq!(stats.history_count, 1);
    assert_eq!(stats.glossary_count, 1);
    assert_eq!(stats.cache_count, 1);
    assert!(stats.file_size_bytes > 0);
    Ok(())
}

#[tokio::test]
async fn test_listGlossary_shouldFilterByTargetLanguage() -> Result<()> {
    let repository = Repository::new_in_memory()?;
    repository
        .add_glossary_entry(&GlossaryEntry::new("cloud".into(), "nuvola".into(), "it".into()))
        .await?;
    repository
        .add_glossary_entry(&GlossaryEntry::new("cloud".into(), "Wolke".into(), "de".into()))
        .await?;

    let italian = repository.list_glossary(Some("it")).await?;
    assert_eq!(italian.len(), 1);
    assert_eq!(italian[0].translation, "nuvola");
    assert_eq!(repository.list_glossary(None).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_updateAndDelete_withUnknownId_shouldReturnFalse() -> Result<()> {
    let repository = Repository::new_in_memory()?;
    let mut entry = GlossaryEntry::new("cloud".into(), "nuvola".into(), "it".into());
    entry.id = 42;

    assert!(!repository.update_glossary_entry(&entry).await?);
    assert!(!repository.delete_glossary_entry(42).await?);
    Ok(())
}

#[tokio::test]
async fn test_storeCacheEntries_sameKeyTwice_shouldKeepLatestTranslation() -> Result<()> {
    let repository = Repository::new_in_memory()?;
    repository.store_cache_entries(vec![cache_entry("Hello", "Salve")]).await?;
    repository.store_cache_entries(vec![cache_entry("Hello", "Ciao")]).await?;

    let cached = repository.load_cache_entries(Duration::from_secs(3600)).await?;
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].translated_text, "Ciao");
    Ok(())
}
