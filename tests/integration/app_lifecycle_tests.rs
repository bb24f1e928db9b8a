/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use npc_translator::app_config::Config;
use npc_translator::app_controller::Controller;
use npc_translator::database::Repository;
use npc_translator::providers::Provider;
use npc_translator::providers::mock::MockProvider;
use npc_translator::translation::TranslationCache;
use npc_translator::{AppError, TranslationError};
use crate::common;

fn controller_with(providers: Vec<Arc<dyn Provider>>, repository: Option<Repository>) -> Controller {
    let service = common::service_with(providers, 1400)
        .with_cache(TranslationCache::new(true, 60, Duration::from_secs(86_400)));
    Controller::with_parts(Config::default(), Arc::new(service), repository)
}

/// Test a full translate call with glossary and history
#[tokio::test]
async fn test_translateText_shouldApplyGlossaryAndRecordHistory() -> Result<()> {
    common::init_logger();
    let repository = Repository::new_in_memory()?;
    let controller = controller_with(
        vec![Arc::new(MockProvider::fixed("Il cloud e veloce"))],
        Some(repository.clone()),
    );
    controller.add_glossary_entry("cloud", "nuvola", "ita").await?;

    let outcome = controller.translate_text("The cloud is fast", Some("en"), Some("it"), false).await?;

    assert_eq!(outcome.text, "Il nuvola e veloce");
    assert_eq!(outcome.target_language, "it");

    let history = controller.history(None).await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].original, "The cloud is fast");
    assert_eq!(history[0].translated, "Il nuvola e veloce");
    Ok(())
}

/// Test that the configured languages are used when none are given
#[tokio::test]
async fn test_translateText_withoutLanguages_shouldUseConfigDefaults() -> Result<()> {
    let provider = MockProvider::working();
    let controller = controller_with(vec![Arc::new(provider.clone())], None);

    let outcome = controller.translate_text("Hello", None, None, false).await?;

    assert_eq!(outcome.source_language, "auto");
    assert_eq!(outcome.target_language, "it");
    assert_eq!(provider.requests()[0].source_language, "auto");
    Ok(())
}

/// Test that the cache survives a restart through the database
#[tokio::test]
async fn test_persistedCache_shouldServeTranslationAfterRestartWhenOffline() -> Result<()> {
    let repository = Repository::new_in_memory()?;

    let online = controller_with(vec![Arc::new(MockProvider::fixed("Buongiorno"))], Some(repository.clone()));
    online.translate_text("Good morning", Some("en"), Some("it"), false).await?;
    assert_eq!(online.persist_cache().await?, 1);

    let offline = controller_with(vec![Arc::new(MockProvider::failing())], Some(repository.clone()));
    assert_eq!(offline.load_cache().await?, 1);
    let outcome = offline.translate_text("Good morning", Some("en"), Some("it"), false).await?;

    assert_eq!(outcome.text, "Buongiorno");
    Ok(())
}

/// Test that a failed translation is reported and not recorded
#[tokio::test]
async fn test_translateText_whenAllProvidersFail_shouldNotRecordHistory() -> Result<()> {
    let repository = Repository::new_in_memory()?;
    let controller = controller_with(vec![Arc::new(MockProvider::failing())], Some(repository));

    let error = controller
        .translate_text("Hello", Some("en"), Some("it"), false)
        .await
        .unwrap_err();

    assert!(matches!(
        error.downcast_ref::<TranslationError>(),
        Some(TranslationError::AllProvidersFailed { .. })
    ));
    assert!(controller.history(None).await?.is_empty());
    Ok(())
}

/// Test that cancelling from outside surfaces as a cancellation
#[tokio::test]
async fn test_translateText_whenCancelled_shouldReturnCancelledError() -> Result<()> {
    let controller = controller_with(vec![Arc::new(MockProvider::slow(2_000))], None);

    let service = controller.service();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        service.cancel_all();
    });

    let error = controller
        .translate_text("Hello", Some("en"), Some("it"), false)
        .await
        .unwrap_err();

    assert!(error.downcast_ref::<TranslationError>().is_some_and(TranslationError::is_cancelled));
    Ok(())
}

/// Test input validation before any provider is called
#[tokio::test]
async fn test_translateText_withAutoTarget_shouldFailWithoutCallingProviders() {
    let provider = MockProvider::working();
    let controller = controller_with(vec![Arc::new(provider.clone())], None);

    let result = controller.translate_text("Hello", Some("en"), Some("auto"), false).await;

    assert!(result.is_err());
    assert_eq!(provider.request_count(), 0);
}

/// Test glossary management through the controller
#[tokio::test]
async fn test_glossaryCommands_shouldUpdateAndDelete() -> Result<()> {
    let controller = controller_with(vec![Arc::new(MockProvider::working())], Some(Repository::new_in_memory()?));

    let id = controller.add_glossary_entry("cloud", "nuvola", "it").await?;
    assert!(controller.update_glossary_entry(id, "cloud", "cielo", "it").await?);
    assert_eq!(controller.glossary(Some("it")).await?[0].translation, "cielo");

    assert!(controller.delete_glossary_entry(id).await?);
    assert!(controller.glossary(None).await?.is_empty());
    assert!(controller.add_glossary_entry("cloud", "nuvola", "auto").await.is_err());
    Ok(())
}

/// Test history limit and clearing
#[tokio::test]
async fn test_history_shouldHonourLimitAndClear() -> Result<()> {
    let controller = controller_with(vec![Arc::new(MockProvider::working())], Some(Repository::new_in_memory()?));
    for text in ["one", "two", "three"] {
        controller.translate_text(text, Some("en"), Some("it"), false).await?;
    }

    let recent = controller.history(Some(2)).await?;
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].original, "three");

    assert_eq!(controller.clear_history().await?, 3);
    assert!(controller.history(None).await?.is_empty());
    Ok(())
}

/// Test that history keeps only the configured number of entries
#[tokio::test]
async fn test_translateText_shouldPruneHistoryToConfiguredLimit() -> Result<()> {
    let mut config = Config::default();
    config.storage.history_limit = 2;
    let service = common::service_with(vec![Arc::new(MockProvider::working())], 1400);
    let repository = Repository::new_in_memory()?;
    let controller = Controller::with_parts(config, Arc::new(service), Some(repository.clone()));

    for text in ["one", "two", "three"] {
        controller.translate_text(text, Some("en"), Some("it"), false).await?;
    }

    let stored = repository.list_history(10).await?;
    let originals: Vec<&str> = stored.iter().map(|e| e.original.as_str()).collect();
    assert_eq!(originals, vec!["three", "two"]);
    Ok(())
}

/// Test that storage commands need a database
#[test]
fn test_controllerWithoutDatabase_shouldRejectHistoryCommands() {
    let controller = controller_with(vec![Arc::new(MockProvider::working())], None);

    let (history, persisted) = tokio_test::block_on(async {
        (controller.history(None).await, controller.persist_cache().await)
    });

    let error = history.unwrap_err();
    assert!(matches!(error.downcast_ref::<AppError>(), Some(AppError::Config(_))));
    assert_eq!(persisted.unwrap(), 0);
}

/// Test that files are appended after typed text
#[test]
fn test_collectInput_shouldAppendFileBlocks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "note.txt", "From file")?;

    let inputs = Controller::collect_input(Some("Typed".to_string()), &[file]);

    assert_eq!(inputs.text, "Typed\n\n[note.txt]\nFrom file");
    Ok(())
}
