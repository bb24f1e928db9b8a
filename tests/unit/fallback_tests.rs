/*!
 * Tests for ordered provider fallback
 */

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use npc_translator::providers::Provider;
use npc_translator::providers::mock::MockProvider;
use npc_translator::translation::FallbackOrchestrator;
use npc_translator::{ProviderError, TranslationError};

fn chain(providers: &[&MockProvider]) -> FallbackOrchestrator {
    let providers: Vec<Arc<dyn Provider>> = providers
        .iter()
        .map(|p| Arc::new((*p).clone()) as Arc<dyn Provider>)
        .collect();
    FallbackOrchestrator::new(providers)
}

#[tokio::test]
async fn test_translateChunk_whenFirstTwoFail_shouldUseThirdAndSkipFourth() {
    crate::common::init_logger();
    let a = MockProvider::failing().named("a");
    let b = MockProvider::failing().named("b");
    let c = MockProvider::fixed("terzo").named("c");
    let d = MockProvider::working().named("d");
    let orchestrator = chain(&[&a, &b, &c, &d]);

    let result = orchestrator
        .translate_chunk(0, "third", "en", "it", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.text, "terzo");
    assert_eq!(result.provider, "c");
    assert_eq!(a.request_count(), 1);
    assert_eq!(b.request_count(), 1);
    assert_eq!(c.request_count(), 1);
    assert_eq!(d.request_count(), 0);
}

#[tokio::test]
async fn test_translateChunk_whenAllFail_shouldReportLastProviderError() {
    let a = MockProvider::failing().named("a");
    let b = MockProvider::failing().named("b");
    let orchestrator = chain(&[&a, &b]);

    let error = orchestrator
        .translate_chunk(3, "text", "auto", "de", &CancellationToken::new())
        .await
        .unwrap_err();

    match error {
        TranslationError::AllProvidersFailed { chunk_index, provider, source } => {
            assert_eq!(chunk_index, 3);
            assert_eq!(provider, "b");
            assert!(matches!(source, ProviderError::ApiError { status_code: 500, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(a.request_count(), 1);
    assert_eq!(b.request_count(), 1);
}

#[tokio::test]
async fn test_translateChunk_withCancelledToken_shouldNotCallProviders() {
    let a = MockProvider::working();
    let orchestrator = chain(&[&a]);
    let token = CancellationToken::new();
    token.cancel();

    let error = orchestrator
        .translate_chunk(0, "text", "en", "it", &token)
        .await
        .unwrap_err();

    assert!(error.is_cancelled());
    assert_eq!(a.request_count(), 0);
}

#[tokio::test]
async fn test_translateChunk_cancelledMidCall_shouldNotTryNextProvider() {
    let slow = MockProvider::slow(5_000).named("slow");
    let next = MockProvider::working().named("next");
    let orchestrator = chain(&[&slow, &next]);
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let error = orchestrator
        .translate_chunk(0, "text", "en", "it", &token)
        .await
        .unwrap_err();

    assert!(error.is_cancelled());
    assert_eq!(next.request_count(), 0);
}

#[tokio::test]
async fn test_translateChunk_withNoProviders_shouldFail() {
    let orchestrator = FallbackOrchestrator::new(Vec::new());
    let error = orchestrator
        .translate_chunk(0, "text", "en", "it", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(error, TranslationError::NoProviders));
}

#[tokio::test]
async fn test_translateChunk_withIntermittentProvider_shouldFallBackOnlyOnFailure() {
    let flaky = MockProvider::intermittent(2).named("flaky");
    let backup = MockProvider::fixed("backup").named("backup");
    let orchestrator = chain(&[&flaky, &backup]);
    let token = CancellationToken::new();

    let first = orchestrator.translate_chunk(0, "one", "en", "it", &token).await.unwrap();
    let second = orchestrator.translate_chunk(1, "two", "en", "it", &token).await.unwrap();

    assert_eq!(first.provider, "flaky");
    assert_eq!(second.provider, "backup");
    assert_eq!(backup.request_count(), 1);
}
