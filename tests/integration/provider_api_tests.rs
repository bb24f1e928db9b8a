/*!
 * Integration tests for provider HTTP contracts, against local mock servers
 */

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use npc_translator::app_config::{ProviderConfig, ProviderKind};
use npc_translator::providers::google::Google;
use npc_translator::providers::lingva::Lingva;
use npc_translator::providers::mymemory::MyMemory;
use npc_translator::providers::{build_providers, Provider};
use npc_translator::translation::FallbackOrchestrator;
use npc_translator::ProviderError;

const TIMEOUT: Duration = Duration::from_secs(7);

#[tokio::test]
async fn test_google_shouldSendGtxQueryAndJoinSegments() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .and(query_param("client", "gtx"))
        .and(query_param("sl", "en"))
        .and(query_param("tl", "it"))
        .and(query_param("dt", "t"))
        .and(query_param("q", "Hello world. Bye"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [["Ciao mondo. ", "Hello world. ", null, null, 10], ["Ciao", "Bye", null, null, 10]],
            null,
            "en"
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let google = Google::new(server.uri(), TIMEOUT);
    let text = google.translate("Hello world. Bye", "en", "it").await.unwrap();

    assert_eq!(text, "Ciao mondo. Ciao");
}

#[tokio::test]
async fn test_google_withServerError_shouldReturnApiError() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let error = Google::new(server.uri(), TIMEOUT).translate("Hello", "en", "it").await.unwrap_err();
    assert!(matches!(error, ProviderError::ApiError { status_code: 503, .. }));
}

#[tokio::test]
async fn test_google_whenSlowerThanTimeout_shouldReturnTimeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(800)))
        .mount(&server)
        .await;

    let timeout = Duration::from_millis(100);
    let error = Google::new(server.uri(), timeout).translate("Hello", "en", "it").await.unwrap_err();
    assert!(matches!(error, ProviderError::Timeout(t) if t == timeout));
}

#[tokio::test]
async fn test_myMemory_shouldSendLangpairAndReadTranslatedText() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .and(query_param("q", "Hello"))
        .and(query_param("langpair", "autodetect|it"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseData": { "translatedText": "Ciao", "match": 1 },
            "responseStatus": 200,
            "responseDetails": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = MyMemory::new(server.uri(), TIMEOUT).translate("Hello", "auto", "it").await.unwrap();
    assert_eq!(text, "Ciao");
}

#[tokio::test]
async fn test_myMemory_withQuotaStatusInBody_shouldReturnRateLimit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseData": { "translatedText": "MYMEMORY WARNING: YOU USED ALL AVAILABLE FREE TRANSLATIONS FOR TODAY" },
            "responseStatus": "429",
            "responseDetails": "MYMEMORY WARNING: YOU USED ALL AVAILABLE FREE TRANSLATIONS FOR TODAY"
        })))
        .mount(&server)
        .await;

    let error = MyMemory::new(server.uri(), TIMEOUT).translate("Hello", "en", "it").await.unwrap_err();
    assert!(matches!(error, ProviderError::RateLimitExceeded(_)));
}

#[tokio::test]
async fn test_lingva_shouldEncodeTextIntoPath() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v1/en/it/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "translation": "Ciao / mondo?" })))
        .expect(1)
        .mount(&server)
        .await;

    let text = Lingva::new(server.uri(), TIMEOUT).translate("Hello / world?", "en", "it").await.unwrap();
    assert_eq!(text, "Ciao / mondo?");

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests[0].url.path(), "/api/v1/en/it/Hello%20%2F%20world%3F");
}

#[tokio::test]
async fn test_lingva_withDotOnlyText_shouldAnswerWithoutRequest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "translation": "wrong" })))
        .expect(0)
        .mount(&server)
        .await;

    let lingva = Lingva::new(server.uri(), TIMEOUT);
    assert_eq!(lingva.translate(".", "en", "it").await.unwrap(), ".");
    assert_eq!(lingva.translate("..", "en", "it").await.unwrap(), "..");
}

#[tokio::test]
async fn test_lingva_withMissingTranslation_shouldReturnParseError() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "nope" })))
        .mount(&server)
        .await;

    let error = Lingva::new(server.uri(), TIMEOUT).translate("Hello", "en", "it").await.unwrap_err();
    assert!(matches!(error, ProviderError::ParseError(_)));
}

#[tokio::test]
async fn test_configuredChain_shouldFallBackAcrossRealAdapters() {
    crate::common::init_logger();
    let google_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&google_server)
        .await;

    let mymemory_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mymemory_server)
        .await;

    let lingva_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "translation": "Ciao mondo" })))
        .expect(1)
        .mount(&lingva_server)
        .await;

    let configs: Vec<ProviderConfig> = [
        (ProviderKind::Google, google_server.uri()),
        (ProviderKind::MyMemory, mymemory_server.uri()),
        (ProviderKind::Lingva, lingva_server.uri()),
    ]
    .into_iter()
    .map(|(kind, endpoint)| ProviderConfig {
        endpoint,
        ..ProviderConfig::new(kind)
    })
    .collect();

    let providers: Vec<Arc<dyn Provider>> = build_providers(&configs);
    let orchestrator = FallbackOrchestrator::new(providers);
    let result = orchestrator
        .translate_chunk(0, "Hello world", "en", "it", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.text, "Ciao mondo");
    assert_eq!(result.provider, "lingva");
}
