use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;

use super::{Provider, error_from_status};
use crate::errors::ProviderError;

/// Default public endpoint
pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com";

/// Client for the unauthenticated Google `translate_a/single` endpoint
#[derive(Debug)]
pub struct Google {
    /// HTTP client for API requests
    client: Client,
    /// Base URL, without trailing slash
    endpoint: String,
    /// Per-request timeout
    timeout: Duration,
}

impl Google {
    /// Create a new Google client
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Extract the translation from the nested-array response body
    ///
    /// The body looks like `[[["Ciao ","Hello ",...],["mondo","world",...]],null,"en",...]`;
    /// the translation is the concatenation of the first element of each segment.
    pub fn extract_text(body: &Value) -> Result<String, ProviderError> {
        let segments = body
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| ProviderError::ParseError("Google response has no segment list".to_string()))?;

        let mut translated = String::new();
        for segment in segments {
            // Trailing transliteration segments carry a null first element
            if let Some(part) = segment.get(0).and_then(|v| v.as_str()) {
                translated.push_str(part);
            }
        }

        if translated.is_empty() && !segments.is_empty() {
            return Err(ProviderError::ParseError("Google response segments contain no text".to_string()));
        }

        Ok(translated)
    }
}

#[async_trait]
impl Provider for Google {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/translate_a/single", self.endpoint);
        debug!("google: translating {} chars {} -> {}", text.chars().count(), source_language, target_language);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source_language),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout))?;

        if !response.status().is_success() {
            return Err(error_from_status("Google Translate", response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Google Translate: {}", e)))?;

        Self::extract_text(&body)
    }
}
