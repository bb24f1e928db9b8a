use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{Provider, error_from_status};
use crate::errors::ProviderError;

/// Default public instance
pub const DEFAULT_ENDPOINT: &str = "https://lingva.ml";

/// Client for a Lingva Translate instance
#[derive(Debug)]
pub struct Lingva {
    /// HTTP client for API requests
    client: Client,
    /// Base URL
    endpoint: String,
    /// Per-request timeout
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct LingvaResponse {
    translation: Option<String>,
}

impl Lingva {
    /// Create a new Lingva client
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// Build `{endpoint}/api/v1/{source}/{target}/{text}` with every segment percent-encoded
    ///
    /// A text of `.` or `..` cannot be carried as a path segment: URL parsing
    /// resolves it, encoded or not, so it is rejected.
    pub fn request_url(&self, text: &str, source_language: &str, target_language: &str) -> Result<Url, ProviderError> {
        if is_dot_segment(text) {
            return Err(ProviderError::RequestFailed(format!("Lingva cannot carry '{}' as a path segment", text)));
        }

        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid Lingva endpoint {}: {}", self.endpoint, e)))?;

        url.path_segments_mut()
            .map_err(|_| ProviderError::RequestFailed(format!("Lingva endpoint cannot be a base URL: {}", self.endpoint)))?
            .pop_if_empty()
            .extend(["api", "v1", source_language, target_language, text]);

        Ok(url)
    }
}

fn is_dot_segment(text: &str) -> bool {
    text == "." || text == ".."
}

#[async_trait]
impl Provider for Lingva {
    fn name(&self) -> &str {
        "lingva"
    }

    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        // Nothing to translate, and the path would collapse
        if is_dot_segment(text) {
            return Ok(text.to_string());
        }

        let url = self.request_url(text, source_language, target_language)?;
        debug!("lingva: translating {} chars {} -> {}", text.chars().count(), source_language, target_language);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout))?;

        if !response.status().is_success() {
            return Err(error_from_status("Lingva", response).await);
        }

        let body: LingvaResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Lingva: {}", e)))?;

        body.translation
            .ok_or_else(|| ProviderError::ParseError("Lingva response has no translation field".to_string()))
    }
}
