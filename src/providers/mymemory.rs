use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{Provider, error_from_status};
use crate::errors::ProviderError;
use crate::language_utils;

/// Default public endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.mymemory.translated.net";

/// MyMemory's spelling of source language detection
const MYMEMORY_AUTODETECT: &str = "autodetect";

/// Client for the MyMemory translation memory API
#[derive(Debug)]
pub struct MyMemory {
    /// HTTP client for API requests
    client: Client,
    /// Base URL, without trailing slash
    endpoint: String,
    /// Per-request timeout
    timeout: Duration,
}

/// MyMemory response body
#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<MyMemoryResponseData>,
    /// Either a number or a numeric string, depending on the error path
    #[serde(rename = "responseStatus", default)]
    response_status: Option<Value>,
    #[serde(rename = "responseDetails", default)]
    response_details: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponseData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

impl MyMemory {
    /// Create a new MyMemory client
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

    /// Build the `langpair` parameter
    pub fn language_pair(source_language: &str, target_language: &str) -> String {
        let source = if language_utils::is_auto(source_language) {
            MYMEMORY_AUTODETECT
        } else {
            source_language
        };
        format!("{}|{}", source, target_language)
    }

    fn extract_text(body: MyMemoryResponse) -> Result<String, ProviderError> {
        let status = match &body.response_status {
            Some(Value::Number(n)) => n.as_u64().map(|n| n as u16),
            Some(Value::String(s)) => s.parse::<u16>().ok(),
            _ => None,
        };

        if let Some(status) = status {
            if status != 200 {
                let message = body
                    .response_details
                    .as_ref()
                    .and_then(|v| v.as_str())
                    .unwrap_or("MyMemory rejected the request")
                    .to_string();
                return Err(if status == 429 {
                    ProviderError::RateLimitExceeded(message)
                } else {
                    ProviderError::ApiError { status_code: status, message }
                });
            }
        }

        body.response_data
            .and_then(|data| data.translated_text)
            .ok_or_else(|| ProviderError::ParseError("MyMemory response has no responseData.translatedText".to_string()))
    }
}

#[async_trait]
impl Provider for MyMemory {
    fn name(&self) -> &str {
        "mymemory"
    }

    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/get", self.endpoint);
        let langpair = Self::language_pair(source_language, target_language);
        debug!("mymemory: translating {} chars, langpair {}", text.chars().count(), langpair);

        let response = self
            .client
            .get(&url)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout))?;

        if !response.status().is_success() {
            return Err(error_from_status("MyMemory", response).await);
        }

        let body: MyMemoryResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("MyMemory: {}", e)))?;

        Self::extract_text(body)
    }
}
