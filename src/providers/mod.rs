/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the public translation
 * endpoints the application falls back across:
 * - Google: the unauthenticated `translate_a/single` endpoint
 * - MyMemory: the MyMemory translation memory API
 * - Lingva: a Lingva Translate instance
 *
 * A configurable mock provider lives in `mock` for tests.
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{ProviderConfig, ProviderKind};
use crate::errors::ProviderError;

/// Common trait for all translation backends
///
/// Providers are held as an ordered `Vec<Arc<dyn Provider>>` by the fallback
/// orchestrator, so new backends can be added without touching it.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short identifier used in logs and error messages
    fn name(&self) -> &str;

    /// Translate one chunk of text
    ///
    /// # Arguments
    /// * `text` - The chunk to translate
    /// * `source_language` - Source language code, or `auto`
    /// * `target_language` - Target language code
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;
}

/// Build a provider client from its configuration entry
pub fn build_provider(config: &ProviderConfig) -> Arc<dyn Provider> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let endpoint = config.get_endpoint();

    match config.provider_type {
        ProviderKind::Google => Arc::new(google::Google::new(endpoint, timeout)),
        ProviderKind::MyMemory => Arc::new(mymemory::MyMemory::new(endpoint, timeout)),
        ProviderKind::Lingva => Arc::new(lingva::Lingva::new(endpoint, timeout)),
    }
}

/// Build the enabled providers in their declared order
pub fn build_providers(configs: &[ProviderConfig]) -> Vec<Arc<dyn Provider>> {
    configs
        .iter()
        .filter(|c| c.enabled)
        .map(build_provider)
        .collect()
}

/// Read a non-2xx response into a provider error
pub(crate) async fn error_from_status(name: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());

    log::debug!("{} HTTP {}: {}", name, status, error_text);

    if status.as_u16() == 429 {
        ProviderError::RateLimitExceeded(format!("{} HTTP {}", name, status))
    } else {
        ProviderError::ApiError {
            status_code: status.as_u16(),
            message: format!("{} HTTP {}", name, status),
        }
    }
}

pub mod google;
pub mod lingva;
pub mod mock;
pub mod mymemory;
