/*!
 * Ordered fallback across translation providers.
 */

use std::sync::Arc;

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::errors::TranslationError;
use crate::providers::Provider;

/// A chunk translation and the provider that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkTranslation {
    /// Translated text as returned by the provider
    pub text: String,
    /// Name of the provider that answered
    pub provider: String,
}

/// Tries providers in declared order until one succeeds
#[derive(Debug, Clone)]
pub struct FallbackOrchestrator {
    providers: Vec<Arc<dyn Provider>>,
}

impl FallbackOrchestrator {
    /// Create an orchestrator over `providers`, first entry first
    pub fn new(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self { providers }
    }

    /// Providers in attempt order
    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.providers
    }

    /// Translate one chunk, falling back through the provider list
    ///
    /// Each provider is called at most once. A fired `token` drops the
    /// in-flight request and yields `TranslationError::Cancelled`.
    pub async fn translate_chunk(
        &self,
        chunk_index: usize,
        text: &str,
        source_language: &str,
        target_language: &str,
        token: &CancellationToken,
    ) -> Result<ChunkTranslation, TranslationError> {
        let mut last_failure = None;

        for provider in &self.providers {
            if token.is_cancelled() {
                return Err(TranslationError::Cancelled);
            }

            let attempt = provider.translate(text, source_language, target_language);
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(TranslationError::Cancelled),
                result = attempt => result,
            };

            match result {
                Ok(translated) => {
                    debug!("Chunk {} translated by {}", chunk_index, provider.name());
                    return Ok(ChunkTranslation {
                        text: translated,
                        provider: provider.name().to_string(),
                    });
                }
                Err(e) => {
                    warn!("Provider {} failed for chunk {}: {}", provider.name(), chunk_index, e);
                    last_failure = Some((provider.name().to_string(), e));
                }
            }
        }

        match last_failure {
            Some((provider, source)) => Err(TranslationError::AllProvidersFailed {
                chunk_index,
                provider,
                source,
            }),
            None => Err(TranslationError::NoProviders),
        }
    }
}
