/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct, which drives a
 * translate call through chunking, provider fallback, the response cache,
 * progress reporting and cancellation.
 */

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use super::cache::TranslationCache;
use super::cancellation::CancellationController;
use super::chunker::{self, DEFAULT_MAX_CHUNK_CHARS};
use super::fallback::FallbackOrchestrator;
use super::progress::ProgressReporter;
use super::session::{SessionState, TranslationRequest, TranslationSession};
use crate::app_config::{SessionPolicy, TranslationCommonConfig, TranslationConfig};
use crate::errors::TranslationError;
use crate::providers::{self, Provider};

/// Provider name recorded for chunks served from the offline cache
pub const CACHE_PROVIDER_NAME: &str = "cache";

/// Translation options for customizing the translation process
#[derive(Debug, Clone)]
pub struct TranslationOptions {
    /// Maximum chunk length in chars
    pub max_chunk_chars: usize,

    /// Pause between consecutive chunks
    pub inter_chunk_delay: Duration,

    /// String placed between translated chunks
    pub chunk_separator: String,

    /// What a new call does to running sessions
    pub session_policy: SessionPolicy,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self::from(&TranslationCommonConfig::default())
    }
}

impl From<&TranslationCommonConfig> for TranslationOptions {
    fn from(common: &TranslationCommonConfig) -> Self {
        Self {
            max_chunk_chars: if common.max_chunk_chars == 0 {
                DEFAULT_MAX_CHUNK_CHARS
            } else {
                common.max_chunk_chars
            },
            inter_chunk_delay: Duration::from_millis(common.inter_chunk_delay_ms),
            chunk_separator: common.chunk_separator.clone(),
            session_policy: common.session_policy,
        }
    }
}

/// Main translation service
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Providers in fallback order
    orchestrator: FallbackOrchestrator,

    /// Translation options
    pub options: TranslationOptions,

    /// Response cache used when every provider fails
    pub cache: TranslationCache,

    /// Registry of running sessions
    cancellation: CancellationController,
}

impl TranslationService {
    /// Create a service over the given providers
    pub fn new(providers: Vec<Arc<dyn Provider>>, options: TranslationOptions) -> Self {
        let cancellation = CancellationController::new(options.session_policy);
        Self {
            orchestrator: FallbackOrchestrator::new(providers),
            options,
            cache: TranslationCache::new(false, 0, Duration::ZERO),
            cancellation,
        }
    }

    /// Create a service from the translation section of the configuration
    pub fn from_config(config: &TranslationConfig) -> Self {
        let providers = providers::build_providers(&config.providers);
        info!(
            "Translation providers: {}",
            providers.iter().map(|p| p.name()).collect::<Vec<_>>().join(" -> ")
        );

        Self::new(providers, TranslationOptions::from(&config.common))
            .with_cache(TranslationCache::from_config(&config.cache))
    }

    /// Replace the response cache
    pub fn with_cache(mut self, cache: TranslationCache) -> Self {
        self.cache = cache;
        self
    }

    /// Session registry, for cancelling from outside a call
    pub fn cancellation(&self) -> &CancellationController {
        &self.cancellation
    }

    /// Cancel every running translate call
    pub fn cancel_all(&self) {
        self.cancellation.cancel_all();
    }

    /// Translate a request
    ///
    /// Whitespace-only input resolves to an empty string without starting a
    /// session. Otherwise a session is registered with the cancellation
    /// controller for the duration of the call.
    pub async fn translate(
        &self,
        request: TranslationRequest,
        progress: &ProgressReporter,
    ) -> Result<String, TranslationError> {
        if request.text().trim().is_empty() {
            return Ok(String::new());
        }

        let active = self.cancellation.begin();
        let mut session = TranslationSession::new(request, active.token().clone());
        let result = self.translate_session(&mut session, progress).await;

        debug!(
            "Session {} finished in state {} after {}/{} chunks",
            active.id(),
            session.state(),
            session.current_chunk(),
            session.chunks().len()
        );
        result
    }

    /// Drive an idle session to completion
    pub async fn translate_session(
        &self,
        session: &mut TranslationSession,
        progress: &ProgressReporter,
    ) -> Result<String, TranslationError> {
        if session.state() != SessionState::Idle {
            return Err(TranslationError::InvalidRequest(format!(
                "session is already {}",
                session.state()
            )));
        }

        if session.request().text().trim().is_empty() {
            session.set_state(SessionState::Done);
            return Ok(String::new());
        }

        session.set_state(SessionState::Chunking);
        let chunks = match chunker::split_into_chunks(session.request().text(), self.options.max_chunk_chars) {
            Ok(chunks) => chunks,
            Err(e) => {
                session.set_state(SessionState::Failed);
                return Err(e);
            }
        };
        let total = chunks.len();
        debug!("Split input into {} chunk(s) of at most {} chars", total, self.options.max_chunk_chars);
        session.set_chunks(chunks.clone());

        let source_language = session.request().source_language().to_string();
        let target_language = session.request().target_language().to_string();
        let token = session.token().clone();

        for chunk in &chunks {
            if token.is_cancelled() {
                session.set_state(SessionState::Cancelled);
                return Err(TranslationError::Cancelled);
            }

            if chunk.is_blank() {
                session.set_state(SessionState::Reporting);
                session.record_chunk(String::new(), String::new());
                progress.chunk_completed(chunk.index + 1, total);
                continue;
            }

            session.set_state(SessionState::Attempting);
            let result = self
                .orchestrator
                .translate_chunk(chunk.index, &chunk.text, &source_language, &target_language, &token)
                .await;

            let (text, provider) = match result {
                Ok(translation) => {
                    self.cache.store(&chunk.text, &source_language, &target_language, &translation.text);
                    (translation.text, translation.provider)
                }
                Err(TranslationError::Cancelled) => {
                    session.set_state(SessionState::Cancelled);
                    return Err(TranslationError::Cancelled);
                }
                Err(e @ TranslationError::AllProvidersFailed { .. }) => {
                    match self.cache.get(&chunk.text, &source_language, &target_language) {
                        Some(cached) => {
                            warn!("All providers failed for chunk {}; serving cached translation", chunk.index);
                            (cached, CACHE_PROVIDER_NAME.to_string())
                        }
                        None => {
                            session.set_state(SessionState::Failed);
                            return Err(e);
                        }
                    }
                }
                Err(e) => {
                    session.set_state(SessionState::Failed);
                    return Err(e);
                }
            };

            session.set_state(SessionState::Reporting);
            session.record_chunk(text, provider);
            progress.chunk_completed(chunk.index + 1, total);

            let is_last = chunk.index + 1 == total;
            if !is_last && !self.options.inter_chunk_delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        session.set_state(SessionState::Cancelled);
                        return Err(TranslationError::Cancelled);
                    }
                    _ = tokio::time::sleep(self.options.inter_chunk_delay) => {}
                }
            }
        }

        session.set_state(SessionState::Done);
        Ok(session.joined_output(&self.options.chunk_separator))
    }
}
