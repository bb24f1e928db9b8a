/*!
 * Per-call translation state.
 *
 * A `TranslationSession` is created for one translate call, mutated only by
 * that call and dropped afterwards. Its state moves through
 * `Idle -> Chunking -> (Attempting -> Reporting)* -> Done | Cancelled | Failed`.
 */

use std::fmt;

use tokio_util::sync::CancellationToken;

use super::chunker::Chunk;
use crate::errors::TranslationError;
use crate::language_utils;

/// An immutable translation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    text: String,
    source_language: String,
    target_language: String,
}

impl TranslationRequest {
    /// Create a request; the target language must be set and not `auto`
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Result<Self, TranslationError> {
        let source_language = source_language.into().trim().to_string();
        let target_language = target_language.into().trim().to_string();

        if target_language.is_empty() {
            return Err(TranslationError::InvalidRequest("target language is empty".to_string()));
        }
        if language_utils::is_auto(&target_language) {
            return Err(TranslationError::InvalidRequest("target language cannot be auto".to_string()));
        }

        Ok(Self {
            text: text.into(),
            source_language: if source_language.is_empty() {
                language_utils::AUTO_DETECT.to_string()
            } else {
                source_language
            },
            target_language,
        })
    }

    /// Text to translate
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Source language code, possibly `auto`
    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    /// Target language code
    pub fn target_language(&self) -> &str {
        &self.target_language
    }
}

/// Lifecycle of a translation session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not started
    Idle,
    /// Splitting the input
    Chunking,
    /// Waiting on a provider for the current chunk
    Attempting,
    /// Recording a chunk result and notifying progress
    Reporting,
    /// All chunks translated
    Done,
    /// Stopped by cancellation
    Cancelled,
    /// Stopped by an error
    Failed,
}

impl SessionState {
    /// Whether the session has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Cancelled | Self::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Chunking => write!(f, "chunking"),
            SessionState::Attempting => write!(f, "attempting"),
            SessionState::Reporting => write!(f, "reporting"),
            SessionState::Done => write!(f, "done"),
            SessionState::Cancelled => write!(f, "cancelled"),
            SessionState::Failed => write!(f, "failed"),
        }
    }
}

/// Mutable context of one translate call
#[derive(Debug)]
pub struct TranslationSession {
    request: TranslationRequest,
    chunks: Vec<Chunk>,
    current_chunk: usize,
    outputs: Vec<String>,
    served_by: Vec<String>,
    state: SessionState,
    token: CancellationToken,
}

impl TranslationSession {
    /// Create an idle session observing `token`
    pub fn new(request: TranslationRequest, token: CancellationToken) -> Self {
        Self {
            request,
            chunks: Vec::new(),
            current_chunk: 0,
            outputs: Vec::new(),
            served_by: Vec::new(),
            state: SessionState::Idle,
            token,
        }
    }

    /// The request being served
    pub fn request(&self) -> &TranslationRequest {
        &self.request
    }

    /// Chunks produced for the request
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Index of the chunk in flight, or the number of chunks once done
    pub fn current_chunk(&self) -> usize {
        self.current_chunk
    }

    /// Translated chunks so far
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Provider that served each translated chunk (`cache` for offline hits)
    pub fn served_by(&self) -> &[String] {
        &self.served_by
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Token observed by this session
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        log::trace!("Session state {} -> {}", self.state, state);
        self.state = state;
    }

    pub(crate) fn set_chunks(&mut self, chunks: Vec<Chunk>) {
        self.outputs = Vec::with_capacity(chunks.len());
        self.served_by = Vec::with_capacity(chunks.len());
        self.current_chunk = 0;
        self.chunks = chunks;
    }

    pub(crate) fn record_chunk(&mut self, text: String, provider: String) {
        self.outputs.push(text);
        self.served_by.push(provider);
        self.current_chunk += 1;
    }

    /// Join the translated chunks with `separator`
    pub fn joined_output(&self, separator: &str) -> String {
        self.outputs
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
            .trim()
            .to_string()
    }
}
