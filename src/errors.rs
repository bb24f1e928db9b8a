/*!
 * Error types for the npc-translator application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to a single translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The request could not be built or sent
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The backend did not answer within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP (or body-level) status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The response body was not in the expected shape
    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

impl ProviderError {
    /// Map a reqwest transport error onto the provider taxonomy
    pub fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout)
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur during a translate call
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The request itself is unusable (empty target language, etc.)
    #[error("Invalid translation request: {0}")]
    InvalidRequest(String),

    /// Chunk size must be at least one character
    #[error("Invalid chunk size: {0} (must be at least 1)")]
    InvalidChunkSize(usize),

    /// No provider was configured
    #[error("No translation provider is configured")]
    NoProviders,

    /// Every provider failed for one chunk
    #[error("All providers failed for chunk {chunk_index}; last error from {provider}: {source}")]
    AllProvidersFailed {
        /// Index of the chunk that could not be translated
        chunk_index: usize,
        /// Name of the last provider attempted
        provider: String,
        /// Error reported by that provider
        #[source]
        source: ProviderError,
    },

    /// The session was cancelled before it completed
    #[error("Translation cancelled")]
    Cancelled,
}

impl TranslationError {
    /// Whether this outcome is a user/session cancellation rather than a failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Why a single input file could not be loaded
#[derive(Error, Debug)]
pub enum FileLoadError {
    /// The format needs an extractor this tool does not ship
    #[error("Unsupported format: {0}")]
    Unsupported(String),

    /// The file could not be read as UTF-8 text
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The path does not exist
    #[error("Path does not exist")]
    NotFound,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from the local database
    #[error("Database error: {0}")]
    Database(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Database(error.to_string())
    }
}
