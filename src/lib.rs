/*!
 * # npc-translator
 *
 * A Rust library for translating free text through a chain of public
 * machine-translation services.
 *
 * ## Features
 *
 * - Split long input into bounded chunks on whitespace
 * - Translate each chunk through an ordered list of providers:
 *   - Google Translate (gtx endpoint)
 *   - MyMemory
 *   - Lingva
 * - Fall back to the next provider when one fails
 * - Cancel an in-flight session, or every session at once
 * - Report progress per chunk
 * - Offline cache, history and glossary kept in SQLite
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: The translation pipeline:
 *   - `translation::chunker`: Text chunking
 *   - `translation::fallback`: Provider fallback for one chunk
 *   - `translation::cancellation`: Session cancellation
 *   - `translation::progress`: Progress reporting
 *   - `translation::core`: The translate operation
 *   - `translation::cache`: Network-first offline cache
 * - `providers`: HTTP clients for the translation backends
 * - `database`: SQLite persistence
 * - `file_utils`: Input file loading
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, TranslationOutcome};
pub use translation::{ProgressReporter, TranslationRequest, TranslationService};
pub use language_utils::{get_language_name, normalize_to_part1_or_part2t};
pub use errors::{AppError, FileLoadError, ProviderError, TranslationError};
