/*!
 * Translation pipeline.
 *
 * This module contains the functionality that turns a request into
 * translated text. It is split into several submodules:
 *
 * - `chunker`: Splitting long input into bounded chunks
 * - `fallback`: Ordered fallback across providers for one chunk
 * - `cancellation`: Registry of cancellation tokens for running sessions
 * - `progress`: Per-chunk progress callbacks
 * - `session`: Request type and per-call session state
 * - `cache`: Bounded, expiring response cache for offline use
 * - `glossary`: Post-translation term replacement
 * - `core`: The service tying the above together
 */

// Re-export main types for easier usage
pub use self::cache::{CacheEntry, TranslationCache};
pub use self::cancellation::{ActiveSession, CancellationController};
pub use self::chunker::{Chunk, split_into_chunks};
pub use self::core::{TranslationOptions, TranslationService};
pub use self::fallback::{ChunkTranslation, FallbackOrchestrator};
pub use self::glossary::apply_glossary;
pub use self::progress::{ProgressCallback, ProgressReporter};
pub use self::session::{SessionState, TranslationRequest, TranslationSession};

// Submodules
pub mod cache;
pub mod cancellation;
pub mod chunker;
pub mod core;
pub mod fallback;
pub mod glossary;
pub mod progress;
pub mod session;
