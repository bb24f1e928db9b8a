/*!
 * Database module for persistent storage.
 *
 * This module provides SQLite-based persistence for:
 * - Translation history
 * - The user glossary
 * - The offline translation cache
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::{GlossaryEntry, HistoryEntry};
pub use repository::Repository;
