/*!
 * SQLite connection handling for the history, glossary and cache store.
 *
 * A single connection is shared behind a mutex. Async callers reach it
 * through `spawn_blocking`.
 */

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{Connection, Transaction};

use super::schema;

/// Data directory entry and file name of the default store
const STORE_DIRNAME: &str = "npc-translator";
const STORE_FILENAME: &str = "npc-translator.db";

/// Shared handle to the translator's SQLite store
#[derive(Clone)]
pub struct DatabaseConnection {
    /// Backing file; `None` for an in-memory store
    file: Option<PathBuf>,
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Open the store under the platform data directory
    pub fn new_default() -> Result<Self> {
        Self::new(Self::default_database_path()?)
    }

    /// Open, creating if needed, the store at `db_path`
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let file = db_path.as_ref().to_path_buf();

        if let Some(dir) = file.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create database directory: {:?}", dir))?;
        }

        info!("Opening translation store at {:?}", file);
        let conn = Connection::open(&file)
            .with_context(|| format!("Failed to open database: {:?}", file))?;
        Self::prepare(conn, Some(file))
    }

    /// Open a throwaway in-memory store
    pub fn new_in_memory() -> Result<Self> {
        debug!("Opening in-memory translation store");
        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;
        Self::prepare(conn, None)
    }

    fn prepare(conn: Connection, file: Option<PathBuf>) -> Result<Self> {
        schema::initialize_schema(&conn)?;
        Ok(Self {
            file,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// `<data dir>/npc-translator/npc-translator.db`
    pub fn default_database_path() -> Result<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
            .ok_or_else(|| anyhow!("Could not determine a data directory for the translation store"))?;

        Ok(base.join(STORE_DIRNAME).join(STORE_FILENAME))
    }

    /// Backing file, `None` when the store lives in memory
    pub fn path(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Run `f` on the connection from the calling thread
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        f(&self.connection.lock())
    }

    /// Run `f` on the connection from the blocking pool
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || f(&connection.lock()))
            .await
            .context("Database task panicked")?
    }

    /// Run `f` inside a transaction from the blocking pool; commits when `f` succeeds
    pub async fn transaction_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let mut conn = connection.lock();
            let tx = conn.transaction()?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
        .await
        .context("Database transaction task panicked")?
    }

    /// Row counts of each table and the size of the backing file
    pub fn stats(&self) -> Result<DatabaseStats> {
        let (history_count, glossary_count, cache_count) = self.execute(|conn| {
            conn.query_row(
                r#"
                SELECT (SELECT COUNT(*) FROM history),
                       (SELECT COUNT(*) FROM glossary),
                       (SELECT COUNT(*) FROM translation_cache)
                "#,
                [],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, i64>(2)?)),
            )
            .context("Failed to count stored rows")
        })?;

        let file_size_bytes = self
            .path()
            .and_then(|file| std::fs::metadata(file).ok())
            .map_or(0, |meta| meta.len());

        Ok(DatabaseStats {
            history_count,
            glossary_count,
            cache_count,
            file_size_bytes,
        })
    }
}

/// What the store currently holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    pub history_count: i64,
    pub glossary_count: i64,
    /// Cached chunk translations
    pub cache_count: i64,
    /// Zero for an in-memory store
    pub file_size_bytes: u64,
}

impl fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} translations in history, {} glossary terms, {} cached chunks ({} KB on disk)",
            self.history_count,
            self.glossary_count,
            self.cache_count,
            self.file_size_bytes / 1024
        )
    }
}
