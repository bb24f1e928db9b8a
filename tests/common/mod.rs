/*!
 * Common test utilities for the npc-translator test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use parking_lot::Mutex;
use tempfile::TempDir;

use npc_translator::providers::Provider;
use npc_translator::translation::{ProgressReporter, TranslationOptions, TranslationService};

/// Route `log` output to the test harness
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Options with no pause between chunks
pub fn fast_options(max_chunk_chars: usize) -> TranslationOptions {
    TranslationOptions {
        max_chunk_chars,
        inter_chunk_delay: Duration::ZERO,
        ..TranslationOptions::default()
    }
}

/// Service over `providers` with no inter-chunk pause
pub fn service_with(providers: Vec<Arc<dyn Provider>>, max_chunk_chars: usize) -> TranslationService {
    TranslationService::new(providers, fast_options(max_chunk_chars))
}

/// Reporter that records every percentage it receives
pub fn recording_reporter() -> (ProgressReporter, Arc<Mutex<Vec<f64>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let reporter = ProgressReporter::new(Arc::new(move |percentage| sink.lock().push(percentage)));
    (reporter, seen)
}
