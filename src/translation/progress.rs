use std::sync::Arc;

/// Callback receiving completion percentage in `0.0..=100.0`
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Reports per-chunk completion to an optional callback
#[derive(Clone, Default)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
}

impl ProgressReporter {
    /// Reporter forwarding to `callback`
    pub fn new(callback: ProgressCallback) -> Self {
        Self { callback: Some(callback) }
    }

    /// Reporter that discards progress
    pub fn silent() -> Self {
        Self { callback: None }
    }

    /// Percentage for `completed` of `total` chunks
    pub fn percentage(completed: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        completed.min(total) as f64 / total as f64 * 100.0
    }

    /// Notify the callback that `completed` of `total` chunks are done
    pub fn chunk_completed(&self, completed: usize, total: usize) {
        if total == 0 {
            return;
        }
        if let Some(callback) = &self.callback {
            callback(Self::percentage(completed, total));
        }
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
