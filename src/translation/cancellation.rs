/*!
 * Cancellation of in-flight translation sessions.
 *
 * Every translate call registers a `CancellationToken` for its lifetime.
 * Under `SessionPolicy::ReplaceActive` registering a new session cancels
 * every session still running; under `Independent` sessions only end
 * through `cancel_all` or their own completion.
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::app_config::SessionPolicy;

#[derive(Debug, Default)]
struct Registry {
    next_id: AtomicU64,
    active: Mutex<HashMap<u64, CancellationToken>>,
}

/// Registry of the tokens of running sessions
#[derive(Debug, Clone)]
pub struct CancellationController {
    policy: SessionPolicy,
    registry: Arc<Registry>,
}

/// Registration of one running session; unregisters on drop
#[derive(Debug)]
pub struct ActiveSession {
    id: u64,
    token: CancellationToken,
    registry: Arc<Registry>,
}

impl CancellationController {
    /// Create a controller with the given policy
    pub fn new(policy: SessionPolicy) -> Self {
        Self {
            policy,
            registry: Arc::new(Registry::default()),
        }
    }

    /// Session policy in effect
    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    /// Register a new session, applying the session policy first
    pub fn begin(&self) -> ActiveSession {
        let token = CancellationToken::new();
        let id = self.registry.next_id.fetch_add(1, Ordering::SeqCst);

        let mut active = self.registry.active.lock();
        if self.policy == SessionPolicy::ReplaceActive && !active.is_empty() {
            debug!("Cancelling {} active session(s) before starting session {}", active.len(), id);
            for (_, previous) in active.drain() {
                previous.cancel();
            }
        }
        active.insert(id, token.clone());

        ActiveSession {
            id,
            token,
            registry: Arc::clone(&self.registry),
        }
    }

    /// Cancel every registered session
    pub fn cancel_all(&self) {
        let active = self.registry.active.lock();
        if !active.is_empty() {
            debug!("Cancelling {} active session(s)", active.len());
        }
        for token in active.values() {
            token.cancel();
        }
    }

    /// Number of sessions currently registered
    pub fn active_sessions(&self) -> usize {
        self.registry.active.lock().len()
    }
}

impl Default for CancellationController {
    fn default() -> Self {
        Self::new(SessionPolicy::default())
    }
}

impl ActiveSession {
    /// Registration id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Token observed by the session's work
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Whether the session has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        self.registry.active.lock().remove(&self.id);
    }
}
