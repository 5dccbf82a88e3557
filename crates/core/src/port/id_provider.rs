// ID Provider Port (for deterministic testing)

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new unique queue item ID
    fn generate_id(&self) -> String;
}

/// UUID v4 provider
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Monotonic counter plus a per-session random tag (production default)
///
/// The counter guarantees uniqueness inside one session regardless of how
/// fast items are created; the tag keeps IDs from different sessions apart.
pub struct SessionIdProvider {
    session_tag: u32,
    counter: AtomicU64,
}

impl SessionIdProvider {
    pub fn new() -> Self {
        Self {
            session_tag: rand::thread_rng().gen(),
            counter: AtomicU64::new(1),
        }
    }
}

impl Default for SessionIdProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdProvider for SessionIdProvider {
    fn generate_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{:08x}-{}", self.session_tag, n)
    }
}

/// Deterministic IDs `{prefix}-1`, `{prefix}-2`, ... (tests)
pub struct SequentialIdProvider {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdProvider {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(1),
        }
    }
}

impl IdProvider for SequentialIdProvider {
    fn generate_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}
