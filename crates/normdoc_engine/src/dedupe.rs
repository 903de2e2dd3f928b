use std::collections::HashSet;
use std::sync::Mutex;

/// Store backing deduplication across harvest runs.
///
/// `claim` is an atomic check-and-insert: of any number of concurrent
/// workers claiming the same fingerprint, exactly one wins. A worker that
/// claims a fingerprint but then fails to persist the card must `release`
/// it so a later run can pick the document up again.
pub trait DedupeStore: Send + Sync {
    /// Claims `fingerprint`; returns false when it is already held.
    fn claim(&self, fingerprint: &str) -> bool;
    /// Releases a claim after a failed save.
    fn release(&self, fingerprint: &str);
}

/// In-memory store used by tests and single-process runs.
#[derive(Debug, Default)]
pub struct MemoryDedupeStore {
    seen: Mutex<HashSet<String>>,
}

impl MemoryDedupeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().map(|seen| seen.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DedupeStore for MemoryDedupeStore {
    fn claim(&self, fingerprint: &str) -> bool {
        self.seen
            .lock()
            .map(|mut seen| seen.insert(fingerprint.to_string()))
            .unwrap_or(false)
    }

    fn release(&self, fingerprint: &str) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.remove(fingerprint);
        }
    }
}
