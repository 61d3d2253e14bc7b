use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Thread-safe counter handing out 1, 2, 3, ...
///
/// Clones share the same sequence.
#[derive(Debug, Clone, Default)]
pub struct SequenceCounter {
    value: Arc<AtomicI64>,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment and return the new value.
    pub fn next(&self) -> i64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Last value handed out, `0` before the first call.
    pub fn current(&self) -> i64 {
        self.value.load(Ordering::SeqCst)
    }
}
