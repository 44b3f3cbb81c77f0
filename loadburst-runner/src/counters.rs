use std::sync::atomic::{AtomicU64, Ordering};

/// Run-scoped success/failure tallies, shared by every worker in a run via
/// `Arc`. Both counters are monotonic; atomic `add` is the only mutator and
/// reads are meaningful only after all writers have quiesced (the driver
/// joins every task before reading).
#[derive(Debug, Default)]
pub struct RunCounters {
    success: AtomicU64,
    failure: AtomicU64,
}

impl RunCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_success(&self, n: u64) {
        self.success.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_failure(&self, n: u64) {
        self.failure.fetch_add(n, Ordering::Relaxed);
    }

    pub fn success(&self) -> u64 {
        self.success.load(Ordering::Relaxed)
    }

    pub fn failure(&self) -> u64 {
        self.failure.load(Ordering::Relaxed)
    }
}
