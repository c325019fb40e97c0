//! Worker thread identity and spawning.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(0);

fn next_worker_id() -> u64 {
    NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed)
}

/// A worker's identity within the pool's worker registry.
///
/// Holds only the id; the actual OS thread is detached immediately on
/// [`start`](Self::start), matching the pool's shutdown model, which proves
/// completion by the worker registry draining to empty rather than by
/// joining thread handles.
pub(crate) struct WorkerRecord {
    id: u64,
}

impl WorkerRecord {
    pub(crate) fn new() -> Self {
        Self { id: next_worker_id() }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Spawns the worker's OS thread, detached, running `routine(self.id())`.
    pub(crate) fn start<F>(&self, routine: F)
    where
        F: FnOnce(u64) + Send + 'static,
    {
        let id = self.id;
        thread::Builder::new()
            .name(format!("pool-worker-{id}"))
            .spawn(move || routine(id))
            .expect("failed to spawn pool worker thread");
    }
}
