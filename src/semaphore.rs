//! Counting semaphore built on the crate's own `Mutex`/`Condvar`.
//!
//! Not part of the public API: this is the signalling primitive the
//! [`PoolResult`](crate::result::PoolResult) handle uses internally to block
//! a submitter until its task's worker has posted a value.

use crate::condvar::Condvar;
use crate::mutex::Mutex;

pub(crate) struct Semaphore {
    count: Mutex<usize>,
    cond: Condvar,
}

impl Semaphore {
    pub(crate) fn new(initial: usize) -> Self {
        Self {
            count: Mutex::new(initial),
            cond: Condvar::new(),
        }
    }

    /// Blocks until the count is non-zero, then decrements it.
    pub(crate) fn wait(&self) {
        let mut count = self.count.lock();
        while *count == 0 {
            self.cond.wait(&mut count);
        }
        *count -= 1;
    }

    /// Increments the count and wakes any waiters.
    pub(crate) fn post(&self) {
        let mut count = self.count.lock();
        *count += 1;
        self.cond.notify_all();
    }
}
