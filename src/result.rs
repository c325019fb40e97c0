//! One-shot result handoff between a worker and a task's submitter.

use std::sync::Arc;

use crate::dynamic_value::DynamicValue;
use crate::mutex::Mutex;
use crate::semaphore::Semaphore;

/// Shared state between a queued job and the `PoolResult` handed back to its
/// submitter.
///
/// Owning this through an `Arc` on both sides removes the raw task→result
/// back-pointer: neither side outlives the other's use of it, so there is no
/// dangling pointer to guard against.
pub(crate) struct ResultState {
    slot: Mutex<Option<DynamicValue>>,
    ready: Semaphore,
}

impl ResultState {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            slot: Mutex::new(None),
            ready: Semaphore::new(0),
        })
    }

    /// Stores `value` and wakes whoever is waiting on [`PoolResult::get`].
    ///
    /// Called exactly once per job, either with the task's real return value
    /// or with [`DynamicValue::empty`] if the task panicked or was never run.
    pub(crate) fn set_val(&self, value: DynamicValue) {
        *self.slot.lock() = Some(value);
        self.ready.post();
    }
}

/// A handle to a task's eventual result.
///
/// Returned by [`Pool::submit`](crate::Pool::submit). Calling [`get`](Self::get)
/// blocks the calling thread until the task has run (or the submission was
/// rejected), then consumes the handle.
pub struct PoolResult {
    state: Option<Arc<ResultState>>,
}

impl PoolResult {
    pub(crate) fn valid(state: Arc<ResultState>) -> Self {
        Self { state: Some(state) }
    }

    /// A handle for a submission that was rejected before a task was ever
    /// queued. `get` returns immediately with an empty value.
    pub(crate) fn invalid() -> Self {
        Self { state: None }
    }

    /// Blocks until the task has produced a value, then returns it.
    ///
    /// For a handle returned from a rejected submission, returns
    /// [`DynamicValue::empty`] immediately without blocking.
    pub fn get(self) -> DynamicValue {
        let Some(state) = self.state else {
            return DynamicValue::empty();
        };
        state.ready.wait();
        state.slot.lock().take().unwrap_or_else(DynamicValue::empty)
    }
}
