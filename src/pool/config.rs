//! Pool configuration.

use std::time::Duration;

/// The pool's worker-count discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// The worker count never changes after `start`.
    Fixed,
    /// Workers are spawned on demand (up to `max_workers`) when the queue
    /// backs up, and idle workers above the initial count are reclaimed
    /// after sitting idle past `idle_timeout`.
    Cached,
}

/// Configuration for a [`Pool`](crate::Pool).
///
/// Built via the `with_*` builder methods and handed to
/// [`Pool::from_config`](crate::Pool::from_config), the ergonomic
/// alternative to calling `Pool::set_mode` / `Pool::set_queue_capacity` /
/// `Pool::set_max_workers` one at a time on a freshly constructed pool.
/// [`Pool::new`](crate::Pool::new) is equivalent to
/// `Pool::from_config(PoolConfig::default())`. `Pool::start` /
/// `Pool::start_with` call [`validate`](Self::validate) internally and
/// refuse to start a pool whose configuration fails it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PoolConfig {
    pub(crate) mode: Mode,
    pub(crate) queue_capacity: usize,
    pub(crate) max_workers: usize,
    pub(crate) idle_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Fixed,
            queue_capacity: i32::MAX as usize,
            max_workers: 1024,
            idle_timeout_secs: 60,
        }
    }
}

impl PoolConfig {
    /// Returns the default configuration: fixed mode, an effectively
    /// unbounded queue, a cap of 1024 workers, and a 60-second idle timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the worker-count discipline.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the maximum number of queued-but-unclaimed tasks.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Sets the maximum number of workers a CACHED pool may grow to.
    #[must_use]
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Sets how long a CACHED pool's worker may sit idle before it is
    /// reclaimed.
    #[must_use]
    pub fn with_idle_timeout_secs(mut self, secs: u64) -> Self {
        self.idle_timeout_secs = secs;
        self
    }

    pub(crate) fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Checks that every field holds a value `Pool::start` can act on.
    ///
    /// Called internally by `Pool::start` / `Pool::start_with` before they
    /// commit to spawning workers; a pool whose configuration fails
    /// validation is not started and `started` is left `false` so the
    /// caller can fix the configuration and retry.
    ///
    /// # Errors
    ///
    /// Returns `Err` describing the first out-of-range field: a zero
    /// `queue_capacity` (a pool that can never accept anything) or a zero
    /// `max_workers` (a pool that can never run anything).
    pub fn validate(&self) -> Result<(), String> {
        if self.queue_capacity == 0 {
            return Err("queue_capacity must be greater than zero".to_string());
        }
        if self.max_workers == 0 {
            return Err("max_workers must be greater than zero".to_string());
        }
        Ok(())
    }
}
