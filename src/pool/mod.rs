//! The worker pool engine.

mod config;

pub use config::{Mode, PoolConfig};

use std::collections::{HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::condvar::Condvar;
use crate::dynamic_value::DynamicValue;
use crate::mutex::Mutex;
use crate::result::{PoolResult, ResultState};
use crate::task::Task;
use crate::worker::WorkerRecord;

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(1);
const IDLE_TICK: Duration = Duration::from_secs(1);

struct Job {
    task: Box<dyn Task>,
    result: Arc<ResultState>,
}

struct State {
    workers: HashMap<u64, WorkerRecord>,
    queue: VecDeque<Job>,
    config: PoolConfig,
    init_size: usize,
}

struct Inner {
    state: Mutex<State>,
    not_full: Condvar,
    not_empty: Condvar,
    exit_rendezvous: Condvar,
    running: AtomicBool,
    current_size: AtomicUsize,
    idle_size: AtomicUsize,
    task_count: AtomicU64,
    started: AtomicBool,
}

/// A process-local worker pool.
///
/// Dropping a `Pool` triggers [`shutdown`](Self::shutdown): it signals all
/// workers to exit, drains and poisons any queued-but-unclaimed tasks so no
/// submitter is left blocked forever on [`PoolResult::get`], and blocks the
/// dropping thread until every worker has exited.
pub struct Pool {
    inner: Arc<Inner>,
}

impl Pool {
    /// Creates a pool with the default configuration, unstarted.
    ///
    /// Equivalent to `Pool::from_config(PoolConfig::default())`. No worker
    /// threads exist until [`start`](Self::start) or
    /// [`start_with`](Self::start_with) is called.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(PoolConfig::default())
    }

    /// Creates a pool from a pre-built [`PoolConfig`], unstarted.
    ///
    /// This is the ergonomic alternative to constructing a default pool and
    /// calling `set_mode` / `set_queue_capacity` / `set_max_workers`
    /// individually. The configuration is not validated until
    /// [`start`](Self::start) / [`start_with`](Self::start_with) is called;
    /// it may still be overridden field-by-field through the individual
    /// setters before then.
    #[must_use]
    pub fn from_config(config: PoolConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    workers: HashMap::new(),
                    queue: VecDeque::new(),
                    config,
                    init_size: 0,
                }),
                not_full: Condvar::new(),
                not_empty: Condvar::new(),
                exit_rendezvous: Condvar::new(),
                running: AtomicBool::new(false),
                current_size: AtomicUsize::new(0),
                idle_size: AtomicUsize::new(0),
                task_count: AtomicU64::new(0),
                started: AtomicBool::new(false),
            }),
        }
    }

    /// Sets the worker-count discipline. Ignored with a logged message if
    /// the pool has already started.
    pub fn set_mode(&self, mode: Mode) {
        if self.inner.started.load(Ordering::Acquire) {
            tracing::debug!("set_mode ignored: pool already running");
            return;
        }
        self.inner.state.lock().config.mode = mode;
    }

    /// Sets the queue capacity. Ignored with a logged message if the pool
    /// has already started.
    pub fn set_queue_capacity(&self, capacity: usize) {
        if self.inner.started.load(Ordering::Acquire) {
            tracing::debug!("set_queue_capacity ignored: pool already running");
            return;
        }
        if capacity == 0 {
            tracing::warn!("ignoring queue_capacity=0, keeping previous value");
            return;
        }
        self.inner.state.lock().config.queue_capacity = capacity;
    }

    /// Sets the maximum worker count for CACHED mode. Ignored with a logged
    /// message if the pool has already started.
    pub fn set_max_workers(&self, max_workers: usize) {
        if self.inner.started.load(Ordering::Acquire) {
            tracing::debug!("set_max_workers ignored: pool already running");
            return;
        }
        if max_workers == 0 {
            tracing::warn!("ignoring max_workers=0, keeping previous value");
            return;
        }
        self.inner.state.lock().config.max_workers = max_workers;
    }

    /// Starts the pool with `num_cpus::get()` initial workers.
    ///
    /// # Errors
    ///
    /// See [`start_with`](Self::start_with).
    pub fn start(&self) -> Result<(), String> {
        self.start_with(num_cpus::get())
    }

    /// Starts the pool with `initial` worker threads.
    ///
    /// A second call on an already-started pool is a no-op (logged at
    /// `tracing::warn!`) that returns `Ok(())`.
    ///
    /// # Errors
    ///
    /// Validates the pool's configuration via
    /// [`PoolConfig::validate`](crate::PoolConfig::validate) before spawning
    /// any worker; if validation fails, no workers are spawned, `started` is
    /// left `false` so the configuration can be corrected and `start`/
    /// `start_with` retried, and the validation error is returned.
    pub fn start_with(&self, initial: usize) -> Result<(), String> {
        if self.inner.started.swap(true, Ordering::AcqRel) {
            tracing::warn!("start called on a pool that is already running");
            return Ok(());
        }

        let spawned_ids = {
            let mut state = self.inner.state.lock();
            if let Err(err) = state.config.validate() {
                drop(state);
                self.inner.started.store(false, Ordering::Release);
                tracing::error!(error = %err, "refusing to start pool with invalid configuration");
                return Err(err);
            }
            state.init_size = initial;
            for _ in 0..initial {
                let worker = WorkerRecord::new();
                state.workers.insert(worker.id(), worker);
            }
            self.inner.current_size.store(initial, Ordering::Release);
            self.inner.idle_size.store(initial, Ordering::Release);
            self.inner.running.store(true, Ordering::Release);
            state.workers.keys().copied().collect::<Vec<_>>()
        };

        for id in spawned_ids {
            self.spawn_worker(id);
        }

        tracing::info!(workers = initial, "pool started");
        Ok(())
    }

    fn spawn_worker(&self, id: u64) {
        let inner = Arc::clone(&self.inner);
        let state = self.inner.state.lock();
        let record = state.workers.get(&id).expect("worker just inserted");
        record.start(move |id| worker_loop(inner, id));
    }

    /// Submits a task for execution, returning a handle to its eventual
    /// result.
    ///
    /// If the queue is full for a full second (the admission timeout), the
    /// submission is rejected: the returned handle's `get` resolves
    /// immediately to an empty value, and the rejection is logged at
    /// `tracing::warn!` so it reaches the diagnostic stream even without an
    /// error return.
    pub fn submit(&self, task: impl Task + 'static) -> PoolResult {
        self.submit_boxed(Box::new(task))
    }

    fn submit_boxed(&self, task: Box<dyn Task>) -> PoolResult {
        let mut state = self.inner.state.lock();

        let timed_out = self
            .inner
            .not_full
            .wait_while_for(
                &mut state,
                |s| s.queue.len() >= s.config.queue_capacity,
                SUBMIT_TIMEOUT,
            )
            .timed_out();

        if timed_out && state.queue.len() >= state.config.queue_capacity {
            tracing::warn!("task queue full, submission rejected");
            return PoolResult::invalid();
        }

        let result_state = ResultState::new();
        state.queue.push_back(Job {
            task,
            result: Arc::clone(&result_state),
        });
        self.inner.task_count.fetch_add(1, Ordering::AcqRel);
        self.inner.not_empty.notify_all();

        let mut spawned_id = None;
        if state.config.mode == Mode::Cached {
            let task_count = self.inner.task_count.load(Ordering::Acquire);
            let idle_size = self.inner.idle_size.load(Ordering::Acquire) as u64;
            let current_size = self.inner.current_size.load(Ordering::Acquire);
            if task_count > idle_size && current_size < state.config.max_workers {
                let worker = WorkerRecord::new();
                let id = worker.id();
                state.workers.insert(id, worker);
                self.inner.current_size.fetch_add(1, Ordering::AcqRel);
                self.inner.idle_size.fetch_add(1, Ordering::AcqRel);
                spawned_id = Some(id);
                tracing::info!(worker_id = id, "spawned worker for queue backlog");
            }
        }

        drop(state);

        if let Some(id) = spawned_id {
            self.spawn_worker(id);
        }

        PoolResult::valid(result_state)
    }

    fn shutdown(&self) {
        self.inner.running.store(false, Ordering::Release);

        let mut state = self.inner.state.lock();
        while let Some(job) = state.queue.pop_front() {
            job.result.set_val(DynamicValue::empty());
        }
        self.inner.not_empty.notify_all();

        self.inner
            .exit_rendezvous
            .wait_while(&mut state, |s| !s.workers.is_empty());

        tracing::info!("pool shut down, all workers exited");
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(inner: Arc<Inner>, id: u64) {
    let mut last_active = Instant::now();

    loop {
        let job = {
            let mut state = inner.state.lock();

            loop {
                if !state.queue.is_empty() {
                    break;
                }

                if !inner.running.load(Ordering::Acquire) {
                    state.workers.remove(&id);
                    inner.exit_rendezvous.notify_all();
                    tracing::debug!(worker_id = id, "worker exiting on shutdown");
                    return;
                }

                if state.config.mode == Mode::Cached {
                    let timed_out = inner.not_empty.wait_for(&mut state, IDLE_TICK).timed_out();
                    if timed_out {
                        let idle_timeout = state.config.idle_timeout();
                        let init_size = state.init_size;
                        if last_active.elapsed() >= idle_timeout
                            && inner.current_size.load(Ordering::Acquire) > init_size
                        {
                            state.workers.remove(&id);
                            inner.current_size.fetch_sub(1, Ordering::AcqRel);
                            inner.idle_size.fetch_sub(1, Ordering::AcqRel);
                            tracing::info!(worker_id = id, "worker idle-evicted");
                            return;
                        }
                    }
                } else {
                    inner.not_empty.wait(&mut state);
                }
            }

            inner.idle_size.fetch_sub(1, Ordering::AcqRel);
            let job = state.queue.pop_front().expect("checked non-empty above");
            inner.task_count.fetch_sub(1, Ordering::AcqRel);
            if !state.queue.is_empty() {
                inner.not_empty.notify_all();
            }
            job
        };

        inner.not_full.notify_all();
        run_job(job);
        inner.idle_size.fetch_add(1, Ordering::AcqRel);
        last_active = Instant::now();
    }
}

fn run_job(mut job: Job) {
    match panic::catch_unwind(AssertUnwindSafe(|| job.task.run())) {
        Ok(value) => job.result.set_val(value),
        Err(payload) => {
            tracing::error!(panic = %panic_message(&payload), "task panicked");
            job.result.set_val(DynamicValue::empty());
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}
