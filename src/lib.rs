//! # Prometheus Parking Lot
//!
//! A process-local worker pool: a hand-rolled scheduler that dispatches
//! caller-submitted [`Task`]s across a managed set of worker threads and
//! hands each task's result back to its submitter through a one-shot
//! [`PoolResult`] handle.
//!
//! ## Core pieces
//!
//! - [`Pool`] — the engine: a bounded task queue, a worker registry, and
//!   two worker-count disciplines ([`Mode::Fixed`] and [`Mode::Cached`]).
//! - [`Task`] — the caller-supplied unit of work; any `FnMut() -> DynamicValue`
//!   closure implements it, or a type can implement it directly.
//! - [`PoolResult`] — a one-shot future-like handle bound to a submitted
//!   task's eventual [`DynamicValue`].
//! - [`DynamicValue`] — a type-erased, move-only, single-use container for a
//!   task's return value, since a pool never knows what its tasks return.
//!
//! Out of scope: work stealing, priority scheduling, task cancellation,
//! cross-process communication, and persistence across restarts — this is a
//! process-local, in-memory scheduler only.
//!
//! ## Quick example
//!
//! ```
//! use prometheus_parking_lot::{DynamicValue, Pool};
//!
//! let pool = Pool::new();
//! pool.start_with(4).expect("default configuration is always valid");
//!
//! let handle = pool.submit(|| DynamicValue::new(2 + 2));
//! let value: i32 = handle.get().extract().unwrap();
//! assert_eq!(value, 4);
//! ```
//!
//! For complete examples, see `tests/pool_test.rs`.

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Synchronization primitives: `Mutex`, re-exported from `parking_lot`.
pub mod mutex;
/// Synchronization primitives: `Condvar`, re-exported/wrapped from `parking_lot`.
pub mod condvar;
/// One-time initialization primitive, re-exported/wrapped from `parking_lot`.
pub mod once;
/// Reader-writer lock, re-exported/wrapped from `parking_lot`.
pub mod rwlock;
/// The type-erased task result container.
pub mod dynamic_value;
/// The counting semaphore used internally for result handoff.
mod semaphore;
/// The one-shot result handle returned by `Pool::submit`.
pub mod result;
/// The caller-subclassable unit of work.
pub mod task;
/// Worker thread identity and spawning.
mod worker;
/// The pool engine itself: queue, worker registry, and lifecycle.
pub mod pool;
/// Shared utilities (structured logging setup).
pub mod util;

pub use condvar::Condvar;
pub use dynamic_value::{DynamicValue, TypeMismatch};
pub use mutex::{Mutex, MutexGuard};
pub use pool::{Mode, Pool, PoolConfig};
pub use result::PoolResult;
pub use task::Task;
