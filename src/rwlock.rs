//! Reader-writer lock implementation
//!
//! This module provides a high-performance reader-writer lock (`RwLock`) that allows
//! multiple concurrent readers or a single writer. It's built on top of the battle-tested
//! `parking_lot` crate.
//!
//! # Features
//!
//! - Multiple concurrent readers
//! - Exclusive writer access
//! - Fair lock acquisition
//! - No poisoning on panic
//! - Supports both read and write guards
//!
//! # Examples
//!
//! Basic usage:
//!
//! ```
//! use prometheus_parking_lot::RwLock;
//!
//! let lock = RwLock::new(5);
//!
//! // Many reader locks can be held at once
//! {
//!     let r1 = lock.read();
//!     let r2 = lock.read();
//!     assert_eq!(*r1, 5);
//!     assert_eq!(*r2, 5);
//! } // read locks are dropped
//!
//! // Only one write lock can be held
//! {
//!     let mut w = lock.write();
//!     *w += 1;
//!     assert_eq!(*w, 6);
//! } // write lock is dropped
//! ```
//!
//! Concurrent access pattern:
//!
//! ```
//! use prometheus_parking_lot::RwLock;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let lock = Arc::new(RwLock::new(0));
//! let mut handles = vec![];
//!
//! // Spawn 10 reader threads
//! for _ in 0..10 {
//!     let lock = Arc::clone(&lock);
//!     handles.push(thread::spawn(move || {
//!         let value = lock.read();
//!         println!("Read: {}", *value);
//!     }));
//! }
//!
//! // Spawn 1 writer thread
//! let lock_clone = Arc::clone(&lock);
//! handles.push(thread::spawn(move || {
//!     let mut value = lock_clone.write();
//!     *value += 1;
//! }));
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! ```

// Re-export parking_lot's RwLock types
pub use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard,
    RwLockUpgradableReadGuard, RwLockWriteGuard,
};
