#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! This package provides [`PoolRegistry`], a registry of object pools for latency-sensitive
//! code that wants to reuse short-lived objects instead of constructing and dropping them over
//! and over (e.g. once per frame in a game loop).
//!
//! This is part of the [Folo project](https://github.com/folo-rs/folo) that provides mechanisms for
//! high-performance hardware-aware programming in Rust.
//!
//! Each kind of reusable object is registered once, after which objects of that kind can be
//! borrowed from the registry, used and handed back for recycling. Recycling resets the object
//! to a blank state via [`Poolable::reset()`] and keeps it around for the next borrower.
//!
//! # Features
//!
//! - **One queue per kind**: objects are pooled by their concrete type, in first-in-first-out
//!   order, optionally capped at a limit. Objects returned to a full queue are dropped.
//! - **Preallocation**: queues can be filled up front when registering and topped up later.
//! - **Erased access**: callers holding a `dyn Poolable` can borrow another object of the same
//!   concrete kind and return erased objects to the right queue.
//! - **Thread-safe and single-threaded variants**: [`SyncPoolRegistry`] for multi-threaded use,
//!   [`PoolRegistry`] for exclusive single-threaded access without any locking.
//! - **List recycling**: [`ListPool`] recycles `Vec<T>` containers and cascades their
//!   [`Poolable`] elements back into a registry.
//!
//! # Example
//!
//! ```rust
//! use reuse_pool::{PoolRegistry, Poolable, Registration};
//!
//! #[derive(Default)]
//! struct Particle {
//!     position: (f32, f32),
//!     velocity: (f32, f32),
//! }
//!
//! impl Poolable for Particle {
//!     fn reset(&mut self) {
//!         *self = Self::default();
//!     }
//! }
//!
//! let mut registry = PoolRegistry::new();
//!
//! // Keep up to 1000 idle particles around, starting with 100.
//! registry.register_with(Registration::<Particle>::new().preallocate(100).limit(1000));
//!
//! for _frame in 0..3 {
//!     let mut particle = registry.get::<Particle>().unwrap();
//!     particle.velocity = (1.0, 0.5);
//!
//!     // ... simulate ...
//!
//!     registry.recycle(particle).unwrap();
//! }
//!
//! assert_eq!(registry.pooled_count::<Particle>().unwrap(), 100);
//! ```
//!
//! For use from multiple threads:
//!
//! ```rust
//! use reuse_pool::{Poolable, SyncPoolRegistry};
//!
//! #[derive(Default)]
//! struct Message {
//!     body: String,
//! }
//!
//! impl Poolable for Message {
//!     fn reset(&mut self) {
//!         self.body.clear();
//!     }
//! }
//!
//! let registry = SyncPoolRegistry::new();
//! registry.register::<Message>();
//!
//! let worker_registry = registry.clone();
//! std::thread::spawn(move || {
//!     let mut message = worker_registry.get::<Message>().unwrap();
//!     message.body.push_str("hello");
//!     worker_registry.recycle(message).unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(registry.pooled_count::<Message>().unwrap(), 1);
//! ```

mod bounded_queue;
mod error;
mod kind;
mod list_pool;
mod poolable;
mod registration;
mod registry;
mod sync_registry;

pub use bounded_queue::*;
pub use error::*;
pub use kind::*;
pub use list_pool::*;
pub use poolable::*;
pub use registration::*;
pub use registry::*;
pub use sync_registry::*;
