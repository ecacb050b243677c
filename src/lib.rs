//! A bounded-buffer producer-consumer coordinator.
//!
//! # Philosophy
//!
//! A fixed pool of producers generates a known number of items and deposits them into a
//! [`BoundedQueue`] of limited capacity. A fixed pool of consumers takes them out one at a time,
//! in arrival order, and works on each of them for a while.
//!
//! Producers and consumers are [`Workers`]: each of them runs on its own OS thread and is free
//! to block as long as it needs to, be it on a sleep or on the queue itself.
//!
//! [`Workers`]: crate::Worker
//!
//! # Usage
//!
//! Running a production of 10 items by 3 producers and 2 consumers around a single-slot buffer:
//!
//! ```
//! # use conveyor::*;
//! let config = Config::new(3, 2, 1, 10)
//!     .unwrap()
//!     .with_setup(Latency::ZERO)
//!     .with_work(Latency::ZERO);
//!
//! let summary = Coordinator::new(config).run().unwrap();
//! assert_eq!(summary.consumed, 10);
//! ```
//!
//! # The queue
//!
//! The [`BoundedQueue`] can be used on its own. Two counting [`Semaphores`] track the free slots and
//! the ready items, a mutex serializes every insertion and removal. Enqueues block while the queue
//! is full, dequeues block while it's empty, and neither ever waits on a semaphore while holding
//! the mutex.
//!
//! [`Semaphores`]: crate::Semaphore
//!
//! ```
//! # use std::sync::Arc;
//! # use conveyor::BoundedQueue;
//! let queue = Arc::new(BoundedQueue::new(1));
//!
//! let producer = {
//!     let queue = Arc::clone(&queue);
//!     std::thread::spawn(move || {
//!         for val in 0..10 {
//!             queue.enqueue(val).unwrap();
//!         }
//!         queue.close();
//!     })
//! };
//!
//! let mut received = Vec::new();
//! while let Some(val) = queue.dequeue().unwrap() {
//!     received.push(val);
//! }
//!
//! producer.join().unwrap();
//! assert_eq!(received, (0..10).collect::<Vec<_>>());
//! ```
//!
//! # Shutdown
//!
//! Once every producer is done, the coordinator closes the queue: consumers drain the items left
//! and stop on their own. A run can also be interrupted by a termination signal, see
//! [`Coordinator::enable_graceful_shutdown`].

#![warn(missing_docs)]

mod config;
mod consumer;
mod coordinator;
mod error;
mod item;
mod partition;
mod producer;
mod queue;
mod report;
mod runtime;
mod semaphore;
mod service;
mod settings;
#[cfg(test)]
mod test_utils;
mod utils;
mod worker;

pub use config::*;
pub use coordinator::*;
pub use error::*;
pub use item::*;
pub use partition::*;
pub use queue::*;
pub use report::*;
pub use runtime::*;
pub use semaphore::*;
pub use service::*;
pub use settings::*;
pub use utils::*;
pub use worker::*;
