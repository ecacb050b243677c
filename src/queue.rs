//! Blocking FIFO queue of fixed capacity shared by producers and consumers.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::semaphore::Semaphore;
use crate::Error;

/* ---------- */

/// A thread-safe FIFO queue holding at most `capacity` items.
///
/// Two counting semaphores gate the access to the items: one counts the free slots
/// (starting at `capacity`), the other counts the items ready to be dequeued (starting at 0).
/// The items themselves sit behind a single mutex, which serializes every insertion and removal.
///
/// Permits are always taken *before* locking the items and given back *after* unlocking them,
/// so a thread never waits on a semaphore while it holds the lock.
///
/// Items are dequeued in the order their insertions completed, whichever producer enqueued them.
///
/// # Examples
///
/// ```
/// # use conveyor::BoundedQueue;
/// let queue = BoundedQueue::new(2);
///
/// queue.enqueue("a").unwrap();
/// queue.enqueue("b").unwrap();
/// queue.close();
///
/// assert_eq!(queue.dequeue().unwrap(), Some("a"));
/// assert_eq!(queue.dequeue().unwrap(), Some("b"));
/// assert_eq!(queue.dequeue().unwrap(), None);
/// ```
#[derive(Debug)]
pub struct BoundedQueue<T> {
    capacity: usize,
    slots: Semaphore,
    ready: Semaphore,
    state: Mutex<State<T>>,
}

#[derive(Debug)]
struct State<T> {
    items: VecDeque<T>,
    closed: bool,
    enqueued: u64,
    dequeued: u64,
}

/// Lifetime counters of a [`BoundedQueue`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    /// Number of items whose insertion completed.
    pub enqueued: u64,
    /// Number of items removed by a consumer.
    pub dequeued: u64,
}

impl<T> BoundedQueue<T> {
    /// Returns a new empty queue that holds at most `capacity` items.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Semaphore::new(capacity),
            ready: Semaphore::new(0),
            state: Mutex::new(State {
                items: VecDeque::with_capacity(capacity),
                closed: false,
                enqueued: 0,
                dequeued: 0,
            }),
        }
    }

    /// Inserts `item` at the tail of the queue, blocking the calling thread until a slot is free.
    ///
    /// Returns once the insertion is committed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the queue is closed, in which case `item` is dropped.
    /// Returns [`Error::Poisoned`] if one of the queue's locks was poisoned.
    pub fn enqueue(&self, item: T) -> Result<(), Error> {
        self.slots.acquire()?;

        {
            let mut state = self.lock()?;
            if state.closed {
                drop(state);
                self.slots.release()?;
                return Err(Error::Closed);
            }

            if state.items.len() >= self.capacity {
                drop(state);
                self.slots.release()?;
                return Err(Error::BrokenInvariant("enqueue past capacity"));
            }

            state.items.push_back(item);
            state.enqueued += 1;
        }

        self.ready.release()
    }

    /// Removes the item at the head of the queue, blocking the calling thread until one is available.
    ///
    /// Once the queue is closed, the remaining items are still handed out. `None` is returned
    /// when the queue is both closed and empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Poisoned`] if one of the queue's locks was poisoned.
    pub fn dequeue(&self) -> Result<Option<T>, Error> {
        loop {
            match self.ready.acquire() {
                Ok(()) => break,
                Err(Error::Closed) => {
                    // An enqueue may have committed its item without releasing its permit yet.
                    if self.lock()?.items.is_empty() {
                        return Ok(None);
                    }
                    std::thread::yield_now();
                }
                Err(err) => return Err(err),
            }
        }

        let item = {
            let mut state = self.lock()?;
            let item = state.items.pop_front();

            debug_assert!(item.is_some(), "item permit granted on an empty queue");
            let item = item.ok_or(Error::BrokenInvariant("dequeue from an empty queue"))?;
            state.dequeued += 1;
            item
        };

        self.slots.release()?;
        Ok(Some(item))
    }

    /// Closes the queue.
    ///
    /// Every thread blocked in [`enqueue`] or [`dequeue`] is woken up. Later enqueues fail
    /// with [`Error::Closed`] while dequeues keep draining the items left in the queue.
    ///
    /// [`enqueue`]: Self::enqueue
    /// [`dequeue`]: Self::dequeue
    pub fn close(&self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .closed = true;

        self.slots.close();
        self.ready.close();
    }

    /// Returns whether [`close`](Self::close) was called.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .closed
    }

    /// Returns the number of items currently in the queue.
    #[inline]
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .len()
    }

    /// Returns whether the queue holds no item.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of items the queue can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of items enqueued and dequeued so far.
    #[inline]
    pub fn stats(&self) -> QueueStats {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        QueueStats {
            enqueued: state.enqueued,
            dequeued: state.dequeued,
        }
    }

    #[inline]
    fn lock(&self) -> Result<MutexGuard<'_, State<T>>, Error> {
        self.state.lock().map_err(|_| Error::Poisoned("queue"))
    }
}

/* ---------- */
