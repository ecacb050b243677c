use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/* ---------- */

/// Identifier of an [`Item`], unique for the lifetime of a run.
pub type ItemId = u64;

/// Identifier of a consumer worker, handed out once at spawn time.
pub type ConsumerId = usize;

/// A unit of work moved from a producer to a consumer through the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Identifier taken from the run's [`IdSource`].
    pub id: ItemId,
    /// How long the consumer works on this item.
    pub work: Duration,
}

impl Item {
    /// Returns a new item.
    #[inline]
    pub fn new(id: ItemId, work: Duration) -> Self {
        Self { id, work }
    }
}

/* ---------- */

/// A monotonic source of [`ItemId`]s shared by every producer of a run.
///
/// # Examples
///
/// ```
/// # use conveyor::IdSource;
/// let ids = IdSource::new();
///
/// assert_eq!(ids.next(), 0);
/// assert_eq!(ids.next(), 1);
/// assert_eq!(ids.issued(), 2);
/// ```
#[derive(Debug, Default)]
pub struct IdSource(AtomicU64);

impl IdSource {
    /// Returns a source starting at 0.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next identifier.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> ItemId {
        self.0.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns how many identifiers were handed out so far.
    #[inline]
    pub fn issued(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/* ---------- */
