use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{info, warn};

use crate::config::Config;
use crate::consumer::ConsumerContext;
use crate::item::{IdSource, Item};
use crate::partition::partition;
use crate::producer::ProducerContext;
use crate::queue::BoundedQueue;
use crate::report::{Event, PrinterContext};
use crate::runtime::Runtime;
use crate::service::Connect;
use crate::utils::Shutdown;
use crate::Error;

const PRODUCERS_POOL: u64 = 1;

/* ---------- */

/// Runs a whole production: spawns the producers and the consumers around a
/// [`BoundedQueue`], then tears everything down once every item was consumed.
///
/// A run goes through the following steps:
/// 1. the items are split into one range per producer, see [`partition`].
/// 2. every producer is launched in its own thread, then every consumer.
/// 3. the producers are joined and [`Event::DoneProducing`] is reported.
/// 4. the queue is closed, the consumers drain it and are joined.
///
/// If a worker can't be spawned, fails or panics, the whole run is stopped and the error returned.
///
/// # Examples
///
/// ```
/// # use conveyor::*;
/// let config = Config::new(2, 2, 4, 20)
///     .unwrap()
///     .with_setup(Latency::ZERO)
///     .with_work(Latency::ZERO);
///
/// let summary = Coordinator::new(config).run().unwrap();
///
/// assert_eq!(summary.produced, 20);
/// assert_eq!(summary.consumed, 20);
/// ```
pub struct Coordinator {
    config: Config,
    pub(crate) events: Option<Sender<Event>>,
    graceful: bool,
}

/// What happened during a [`Coordinator::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Number of items enqueued by the producers.
    pub produced: u64,
    /// Number of items taken out by the consumers.
    pub consumed: u64,
    /// Whether the run was cut short by a termination signal.
    pub interrupted: bool,
}

impl Coordinator {
    /// Returns a coordinator for the given configuration.
    #[inline]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            events: None,
            graceful: false,
        }
    }

    /// Stops the run gracefully on `SIGINT`, `SIGTERM` or `SIGQUIT`.
    ///
    /// Producers stop right away and consumers stop after their current item. A second signal
    /// kills the process.
    #[inline]
    pub fn enable_graceful_shutdown(&mut self) {
        self.graceful = true;
    }

    /// Runs the production until every item was consumed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ThreadStart`] if a worker couldn't be spawned, [`Error::Signal`] if the
    /// graceful shutdown couldn't be enabled, or the first error a worker ran into.
    pub fn run(self) -> Result<Summary, Error> {
        let Config {
            producers,
            consumers,
            capacity,
            items,
            ..
        } = self.config;

        let queue = Arc::new(BoundedQueue::new(capacity.get()));
        let ids = Arc::new(IdSource::new());
        let shutdown = Shutdown::new();

        let _signals = if self.graceful {
            let queue = Arc::clone(&queue);
            let guard = crate::utils::enable_graceful_shutdown(&shutdown, move || queue.close())?;
            Some(guard)
        } else {
            None
        };

        let mut producer_rt = Runtime::nested(shutdown.clone());
        let mut consumer_rt = Runtime::nested(shutdown.clone());
        // Dropped before the runtimes, so that no worker stays blocked on the queue while they are joined.
        let teardown = Teardown {
            queue: Arc::clone(&queue),
            shutdown: shutdown.clone(),
        };

        info!(%producers, %consumers, %capacity, %items, "starting production");

        let ranges = partition(items.get(), producers.get());
        for (nth, range) in ranges.into_iter().enumerate() {
            producer_rt.launch_from_context(ProducerContext {
                nth,
                range,
                queue: Arc::clone(&queue),
                ids: Arc::clone(&ids),
                setup: self.config.setup,
                work: self.config.work,
                rng: self.config.rng(PRODUCERS_POOL, nth),
            })?;
        }

        for id in 0..consumers.get() {
            consumer_rt.launch_from_context(ConsumerContext {
                id,
                queue: Arc::clone(&queue),
                events: self.events.clone(),
            })?;
        }

        producer_rt.wait()?;
        // Interrupted producers dropped part of their range.
        if shutdown.is_running() {
            self.report(Event::DoneProducing);
            info!(produced = ids.issued(), "done producing");
        }

        queue.close();
        consumer_rt.wait()?;

        let stats = queue.stats();
        let summary = Summary {
            produced: stats.enqueued,
            consumed: stats.dequeued,
            interrupted: !shutdown.is_running(),
        };

        if summary.interrupted {
            warn!(?summary, "production interrupted");
        } else {
            info!(?summary, "production complete");
        }

        drop(teardown);
        Ok(summary)
    }

    #[inline]
    fn report(&self, event: Event) {
        if let Some(events) = self.events.as_ref() {
            let _ = events.send(event);
        }
    }
}

impl<W> Connect<PrinterContext<W>> for Coordinator {
    #[inline]
    fn on_connection(&mut self, endpoint: Sender<Event>) {
        let _ = self.events.insert(endpoint);
    }
}

/* ---------- */

struct Teardown {
    queue: Arc<BoundedQueue<Item>>,
    shutdown: Shutdown,
}

impl Drop for Teardown {
    fn drop(&mut self) {
        self.shutdown.stop();
        self.queue.close();
    }
}

/* ---------- */
