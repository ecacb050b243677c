use std::ops::Range;
use std::sync::Arc;

use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::config::Latency;
use crate::item::{IdSource, Item};
use crate::queue::BoundedQueue;
use crate::settings::Settings;
use crate::worker::{Context, ControlFlow, Worker};
use crate::Error;

/* ---------- */

/// Everything a [`Producer`] needs, gathered by the coordinator before launching it.
pub(crate) struct ProducerContext {
    pub(crate) nth: usize,
    pub(crate) range: Range<usize>,
    pub(crate) queue: Arc<BoundedQueue<Item>>,
    pub(crate) ids: Arc<IdSource>,
    pub(crate) setup: Latency,
    pub(crate) work: Latency,
    pub(crate) rng: StdRng,
}

impl Context for ProducerContext {
    type Target = Producer;

    fn into_worker(self) -> Result<Self::Target, Error> {
        Ok(Producer {
            nth: self.nth,
            range: self.range,
            queue: self.queue,
            ids: self.ids,
            setup: self.setup,
            work: self.work,
            rng: self.rng,
        })
    }

    fn settings(&self) -> Settings {
        Settings::new().name(format!("producer-{}", self.nth))
    }
}

/* ---------- */

/// A worker enqueuing one item per value of its range.
///
/// Before each item, the producer sleeps for a random setup time. The item gets the next
/// identifier of the run and a random work duration for the consumer that will take it.
pub(crate) struct Producer {
    nth: usize,
    range: Range<usize>,
    queue: Arc<BoundedQueue<Item>>,
    ids: Arc<IdSource>,
    setup: Latency,
    work: Latency,
    rng: StdRng,
}

impl Worker for Producer {
    fn on_start(&mut self) {
        debug!(producer = self.nth, range = ?self.range, "producer started");
    }

    fn on_update(&mut self) -> Result<ControlFlow, Error> {
        if self.range.next().is_none() {
            debug!(producer = self.nth, "range exhausted");
            return Ok(ControlFlow::Break);
        }

        std::thread::sleep(self.setup.sample(&mut self.rng));

        let item = Item::new(self.ids.next(), self.work.sample(&mut self.rng));
        match self.queue.enqueue(item) {
            Ok(()) => Ok(ControlFlow::Continue),
            Err(Error::Closed) => {
                warn!(
                    producer = self.nth,
                    left = self.range.len() + 1,
                    "queue closed, dropping the rest of the range"
                );
                Ok(ControlFlow::Break)
            }
            Err(err) => {
                self.queue.close();
                Err(err)
            }
        }
    }
}

/* ---------- */
