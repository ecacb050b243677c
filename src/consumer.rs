use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{debug, trace};

use crate::item::{ConsumerId, Item};
use crate::queue::BoundedQueue;
use crate::report::Event;
use crate::settings::Settings;
use crate::worker::{Context, ControlFlow, Worker};
use crate::Error;

/* ---------- */

/// Everything a [`Consumer`] needs, gathered by the coordinator before launching it.
pub(crate) struct ConsumerContext {
    pub(crate) id: ConsumerId,
    pub(crate) queue: Arc<BoundedQueue<Item>>,
    pub(crate) events: Option<Sender<Event>>,
}

impl Context for ConsumerContext {
    type Target = Consumer;

    fn into_worker(self) -> Result<Self::Target, Error> {
        Ok(Consumer {
            id: self.id,
            queue: self.queue,
            events: self.events,
            consumed: 0,
        })
    }

    fn settings(&self) -> Settings {
        Settings::new().name(format!("consumer-{}", self.id))
    }
}

/* ---------- */

/// A worker taking items out of the queue one at a time.
///
/// Each dequeued item is reported, then the consumer sleeps for the item's work duration.
/// While the queue is empty, the consumer blocks. It stops once the queue is closed and
/// drained, or when its runtime is stopped.
pub(crate) struct Consumer {
    id: ConsumerId,
    queue: Arc<BoundedQueue<Item>>,
    events: Option<Sender<Event>>,
    consumed: u64,
}

impl Worker for Consumer {
    fn on_start(&mut self) {
        debug!(consumer = self.id, "consumer started");
    }

    fn on_update(&mut self) -> Result<ControlFlow, Error> {
        let item = match self.queue.dequeue() {
            Ok(Some(item)) => item,
            Ok(None) => {
                debug!(consumer = self.id, consumed = self.consumed, "queue drained");
                return Ok(ControlFlow::Break);
            }
            Err(err) => {
                self.queue.close();
                return Err(err);
            }
        };

        if let Some(events) = self.events.as_ref() {
            let event = Event::Consuming {
                consumer: self.id,
                item: item.id,
            };

            if events.send(event).is_err() {
                trace!(consumer = self.id, "nobody listens to the reports anymore");
            }
        }

        self.consumed += 1;
        std::thread::sleep(item.work);

        Ok(ControlFlow::Continue)
    }
}

/* ---------- */
