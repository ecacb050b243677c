//! Progress reporting: consumption events and the worker printing them.

use std::fmt::{Display, Formatter};
use std::io::{Stdout, Write};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::item::{ConsumerId, ItemId};
use crate::service::{Connect, Register};
use crate::settings::Settings;
use crate::utils::Shutdown;
use crate::worker::{Context, Worker};
use crate::Error;

/* ---------- */

/// Something worth telling the user about during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A consumer started working on an item.
    Consuming {
        /// The consumer that dequeued the item.
        consumer: ConsumerId,
        /// The dequeued item.
        item: ItemId,
    },
    /// Every producer finished its range. Consumers may still be draining the queue.
    DoneProducing,
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Consuming { consumer, item } => {
                write!(f, "{consumer:>3}: Consuming     {item:>4}")
            }
            Self::DoneProducing => write!(f, "DONE PRODUCING!!"),
        }
    }
}

/* ---------- */

/// Builds a [`Printer`] and hands out the endpoints to send it [`Events`].
///
/// [`Events`]: Event
pub struct PrinterContext<W = Stdout> {
    out: W,
    sender: Sender<Event>,
    recver: Receiver<Event>,
}

impl PrinterContext {
    /// Returns a context printing to the standard output.
    #[inline]
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl Default for PrinterContext {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> PrinterContext<W> {
    /// Returns a context printing to `out`.
    #[inline]
    pub fn with_writer(out: W) -> Self {
        let (sender, recver) = unbounded();

        Self {
            out,
            sender,
            recver,
        }
    }
}

impl<W: Write + Send> Context for PrinterContext<W> {
    type Target = Printer<W>;

    fn into_worker(self) -> Result<Self::Target, Error> {
        // Our own sender is dropped here, so the printer stops once every registered endpoint is gone.
        Ok(Printer {
            out: self.out,
            events: self.recver,
        })
    }

    fn settings(&self) -> Settings {
        Settings::new().name("printer")
    }
}

impl<W> Register for PrinterContext<W> {
    type Endpoint = Sender<Event>;

    #[inline]
    fn register(&mut self, other: &mut impl Connect<Self>) {
        other.on_connection(self.sender.clone())
    }
}

/* ---------- */

/// A worker writing one line per received [`Event`].
///
/// The printer ignores the runtime's shutdown: it keeps writing until every sender is dropped,
/// so no event is lost.
pub struct Printer<W> {
    out: W,
    events: Receiver<Event>,
}

impl<W: Write + Send> Worker for Printer<W> {
    fn run(&mut self, _: Shutdown) -> Result<(), Error> {
        for event in self.events.iter() {
            writeln!(self.out, "{event}").map_err(Error::Report)?;
            self.out.flush().map_err(Error::Report)?;
        }

        Ok(())
    }
}

/* ---------- */
