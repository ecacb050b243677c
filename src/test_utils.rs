use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, unbounded};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::report::Event;
use crate::{
    Config, Context, ControlFlow, Coordinator, Error, ItemId, Latency, Settings, Summary, Worker,
};

/* ---------- */

pub(crate) struct TestWorker;

impl Worker for TestWorker {
    fn on_update(&mut self) -> Result<ControlFlow, Error> {
        std::thread::sleep(Duration::from_millis(1));
        Ok(ControlFlow::Continue)
    }
}

/* ---------- */

pub(crate) struct TestTimedWorker {
    timeout: Duration,
    now: Instant,
}

impl TestTimedWorker {
    pub(crate) fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            now: Instant::now(),
        }
    }
}

impl Worker for TestTimedWorker {
    fn on_start(&mut self) {
        self.now = Instant::now();
    }

    fn on_update(&mut self) -> Result<ControlFlow, Error> {
        if self.now.elapsed() >= self.timeout {
            return Ok(ControlFlow::Break);
        }

        Ok(ControlFlow::Continue)
    }
}

/* ---------- */

pub(crate) struct FailingWorker;

impl Worker for FailingWorker {
    fn on_update(&mut self) -> Result<ControlFlow, Error> {
        Err(Error::Closed)
    }
}

pub(crate) struct PanickingWorker;

impl Worker for PanickingWorker {
    fn on_update(&mut self) -> Result<ControlFlow, Error> {
        panic!("panicking!")
    }
}

/// Builds a [`PanickingWorker`] running in a thread with the given name.
pub(crate) struct PanickingWorkerContext(pub(crate) &'static str);

impl Context for PanickingWorkerContext {
    type Target = PanickingWorker;

    fn into_worker(self) -> Result<Self::Target, Error> {
        Ok(PanickingWorker)
    }

    fn settings(&self) -> Settings {
        Settings::new().name(self.0)
    }
}

/* ---------- */

pub(crate) struct BadWorker;

impl Worker for BadWorker {
    fn on_update(&mut self) -> Result<ControlFlow, Error> {
        std::thread::sleep(Duration::from_millis(500));
        Ok(ControlFlow::Break)
    }
}

pub(crate) struct BadWorkerContext;

impl Context for BadWorkerContext {
    type Target = BadWorker;

    fn into_worker(self) -> Result<Self::Target, Error> {
        Err(Error::InvalidConfig("bad context".to_owned()))
    }
}

/* ---------- */

/// An in-memory writer whose content outlives the printer owning it.
#[derive(Debug, Default, Clone)]
pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub(crate) fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().expect("buffer mutex poisoned");
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .expect("buffer mutex poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/* ---------- */

pub(crate) fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

/// A configuration without any simulated latency.
pub(crate) fn quick_config(
    producers: usize,
    consumers: usize,
    capacity: usize,
    items: usize,
) -> Config {
    Config::new(producers, consumers, capacity, items)
        .expect("valid test configuration")
        .with_setup(Latency::ZERO)
        .with_work(Latency::ZERO)
}

/// Runs a whole production and returns every event it reported, in order.
pub(crate) fn run_collecting(config: Config) -> (Summary, Vec<Event>) {
    let (events, reports) = unbounded();
    let mut coordinator = Coordinator::new(config);
    coordinator.events = Some(events);

    let summary = coordinator.run().expect("the run shouldn't fail");
    (summary, reports.try_iter().collect())
}

/// Returns the identifiers of the consumed items, in report order.
pub(crate) fn consumed_items(events: &[Event]) -> Vec<ItemId> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Consuming { item, .. } => Some(*item),
            Event::DoneProducing => None,
        })
        .collect()
}

/// Runs `f` in another thread, failing the test if it doesn't return within `timeout`.
pub(crate) fn run_within<T, F>(timeout: Duration, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (done_tx, done_rx) = bounded(1);

    std::thread::spawn(move || {
        let _ = done_tx.send(f());
    });

    done_rx
        .recv_timeout(timeout)
        .expect("didn't complete in time, something is deadlocked")
}
