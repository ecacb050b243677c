use std::thread::JoinHandle;

use tracing::{debug, error};

use crate::settings::Settings;
use crate::utils::Shutdown;
use crate::worker::{Context, Worker};
use crate::Error;

/* ---------- */

/// A runtime that manages [`Workers`] threads.
///
/// When dropped, a runtime stops and waits for all the workers to complete.
/// A nested runtime only waits: its shutdown belongs to whoever created it.
///
/// [`Workers`]: crate::Worker
pub struct Runtime {
    shutdown: Shutdown,
    threads: Vec<WorkerHandle>,
    nested: bool,
}

struct WorkerHandle {
    name: String,
    thread: JoinHandle<Result<(), Error>>,
}

impl Runtime {
    /// Returns a new runtime.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new runtime whose stopping condition is controlled by `shutdown`.
    ///
    /// Several nested runtimes sharing the same shutdown can be waited on separately,
    /// which lets one pool of workers be joined before another.
    #[inline]
    pub fn nested(shutdown: Shutdown) -> Self {
        Self::from(shutdown)
    }

    /// Asks every worker of the runtime to leave its loop.
    #[inline]
    pub fn stop(&self) {
        self.shutdown.stop()
    }

    /// Runs a [`Worker`] in a new thread.
    ///
    /// # Errors
    ///
    /// On error, the corresponding error is returned and the runtime is stopped.
    #[inline]
    pub fn launch<W: Worker + 'static>(&mut self, worker: W) -> Result<(), Error> {
        self.inner_spawn_thread(worker, Settings::default())
    }

    /// Runs a [`Worker`] built from a [`Context`] in a new thread.
    ///
    /// The new thread will be configured using the values returned by the [`Context::settings`] function.
    ///
    /// # Errors
    ///
    /// On error, the corresponding error is returned and the runtime is stopped.
    #[inline]
    pub fn launch_from_context<W, C>(&mut self, ctx: C) -> Result<(), Error>
    where
        W: Worker + 'static,
        C: Context<Target = W>,
    {
        let settings = ctx.settings();
        let worker = ctx.into_worker().inspect_err(|_| self.shutdown.stop())?;

        self.inner_spawn_thread(worker, settings)
    }

    /// Blocks the calling thread until all the runtime's workers stop.
    ///
    /// Every worker is joined, even after a failure.
    ///
    /// # Errors
    ///
    /// Returns the first error returned by a worker, or [`Error::WorkerPanicked`]
    /// if a worker panicked.
    pub fn wait(&mut self) -> Result<(), Error> {
        let mut outcome = Ok(());

        for WorkerHandle { name, thread } in self.threads.drain(..) {
            let res = match thread.join() {
                Ok(res) => res,
                Err(_) => Err(Error::WorkerPanicked(name.clone())),
            };

            match res {
                Ok(()) => debug!(worker = %name, "worker joined"),
                Err(err) => {
                    error!(worker = %name, "worker failed: {err}");
                    if outcome.is_ok() {
                        outcome = Err(err);
                    }
                }
            }
        }

        outcome
    }

    /// Returns the number of workers that haven't been joined yet.
    #[inline]
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// Returns whether the runtime has no worker left to join.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    fn inner_spawn_thread<W>(&mut self, mut worker: W, settings: Settings) -> Result<(), Error>
    where
        W: Worker + 'static,
    {
        let name = settings
            .thread_name()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("worker-{}", self.threads.len()));
        let shutdown = self.shutdown.clone();

        let thread = settings
            .into_inner()
            .spawn(move || worker.run(shutdown))
            .map_err(Error::ThreadStart)
            .inspect_err(|_| self.shutdown.stop())?;

        self.threads.push(WorkerHandle { name, thread });
        Ok(())
    }
}

impl Default for Runtime {
    #[inline]
    fn default() -> Self {
        Self {
            shutdown: Shutdown::new(),
            threads: Vec::new(),
            nested: false,
        }
    }
}

impl From<Shutdown> for Runtime {
    #[inline]
    fn from(shutdown: Shutdown) -> Self {
        Self {
            shutdown,
            threads: Vec::new(),
            nested: true,
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if !self.nested {
            self.shutdown.stop()
        }

        let _ = self.wait();
    }
}

/* ---------- */

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::test_utils::*;

    #[test]
    fn start_stop() {
        let mut rt = Runtime::new();

        rt.launch(TestWorker)
            .expect("failed to launch the test worker");
        std::thread::sleep(Duration::from_millis(50));
    }

    #[test]
    fn wait() {
        let mut rt = Runtime::new();
        let now = Instant::now();
        let timeout = Duration::from_millis(200);

        rt.launch(TestTimedWorker::new(timeout))
            .expect("failed to launch the test worker");

        rt.wait().expect("the test worker shouldn't fail");
        assert!(now.elapsed() >= timeout);
        assert!(rt.is_empty());
    }

    #[test]
    fn stop_on_err() {
        let mut rt = Runtime::new();
        let now = Instant::now();

        rt.launch_from_context(BadWorkerContext)
            .expect_err("launching this worker should fail");
        assert!(!rt.shutdown.is_running());

        rt.wait().expect("nothing was launched");
        assert!(now.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn worker_error_is_returned() {
        let mut rt = Runtime::new();

        rt.launch(TestTimedWorker::new(Duration::from_millis(10)))
            .expect("failed to launch the test worker");
        rt.launch(FailingWorker)
            .expect("failed to launch the failing worker");

        assert!(matches!(rt.wait(), Err(Error::Closed)));
        assert!(rt.is_empty());
    }

    #[test]
    fn panics_are_reported_with_the_worker_name() {
        let mut rt = Runtime::new();

        rt.launch_from_context(PanickingWorkerContext("doomed"))
            .expect("failed to launch the panicking worker");

        match rt.wait() {
            Err(Error::WorkerPanicked(name)) => assert_eq!(name, "doomed"),
            res => panic!("expected a panic report, got {res:?}"),
        }
    }

    #[test]
    fn nested_runtimes_share_their_shutdown() {
        let shutdown = Shutdown::new();
        let mut first = Runtime::nested(shutdown.clone());
        let mut second = Runtime::nested(shutdown.clone());

        first.launch(TestWorker).expect("failed to launch");
        second.launch(TestWorker).expect("failed to launch");
        assert_eq!(first.len() + second.len(), 2);

        shutdown.stop();
        first.wait().expect("the test worker shouldn't fail");
        second.wait().expect("the test worker shouldn't fail");
    }
}
