use crate::settings::Settings;
use crate::utils::Shutdown;
use crate::Error;

/* ---------- */

/// A worker represents a thread that runs a loop until its work is done or its runtime is stopped.
///
/// Workers are defined by one main method, [`Worker::run`], which runs the actual loop. This method
/// has a default implementation that first calls the [`Worker::on_start`] method once at the beginning, then calls
/// [`Worker::on_update`] in the loop until it returns [`ControlFlow::Break`], an error, or the runtime is stopped.
///
/// Default implementations are provided:
/// * [`Worker::on_start`] does nothing and returns immediately.
/// * [`Worker::on_update`] does nothing and returns [`ControlFlow::Break`] immediately.
///
/// # Examples
///
/// A worker that counts to 10 and stops:
///
/// ```
/// # use conveyor::*;
/// #[derive(Debug, Default)]
/// struct Counter {
///     count: usize
/// }
///
/// impl Worker for Counter {
///     fn on_update(&mut self) -> Result<ControlFlow, Error> {
///         self.count += 1;
///
///         if self.count == 10 {
///             return Ok(ControlFlow::Break);
///         }
///
///         Ok(ControlFlow::Continue)
///     }
/// }
///
/// let mut runtime = Runtime::new();
/// runtime.launch(Counter::default()).unwrap();
/// runtime.wait().unwrap();
/// ```
pub trait Worker: Send {
    /// Convenient method to set stuff up before entering the worker loop.
    ///
    /// By default, this does nothing.
    #[inline]
    fn on_start(&mut self) {}

    /// Does one iteration of the worker loop.
    ///
    /// By default, this method just returns [`ControlFlow::Break`].
    #[inline]
    fn on_update(&mut self) -> Result<ControlFlow, Error> {
        Ok(ControlFlow::Break)
    }

    /// Main worker loop, run in its own thread by the runtime.
    ///
    /// By default, this first calls [`Worker::on_start`] then [`Worker::on_update`] in a loop
    /// that spins until [`shutdown.is_running()`] returns `false`.
    ///
    /// # Errors
    ///
    /// The first error returned by [`Worker::on_update`] ends the loop and is handed
    /// to the runtime, see [`Runtime::wait`].
    ///
    /// [`shutdown.is_running()`]: crate::Shutdown::is_running
    /// [`Runtime::wait`]: crate::Runtime::wait
    #[inline]
    fn run(&mut self, shutdown: Shutdown) -> Result<(), Error> {
        self.on_start();

        while shutdown.is_running() {
            if let ControlFlow::Break = self.on_update()? {
                break;
            }
        }

        Ok(())
    }
}

/* ---------- */

/// Allows building a worker before actually launching it with the [`Runtime::launch_from_context`] function.
///
/// [`Runtime::launch_from_context`]: crate::Runtime::launch_from_context
pub trait Context {
    /// The type of [`Worker`] built from this context.
    type Target: Worker;

    /// Consumes `self` to build the targeted [`Worker`] from the context.
    fn into_worker(self) -> Result<Self::Target, Error>;

    /// Returns some [`Settings`] used to configure the worker's thread.
    ///
    /// By default, it returns default thread settings.
    #[inline]
    fn settings(&self) -> Settings {
        Settings::default()
    }
}

/* ---------- */

/// Defines the control flow of [`Workers`].
///
/// [`Workers`]: crate::Worker
#[derive(Debug, PartialEq)]
pub enum ControlFlow {
    /// Tells the runtime to continue the main worker loop.
    Continue,
    /// Tells the runtime to break the main worker loop.
    Break,
}
