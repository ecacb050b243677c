use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use signal_hook::consts::TERM_SIGNALS;
use signal_hook::flag;
use signal_hook::iterator::{Handle, Signals};
use signal_hook::SigId;
use tracing::warn;

use crate::Error;

/* ---------- */

/// Describes the running status of a [`Runtime`].
///
/// Every worker launched in a runtime holds a clone of its shutdown and leaves its
/// loop once the shutdown is stopped.
///
/// [`Runtime`]: crate::Runtime
#[derive(Debug, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
    /// Returns a new running shutdown.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks every worker sharing this shutdown to stop.
    #[inline]
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst)
    }

    /// Returns whether or not the [`Runtime`] is running.
    ///
    /// [`Runtime`]: crate::Runtime
    #[inline]
    pub fn is_running(&self) -> bool {
        !self.0.load(Ordering::SeqCst)
    }
}

impl AsRef<Arc<AtomicBool>> for Shutdown {
    #[inline]
    fn as_ref(&self) -> &Arc<AtomicBool> {
        &self.0
    }
}

impl Clone for Shutdown {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/* ---------- */

/// Watches the termination signals until dropped.
///
/// On the first signal, the shutdown is stopped and `on_signal` is called. If for some reason
/// the process is still alive when a second signal comes in, it is terminated ungracefully.
pub(crate) struct SignalGuard {
    handle: Handle,
    watcher: Option<JoinHandle<()>>,
    registered: Vec<SigId>,
}

/// Enables a graceful shutdown on `SIGINT`, `SIGTERM` and `SIGQUIT`.
pub(crate) fn enable_graceful_shutdown<F>(
    shutdown: &Shutdown,
    on_signal: F,
) -> Result<SignalGuard, Error>
where
    F: FnOnce() + Send + 'static,
{
    let mut registered = Vec::with_capacity(TERM_SIGNALS.len());
    for sig in TERM_SIGNALS {
        let id = flag::register_conditional_shutdown(*sig, 1, shutdown.as_ref().clone())
            .map_err(Error::Signal)?;
        registered.push(id);
    }

    let mut signals = Signals::new(TERM_SIGNALS).map_err(Error::Signal)?;
    let handle = signals.handle();
    let shutdown = shutdown.clone();

    let watcher = std::thread::Builder::new()
        .name("signals".to_owned())
        .spawn(move || {
            if let Some(sig) = signals.forever().next() {
                warn!(signal = sig, "termination signal received, shutting down");
                shutdown.stop();
                on_signal();
            }
        })
        .map_err(Error::ThreadStart)?;

    Ok(SignalGuard {
        handle,
        watcher: Some(watcher),
        registered,
    })
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(watcher) = self.watcher.take() {
            let _ = watcher.join();
        }

        for id in self.registered.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

/* ---------- */
