/// Errors returned by the queue, the workers and the coordinator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A worker thread could not be spawned.
    #[error("failed to start a worker thread: {0}")]
    ThreadStart(#[source] std::io::Error),

    /// The termination signal handlers could not be installed.
    #[error("failed to install signal handlers: {0}")]
    Signal(#[source] std::io::Error),

    /// A report line could not be written.
    #[error("failed to write a report: {0}")]
    Report(#[source] std::io::Error),

    /// A worker thread panicked.
    #[error("worker `{0}` panicked")]
    WorkerPanicked(String),

    /// A lock was poisoned by a panic while it was held.
    #[error("{0} lock poisoned")]
    Poisoned(&'static str),

    /// The queue was closed.
    #[error("queue closed")]
    Closed,

    /// The queue found itself in a state it can never legally reach.
    #[error("queue invariant violated: {0}")]
    BrokenInvariant(&'static str),
}
