/// A type that implements this trait can open a communication channel between itself and
/// any type implementing [`Connect`] for it.
///
/// # Examples
///
/// Wiring the printer to a coordinator, so that consumption events end up on stdout:
///
/// ```no_run
/// # use conveyor::*;
/// let config = Config::new(1, 1, 5, 3).unwrap();
/// let mut printer = PrinterContext::new();
/// let mut coordinator = Coordinator::new(config);
///
/// printer.register(&mut coordinator);
///
/// let mut runtime = Runtime::new();
/// runtime.launch_from_context(printer).unwrap();
/// coordinator.run().unwrap();
/// runtime.wait().unwrap();
/// ```
pub trait Register {
    /// The type used to communicate with some [`Connect`].
    type Endpoint;

    /// Connects the [`Register`] to the `other` entity with must implement [`Connect`] of `self`.
    ///
    /// This function should pass a `Endpoint` to `other` by calling the [`Connect::on_connection`] function.
    fn register(&mut self, other: &mut impl Connect<Self>);
}

/* ---------- */

/// A type implementing this trait can be connected to some [`Register`].
pub trait Connect<S: Register + ?Sized> {
    /// Sets the endpoint of the communication channel between `self` and `S`.
    fn on_connection(&mut self, endpoint: S::Endpoint);
}

/* ---------- */
