use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use conveyor::{Config, Coordinator, PrinterContext, Register, Runtime};

/* ---------- */

const INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    // Usage errors are printed by clap, which exits with status 2 before anything starts.
    let config = Config::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .init();

    let mut printer = PrinterContext::new();
    let mut coordinator = Coordinator::new(config);

    printer.register(&mut coordinator);
    coordinator.enable_graceful_shutdown();

    let mut runtime = Runtime::new();
    if let Err(err) = runtime.launch_from_context(printer) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    // The coordinator owns the last sender: the printer stops once the run is over.
    let outcome = coordinator.run();
    let printed = runtime.wait();

    match (outcome, printed) {
        (Ok(summary), Ok(())) if summary.interrupted => ExitCode::from(INTERRUPTED),
        (Ok(_), Ok(())) => ExitCode::SUCCESS,
        (Err(err), _) | (_, Err(err)) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
