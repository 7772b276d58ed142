use eyre::{Result, WrapErr};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initializes the tracing subscriber. Diagnostics go to stderr, filtered by `RUST_LOG`
/// (warnings and errors by default).
pub fn subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init();
}

/// Builds the single-threaded runtime every debugger operation runs on.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build tokio runtime")
}
