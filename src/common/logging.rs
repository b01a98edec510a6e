//! Logging and tracing configuration
//!
//! Diagnostics always go to stderr. Stdout is reserved for the case
//! transcript so it can be piped or diffed.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "driver=info,bucketdb_driver=info,warn";

/// Initialize tracing for the driver (stderr logging)
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Per-case state transitions are emitted at DEBUG.
pub fn init_cli() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Initialize tracing for the stub server
///
/// The stub logs every connection, so INFO is on for everything it owns.
pub fn init_stub() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stub_server=info,driver=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
