//! Process resource reporting and experiment datum publishing

pub mod collector;
pub mod config;
pub mod cputime;
pub mod error;
pub mod http;
pub mod publisher;
pub mod record;
pub mod sample;

pub use error::{ParseError, Result, TrackerError};

/// Log to stderr; stdout carries the tools' output. `RUST_LOG` overrides the
/// default `warn` level.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
