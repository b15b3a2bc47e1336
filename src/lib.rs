pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod moderation;
pub mod providers;
pub mod server;
pub mod signals;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// Note: This function can only be called once per process. Logs go to
/// stderr so the suggest command can emit clean JSON on stdout.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
