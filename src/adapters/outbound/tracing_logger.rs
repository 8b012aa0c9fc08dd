use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;

/// Forwards port messages as `tracing` events under the `smoothing` target.
struct TracingBridge;

impl DomainLogger for TracingBridge {
    fn info(&self, msg: &str) { tracing::info!(target: "smoothing", "{}", msg); }
    fn warn(&self, msg: &str) { tracing::warn!(target: "smoothing", "{}", msg); }
    fn error(&self, msg: &str) { tracing::error!(target: "smoothing", "{}", msg); }
}

/// Drops every message; for library callers that bring no logger.
struct Discard;

impl DomainLogger for Discard {
    fn info(&self, _: &str) {}
    fn warn(&self, _: &str) {}
    fn error(&self, _: &str) {}
}

/// Install the global fmt subscriber, filtered by `RUST_LOG` or `default_filter`.
/// Unlike `SubscriberBuilder::init` this does not claim the `log` facade, which
/// stays available for the `fast_log` file backend.
pub fn init_tracing_subscriber(default_filter: &str) -> Result<(), SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
}

/// Logger backed by whatever `tracing` subscriber the binary installed.
pub fn init_tracing_logger() -> DynLogger {
    Arc::new(TracingBridge)
}

pub fn init_noop_logger() -> DynLogger {
    Arc::new(Discard)
}
