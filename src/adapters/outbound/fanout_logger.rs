use crate::config::LoggingConfig;
use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Forwards every message to each of its targets in order.
pub struct FanoutLogger {
    targets: Vec<DynLogger>,
}

impl FanoutLogger {
    pub fn new(targets: Vec<DynLogger>) -> Self {
        Self { targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl DomainLogger for FanoutLogger {
    fn info(&self, msg: &str) {
        self.targets.iter().for_each(|t| t.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.targets.iter().for_each(|t| t.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.targets.iter().for_each(|t| t.error(msg));
    }
}

/// Tracing output always; the `fast_log` file target as well when configured and
/// it can be installed.
pub fn init_application_logger(config: &LoggingConfig) -> DynLogger {
    let tracing_logger = crate::adapters::outbound::init_tracing_logger();
    if config.file.is_none() {
        return tracing_logger;
    }
    match crate::adapters::outbound::file_logger::init_file_logger(config) {
        Ok(file_logger) => Arc::new(FanoutLogger::new(vec![tracing_logger, file_logger])) as DynLogger,
        Err(e) => {
            tracing_logger.warn(&format!("file logging disabled: {}", e));
            tracing_logger
        }
    }
}
