use crate::config::LoggingConfig;
use crate::domains::logger::{DomainLogger, FileLogger};
use std::sync::Arc;

/// Install the `fast_log` backend for `config.file` and return a port instance that
/// writes through it. Errors when no file is configured or the backend is already set.
pub fn init_file_logger(config: &LoggingConfig) -> Result<Arc<dyn DomainLogger>, String> {
    let path = config
        .file
        .as_deref()
        .ok_or_else(|| "no log file configured".to_string())?;
    FileLogger::init(path, &config.level).map_err(|e| format!("Failed to initialize fast_log: {}", e))?;
    Ok(Arc::new(FileLogger::default()))
}
