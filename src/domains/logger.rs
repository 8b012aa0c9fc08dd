use chrono::{SecondsFormat, Utc};
use log::{Level, LevelFilter};
use std::sync::Arc;

/// Logging port the smoothing service reports through.
/// Calls never fail; adapters deal with their own I/O problems.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;

/// `log`-facade adapter; records land in whatever `fast_log` appenders
/// [`FileLogger::init`] installed, tagged with `component`.
pub struct FileLogger {
    component: &'static str,
}

impl FileLogger {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    /// Install `fast_log` with a console and a file appender. Only the first
    /// call in a process can succeed.
    pub fn init(path: &str, level: &str) -> Result<(), Box<dyn std::error::Error>> {
        let config = fast_log::config::Config::new()
            .console()
            .file(path)
            .level(parse_level(level));
        fast_log::init(config)?;
        Ok(())
    }

    fn emit(&self, level: Level, msg: &str) {
        log::log!(
            level,
            "{} [{}] {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            self.component,
            msg
        );
    }
}

impl Default for FileLogger {
    fn default() -> Self {
        Self::new("smoothing")
    }
}

impl DomainLogger for FileLogger {
    fn info(&self, msg: &str) {
        self.emit(Level::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.emit(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.emit(Level::Error, msg);
    }
}

/// Unknown names fall back to `Info`.
pub fn parse_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_accepts_names_case_insensitively() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
    }

    #[test]
    fn file_logger_without_backend_is_silent() {
        let logger = FileLogger::default();
        logger.info("no backend installed");
        logger.error("still fine");
    }
}
