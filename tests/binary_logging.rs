use gryphon_smoothing::adapters::outbound::{init_application_logger, init_tracing_subscriber};
use gryphon_smoothing::config::LoggingConfig;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

// Same order as the binary: tracing subscriber first, then the application logger.
#[test]
fn test_log_file_receives_messages_after_tracing_init() {
    init_tracing_subscriber("info").unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("smoothing.log");
    let logging = LoggingConfig {
        level: "info".to_string(),
        file: Some(path.to_str().unwrap().to_string()),
    };
    let logger = init_application_logger(&logging);
    logger.info("scenario 'default' reached the log file");
    log::logger().flush();

    let mut contents = String::new();
    for _ in 0..100 {
        contents = fs::read_to_string(&path).unwrap_or_default();
        if contents.contains("scenario 'default' reached the log file") {
            break;
        }
        std::thread::sleep(Duration::from_millis(30));
    }
    assert!(contents.contains("scenario 'default' reached the log file"), "log file: {contents:?}");
}
