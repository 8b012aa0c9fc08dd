use gryphon_smoothing::config::ENV_PREFIX;
use gryphon_smoothing::Config;
use std::fs;
use tempfile::tempdir;

// Kept in its own test binary: it mutates process environment.
#[test]
fn test_environment_overrides_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[smoothing]\nsample_count = 50\nstrength = 0.5\n\n[output]\ncircle_segments = 12\n",
    )
    .unwrap();

    std::env::set_var(format!("{ENV_PREFIX}__SMOOTHING__SAMPLE_COUNT"), "400");
    std::env::set_var(format!("{ENV_PREFIX}__SMOOTHING__SAFE_DIST"), "0.9");
    let config = Config::load(&path).unwrap();

    assert_eq!(config.smoothing.sample_count, 400);
    assert_eq!(config.smoothing.safe_dist, 0.9);
    assert_eq!(config.smoothing.strength, 0.5);
    assert_eq!(config.output.circle_segments, 12);
    assert_eq!(config.smoothing.smoothing_factor, 0.3);

    // overrides still go through validation
    std::env::set_var(format!("{ENV_PREFIX}__SMOOTHING__SAMPLE_COUNT"), "1");
    assert!(Config::load(&path).is_err());

    std::env::remove_var(format!("{ENV_PREFIX}__SMOOTHING__SAMPLE_COUNT"));
    std::env::remove_var(format!("{ENV_PREFIX}__SMOOTHING__SAFE_DIST"));
}
