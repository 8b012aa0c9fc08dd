use gryphon_smoothing::adapters::inbound::scenario_files::{scenario_from_geojson, FilesystemScenarioSource};
use gryphon_smoothing::adapters::outbound::{GeoJsonFileSink, MemorySink};
use gryphon_smoothing::domains::path_smoothing::*;
use std::fs;
use tempfile::tempdir;

fn default_run() -> (SmoothingOutput, SmoothingReport) {
    let config = SmoothingConfig::default();
    let output = run_pipeline(&Scenario::default(), &config).unwrap();
    let report = SmoothingReport::from_output(&output, config.safe_dist);
    (output, report)
}

#[test]
fn test_filesystem_source_save_and_load_toml() {
    let dir = tempdir().unwrap();
    let source = FilesystemScenarioSource::new(Some(dir.path().to_path_buf()));

    let scenario = Scenario::default();
    let path = source.save_scenario(&scenario).unwrap();
    assert!(path.ends_with("scenarios/default.toml"));

    let loaded = source.load_scenario("default").unwrap();
    assert_eq!(loaded, scenario);
    assert_eq!(source.list_scenarios().unwrap(), vec!["default.toml".to_string()]);
}

#[test]
fn test_filesystem_source_reads_handwritten_geojson() {
    let dir = tempdir().unwrap();
    let source = FilesystemScenarioSource::new(Some(dir.path().to_path_buf()));
    fs::create_dir_all(source.scenario_dir()).unwrap();
    fs::write(
        source.scenario_dir().join("corridor.geojson"),
        r#"{
    "type": "FeatureCollection",
    "bbox": [0.0, 0.0, 12.0, 4.0],
    "features": [
        { "type": "Feature", "properties": {"radius": 0.5}, "geometry": { "type": "Point", "coordinates": [6.0, 2.5] } },
        { "type": "Feature", "properties": {"kind": "raw"}, "geometry": { "type": "LineString", "coordinates": [[1.0, 2.0], [6.0, 2.0], [11.0, 2.0]] } }
    ]
}"#,
    )
    .unwrap();

    let scenario = source.load_scenario("corridor").unwrap();
    assert_eq!(scenario.name, "corridor");
    assert_eq!(scenario.raw_path.len(), 3);
    assert_eq!(scenario.obstacles().len(), 1);
    assert_eq!(scenario.obstacles()[0].center(), Point2D::new(6.0, 2.5));
    assert_eq!(scenario.workspace.bounds.max_x, 12.0);
}

#[test]
fn test_filesystem_source_missing_scenario() {
    let dir = tempdir().unwrap();
    let source = FilesystemScenarioSource::new(Some(dir.path().to_path_buf()));
    assert!(source.load_scenario("nowhere").is_err());
    assert!(source.list_scenarios().unwrap().is_empty());
}

#[tokio::test]
async fn test_geojson_sink_writes_readable_scene() {
    let dir = tempdir().unwrap();
    let sink = GeoJsonFileSink::new(dir.path().join("out"), 24, 1.2);
    let (output, report) = default_run();

    sink.publish(&output, &report).await.unwrap();

    let text = fs::read_to_string(sink.path_for("default")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    // two circles per obstacle plus four polylines
    assert_eq!(value["features"].as_array().unwrap().len(), 3 * 2 + 4);
    assert_eq!(value["report"]["waypoints"], 13);
    assert_eq!(value["name"], "default");

    let reloaded = scenario_from_geojson("ignored", &text).unwrap();
    let expected = Scenario::default();
    assert_eq!(reloaded.name, "default");
    assert_eq!(reloaded.raw_path.len(), expected.raw_path.len());
    for (a, b) in reloaded.raw_path.iter().zip(&expected.raw_path) {
        assert!(a.distance_to(b) < 1e-12);
    }
    assert_eq!(reloaded.obstacles().len(), 3);
    for (a, b) in reloaded.obstacles().iter().zip(expected.obstacles()) {
        assert!(a.center().distance_to(&b.center()) < 1e-12);
        assert!((a.radius() - b.radius()).abs() < 1e-12);
    }
    assert!((reloaded.workspace.bounds.max_x - 10.0).abs() < 1e-12);
}

#[test]
fn test_geojson_without_linestring_is_rejected() {
    let text = r#"{ "type": "FeatureCollection", "features": [] }"#;
    assert!(scenario_from_geojson("empty", text).is_err());
    assert!(scenario_from_geojson("broken", "not json").is_err());
}

#[tokio::test]
async fn test_memory_sink_collects_runs() {
    let sink = MemorySink::new();
    assert!(sink.is_empty());
    let (output, report) = default_run();
    sink.publish(&output, &report).await.unwrap();
    assert_eq!(sink.len(), 1);
    let runs = sink.take();
    assert_eq!(runs[0].1.run_id, report.run_id);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_geojson_sink_refuses_names_outside_its_directory() {
    let dir = tempdir().unwrap();
    let sink = GeoJsonFileSink::new(dir.path().join("out"), 24, 1.2);
    let (mut output, report) = default_run();
    output.scenario = "../escaped".to_string();

    assert!(sink.publish(&output, &report).await.is_err());
    assert!(!dir.path().join("escaped.geojson").exists());
    assert!(!dir.path().join("out").join("escaped.geojson").exists());
}

#[test]
fn test_scenario_names_from_files_are_validated() {
    let text = r#"{
    "type": "FeatureCollection",
    "name": "../escaped",
    "features": [
        { "type": "Feature", "properties": {"kind": "raw"}, "geometry": { "type": "LineString", "coordinates": [[1.0, 2.0], [6.0, 2.0]] } }
    ]
}"#;
    assert!(scenario_from_geojson("fallback", text).is_err());

    let dir = tempdir().unwrap();
    let source = FilesystemScenarioSource::new(Some(dir.path().to_path_buf()));
    fs::create_dir_all(source.scenario_dir()).unwrap();
    let mut scenario = Scenario::default();
    scenario.name = "a/b".to_string();
    fs::write(source.scenario_dir().join("sneaky.toml"), toml::to_string(&scenario).unwrap()).unwrap();
    assert!(source.load_scenario("sneaky").is_err());
}
