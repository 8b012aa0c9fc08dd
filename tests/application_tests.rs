use gryphon_smoothing::adapters::outbound::{init_noop_logger, GeoJsonFileSink, MemorySink};
use gryphon_smoothing::application::SmoothingService;
use gryphon_smoothing::common::{ApplicationError, ConfigError, DomainError, FitError};
use gryphon_smoothing::domains::path_smoothing::*;
use std::sync::Arc;
use tempfile::tempdir;

fn service_with(sink: Arc<MemorySink>) -> SmoothingService {
    SmoothingService::new(SmoothingConfig::default(), init_noop_logger(), sink).unwrap()
}

fn coincident_scenario() -> Scenario {
    let mut scenario = Scenario::default();
    scenario.name = "stutter".to_string();
    let repeat = scenario.raw_path[5];
    scenario.raw_path.insert(5, repeat);
    scenario
}

#[tokio::test]
async fn test_smooth_scenario_publishes_report() {
    let sink = Arc::new(MemorySink::new());
    let service = service_with(sink.clone());

    let report = service.smooth_scenario(&Scenario::default()).await.unwrap();
    assert_eq!(report.scenario, "default");
    assert_eq!(report.waypoints, 13);
    assert!(report.moved_waypoints >= 1);
    assert_eq!(report.spline_degree, 3);
    assert!(report.spline_residual <= 0.3 * 1.001);

    let runs = sink.take();
    assert_eq!(runs.len(), 1);
    let (output, published) = &runs[0];
    assert_eq!(published.run_id, report.run_id);
    assert_eq!(output.spline_curve.len(), 200);
    assert_eq!(output.blend_curve.len(), 200);
    assert_eq!(output.safe_path.len(), output.raw_path.len());
}

#[tokio::test]
async fn test_smooth_batch_keeps_order_and_isolates_failures() {
    let sink = Arc::new(MemorySink::new());
    let service = service_with(sink.clone());

    let mut second = Scenario::default();
    second.name = "second".to_string();
    let results = service
        .smooth_batch(vec![Scenario::default(), coincident_scenario(), second])
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().scenario, "default");
    match &results[1] {
        Err(ApplicationError::Domain(DomainError::Fit(FitError::CoincidentWaypoints { index }))) => {
            assert_eq!(*index, 5)
        }
        other => panic!("Expected CoincidentWaypoints, got {:?}", other),
    }
    assert_eq!(results[2].as_ref().unwrap().scenario, "second");
    assert_eq!(sink.len(), 2);
}

#[tokio::test]
async fn test_smooth_batch_rejects_repeated_names() {
    let dir = tempdir().unwrap();
    let sink = Arc::new(GeoJsonFileSink::new(dir.path(), 16, 1.2));
    let service = SmoothingService::new(SmoothingConfig::default(), init_noop_logger(), sink.clone()).unwrap();

    let mut shifted = Scenario::default();
    shifted.raw_path[0] = Point2D::new(0.2, 0.7);
    let results = service.smooth_batch(vec![Scenario::default(), shifted]).await;

    assert!(results[0].is_ok());
    match &results[1] {
        Err(ApplicationError::Domain(DomainError::Config(ConfigError::DuplicateName(name)))) => {
            assert_eq!(name, "default")
        }
        other => panic!("Expected DuplicateName, got {:?}", other),
    }
    // the first run's file is the one on disk
    let text = std::fs::read_to_string(sink.path_for("default")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["report"]["run_id"], results[0].as_ref().unwrap().run_id.to_string());
}

#[tokio::test]
async fn test_run_does_not_publish() {
    let sink = Arc::new(MemorySink::new());
    let service = service_with(sink.clone());
    let (output, report) = service.run(&Scenario::default()).unwrap();
    assert_eq!(output.scenario, report.scenario);
    assert!(sink.is_empty());
}

#[test]
fn test_invalid_config_rejected_up_front() {
    let config = SmoothingConfig { strength: 0.0, ..SmoothingConfig::default() };
    let result = SmoothingService::new(config, init_noop_logger(), Arc::new(MemorySink::new()));
    assert!(result.is_err());
}

#[tokio::test]
async fn test_service_writes_geojson_files() {
    let dir = tempdir().unwrap();
    let sink = Arc::new(GeoJsonFileSink::new(dir.path(), 16, 1.2));
    let service = SmoothingService::new(SmoothingConfig::default(), init_noop_logger(), sink.clone()).unwrap();

    service.smooth_scenario(&Scenario::default()).await.unwrap();
    assert!(sink.path_for("default").exists());
}

#[tokio::test]
async fn test_sink_failure_maps_to_sink_error() {
    let dir = tempdir().unwrap();
    // a regular file where the output directory should be
    let blocker = dir.path().join("blocked");
    std::fs::write(&blocker, "x").unwrap();
    let sink = Arc::new(GeoJsonFileSink::new(&blocker, 16, 1.2));
    let service = SmoothingService::new(SmoothingConfig::default(), init_noop_logger(), sink).unwrap();

    match service.smooth_scenario(&Scenario::default()).await {
        Err(ApplicationError::Sink(_)) => {}
        other => panic!("Expected Sink error, got {:?}", other),
    }
}
