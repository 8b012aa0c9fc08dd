use gryphon_smoothing::adapters::inbound::FilesystemScenarioSource;
use gryphon_smoothing::adapters::outbound::{init_application_logger, init_tracing_subscriber, GeoJsonFileSink};
use gryphon_smoothing::application::SmoothingService;
use gryphon_smoothing::domains::path_smoothing::{Scenario, ScenarioSource};
use gryphon_smoothing::Config;
use std::error::Error;
use std::sync::Arc;
use tracing::{error, info};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing; the `log` facade is left to the optional file logger
    init_tracing_subscriber("info")?;

    info!("Starting gryphon-smoothing");

    // Missing file is fine: defaults plus environment overrides
    let config = Config::load(CONFIG_PATH)?;
    info!(
        "safe_dist={} strength={} smoothing_factor={} sample_count={}",
        config.smoothing.safe_dist,
        config.smoothing.strength,
        config.smoothing.smoothing_factor,
        config.smoothing.sample_count
    );

    let logger = init_application_logger(&config.logging);
    let sink = Arc::new(GeoJsonFileSink::new(
        config.output.directory.clone(),
        config.output.circle_segments,
        config.smoothing.safe_dist,
    ));
    let service = SmoothingService::new(config.smoothing, logger, sink.clone())?;

    let mut scenarios = config.scenarios.inline.clone();
    if !config.scenarios.names.is_empty() {
        let source = FilesystemScenarioSource::new(config.scenarios.data_dir.clone());
        for name in &config.scenarios.names {
            match source.load_scenario(name) {
                Ok(s) => scenarios.push(s),
                Err(e) => error!("Failed to load scenario {}: {}", name, e),
            }
        }
    }
    if scenarios.is_empty() {
        info!("No scenarios configured, using the built-in one");
        scenarios.push(Scenario::default());
    }

    let names: Vec<String> = scenarios.iter().map(|s| s.name.clone()).collect();
    let results = service.smooth_batch(scenarios).await;

    let mut failures = 0;
    for (name, result) in names.iter().zip(results) {
        match result {
            Ok(report) => info!(
                "{} -> {} (spline {:.3} m, min clearance {:?})",
                name,
                sink.path_for(name).display(),
                report.spline_length,
                report.spline_clearance.min_clearance
            ),
            Err(e) => {
                failures += 1;
                error!("{} failed: {}", name, e);
            }
        }
    }

    info!("Done: {} scenario(s), {} failed", names.len(), failures);
    Ok(())
}
