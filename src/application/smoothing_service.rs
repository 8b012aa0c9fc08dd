use std::collections::HashSet;
use std::sync::Arc;

use crate::common::{ApplicationError, ApplicationResult, ConfigError};
use crate::domains::logger::DynLogger;
use crate::domains::path_smoothing::{
    run_pipeline, ClearanceReport, Scenario, SmoothingConfig, SmoothingOutput, SmoothingReport, TrajectorySink,
};

/// Runs the refinement pipeline and hands results to the configured sink.
pub struct SmoothingService {
    config: SmoothingConfig,
    logger: DynLogger,
    sink: Arc<dyn TrajectorySink>,
}

impl SmoothingService {
    /// Rejects an invalid configuration up front.
    pub fn new(config: SmoothingConfig, logger: DynLogger, sink: Arc<dyn TrajectorySink>) -> ApplicationResult<Self> {
        config.validate()?;
        Ok(Self { config, logger, sink })
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Pipeline plus report, without publishing.
    pub fn run(&self, scenario: &Scenario) -> ApplicationResult<(SmoothingOutput, SmoothingReport)> {
        let output = run_pipeline(scenario, &self.config).map_err(|e| {
            self.logger.error(&format!("scenario '{}' failed: {}", scenario.name, e));
            e
        })?;
        let report = SmoothingReport::from_output(&output, self.config.safe_dist);
        self.log_report(&report);
        Ok((output, report))
    }

    pub async fn smooth_scenario(&self, scenario: &Scenario) -> ApplicationResult<SmoothingReport> {
        let (output, report) = self.run(scenario)?;
        self.publish(&output, &report).await?;
        Ok(report)
    }

    /// Each scenario runs on the blocking pool; results keep the input order.
    /// A name already used earlier in the batch is rejected, since sinks key
    /// their output by scenario name.
    pub async fn smooth_batch(&self, scenarios: Vec<Scenario>) -> Vec<ApplicationResult<SmoothingReport>> {
        let mut seen = HashSet::new();
        let pending: Vec<_> = scenarios
            .into_iter()
            .map(|scenario| {
                if !seen.insert(scenario.name.clone()) {
                    return Err(scenario.name);
                }
                let config = self.config;
                Ok(tokio::task::spawn_blocking(move || {
                    let output = run_pipeline(&scenario, &config);
                    (scenario.name, output)
                }))
            })
            .collect();

        let mut results = Vec::with_capacity(pending.len());
        for entry in pending {
            let result = match entry {
                Ok(handle) => self.finish(handle.await).await,
                Err(name) => {
                    self.logger.error(&format!("scenario '{}' skipped: duplicate name", name));
                    Err(ConfigError::DuplicateName(name).into())
                }
            };
            results.push(result);
        }
        results
    }

    async fn finish(
        &self,
        joined: Result<(String, crate::common::DomainResult<SmoothingOutput>), tokio::task::JoinError>,
    ) -> ApplicationResult<SmoothingReport> {
        let (name, output) = joined?;
        let output = output.map_err(|e| {
            self.logger.error(&format!("scenario '{}' failed: {}", name, e));
            ApplicationError::from(e)
        })?;
        let report = SmoothingReport::from_output(&output, self.config.safe_dist);
        self.log_report(&report);
        self.publish(&output, &report).await?;
        Ok(report)
    }

    async fn publish(&self, output: &SmoothingOutput, report: &SmoothingReport) -> ApplicationResult<()> {
        self.sink.publish(output, report).await.map_err(|e| {
            self.logger.error(&format!("publishing '{}' failed: {}", output.scenario, e));
            ApplicationError::Sink(e.to_string())
        })
    }

    fn log_report(&self, report: &SmoothingReport) {
        self.logger.info(&format!(
            "scenario '{}' ({}): {} waypoints, {} repelled, blend {:.3} m, spline {:.3} m, fp {:.4}",
            report.scenario,
            report.run_id,
            report.waypoints,
            report.moved_waypoints,
            report.blend_length,
            report.spline_length,
            report.spline_residual,
        ));
        for (curve, clearance) in [("blend", &report.blend_clearance), ("spline", &report.spline_clearance)] {
            self.warn_if_unclear(&report.scenario, curve, clearance);
        }
    }

    fn warn_if_unclear(&self, scenario: &str, curve: &str, clearance: &ClearanceReport) {
        if clearance.is_clear() {
            return;
        }
        self.logger.warn(&format!(
            "scenario '{}': {} curve has {} samples inside keep-out zones ({} inside obstacles), min clearance {:.3}",
            scenario,
            curve,
            clearance.keep_out_violations,
            clearance.collisions,
            clearance.min_clearance.unwrap_or(f64::NAN),
        ));
    }
}
