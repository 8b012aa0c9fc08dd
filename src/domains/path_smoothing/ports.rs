use async_trait::async_trait;

use super::pipeline::SmoothingOutput;
use super::report::SmoothingReport;
use super::scenario::Scenario;
use crate::common::DomainResult;

/// Port the application uses to obtain scenarios (filesystem, network, ...).
pub trait ScenarioSource: Send + Sync {
    fn load_scenario(&self, name: &str) -> DomainResult<Scenario>;
    fn list_scenarios(&self) -> DomainResult<Vec<String>>;
}

/// Port receiving finished trajectories (files, UI, controllers, ...).
#[async_trait]
pub trait TrajectorySink: Send + Sync {
    async fn publish(&self, output: &SmoothingOutput, report: &SmoothingReport) -> DomainResult<()>;
}
