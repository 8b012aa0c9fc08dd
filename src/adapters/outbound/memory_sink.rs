use async_trait::async_trait;
use std::sync::Mutex;

use crate::common::{DomainError, DomainResult};
use crate::domains::path_smoothing::{SmoothingOutput, SmoothingReport, TrajectorySink};

/// Keeps published runs in memory for in-process consumers.
#[derive(Default)]
pub struct MemorySink {
    runs: Mutex<Vec<(SmoothingOutput, SmoothingReport)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything published so far.
    pub fn take(&self) -> Vec<(SmoothingOutput, SmoothingReport)> {
        self.runs.lock().map(|mut runs| std::mem::take(&mut *runs)).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.runs.lock().map(|runs| runs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TrajectorySink for MemorySink {
    async fn publish(&self, output: &SmoothingOutput, report: &SmoothingReport) -> DomainResult<()> {
        self.runs
            .lock()
            .map_err(|e| DomainError::InfrastructureError(format!("memory sink poisoned: {}", e)))?
            .push((output.clone(), report.clone()));
        Ok(())
    }
}
