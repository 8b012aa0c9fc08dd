use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use anyhow::Result;

use crate::domains::path_smoothing::{Scenario, SmoothingConfig};

/// Prefix of environment variables overriding file settings, e.g.
/// `GRYPHON_SMOOTHING__SMOOTHING__SAMPLE_COUNT=400`.
pub const ENV_PREFIX: &str = "GRYPHON_SMOOTHING";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub smoothing: SmoothingConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub scenarios: ScenarioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the GeoJSON sink writes into.
    pub directory: PathBuf,
    /// Vertices used to approximate each obstacle circle in the exported scene.
    pub circle_segments: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Optional log file; console only when unset.
    pub file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Base directory for the filesystem scenario source.
    pub data_dir: Option<PathBuf>,
    /// Scenario files to process; the built-in scenario runs when empty.
    pub names: Vec<String>,
    /// Scenarios defined inline in the configuration file.
    pub inline: Vec<Scenario>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { directory: PathBuf::from("output"), circle_segments: 48 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), file: None }
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Layer an optional TOML file with `GRYPHON_SMOOTHING__*` environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let layered = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let config: Config = layered.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.smoothing.validate()?;
        if self.output.circle_segments < 3 {
            anyhow::bail!("output.circle_segments must be at least 3, got {}", self.output.circle_segments);
        }
        for scenario in &self.scenarios.inline {
            scenario.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.smoothing.safe_dist, 1.2);
        assert_eq!(config.smoothing.strength, 0.4);
        assert_eq!(config.smoothing.smoothing_factor, 0.3);
        assert_eq!(config.smoothing.sample_count, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str("[smoothing]\nsample_count = 50\n").unwrap();
        assert_eq!(config.smoothing.sample_count, 50);
        assert_eq!(config.smoothing.safe_dist, 1.2);
        assert_eq!(config.output.directory, PathBuf::from("output"));
    }

    #[test]
    fn invalid_smoothing_is_rejected() {
        assert!(Config::from_toml_str("[smoothing]\nstrength = 1.5\n").is_err());
        assert!(Config::from_toml_str("[smoothing]\nsample_count = 1\n").is_err());
    }
}
