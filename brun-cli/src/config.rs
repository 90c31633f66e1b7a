//! Configuration loading from brun.toml
//!
//! Defaults for the runner can be kept in a `brun.toml` file, discovered by
//! walking up from the current directory. CLI flags override file values.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// brun configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BrunConfig {
    /// Runner defaults.
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output defaults.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner defaults for benchmark execution.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunnerConfig {
    /// Per-run timeout in seconds.
    #[serde(default)]
    pub timeout: Option<f64>,
    /// Number of concurrent runs.
    #[serde(default)]
    pub jobs: Option<usize>,
    /// How many times each benchmark is repeated.
    #[serde(default)]
    pub repeat: Option<usize>,
}

/// Output defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Results file path.
    #[serde(default = "default_results")]
    pub results: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results: default_results(),
        }
    }
}

fn default_results() -> String {
    "results.json".to_string()
}

impl BrunConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from the
    /// current directory.
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("brun.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_runner_unset() {
        let config = BrunConfig::default();
        assert!(config.runner.timeout.is_none());
        assert!(config.runner.jobs.is_none());
        assert!(config.runner.repeat.is_none());
        assert_eq!(config.output.results, "results.json");
    }

    #[test]
    fn parses_partial_toml() {
        let toml_str = r#"
            [runner]
            timeout = 30.0
            jobs = 4

            [output]
            results = "out/records.json"
        "#;

        let config: BrunConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.timeout, Some(30.0));
        assert_eq!(config.runner.jobs, Some(4));
        assert!(config.runner.repeat.is_none());
        assert_eq!(config.output.results, "out/records.json");
    }

    #[test]
    fn empty_toml_applies_defaults() {
        let config: BrunConfig = toml::from_str("").unwrap();
        assert_eq!(config.output.results, "results.json");
    }
}
