//! Configuration settings for the trajectory intersection solver

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub input: InputConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub observations_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    pub timeout_seconds: u64,
    /// Pivot magnitude below which a system counts as singular
    pub pivot_epsilon: f64,
    /// Maximum distance from an integer a solved component may have
    pub integer_epsilon: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    Lu,
    Elimination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub save_solution: bool,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: InputConfig {
                observations_file: PathBuf::from("input/observations/example.txt"),
            },
            solver: SolverConfig {
                backend: SolverBackend::Lu,
                timeout_seconds: 10,
                pivot_epsilon: 1e-9,
                integer_epsilon: 1e-2,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                save_solution: false,
                output_directory: PathBuf::from("output/solutions"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.solver.timeout_seconds == 0 {
            anyhow::bail!("Solver timeout must be positive");
        }

        if !(self.solver.pivot_epsilon > 0.0) {
            anyhow::bail!("Pivot epsilon must be positive");
        }

        if !(self.solver.integer_epsilon > 0.0 && self.solver.integer_epsilon < 0.5) {
            anyhow::bail!("Integer epsilon must be in (0, 0.5)");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref observations_file) = cli_overrides.observations_file {
            self.input.observations_file = observations_file.clone();
        }
        if let Some(backend) = cli_overrides.backend {
            self.solver.backend = backend;
        }
        if let Some(timeout_seconds) = cli_overrides.timeout_seconds {
            self.solver.timeout_seconds = timeout_seconds;
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub observations_file: Option<PathBuf>,
    pub backend: Option<SolverBackend>,
    pub timeout_seconds: Option<u64>,
    pub output_dir: Option<PathBuf>,
}
