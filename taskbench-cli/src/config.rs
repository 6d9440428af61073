//! Configuration loading from taskbench.toml
//!
//! Taskbench configuration can be specified in a `taskbench.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use serde::{Deserialize, Serialize};
use std::path::Path;
use taskbench_core::MeasureMode;

/// File name looked for by [`TaskbenchConfig::discover`]
pub const CONFIG_FILE: &str = "taskbench.toml";

/// Taskbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaskbenchConfig {
    /// Harness configuration
    #[serde(default)]
    pub harness: HarnessConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Harness configuration applied to every selected task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Requested timed iterations per mode
    #[serde(default = "default_iterations")]
    pub iterations: u64,
    /// Untimed warmup iterations per mode
    #[serde(default)]
    pub warmup: u64,
    /// Total budget per mode (e.g., "10s", "500ms"), or "none"
    #[serde(default = "default_budget")]
    pub budget: String,
    /// Modes to measure, in order
    #[serde(default = "default_modes")]
    pub modes: Vec<MeasureMode>,
    /// Problem size handed to each task's packet builder
    #[serde(default = "default_size")]
    pub size: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            warmup: 0,
            budget: default_budget(),
            modes: default_modes(),
            size: default_size(),
        }
    }
}

fn default_iterations() -> u64 {
    5
}
fn default_budget() -> String {
    "10s".to_string()
}
fn default_modes() -> Vec<MeasureMode> {
    MeasureMode::ALL.to_vec()
}
fn default_size() -> usize {
    1000
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
    /// Output directory for reports
    #[serde(default = "default_output_dir")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            directory: default_output_dir(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}
fn default_output_dir() -> String {
    "target/taskbench".to_string()
}

impl HarnessConfig {
    /// Budget in seconds; `None` when disabled
    pub fn budget_secs(&self) -> anyhow::Result<Option<f64>> {
        TaskbenchConfig::parse_budget(&self.budget)
    }
}

impl TaskbenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!("Ignoring {}: {}", config_path.display(), e);
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Taskbench Configuration

[harness]
# Timed iterations per measurement mode
iterations = 5
# Untimed warmup iterations before measuring
warmup = 0
# Total wall-clock budget per mode, or "none"
budget = "10s"
# Measurement modes: full-pipeline, execute-only
modes = ["full-pipeline", "execute-only"]
# Problem size handed to built-in tasks
size = 1000

[output]
# Default output format: human, json
format = "human"
# Output directory for reports
directory = "target/taskbench"
"#
        .to_string()
    }

    /// Parse a budget: a duration, or "none" / "off" / "unlimited" for no budget
    pub fn parse_budget(s: &str) -> anyhow::Result<Option<f64>> {
        match s.trim().to_lowercase().as_str() {
            "none" | "off" | "unlimited" => Ok(None),
            _ => Self::parse_duration(s).map(Some),
        }
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m") to seconds
    pub fn parse_duration(s: &str) -> anyhow::Result<f64> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;

        let multiplier = match unit_part.to_lowercase().as_str() {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" | "" => 1.0,
            "m" | "min" => 60.0,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(value * multiplier)
    }
}
