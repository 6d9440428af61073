#![warn(missing_docs)]
//! Taskbench Report - Suite Results
//!
//! Data model for a whole suite run and its serialized forms:
//! - JSON (machine-readable)
//! - Human-readable terminal output is rendered by the CLI

mod json;
mod report;

pub use json::{SCHEMA_VERSION, generate_json_report, parse_json_report};
pub use report::{
    FailureInfo, ModeMetrics, ModeResult, ModeSummary, ReportConfig, ReportMeta, ReportSummary,
    SuiteReport, TaskResult, TaskStatus,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// Human-readable terminal output
    Human,
}

impl OutputFormat {
    /// File extension used when writing the report to disk
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "txt",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
