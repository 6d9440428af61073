//! Report Metadata
//!
//! Stamps the report with the schema version, crate version, UTC time of
//! report generation, and the harness configuration it ran with.

use super::execution::ExecutionConfig;
use chrono::Utc;
use taskbench_report::{ReportConfig, ReportMeta, SCHEMA_VERSION};

/// Build report metadata for a run using `config`
pub fn build_report_meta(config: &ExecutionConfig) -> ReportMeta {
    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        config: ReportConfig {
            iterations: config.iterations,
            warmup: config.warmup,
            budget_secs: config.budget_secs,
            size: config.size,
            modes: config.modes.clone(),
        },
    }
}
