//! Output Formatting
//!
//! Human-readable output formatting for suite reports.
//!
//! Generates terminal-friendly output with:
//! - Task results with status icons (✓/✗/⊘/💥)
//! - Per-mode aggregate and iteration counts, flagged when partial
//! - Timing metrics (median, mean, stddev, percentiles)
//! - Per-mode summary across tasks

use taskbench_report::{ModeResult, SuiteReport, TaskStatus};

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &SuiteReport) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Taskbench Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    for result in &report.results {
        let status_icon = match result.status {
            TaskStatus::Passed => "✓",
            TaskStatus::Failed => "✗",
            TaskStatus::Rejected => "⊘",
            TaskStatus::Crashed => "💥",
        };

        output.push_str(&format!("  {} {}", status_icon, result.id));
        if !result.description.is_empty() {
            output.push_str(&format!("  ({})", result.description));
        }
        output.push('\n');

        for run in &result.runs {
            push_mode(&mut output, run);
        }

        if let Some(failure) = &result.failure {
            match failure.mode {
                Some(mode) => output.push_str(&format!(
                    "      {} [{}]: {}\n",
                    result.status.label(),
                    mode,
                    failure.message
                )),
                None => output.push_str(&format!(
                    "      {}: {}\n",
                    result.status.label(),
                    failure.message
                )),
            }
        }

        output.push('\n');
    }

    if !report.modes.is_empty() {
        output.push_str("Modes\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for mode in &report.modes {
            output.push_str(&format!(
                "  {:<14} tasks: {}  median aggregate: {}  partial: {}\n",
                mode.mode.to_string(),
                mode.tasks,
                format_secs(mode.metrics.median_secs),
                mode.partial_runs
            ));
        }
        output.push('\n');
    }

    let s = &report.summary;
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "{} tasks: {} passed, {} failed, {} rejected, {} crashed ({:.2}s)\n",
        s.total_tasks, s.passed, s.failed, s.rejected, s.crashed, s.total_duration_secs
    ));

    output
}

fn push_mode(output: &mut String, run: &ModeResult) {
    let partial = if run.partial {
        format!("  [partial: {}]", run.stop_reason.describe())
    } else {
        String::new()
    };
    output.push_str(&format!(
        "    {}: {} over {}/{} iterations{}\n",
        run.mode,
        format_secs(run.aggregate_secs),
        run.iterations_run,
        run.iterations_requested,
        partial
    ));

    let m = &run.metrics;
    if m.samples > 0 {
        output.push_str(&format!(
            "      median: {}  mean: {}  stddev: {}\n",
            format_secs(m.median_secs),
            format_secs(m.mean_secs),
            format_secs(m.std_dev_secs)
        ));
        output.push_str(&format!(
            "      min: {}  max: {}  p95: {}  outliers: {}{}\n",
            format_secs(m.min_secs),
            format_secs(m.max_secs),
            format_secs(m.p95_secs),
            m.outliers,
            if m.noisy { " (noisy)" } else { "" }
        ));
    }
}

/// Format seconds with a unit suited to the magnitude
pub fn format_secs(secs: f64) -> String {
    if secs < 1e-6 {
        format!("{:.2} ns", secs * 1e9)
    } else if secs < 1e-3 {
        format!("{:.2} µs", secs * 1e6)
    } else if secs < 1.0 {
        format!("{:.2} ms", secs * 1e3)
    } else {
        format!("{:.3} s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_secs_units() {
        assert_eq!(format_secs(2.5e-9), "2.50 ns");
        assert_eq!(format_secs(1.5e-5), "15.00 µs");
        assert_eq!(format_secs(0.25), "250.00 ms");
        assert_eq!(format_secs(2.0), "2.000 s");
    }
}
