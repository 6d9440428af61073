#![warn(missing_docs)]
//! Taskbench CLI Library
//!
//! This module provides the CLI for running registered tasks through the
//! performance harness. Tasks register themselves with
//! `inventory::submit!` and are discovered at startup.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     taskbench_cli::run()
//! }
//! ```

mod config;
mod executor;
mod planner;
pub mod tasks;

pub use config::*;
pub use executor::{
    ExecutionConfig, Executor, ModeExecution, ModeStatistics, TaskExecutionResult, build_report,
    compute_statistics, format_human_output, format_secs,
};

use clap::{Parser, Subcommand};
use rayon::ThreadPoolBuilder;
use regex::Regex;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use taskbench_core::{MeasureMode, TaskDef};
use taskbench_report::{OutputFormat, SuiteReport, generate_json_report};

/// Taskbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "taskbench")]
#[command(author, version, about = "Taskbench - phased task performance harness")]
pub struct Cli {
    /// Optional subcommand (List, Run, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter tasks by regex pattern
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Skip tasks matching this regex pattern
    #[arg(long)]
    pub exclude: Option<String>,

    /// Timed iterations per mode
    #[arg(long, short = 'n')]
    pub iterations: Option<u64>,

    /// Untimed warmup iterations per mode
    #[arg(long)]
    pub warmup: Option<u64>,

    /// Total budget per mode (e.g., "10s", "500ms", "none")
    #[arg(long)]
    pub budget: Option<String>,

    /// Measurement mode; repeat to measure several (full-pipeline, execute-only)
    #[arg(long = "mode")]
    pub modes: Vec<MeasureMode>,

    /// Problem size handed to each task
    #[arg(long)]
    pub size: Option<usize>,

    /// Output format: human, json
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also save the report into the configured output directory
    #[arg(long)]
    pub save: bool,

    /// Number of threads for parallel statistics computation
    /// 0 = use all available cores (default), 1 = single-threaded
    #[arg(long, short = 'j', default_value = "0")]
    pub threads: usize,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all registered tasks
    List,
    /// Run tasks (default)
    Run,
    /// Print a default taskbench.toml
    Init,
}

/// Run the Taskbench CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the Taskbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("taskbench=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("taskbench=info")
            .with_writer(std::io::stderr)
            .init();
    }

    // Discover taskbench.toml configuration (CLI flags override)
    let config = TaskbenchConfig::discover().unwrap_or_default();

    match cli.command {
        Some(Commands::List) => list_tasks(&cli)?,
        Some(Commands::Init) => print!("{}", TaskbenchConfig::default_toml()),
        Some(Commands::Run) | None => run_tasks(&cli, &config)?,
    }

    Ok(())
}

/// Filter registered tasks based on CLI options using the planner module.
///
/// Returns tasks sorted alphabetically by ID for deterministic execution.
fn filter_tasks(cli: &Cli) -> anyhow::Result<Vec<&'static TaskDef>> {
    let filter_re = Regex::new(&cli.filter)?;
    let exclude_re = cli.exclude.as_deref().map(Regex::new).transpose()?;

    let plan = planner::build_plan(
        inventory::iter::<TaskDef>,
        Some(&filter_re),
        exclude_re.as_ref(),
    );

    Ok(plan.tasks)
}

fn list_tasks(cli: &Cli) -> anyhow::Result<()> {
    println!("Taskbench Plan:");

    let tasks = filter_tasks(cli)?;
    for task in &tasks {
        println!("├── {}  {}", task.id, task.description);
    }

    println!("{} tasks found.", tasks.len());
    Ok(())
}

/// Build an ExecutionConfig by layering: taskbench.toml defaults → CLI overrides.
pub fn build_execution_config(
    cli: &Cli,
    config: &TaskbenchConfig,
) -> anyhow::Result<ExecutionConfig> {
    let harness = &config.harness;

    let budget_secs = match &cli.budget {
        Some(budget) => TaskbenchConfig::parse_budget(budget)?,
        None => harness.budget_secs()?,
    };

    let modes = if cli.modes.is_empty() {
        harness.modes.clone()
    } else {
        cli.modes.clone()
    };
    if modes.is_empty() {
        return Err(anyhow::anyhow!("No measurement modes selected"));
    }

    let exec_config = ExecutionConfig {
        iterations: cli.iterations.unwrap_or(harness.iterations),
        warmup: cli.warmup.unwrap_or(harness.warmup),
        budget_secs,
        size: cli.size.unwrap_or(harness.size),
        modes,
    };
    // Reject bad harness settings before any task runs
    exec_config.harness()?;

    Ok(exec_config)
}

fn run_tasks(cli: &Cli, config: &TaskbenchConfig) -> anyhow::Result<()> {
    // Configure Rayon thread pool for statistics computation
    if cli.threads > 0 {
        ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .ok();
    }

    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .unwrap_or(OutputFormat::Human);

    let tasks = filter_tasks(cli)?;
    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    let exec_config = build_execution_config(cli, config)?;
    let modes: Vec<String> = exec_config.modes.iter().map(|m| m.to_string()).collect();
    println!(
        "Running {} tasks, {} iterations, modes: {}...\n",
        tasks.len(),
        exec_config.iterations,
        modes.join(", ")
    );

    let start_time = Instant::now();

    let mut executor = Executor::new(exec_config.clone());
    let results = executor.execute(&tasks);

    // Compute statistics
    let stats = compute_statistics(&results);

    // Build report
    let total_duration_secs = start_time.elapsed().as_secs_f64();
    let report = build_report(&results, &stats, &exec_config, total_duration_secs);

    // Generate output
    let output = render(&report, format)?;

    // Write output
    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)?;
        file.write_all(output.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    if cli.save {
        let path = save_report(&report, format, &config.output.directory, &output)?;
        println!("Report saved to: {}", path.display());
    }

    // Exit with appropriate code
    if report.has_failures() {
        eprintln!(
            "\n{} task(s) failed, {} crashed",
            report.summary.failed, report.summary.crashed
        );
        std::process::exit(1);
    }

    Ok(())
}

/// Render `report` in `format`
pub fn render(report: &SuiteReport, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Human => format_human_output(report),
    })
}

/// Write an already rendered report into `directory`, named by its timestamp
fn save_report(
    report: &SuiteReport,
    format: OutputFormat,
    directory: &str,
    rendered: &str,
) -> anyhow::Result<PathBuf> {
    let dir = PathBuf::from(directory);
    std::fs::create_dir_all(&dir)?;
    let name = format!(
        "taskbench-{}.{}",
        report.meta.timestamp.format("%Y%m%dT%H%M%SZ"),
        format.extension()
    );
    let path = dir.join(name);
    std::fs::write(&path, rendered)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from([
            "taskbench",
            "--iterations",
            "12",
            "--budget",
            "none",
            "--mode",
            "execute-only",
            "sort",
        ])
        .unwrap();
        let exec = build_execution_config(&cli, &TaskbenchConfig::default()).unwrap();

        assert_eq!(cli.filter, "sort");
        assert_eq!(exec.iterations, 12);
        assert_eq!(exec.budget_secs, None);
        assert_eq!(exec.modes, vec![MeasureMode::ExecuteOnly]);
        assert_eq!(exec.size, 1000);
    }

    #[test]
    fn test_config_defaults_apply() {
        let cli = Cli::try_parse_from(["taskbench"]).unwrap();
        let mut config = TaskbenchConfig::default();
        config.harness.warmup = 2;
        config.harness.budget = "250ms".to_string();

        let exec = build_execution_config(&cli, &config).unwrap();
        assert_eq!(exec.warmup, 2);
        assert_eq!(exec.iterations, 5);
        assert!((exec.budget_secs.unwrap() - 0.25).abs() < 1e-12);
        assert_eq!(exec.modes, MeasureMode::ALL.to_vec());
    }

    #[test]
    fn test_bad_budget_is_an_error() {
        let cli = Cli::try_parse_from(["taskbench", "--budget", "soon"]).unwrap();
        assert!(build_execution_config(&cli, &TaskbenchConfig::default()).is_err());
    }

    #[test]
    fn test_bad_harness_settings_rejected_up_front() {
        let config = TaskbenchConfig::default();
        let zero = Cli::try_parse_from(["taskbench", "--iterations", "0"]).unwrap();
        assert!(build_execution_config(&zero, &config).is_err());

        let instant = Cli::try_parse_from(["taskbench", "--budget", "0s"]).unwrap();
        assert!(build_execution_config(&instant, &config).is_err());
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::try_parse_from(["taskbench", "list"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::List)));
        assert!(Cli::try_parse_from(["taskbench", "--mode", "sideways"]).is_err());
    }

    #[test]
    fn test_registered_tasks_are_discovered() {
        let cli = Cli::try_parse_from(["taskbench"]).unwrap();
        let ids: Vec<_> = filter_tasks(&cli).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["sort", "trapezoid", "vector_sum"]);
    }
}
