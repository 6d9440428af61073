//! Task Planner
//!
//! Builds the execution plan by filtering and ordering registered tasks.
//!
//! Filtering options:
//! - Regex pattern matching on task ID
//! - Regex exclusion on task ID
//!
//! Ordering: Tasks are sorted alphabetically by ID for deterministic execution.

use taskbench_core::TaskDef;

/// Execution plan for tasks
pub struct ExecutionPlan {
    /// Ordered list of tasks to run
    pub tasks: Vec<&'static TaskDef>,
}

/// Build execution plan from discovered tasks
pub fn build_plan(
    tasks: impl IntoIterator<Item = &'static TaskDef>,
    filter: Option<&regex::Regex>,
    exclude: Option<&regex::Regex>,
) -> ExecutionPlan {
    let mut selected: Vec<_> = tasks
        .into_iter()
        .filter(|t| filter.map_or(true, |re| re.is_match(t.id)))
        .filter(|t| !exclude.is_some_and(|re| re.is_match(t.id)))
        .collect();

    selected.sort_by_key(|t| t.id);

    ExecutionPlan { tasks: selected }
}
