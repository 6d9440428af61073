//! Integration tests for Taskbench
//!
//! These tests verify the end-to-end behavior of the lifecycle and harness.

use proptest::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use taskbench::prelude::*;
use taskbench::{
    Error, ManualClock, ProcessGroup, SoloGroup, StopReason, TaskStatus, TransportError,
    step_clock,
};
use taskbench_cli::tasks::{SortTask, TrapezoidTask, VectorSum};
use taskbench_cli::{ExecutionConfig, Executor, build_report, compute_statistics, render};
use taskbench_report::{OutputFormat, parse_json_report};

/// Mean of an `f64` input; optionally charges simulated cost to a manual clock
#[derive(Default)]
struct Mean {
    clock: Option<ManualClock>,
    cost: [f64; 3],
    values: Vec<f64>,
    mean: f64,
    calls: Rc<Cell<u32>>,
}

impl Mean {
    fn packet(values: &[f64]) -> DataPacket {
        let mut packet = DataPacket::new();
        packet.push_input(values).push_output::<f64>(1);
        packet
    }

    fn charge(&self, secs: f64) {
        self.calls.set(self.calls.get() + 1);
        if let Some(clock) = &self.clock {
            clock.advance(secs);
        }
    }
}

impl Task for Mean {
    fn name(&self) -> &str {
        "mean"
    }

    fn validate(&self, packet: &DataPacket) -> bool {
        packet.is_well_formed()
            && packet.inputs_count.first().is_some_and(|&n| n > 0)
            && packet.outputs_count == [1]
    }

    fn prepare(&mut self, packet: &DataPacket) -> bool {
        self.charge(self.cost[0]);
        self.values = packet.input_as(0).unwrap_or_default();
        !self.values.is_empty()
    }

    fn execute(&mut self) -> bool {
        self.charge(self.cost[1]);
        self.mean = self.values.iter().sum::<f64>() / self.values.len() as f64;
        true
    }

    fn finalize(&mut self, packet: &mut DataPacket) -> bool {
        self.charge(self.cost[2]);
        packet.write_output(0, &[self.mean])
    }
}

/// Test the documented ten-iteration scenario with a 10 ms step clock
#[test]
fn test_ten_iterations_with_step_clock() {
    let mut packet = Mean::packet(&[1.0, 2.0, 3.0]);
    let mut task = BoundTask::new(Mean::default(), &mut packet);
    assert!(task.validate().unwrap());

    let mut harness = PerfHarness::configure(10, step_clock(0.01)).unwrap();
    let report = harness.run(&mut task, MeasureMode::ExecuteOnly).unwrap();

    assert_eq!(report.iterations_run, 10);
    assert!(!report.partial);
    assert!((report.aggregate_secs - 0.10).abs() < 1e-9);
    assert_eq!(task.packet().output_as::<f64>(0), Some(vec![2.0]));
}

/// Test that a rejected task is never measured
#[test]
fn test_rejected_task_is_never_invoked() {
    let calls = Rc::new(Cell::new(0));
    let mut packet = DataPacket::new();
    let mut task = BoundTask::new(
        Mean {
            calls: calls.clone(),
            ..Default::default()
        },
        &mut packet,
    );
    assert!(!task.validate().unwrap());

    let mut harness = PerfHarness::configure(10, step_clock(0.01)).unwrap();
    let err = harness.run(&mut task, MeasureMode::FullPipeline).unwrap_err();

    assert!(err.is_contract_violation());
    assert_eq!(calls.get(), 0);
}

/// Test that a budget smaller than the work cuts the run short
#[test]
fn test_budget_scenario() {
    let clock = ManualClock::new();
    let mut packet = Mean::packet(&[4.0]);
    let mut task = BoundTask::new(
        Mean {
            clock: Some(clock.clone()),
            cost: [0.0, 0.02, 0.0],
            ..Default::default()
        },
        &mut packet,
    );
    assert!(task.validate().unwrap());

    let mut harness = PerfHarness::configure(100, clock.reader())
        .unwrap()
        .with_budget(0.05)
        .unwrap();
    let report = harness.run(&mut task, MeasureMode::ExecuteOnly).unwrap();

    assert!(report.iterations_run <= 4);
    assert!(report.partial);
    assert_eq!(report.stop_reason, StopReason::BudgetExceeded);

    let mut rendered = Vec::new();
    report.render(&mut rendered).unwrap();
    let rendered = String::from_utf8(rendered).unwrap();
    assert!(rendered.starts_with("mean:execute-only:"));
    assert!(rendered.contains("partial: budget exceeded"));
}

/// Test that repeated validation is harmless and cycles restart at Prepare
#[test]
fn test_validate_idempotent_and_cycles_repeat() {
    let mut packet = Mean::packet(&[1.0, 3.0]);
    let mut task = BoundTask::new(Mean::default(), &mut packet);

    assert!(task.validate().unwrap());
    assert!(task.validate().unwrap());
    assert_eq!(task.state(), TaskState::Validated);

    for _ in 0..3 {
        assert!(task.run_cycle().unwrap());
        assert_eq!(task.state(), TaskState::Finalized);
    }

    // Validate is not legal again once a cycle has run
    assert!(matches!(
        task.validate(),
        Err(Error::PhaseOrder {
            phase: Phase::Validate,
            ..
        })
    ));
}

/// Test that timing setup and teardown never makes the pipeline look faster
#[test]
fn test_full_pipeline_dominates_execute_only() {
    let clock = ManualClock::new();
    let mut packet = Mean::packet(&[1.0, 2.0]);
    let mut task = BoundTask::new(
        Mean {
            clock: Some(clock.clone()),
            cost: [0.003, 0.004, 0.001],
            ..Default::default()
        },
        &mut packet,
    );
    assert!(task.validate().unwrap());

    let mut harness = PerfHarness::configure(6, clock.reader()).unwrap();
    let exec = harness.run(&mut task, MeasureMode::ExecuteOnly).unwrap();
    let full = harness.run(&mut task, MeasureMode::FullPipeline).unwrap();

    assert!(full.aggregate_secs >= exec.aggregate_secs);
}

/// Shares the coordinator's broadcast decisions with a follower run afterwards
struct ReplayGroup {
    rank: usize,
    decisions: Rc<RefCell<Vec<u8>>>,
    cursor: Cell<usize>,
}

impl ProcessGroup for ReplayGroup {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        2
    }

    fn send(&self, _dest: usize, _tag: u32, _data: &[u8]) -> Result<(), TransportError> {
        Ok(())
    }

    fn recv(&self, source: usize, tag: u32) -> Result<Vec<u8>, TransportError> {
        Err(TransportError::NoMessage {
            source_rank: source,
            tag,
        })
    }

    fn broadcast(&self, _root: usize, data: &mut Vec<u8>) -> Result<(), TransportError> {
        if self.is_coordinator() {
            self.decisions.borrow_mut().extend_from_slice(data);
        } else {
            let index = self.cursor.get();
            let byte = *self
                .decisions
                .borrow()
                .get(index)
                .ok_or_else(|| TransportError::Failed("coordinator never reached here".into()))?;
            self.cursor.set(index + 1);
            *data = vec![byte];
        }
        Ok(())
    }

    fn reduce_sum_f64(&self, _root: usize, value: f64) -> Result<Option<f64>, TransportError> {
        Ok(self.is_coordinator().then_some(value))
    }

    fn barrier(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Test that a follower stops on the same iteration as its coordinator
#[test]
fn test_group_runs_in_lockstep() {
    let decisions = Rc::new(RefCell::new(Vec::new()));

    let coordinator = {
        let clock = ManualClock::new();
        let mut packet = Mean::packet(&[1.0]);
        let mut task = BoundTask::new(
            Mean {
                clock: Some(clock.clone()),
                cost: [0.0, 0.02, 0.0],
                ..Default::default()
            },
            &mut packet,
        );
        assert!(task.validate().unwrap());
        let group = Rc::new(ReplayGroup {
            rank: 0,
            decisions: decisions.clone(),
            cursor: Cell::new(0),
        });
        let mut harness = PerfHarness::configure(50, clock.reader())
            .unwrap()
            .with_budget(0.1)
            .unwrap()
            .with_group(group);
        harness.run(&mut task, MeasureMode::ExecuteOnly).unwrap()
    };

    // The follower has no budget of its own and a much faster clock
    let follower = {
        let mut packet = Mean::packet(&[1.0]);
        let mut task = BoundTask::new(Mean::default(), &mut packet);
        assert!(task.validate().unwrap());
        let group = Rc::new(ReplayGroup {
            rank: 1,
            decisions,
            cursor: Cell::new(0),
        });
        let mut harness = PerfHarness::configure(50, step_clock(1e-6))
            .unwrap()
            .without_budget()
            .with_group(group);
        harness.run(&mut task, MeasureMode::ExecuteOnly).unwrap()
    };

    assert!(coordinator.partial);
    assert_eq!(follower.iterations_run, coordinator.iterations_run);
    assert_eq!(follower.stop_reason, StopReason::CoordinatorStopped);
}

/// Test that warmup ends on the coordinator's decision, not the local clock
#[test]
fn test_group_warmup_runs_in_lockstep() {
    let decisions = Rc::new(RefCell::new(Vec::new()));

    let coordinator_calls = Rc::new(Cell::new(0));
    let coordinator = {
        let clock = ManualClock::new();
        let mut packet = Mean::packet(&[1.0]);
        let mut task = BoundTask::new(
            Mean {
                clock: Some(clock.clone()),
                cost: [0.0, 0.2, 0.0],
                calls: coordinator_calls.clone(),
                ..Default::default()
            },
            &mut packet,
        );
        assert!(task.validate().unwrap());
        let group = Rc::new(ReplayGroup {
            rank: 0,
            decisions: decisions.clone(),
            cursor: Cell::new(0),
        });
        let mut harness = PerfHarness::configure(3, clock.reader())
            .unwrap()
            .with_budget(0.5)
            .unwrap()
            .with_warmup(5)
            .with_group(group);
        harness.run(&mut task, MeasureMode::ExecuteOnly).unwrap()
    };

    let follower_calls = Rc::new(Cell::new(0));
    let follower = {
        let mut packet = Mean::packet(&[1.0]);
        let mut task = BoundTask::new(
            Mean {
                calls: follower_calls.clone(),
                ..Default::default()
            },
            &mut packet,
        );
        assert!(task.validate().unwrap());
        let group = Rc::new(ReplayGroup {
            rank: 1,
            decisions: decisions.clone(),
            cursor: Cell::new(0),
        });
        let mut harness = PerfHarness::configure(3, step_clock(1e-6))
            .unwrap()
            .without_budget()
            .with_warmup(5)
            .with_group(group);
        harness.run(&mut task, MeasureMode::ExecuteOnly).unwrap()
    };

    // Three warmup boundaries and one timed boundary
    assert_eq!(*decisions.borrow(), vec![0, 0, 1, 1]);
    assert_eq!(coordinator.iterations_run, 1);
    assert_eq!(follower.iterations_run, coordinator.iterations_run);
    assert_eq!(follower_calls.get(), coordinator_calls.get());
    assert_eq!(follower.stop_reason, StopReason::CoordinatorStopped);
}

/// Test that a single-process group behaves like no group at all
#[test]
fn test_solo_group_is_transparent() {
    let mut packet = Mean::packet(&[1.0]);
    let mut task = BoundTask::new(Mean::default(), &mut packet);
    assert!(task.validate().unwrap());

    let mut harness = PerfHarness::configure(8, step_clock(0.5))
        .unwrap()
        .without_budget()
        .with_group(Rc::new(SoloGroup::new()));
    let report = harness.run(&mut task, MeasureMode::FullPipeline).unwrap();

    assert_eq!(report.iterations_run, 8);
    assert!((report.aggregate_secs - 4.0).abs() < 1e-9);
}

/// Test the suite pipeline over the built-in tasks down to JSON
#[test]
fn test_suite_report_over_builtin_tasks() {
    let defs: Vec<&'static TaskDef> = ["sort", "trapezoid", "vector_sum"]
        .iter()
        .map(|id| TaskDef::find(id).expect("built-in task registered"))
        .collect();
    let config = ExecutionConfig {
        iterations: 3,
        size: 64,
        ..Default::default()
    };

    let results = Executor::new(config.clone()).execute(&defs);
    let stats = compute_statistics(&results);
    let report = build_report(&results, &stats, &config, 0.5);

    assert_eq!(report.summary.total_tasks, 3);
    assert_eq!(report.summary.passed, 3);
    assert!(!report.has_failures());
    assert_eq!(report.modes.len(), 2);
    for result in &report.results {
        assert_eq!(result.status, TaskStatus::Passed);
        assert_eq!(result.runs.len(), 2);
        assert!(result.runs.iter().all(|r| r.output_valid && r.iterations_run == 3));
    }

    let json = render(&report, OutputFormat::Json).unwrap();
    let parsed = parse_json_report(&json).unwrap();
    assert_eq!(parsed.summary, report.summary);
    assert_eq!(parsed.meta.config.size, 64);

    let human = render(&report, OutputFormat::Human).unwrap();
    assert!(human.contains("vector_sum"));
    assert!(human.contains("3 passed"));
}

/// Test that built-in tasks reject sizes they cannot handle
#[test]
fn test_builtin_tasks_reject_empty_problems() {
    assert!(!VectorSum::default().validate(&VectorSum::packet(0)));
    assert!(!TrapezoidTask::default().validate(&TrapezoidTask::packet(0)));
    // An empty sort is still a valid sort
    assert!(SortTask::default().validate(&SortTask::packet(0)));
}

proptest! {
    #[test]
    fn prop_step_clock_aggregate_is_exact(
        iterations in 1u64..40,
        ticks in 1u32..1000,
        full in any::<bool>(),
    ) {
        let increment = f64::from(ticks) * 1e-4;
        let mode = if full { MeasureMode::FullPipeline } else { MeasureMode::ExecuteOnly };
        let mut packet = Mean::packet(&[2.0, 4.0]);
        let mut task = BoundTask::new(Mean::default(), &mut packet);
        prop_assert!(task.validate().unwrap());

        let mut harness = PerfHarness::configure(iterations, step_clock(increment))
            .unwrap()
            .without_budget();
        let report = harness.run(&mut task, mode).unwrap();

        prop_assert_eq!(report.iterations_run, iterations);
        let expected = iterations as f64 * increment;
        prop_assert!((report.aggregate_secs - expected).abs() < 1e-9 * expected.max(1.0));
    }

    #[test]
    fn prop_iterations_run_never_exceeds_request(
        iterations in 1u64..60,
        cost_ms in 1u32..50,
        budget_ms in 1u32..500,
    ) {
        let clock = ManualClock::new();
        let cost = f64::from(cost_ms) / 1000.0;
        let budget = f64::from(budget_ms) / 1000.0;
        let mut packet = Mean::packet(&[1.0]);
        let mut task = BoundTask::new(
            Mean { clock: Some(clock.clone()), cost: [0.0, cost, 0.0], ..Default::default() },
            &mut packet,
        );
        prop_assert!(task.validate().unwrap());

        let mut harness = PerfHarness::configure(iterations, clock.reader())
            .unwrap()
            .with_budget(budget)
            .unwrap();
        let report = harness.run(&mut task, MeasureMode::ExecuteOnly).unwrap();

        prop_assert!(report.iterations_run >= 1);
        prop_assert!(report.iterations_run <= iterations);
        prop_assert_eq!(report.partial, report.iterations_run < iterations);
        prop_assert!(report.iterations_run <= (budget / cost).ceil() as u64 + 1);
    }
}
