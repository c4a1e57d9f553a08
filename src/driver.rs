//! Run orchestration.
//!
//! The driver is the only top-level coordinator: it validates the input,
//! pre-computes domains once, runs one strategy (or all four in
//! comparison mode) and assembles the solution document. Infeasibility
//! and deadline expiry are normal outcomes here; only malformed input
//! and I/O problems surface as errors.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::domains::{DomainTable, UnaryRule};
use crate::input::InputDoc;
use crate::logging::Verbosity;
use crate::output::{build_document, render_schedule, OutputDoc};
use crate::problem::{Problem, ProblemError};
use crate::search::{self, SearchOutcome, SearchRun, StateSpace, Strategy, StrategySpec};
use crate::solver_log;

/// Errors that prevent a run from producing a solution document.
#[derive(Error, Debug)]
pub enum SolveError {
    #[error("malformed input document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Problem(#[from] ProblemError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Driver-owned knobs, separate from the problem document's config.
#[derive(Clone, Debug, Default)]
pub struct DriverOptions {
    pub verbosity: Verbosity,
    /// Wall-clock budget per strategy run; sampled between expansions.
    pub timeout: Option<Duration>,
}

/// Programmatic outcome of a run. The document's `meta.status` collapses
/// `Infeasible` and `Timeout` into "failure".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    Success,
    Infeasible,
    Timeout,
}

/// Everything a caller may want after a run.
#[derive(Debug)]
pub struct SolveReport {
    pub status: SolveStatus,
    pub document: OutputDoc,
    /// One entry for a single-strategy run, four in comparison mode,
    /// empty when pre-computation already proved infeasibility.
    pub runs: Vec<SearchRun>,
    /// Events whose unary domain was empty, with the excluding rule.
    pub infeasible_events: Vec<(String, UnaryRule)>,
}

/// Parses, validates and solves a JSON input document.
pub fn solve_str(text: &str, opts: &DriverOptions) -> Result<SolveReport, SolveError> {
    let doc = InputDoc::from_json(text)?;
    solve_document(&doc, opts)
}

/// Validates and solves a parsed input document.
pub fn solve_document(doc: &InputDoc, opts: &DriverOptions) -> Result<SolveReport, SolveError> {
    let problem = Problem::from_document(doc)?;
    Ok(solve_problem(&problem, opts))
}

/// Reads `input`, solves it, and writes the solution document to
/// `output`.
pub fn solve_file(
    input: &Path,
    output: &Path,
    opts: &DriverOptions,
) -> Result<SolveReport, SolveError> {
    let text = fs::read_to_string(input)?;
    let report = solve_str(&text, opts)?;
    let mut rendered = serde_json::to_string_pretty(&report.document)?;
    rendered.push('\n');
    fs::write(output, rendered)?;
    Ok(report)
}

/// Solves an already-validated problem.
pub fn solve_problem(problem: &Problem, opts: &DriverOptions) -> SolveReport {
    let verbosity = opts.verbosity;
    let domains = DomainTable::build(problem);

    if !domains.is_feasible() {
        let infeasible_events: Vec<(String, UnaryRule)> = domains
            .empty_domains()
            .iter()
            .map(|d| (problem.events[d.event].id.clone(), d.rule))
            .collect();
        for (event, rule) in &infeasible_events {
            solver_log!(verbosity, Checks, "event {}: {}", event, rule);
        }
        solver_log!(
            verbosity,
            Changes,
            "No feasible schedule: {} event(s) have an empty domain",
            infeasible_events.len()
        );
        return SolveReport {
            status: SolveStatus::Infeasible,
            document: build_document(problem, problem.config.strategy.label(), None),
            runs: Vec::new(),
            infeasible_events,
        };
    }

    let space = StateSpace::new(problem, &domains);
    match problem.config.strategy {
        StrategySpec::Only(strategy) => {
            let run = search::run(&space, strategy, deadline(opts), verbosity);
            report_single(problem, run, verbosity)
        }
        StrategySpec::All => {
            let runs: Vec<SearchRun> = Strategy::ALL
                .iter()
                .map(|&strategy| search::run(&space, strategy, deadline(opts), verbosity))
                .collect();
            report_comparison(problem, runs, verbosity)
        }
    }
}

fn deadline(opts: &DriverOptions) -> Option<Instant> {
    opts.timeout.map(|budget| Instant::now() + budget)
}

fn report_single(problem: &Problem, run: SearchRun, verbosity: Verbosity) -> SolveReport {
    let label = run.strategy.label();
    let (status, solution) = match &run.outcome {
        SearchOutcome::Solved(state) => (SolveStatus::Success, Some(state)),
        SearchOutcome::Exhausted => (SolveStatus::Infeasible, None),
        SearchOutcome::DeadlineExceeded => (SolveStatus::Timeout, None),
    };
    log_run_outcome(problem, &run, verbosity);
    let document = build_document(problem, label, solution);
    SolveReport {
        status,
        document,
        runs: vec![run],
        infeasible_events: Vec::new(),
    }
}

fn report_comparison(problem: &Problem, runs: Vec<SearchRun>, verbosity: Verbosity) -> SolveReport {
    solver_log!(verbosity, Changes, "=== Comparison summary ===");
    for run in &runs {
        let ok = if run.outcome.is_solved() { "OK" } else { "FAIL" };
        let cost = run
            .metrics
            .final_cost
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        solver_log!(
            verbosity,
            Changes,
            "{:>5} | {:>4} | iterations={:>6} | expanded={:>6} | max_frontier={:>6} | time={:.4}s | cost={}",
            run.strategy.label(),
            ok,
            run.metrics.iterations,
            run.metrics.expanded,
            run.metrics.max_frontier_size,
            run.metrics.elapsed.as_secs_f64(),
            cost
        );
    }

    let winner = runs.iter().find(|r| r.outcome.is_solved());
    let (status, document) = match winner {
        Some(run) => {
            let state = run.outcome.solution();
            if let Some(state) = state {
                solver_log!(
                    verbosity,
                    Changes,
                    "\n{}",
                    render_schedule(problem, state)
                );
            }
            (
                SolveStatus::Success,
                build_document(problem, run.strategy.label(), state),
            )
        }
        None => {
            let timed_out = runs
                .iter()
                .any(|r| matches!(r.outcome, SearchOutcome::DeadlineExceeded));
            let status = if timed_out {
                SolveStatus::Timeout
            } else {
                SolveStatus::Infeasible
            };
            (status, build_document(problem, StrategySpec::All.label(), None))
        }
    };
    SolveReport {
        status,
        document,
        runs,
        infeasible_events: Vec::new(),
    }
}

fn log_run_outcome(problem: &Problem, run: &SearchRun, verbosity: Verbosity) {
    match &run.outcome {
        SearchOutcome::Solved(state) => {
            solver_log!(
                verbosity,
                Changes,
                "Feasible schedule found ({}): events_scheduled={}/{}",
                run.strategy.label(),
                state.len(),
                problem.events.len()
            );
            solver_log!(verbosity, Changes, "{}", render_schedule(problem, state));
        }
        SearchOutcome::Exhausted => {
            solver_log!(
                verbosity,
                Changes,
                "No feasible schedule found ({}): frontier exhausted after {} iterations",
                run.strategy.label(),
                run.metrics.iterations
            );
        }
        SearchOutcome::DeadlineExceeded => {
            solver_log!(
                verbosity,
                Changes,
                "Search deadline exceeded ({}) after {} iterations",
                run.strategy.label(),
                run.metrics.iterations
            );
        }
    }
}
