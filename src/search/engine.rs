//! Shared search skeleton.
//!
//! One loop serves all four strategies: pop, (cooperatively) check the
//! deadline, skip already-explored fingerprints, goal-test, expand. The
//! strategy only decides which frontier is used and how priorities are
//! derived, so goal testing, explored-set handling and metrics are never
//! duplicated.

use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;

use crate::logging::Verbosity;
use crate::solver_log;

use super::frontier::{BestFirstFrontier, FifoFrontier, Frontier, FrontierEntry, LifoFrontier};
use super::space::StateSpace;
use super::state::SearchState;
use super::Strategy;

/// Counters accumulated over one run.
#[derive(Clone, Debug, Default)]
pub struct SearchMetrics {
    /// States popped from the frontier.
    pub iterations: u64,
    /// States whose successors were generated.
    pub expanded: u64,
    /// Peak frontier size observed.
    pub max_frontier_size: usize,
    /// Path cost of the returned goal, when one was found.
    pub final_cost: Option<u64>,
    pub elapsed: Duration,
}

/// How a run ended. Exhaustion and deadline expiry are normal outcomes,
/// not errors.
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    Solved(SearchState),
    Exhausted,
    DeadlineExceeded,
}

impl SearchOutcome {
    pub fn solution(&self) -> Option<&SearchState> {
        match self {
            SearchOutcome::Solved(state) => Some(state),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SearchOutcome::Solved(_))
    }
}

/// Outcome plus metrics for one strategy run.
#[derive(Clone, Debug)]
pub struct SearchRun {
    pub strategy: Strategy,
    pub outcome: SearchOutcome,
    pub metrics: SearchMetrics,
}

/// Runs one strategy to the first goal, frontier exhaustion, or the
/// deadline.
pub fn run(
    space: &StateSpace<'_>,
    strategy: Strategy,
    deadline: Option<Instant>,
    verbosity: Verbosity,
) -> SearchRun {
    match strategy {
        Strategy::Dfs => run_with(space, strategy, LifoFrontier::default(), deadline, verbosity),
        Strategy::Bfs => run_with(space, strategy, FifoFrontier::default(), deadline, verbosity),
        Strategy::Ucs | Strategy::AStar => {
            run_with(space, strategy, BestFirstFrontier::default(), deadline, verbosity)
        }
    }
}

fn run_with<F: Frontier>(
    space: &StateSpace<'_>,
    strategy: Strategy,
    mut frontier: F,
    deadline: Option<Instant>,
    verbosity: Verbosity,
) -> SearchRun {
    let started = Instant::now();
    let mut metrics = SearchMetrics::default();
    let mut explored: FxHashSet<SearchState> = FxHashSet::default();

    let initial = space.initial();
    let h = space.heuristic(&initial);
    frontier.push(FrontierEntry::new(initial, 0, priority_of(strategy, 0, h)));
    metrics.max_frontier_size = 1;

    while let Some(entry) = frontier.pop() {
        if let Some(limit) = deadline {
            if Instant::now() >= limit {
                metrics.elapsed = started.elapsed();
                return SearchRun {
                    strategy,
                    outcome: SearchOutcome::DeadlineExceeded,
                    metrics,
                };
            }
        }
        metrics.iterations += 1;

        if explored.contains(&entry.state) {
            continue;
        }

        if space.is_goal(&entry.state) {
            metrics.final_cost = Some(entry.cost);
            metrics.elapsed = started.elapsed();
            solver_log!(
                verbosity,
                Debug,
                "  [{}] goal at cost {} after {} iterations",
                strategy.label(),
                entry.cost,
                metrics.iterations
            );
            return SearchRun {
                strategy,
                outcome: SearchOutcome::Solved(entry.state),
                metrics,
            };
        }

        explored.insert(entry.state.clone());
        metrics.expanded += 1;

        let successors = space.successors(&entry.state);
        solver_log!(
            verbosity,
            Debug,
            "  [{}] expand depth={} children={} frontier={}",
            strategy.label(),
            entry.state.len(),
            successors.len(),
            frontier.len()
        );

        let batch: Vec<FrontierEntry> = successors
            .into_iter()
            .filter(|(_, child, _)| !explored.contains(child))
            .map(|(_, child, step)| {
                let g = entry.cost + step;
                let h = space.heuristic(&child);
                FrontierEntry::new(child, g, priority_of(strategy, g, h))
            })
            .collect();
        frontier.extend(batch);
        metrics.max_frontier_size = metrics.max_frontier_size.max(frontier.len());
    }

    metrics.elapsed = started.elapsed();
    SearchRun {
        strategy,
        outcome: SearchOutcome::Exhausted,
        metrics,
    }
}

/// Frontier ordering key: unused for DFS/BFS, `g` for UCS, `g + h` for A*.
fn priority_of(strategy: Strategy, g: u64, h: u64) -> u64 {
    match strategy {
        Strategy::Dfs | Strategy::Bfs => 0,
        Strategy::Ucs => g,
        Strategy::AStar => g + h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::DomainTable;
    use crate::input::InputDoc;
    use crate::problem::Problem;
    use serde_json::json;

    fn problem(value: serde_json::Value) -> Problem {
        let doc: InputDoc = serde_json::from_value(value).unwrap();
        Problem::from_document(&doc).unwrap()
    }

    fn trivial_doc() -> serde_json::Value {
        json!({
            "timeslots": [
                {"id": "mon_08_10", "day": "Mon", "start": "08:00", "end": "10:00", "duration_min": 120},
                {"id": "mon_10_12", "day": "Mon", "start": "10:00", "end": "12:00", "duration_min": 120}
            ],
            "rooms": [{"id": "r", "capacity": 30}],
            "teachers": [{"id": "t", "available": ["mon_08_10", "mon_10_12"]}],
            "sessions": [{
                "id": "s1",
                "groups": [{"id": "g", "size": 10, "available": ["mon_08_10", "mon_10_12"]}],
                "modules": [{
                    "id": "m1",
                    "events": [{
                        "id": "e",
                        "teacher_id": "t",
                        "duration_min": 120,
                        "audience": {"type": "all_groups"}
                    }]
                }]
            }]
        })
    }

    fn two_events_one_slot(first_weeks: &str, second_weeks: &str) -> serde_json::Value {
        json!({
            "timeslots": [
                {"id": "mon", "day": "Mon", "start": "08:00", "end": "10:00", "duration_min": 120}
            ],
            "rooms": [{"id": "r", "capacity": 30}],
            "teachers": [{"id": "t", "available": ["mon"]}],
            "sessions": [{
                "id": "s1",
                "groups": [{"id": "g", "size": 10, "available": ["mon"]}],
                "modules": [{
                    "id": "m1",
                    "events": [
                        {
                            "id": "e1",
                            "teacher_id": "t",
                            "duration_min": 120,
                            "audience": {"type": "all_groups"},
                            "weeks": {"mode": "ranges", "values": [first_weeks]}
                        },
                        {
                            "id": "e2",
                            "teacher_id": "t",
                            "duration_min": 120,
                            "audience": {"type": "all_groups"},
                            "weeks": {"mode": "ranges", "values": [second_weeks]}
                        }
                    ]
                }]
            }]
        })
    }

    #[test]
    fn test_dfs_takes_first_declared_slot() {
        let p = problem(trivial_doc());
        let table = DomainTable::build(&p);
        let space = StateSpace::new(&p, &table);
        let run = run(&space, Strategy::Dfs, None, Verbosity::Silent);
        let state = run.outcome.solution().expect("trivial problem must solve");
        assert_eq!(state.assignments().len(), 1);
        assert_eq!(state.assignments()[0].slot, 0, "first declared slot wins under DFS");
        assert_eq!(state.assignments()[0].room, 0);
        assert_eq!(run.metrics.final_cost, Some(1));
    }

    #[test]
    fn test_all_strategies_agree_on_feasibility() {
        let p = problem(trivial_doc());
        let table = DomainTable::build(&p);
        let space = StateSpace::new(&p, &table);
        for strategy in Strategy::ALL {
            let run = run(&space, strategy, None, Verbosity::Silent);
            assert!(run.outcome.is_solved(), "{} failed", strategy.label());
            assert_eq!(run.metrics.final_cost, Some(1));
        }
    }

    #[test]
    fn test_disjoint_weeks_share_the_single_slot() {
        let p = problem(two_events_one_slot("1-8", "9-16"));
        let table = DomainTable::build(&p);
        let space = StateSpace::new(&p, &table);
        let run = run(&space, Strategy::Dfs, None, Verbosity::Silent);
        let state = run.outcome.solution().expect("disjoint weeks must coexist");
        assert_eq!(state.assignments().len(), 2);
        assert_eq!(state.assignments()[0].slot, state.assignments()[1].slot);
        assert_eq!(state.assignments()[0].room, state.assignments()[1].room);
    }

    #[test]
    fn test_overlapping_weeks_exhaust_the_frontier() {
        let p = problem(two_events_one_slot("1-10", "8-16"));
        let table = DomainTable::build(&p);
        let space = StateSpace::new(&p, &table);
        for strategy in Strategy::ALL {
            let run = run(&space, strategy, None, Verbosity::Silent);
            assert!(
                matches!(run.outcome, SearchOutcome::Exhausted),
                "{} should exhaust",
                strategy.label()
            );
            assert!(run.metrics.final_cost.is_none());
        }
    }

    #[test]
    fn test_metrics_are_populated() {
        let p = problem(trivial_doc());
        let table = DomainTable::build(&p);
        let space = StateSpace::new(&p, &table);
        let run = run(&space, Strategy::Bfs, None, Verbosity::Silent);
        assert!(run.metrics.iterations >= 2);
        assert!(run.metrics.expanded >= 1);
        assert!(run.metrics.max_frontier_size >= 1);
    }

    #[test]
    fn test_expired_deadline_reports_timeout() {
        let p = problem(trivial_doc());
        let table = DomainTable::build(&p);
        let space = StateSpace::new(&p, &table);
        let run = run(&space, Strategy::Dfs, Some(Instant::now()), Verbosity::Silent);
        assert!(matches!(run.outcome, SearchOutcome::DeadlineExceeded));
    }

    #[test]
    fn test_determinism_across_runs() {
        let p = problem(two_events_one_slot("1-8", "5-16"));
        let table = DomainTable::build(&p);
        let space = StateSpace::new(&p, &table);
        for strategy in Strategy::ALL {
            let first = run(&space, strategy, None, Verbosity::Silent);
            let second = run(&space, strategy, None, Verbosity::Silent);
            assert_eq!(
                first.outcome.solution().map(|s| s.assignments().to_vec()),
                second.outcome.solution().map(|s| s.assignments().to_vec())
            );
            assert_eq!(first.metrics.iterations, second.metrics.iterations);
            assert_eq!(first.metrics.expanded, second.metrics.expanded);
        }
    }
}
