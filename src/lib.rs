//! Week-aware feasible timetabling via constraint-satisfaction search.
//!
//! Given timeslots, rooms, teachers and sessions (groups, modules,
//! events), the solver assigns every event a (timeslot, room) pair such
//! that no teacher, group or room is double-booked, capacities and
//! availabilities are honored, and events whose week-sets are disjoint
//! may share a slot and room. Four interchangeable strategies (DFS, BFS,
//! UCS, A*) run over one shared engine; for a fixed input the result is
//! fully deterministic.

pub mod domains;
pub mod driver;
pub mod input;
pub mod logging;
pub mod models;
pub mod output;
pub mod problem;
pub mod search;
pub mod weeks;

pub use driver::{
    solve_document, solve_file, solve_problem, solve_str, DriverOptions, SolveError, SolveReport,
    SolveStatus,
};
pub use logging::Verbosity;
pub use problem::{Problem, ProblemError, SolveConfig};
pub use search::{SearchMetrics, SearchOutcome, Strategy, StrategySpec};
pub use weeks::WeekSet;
