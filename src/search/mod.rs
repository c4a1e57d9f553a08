//! Frontier-based search over partial timetables.
//!
//! The four strategies share one skeleton ([`engine::run`]); they differ
//! only in frontier discipline and priority key, which is exactly how the
//! engine is factored.

mod engine;
mod frontier;
mod space;
mod state;

pub use engine::{run, SearchMetrics, SearchOutcome, SearchRun};
pub use frontier::{BestFirstFrontier, FifoFrontier, Frontier, FrontierEntry, LifoFrontier};
pub use space::StateSpace;
pub use state::SearchState;

/// One concrete search algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Dfs,
    Bfs,
    Ucs,
    AStar,
}

impl Strategy {
    /// Canonical run order for comparison mode.
    pub const ALL: [Strategy; 4] = [Strategy::Dfs, Strategy::Bfs, Strategy::Ucs, Strategy::AStar];

    pub fn label(self) -> &'static str {
        match self {
            Strategy::Dfs => "dfs",
            Strategy::Bfs => "bfs",
            Strategy::Ucs => "ucs",
            Strategy::AStar => "astar",
        }
    }
}

/// Configured strategy: a single algorithm or the compare-all mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategySpec {
    Only(Strategy),
    All,
}

impl Default for StrategySpec {
    fn default() -> Self {
        StrategySpec::Only(Strategy::Dfs)
    }
}

impl StrategySpec {
    /// Parses the config `strategy` key. `a*`/`a_star` are accepted as
    /// aliases for `astar`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "dfs" => Some(StrategySpec::Only(Strategy::Dfs)),
            "bfs" => Some(StrategySpec::Only(Strategy::Bfs)),
            "ucs" => Some(StrategySpec::Only(Strategy::Ucs)),
            "astar" | "a*" | "a_star" => Some(StrategySpec::Only(Strategy::AStar)),
            "all" => Some(StrategySpec::All),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrategySpec::Only(s) => s.label(),
            StrategySpec::All => "all",
        }
    }
}
