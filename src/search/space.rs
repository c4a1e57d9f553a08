//! State-space abstraction: constraint checking, variable selection and
//! successor enumeration over a fixed problem and its domain table.

use crate::domains::DomainTable;
use crate::models::Assignment;
use crate::problem::Problem;

use super::state::SearchState;

/// The search problem seen by every strategy.
///
/// Borrows the immutable problem model and pre-computed domains; owns no
/// mutable state, so one space can serve several sequential runs.
pub struct StateSpace<'a> {
    problem: &'a Problem,
    domains: &'a DomainTable,
    use_mrv: bool,
}

impl<'a> StateSpace<'a> {
    pub fn new(problem: &'a Problem, domains: &'a DomainTable) -> Self {
        Self::with_mrv(problem, domains, problem.config.use_mrv)
    }

    pub fn with_mrv(problem: &'a Problem, domains: &'a DomainTable, use_mrv: bool) -> Self {
        Self {
            problem,
            domains,
            use_mrv,
        }
    }

    /// The empty schedule.
    pub fn initial(&self) -> SearchState {
        SearchState::empty()
    }

    /// A state is a goal when every event is assigned.
    pub fn is_goal(&self, state: &SearchState) -> bool {
        state.len() == self.problem.events.len()
    }

    /// Lower bound on steps remaining to a goal.
    ///
    /// Zero for now; the hook exists so A* can be strengthened without
    /// touching the engine.
    pub fn heuristic(&self, _state: &SearchState) -> u64 {
        0
    }

    /// Whether placing `event` at (slot, room) preserves all pairwise
    /// constraints against the assignments in `state`.
    ///
    /// A prior assignment only matters when it occupies the same slot
    /// *and* its week-set intersects the candidate's; events on disjoint
    /// weeks never conflict.
    pub fn compatible(&self, state: &SearchState, event: usize, slot: u32, room: u32) -> bool {
        let e = &self.problem.events[event];
        for a in state.assignments() {
            if a.slot != slot {
                continue;
            }
            let other = &self.problem.events[a.event as usize];
            if !e.weeks.intersects(&other.weeks) {
                continue;
            }
            if other.teacher == e.teacher {
                return false;
            }
            if e.audience_overlaps(other) {
                return false;
            }
            if a.room == room {
                return false;
            }
        }
        true
    }

    /// Domain entries of `event` still compatible with `state`, in
    /// domain (slot-major, declared) order.
    pub fn compatible_candidates(&self, state: &SearchState, event: usize) -> Vec<(u32, u32)> {
        self.domains
            .pairs(event)
            .iter()
            .copied()
            .filter(|&(slot, room)| self.compatible(state, event, slot, room))
            .collect()
    }

    fn has_candidate(&self, state: &SearchState, event: usize) -> bool {
        self.domains
            .pairs(event)
            .iter()
            .any(|&(slot, room)| self.compatible(state, event, slot, room))
    }

    /// Picks the event to branch on and its candidate list.
    ///
    /// MRV on: the unassigned event with the fewest compatible
    /// candidates, ties broken by insertion order. MRV off: the first
    /// unassigned event. Either way, if some unassigned event has zero
    /// candidates the state has no goal-reachable descendants and an
    /// empty candidate list is returned.
    fn select_event(&self, state: &SearchState) -> Option<(usize, Vec<(u32, u32)>)> {
        let unassigned: Vec<usize> = (0..self.problem.events.len())
            .filter(|&e| !state.contains_event(e as u32))
            .collect();
        let (&first, rest) = unassigned.split_first()?;

        if self.use_mrv {
            let mut best: Option<(usize, Vec<(u32, u32)>)> = None;
            for &e in &unassigned {
                let candidates = self.compatible_candidates(state, e);
                if candidates.is_empty() {
                    return Some((e, candidates));
                }
                let better = match &best {
                    Some((_, current)) => candidates.len() < current.len(),
                    None => true,
                };
                if better {
                    best = Some((e, candidates));
                }
            }
            best
        } else {
            for &e in rest {
                if !self.has_candidate(state, e) {
                    return Some((e, Vec::new()));
                }
            }
            Some((first, self.compatible_candidates(state, first)))
        }
    }

    /// Successor triples `(action, child, step_cost)`.
    ///
    /// Candidates of the selected event are enumerated slots first (in
    /// declared order), rooms within a slot in declared order; step cost
    /// is always 1.
    pub fn successors(&self, state: &SearchState) -> Vec<(Assignment, SearchState, u64)> {
        let Some((event, candidates)) = self.select_event(state) else {
            return Vec::new();
        };
        candidates
            .into_iter()
            .map(|(slot, room)| {
                let action = Assignment {
                    event: event as u32,
                    slot,
                    room,
                };
                (action, state.with(action), 1)
            })
            .collect()
    }
}
