//! Immutable partial-schedule states.

use crate::models::Assignment;

/// A partial schedule: the set of assignments made so far.
///
/// The vector is kept sorted by event index, which makes the state its
/// own canonical fingerprint: two branches reaching the same assignment
/// set through different orderings compare (and hash) equal, so the
/// explored set deduplicates them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SearchState {
    assignments: Vec<Assignment>,
}

impl SearchState {
    /// The empty schedule.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Assignments in event-index order.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn contains_event(&self, event: u32) -> bool {
        self.assignments
            .binary_search_by_key(&event, |a| a.event)
            .is_ok()
    }

    /// A new state extending this one by a single assignment.
    ///
    /// The event must not already be assigned; states only ever grow by
    /// fresh events along a branch.
    pub fn with(&self, assignment: Assignment) -> SearchState {
        let pos = self
            .assignments
            .partition_point(|a| a.event < assignment.event);
        debug_assert!(
            pos == self.assignments.len() || self.assignments[pos].event != assignment.event
        );
        let mut assignments = Vec::with_capacity(self.assignments.len() + 1);
        assignments.extend_from_slice(&self.assignments[..pos]);
        assignments.push(assignment);
        assignments.extend_from_slice(&self.assignments[pos..]);
        SearchState { assignments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a(event: u32, slot: u32, room: u32) -> Assignment {
        Assignment { event, slot, room }
    }

    #[test]
    fn test_with_keeps_event_order() {
        let state = SearchState::empty().with(a(2, 0, 0)).with(a(0, 1, 1)).with(a(1, 2, 0));
        let events: Vec<u32> = state.assignments().iter().map(|x| x.event).collect();
        assert_eq!(events, vec![0, 1, 2]);
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn test_canonical_equality_across_orderings() {
        let forward = SearchState::empty().with(a(0, 1, 0)).with(a(1, 0, 0));
        let backward = SearchState::empty().with(a(1, 0, 0)).with(a(0, 1, 0));
        assert_eq!(forward, backward);

        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let hash = |s: &SearchState| {
            let mut h = DefaultHasher::new();
            s.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&forward), hash(&backward));
    }

    #[test]
    fn test_contains_event() {
        let state = SearchState::empty().with(a(3, 0, 0));
        assert!(state.contains_event(3));
        assert!(!state.contains_event(0));
        assert!(SearchState::empty().is_empty());
    }
}
