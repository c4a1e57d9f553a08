//! Core data types for the timetabling problem.
//!
//! These are the *resolved* entities the solver works with: every
//! cross-reference has been replaced by a dense index into the owning
//! [`crate::problem::Problem`] vectors, and week specifications have been
//! normalized to [`WeekSet`] bitmasks. Construction and validation live in
//! `problem.rs`; nothing downstream re-checks input shape.

use chrono::{NaiveTime, Weekday};
use rustc_hash::FxHashSet;

use crate::weeks::WeekSet;

/// A weekly timeslot with fixed wall-clock boundaries.
#[derive(Clone, Debug)]
pub struct TimeSlot {
    pub id: String,
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub duration_min: u32,
}

/// A room. `available = None` means the room is usable in every slot.
#[derive(Clone, Debug)]
pub struct Room {
    pub id: String,
    pub capacity: u32,
    /// Slot indices the room may host. None = always available.
    pub available: Option<FxHashSet<usize>>,
}

impl Room {
    /// Whether the room may host events in the given slot.
    pub fn available_at(&self, slot: usize) -> bool {
        match &self.available {
            None => true,
            Some(slots) => slots.contains(&slot),
        }
    }
}

/// A teacher. An empty availability set means *never* available; this is
/// deliberately the opposite convention from rooms.
#[derive(Clone, Debug)]
pub struct Teacher {
    pub id: String,
    pub available: FxHashSet<usize>,
}

/// A student group. Availability follows the teacher convention
/// (empty = never available).
#[derive(Clone, Debug)]
pub struct Group {
    pub id: String,
    pub session: usize,
    pub size: u32,
    pub available: FxHashSet<usize>,
}

/// A session (cohort): an ordered collection of groups and modules.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: String,
    /// Group indices in declaration order.
    pub groups: Vec<usize>,
    /// Event indices belonging to this session, in declaration order.
    pub events: Vec<usize>,
}

/// A module (course unit) within a session.
#[derive(Clone, Debug)]
pub struct Module {
    pub id: String,
    pub session: usize,
    /// Informational passthrough; never used for feasibility.
    pub hours_per_week: Option<f64>,
    pub min_room_capacity: u32,
    /// Default week-set inherited by events that declare none.
    pub weeks: WeekSet,
}

/// A teaching event: the unit of assignment.
#[derive(Clone, Debug)]
pub struct Event {
    pub id: String,
    pub session: usize,
    pub module: usize,
    pub teacher: usize,
    /// Resolved audience, deduplicated, in session declaration order for
    /// `all_groups` and in listed order otherwise.
    pub groups: Vec<usize>,
    pub duration_min: u32,
    /// Slot whitelist. None = unconstrained; Some(empty) is legal input
    /// and yields an empty domain.
    pub allowed_slots: Option<FxHashSet<usize>>,
    /// Effective weeks: event weeks, else module weeks, else all.
    pub weeks: WeekSet,
    /// Sum of audience group sizes.
    pub demand: u32,
}

impl Event {
    /// Whether the two events share at least one audience group.
    ///
    /// Both group lists are small in practice, so a nested scan beats
    /// building a set per call.
    pub fn audience_overlaps(&self, other: &Event) -> bool {
        self.groups.iter().any(|g| other.groups.contains(g))
    }
}

/// A placement of one event into a (timeslot, room) pair.
///
/// Indices are `u32` so a whole partial schedule stays compact for state
/// hashing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Assignment {
    pub event: u32,
    pub slot: u32,
    pub room: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_availability_conventions() {
        let open = Room {
            id: "R1".to_string(),
            capacity: 30,
            available: None,
        };
        assert!(open.available_at(0));
        assert!(open.available_at(99));

        let restricted = Room {
            id: "R2".to_string(),
            capacity: 30,
            available: Some([1usize].into_iter().collect()),
        };
        assert!(restricted.available_at(1));
        assert!(!restricted.available_at(0));
    }

    #[test]
    fn test_audience_overlap() {
        let weeks = WeekSet::all(1);
        let mk = |groups: Vec<usize>| Event {
            id: "e".to_string(),
            session: 0,
            module: 0,
            teacher: 0,
            groups,
            duration_min: 60,
            allowed_slots: None,
            weeks: weeks.clone(),
            demand: 0,
        };
        assert!(mk(vec![0, 1]).audience_overlaps(&mk(vec![1, 2])));
        assert!(!mk(vec![0, 1]).audience_overlaps(&mk(vec![2, 3])));
    }

    #[test]
    fn test_assignment_ordering_is_by_event_first() {
        let a = Assignment {
            event: 0,
            slot: 5,
            room: 5,
        };
        let b = Assignment {
            event: 1,
            slot: 0,
            room: 0,
        };
        assert!(a < b);
    }
}
