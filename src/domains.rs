//! Per-event unary domain pre-computation.
//!
//! For each event this computes every (slot, room) pair that survives the
//! six unary rules, in slot-declared then room-declared order. Domain
//! sizes feed MRV; an event whose domain is already empty here makes the
//! whole problem infeasible before any search starts, and the diagnostic
//! names the rule that eliminated the last candidate.

use std::fmt;

use crate::problem::Problem;

/// The unary rule that emptied an event's domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryRule {
    Duration,
    AllowedSlots,
    TeacherAvailability,
    GroupAvailability,
    RoomAvailability,
    Capacity,
}

impl fmt::Display for UnaryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnaryRule::Duration => "no timeslot matches the event duration",
            UnaryRule::AllowedSlots => "the allowed-slots whitelist excludes every timeslot",
            UnaryRule::TeacherAvailability => "the teacher is available in none of the timeslots",
            UnaryRule::GroupAvailability => "some audience group is unavailable in every timeslot",
            UnaryRule::RoomAvailability => "no room is available in any remaining timeslot",
            UnaryRule::Capacity => "no available room meets the required capacity",
        };
        f.write_str(text)
    }
}

/// Diagnostic for an event with an empty unary domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyDomain {
    pub event: usize,
    pub rule: UnaryRule,
}

/// Pre-computed (slot, room) domains, one list per event.
#[derive(Clone, Debug)]
pub struct DomainTable {
    domains: Vec<Vec<(u32, u32)>>,
    empty: Vec<EmptyDomain>,
}

impl DomainTable {
    /// Computes domains for every event of the problem.
    pub fn build(problem: &Problem) -> Self {
        let mut domains = Vec::with_capacity(problem.events.len());
        let mut empty = Vec::new();
        for event in 0..problem.events.len() {
            match build_event_domain(problem, event) {
                Ok(pairs) => domains.push(pairs),
                Err(rule) => {
                    empty.push(EmptyDomain { event, rule });
                    domains.push(Vec::new());
                }
            }
        }
        Self { domains, empty }
    }

    /// The event's candidate pairs in enumeration order.
    pub fn pairs(&self, event: usize) -> &[(u32, u32)] {
        &self.domains[event]
    }

    /// `|domain(event)|`, the static MRV estimate.
    pub fn size(&self, event: usize) -> usize {
        self.domains[event].len()
    }

    pub fn contains(&self, event: usize, slot: u32, room: u32) -> bool {
        self.domains[event].iter().any(|&p| p == (slot, room))
    }

    /// Events whose domain came out empty, with the excluding rule.
    pub fn empty_domains(&self) -> &[EmptyDomain] {
        &self.empty
    }

    /// Whether every event has at least one candidate pair.
    pub fn is_feasible(&self) -> bool {
        self.empty.is_empty()
    }
}

/// Applies the six unary rules in order; reports the first rule after
/// which no candidate remains.
fn build_event_domain(problem: &Problem, event: usize) -> Result<Vec<(u32, u32)>, UnaryRule> {
    let e = &problem.events[event];

    let mut slots: Vec<usize> = (0..problem.timeslots.len())
        .filter(|&s| problem.timeslots[s].duration_min == e.duration_min)
        .collect();
    if slots.is_empty() {
        return Err(UnaryRule::Duration);
    }

    if let Some(allowed) = &e.allowed_slots {
        slots.retain(|s| allowed.contains(s));
        if slots.is_empty() {
            return Err(UnaryRule::AllowedSlots);
        }
    }

    let teacher = &problem.teachers[e.teacher];
    slots.retain(|s| teacher.available.contains(s));
    if slots.is_empty() {
        return Err(UnaryRule::TeacherAvailability);
    }

    slots.retain(|s| {
        e.groups
            .iter()
            .all(|&g| problem.groups[g].available.contains(s))
    });
    if slots.is_empty() {
        return Err(UnaryRule::GroupAvailability);
    }

    let mut pairs: Vec<(u32, u32)> = Vec::new();
    for &slot in &slots {
        for (room, r) in problem.rooms.iter().enumerate() {
            if r.available_at(slot) {
                pairs.push((slot as u32, room as u32));
            }
        }
    }
    if pairs.is_empty() {
        return Err(UnaryRule::RoomAvailability);
    }

    let required = problem.required_capacity(event);
    pairs.retain(|&(_, room)| problem.rooms[room as usize].capacity >= required);
    if pairs.is_empty() {
        return Err(UnaryRule::Capacity);
    }

    Ok(pairs)
}
