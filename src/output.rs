//! Solution document construction.
//!
//! Builds the serializable output from a goal state (or the failure
//! shell when there is none) and renders the human-readable schedule
//! dump used at CHANGES verbosity. All fields here are presentation:
//! nothing feeds back into feasibility.

use serde::Serialize;

use crate::problem::Problem;
use crate::search::SearchState;

/// Top-level output document.
#[derive(Debug, Clone, Serialize)]
pub struct OutputDoc {
    pub meta: Meta,
    pub assignments: Vec<AssignmentDoc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub week_name: String,
    pub weeks_total: u32,
    pub strategy: String,
    pub use_mrv: bool,
    pub status: String,
    pub events_total: usize,
    pub events_scheduled: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentDoc {
    pub event_id: String,
    pub session_id: String,
    pub module_id: String,
    pub teacher_id: String,
    pub group_ids: Vec<String>,
    pub timeslot_id: String,
    pub room_id: String,
    /// Weeks the event runs on, ascending.
    pub weeks: Vec<u32>,
    pub duration_min: u32,
    pub duration_hours: f64,
    /// Passthrough from the module; null when absent.
    pub module_hours_per_week: Option<f64>,
    pub demand: u32,
    pub min_room_capacity: u32,
    pub required_capacity: u32,
    pub room_capacity: u32,
}

/// Builds the output document for a finished run. `state` is the goal
/// state when the search succeeded, `None` otherwise.
pub fn build_document(
    problem: &Problem,
    strategy_label: &str,
    state: Option<&SearchState>,
) -> OutputDoc {
    let assignments: Vec<AssignmentDoc> = match state {
        None => Vec::new(),
        Some(state) => state
            .assignments()
            .iter()
            .map(|a| {
                let event_ix = a.event as usize;
                let e = &problem.events[event_ix];
                let module = &problem.modules[e.module];
                let room = &problem.rooms[a.room as usize];
                AssignmentDoc {
                    event_id: e.id.clone(),
                    session_id: problem.sessions[e.session].id.clone(),
                    module_id: module.id.clone(),
                    teacher_id: problem.teachers[e.teacher].id.clone(),
                    group_ids: e
                        .groups
                        .iter()
                        .map(|&g| problem.groups[g].id.clone())
                        .collect(),
                    timeslot_id: problem.timeslots[a.slot as usize].id.clone(),
                    room_id: room.id.clone(),
                    weeks: e.weeks.to_sorted_list(),
                    duration_min: e.duration_min,
                    duration_hours: f64::from(e.duration_min) / 60.0,
                    module_hours_per_week: module.hours_per_week,
                    demand: e.demand,
                    min_room_capacity: module.min_room_capacity,
                    required_capacity: problem.required_capacity(event_ix),
                    room_capacity: room.capacity,
                }
            })
            .collect(),
    };

    let events_scheduled = assignments.len();
    let status = if state.is_some() { "success" } else { "failure" };
    OutputDoc {
        meta: Meta {
            week_name: problem.config.week_name.clone(),
            weeks_total: problem.config.weeks_total,
            strategy: strategy_label.to_string(),
            use_mrv: problem.config.use_mrv,
            status: status.to_string(),
            events_total: problem.events.len(),
            events_scheduled,
        },
        assignments,
    }
}

/// Human-readable schedule, one line per assignment, ordered by day,
/// start time, then event id.
pub fn render_schedule(problem: &Problem, state: &SearchState) -> String {
    let mut rows: Vec<&crate::models::Assignment> = state.assignments().iter().collect();
    rows.sort_by_key(|a| {
        let slot = &problem.timeslots[a.slot as usize];
        let event = &problem.events[a.event as usize];
        (
            slot.day.num_days_from_monday(),
            slot.start,
            event.id.clone(),
        )
    });

    let mut out = String::new();
    for a in rows {
        let slot = &problem.timeslots[a.slot as usize];
        let e = &problem.events[a.event as usize];
        let room = &problem.rooms[a.room as usize];
        let groups: Vec<&str> = e
            .groups
            .iter()
            .map(|&g| problem.groups[g].id.as_str())
            .collect();
        out.push_str(&format!(
            "- {} {}-{} | event={} | teacher={} | groups={:?} | room={} | required={}/{} | weeks={} | session={} module={}\n",
            slot.day,
            slot.start.format("%H:%M"),
            slot.end.format("%H:%M"),
            e.id,
            problem.teachers[e.teacher].id,
            groups,
            room.id,
            problem.required_capacity(a.event as usize),
            room.capacity,
            e.weeks.to_ranges_string(),
            problem.sessions[e.session].id,
            problem.modules[e.module].id,
        ));
    }
    out
}
