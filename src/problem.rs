//! Problem model construction and validation.
//!
//! This is the single place where the untyped input document is checked
//! and translated into the typed, fully resolved [`Problem`]. Everything
//! downstream (domain pre-computation, the search) treats the model as
//! read-only and assumes the invariants enforced here.

use chrono::{NaiveTime, Weekday};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::input::{AudienceDoc, ConfigDoc, InputDoc, WeeksDoc};
use crate::models::{Event, Group, Module, Room, Session, Teacher, TimeSlot};
use crate::search::StrategySpec;
use crate::weeks::{WeekSet, WeekSetError};

/// Semester length applied when the config omits `weeks_total`.
pub const DEFAULT_WEEKS_TOTAL: u32 = 16;

/// Validation failures. Each variant names the offending entity and the
/// rule it broke; none of these are recoverable by the solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("timeslot {slot}: unknown day '{day}'")]
    InvalidDay { slot: String, day: String },
    #[error("timeslot {slot}: invalid time '{time}' (expected HH:MM)")]
    InvalidTime { slot: String, time: String },
    #[error("timeslot {slot}: start {start} is not before end {end}")]
    StartNotBeforeEnd {
        slot: String,
        start: String,
        end: String,
    },
    #[error("{kind} {owner}: unknown timeslot id: {slot}")]
    UnknownTimeslot {
        kind: &'static str,
        owner: String,
        slot: String,
    },
    #[error("event {event}: unknown teacher id: {teacher}")]
    UnknownTeacher { event: String, teacher: String },
    #[error("event {event}: unknown group id: {group}")]
    UnknownGroup { event: String, group: String },
    #[error("event {event}: group {group} belongs to session {actual}, not {expected}")]
    GroupOutsideSession {
        event: String,
        group: String,
        expected: String,
        actual: String,
    },
    #[error("event {event}: explicit audience must list at least one group")]
    EmptyAudience { event: String },
    #[error(
        "event {event}: allowed slot {slot} lasts {slot_duration} min \
         but the event lasts {event_duration} min"
    )]
    AllowedSlotDuration {
        event: String,
        slot: String,
        slot_duration: u32,
        event_duration: u32,
    },
    #[error("weeks_total must be at least 1")]
    InvalidWeeksTotal,
    #[error("{kind} {owner}: {source}")]
    Weeks {
        kind: &'static str,
        owner: String,
        source: WeekSetError,
    },
    #[error("unknown strategy '{0}' (use one of: dfs, bfs, ucs, astar, all)")]
    UnknownStrategy(String),
}

/// Resolved `config` block.
#[derive(Clone, Debug)]
pub struct SolveConfig {
    pub week_name: String,
    pub weeks_total: u32,
    pub strategy: StrategySpec,
    pub use_mrv: bool,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            week_name: String::new(),
            weeks_total: DEFAULT_WEEKS_TOTAL,
            strategy: StrategySpec::default(),
            use_mrv: true,
        }
    }
}

impl SolveConfig {
    fn from_doc(doc: &ConfigDoc) -> Result<Self, ProblemError> {
        let defaults = Self::default();
        let weeks_total = doc.weeks_total.unwrap_or(defaults.weeks_total);
        if weeks_total == 0 {
            return Err(ProblemError::InvalidWeeksTotal);
        }
        let strategy = match &doc.strategy {
            None => defaults.strategy,
            Some(text) => StrategySpec::parse(text)
                .ok_or_else(|| ProblemError::UnknownStrategy(text.clone()))?,
        };
        Ok(Self {
            week_name: doc.week_name.clone().unwrap_or_default(),
            weeks_total,
            strategy,
            use_mrv: doc.use_mrv.unwrap_or(defaults.use_mrv),
        })
    }
}

/// The immutable, fully resolved timetabling problem.
///
/// All entity vectors preserve input declaration order; that order is
/// what makes variable selection and successor enumeration deterministic.
#[derive(Clone, Debug)]
pub struct Problem {
    pub config: SolveConfig,
    pub timeslots: Vec<TimeSlot>,
    pub rooms: Vec<Room>,
    pub teachers: Vec<Teacher>,
    pub groups: Vec<Group>,
    pub sessions: Vec<Session>,
    pub modules: Vec<Module>,
    pub events: Vec<Event>,
    event_index: FxHashMap<String, usize>,
}

impl Problem {
    /// Validates a parsed document and builds the resolved model.
    pub fn from_document(doc: &InputDoc) -> Result<Self, ProblemError> {
        Builder::new(doc)?.finish(doc)
    }

    pub fn event_by_id(&self, id: &str) -> Option<&Event> {
        self.event_index.get(id).map(|&ix| &self.events[ix])
    }

    /// Event indices of a session, in declaration order.
    pub fn events_by_session(&self, session: usize) -> &[usize] {
        &self.sessions[session].events
    }

    /// Resolved audience of an event, as group indices.
    pub fn audience_groups(&self, event: usize) -> &[usize] {
        &self.events[event].groups
    }

    pub fn module_of(&self, event: usize) -> &Module {
        &self.modules[self.events[event].module]
    }

    /// Weeks the event actually runs on (event weeks, else module weeks,
    /// else the full semester), resolved at construction time.
    pub fn effective_weeks(&self, event: usize) -> &WeekSet {
        &self.events[event].weeks
    }

    /// `max(demand, min_room_capacity of the owning module)`.
    pub fn required_capacity(&self, event: usize) -> u32 {
        let e = &self.events[event];
        e.demand.max(self.modules[e.module].min_room_capacity)
    }
}

/// Incremental resolver; exists so `from_document` reads top-down.
struct Builder {
    config: SolveConfig,
    timeslots: Vec<TimeSlot>,
    rooms: Vec<Room>,
    teachers: Vec<Teacher>,
    groups: Vec<Group>,
    sessions: Vec<Session>,
    modules: Vec<Module>,
    events: Vec<Event>,
    slot_index: FxHashMap<String, usize>,
    teacher_index: FxHashMap<String, usize>,
    group_index: FxHashMap<String, usize>,
    event_index: FxHashMap<String, usize>,
}

impl Builder {
    fn new(doc: &InputDoc) -> Result<Self, ProblemError> {
        Ok(Self {
            config: SolveConfig::from_doc(&doc.config)?,
            timeslots: Vec::new(),
            rooms: Vec::new(),
            teachers: Vec::new(),
            groups: Vec::new(),
            sessions: Vec::new(),
            modules: Vec::new(),
            events: Vec::new(),
            slot_index: FxHashMap::default(),
            teacher_index: FxHashMap::default(),
            group_index: FxHashMap::default(),
            event_index: FxHashMap::default(),
        })
    }

    fn finish(mut self, doc: &InputDoc) -> Result<Problem, ProblemError> {
        self.resolve_timeslots(doc)?;
        self.resolve_rooms(doc)?;
        self.resolve_teachers(doc)?;
        self.resolve_sessions(doc)?;
        Ok(Problem {
            config: self.config,
            timeslots: self.timeslots,
            rooms: self.rooms,
            teachers: self.teachers,
            groups: self.groups,
            sessions: self.sessions,
            modules: self.modules,
            events: self.events,
            event_index: self.event_index,
        })
    }

    fn resolve_timeslots(&mut self, doc: &InputDoc) -> Result<(), ProblemError> {
        for t in &doc.timeslots {
            if self.slot_index.contains_key(&t.id) {
                return Err(ProblemError::DuplicateId {
                    kind: "timeslot",
                    id: t.id.clone(),
                });
            }
            let day: Weekday = t.day.parse().map_err(|_| ProblemError::InvalidDay {
                slot: t.id.clone(),
                day: t.day.clone(),
            })?;
            let start = parse_time(&t.start).ok_or_else(|| ProblemError::InvalidTime {
                slot: t.id.clone(),
                time: t.start.clone(),
            })?;
            let end = parse_time(&t.end).ok_or_else(|| ProblemError::InvalidTime {
                slot: t.id.clone(),
                time: t.end.clone(),
            })?;
            if start >= end {
                return Err(ProblemError::StartNotBeforeEnd {
                    slot: t.id.clone(),
                    start: t.start.clone(),
                    end: t.end.clone(),
                });
            }
            self.slot_index.insert(t.id.clone(), self.timeslots.len());
            self.timeslots.push(TimeSlot {
                id: t.id.clone(),
                day,
                start,
                end,
                duration_min: t.duration_min,
            });
        }
        Ok(())
    }

    fn resolve_rooms(&mut self, doc: &InputDoc) -> Result<(), ProblemError> {
        let mut seen: FxHashMap<&str, ()> = FxHashMap::default();
        for r in &doc.rooms {
            if seen.insert(&r.id, ()).is_some() {
                return Err(ProblemError::DuplicateId {
                    kind: "room",
                    id: r.id.clone(),
                });
            }
            let available = if r.available.is_empty() {
                None
            } else {
                Some(self.resolve_slot_refs("room", &r.id, &r.available)?)
            };
            self.rooms.push(Room {
                id: r.id.clone(),
                capacity: r.capacity,
                available,
            });
        }
        Ok(())
    }

    fn resolve_teachers(&mut self, doc: &InputDoc) -> Result<(), ProblemError> {
        for t in &doc.teachers {
            if self.teacher_index.contains_key(&t.id) {
                return Err(ProblemError::DuplicateId {
                    kind: "teacher",
                    id: t.id.clone(),
                });
            }
            let available = self.resolve_slot_refs("teacher", &t.id, &t.available)?;
            self.teacher_index.insert(t.id.clone(), self.teachers.len());
            self.teachers.push(Teacher {
                id: t.id.clone(),
                available,
            });
        }
        Ok(())
    }

    fn resolve_sessions(&mut self, doc: &InputDoc) -> Result<(), ProblemError> {
        let mut session_seen: FxHashMap<&str, ()> = FxHashMap::default();
        let mut module_seen: FxHashMap<&str, ()> = FxHashMap::default();
        let weeks_total = self.config.weeks_total;

        for s in &doc.sessions {
            if session_seen.insert(&s.id, ()).is_some() {
                return Err(ProblemError::DuplicateId {
                    kind: "session",
                    id: s.id.clone(),
                });
            }
            let session_ix = self.sessions.len();
            let mut session = Session {
                id: s.id.clone(),
                groups: Vec::with_capacity(s.groups.len()),
                events: Vec::new(),
            };

            for g in &s.groups {
                if self.group_index.contains_key(&g.id) {
                    return Err(ProblemError::DuplicateId {
                        kind: "group",
                        id: g.id.clone(),
                    });
                }
                let available = self.resolve_slot_refs("group", &g.id, &g.available)?;
                self.group_index.insert(g.id.clone(), self.groups.len());
                session.groups.push(self.groups.len());
                self.groups.push(Group {
                    id: g.id.clone(),
                    session: session_ix,
                    size: g.size,
                    available,
                });
            }

            for m in &s.modules {
                if module_seen.insert(&m.id, ()).is_some() {
                    return Err(ProblemError::DuplicateId {
                        kind: "module",
                        id: m.id.clone(),
                    });
                }
                let module_ix = self.modules.len();
                let module_weeks = match &m.weeks {
                    Some(spec) => resolve_weeks(spec, weeks_total, "module", &m.id)?,
                    None => WeekSet::all(weeks_total),
                };
                self.modules.push(Module {
                    id: m.id.clone(),
                    session: session_ix,
                    hours_per_week: m.hours_per_week,
                    min_room_capacity: m.min_room_capacity,
                    weeks: module_weeks.clone(),
                });

                for e in &m.events {
                    let event_ix = self.resolve_event(
                        e,
                        session_ix,
                        &session,
                        module_ix,
                        &module_weeks,
                    )?;
                    session.events.push(event_ix);
                }
            }

            self.sessions.push(session);
        }
        Ok(())
    }

    fn resolve_event(
        &mut self,
        e: &crate::input::EventDoc,
        session_ix: usize,
        session: &Session,
        module_ix: usize,
        module_weeks: &WeekSet,
    ) -> Result<usize, ProblemError> {
        if self.event_index.contains_key(&e.id) {
            return Err(ProblemError::DuplicateId {
                kind: "event",
                id: e.id.clone(),
            });
        }

        let teacher =
            *self
                .teacher_index
                .get(&e.teacher_id)
                .ok_or_else(|| ProblemError::UnknownTeacher {
                    event: e.id.clone(),
                    teacher: e.teacher_id.clone(),
                })?;

        let groups = match &e.audience {
            AudienceDoc::AllGroups => session.groups.clone(),
            AudienceDoc::Groups { group_ids } => {
                if group_ids.is_empty() {
                    return Err(ProblemError::EmptyAudience { event: e.id.clone() });
                }
                let mut resolved = Vec::with_capacity(group_ids.len());
                for gid in group_ids {
                    let ix = *self.group_index.get(gid).ok_or_else(|| {
                        ProblemError::UnknownGroup {
                            event: e.id.clone(),
                            group: gid.clone(),
                        }
                    })?;
                    let owner = self.groups[ix].session;
                    if owner != session_ix {
                        return Err(ProblemError::GroupOutsideSession {
                            event: e.id.clone(),
                            group: gid.clone(),
                            expected: self.sessions_id_or(session_ix, &session.id),
                            actual: self.sessions_id_or(owner, &session.id),
                        });
                    }
                    if !resolved.contains(&ix) {
                        resolved.push(ix);
                    }
                }
                resolved
            }
        };

        let allowed_slots = match &e.allowed_slots {
            None => None,
            Some(ids) => {
                let set = self.resolve_slot_refs("event", &e.id, ids)?;
                for &slot in &set {
                    let slot_duration = self.timeslots[slot].duration_min;
                    if slot_duration != e.duration_min {
                        return Err(ProblemError::AllowedSlotDuration {
                            event: e.id.clone(),
                            slot: self.timeslots[slot].id.clone(),
                            slot_duration,
                            event_duration: e.duration_min,
                        });
                    }
                }
                Some(set)
            }
        };

        let weeks = match &e.weeks {
            Some(spec) => resolve_weeks(spec, self.config.weeks_total, "event", &e.id)?,
            None => module_weeks.clone(),
        };

        let demand = groups.iter().map(|&g| self.groups[g].size).sum();

        let event_ix = self.events.len();
        self.event_index.insert(e.id.clone(), event_ix);
        self.events.push(Event {
            id: e.id.clone(),
            session: session_ix,
            module: module_ix,
            teacher,
            groups,
            duration_min: e.duration_min,
            allowed_slots,
            weeks,
            demand,
        });
        Ok(event_ix)
    }

    fn resolve_slot_refs(
        &self,
        kind: &'static str,
        owner: &str,
        ids: &[String],
    ) -> Result<rustc_hash::FxHashSet<usize>, ProblemError> {
        ids.iter()
            .map(|id| {
                self.slot_index
                    .get(id)
                    .copied()
                    .ok_or_else(|| ProblemError::UnknownTimeslot {
                        kind,
                        owner: owner.to_string(),
                        slot: id.clone(),
                    })
            })
            .collect()
    }

    /// Session id for error messages; the current session is not yet in
    /// `self.sessions` while its events are being resolved.
    fn sessions_id_or(&self, ix: usize, current: &str) -> String {
        self.sessions
            .get(ix)
            .map(|s| s.id.clone())
            .unwrap_or_else(|| current.to_string())
    }
}

fn resolve_weeks(
    spec: &WeeksDoc,
    weeks_total: u32,
    kind: &'static str,
    owner: &str,
) -> Result<WeekSet, ProblemError> {
    let built = match spec {
        WeeksDoc::All => Ok(WeekSet::all(weeks_total)),
        WeeksDoc::List { values } => WeekSet::from_list(values, weeks_total),
        WeeksDoc::Ranges { values } => WeekSet::from_ranges(values, weeks_total),
    };
    built.map_err(|source| ProblemError::Weeks {
        kind,
        owner: owner.to_string(),
        source,
    })
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M").ok()
}
