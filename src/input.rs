//! Serde types for the input document.
//!
//! These mirror the JSON shape one-to-one and carry no semantics; all
//! resolution and invariant checking happens in `problem.rs`. A document
//! that fails to deserialize is malformed input, full stop.

use serde::Deserialize;

/// Top-level input document.
#[derive(Debug, Clone, Deserialize)]
pub struct InputDoc {
    #[serde(default)]
    pub config: ConfigDoc,
    pub timeslots: Vec<TimeslotDoc>,
    pub rooms: Vec<RoomDoc>,
    pub teachers: Vec<TeacherDoc>,
    pub sessions: Vec<SessionDoc>,
}

/// The `config` block. Every key is optional; defaults are applied during
/// problem construction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDoc {
    pub week_name: Option<String>,
    pub weeks_total: Option<u32>,
    pub strategy: Option<String>,
    pub use_mrv: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeslotDoc {
    pub id: String,
    pub day: String,
    pub start: String,
    pub end: String,
    pub duration_min: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomDoc {
    pub id: String,
    pub capacity: u32,
    /// Empty or absent = always available.
    #[serde(default)]
    pub available: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeacherDoc {
    pub id: String,
    /// Empty or absent = never available.
    #[serde(default)]
    pub available: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionDoc {
    pub id: String,
    #[serde(default)]
    pub groups: Vec<GroupDoc>,
    #[serde(default)]
    pub modules: Vec<ModuleDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupDoc {
    pub id: String,
    pub size: u32,
    #[serde(default)]
    pub available: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleDoc {
    pub id: String,
    /// Informational only.
    pub hours_per_week: Option<f64>,
    #[serde(default)]
    pub min_room_capacity: u32,
    pub weeks: Option<WeeksDoc>,
    #[serde(default)]
    pub events: Vec<EventDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventDoc {
    pub id: String,
    pub teacher_id: String,
    pub duration_min: u32,
    pub audience: AudienceDoc,
    /// Present-but-empty is legal and means "no slot qualifies".
    pub allowed_slots: Option<Vec<String>>,
    pub weeks: Option<WeeksDoc>,
}

/// Audience selector: the whole session or an explicit group list.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AudienceDoc {
    AllGroups,
    Groups { group_ids: Vec<String> },
}

/// Week-set specification in one of its three input modes.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum WeeksDoc {
    All,
    List { values: Vec<u32> },
    Ranges { values: Vec<String> },
}

impl InputDoc {
    /// Parses a JSON document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_document() {
        let doc = InputDoc::from_json(
            r#"{
                "timeslots": [
                    {"id": "t1", "day": "Mon", "start": "08:00", "end": "10:00", "duration_min": 120}
                ],
                "rooms": [{"id": "r1", "capacity": 30}],
                "teachers": [{"id": "T", "available": ["t1"]}],
                "sessions": [{
                    "id": "s1",
                    "groups": [{"id": "g1", "size": 10, "available": ["t1"]}],
                    "modules": [{
                        "id": "m1",
                        "events": [{
                            "id": "e1",
                            "teacher_id": "T",
                            "duration_min": 120,
                            "audience": {"type": "all_groups"}
                        }]
                    }]
                }]
            }"#,
        )
        .unwrap();

        assert!(doc.config.strategy.is_none());
        assert_eq!(doc.timeslots.len(), 1);
        assert!(doc.rooms[0].available.is_empty());
        assert!(doc.sessions[0].modules[0].events[0].allowed_slots.is_none());
    }

    #[test]
    fn test_weeks_modes() {
        let all: WeeksDoc = serde_json::from_str(r#"{"mode": "all"}"#).unwrap();
        assert!(matches!(all, WeeksDoc::All));

        let list: WeeksDoc =
            serde_json::from_str(r#"{"mode": "list", "values": [1, 3]}"#).unwrap();
        assert!(matches!(list, WeeksDoc::List { .. }));

        let ranges: WeeksDoc =
            serde_json::from_str(r#"{"mode": "ranges", "values": ["1-8"]}"#).unwrap();
        assert!(matches!(ranges, WeeksDoc::Ranges { .. }));

        assert!(serde_json::from_str::<WeeksDoc>(r#"{"mode": "odd"}"#).is_err());
    }

    #[test]
    fn test_audience_variants() {
        let groups: AudienceDoc =
            serde_json::from_str(r#"{"type": "groups", "group_ids": ["g1"]}"#).unwrap();
        assert!(matches!(groups, AudienceDoc::Groups { .. }));

        assert!(serde_json::from_str::<AudienceDoc>(r#"{"type": "everyone"}"#).is_err());
    }

    #[test]
    fn test_missing_required_section_is_malformed() {
        assert!(InputDoc::from_json(r#"{"timeslots": []}"#).is_err());
    }
}
