use serde::{Deserialize, Serialize};

use crate::grades::GradeSet;

/// One timetable slot. The server omits the whole block when a course
/// has no schedule yet.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Schedule {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub room: String,
}

/// A class on a student's timetable, grades included.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClassRecord {
    #[serde(deserialize_with = "crate::course::id_string")]
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub lecturer: String,
    #[serde(default)]
    pub schedule: Option<Schedule>,
    #[serde(default)]
    pub grades: GradeSet,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn schedule_may_be_null() {
        let raw = r#"{
            "id": "DBT201",
            "code": "DBT201",
            "name": "Data & Business Technology",
            "schedule": null,
            "lecturer": "TBA",
            "grades": {"classwork": 85, "midterm": 78, "finals": 90}
        }"#;

        let class: ClassRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(class.schedule, None);
        assert_eq!(class.grades.finals, 90.0);
    }
}
