use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::grades::GradeSet;

/// A course from the lecturer's dashboard listing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CourseRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub room: String,
    #[serde(default, rename = "nextSession", alias = "next_session")]
    pub next_session: String,
    #[serde(default)]
    pub students: Enrollment,
}

/// One student on a course roster.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StudentRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub grades: GradeSet,
}

/// The `students` field has been observed as a plain count, the
/// enrolled list itself, and a paginated/count object, depending on the
/// backend version. Kept polymorphic and normalized via [`count`].
///
/// [`count`]: Enrollment::count
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Enrollment {
    Count(f64),
    List(Vec<Value>),
    Object(Map<String, Value>),
    #[default]
    Missing,
    Other(Value),
}

impl Enrollment {
    pub fn count(&self) -> i64 {
        match self {
            Self::Count(n) if n.is_finite() => *n as i64,
            Self::Count(_) => 0,
            Self::List(items) => items.len() as i64,
            Self::Object(map) => {
                if let Some(count) = map.get("count").and_then(Value::as_f64) {
                    return count as i64;
                }
                if let Some(results) = map.get("results").and_then(Value::as_array) {
                    return results.len() as i64;
                }
                if let Some(data) = map.get("data").and_then(Value::as_array) {
                    return data.len() as i64;
                }
                // a bare record counts as one enrollment
                if map.contains_key("id") && map.contains_key("name") {
                    return 1;
                }
                map.len() as i64
            }
            Self::Missing | Self::Other(_) => 0,
        }
    }
}

/// Record ids arrive as strings from the mock-era endpoints and as
/// numeric database ids from newer ones.
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
