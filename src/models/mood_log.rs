use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single mood log row as stored in `mood_logs`.
///
/// `tags` exists in the table and is returned to clients, but no endpoint
/// ever writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodLog {
    pub id: i32,
    pub mood: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Body of `POST /add-mood`.
///
/// Fields are kept as text and handed to the database untouched, so a bad
/// `date` is rejected by PostgreSQL rather than here.
#[derive(Debug, Default, Deserialize)]
pub struct CreateMoodLogRequest {
    #[serde(default, deserialize_with = "value_as_text")]
    pub mood: Option<String>,
    #[serde(default, deserialize_with = "value_as_text")]
    pub notes: Option<String>,
    /// Storage fills in the current date when absent.
    #[serde(default, deserialize_with = "value_as_text")]
    pub date: Option<String>,
}

/// Body of `PUT /moods/:id`. All three fields are written, so a missing
/// field clears the column.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMoodLogRequest {
    #[serde(default, deserialize_with = "value_as_text")]
    pub mood: Option<String>,
    #[serde(default, deserialize_with = "value_as_text")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "value_as_text")]
    pub date: Option<String>,
}

/// Any JSON value as text: scalars as their plain form, objects and arrays
/// as their JSON encoding. `null` maps to `None`.
fn value_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(other) => Ok(Some(other.to_string())),
    }
}
