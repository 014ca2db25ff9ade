use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::cmp::Ordering;
use std::num::IntErrorKind;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::models::{CreateMoodLogRequest, MoodLog, UpdateMoodLogRequest};

/// Storage operations behind the HTTP surface. Each call maps to a single
/// statement; ids arrive as raw path text and are coerced by the store.
#[async_trait]
pub trait MoodStore: Send + Sync {
    async fn create_mood_log(&self, request: CreateMoodLogRequest) -> Result<MoodLog, ApiError>;

    /// All records, newest date first.
    async fn list_mood_logs(&self) -> Result<Vec<MoodLog>, ApiError>;

    /// `Ok(None)` when no row has this id.
    async fn update_mood_log(
        &self,
        id: &str,
        request: UpdateMoodLogRequest,
    ) -> Result<Option<MoodLog>, ApiError>;

    /// Succeeds whether or not the row existed.
    async fn delete_mood_log(&self, id: &str) -> Result<(), ApiError>;
}

/// Router state.
pub type SharedStore = Arc<dyn MoodStore>;

const MOOD_MAX_CHARS: usize = 50;

/// In-process store that follows the same coercion and ordering rules as
/// the `mood_logs` table. Used to exercise the router without PostgreSQL.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryTable>,
}

#[derive(Debug, Default)]
struct MemoryTable {
    next_id: i32,
    rows: Vec<MoodLog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn parse_id(text: &str) -> Result<i32, ApiError> {
    text.trim().parse::<i32>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ApiError::storage(format!("value \"{}\" is out of range for type integer", text))
        }
        _ => ApiError::storage(format!("invalid input syntax for type integer: \"{}\"", text)),
    })
}

fn parse_date(text: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    text.map(|value| {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
            ApiError::storage(format!("invalid input syntax for type date: \"{}\"", value))
        })
    })
    .transpose()
}

fn check_mood_length(mood: Option<&str>) -> Result<(), ApiError> {
    match mood {
        Some(mood) if mood.chars().count() > MOOD_MAX_CHARS => Err(ApiError::storage(format!(
            "value too long for type character varying({})",
            MOOD_MAX_CHARS
        ))),
        _ => Ok(()),
    }
}

/// `ORDER BY date DESC`: PostgreSQL puts NULL first in descending order.
fn date_descending(a: &MoodLog, b: &MoodLog) -> Ordering {
    match (a.date, b.date) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => b.cmp(&a),
    }
}

#[async_trait]
impl MoodStore for MemoryStore {
    async fn create_mood_log(&self, request: CreateMoodLogRequest) -> Result<MoodLog, ApiError> {
        check_mood_length(request.mood.as_deref())?;
        let date = parse_date(request.date.as_deref())?.unwrap_or_else(|| Local::now().date_naive());

        let mut table = self.inner.write().await;
        table.next_id += 1;
        let mood_log = MoodLog {
            id: table.next_id,
            mood: request.mood,
            notes: request.notes,
            tags: None,
            date: Some(date),
        };
        table.rows.push(mood_log.clone());

        Ok(mood_log)
    }

    async fn list_mood_logs(&self) -> Result<Vec<MoodLog>, ApiError> {
        let table = self.inner.read().await;
        let mut rows = table.rows.clone();
        // stable sort keeps insertion order among equal dates
        rows.sort_by(date_descending);
        Ok(rows)
    }

    async fn update_mood_log(
        &self,
        id: &str,
        request: UpdateMoodLogRequest,
    ) -> Result<Option<MoodLog>, ApiError> {
        let date = parse_date(request.date.as_deref())?;
        let id = parse_id(id)?;

        let mut table = self.inner.write().await;
        let Some(row) = table.rows.iter_mut().find(|row| row.id == id) else {
            return Ok(None);
        };

        // varchar length is only enforced on a row being written
        check_mood_length(request.mood.as_deref())?;

        row.mood = request.mood;
        row.notes = request.notes;
        row.date = date;

        Ok(Some(row.clone()))
    }

    async fn delete_mood_log(&self, id: &str) -> Result<(), ApiError> {
        let id = parse_id(id)?;

        let mut table = self.inner.write().await;
        table.rows.retain(|row| row.id != id);

        Ok(())
    }
}
