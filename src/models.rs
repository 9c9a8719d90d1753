use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    // Owning user's username, denormalized for query simplicity
    pub user_id: String,
    pub description: String,
    pub duration: i64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Exercise {
    pub fn new(user_id: String, description: String, duration: i64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            description,
            duration,
            date,
            created_at: Utc::now(),
        }
    }
}

/// Strict `YYYY-MM-DD` parsing: the string must be a real calendar date and
/// must round-trip back to the identical string. Anything else is treated as
/// absent, never as an error.
pub fn parse_strict_date(value: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    (date.format("%Y-%m-%d").to_string() == value).then_some(date)
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub username: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AddExerciseRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i64>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddExerciseResponse {
    pub username: String,
    pub description: String,
    pub duration: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

impl LogQuery {
    // Positive integer limits only; anything else means unlimited
    pub fn parsed_limit(&self) -> Option<usize> {
        self.limit
            .as_deref()
            .and_then(|l| l.parse::<usize>().ok())
            .filter(|&l| l > 0)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub description: String,
    pub duration: i64,
    pub date: NaiveDate,
}

impl From<Exercise> for LogEntry {
    fn from(exercise: Exercise) -> Self {
        Self {
            user_id: exercise.user_id,
            description: exercise.description,
            duration: exercise.duration,
            date: exercise.date,
        }
    }
}
