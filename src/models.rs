use crate::stats::{Dashboard, Progress, WeeklyStats};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Priority::parse(&value)
    }
}

impl Priority {
    /// Unknown values score as `Low`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub deadline: DateTime<Utc>,
    #[serde(default = "default_category", deserialize_with = "lenient_category")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_points")]
    pub points_awarded: Option<u64>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.deadline < now
    }

    pub fn is_pending_at(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.deadline >= now
    }
}

pub fn default_category() -> String {
    "general".to_string()
}

// Stored tasks may predate the current shape; a bad field falls back
// instead of dropping the whole task.

fn lenient_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) if !text.trim().is_empty() => text.trim().to_lowercase(),
        _ => default_category(),
    })
}

fn lenient_priority<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Priority, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Priority::parse(&text),
        _ => Priority::Low,
    })
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

fn lenient_points<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakRecord {
    pub current: u32,
    pub last_login_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    pub time: DateTime<Utc>,
}

/// The whole persisted document; each field is one key of the flat store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    pub tasks: Vec<Task>,
    pub points: u64,
    pub streak: StreakRecord,
    pub theme: Theme,
    pub chatbot_history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    Pending,
    Completed,
    Overdue,
    #[default]
    All,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub deadline_date: String,
    pub deadline_time: String,
    pub category: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionRequest {
    pub completed: bool,
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub filter: Option<TaskFilter>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub streak: u32,
    pub points: u64,
    pub theme: Theme,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PointsResponse {
    pub points: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub theme: Theme,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveResponse {
    pub removed: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub dashboard: Dashboard,
    pub points: u64,
    pub streak: u32,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub weekly: WeeklyStats,
    pub progress: Progress,
}
