use crate::errors::TrackerError;
use crate::models::{AppData, Task};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs;
use tracing::{error, warn};

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => decode(&bytes),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), TrackerError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}

/// Parses a stored document, falling back to defaults key by key.
pub fn decode(bytes: &[u8]) -> AppData {
    let document = match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("data file is not a JSON object, starting fresh");
            return AppData::default();
        }
        Err(err) => {
            warn!("failed to parse data file: {err}");
            return AppData::default();
        }
    };

    AppData {
        tasks: decode_tasks(document.get("tasks")),
        points: decode_points(document.get("points")),
        streak: decode_key(&document, "streak"),
        theme: decode_key(&document, "theme"),
        chatbot_history: decode_key(&document, "chatbotHistory"),
    }
}

fn decode_key<T: DeserializeOwned + Default>(document: &Map<String, Value>, key: &str) -> T {
    match document.get(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|err| {
            warn!(key, "malformed stored value, using default: {err}");
            T::default()
        }),
    }
}

/// Accepts a number or a numeric string; anything else reads as zero.
fn decode_points(value: Option<&Value>) -> u64 {
    let points = match value {
        None | Some(Value::Null) => return 0,
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| n.is_finite() && *n >= 0.0).map(|n| n as u64)),
        Some(Value::String(text)) => text.trim().parse::<u64>().ok(),
        Some(_) => None,
    };
    points.unwrap_or_else(|| {
        warn!("malformed stored points, using 0");
        0
    })
}

fn decode_tasks(value: Option<&Value>) -> Vec<Task> {
    let entries = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            warn!("stored tasks are not a list, using empty list");
            return Vec::new();
        }
    };

    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<Task>(entry.clone()) {
            Ok(mut task) => {
                normalize(&mut task);
                Some(task)
            }
            Err(err) => {
                warn!("dropping malformed stored task: {err}");
                None
            }
        })
        .collect()
}

/// Restores `completed == false <=> completedAt == null <=> pointsAwarded == null`.
pub fn normalize(task: &mut Task) {
    if task.completed {
        if task.completed_at.is_none() {
            task.completed_at = Some(task.created_at);
        }
        task.points_awarded = Some(task.points_awarded.unwrap_or(0));
    } else {
        task.completed_at = None;
        task.points_awarded = None;
    }
    if task.description.as_deref().is_some_and(|text| text.trim().is_empty()) {
        task.description = None;
    }
}
