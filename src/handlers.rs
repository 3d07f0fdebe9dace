use crate::chatbot::{self, ChatContext};
use crate::errors::{TrackerError, ValidationError};
use crate::models::{
    AppData, CalendarQuery, ChatRequest, ChatResponse, CompletionRequest, ConfirmRequest,
    DashboardResponse, DeleteQuery, PointsResponse, RemoveResponse, SessionResponse,
    StatsResponse, Task, TaskDraft, TaskQuery, ThemeResponse,
};
use crate::state::AppState;
use crate::stats::{self, CalendarMonth};
use crate::tasks;
use crate::tracker::{self, CompletionOutcome};
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use chrono::{Datelike, Local, Utc};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    Html(render_index(&data))
}

/// Session bootstrap: streak update plus the first chatbot greeting.
pub async fn start_session(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, TrackerError> {
    let now = Local::now();
    let mut data = state.data.lock().await;
    let mut next = data.clone();

    tracker::login_at(&mut next, now);
    let ctx = ChatContext::from_data_at(&next, now);
    chatbot::seed_greeting(&mut next.chatbot_history, &ctx, now.with_timezone(&Utc));
    if next != *data {
        state.commit(&mut data, next).await?;
    }

    Ok(Json(SessionResponse {
        streak: data.streak.current,
        points: data.points,
        theme: data.theme,
    }))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> Json<Vec<Task>> {
    let now = Utc::now();
    let data = state.data.lock().await;
    let mut found = match query.date {
        Some(date) => tasks::by_date(&data.tasks, date, &Local),
        None => tasks::by_filter_at(&data.tasks, query.filter.unwrap_or_default(), now),
    };
    tasks::sort_for_display(&mut found, now);
    Json(found)
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Task>), TrackerError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let task = tasks::add_task(&mut next.tasks, draft, Utc::now(), &Local)?;
    state.commit(&mut data, next).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn set_completion(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CompletionRequest>,
) -> Result<Json<CompletionOutcome>, TrackerError> {
    let now = Utc::now();
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let mut outcome =
        tracker::set_completion_at(&mut next, &id, request.completed, request.confirmed.into(), now)?;

    if outcome.changed {
        if outcome.task.completed {
            let text = chatbot::celebrate(
                &mut next.chatbot_history,
                &outcome.task.title,
                &mut rand::thread_rng(),
                now,
            );
            outcome.message = Some(text);
        }
        state.commit(&mut data, next).await?;
    }
    Ok(Json(outcome))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<RemoveResponse>, TrackerError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let removed = tracker::remove_task(&mut next, &id, query.confirm.into())?;
    if removed {
        state.commit(&mut data, next).await?;
    }
    Ok(Json(RemoveResponse { removed }))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let data = state.data.lock().await;
    Json(DashboardResponse {
        dashboard: stats::dashboard(&data.tasks),
        points: data.points,
        streak: data.streak.current,
    })
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let data = state.data.lock().await;
    Json(StatsResponse {
        weekly: stats::weekly(&data.tasks),
        progress: stats::progress(&data.tasks),
    })
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarMonth>, TrackerError> {
    let now = Local::now();
    let data = state.data.lock().await;
    let month = stats::calendar_month(
        &data.tasks,
        query.year.unwrap_or_else(|| now.year()),
        query.month.unwrap_or_else(|| now.month()),
        now,
    )?;
    Ok(Json(month))
}

pub async fn get_points(State(state): State<AppState>) -> Json<PointsResponse> {
    let data = state.data.lock().await;
    Json(PointsResponse {
        points: data.points,
    })
}

pub async fn reset_points(
    State(state): State<AppState>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<PointsResponse>, TrackerError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let points = tracker::reset_points(&mut next, request.confirmed.into())?;
    state.commit(&mut data, next).await?;
    Ok(Json(PointsResponse { points }))
}

pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeResponse> {
    let data = state.data.lock().await;
    Json(ThemeResponse { theme: data.theme })
}

pub async fn toggle_theme(
    State(state): State<AppState>,
) -> Result<Json<ThemeResponse>, TrackerError> {
    let mut data = state.data.lock().await;
    let next = AppData {
        theme: data.theme.toggled(),
        ..data.clone()
    };
    state.commit(&mut data, next).await?;
    Ok(Json(ThemeResponse { theme: data.theme }))
}

pub async fn get_chat(State(state): State<AppState>) -> Json<ChatResponse> {
    let data = state.data.lock().await;
    Json(ChatResponse {
        messages: data.chatbot_history.clone(),
    })
}

pub async fn send_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, TrackerError> {
    if request.message.trim().is_empty() {
        return Err(ValidationError::MissingField("message").into());
    }

    let now = Local::now();
    let mut data = state.data.lock().await;
    let ctx = ChatContext::from_data_at(&data, now);
    let mut next = data.clone();
    let messages = chatbot::exchange(
        &mut next.chatbot_history,
        &request.message,
        &ctx,
        &mut rand::thread_rng(),
        now.with_timezone(&Utc),
    );
    state.commit(&mut data, next).await?;
    Ok(Json(ChatResponse { messages }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Sender};
    use crate::storage::load_data;
    use chrono::Duration;
    use std::path::PathBuf;

    struct TempFile(PathBuf);

    impl TempFile {
        fn new(name: &str) -> Self {
            let nanos = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos();
            Self(std::env::temp_dir().join(format!(
                "study_tracker_handlers_{name}_{}_{nanos}.json",
                std::process::id()
            )))
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn data_with_task() -> AppData {
        let deadline = Utc::now() + Duration::days(3);
        AppData {
            tasks: vec![Task {
                id: "essay".to_string(),
                title: "Essay draft".to_string(),
                description: None,
                deadline,
                category: "general".to_string(),
                priority: Priority::Low,
                completed: false,
                completed_at: None,
                points_awarded: None,
                created_at: deadline - Duration::days(7),
            }],
            ..AppData::default()
        }
    }

    fn complete() -> Json<CompletionRequest> {
        Json(CompletionRequest {
            completed: true,
            confirmed: false,
        })
    }

    #[tokio::test]
    async fn failed_write_leaves_completion_unapplied() {
        // The temp directory itself cannot be written as a file.
        let state = AppState::new(std::env::temp_dir(), data_with_task());

        let result = set_completion(State(state.clone()), Path("essay".to_string()), complete()).await;
        assert!(matches!(result, Err(TrackerError::Io(_))));

        let data = state.data.lock().await;
        assert_eq!(data.points, 0);
        assert!(!data.tasks[0].completed);
        assert_eq!(data.tasks[0].points_awarded, None);
        assert!(data.chatbot_history.is_empty());
    }

    #[tokio::test]
    async fn failed_write_leaves_theme_and_tasks_unchanged() {
        let state = AppState::new(std::env::temp_dir(), data_with_task());

        assert!(toggle_theme(State(state.clone())).await.is_err());
        let draft = TaskDraft {
            title: "Quiz".to_string(),
            deadline_date: "2030-01-01".to_string(),
            deadline_time: "10:00".to_string(),
            ..TaskDraft::default()
        };
        assert!(create_task(State(state.clone()), Json(draft)).await.is_err());

        let data = state.data.lock().await;
        assert_eq!(data.theme, AppData::default().theme);
        assert_eq!(data.tasks.len(), 1);
    }

    #[tokio::test]
    async fn celebration_survives_reload() {
        let file = TempFile::new("celebration");
        let state = AppState::new(file.0.clone(), data_with_task());

        let Json(outcome) = set_completion(State(state.clone()), Path("essay".to_string()), complete())
            .await
            .unwrap();
        let text = outcome.message.expect("celebration message");

        let reloaded = load_data(&file.0).await;
        let last = reloaded.chatbot_history.last().expect("history entry");
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, text);
        assert!(reloaded.tasks[0].completed);
    }
}
