use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/session", post(handlers::start_session))
        .route("/api/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route("/api/tasks/:id", delete(handlers::delete_task))
        .route("/api/tasks/:id/completion", post(handlers::set_completion))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/points", get(handlers::get_points))
        .route("/api/points/reset", post(handlers::reset_points))
        .route("/api/theme", get(handlers::get_theme))
        .route("/api/theme/toggle", post(handlers::toggle_theme))
        .route("/api/chat", get(handlers::get_chat).post(handlers::send_chat))
        .with_state(state)
}
