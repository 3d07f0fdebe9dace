use crate::state::AppState;
use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Overdue status is derived from the clock, so the sweep only reports.
pub async fn sweep_once(state: &AppState) -> usize {
    let now = Utc::now();
    let data = state.data.lock().await;
    data.tasks.iter().filter(|task| task.is_overdue_at(now)).count()
}

pub fn spawn_overdue_sweep(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("starting overdue sweep (interval: {period:?})");
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let overdue = sweep_once(&state).await;
            if overdue > 0 {
                info!(overdue, "overdue tasks pending");
            } else {
                debug!("no overdue tasks");
            }
        }
    })
}
