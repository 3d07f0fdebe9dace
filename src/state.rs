use crate::errors::TrackerError;
use crate::models::AppData;
use crate::storage::persist_data;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Single owner of the tracker state; every request runs under the lock.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Writes `next` and only then makes it the live state.
    ///
    /// Call while holding the lock on `current`. A failed write leaves
    /// `current` untouched.
    pub async fn commit(&self, current: &mut AppData, next: AppData) -> Result<(), TrackerError> {
        persist_data(&self.data_path, &next).await?;
        *current = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_write_keeps_previous_state() {
        // A directory cannot be written as a file.
        let state = AppState::new(std::env::temp_dir(), AppData::default());
        let mut data = state.data.lock().await;
        let mut next = data.clone();
        next.points = 50;

        assert!(state.commit(&mut data, next).await.is_err());
        assert_eq!(data.points, 0);
    }
}
