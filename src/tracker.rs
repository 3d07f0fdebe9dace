//! State transitions that touch more than one key of the store.
//!
//! Each function takes the whole `AppData` explicitly and mutates it in
//! place; persistence is left to the caller.

use crate::errors::TrackerError;
use crate::ledger::{self, LoginUpdate};
use crate::models::{AppData, Task};
use crate::tasks;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    pub task: Task,
    pub changed: bool,
    pub points_earned: u64,
    pub points_reversed: u64,
    pub points_total: u64,
    pub milestone_reached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Whether the user explicitly approved an irreversible action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

pub fn set_completion_at(
    data: &mut AppData,
    id: &str,
    completed: bool,
    confirmation: Confirmation,
    now: DateTime<Utc>,
) -> Result<CompletionOutcome, TrackerError> {
    let streak = data.streak.current;
    let total = data.points;
    let task = tasks::find_mut(&mut data.tasks, id)
        .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;

    let mut outcome = CompletionOutcome {
        task: task.clone(),
        changed: false,
        points_earned: 0,
        points_reversed: 0,
        points_total: total,
        milestone_reached: false,
        message: None,
    };

    match (task.completed, completed) {
        (false, true) => {
            let earned = ledger::points_for(task, now, streak);
            let award = ledger::award(total, earned);
            task.completed = true;
            task.completed_at = Some(now);
            task.points_awarded = Some(earned);

            data.points = award.total;
            outcome.points_earned = earned;
            outcome.points_total = award.total;
            outcome.milestone_reached = award.milestone_reached;
            info!(task = %task.id, earned, total = award.total, "task completed");
            if award.milestone_reached {
                info!(total = award.total, "points milestone reached");
            }
        }
        (true, false) => {
            if confirmation == Confirmation::Declined {
                return Err(TrackerError::ConfirmationDeclined);
            }
            let reversed = task.points_awarded.unwrap_or(0);
            task.completed = false;
            task.completed_at = None;
            task.points_awarded = None;

            data.points = ledger::subtract(total, reversed);
            outcome.points_reversed = reversed;
            outcome.points_total = data.points;
            info!(task = %task.id, reversed, total = data.points, "task completion undone");
        }
        _ => {
            debug!(task = %task.id, completed, "completion unchanged");
            return Ok(outcome);
        }
    }

    outcome.task = task.clone();
    outcome.changed = true;
    Ok(outcome)
}

pub fn remove_task(
    data: &mut AppData,
    id: &str,
    confirmation: Confirmation,
) -> Result<bool, TrackerError> {
    if confirmation == Confirmation::Declined {
        return Err(TrackerError::ConfirmationDeclined);
    }
    let removed = tasks::remove(&mut data.tasks, id);
    if removed {
        info!(task = %id, "task removed");
    }
    Ok(removed)
}

/// Session bootstrap step; returns whether the streak record changed.
pub fn login_at<Tz: TimeZone>(data: &mut AppData, now: DateTime<Tz>) -> bool {
    let update = ledger::record_login(&mut data.streak, now);
    match update {
        LoginUpdate::SameDay => debug!(streak = data.streak.current, "already logged in today"),
        _ => info!(streak = data.streak.current, ?update, "login streak updated"),
    }
    update.changed()
}

pub fn reset_points(data: &mut AppData, confirmation: Confirmation) -> Result<u64, TrackerError> {
    if confirmation == Confirmation::Declined {
        return Err(TrackerError::ConfirmationDeclined);
    }
    info!(previous = data.points, "points reset");
    data.points = 0;
    Ok(data.points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, StreakRecord};
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap()
    }

    fn task(id: &str, priority: Priority, deadline: DateTime<Utc>) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            description: None,
            deadline,
            category: "general".to_string(),
            priority,
            completed: false,
            completed_at: None,
            points_awarded: None,
            created_at: now() - Duration::days(1),
        }
    }

    fn data_with(tasks: Vec<Task>, points: u64, streak: u32) -> AppData {
        AppData {
            tasks,
            points,
            streak: StreakRecord {
                current: streak,
                last_login_date: None,
            },
            ..AppData::default()
        }
    }

    #[test]
    fn completion_caches_awarded_points() {
        let deadline = now() + Duration::hours(50);
        let mut data = data_with(vec![task("a", Priority::Medium, deadline)], 40, 0);

        let outcome = set_completion_at(&mut data, "a", true, Confirmation::Declined, now()).unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.points_earned, 20);
        assert_eq!(outcome.points_total, 60);
        assert_eq!(data.points, 60);
        assert_eq!(data.tasks[0].points_awarded, Some(20));
        assert_eq!(data.tasks[0].completed_at, Some(now()));
    }

    #[test]
    fn undo_restores_exact_total_even_if_inputs_change() {
        let deadline = now() + Duration::hours(30);
        let mut data = data_with(vec![task("a", Priority::High, deadline)], 77, 8);

        set_completion_at(&mut data, "a", true, Confirmation::Declined, now()).unwrap();
        assert_eq!(data.points, 77 + 15 + 5 + 5);

        data.streak.current = 1;
        data.tasks[0].priority = Priority::Low;
        let outcome = set_completion_at(&mut data, "a", false, Confirmation::Confirmed, now()).unwrap();
        assert_eq!(outcome.points_reversed, 25);
        assert_eq!(data.points, 77);
        let task = &data.tasks[0];
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
        assert_eq!(task.points_awarded, None);
    }

    #[test]
    fn declined_undo_leaves_state_untouched() {
        let mut data = data_with(vec![task("a", Priority::Low, now())], 0, 0);
        set_completion_at(&mut data, "a", true, Confirmation::Declined, now()).unwrap();
        let snapshot = data.clone();

        let err = set_completion_at(&mut data, "a", false, Confirmation::Declined, now()).unwrap_err();
        assert!(matches!(err, TrackerError::ConfirmationDeclined));
        assert_eq!(data, snapshot);
    }

    #[test]
    fn undo_of_legacy_task_without_cache_subtracts_nothing() {
        let mut legacy = task("a", Priority::High, now());
        legacy.completed = true;
        legacy.completed_at = Some(now());
        let mut data = data_with(vec![legacy], 30, 0);

        let outcome = set_completion_at(&mut data, "a", false, Confirmation::Confirmed, now()).unwrap();
        assert_eq!(outcome.points_reversed, 0);
        assert_eq!(data.points, 30);
    }

    #[test]
    fn undo_clamps_total_at_zero() {
        let mut data = data_with(vec![task("a", Priority::High, now())], 0, 0);
        set_completion_at(&mut data, "a", true, Confirmation::Declined, now()).unwrap();
        reset_points(&mut data, Confirmation::Confirmed).unwrap();

        set_completion_at(&mut data, "a", false, Confirmation::Confirmed, now()).unwrap();
        assert_eq!(data.points, 0);
    }

    #[test]
    fn repeated_transition_is_noop() {
        let mut data = data_with(vec![task("a", Priority::Low, now())], 10, 0);
        let outcome = set_completion_at(&mut data, "a", false, Confirmation::Declined, now()).unwrap();
        assert!(!outcome.changed);

        set_completion_at(&mut data, "a", true, Confirmation::Declined, now()).unwrap();
        let again = set_completion_at(&mut data, "a", true, Confirmation::Declined, now()).unwrap();
        assert!(!again.changed);
        assert_eq!(data.points, 18);
    }

    #[test]
    fn unknown_task_is_not_found() {
        let mut data = AppData::default();
        let err = set_completion_at(&mut data, "nope", true, Confirmation::Confirmed, now()).unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(id) if id == "nope"));
    }

    #[test]
    fn milestone_fires_once_and_rearms_after_drop() {
        // Medium, 24h early, streak 0: 10 + 5 = 15 points each.
        let deadline = now() + Duration::hours(24);
        let tasks = vec![
            task("a", Priority::Medium, deadline),
            task("b", Priority::Medium, deadline),
        ];
        let mut data = data_with(tasks, 195, 0);

        let first = set_completion_at(&mut data, "a", true, Confirmation::Declined, now()).unwrap();
        assert_eq!(first.points_total, 210);
        assert!(first.milestone_reached);

        let second = set_completion_at(&mut data, "b", true, Confirmation::Declined, now()).unwrap();
        assert!(!second.milestone_reached);

        set_completion_at(&mut data, "a", false, Confirmation::Confirmed, now()).unwrap();
        let dropped = set_completion_at(&mut data, "b", false, Confirmation::Confirmed, now()).unwrap();
        assert!(!dropped.milestone_reached);
        assert_eq!(data.points, 195);

        let again = set_completion_at(&mut data, "a", true, Confirmation::Declined, now()).unwrap();
        assert!(again.milestone_reached);
    }

    #[test]
    fn removal_requires_confirmation() {
        let mut data = data_with(vec![task("a", Priority::Low, now())], 0, 0);
        assert!(matches!(
            remove_task(&mut data, "a", Confirmation::Declined),
            Err(TrackerError::ConfirmationDeclined)
        ));
        assert_eq!(data.tasks.len(), 1);
        assert!(remove_task(&mut data, "a", Confirmation::Confirmed).unwrap());
        assert!(!remove_task(&mut data, "a", Confirmation::Confirmed).unwrap());
    }

    #[test]
    fn streak_feeds_completion_bonus() {
        let mut data = data_with(vec![task("a", Priority::Low, now())], 0, 2);
        data.streak.last_login_date = Some(now() - Duration::days(1));
        assert!(login_at(&mut data, now()));
        assert!(!login_at(&mut data, now() + Duration::hours(1)));
        assert_eq!(data.streak.current, 3);

        let outcome = set_completion_at(&mut data, "a", true, Confirmation::Declined, now()).unwrap();
        assert_eq!(outcome.points_earned, 8 + 2);
    }

    #[test]
    fn declined_reset_keeps_points() {
        let mut data = data_with(Vec::new(), 120, 0);
        assert!(reset_points(&mut data, Confirmation::Declined).is_err());
        assert_eq!(data.points, 120);
        assert_eq!(reset_points(&mut data, Confirmation::Confirmed).unwrap(), 0);
    }
}
