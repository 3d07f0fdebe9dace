//! Points and login-streak rules.
//!
//! Everything here is pure arithmetic over explicit inputs; callers own the
//! state and decide when to persist it.

use crate::models::{Priority, StreakRecord, Task};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;

pub const MILESTONE_POINTS: u64 = 200;

const HIGH_POINTS: u64 = 15;
const MEDIUM_POINTS: u64 = 10;
const LOW_POINTS: u64 = 8;

/// Early-completion brackets, highest threshold first.
const EARLY_BRACKETS: [(i64, u64); 4] = [(48, 10), (24, 5), (12, 3), (1, 1)];

const LONG_STREAK_DAYS: u32 = 7;
const LONG_STREAK_BONUS: u64 = 5;
const SHORT_STREAK_DAYS: u32 = 3;
const SHORT_STREAK_BONUS: u64 = 2;

pub fn base_points(priority: Priority) -> u64 {
    match priority {
        Priority::High => HIGH_POINTS,
        Priority::Medium => MEDIUM_POINTS,
        Priority::Low => LOW_POINTS,
    }
}

pub fn early_bonus(deadline: DateTime<Utc>, completed_at: DateTime<Utc>) -> u64 {
    if completed_at >= deadline {
        return 0;
    }
    let early = deadline - completed_at;
    EARLY_BRACKETS
        .iter()
        .find(|(hours, _)| early >= Duration::hours(*hours))
        .map(|(_, bonus)| *bonus)
        .unwrap_or(0)
}

pub fn streak_bonus(streak: u32) -> u64 {
    if streak >= LONG_STREAK_DAYS {
        LONG_STREAK_BONUS
    } else if streak >= SHORT_STREAK_DAYS {
        SHORT_STREAK_BONUS
    } else {
        0
    }
}

pub fn points_for(task: &Task, completed_at: DateTime<Utc>, streak: u32) -> u64 {
    base_points(task.priority) + early_bonus(task.deadline, completed_at) + streak_bonus(streak)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub earned: u64,
    pub total: u64,
    pub milestone_reached: bool,
}

pub fn award(total: u64, earned: u64) -> Award {
    let new_total = total.saturating_add(earned);
    Award {
        earned,
        total: new_total,
        milestone_reached: crossed_milestone(total, new_total),
    }
}

/// Edge-triggered: only an upward move across the threshold counts.
pub fn crossed_milestone(before: u64, after: u64) -> bool {
    before < MILESTONE_POINTS && after >= MILESTONE_POINTS
}

pub fn subtract(total: u64, amount: u64) -> u64 {
    total.saturating_sub(amount)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginUpdate {
    First,
    SameDay,
    Continued,
    Reset,
}

impl LoginUpdate {
    pub fn changed(self) -> bool {
        self != LoginUpdate::SameDay
    }
}

/// Applies a login at `now`, using `now`'s time zone for calendar days.
///
/// Once a day has been recorded, further calls on that day are no-ops, so a
/// second invocation can never double-increment.
pub fn record_login<Tz: TimeZone>(streak: &mut StreakRecord, now: DateTime<Tz>) -> LoginUpdate {
    let zone = now.timezone();
    let today = now.date_naive();
    let last = streak
        .last_login_date
        .map(|date| date.with_timezone(&zone).date_naive());

    let update = match last {
        None => {
            streak.current = 1;
            LoginUpdate::First
        }
        Some(day) if day == today => {
            streak.current = streak.current.max(1);
            return LoginUpdate::SameDay;
        }
        Some(day) if today.pred_opt() == Some(day) => {
            streak.current = streak.current.saturating_add(1);
            LoginUpdate::Continued
        }
        Some(_) => {
            streak.current = 1;
            LoginUpdate::Reset
        }
    };

    streak.last_login_date = Some(now.with_timezone(&Utc));
    update
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn task(priority: Priority, deadline: DateTime<Utc>) -> Task {
        Task {
            id: "t1".to_string(),
            title: "Read chapter 4".to_string(),
            description: None,
            deadline,
            category: "general".to_string(),
            priority,
            completed: false,
            completed_at: None,
            points_awarded: None,
            created_at: deadline - Duration::days(7),
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, 0, 0).unwrap()
    }

    #[test]
    fn base_points_per_priority_without_bonuses() {
        let deadline = at(12);
        for (priority, expected) in [
            (Priority::Low, 8),
            (Priority::Medium, 10),
            (Priority::High, 15),
        ] {
            assert_eq!(points_for(&task(priority, deadline), deadline, 2), expected);
        }
    }

    #[test]
    fn fifty_hours_early_medium_earns_twenty() {
        let deadline = at(12);
        let completed_at = deadline - Duration::hours(50);
        assert_eq!(points_for(&task(Priority::Medium, deadline), completed_at, 0), 20);
    }

    #[test]
    fn early_bonus_boundaries_count_as_met() {
        let deadline = at(12);
        assert_eq!(early_bonus(deadline, deadline - Duration::hours(48)), 10);
        assert_eq!(early_bonus(deadline, deadline - Duration::hours(48) + Duration::seconds(1)), 5);
        assert_eq!(early_bonus(deadline, deadline - Duration::hours(24)), 5);
        assert_eq!(early_bonus(deadline, deadline - Duration::hours(12)), 3);
        assert_eq!(early_bonus(deadline, deadline - Duration::hours(1)), 1);
        assert_eq!(early_bonus(deadline, deadline - Duration::minutes(59)), 0);
    }

    #[test]
    fn late_or_on_time_completion_has_no_bonus() {
        let deadline = at(12);
        assert_eq!(early_bonus(deadline, deadline), 0);
        assert_eq!(early_bonus(deadline, deadline + Duration::hours(30)), 0);
    }

    #[test]
    fn streak_bonus_brackets() {
        assert_eq!(streak_bonus(0), 0);
        assert_eq!(streak_bonus(2), 0);
        assert_eq!(streak_bonus(3), 2);
        assert_eq!(streak_bonus(6), 2);
        assert_eq!(streak_bonus(7), 5);
        assert_eq!(streak_bonus(30), 5);
    }

    #[test]
    fn milestone_fires_only_on_upward_crossing() {
        assert!(award(195, 10).milestone_reached);
        assert!(award(190, 10).milestone_reached);
        assert!(!award(200, 10).milestone_reached);
        assert!(!award(205, 15).milestone_reached);
        assert!(!award(100, 10).milestone_reached);
        assert!(award(0, 250).milestone_reached);
    }

    #[test]
    fn subtract_clamps_at_zero() {
        assert_eq!(subtract(20, 8), 12);
        assert_eq!(subtract(5, 8), 0);
    }

    fn local(day: u32, hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 5, day, hour, 30, 0)
            .unwrap()
    }

    #[test]
    fn first_login_starts_streak() {
        let mut streak = StreakRecord::default();
        assert_eq!(record_login(&mut streak, local(4, 8)), LoginUpdate::First);
        assert_eq!(streak.current, 1);
        assert!(streak.last_login_date.is_some());
    }

    #[test]
    fn same_day_login_is_idempotent() {
        let mut streak = StreakRecord::default();
        record_login(&mut streak, local(4, 8));
        let snapshot = streak.clone();
        assert_eq!(record_login(&mut streak, local(4, 22)), LoginUpdate::SameDay);
        assert_eq!(streak, snapshot);
    }

    #[test]
    fn next_day_login_increments_once() {
        let mut streak = StreakRecord::default();
        record_login(&mut streak, local(4, 8));
        assert_eq!(record_login(&mut streak, local(5, 7)), LoginUpdate::Continued);
        assert_eq!(streak.current, 2);
        assert_eq!(record_login(&mut streak, local(5, 9)), LoginUpdate::SameDay);
        assert_eq!(streak.current, 2);
    }

    #[test]
    fn gap_resets_streak() {
        let mut streak = StreakRecord::default();
        record_login(&mut streak, local(4, 8));
        record_login(&mut streak, local(5, 8));
        assert_eq!(record_login(&mut streak, local(8, 8)), LoginUpdate::Reset);
        assert_eq!(streak.current, 1);
    }

    #[test]
    fn future_last_login_resets_streak() {
        let mut streak = StreakRecord {
            current: 4,
            last_login_date: Some(local(20, 8).with_timezone(&Utc)),
        };
        assert_eq!(record_login(&mut streak, local(10, 8)), LoginUpdate::Reset);
        assert_eq!(streak.current, 1);
    }

    #[test]
    fn calendar_day_follows_the_given_zone() {
        // 23:30 UTC on the 4th is already the 5th at UTC+9.
        let mut streak = StreakRecord {
            current: 3,
            last_login_date: Some(local(4, 8).with_timezone(&Utc)),
        };
        let now = Utc.with_ymd_and_hms(2026, 5, 4, 23, 30, 0).unwrap();
        let zone = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(
            record_login(&mut streak, now.with_timezone(&zone)),
            LoginUpdate::Continued
        );
        assert_eq!(streak.current, 4);
    }
}
