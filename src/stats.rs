use crate::errors::ValidationError;
use crate::models::Task;
use crate::tasks::local_date;
use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, TimeZone, Utc};
use serde::Serialize;

const RECENT_COUNT: usize = 5;
const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub today_count: usize,
    pub week_completed_count: usize,
    pub overdue_count: usize,
    pub recent: Vec<Task>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSplit {
    pub completed: usize,
    pub incomplete: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBar {
    pub label: &'static str,
    pub date: String,
    pub completed: usize,
    pub pending: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub start_date: String,
    pub end_date: String,
    pub pie: PieSplit,
    pub days: Vec<DayBar>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub completion_rate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: String,
    pub day: u32,
    pub completed: usize,
    pub pending: usize,
    pub is_today: bool,
    pub is_past: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

pub fn dashboard(tasks: &[Task]) -> Dashboard {
    dashboard_at(tasks, Local::now())
}

pub fn dashboard_at<Tz: TimeZone>(tasks: &[Task], now: DateTime<Tz>) -> Dashboard {
    let zone = now.timezone();
    let today = now.date_naive();
    let start = week_start(today);
    let now = now.with_timezone(&Utc);

    let today_count = tasks
        .iter()
        .filter(|task| local_date(task.deadline, &zone) == today)
        .count();
    let week_completed_count = tasks
        .iter()
        .filter(|task| task.completed)
        .filter_map(|task| task.completed_at)
        .filter(|at| local_date(*at, &zone) >= start)
        .count();
    let overdue_count = tasks.iter().filter(|task| task.is_overdue_at(now)).count();
    let recent = tasks.iter().rev().take(RECENT_COUNT).cloned().collect();

    Dashboard {
        today_count,
        week_completed_count,
        overdue_count,
        recent,
    }
}

pub fn weekly(tasks: &[Task]) -> WeeklyStats {
    weekly_at(tasks, Local::now())
}

pub fn weekly_at<Tz: TimeZone>(tasks: &[Task], now: DateTime<Tz>) -> WeeklyStats {
    let zone = now.timezone();
    let start = week_start(now.date_naive());
    let end = start + Duration::days(6);

    let mut days = Vec::with_capacity(DAY_LABELS.len());
    for (offset, label) in DAY_LABELS.into_iter().enumerate() {
        let date = start + Duration::days(offset as i64);
        let (completed, pending) = count_on(tasks, date, &zone);
        days.push(DayBar {
            label,
            date: date_key(date),
            completed,
            pending,
        });
    }

    let pie = PieSplit {
        completed: days.iter().map(|day| day.completed).sum(),
        incomplete: days.iter().map(|day| day.pending).sum(),
    };

    WeeklyStats {
        start_date: date_key(start),
        end_date: date_key(end),
        pie,
        days,
    }
}

pub fn progress(tasks: &[Task]) -> Progress {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let completion_rate = if total == 0 {
        0.0
    } else {
        (completed as f64 / total as f64 * 1000.0).round() / 10.0
    };

    Progress {
        total,
        completed,
        pending: total - completed,
        completion_rate,
    }
}

pub fn calendar_month<Tz: TimeZone>(
    tasks: &[Task],
    year: i32,
    month: u32,
    now: DateTime<Tz>,
) -> Result<CalendarMonth, ValidationError> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::InvalidMonth(month));
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(ValidationError::InvalidYear(year))?;
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or(ValidationError::InvalidYear(year))?;
    let zone = now.timezone();
    let today = now.date_naive();

    let days = first
        .iter_days()
        .take_while(|date| *date < next)
        .map(|date| {
            let (completed, pending) = count_on(tasks, date, &zone);
            CalendarDay {
                date: date_key(date),
                day: date.day(),
                completed,
                pending,
                is_today: date == today,
                is_past: date < today,
            }
        })
        .collect();

    Ok(CalendarMonth {
        year,
        month,
        label: first.format("%B %Y").to_string(),
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    })
}

fn count_on<Tz: TimeZone>(tasks: &[Task], date: NaiveDate, zone: &Tz) -> (usize, usize) {
    tasks
        .iter()
        .filter(|task| local_date(task.deadline, zone) == date)
        .fold((0, 0), |(done, open), task| {
            if task.completed {
                (done + 1, open)
            } else {
                (done, open + 1)
            }
        })
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}
