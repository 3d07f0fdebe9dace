use crate::errors::ValidationError;
use crate::models::{Priority, Task, TaskDraft, TaskFilter, default_category};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

/// Validates a draft and appends the resulting task.
///
/// The deadline date and time are read as wall-clock values in `zone`.
pub fn add_task<Tz: TimeZone>(
    tasks: &mut Vec<Task>,
    draft: TaskDraft,
    now: DateTime<Utc>,
    zone: &Tz,
) -> Result<Task, ValidationError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(ValidationError::MissingField("title"));
    }
    let deadline = parse_deadline(&draft.deadline_date, &draft.deadline_time, zone)?;

    let description = draft
        .description
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    let category = draft
        .category
        .map(|text| text.trim().to_lowercase())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(default_category);

    let task = Task {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        description,
        deadline,
        category,
        priority: draft.priority.as_deref().map(Priority::parse).unwrap_or_default(),
        completed: false,
        completed_at: None,
        points_awarded: None,
        created_at: now,
    };
    tasks.push(task.clone());
    Ok(task)
}

fn parse_deadline<Tz: TimeZone>(
    date: &str,
    time: &str,
    zone: &Tz,
) -> Result<DateTime<Utc>, ValidationError> {
    let (date, time) = (date.trim(), time.trim());
    if date.is_empty() {
        return Err(ValidationError::MissingField("deadlineDate"));
    }
    if time.is_empty() {
        return Err(ValidationError::MissingField("deadlineTime"));
    }

    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|err| ValidationError::InvalidDeadline(format!("date '{date}': {err}")))?;
    let clock = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|err| ValidationError::InvalidDeadline(format!("time '{time}': {err}")))?;

    zone.from_local_datetime(&NaiveDateTime::new(day, clock))
        .earliest()
        .map(|deadline| deadline.with_timezone(&Utc))
        .ok_or_else(|| {
            ValidationError::InvalidDeadline(format!("{date} {time} does not exist in local time"))
        })
}

pub fn find_mut<'a>(tasks: &'a mut [Task], id: &str) -> Option<&'a mut Task> {
    tasks.iter_mut().find(|task| task.id == id)
}

/// Returns whether a task was removed; unknown ids are a no-op.
pub fn remove(tasks: &mut Vec<Task>, id: &str) -> bool {
    let before = tasks.len();
    tasks.retain(|task| task.id != id);
    tasks.len() != before
}

pub fn by_filter_at(tasks: &[Task], filter: TaskFilter, now: DateTime<Utc>) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| match filter {
            TaskFilter::Pending => task.is_pending_at(now),
            TaskFilter::Completed => task.completed,
            TaskFilter::Overdue => task.is_overdue_at(now),
            TaskFilter::All => true,
        })
        .cloned()
        .collect()
}

pub fn by_date<Tz: TimeZone>(tasks: &[Task], date: NaiveDate, zone: &Tz) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| local_date(task.deadline, zone) == date)
        .cloned()
        .collect()
}

/// Overdue tasks first, then by ascending deadline.
pub fn sort_for_display(tasks: &mut [Task], now: DateTime<Utc>) {
    tasks.sort_by(|a, b| {
        b.is_overdue_at(now)
            .cmp(&a.is_overdue_at(now))
            .then(a.deadline.cmp(&b.deadline))
    });
}

pub fn local_date<Tz: TimeZone>(instant: DateTime<Utc>, zone: &Tz) -> NaiveDate {
    instant.with_timezone(zone).date_naive()
}
