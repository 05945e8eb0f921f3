use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::models::task::Task;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Years a date input can carry; the chart does day arithmetic past both ends.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("{field} is not a date in YYYY-MM-DD form: {value:?}")]
    InvalidDate { field: &'static str, value: String },
    #[error("{field} is outside the years 1 to 9999: {value}")]
    DateOutOfRange { field: &'static str, value: NaiveDate },
    #[error("finish date {finish} is before start date {start}")]
    FinishBeforeStart { start: NaiveDate, finish: NaiveDate },
}

/// Raw task fields as submitted by the add/update forms.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TaskFields {
    pub task_name: Option<String>,
    pub start_date: Option<String>,
    pub finish_date: Option<String>,
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Turns submitted fields into a task; the task groups under its own name.
pub fn validate(fields: &TaskFields) -> Result<Task, ValidationError> {
    let name = required(&fields.task_name, "task_name")?;
    let start = required(&fields.start_date, "start_date")?;
    let finish = required(&fields.finish_date, "finish_date")?;

    let task = Task::new(
        name,
        parse_date(start, "start_date")?,
        parse_date(finish, "finish_date")?,
    );
    validate_task(&task)?;
    Ok(task)
}

/// Checks a record that arrived already typed (bulk JSON replace).
pub fn validate_task(task: &Task) -> Result<(), ValidationError> {
    if task.name.trim().is_empty() {
        return Err(ValidationError::MissingField("Task"));
    }
    if task.resource.trim().is_empty() {
        return Err(ValidationError::MissingField("Resource"));
    }
    for (field, value) in [("Start", task.start), ("Finish", task.finish)] {
        if !YEAR_RANGE.contains(&value.year()) {
            return Err(ValidationError::DateOutOfRange { field, value });
        }
    }
    if task.finish < task.start {
        return Err(ValidationError::FinishBeforeStart {
            start: task.start,
            finish: task.finish,
        });
    }
    Ok(())
}
