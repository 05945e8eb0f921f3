use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the Gantt chart. Field names on the wire follow the task file
/// format (`Task`, `Start`, `Finish`, `Resource`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "Task")]
    pub name: String,
    #[serde(rename = "Start")]
    pub start: NaiveDate,
    #[serde(rename = "Finish")]
    pub finish: NaiveDate,
    #[serde(rename = "Resource")]
    pub resource: String,
}

impl Task {
    /// Every mutation path groups a task under its own name.
    pub fn new(name: impl Into<String>, start: NaiveDate, finish: NaiveDate) -> Self {
        let name = name.into();
        Task {
            resource: name.clone(),
            name,
            start,
            finish,
        }
    }
}

// Database row; `id` is the stable row id, position is derived from `ORDER BY id`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub project_id: i64,
    pub task: String,
    pub start_date: NaiveDate,
    pub finish_date: NaiveDate,
    pub resource: String,
}

impl TaskRow {
    pub fn into_task(self) -> Task {
        Task {
            name: self.task,
            start: self.start_date,
            finish: self.finish_date,
            resource: self.resource,
        }
    }
}

const DEFAULT_TASKS: [(&str, (i32, u32, u32), (i32, u32, u32)); 5] = [
    ("Reporting", (2025, 5, 1), (2025, 6, 30)),
    ("Evaluation and Testing", (2025, 3, 1), (2025, 4, 30)),
    ("Model Optimization", (2024, 11, 1), (2025, 2, 28)),
    ("Baseline Models", (2024, 5, 1), (2024, 10, 31)),
    ("Data Preparation", (2024, 1, 1), (2024, 4, 30)),
];

/// The example project plan written to an empty store.
pub fn default_tasks() -> Vec<Task> {
    DEFAULT_TASKS
        .iter()
        .filter_map(|&(name, (sy, sm, sd), (fy, fm, fd))| {
            let start = NaiveDate::from_ymd_opt(sy, sm, sd)?;
            let finish = NaiveDate::from_ymd_opt(fy, fm, fd)?;
            Some(Task::new(name, start, finish))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tasks_are_complete_and_ordered() {
        let tasks = default_tasks();
        assert_eq!(tasks.len(), 5);
        assert_eq!(tasks[0].name, "Reporting");
        assert_eq!(tasks[4].name, "Data Preparation");
        for task in &tasks {
            assert!(task.start <= task.finish, "{} ends before it starts", task.name);
            assert_eq!(task.resource, task.name);
        }
    }

    #[test]
    fn serializes_with_task_file_keys() {
        let task = Task::new(
            "Review",
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
        );
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Task": "Review",
                "Start": "2025-07-01",
                "Finish": "2025-07-15",
                "Resource": "Review",
            })
        );
    }
}
