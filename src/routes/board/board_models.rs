use serde::{Deserialize, Serialize};

use crate::models::task::Task;
use crate::routes::{ChartView, TaskView};
use crate::validator::TaskFields;

// Bulk task list request and response
#[derive(Serialize, Deserialize)]
pub struct TasksPayload {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Serialize)]
pub struct ReplaceTasksResponse {
    pub success: bool,
    pub html_file: Option<String>,
    pub message: String,
}


// Update and delete forms
#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub task_index: Option<String>,
    pub task_name: Option<String>,
    pub start_date: Option<String>,
    pub finish_date: Option<String>,
}

impl UpdateTaskRequest {
    pub fn fields(&self) -> TaskFields {
        TaskFields {
            task_name: self.task_name.clone(),
            start_date: self.start_date.clone(),
            finish_date: self.finish_date.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct DeleteTaskRequest {
    pub task_index: Option<String>,
}


// Page model
#[derive(Serialize)]
pub struct BoardPage {
    pub tasks: Vec<TaskView>,
    pub chart: Option<ChartView>,
    pub chart_title: &'static str,
}
