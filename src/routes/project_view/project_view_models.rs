use serde::{Deserialize, Serialize};

use crate::routes::{ChartView, TaskView};
use crate::validator::TaskFields;

#[derive(Deserialize)]
pub struct ProjectQuery {
    pub project_id: Option<String>,
}

// Task mutation form; every field arrives as text
#[derive(Deserialize)]
pub struct ProjectTaskRequest {
    pub project_id: Option<String>,
    pub task_index: Option<String>,
    pub task_name: Option<String>,
    pub start_date: Option<String>,
    pub finish_date: Option<String>,
}

impl ProjectTaskRequest {
    pub fn fields(&self) -> TaskFields {
        TaskFields {
            task_name: self.task_name.clone(),
            start_date: self.start_date.clone(),
            finish_date: self.finish_date.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct NewProjectRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}


// Page models
#[derive(Serialize)]
pub struct ProjectLink {
    pub id: i64,
    pub name: String,
    pub current: bool,
}

#[derive(Serialize)]
pub struct ProjectPage {
    pub username: String,
    pub flash: Option<String>,
    pub projects: Vec<ProjectLink>,
    pub project_id: i64,
    pub project_name: String,
    pub project_description: String,
    pub can_edit: bool,
    pub tasks: Vec<TaskView>,
    pub chart: Option<ChartView>,
    pub chart_title: &'static str,
}

#[derive(Serialize)]
pub struct NewProjectPage {
    pub flash: Option<String>,
}
