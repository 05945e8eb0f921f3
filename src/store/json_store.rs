use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::info;
use serde::Serialize;

use crate::error::AppError;
use crate::models::task::{default_tasks, Task};

/// The single-user task list, kept as one pretty-printed JSON array.
///
/// Every mutation reads the whole file, applies one change and rewrites it
/// before returning the persisted list.
#[derive(Debug, Clone)]
pub struct JsonTaskStore {
    path: PathBuf,
}

impl JsonTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonTaskStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seeds the file with the default plan when it does not exist yet.
    pub fn load(&self) -> Result<Vec<Task>, AppError> {
        if !self.path.exists() {
            info!("No task file at {}, writing defaults", self.path.display());
            let tasks = default_tasks();
            self.save(&tasks)?;
            return Ok(tasks);
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| AppError::io(&self.path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Last write to the task file, `None` before it exists.
    pub fn modified(&self) -> Result<Option<SystemTime>, AppError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(meta.modified().map_err(|e| AppError::io(&self.path, e))?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::io(&self.path, e)),
        }
    }

    pub fn save(&self, tasks: &[Task]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
        }
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        tasks.serialize(&mut ser)?;
        fs::write(&self.path, buf).map_err(|e| AppError::io(&self.path, e))
    }

    pub fn append(&self, task: Task) -> Result<Vec<Task>, AppError> {
        let mut tasks = self.load()?;
        super::append(&mut tasks, task);
        self.save(&tasks)?;
        Ok(tasks)
    }

    pub fn replace_at(&self, index: usize, task: Task) -> Result<Vec<Task>, AppError> {
        let mut tasks = self.load()?;
        super::replace_at(&mut tasks, index, task)?;
        self.save(&tasks)?;
        Ok(tasks)
    }

    pub fn remove_at(&self, index: usize) -> Result<Vec<Task>, AppError> {
        let mut tasks = self.load()?;
        super::remove_at(&mut tasks, index)?;
        self.save(&tasks)?;
        Ok(tasks)
    }

    pub fn replace_all(&self, tasks: Vec<Task>) -> Result<Vec<Task>, AppError> {
        self.save(&tasks)?;
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn store_in(dir: &tempfile::TempDir) -> JsonTaskStore {
        JsonTaskStore::new(dir.path().join("static").join("tasks.json"))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn load_seeds_defaults_and_persists_them() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(!store.path().exists());

        let tasks = store.load().unwrap();
        assert_eq!(tasks, default_tasks());
        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), tasks);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let tasks = vec![
            Task::new("Only", date(2024, 2, 1), date(2024, 2, 29)),
            Task {
                name: "Shared A".into(),
                start: date(2024, 3, 1),
                finish: date(2024, 3, 2),
                resource: "Team".into(),
            },
        ];
        store.save(&tasks).unwrap();
        assert_eq!(store.load().unwrap(), tasks);
    }

    #[test]
    fn file_is_pretty_printed_with_four_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .save(&[Task::new("A", date(2024, 1, 1), date(2024, 1, 2))])
            .unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("[\n    {\n        \"Task\": \"A\""), "{raw}");
    }

    #[test]
    fn mutations_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let review = Task::new("Review", date(2025, 7, 1), date(2025, 7, 15));

        let after_add = store.append(review.clone()).unwrap();
        assert_eq!(after_add.len(), 6);
        assert_eq!(store.load().unwrap(), after_add);

        store.replace_at(0, review.clone()).unwrap();
        assert_eq!(store.load().unwrap()[0], review);

        let after_remove = store.remove_at(5).unwrap();
        assert_eq!(after_remove.len(), 5);
        assert_eq!(store.load().unwrap(), after_remove);
    }

    #[test]
    fn out_of_range_mutation_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.load().unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        assert!(matches!(
            store.remove_at(7),
            Err(AppError::IndexOutOfRange { index: 7, len: 5 })
        ));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn modified_is_none_until_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.modified().unwrap().is_none());
        store.load().unwrap();
        assert!(store.modified().unwrap().is_some());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(AppError::Json(_))));
    }
}
