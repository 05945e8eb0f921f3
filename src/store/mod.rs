//! Task persistence for both variants.
//!
//! Tasks are addressed by position. Nothing here serialises concurrent
//! writers: two requests against one scope can interleave their
//! read-modify-write, and an index taken before a delete may afterwards
//! point at the following task.

pub mod db;
pub mod json_store;
pub mod sqlite_store;

pub use json_store::JsonTaskStore;
pub use sqlite_store::SqliteTaskStore;

use crate::error::AppError;
use crate::models::task::Task;

pub fn append(tasks: &mut Vec<Task>, task: Task) {
    tasks.push(task);
}

pub fn replace_at(tasks: &mut [Task], index: usize, task: Task) -> Result<(), AppError> {
    let len = tasks.len();
    match tasks.get_mut(index) {
        Some(slot) => {
            *slot = task;
            Ok(())
        }
        None => Err(AppError::IndexOutOfRange { index, len }),
    }
}

pub fn remove_at(tasks: &mut Vec<Task>, index: usize) -> Result<Task, AppError> {
    if index >= tasks.len() {
        return Err(AppError::IndexOutOfRange {
            index,
            len: tasks.len(),
        });
    }
    Ok(tasks.remove(index))
}
