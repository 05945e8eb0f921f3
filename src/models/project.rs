use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    // NULL for the seeded shared project
    pub created_by: Option<i64>,
    pub created_at: NaiveDateTime,
}

impl Project {
    /// Shared projects accept edits from anyone signed in; owned ones only from their creator.
    pub fn is_editable_by(&self, user_id: i64) -> bool {
        match self.created_by {
            Some(owner) => owner == user_id,
            None => true,
        }
    }
}
