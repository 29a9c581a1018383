//! Task domain model.

use super::project::ProjectId;
use super::{require_text, ValidationResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-generated task identity.
pub type TaskId = i64;

/// Persisted task row. Removed by cascade when its project is hard-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    #[serde(with = "super::deleted_flag")]
    pub is_deleted: bool,
}

impl Task {
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// Creatable task fields; `completed` defaults to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub completed: Option<bool>,
}

impl NewTask {
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: None,
            assigned_to: None,
            due_date: None,
            completed: None,
        }
    }

    pub fn effective_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        require_text("title", &self.title)
    }
}
