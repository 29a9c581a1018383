//! Project domain model.
//!
//! # Responsibility
//! - Define the persisted project record, its creatable payload, and the
//!   flattened project + client-name read model.
//!
//! # Invariants
//! - `client_id` must point at an active client when the row is written.
//! - `status` is free text; an omitted status is stored as `planned`.
//! - `end_date` must not precede `start_date` when both are set.

use super::client::ClientId;
use super::{require_text, validate_date_order, ValidationResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-generated project identity.
pub type ProjectId = i64;

/// Status written when a payload omits one.
pub const DEFAULT_PROJECT_STATUS: &str = "planned";

/// Persisted project row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub client_id: ClientId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub budget: Option<i64>,
    #[serde(with = "super::deleted_flag")]
    pub is_deleted: bool,
}

impl Project {
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// Creatable project fields; also the full-row replacement shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub client_id: ClientId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub budget: Option<i64>,
}

impl NewProject {
    pub fn new(title: impl Into<String>, client_id: ClientId) -> Self {
        Self {
            title: title.into(),
            description: None,
            client_id,
            start_date: None,
            end_date: None,
            status: None,
            budget: None,
        }
    }

    /// Status that will be persisted for this payload.
    pub fn effective_status(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_PROJECT_STATUS)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        require_text("title", &self.title)?;
        validate_date_order(
            ("start_date", self.start_date),
            ("end_date", self.end_date),
        )
    }
}

/// Flattened read of an active project joined to its active client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectWithClientName {
    pub id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub client_id: ClientId,
    pub client_name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Lowercased; blank values read as `planned`.
    pub status: String,
    pub budget: Option<i64>,
}

/// Normalizes a stored status for overview display.
pub fn normalize_status(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_PROJECT_STATUS.to_string();
    }
    trimmed.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{normalize_status, NewProject};
    use chrono::NaiveDate;

    #[test]
    fn normalize_status_lowercases_and_defaults() {
        assert_eq!(normalize_status("ONGOING"), "ongoing");
        assert_eq!(normalize_status("  "), "planned");
    }

    #[test]
    fn effective_status_defaults_to_planned() {
        let mut payload = NewProject::new("Site Revamp", 1);
        assert_eq!(payload.effective_status(), "planned");
        payload.status = Some("ongoing".to_string());
        assert_eq!(payload.effective_status(), "ongoing");
    }

    #[test]
    fn validate_rejects_end_before_start() {
        let mut payload = NewProject::new("Site Revamp", 1);
        payload.start_date = NaiveDate::from_ymd_opt(2025, 3, 1);
        payload.end_date = NaiveDate::from_ymd_opt(2025, 2, 1);
        assert!(payload.validate().is_err());
    }
}
