//! Client domain model.
//!
//! # Responsibility
//! - Define the persisted client record and its creatable payload.
//!
//! # Invariants
//! - `name` is required and non-blank.
//! - `email`, when present, is unique across all clients (store-enforced).
//! - Hard-deleting a client cascades to its projects (store-enforced).

use super::{require_text, validate_email, ValidationResult};
use serde::{Deserialize, Serialize};

/// Store-generated client identity.
pub type ClientId = i64;

/// Persisted client row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub address: Option<String>,
    #[serde(with = "super::deleted_flag")]
    pub is_deleted: bool,
}

impl Client {
    /// Returns whether this client is visible to listings.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// Creatable client fields; also the full-row replacement shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub address: Option<String>,
}

impl NewClient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Checks field rules before persistence.
    pub fn validate(&self) -> ValidationResult<()> {
        require_text("name", &self.name)?;
        if let Some(email) = self.email.as_deref() {
            validate_email("email", email)?;
        }
        Ok(())
    }
}
