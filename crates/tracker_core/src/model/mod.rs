//! Domain model for the four tracked entities.
//!
//! # Responsibility
//! - Define persisted records and their creatable payloads.
//! - Own payload validation rules applied before any SQL mutation.
//!
//! # Invariants
//! - Identities are store-generated integers and are never reused.
//! - Ownership is child→parent only (`client_id`, `project_id`); reverse
//!   collections are derived by query, never stored.
//! - `is_deleted` is the source of truth for soft-delete state and is
//!   serialized as `0`/`1`.

pub mod client;
pub mod invoice;
pub mod project;
pub mod task;
mod validation;

pub use validation::{ValidationError, ValidationResult};

pub(crate) use validation::{require_text, validate_date_order, validate_email};

/// Serializes a soft-delete flag as the integer surrogate used on the wire.
pub(crate) mod deleted_flag {
    use serde::de::{Error, Unexpected};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match u8::deserialize(deserializer)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(D::Error::invalid_value(
                Unexpected::Unsigned(u64::from(other)),
                &"0 or 1",
            )),
        }
    }
}
