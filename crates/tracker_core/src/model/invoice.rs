//! Invoice domain model.
//!
//! # Invariants
//! - `amount` is fixed-point with exactly two decimal places once persisted.
//! - Invoices are not removed when their project is deleted; the store
//!   rejects deleting a project that still has invoices.

use super::project::ProjectId;
use super::{validate_date_order, ValidationError, ValidationResult};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Store-generated invoice identity.
pub type InvoiceId = i64;

/// Paid status written when a payload omits one.
pub const DEFAULT_PAID_STATUS: &str = "unpaid";

/// Decimal places kept for invoice amounts.
pub const AMOUNT_SCALE: u32 = 2;

/// Persisted invoice row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub project_id: ProjectId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub issued_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub paid_status: String,
    #[serde(with = "super::deleted_flag")]
    pub is_deleted: bool,
}

impl Invoice {
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// Creatable invoice fields; also the full-row replacement shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub project_id: ProjectId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub issued_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub paid_status: Option<String>,
}

impl NewInvoice {
    pub fn new(project_id: ProjectId, amount: Decimal, issued_date: NaiveDate) -> Self {
        Self {
            project_id,
            amount,
            issued_date,
            due_date: None,
            paid_status: None,
        }
    }

    pub fn effective_paid_status(&self) -> &str {
        self.paid_status.as_deref().unwrap_or(DEFAULT_PAID_STATUS)
    }

    /// Amount rounded to two places, halves away from zero, always carrying
    /// scale 2.
    pub fn normalized_amount(&self) -> Decimal {
        normalize_amount(self.amount)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.amount < Decimal::ZERO {
            return Err(ValidationError::Negative { field: "amount" });
        }
        validate_date_order(
            ("issued_date", Some(self.issued_date)),
            ("due_date", self.due_date),
        )
    }
}

pub(crate) fn normalize_amount(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(AMOUNT_SCALE);
    rounded
}
