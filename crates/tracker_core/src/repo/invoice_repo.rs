//! Invoice repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Amounts are written as canonical two-place decimal text and parsed
//!   back strictly; malformed stored amounts are `InvalidData`.
//! - Invoices have no cascade wiring: they survive every project operation.

use super::{
    bool_to_int, ensure_connection_ready, int_to_bool, EntityKind, RepoError, RepoResult,
};
use crate::model::invoice::{normalize_amount, Invoice, InvoiceId, NewInvoice};
use crate::model::project::ProjectId;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;

const INVOICE_COLUMNS: [&str; 7] = [
    "id",
    "project_id",
    "amount",
    "issued_date",
    "due_date",
    "paid_status",
    "is_deleted",
];

const INVOICE_SELECT_SQL: &str = "SELECT
    id,
    project_id,
    amount,
    issued_date,
    due_date,
    paid_status,
    is_deleted
FROM invoices";

/// Repository interface for invoice persistence.
pub trait InvoiceRepository {
    fn create_invoice(&self, payload: &NewInvoice) -> RepoResult<Invoice>;
    fn list_invoices(&self) -> RepoResult<Vec<Invoice>>;
    fn list_invoices_for_project(&self, project_id: ProjectId) -> RepoResult<Vec<Invoice>>;
    fn get_invoice(&self, id: InvoiceId) -> RepoResult<Invoice>;
    fn replace_invoice(&self, id: InvoiceId, payload: &NewInvoice) -> RepoResult<Invoice>;
    fn soft_delete_invoice(&self, id: InvoiceId) -> RepoResult<()>;
}

/// SQLite-backed invoice repository.
pub struct SqliteInvoiceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInvoiceRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "invoices", &INVOICE_COLUMNS)?;
        Ok(Self { conn })
    }

    /// Wraps a connection whose schema was already verified.
    pub(crate) fn verified(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_invoices(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<Invoice>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut invoices = Vec::new();
        while let Some(row) = rows.next()? {
            invoices.push(parse_invoice_row(row)?);
        }
        Ok(invoices)
    }
}

impl InvoiceRepository for SqliteInvoiceRepository<'_> {
    fn create_invoice(&self, payload: &NewInvoice) -> RepoResult<Invoice> {
        payload.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO invoices (
                project_id,
                amount,
                issued_date,
                due_date,
                paid_status,
                is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, 0);",
            params![
                payload.project_id,
                payload.normalized_amount().to_string(),
                payload.issued_date,
                payload.due_date,
                payload.effective_paid_status(),
            ],
        )?;
        let invoice = load_invoice(&tx, tx.last_insert_rowid())?;
        tx.commit()?;

        Ok(invoice)
    }

    fn list_invoices(&self) -> RepoResult<Vec<Invoice>> {
        self.query_invoices(
            &format!(
                "{INVOICE_SELECT_SQL}
                 WHERE is_deleted = 0
                 ORDER BY id ASC;"
            ),
            [],
        )
    }

    fn list_invoices_for_project(&self, project_id: ProjectId) -> RepoResult<Vec<Invoice>> {
        self.query_invoices(
            &format!(
                "{INVOICE_SELECT_SQL}
                 WHERE project_id = ?1
                   AND is_deleted = 0
                 ORDER BY id ASC;"
            ),
            [project_id],
        )
    }

    fn get_invoice(&self, id: InvoiceId) -> RepoResult<Invoice> {
        let invoice = select_invoice(self.conn, id)?
            .filter(Invoice::is_active)
            .ok_or_else(|| RepoError::not_found(EntityKind::Invoice, id))?;
        Ok(invoice)
    }

    fn replace_invoice(&self, id: InvoiceId, payload: &NewInvoice) -> RepoResult<Invoice> {
        payload.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE invoices
             SET
                project_id = ?2,
                amount = ?3,
                issued_date = ?4,
                due_date = ?5,
                paid_status = ?6
             WHERE id = ?1
               AND is_deleted = 0;",
            params![
                id,
                payload.project_id,
                payload.normalized_amount().to_string(),
                payload.issued_date,
                payload.due_date,
                payload.effective_paid_status(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Invoice, id));
        }
        let invoice = load_invoice(&tx, id)?;
        tx.commit()?;

        Ok(invoice)
    }

    fn soft_delete_invoice(&self, id: InvoiceId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE invoices SET is_deleted = ?2 WHERE id = ?1;",
            params![id, bool_to_int(true)],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Invoice, id));
        }
        Ok(())
    }
}

fn select_invoice(conn: &Connection, id: InvoiceId) -> RepoResult<Option<Invoice>> {
    let mut stmt = conn.prepare(&format!("{INVOICE_SELECT_SQL} WHERE id = ?1;"))?;
    let row = stmt
        .query_row([id], |row| Ok(parse_invoice_row(row)))
        .optional()?;
    row.transpose()
}

fn load_invoice(conn: &Connection, id: InvoiceId) -> RepoResult<Invoice> {
    select_invoice(conn, id)?.ok_or_else(|| RepoError::not_found(EntityKind::Invoice, id))
}

fn parse_invoice_row(row: &Row<'_>) -> RepoResult<Invoice> {
    let amount_text: String = row.get("amount")?;
    let amount = Decimal::from_str(&amount_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid amount value `{amount_text}` in invoices.amount"
        ))
    })?;

    Ok(Invoice {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        amount: normalize_amount(amount),
        issued_date: row.get("issued_date")?,
        due_date: row.get("due_date")?,
        paid_status: row.get("paid_status")?,
        is_deleted: int_to_bool(row.get("is_deleted")?, "invoices.is_deleted")?,
    })
}
