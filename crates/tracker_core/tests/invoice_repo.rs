use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracker_core::db::open_db_in_memory;
use tracker_core::repo::client_repo::{ClientRepository, SqliteClientRepository};
use tracker_core::repo::invoice_repo::{InvoiceRepository, SqliteInvoiceRepository};
use tracker_core::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use tracker_core::{ConstraintKind, NewClient, NewInvoice, NewProject, ProjectId, RepoError};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn amount(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap()
}

fn seed_project(conn: &Connection) -> ProjectId {
    let client = SqliteClientRepository::try_new(conn)
        .unwrap()
        .create_client(&NewClient::new("Acme"))
        .unwrap();
    SqliteProjectRepository::try_new(conn)
        .unwrap()
        .create_project(&NewProject::new("Site Revamp", client.id))
        .unwrap()
        .id
}

#[test]
fn create_normalizes_amount_and_defaults_paid_status() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn);
    let repo = SqliteInvoiceRepository::try_new(&conn).unwrap();

    let mut payload = NewInvoice::new(project_id, amount("1250.455"), date(2025, 4, 1));
    payload.due_date = Some(date(2025, 5, 1));
    let invoice = repo.create_invoice(&payload).unwrap();

    assert_eq!(invoice.project_id, project_id);
    assert_eq!(invoice.amount.to_string(), "1250.46");
    assert_eq!(invoice.issued_date, date(2025, 4, 1));
    assert_eq!(invoice.due_date, Some(date(2025, 5, 1)));
    assert_eq!(invoice.paid_status, "unpaid");

    let stored: String = conn
        .query_row(
            "SELECT amount FROM invoices WHERE id = ?1;",
            [invoice.id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, "1250.46");
}

#[test]
fn exact_halves_round_away_from_zero() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn);
    let repo = SqliteInvoiceRepository::try_new(&conn).unwrap();

    let stored: Vec<String> = ["0.125", "1250.445", "2.675"]
        .into_iter()
        .map(|raw| {
            repo.create_invoice(&NewInvoice::new(project_id, amount(raw), date(2025, 4, 1)))
                .unwrap()
                .amount
                .to_string()
        })
        .collect();

    assert_eq!(stored, vec!["0.13", "1250.45", "2.68"]);
}

#[test]
fn blank_paid_status_is_stored_as_given() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn);
    let repo = SqliteInvoiceRepository::try_new(&conn).unwrap();

    let mut payload = NewInvoice::new(project_id, amount("10"), date(2025, 4, 1));
    payload.paid_status = Some(String::new());
    let invoice = repo.create_invoice(&payload).unwrap();

    assert_eq!(invoice.paid_status, "");
}

#[test]
fn negative_amount_and_early_due_date_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn);
    let repo = SqliteInvoiceRepository::try_new(&conn).unwrap();

    let negative = NewInvoice::new(project_id, amount("-1"), date(2025, 4, 1));
    assert!(matches!(
        repo.create_invoice(&negative),
        Err(RepoError::Validation(_))
    ));

    let mut early = NewInvoice::new(project_id, amount("10"), date(2025, 4, 1));
    early.due_date = Some(date(2025, 3, 1));
    assert!(matches!(
        repo.create_invoice(&early),
        Err(RepoError::Validation(_))
    ));
    assert!(repo.list_invoices().unwrap().is_empty());
}

#[test]
fn missing_project_is_foreign_key_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteInvoiceRepository::try_new(&conn).unwrap();

    let err = repo
        .create_invoice(&NewInvoice::new(5, amount("10"), date(2025, 4, 1)))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::ConstraintViolation {
            kind: ConstraintKind::ForeignKey,
            ..
        }
    ));
}

#[test]
fn malformed_stored_amount_is_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn);
    conn.execute(
        "INSERT INTO invoices (project_id, amount, issued_date) VALUES (?1, 'lots', '2025-04-01');",
        [project_id],
    )
    .unwrap();
    let repo = SqliteInvoiceRepository::try_new(&conn).unwrap();

    let err = repo.list_invoices().unwrap_err();
    assert_eq!(err.code(), "invalid_data");
}

#[test]
fn invoices_for_project_and_soft_delete() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn);
    let repo = SqliteInvoiceRepository::try_new(&conn).unwrap();

    let paid = repo
        .create_invoice(&NewInvoice {
            paid_status: Some("paid".to_string()),
            ..NewInvoice::new(project_id, amount("99.9"), date(2025, 1, 10))
        })
        .unwrap();
    let void = repo
        .create_invoice(&NewInvoice::new(project_id, amount("5"), date(2025, 1, 11)))
        .unwrap();
    repo.soft_delete_invoice(void.id).unwrap();

    let rows = repo.list_invoices_for_project(project_id).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, paid.id);
    assert_eq!(rows[0].paid_status, "paid");
    assert_eq!(rows[0].amount.to_string(), "99.90");
    assert!(repo.get_invoice(void.id).unwrap_err().is_not_found());
}
