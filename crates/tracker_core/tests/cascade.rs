use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracker_core::db::open_db_in_memory;
use tracker_core::repo::client_repo::{ClientRepository, SqliteClientRepository};
use tracker_core::repo::invoice_repo::{InvoiceRepository, SqliteInvoiceRepository};
use tracker_core::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use tracker_core::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use tracker_core::{ConstraintKind, NewClient, NewInvoice, NewProject, NewTask, RepoError};

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn hard_deleting_client_removes_projects_and_tasks() {
    let conn = open_db_in_memory().unwrap();
    let clients = SqliteClientRepository::try_new(&conn).unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();

    let acme = clients.create_client(&NewClient::new("Acme")).unwrap();
    let globex = clients.create_client(&NewClient::new("Globex")).unwrap();
    let revamp = projects
        .create_project(&NewProject::new("Site Revamp", acme.id))
        .unwrap();
    let audit = projects
        .create_project(&NewProject::new("Audit", acme.id))
        .unwrap();
    let other = projects
        .create_project(&NewProject::new("Other", globex.id))
        .unwrap();
    tasks.create_task(&NewTask::new(revamp.id, "Mockups")).unwrap();
    tasks.create_task(&NewTask::new(audit.id, "Checklist")).unwrap();
    tasks.create_task(&NewTask::new(other.id, "Survivor")).unwrap();

    clients.delete_client(acme.id).unwrap();

    assert_eq!(count(&conn, "clients"), 1);
    assert_eq!(count(&conn, "projects"), 1);
    assert_eq!(count(&conn, "tasks"), 1);
    assert_eq!(tasks.list_tasks().unwrap()[0].title, "Survivor");
}

#[test]
fn deleting_project_never_removes_its_invoices() {
    let conn = open_db_in_memory().unwrap();
    let clients = SqliteClientRepository::try_new(&conn).unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let invoices = SqliteInvoiceRepository::try_new(&conn).unwrap();

    let acme = clients.create_client(&NewClient::new("Acme")).unwrap();
    let project = projects
        .create_project(&NewProject::new("Site Revamp", acme.id))
        .unwrap();
    tasks.create_task(&NewTask::new(project.id, "Mockups")).unwrap();
    let invoice = invoices
        .create_invoice(&NewInvoice::new(
            project.id,
            Decimal::from(500),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        ))
        .unwrap();

    let err = projects.delete_project(project.id).unwrap_err();
    assert!(matches!(
        err,
        RepoError::ConstraintViolation {
            kind: ConstraintKind::ForeignKey,
            ..
        }
    ));
    assert_eq!(invoices.get_invoice(invoice.id).unwrap(), invoice);
    assert_eq!(count(&conn, "tasks"), 1);

    let client_err = clients.delete_client(acme.id).unwrap_err();
    assert!(client_err.is_constraint_violation());
    assert_eq!(count(&conn, "projects"), 1);
}

#[test]
fn deleting_project_without_invoices_cascades_to_tasks() {
    let conn = open_db_in_memory().unwrap();
    let clients = SqliteClientRepository::try_new(&conn).unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();

    let acme = clients.create_client(&NewClient::new("Acme")).unwrap();
    let project = projects
        .create_project(&NewProject::new("Site Revamp", acme.id))
        .unwrap();
    tasks.create_task(&NewTask::new(project.id, "Mockups")).unwrap();

    projects.delete_project(project.id).unwrap();

    assert_eq!(count(&conn, "tasks"), 0);
    assert!(projects.delete_project(project.id).unwrap_err().is_not_found());
}

#[test]
fn soft_deleting_project_leaves_children_untouched() {
    let conn = open_db_in_memory().unwrap();
    let clients = SqliteClientRepository::try_new(&conn).unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();

    let acme = clients.create_client(&NewClient::new("Acme")).unwrap();
    let project = projects
        .create_project(&NewProject::new("Site Revamp", acme.id))
        .unwrap();
    let task = tasks.create_task(&NewTask::new(project.id, "Mockups")).unwrap();

    projects.soft_delete_project(project.id).unwrap();

    assert_eq!(tasks.get_task(task.id).unwrap(), task);
}
