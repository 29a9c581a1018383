use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rusqlite::Connection;
use tracker_core::db::open_db_in_memory;
use tracker_core::repo::client_repo::{ClientRepository, SqliteClientRepository};
use tracker_core::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use tracker_core::{ClientId, ConstraintKind, NewClient, NewProject, RepoError};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn seed_client(conn: &Connection, name: &str) -> ClientId {
    SqliteClientRepository::try_new(conn)
        .unwrap()
        .create_client(&NewClient::new(name))
        .unwrap()
        .id
}

#[test]
fn create_round_trips_payload_with_default_status() {
    let conn = open_db_in_memory().unwrap();
    let client_id = seed_client(&conn, "Acme");
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let payload = NewProject {
        title: "Site Revamp".to_string(),
        description: Some("Rebuild marketing site".to_string()),
        client_id,
        start_date: Some(date(2025, 3, 1)),
        end_date: Some(date(2025, 6, 30)),
        status: None,
        budget: Some(12_000),
    };
    let project = repo.create_project(&payload).unwrap();

    assert!(project.id > 0);
    assert_eq!(project.title, payload.title);
    assert_eq!(project.description, payload.description);
    assert_eq!(project.client_id, client_id);
    assert_eq!(project.start_date, payload.start_date);
    assert_eq!(project.end_date, payload.end_date);
    assert_eq!(project.status, "planned");
    assert_eq!(project.budget, Some(12_000));
    assert!(!project.is_deleted);
}

#[test]
fn explicit_status_is_kept_verbatim() {
    let conn = open_db_in_memory().unwrap();
    let client_id = seed_client(&conn, "Acme");
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let mut payload = NewProject::new("Audit", client_id);
    payload.status = Some("Ongoing".to_string());
    let project = repo.create_project(&payload).unwrap();

    assert_eq!(project.status, "Ongoing");
}

#[test]
fn blank_status_is_stored_as_given_and_read_as_planned() {
    let conn = open_db_in_memory().unwrap();
    let client_id = seed_client(&conn, "Acme");
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let mut payload = NewProject::new("Quiet", client_id);
    payload.status = Some(String::new());
    let project = repo.create_project(&payload).unwrap();
    assert_eq!(project.status, "");

    let overview = repo.list_projects_with_client_name().unwrap();
    assert_eq!(overview[0].status, "planned");
}

#[test]
fn missing_client_is_foreign_key_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let err = repo
        .create_project(&NewProject::new("Orphan", 42))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::ConstraintViolation {
            kind: ConstraintKind::ForeignKey,
            ..
        }
    ));
    assert!(repo.list_projects().unwrap().is_empty());
}

#[test]
fn soft_deleted_client_rejects_new_projects() {
    let conn = open_db_in_memory().unwrap();
    let client_id = seed_client(&conn, "Gone");
    SqliteClientRepository::try_new(&conn)
        .unwrap()
        .soft_delete_client(client_id)
        .unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let err = repo
        .create_project(&NewProject::new("Late", client_id))
        .unwrap_err();

    assert!(err.is_constraint_violation());
    assert!(repo.list_projects().unwrap().is_empty());
}

#[test]
fn end_before_start_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let client_id = seed_client(&conn, "Acme");
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let mut payload = NewProject::new("Backwards", client_id);
    payload.start_date = Some(date(2025, 6, 1));
    payload.end_date = Some(date(2025, 5, 1));

    assert_eq!(
        repo.create_project(&payload).unwrap_err().code(),
        "validation_failed"
    );
}

#[test]
fn overview_joins_active_pairs_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let acme = seed_client(&conn, "Acme");
    let globex = seed_client(&conn, "Globex");
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let first = repo.create_project(&NewProject::new("P1", acme)).unwrap();
    let mut loud = NewProject::new("P2", globex);
    loud.status = Some("ONGOING".to_string());
    let second = repo.create_project(&loud).unwrap();
    let hidden = repo.create_project(&NewProject::new("P3", acme)).unwrap();
    repo.soft_delete_project(hidden.id).unwrap();

    let rows = repo.list_projects_with_client_name().unwrap();
    let summary: Vec<_> = rows
        .iter()
        .map(|row| (row.id, row.client_name.as_str(), row.status.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![(second.id, "Globex", "ongoing"), (first.id, "Acme", "planned")]
    );
}

#[test]
fn overview_hides_projects_of_soft_deleted_clients() {
    let conn = open_db_in_memory().unwrap();
    let acme = seed_client(&conn, "Acme");
    let globex = seed_client(&conn, "Globex");
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    repo.create_project(&NewProject::new("Kept", acme)).unwrap();
    repo.create_project(&NewProject::new("Hidden", globex))
        .unwrap();
    SqliteClientRepository::try_new(&conn)
        .unwrap()
        .soft_delete_client(globex)
        .unwrap();

    let titles: Vec<_> = repo
        .list_projects_with_client_name()
        .unwrap()
        .into_iter()
        .map(|row| row.title)
        .collect();
    assert_eq!(titles, vec!["Kept".to_string()]);
}

#[test]
fn projects_for_client_filter_by_owner() {
    let conn = open_db_in_memory().unwrap();
    let acme = seed_client(&conn, "Acme");
    let globex = seed_client(&conn, "Globex");
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let a1 = repo.create_project(&NewProject::new("A1", acme)).unwrap();
    repo.create_project(&NewProject::new("G1", globex)).unwrap();
    let a2 = repo.create_project(&NewProject::new("A2", acme)).unwrap();

    let ids: Vec<_> = repo
        .list_projects_for_client(acme)
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![a1.id, a2.id]);
}

#[test]
fn replace_keeps_project_when_client_is_later_soft_deleted() {
    let conn = open_db_in_memory().unwrap();
    let acme = seed_client(&conn, "Acme");
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();
    let project = repo.create_project(&NewProject::new("P1", acme)).unwrap();
    SqliteClientRepository::try_new(&conn)
        .unwrap()
        .soft_delete_client(acme)
        .unwrap();

    let mut payload = NewProject::new("P1 renamed", acme);
    payload.status = Some("completed".to_string());
    let replaced = repo.replace_project(project.id, &payload).unwrap();

    assert_eq!(replaced.title, "P1 renamed");
    assert_eq!(replaced.status, "completed");
}

#[test]
fn soft_deleted_project_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let acme = seed_client(&conn, "Acme");
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();
    let project = repo.create_project(&NewProject::new("P1", acme)).unwrap();

    repo.soft_delete_project(project.id).unwrap();

    assert!(repo.get_project(project.id).unwrap_err().is_not_found());
    assert!(repo.list_projects().unwrap().is_empty());
}
