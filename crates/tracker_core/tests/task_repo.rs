use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rusqlite::Connection;
use tracker_core::db::open_db_in_memory;
use tracker_core::repo::client_repo::{ClientRepository, SqliteClientRepository};
use tracker_core::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use tracker_core::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use tracker_core::{ConstraintKind, NewClient, NewProject, NewTask, ProjectId, RepoError};

fn seed_project(conn: &Connection, title: &str) -> ProjectId {
    let client = SqliteClientRepository::try_new(conn)
        .unwrap()
        .create_client(&NewClient::new(format!("{title} client")))
        .unwrap();
    SqliteProjectRepository::try_new(conn)
        .unwrap()
        .create_project(&NewProject::new(title, client.id))
        .unwrap()
        .id
}

#[test]
fn create_defaults_completed_to_false() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn, "Site Revamp");
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut payload = NewTask::new(project_id, "Design mockups");
    payload.assigned_to = Some("sam".to_string());
    payload.due_date = NaiveDate::from_ymd_opt(2025, 4, 15);
    let task = repo.create_task(&payload).unwrap();

    assert_eq!(task.project_id, project_id);
    assert_eq!(task.title, "Design mockups");
    assert_eq!(task.assigned_to.as_deref(), Some("sam"));
    assert_eq!(task.due_date, payload.due_date);
    assert!(!task.completed);
    assert!(!task.is_deleted);
}

#[test]
fn completed_flag_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn, "Site Revamp");
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut payload = NewTask::new(project_id, "Kickoff");
    payload.completed = Some(true);
    let task = repo.create_task(&payload).unwrap();

    assert!(repo.get_task(task.id).unwrap().completed);
}

#[test]
fn missing_project_is_foreign_key_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let err = repo.create_task(&NewTask::new(77, "Orphan")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::ConstraintViolation {
            kind: ConstraintKind::ForeignKey,
            ..
        }
    ));
}

#[test]
fn tasks_for_project_skip_other_projects_and_soft_deleted_rows() {
    let conn = open_db_in_memory().unwrap();
    let revamp = seed_project(&conn, "Site Revamp");
    let audit = seed_project(&conn, "Audit");
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let kept = repo.create_task(&NewTask::new(revamp, "Mockups")).unwrap();
    let dropped = repo.create_task(&NewTask::new(revamp, "Copy")).unwrap();
    repo.create_task(&NewTask::new(audit, "Checklist")).unwrap();
    repo.soft_delete_task(dropped.id).unwrap();

    let titles: Vec<_> = repo
        .list_tasks_for_project(revamp)
        .unwrap()
        .into_iter()
        .map(|task| task.title)
        .collect();
    assert_eq!(titles, vec![kept.title]);
    assert_eq!(repo.list_tasks().unwrap().len(), 2);
}

#[test]
fn replace_marks_task_completed() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn, "Site Revamp");
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let task = repo.create_task(&NewTask::new(project_id, "Mockups")).unwrap();

    let mut payload = NewTask::new(project_id, "Mockups v2");
    payload.completed = Some(true);
    let replaced = repo.replace_task(task.id, &payload).unwrap();

    assert_eq!(replaced.title, "Mockups v2");
    assert!(replaced.completed);
}
