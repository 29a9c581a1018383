use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use tracker_core::{
    NewClient, NewInvoice, NewProject, NewTask, RepoError, SqliteTrackerService, Store,
};

#[test]
fn acme_site_revamp_walkthrough() {
    let store = Store::open_in_memory().unwrap();

    store
        .with_conn(|conn| {
            let service = SqliteTrackerService::open(conn)?;

            let acme = service.create_client(&NewClient::new("Acme").with_email("a@x.com"))?;
            let project = service.create_project(&NewProject::new("Site Revamp", acme.id))?;
            let task = service.create_task(&NewTask::new(project.id, "Design mockups"))?;

            assert_eq!(service.list_clients()?, vec![acme.clone()]);
            assert_eq!(service.list_projects()?, vec![project.clone()]);
            assert_eq!(service.list_tasks()?, vec![task.clone()]);
            assert_eq!(project.status, "planned");
            assert!(!task.completed);

            let overview = service.list_projects_with_client_name()?;
            assert_eq!(overview.len(), 1);
            assert_eq!(overview[0].client_name, "Acme");
            assert_eq!(overview[0].title, "Site Revamp");
            Ok::<_, RepoError>(())
        })
        .unwrap();
}

#[test]
fn reverse_collections_require_active_parent() {
    let store = Store::open_in_memory().unwrap();

    store
        .with_service(|service| {
            let acme = service.create_client(&NewClient::new("Acme"))?;
            let project = service.create_project(&NewProject::new("Site Revamp", acme.id))?;
            service.create_task(&NewTask::new(project.id, "Design mockups"))?;
            let invoice = service.create_invoice(&NewInvoice::new(
                project.id,
                Decimal::new(150_050, 2),
                NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            ))?;

            assert_eq!(service.client_projects(acme.id)?, vec![project.clone()]);
            assert_eq!(service.project_tasks(project.id)?.len(), 1);
            assert_eq!(service.project_invoices(project.id)?, vec![invoice]);
            assert_eq!(service.get_client(acme.id)?, acme);

            assert!(service.client_projects(acme.id + 100).unwrap_err().is_not_found());
            assert!(service.project_tasks(project.id + 100).unwrap_err().is_not_found());
            Ok::<_, RepoError>(())
        })
        .unwrap();
}

#[test]
fn service_surfaces_constraint_violations_unchanged() {
    let store = Store::open_in_memory().unwrap();

    let err = store
        .with_conn(|conn| {
            let service = SqliteTrackerService::open(conn)?;
            service.create_project(&NewProject::new("Orphan", 404))
        })
        .unwrap_err();

    assert!(err.is_constraint_violation());
    assert_eq!(err.code(), "constraint_violation");
}
