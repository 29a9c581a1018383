//! Tracker use-case service.
//!
//! # Responsibility
//! - Expose the create/list/read use cases the presentation layer consumes.
//! - Emit one metadata-only log line per use case.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Repository errors are returned unchanged.
//! - Service layer remains storage-agnostic beyond `open`.

use crate::model::client::{Client, ClientId, NewClient};
use crate::model::invoice::{Invoice, NewInvoice};
use crate::model::project::{NewProject, Project, ProjectId, ProjectWithClientName};
use crate::model::task::{NewTask, Task};
use crate::repo::client_repo::{ClientRepository, SqliteClientRepository};
use crate::repo::invoice_repo::{InvoiceRepository, SqliteInvoiceRepository};
use crate::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::RepoResult;
use log::{info, warn};
use rusqlite::Connection;
use std::time::Instant;

/// Use-case facade over the four entity repositories.
pub struct TrackerService<C, P, T, I> {
    clients: C,
    projects: P,
    tasks: T,
    invoices: I,
}

/// Service wired to SQLite repositories sharing one borrowed connection.
pub type SqliteTrackerService<'conn> = TrackerService<
    SqliteClientRepository<'conn>,
    SqliteProjectRepository<'conn>,
    SqliteTaskRepository<'conn>,
    SqliteInvoiceRepository<'conn>,
>;

impl<'conn> SqliteTrackerService<'conn> {
    /// Builds all repositories over `conn`, verifying the schema once each.
    pub fn open(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(TrackerService::new(
            SqliteClientRepository::try_new(conn)?,
            SqliteProjectRepository::try_new(conn)?,
            SqliteTaskRepository::try_new(conn)?,
            SqliteInvoiceRepository::try_new(conn)?,
        ))
    }

    /// Builds all repositories without re-checking the schema.
    ///
    /// Only for connections owned by a [`crate::Store`], which verifies the
    /// schema once when it opens.
    pub(crate) fn verified(conn: &'conn Connection) -> Self {
        TrackerService::new(
            SqliteClientRepository::verified(conn),
            SqliteProjectRepository::verified(conn),
            SqliteTaskRepository::verified(conn),
            SqliteInvoiceRepository::verified(conn),
        )
    }
}

impl<C, P, T, I> TrackerService<C, P, T, I>
where
    C: ClientRepository,
    P: ProjectRepository,
    T: TaskRepository,
    I: InvoiceRepository,
{
    pub fn new(clients: C, projects: P, tasks: T, invoices: I) -> Self {
        Self {
            clients,
            projects,
            tasks,
            invoices,
        }
    }

    pub fn create_client(&self, payload: &NewClient) -> RepoResult<Client> {
        let started_at = Instant::now();
        let result = self.clients.create_client(payload);
        observe("client_create", started_at, result, |client| {
            format!("client_id={}", client.id)
        })
    }

    pub fn list_clients(&self) -> RepoResult<Vec<Client>> {
        let started_at = Instant::now();
        observe("client_list", started_at, self.clients.list_clients(), |rows| {
            format!("count={}", rows.len())
        })
    }

    pub fn get_client(&self, id: ClientId) -> RepoResult<Client> {
        let started_at = Instant::now();
        observe("client_get", started_at, self.clients.get_client(id), |client| {
            format!("client_id={}", client.id)
        })
    }

    /// Reverse collection view: active projects of one active client.
    pub fn client_projects(&self, id: ClientId) -> RepoResult<Vec<Project>> {
        let started_at = Instant::now();
        let result = self
            .clients
            .get_client(id)
            .and_then(|client| self.projects.list_projects_for_client(client.id));
        observe("client_projects", started_at, result, |rows| {
            format!("client_id={id} count={}", rows.len())
        })
    }

    pub fn create_project(&self, payload: &NewProject) -> RepoResult<Project> {
        let started_at = Instant::now();
        let result = self.projects.create_project(payload);
        observe("project_create", started_at, result, |project| {
            format!("project_id={} client_id={}", project.id, project.client_id)
        })
    }

    pub fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let started_at = Instant::now();
        observe("project_list", started_at, self.projects.list_projects(), |rows| {
            format!("count={}", rows.len())
        })
    }

    pub fn list_projects_with_client_name(&self) -> RepoResult<Vec<ProjectWithClientName>> {
        let started_at = Instant::now();
        let result = self.projects.list_projects_with_client_name();
        observe("project_overview", started_at, result, |rows| {
            format!("count={}", rows.len())
        })
    }

    /// Reverse collection view: active tasks of one active project.
    pub fn project_tasks(&self, id: ProjectId) -> RepoResult<Vec<Task>> {
        let started_at = Instant::now();
        let result = self
            .projects
            .get_project(id)
            .and_then(|project| self.tasks.list_tasks_for_project(project.id));
        observe("project_tasks", started_at, result, |rows| {
            format!("project_id={id} count={}", rows.len())
        })
    }

    /// Reverse collection view: active invoices of one active project.
    pub fn project_invoices(&self, id: ProjectId) -> RepoResult<Vec<Invoice>> {
        let started_at = Instant::now();
        let result = self
            .projects
            .get_project(id)
            .and_then(|project| self.invoices.list_invoices_for_project(project.id));
        observe("project_invoices", started_at, result, |rows| {
            format!("project_id={id} count={}", rows.len())
        })
    }

    pub fn create_task(&self, payload: &NewTask) -> RepoResult<Task> {
        let started_at = Instant::now();
        let result = self.tasks.create_task(payload);
        observe("task_create", started_at, result, |task| {
            format!("task_id={} project_id={}", task.id, task.project_id)
        })
    }

    pub fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let started_at = Instant::now();
        observe("task_list", started_at, self.tasks.list_tasks(), |rows| {
            format!("count={}", rows.len())
        })
    }

    pub fn create_invoice(&self, payload: &NewInvoice) -> RepoResult<Invoice> {
        let started_at = Instant::now();
        let result = self.invoices.create_invoice(payload);
        observe("invoice_create", started_at, result, |invoice| {
            format!("invoice_id={} project_id={}", invoice.id, invoice.project_id)
        })
    }

    pub fn list_invoices(&self) -> RepoResult<Vec<Invoice>> {
        let started_at = Instant::now();
        observe("invoice_list", started_at, self.invoices.list_invoices(), |rows| {
            format!("count={}", rows.len())
        })
    }
}

fn observe<V>(
    event: &'static str,
    started_at: Instant,
    result: RepoResult<V>,
    detail: impl FnOnce(&V) -> String,
) -> RepoResult<V> {
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(value) => info!(
            "event={event} module=service status=ok duration_ms={duration_ms} {}",
            detail(value)
        ),
        Err(err) => warn!(
            "event={event} module=service status=error duration_ms={duration_ms} error_code={} error={err}",
            err.code()
        ),
    }
    result
}
