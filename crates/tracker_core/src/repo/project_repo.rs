//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/read/replace/delete APIs over `projects`.
//! - Own the joined project + client-name read.
//!
//! # Invariants
//! - `client_id` existence and activeness are enforced by the store
//!   (foreign key + trigger); this layer does not pre-check them.
//! - The joined read is one `JOIN` query, never one query per project.
//! - Joined rows are ordered by project id descending.
//! - Deleting a project that still has invoices is rejected by the store.

use super::{
    bool_to_int, ensure_connection_ready, int_to_bool, EntityKind, RepoError, RepoResult,
};
use crate::model::client::ClientId;
use crate::model::project::{
    normalize_status, NewProject, Project, ProjectId, ProjectWithClientName,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

const PROJECT_COLUMNS: [&str; 9] = [
    "id",
    "title",
    "description",
    "client_id",
    "start_date",
    "end_date",
    "status",
    "budget",
    "is_deleted",
];

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    client_id,
    start_date,
    end_date,
    status,
    budget,
    is_deleted
FROM projects";

/// Repository interface for project persistence.
pub trait ProjectRepository {
    fn create_project(&self, payload: &NewProject) -> RepoResult<Project>;
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
    fn list_projects_with_client_name(&self) -> RepoResult<Vec<ProjectWithClientName>>;
    /// Active projects owned by `client_id`, id ascending.
    fn list_projects_for_client(&self, client_id: ClientId) -> RepoResult<Vec<Project>>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Project>;
    fn replace_project(&self, id: ProjectId, payload: &NewProject) -> RepoResult<Project>;
    fn soft_delete_project(&self, id: ProjectId) -> RepoResult<()>;
    /// Physically removes the project; tasks follow by cascade, invoices block.
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "projects", &PROJECT_COLUMNS)?;
        Ok(Self { conn })
    }

    /// Wraps a connection whose schema was already verified.
    pub(crate) fn verified(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_projects(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, payload: &NewProject) -> RepoResult<Project> {
        payload.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO projects (
                title,
                description,
                client_id,
                start_date,
                end_date,
                status,
                budget,
                is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0);",
            params![
                payload.title.as_str(),
                payload.description.as_deref(),
                payload.client_id,
                payload.start_date,
                payload.end_date,
                payload.effective_status(),
                payload.budget,
            ],
        )?;
        let project = load_project(&tx, tx.last_insert_rowid())?;
        tx.commit()?;

        Ok(project)
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        self.query_projects(
            &format!(
                "{PROJECT_SELECT_SQL}
                 WHERE is_deleted = 0
                 ORDER BY id ASC;"
            ),
            [],
        )
    }

    fn list_projects_with_client_name(&self) -> RepoResult<Vec<ProjectWithClientName>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                p.id AS id,
                p.title AS title,
                p.description AS description,
                p.client_id AS client_id,
                c.name AS client_name,
                p.start_date AS start_date,
                p.end_date AS end_date,
                p.status AS status,
                p.budget AS budget
             FROM projects p
             JOIN clients c ON c.id = p.client_id
             WHERE p.is_deleted = 0
               AND c.is_deleted = 0
             ORDER BY p.id DESC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            let status: String = row.get("status")?;
            projects.push(ProjectWithClientName {
                id: row.get("id")?,
                title: row.get("title")?,
                description: row.get("description")?,
                client_id: row.get("client_id")?,
                client_name: row.get("client_name")?,
                start_date: row.get("start_date")?,
                end_date: row.get("end_date")?,
                status: normalize_status(&status),
                budget: row.get("budget")?,
            });
        }
        Ok(projects)
    }

    fn list_projects_for_client(&self, client_id: ClientId) -> RepoResult<Vec<Project>> {
        self.query_projects(
            &format!(
                "{PROJECT_SELECT_SQL}
                 WHERE client_id = ?1
                   AND is_deleted = 0
                 ORDER BY id ASC;"
            ),
            [client_id],
        )
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Project> {
        let project = select_project(self.conn, id)?
            .filter(Project::is_active)
            .ok_or_else(|| RepoError::not_found(EntityKind::Project, id))?;
        Ok(project)
    }

    fn replace_project(&self, id: ProjectId, payload: &NewProject) -> RepoResult<Project> {
        payload.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE projects
             SET
                title = ?2,
                description = ?3,
                client_id = ?4,
                start_date = ?5,
                end_date = ?6,
                status = ?7,
                budget = ?8
             WHERE id = ?1
               AND is_deleted = 0;",
            params![
                id,
                payload.title.as_str(),
                payload.description.as_deref(),
                payload.client_id,
                payload.start_date,
                payload.end_date,
                payload.effective_status(),
                payload.budget,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Project, id));
        }
        let project = load_project(&tx, id)?;
        tx.commit()?;

        Ok(project)
    }

    fn soft_delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE projects SET is_deleted = ?2 WHERE id = ?1;",
            params![id, bool_to_int(true)],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Project, id));
        }
        Ok(())
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Project, id));
        }
        Ok(())
    }
}

fn select_project(conn: &Connection, id: ProjectId) -> RepoResult<Option<Project>> {
    let mut stmt = conn.prepare(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;
    let row = stmt
        .query_row([id], |row| Ok(parse_project_row(row)))
        .optional()?;
    row.transpose()
}

fn load_project(conn: &Connection, id: ProjectId) -> RepoResult<Project> {
    select_project(conn, id)?.ok_or_else(|| RepoError::not_found(EntityKind::Project, id))
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    Ok(Project {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        client_id: row.get("client_id")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
        status: row.get("status")?,
        budget: row.get("budget")?,
        is_deleted: int_to_bool(row.get("is_deleted")?, "projects.is_deleted")?,
    })
}
