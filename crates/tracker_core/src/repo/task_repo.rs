//! Task repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `project_id` must reference an existing project (foreign key).
//! - Tasks disappear only through the project cascade; there is no task
//!   hard delete.

use super::{
    bool_to_int, ensure_connection_ready, int_to_bool, EntityKind, RepoError, RepoResult,
};
use crate::model::project::ProjectId;
use crate::model::task::{NewTask, Task, TaskId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TASK_COLUMNS: [&str; 8] = [
    "id",
    "project_id",
    "title",
    "description",
    "assigned_to",
    "due_date",
    "completed",
    "is_deleted",
];

const TASK_SELECT_SQL: &str = "SELECT
    id,
    project_id,
    title,
    description,
    assigned_to,
    due_date,
    completed,
    is_deleted
FROM tasks";

/// Repository interface for task persistence.
pub trait TaskRepository {
    fn create_task(&self, payload: &NewTask) -> RepoResult<Task>;
    fn list_tasks(&self) -> RepoResult<Vec<Task>>;
    fn list_tasks_for_project(&self, project_id: ProjectId) -> RepoResult<Vec<Task>>;
    fn get_task(&self, id: TaskId) -> RepoResult<Task>;
    fn replace_task(&self, id: TaskId, payload: &NewTask) -> RepoResult<Task>;
    fn soft_delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "tasks", &TASK_COLUMNS)?;
        Ok(Self { conn })
    }

    /// Wraps a connection whose schema was already verified.
    pub(crate) fn verified(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_tasks(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, payload: &NewTask) -> RepoResult<Task> {
        payload.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO tasks (
                project_id,
                title,
                description,
                assigned_to,
                due_date,
                completed,
                is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0);",
            params![
                payload.project_id,
                payload.title.as_str(),
                payload.description.as_deref(),
                payload.assigned_to.as_deref(),
                payload.due_date,
                bool_to_int(payload.effective_completed()),
            ],
        )?;
        let task = load_task(&tx, tx.last_insert_rowid())?;
        tx.commit()?;

        Ok(task)
    }

    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!(
                "{TASK_SELECT_SQL}
                 WHERE is_deleted = 0
                 ORDER BY id ASC;"
            ),
            [],
        )
    }

    fn list_tasks_for_project(&self, project_id: ProjectId) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!(
                "{TASK_SELECT_SQL}
                 WHERE project_id = ?1
                   AND is_deleted = 0
                 ORDER BY id ASC;"
            ),
            [project_id],
        )
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Task> {
        let task = select_task(self.conn, id)?
            .filter(Task::is_active)
            .ok_or_else(|| RepoError::not_found(EntityKind::Task, id))?;
        Ok(task)
    }

    fn replace_task(&self, id: TaskId, payload: &NewTask) -> RepoResult<Task> {
        payload.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE tasks
             SET
                project_id = ?2,
                title = ?3,
                description = ?4,
                assigned_to = ?5,
                due_date = ?6,
                completed = ?7
             WHERE id = ?1
               AND is_deleted = 0;",
            params![
                id,
                payload.project_id,
                payload.title.as_str(),
                payload.description.as_deref(),
                payload.assigned_to.as_deref(),
                payload.due_date,
                bool_to_int(payload.effective_completed()),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Task, id));
        }
        let task = load_task(&tx, id)?;
        tx.commit()?;

        Ok(task)
    }

    fn soft_delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET is_deleted = ?2 WHERE id = ?1;",
            params![id, bool_to_int(true)],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Task, id));
        }
        Ok(())
    }
}

fn select_task(conn: &Connection, id: TaskId) -> RepoResult<Option<Task>> {
    let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
    let row = stmt
        .query_row([id], |row| Ok(parse_task_row(row)))
        .optional()?;
    row.transpose()
}

fn load_task(conn: &Connection, id: TaskId) -> RepoResult<Task> {
    select_task(conn, id)?.ok_or_else(|| RepoError::not_found(EntityKind::Task, id))
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    Ok(Task {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        assigned_to: row.get("assigned_to")?,
        due_date: row.get("due_date")?,
        completed: int_to_bool(row.get("completed")?, "tasks.completed")?,
        is_deleted: int_to_bool(row.get("is_deleted")?, "tasks.is_deleted")?,
    })
}
