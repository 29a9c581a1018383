//! Client repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/read/replace/delete APIs over `clients`.
//!
//! # Invariants
//! - Create re-reads the inserted row inside the same transaction.
//! - Hard delete relies on store cascades to remove projects and tasks.
//! - Duplicate emails surface as `ConstraintViolation { kind: Unique, .. }`.

use super::{
    bool_to_int, ensure_connection_ready, int_to_bool, EntityKind, RepoError, RepoResult,
};
use crate::model::client::{Client, ClientId, NewClient};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CLIENT_COLUMNS: [&str; 7] = [
    "id",
    "name",
    "email",
    "phone",
    "company_name",
    "address",
    "is_deleted",
];

const CLIENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    phone,
    company_name,
    address,
    is_deleted
FROM clients";

/// Repository interface for client persistence.
pub trait ClientRepository {
    fn create_client(&self, payload: &NewClient) -> RepoResult<Client>;
    fn list_clients(&self) -> RepoResult<Vec<Client>>;
    fn get_client(&self, id: ClientId) -> RepoResult<Client>;
    fn replace_client(&self, id: ClientId, payload: &NewClient) -> RepoResult<Client>;
    fn soft_delete_client(&self, id: ClientId) -> RepoResult<()>;
    /// Physically removes the client; projects and tasks follow by cascade.
    fn delete_client(&self, id: ClientId) -> RepoResult<()>;
}

/// SQLite-backed client repository.
pub struct SqliteClientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "clients", &CLIENT_COLUMNS)?;
        Ok(Self { conn })
    }

    /// Wraps a connection whose schema was already verified.
    pub(crate) fn verified(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn create_client(&self, payload: &NewClient) -> RepoResult<Client> {
        payload.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO clients (
                name,
                email,
                phone,
                company_name,
                address,
                is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, 0);",
            params![
                payload.name.as_str(),
                payload.email.as_deref(),
                payload.phone.as_deref(),
                payload.company_name.as_deref(),
                payload.address.as_deref(),
            ],
        )?;
        let client = load_client(&tx, tx.last_insert_rowid())?;
        tx.commit()?;

        Ok(client)
    }

    fn list_clients(&self) -> RepoResult<Vec<Client>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CLIENT_SELECT_SQL}
             WHERE is_deleted = 0
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut clients = Vec::new();
        while let Some(row) = rows.next()? {
            clients.push(parse_client_row(row)?);
        }
        Ok(clients)
    }

    fn get_client(&self, id: ClientId) -> RepoResult<Client> {
        let client = select_client(self.conn, id)?
            .filter(Client::is_active)
            .ok_or_else(|| RepoError::not_found(EntityKind::Client, id))?;
        Ok(client)
    }

    fn replace_client(&self, id: ClientId, payload: &NewClient) -> RepoResult<Client> {
        payload.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE clients
             SET
                name = ?2,
                email = ?3,
                phone = ?4,
                company_name = ?5,
                address = ?6
             WHERE id = ?1
               AND is_deleted = 0;",
            params![
                id,
                payload.name.as_str(),
                payload.email.as_deref(),
                payload.phone.as_deref(),
                payload.company_name.as_deref(),
                payload.address.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Client, id));
        }
        let client = load_client(&tx, id)?;
        tx.commit()?;

        Ok(client)
    }

    fn soft_delete_client(&self, id: ClientId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE clients SET is_deleted = ?2 WHERE id = ?1;",
            params![id, bool_to_int(true)],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Client, id));
        }
        Ok(())
    }

    fn delete_client(&self, id: ClientId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM clients WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Client, id));
        }
        Ok(())
    }
}

fn select_client(conn: &Connection, id: ClientId) -> RepoResult<Option<Client>> {
    let mut stmt = conn.prepare(&format!("{CLIENT_SELECT_SQL} WHERE id = ?1;"))?;
    let row = stmt
        .query_row([id], |row| Ok(parse_client_row(row)))
        .optional()?;
    row.transpose()
}

fn load_client(conn: &Connection, id: ClientId) -> RepoResult<Client> {
    select_client(conn, id)?.ok_or_else(|| RepoError::not_found(EntityKind::Client, id))
}

fn parse_client_row(row: &Row<'_>) -> RepoResult<Client> {
    Ok(Client {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        company_name: row.get("company_name")?,
        address: row.get("address")?,
        is_deleted: int_to_bool(row.get("is_deleted")?, "clients.is_deleted")?,
    })
}
