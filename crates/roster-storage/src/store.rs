// Person store over an embedded SQLite database
//
// A single connection guarded by a mutex; SQLite serializes writers
// anyway, so one connection keeps the locking story simple. The store is
// non-reentrant for async contexts: callers on a cooperative scheduler
// must hop onto a worker thread first.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::models::{CreatePerson, PersonRow, UpdatePerson};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS persons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    age INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

pub struct PersonStore {
    conn: Mutex<Connection>,
}

impl PersonStore {
    /// Open (or create) the database at `path` and ensure the schema
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).with_context(|| {
            format!("failed to open database at {}", path.as_ref().display())
        })?;
        Self::from_connection(conn)
    }

    /// In-memory database, used by tests and the default dev setup
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .context("failed to initialize schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn insert_one(&self, input: &CreatePerson) -> Result<PersonRow> {
        let now = Utc::now();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO persons (name, age, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![input.name, input.age, now, now],
        )?;
        Ok(PersonRow {
            id: conn.last_insert_rowid(),
            name: input.name.clone(),
            age: input.age,
            created_at: now,
            updated_at: now,
        })
    }

    /// Inserts `inputs` in chunks of `chunk_size`, one transaction per
    /// chunk, and returns the total number of rows written. Chunking
    /// bounds per-transaction memory and fsync cost for very large inputs.
    pub fn insert_many(&self, inputs: &[CreatePerson], chunk_size: usize) -> Result<usize> {
        if inputs.is_empty() {
            return Ok(0);
        }
        let chunk_size = chunk_size.max(1);
        let now = Utc::now();
        let mut conn = self.conn.lock().unwrap();
        let mut written = 0;

        for chunk in inputs.chunks(chunk_size) {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO persons (name, age, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
                )?;
                for input in chunk {
                    stmt.execute(params![input.name, input.age, now, now])?;
                }
            }
            tx.commit()?;
            written += chunk.len();
        }

        debug!(total = written, chunk_size, "bulk insert committed");
        Ok(written)
    }

    pub fn get(&self, id: i64) -> Result<Option<PersonRow>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT id, name, age, created_at, updated_at FROM persons WHERE id = ?1",
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    pub fn list(&self, limit: i64, offset: i64) -> Result<Vec<PersonRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, age, created_at, updated_at FROM persons ORDER BY id LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt
            .query_map(params![limit, offset], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn update(&self, id: i64, input: &UpdatePerson) -> Result<Option<PersonRow>> {
        let now = Utc::now();
        {
            let conn = self.conn.lock().unwrap();
            let affected = conn.execute(
                "UPDATE persons
                 SET name = COALESCE(?2, name), age = COALESCE(?3, age), updated_at = ?4
                 WHERE id = ?1",
                params![id, input.name, input.age, now],
            )?;
            if affected == 0 {
                return Ok(None);
            }
        }
        self.get(id)
    }

    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute("DELETE FROM persons WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let n = conn.query_row("SELECT COUNT(*) FROM persons", [], |row| row.get(0))?;
        Ok(n)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PersonRow> {
        Ok(PersonRow {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}
