//! SQLite-backed [`Storage`].

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;

use super::{schema, ReadTransaction, Storage, WriteTransaction};
use crate::error::{Error, Result};
use crate::model::{Message, MessageId, ThreadId};
use crate::outbound::OutboundJob;

/// The main database handle
///
/// Wraps a SQLite connection. Every [`Storage::read`] and
/// [`Storage::write`] call runs inside its own SQLite transaction.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create a database
    ///
    /// If path is None, creates an in-memory database (useful for testing).
    pub fn open(path: Option<&str>) -> Result<Self> {
        let conn = match path {
            Some(p) => Connection::open(p)
                .map_err(|e| Error::DatabaseError(format!("Failed to open database: {}", e)))?,
            None => Connection::open_in_memory()
                .map_err(|e| Error::DatabaseError(format!("Failed to create in-memory database: {}", e)))?,
        };

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.init_schema()?;

        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        let version: Option<i32> = conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
            .ok();

        match version {
            None => {
                conn.execute_batch(schema::CREATE_TABLES)
                    .map_err(|e| Error::DatabaseError(format!("Failed to create tables: {}", e)))?;

                conn.execute(
                    "INSERT INTO schema_version (version) VALUES (?)",
                    params![schema::SCHEMA_VERSION],
                )
                .map_err(|e| Error::DatabaseError(format!("Failed to set schema version: {}", e)))?;

                tracing::info!("Database schema created (version {})", schema::SCHEMA_VERSION);
            }
            Some(v) if v > schema::SCHEMA_VERSION => {
                return Err(Error::DatabaseError(format!(
                    "Database schema version {} is newer than supported {}",
                    v,
                    schema::SCHEMA_VERSION
                )));
            }
            Some(v) => {
                tracing::debug!("Database schema is at version {}", v);
            }
        }

        Ok(())
    }

    /// Insert or replace a message outside of any action
    pub fn store_message(&self, message: &Message) -> Result<()> {
        self.write(|tx| tx.save_message(message))
    }

    /// Load a message by id
    pub fn get_message(&self, id: &MessageId) -> Result<Option<Message>> {
        self.read(|tx| tx.fetch_message(id))
    }

    /// Count messages in a thread
    pub fn count_messages(&self, thread_id: &ThreadId) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE thread_id = ?",
            params![thread_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// All pending outbound jobs, oldest first
    pub fn outbound_jobs(&self) -> Result<Vec<OutboundJob>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, label, thread_id, message_id, payload, created_at
             FROM outbound_jobs ORDER BY seq ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(OutboundJob {
                id: row.get(0)?,
                label: row.get(1)?,
                thread_id: ThreadId::new(row.get::<_, String>(2)?),
                message_id: MessageId::new(row.get::<_, String>(3)?),
                payload: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;

        let mut jobs = Vec::new();
        for row in rows {
            jobs.push(row?);
        }
        Ok(jobs)
    }

    /// Drop a job once the sender worker has handled it
    pub fn remove_outbound_job(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM outbound_jobs WHERE id = ?", params![id])?;
        Ok(())
    }
}

impl Storage for Database {
    fn read<T>(&self, block: impl FnOnce(&dyn ReadTransaction) -> Result<T>) -> Result<T> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let handle = SqlTransaction { conn: &tx };
        // Dropping the transaction rolls back; nothing was written anyway.
        block(&handle)
    }

    fn write<T>(&self, block: impl FnOnce(&mut dyn WriteTransaction) -> Result<T>) -> Result<T> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let mut handle = SqlTransaction { conn: &tx };
        let value = block(&mut handle)?;
        tx.commit()?;
        Ok(value)
    }
}

/// Transaction handle handed to storage blocks
struct SqlTransaction<'c> {
    conn: &'c Connection,
}

impl ReadTransaction for SqlTransaction<'_> {
    fn fetch_message(&self, id: &MessageId) -> Result<Option<Message>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM messages WHERE id = ?",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

impl WriteTransaction for SqlTransaction<'_> {
    fn save_message(&mut self, message: &Message) -> Result<()> {
        let payload = serde_json::to_string(message)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO messages (id, thread_id, kind, timestamp, remotely_deleted, payload)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                message.id().as_str(),
                message.thread_id().as_str(),
                message.kind(),
                message.timestamp(),
                message.is_remotely_deleted(),
                payload,
            ],
        )?;
        Ok(())
    }

    fn remove_message(&mut self, id: &MessageId) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM messages WHERE id = ?", params![id.as_str()])?;
        Ok(removed > 0)
    }

    fn insert_outbound_job(&mut self, job: &OutboundJob) -> Result<()> {
        self.conn.execute(
            "INSERT INTO outbound_jobs (id, label, thread_id, message_id, payload, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                job.id,
                job.label,
                job.thread_id.as_str(),
                job.message_id.as_str(),
                job.payload,
                job.created_at,
            ],
        )?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
