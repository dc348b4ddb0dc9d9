//! # Storage Module
//!
//! Transactional access to message records.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         TRANSACTION BOUNDARY                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  storage.write(|tx| {                                                   │
//! │      tx.fetch_message(..)          ┐                                    │
//! │      tx.save_message(..)           │  all committed together,           │
//! │      queue.submit(.., tx)          │  or all rolled back if any         │
//! │  })                                ┘  step returns Err                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Actions only see the [`Storage`] trait. [`Database`] is the SQLite
//! implementation the clients ship with.

mod database;
mod schema;

pub use database::Database;

use crate::error::Result;
use crate::model::{Message, MessageId};
use crate::outbound::OutboundJob;

/// Read access inside a transaction
pub trait ReadTransaction {
    /// Load a message by id
    fn fetch_message(&self, id: &MessageId) -> Result<Option<Message>>;
}

/// Write access inside a transaction
///
/// Nothing written through this handle is visible outside the transaction
/// until the enclosing [`Storage::write`] block returns `Ok`.
pub trait WriteTransaction: ReadTransaction {
    /// Insert or replace a message record
    fn save_message(&mut self, message: &Message) -> Result<()>;

    /// Remove a message record. Returns whether a row was removed.
    fn remove_message(&mut self, id: &MessageId) -> Result<bool>;

    /// Persist an outbound job
    fn insert_outbound_job(&mut self, job: &OutboundJob) -> Result<()>;
}

/// Transaction runner
///
/// Both methods run `block` synchronously. `write` is atomic: every
/// mutation issued through the handle commits together, and an `Err` from
/// the block rolls all of them back.
pub trait Storage {
    /// Run `block` against a read transaction
    fn read<T>(&self, block: impl FnOnce(&dyn ReadTransaction) -> Result<T>) -> Result<T>;

    /// Run `block` against a write transaction
    fn write<T>(&self, block: impl FnOnce(&mut dyn WriteTransaction) -> Result<T>) -> Result<T>;
}
