//! # Database Schema
//!
//! SQL schema for message actions.
//!
//! ## Schema Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         DATABASE SCHEMA                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────────────┐              ┌──────────────────┐                 │
//! │  │    messages      │              │  outbound_jobs   │                 │
//! │  ├──────────────────┤              ├──────────────────┤                 │
//! │  │ id               │              │ seq              │                 │
//! │  │ thread_id        │              │ id               │                 │
//! │  │ kind             │              │ label            │                 │
//! │  │ timestamp        │              │ thread_id        │                 │
//! │  │ remotely_deleted │              │ message_id       │                 │
//! │  │ payload (JSON)   │              │ payload (JSON)   │                 │
//! │  └──────────────────┘              │ created_at       │                 │
//! │                                    └──────────────────┘                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL to create all tables
pub const CREATE_TABLES: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Messages table
-- The full record is kept as JSON; the other columns are for queries
CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    thread_id TEXT NOT NULL,
    -- incoming / outgoing / system
    kind TEXT NOT NULL,
    -- Unix timestamp (milliseconds)
    timestamp INTEGER NOT NULL,
    remotely_deleted INTEGER NOT NULL DEFAULT 0,
    payload TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_messages_thread ON messages(thread_id, timestamp);

-- Outbound jobs table
-- Messages waiting for the sender worker, in submission order
CREATE TABLE IF NOT EXISTS outbound_jobs (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    label TEXT NOT NULL,
    thread_id TEXT NOT NULL,
    -- Id of the message being sent (for tombstones, the tombstone id)
    message_id TEXT NOT NULL,
    payload TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_outbound_jobs_thread ON outbound_jobs(thread_id);
"#;
