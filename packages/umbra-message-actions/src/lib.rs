//! # Umbra Message Actions
//!
//! The per-message action menu of a conversation: details, reply, forward,
//! select, and delete (for me or for everyone).
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     UMBRA MESSAGE ACTIONS MODULES                       │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │                          Actions                                 │   │
//! │  │  details · reply · forward · selection · delete                  │   │
//! │  └───────┬──────────────────────┬──────────────────────┬────────────┘   │
//! │          │                      │                      │                │
//! │  ┌───────▼──────┐       ┌───────▼──────┐       ┌───────▼──────┐         │
//! │  │    Model     │       │   Storage    │       │   Outbound   │         │
//! │  │              │       │              │       │              │         │
//! │  │ - Messages   │       │ - SQLite     │◄──────│ - Job queue  │         │
//! │  │ - Tombstones │       │ - Atomic tx  │       │ - Same tx    │         │
//! │  └──────────────┘       └──────────────┘       └──────────────┘         │
//! │                                                                         │
//! │  Config · Error · UI thread guard · Time                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`actions`] - The action facade and the view-layer traits it drives
//! - [`model`] - Message records, references and tombstones
//! - [`storage`] - Transactional message store (SQLite)
//! - [`outbound`] - Outbound job queue for the sender worker
//! - [`config`] - Tunables (confirmation policy, quote length)
//! - [`error`] - Error types for the entire library
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use umbra_message_actions::{
//!     ActionsConfig, Collaborators, Database, MessageActions, MessageSenderJobQueue,
//! };
//!
//! let actions = MessageActions::new(
//!     Collaborators {
//!         storage: Arc::new(Database::open(Some("messages.db"))?),
//!         outbound: Arc::new(MessageSenderJobQueue::new()),
//!         eligibility: Arc::new(|m: &Message| within_delete_window(m)),
//!         confirmation: prompt,
//!         forward_flow: picker,
//!     },
//!     ActionsConfig::default(),
//! );
//!
//! actions.delete_item(&item, &conversation)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod actions;
pub mod config;
pub mod error;
pub mod model;
pub mod outbound;
pub mod storage;
/// Wall-clock helpers.
pub mod time;
pub mod ui_thread;

#[cfg(test)]
mod test_support;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use actions::{Collaborators, ConversationContext, MessageActions, ViewHandles};
pub use config::{ActionsConfig, ConfirmationMode};
pub use error::{Error, Result};
pub use model::{Message, MessageRef, TombstoneMessage};
pub use outbound::{MessageSenderJobQueue, OutboundQueue};
pub use storage::{Database, Storage};

/// Returns the version of this crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
