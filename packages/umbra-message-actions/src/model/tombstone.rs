//! Delete-for-everyone tombstones.

use serde::{Deserialize, Serialize};

use super::{MessageId, OutgoingMessage, RecipientStates, ThreadId};

/// Outgoing control message telling every participant to delete a message
///
/// A fresh tombstone has no delivery state of its own. Its recipient states
/// are filled by [`transfer_recipient_states`](Self::transfer_recipient_states)
/// inside the same transaction that clears the original, so the tombstone
/// reports the receipts the original had.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TombstoneMessage {
    id: MessageId,
    thread_id: ThreadId,
    target_message_id: MessageId,
    target_timestamp: i64,
    created_at: i64,
    recipient_states: RecipientStates,
}

impl TombstoneMessage {
    /// Create a tombstone in `thread_id` targeting `target`
    pub fn new(thread_id: ThreadId, target: &OutgoingMessage) -> Self {
        Self {
            id: MessageId::generate(),
            thread_id,
            target_message_id: target.id.clone(),
            target_timestamp: target.timestamp,
            created_at: crate::time::now_timestamp_millis(),
            recipient_states: RecipientStates::new(),
        }
    }

    /// Replace this tombstone's recipient states with a copy of `source`'s.
    pub fn transfer_recipient_states(&mut self, source: &OutgoingMessage) {
        self.recipient_states = source.recipient_states.clone();
    }

    /// Tombstone id
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Thread the tombstone is sent to
    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    /// The message being deleted
    pub fn target_message_id(&self) -> &MessageId {
        &self.target_message_id
    }

    /// Sent timestamp of the message being deleted; peers match on it
    pub fn target_timestamp(&self) -> i64 {
        self.target_timestamp
    }

    /// When the tombstone was created (milliseconds)
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Delivery state per recipient
    pub fn recipient_states(&self) -> &RecipientStates {
        &self.recipient_states
    }
}
