//! # Outbound Queue
//!
//! Hand-off point between actions and the sender worker.
//!
//! Actions never send anything themselves. They submit an outgoing message
//! to an [`OutboundQueue`] inside the same storage transaction as the state
//! change it accompanies, so a job exists if and only if that change
//! committed. Delivery, retries and backoff belong to the worker that drains
//! the jobs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{MessageId, ThreadId, TombstoneMessage};
use crate::storage::WriteTransaction;

/// Job label used by the message sender worker
pub const MESSAGE_SENDER_LABEL: &str = "MessageSender";

/// A persisted request to deliver one outgoing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundJob {
    /// Job id (UUID)
    pub id: String,
    /// Which worker handles it
    pub label: String,
    /// Destination thread
    pub thread_id: ThreadId,
    /// Id of the message being sent
    pub message_id: MessageId,
    /// Serialized message (JSON)
    pub payload: String,
    /// Unix timestamp (milliseconds)
    pub created_at: i64,
}

impl OutboundJob {
    /// Decode the payload of a tombstone job
    pub fn tombstone(&self) -> Result<TombstoneMessage> {
        Ok(serde_json::from_str(&self.payload)?)
    }
}

/// Enqueues outgoing messages for delivery
pub trait OutboundQueue {
    /// Enqueue `message` as part of the caller's transaction.
    fn submit(&self, message: &TombstoneMessage, tx: &mut dyn WriteTransaction) -> Result<()>;
}

/// [`OutboundQueue`] that persists one job row per message for the sender
/// worker
#[derive(Debug, Clone, Default)]
pub struct MessageSenderJobQueue;

impl MessageSenderJobQueue {
    /// Create the queue
    pub fn new() -> Self {
        Self
    }
}

impl OutboundQueue for MessageSenderJobQueue {
    fn submit(&self, message: &TombstoneMessage, tx: &mut dyn WriteTransaction) -> Result<()> {
        let payload = serde_json::to_string(message)?;
        let job = OutboundJob {
            id: Uuid::new_v4().to_string(),
            label: MESSAGE_SENDER_LABEL.to_string(),
            thread_id: message.thread_id().clone(),
            message_id: message.id().clone(),
            payload,
            created_at: crate::time::now_timestamp_millis(),
        };

        tx.insert_outbound_job(&job)
            .map_err(|e| Error::EnqueueFailed(e.to_string()))?;

        tracing::debug!(
            job_id = %job.id,
            message_id = %job.message_id,
            "Enqueued outbound message"
        );
        Ok(())
    }
}
