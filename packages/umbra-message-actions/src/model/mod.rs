//! # Message Model
//!
//! The message records that actions operate on.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          MESSAGE VARIANTS                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Message                                                                │
//! │  ├── Incoming  author, body, attachments, remotely_deleted             │
//! │  ├── Outgoing  body, attachments, recipient_states, remotely_deleted   │
//! │  └── System    informational text (joins, timer changes)               │
//! │                                                                         │
//! │  MessageRef = RenderItemId + snapshot of the Message                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Renderable content" is the body plus attachments. Deleting a message for
//! everyone clears both and leaves a remotely-deleted placeholder behind.

mod tombstone;

pub use tombstone::TombstoneMessage;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Unique identity of a message record
    MessageId
);
string_id!(
    /// Conversation thread a message belongs to
    ThreadId
);
string_id!(
    /// Stable identifier of a rendered message cell
    RenderItemId
);
string_id!(
    /// Identifies one open conversation view
    ContextId
);
string_id!(
    /// A participant address (DID)
    Address
);

impl MessageId {
    /// Generate a fresh random message id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Per-recipient delivery state of an outgoing message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    /// Still being sent
    Sending,
    /// Accepted by the relay
    Sent,
    /// Delivered to the recipient's device
    Delivered,
    /// Read by the recipient
    Read,
    /// Viewed (view-once media)
    Viewed,
    /// Sending failed
    Failed,
    /// Recipient was skipped (e.g. left the group)
    Skipped,
}

/// Delivery state keyed by recipient, in stable order
pub type RecipientStates = BTreeMap<Address, DeliveryState>;

/// An attachment on a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    /// Attachment id
    pub id: String,
    /// MIME type
    pub content_type: String,
    /// Original file name, if known
    pub filename: Option<String>,
}

/// A message we received
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Message id
    pub id: MessageId,
    /// Thread this belongs to
    pub thread_id: ThreadId,
    /// Who sent it
    pub author: Address,
    /// Unix timestamp (milliseconds)
    pub timestamp: i64,
    /// Text body
    pub body: Option<String>,
    /// Attachments
    pub attachments: Vec<Attachment>,
    /// The sender deleted it for everyone
    pub remotely_deleted: bool,
}

impl IncomingMessage {
    /// Create an incoming text message
    pub fn new(thread_id: ThreadId, author: Address, body: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            thread_id,
            author,
            timestamp: crate::time::now_timestamp_millis(),
            body: Some(body.into()),
            attachments: Vec::new(),
            remotely_deleted: false,
        }
    }
}

/// A message we sent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Message id
    pub id: MessageId,
    /// Thread this belongs to
    pub thread_id: ThreadId,
    /// Unix timestamp (milliseconds)
    pub timestamp: i64,
    /// Text body
    pub body: Option<String>,
    /// Attachments
    pub attachments: Vec<Attachment>,
    /// Delivery state per recipient
    pub recipient_states: RecipientStates,
    /// We deleted it for everyone
    pub remotely_deleted: bool,
}

impl OutgoingMessage {
    /// Create an outgoing text message
    pub fn new(thread_id: ThreadId, body: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            thread_id,
            timestamp: crate::time::now_timestamp_millis(),
            body: Some(body.into()),
            attachments: Vec::new(),
            recipient_states: RecipientStates::new(),
            remotely_deleted: false,
        }
    }

    /// Set the message id
    pub fn with_id(mut self, id: impl Into<MessageId>) -> Self {
        self.id = id.into();
        self
    }

    /// Record a recipient's delivery state
    pub fn with_recipient_state(mut self, recipient: impl Into<Address>, state: DeliveryState) -> Self {
        self.recipient_states.insert(recipient.into(), state);
        self
    }

    /// Attach a file
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Flag as deleted for everyone and drop all renderable content.
    ///
    /// Recipient states are left alone so the placeholder keeps showing
    /// delivery history.
    pub fn mark_remotely_deleted(&mut self) {
        self.body = None;
        self.attachments.clear();
        self.remotely_deleted = true;
    }
}

/// An informational row in the conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemMessage {
    /// Message id
    pub id: MessageId,
    /// Thread this belongs to
    pub thread_id: ThreadId,
    /// Unix timestamp (milliseconds)
    pub timestamp: i64,
    /// Rendered text
    pub text: String,
}

impl SystemMessage {
    /// Create a system message
    pub fn new(thread_id: ThreadId, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            thread_id,
            timestamp: crate::time::now_timestamp_millis(),
            text: text.into(),
        }
    }
}

/// A message record, closed over the kinds a conversation can show
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    /// Received from a peer
    Incoming(IncomingMessage),
    /// Sent by us
    Outgoing(OutgoingMessage),
    /// Informational
    System(SystemMessage),
}

impl Message {
    /// Message id
    pub fn id(&self) -> &MessageId {
        match self {
            Self::Incoming(m) => &m.id,
            Self::Outgoing(m) => &m.id,
            Self::System(m) => &m.id,
        }
    }

    /// Thread id
    pub fn thread_id(&self) -> &ThreadId {
        match self {
            Self::Incoming(m) => &m.thread_id,
            Self::Outgoing(m) => &m.thread_id,
            Self::System(m) => &m.thread_id,
        }
    }

    /// Unix timestamp (milliseconds)
    pub fn timestamp(&self) -> i64 {
        match self {
            Self::Incoming(m) => m.timestamp,
            Self::Outgoing(m) => m.timestamp,
            Self::System(m) => m.timestamp,
        }
    }

    /// Text body, if any
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Incoming(m) => m.body.as_deref(),
            Self::Outgoing(m) => m.body.as_deref(),
            Self::System(_) => None,
        }
    }

    /// Attachments (system messages have none)
    pub fn attachments(&self) -> &[Attachment] {
        match self {
            Self::Incoming(m) => &m.attachments,
            Self::Outgoing(m) => &m.attachments,
            Self::System(_) => &[],
        }
    }

    /// Whether this was deleted for everyone
    pub fn is_remotely_deleted(&self) -> bool {
        match self {
            Self::Incoming(m) => m.remotely_deleted,
            Self::Outgoing(m) => m.remotely_deleted,
            Self::System(_) => false,
        }
    }

    /// Check if this message is from us
    pub fn is_outgoing(&self) -> bool {
        matches!(self, Self::Outgoing(_))
    }

    /// Incoming and outgoing messages; system rows are not user messages
    pub fn is_user_message(&self) -> bool {
        !matches!(self, Self::System(_))
    }

    /// Short label for logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Incoming(_) => "incoming",
            Self::Outgoing(_) => "outgoing",
            Self::System(_) => "system",
        }
    }
}

impl From<IncomingMessage> for Message {
    fn from(m: IncomingMessage) -> Self {
        Self::Incoming(m)
    }
}

impl From<OutgoingMessage> for Message {
    fn from(m: OutgoingMessage) -> Self {
        Self::Outgoing(m)
    }
}

impl From<SystemMessage> for Message {
    fn from(m: SystemMessage) -> Self {
        Self::System(m)
    }
}

/// A rendered message an action was raised on
///
/// Captured once when the user opens the action menu and never mutated
/// afterwards. Actions that need the current record re-read it from storage
/// by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    item_id: RenderItemId,
    message: Message,
}

impl MessageRef {
    /// Capture a rendered item
    pub fn new(item_id: RenderItemId, message: Message) -> Self {
        Self { item_id, message }
    }

    /// Capture a message whose cell is keyed by the message id
    pub fn for_message(message: impl Into<Message>) -> Self {
        let message = message.into();
        Self {
            item_id: RenderItemId::new(message.id().as_str()),
            message,
        }
    }

    /// Rendered item id
    pub fn item_id(&self) -> &RenderItemId {
        &self.item_id
    }

    /// Message snapshot
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Message id
    pub fn message_id(&self) -> &MessageId {
        self.message.id()
    }
}

// ============================================================================
// TESTS
// ============================================================================
