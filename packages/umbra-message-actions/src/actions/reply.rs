//! Quoted replies.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::surface::InputSurface;
use crate::error::{Error, Result};
use crate::model::{Address, Message, MessageId, MessageRef, ThreadId};
use crate::storage::Storage;

/// Who wrote the quoted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteAuthor {
    /// We did
    LocalUser,
    /// A peer did
    Address(Address),
}

/// Attachment preview carried by a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedAttachment {
    /// MIME type
    pub content_type: String,
    /// Original file name, if known
    pub filename: Option<String>,
}

/// Reference to a message being replied to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedReply {
    /// Message being quoted
    pub quoted_message_id: MessageId,
    /// Its thread
    pub thread_id: ThreadId,
    /// Its sent timestamp (milliseconds)
    pub timestamp: i64,
    /// Its author
    pub author: QuoteAuthor,
    /// Quoted text, possibly truncated
    pub body: Option<String>,
    /// First attachment, if any
    pub attachment: Option<QuotedAttachment>,
}

impl QuotedReply {
    /// Build a quote for `message`.
    ///
    /// Returns `None` for system rows, remotely deleted messages, and
    /// messages with neither text nor attachments.
    pub fn for_message(message: &Message, max_body_chars: usize) -> Option<Self> {
        let author = match message {
            Message::Incoming(m) => QuoteAuthor::Address(m.author.clone()),
            Message::Outgoing(_) => QuoteAuthor::LocalUser,
            Message::System(_) => return None,
        };
        if message.is_remotely_deleted() {
            return None;
        }

        let body = message
            .body()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(|text| truncate(text, max_body_chars));

        let attachment = message.attachments().first().map(|a| QuotedAttachment {
            content_type: a.content_type.clone(),
            filename: a.filename.clone(),
        });

        if body.is_none() && attachment.is_none() {
            return None;
        }

        Some(Self {
            quoted_message_id: message.id().clone(),
            thread_id: message.thread_id().clone(),
            timestamp: message.timestamp(),
            author,
            body,
            attachment,
        })
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

/// Builds quotes and places them in the composer
pub struct ReplyComposer<S> {
    storage: Arc<S>,
    max_body_chars: usize,
}

impl<S: Storage> ReplyComposer<S> {
    /// Create a composer reading from `storage`
    pub fn new(storage: Arc<S>, max_body_chars: usize) -> Self {
        Self {
            storage,
            max_body_chars,
        }
    }

    /// Quote `item` into `input`.
    ///
    /// The message is re-read so a quote is never built from a stale
    /// snapshot. On failure `input` is left untouched.
    pub fn populate_reply(
        &self,
        item: &MessageRef,
        input: Option<&dyn InputSurface>,
    ) -> Result<QuotedReply> {
        let input = input.ok_or(Error::MissingInputSurface)?;
        let message_id = item.message_id();

        let quoted = self.storage.read(|tx| {
            let message = tx
                .fetch_message(message_id)?
                .ok_or_else(|| Error::MessageNotFound(message_id.to_string()))?;
            QuotedReply::for_message(&message, self.max_body_chars)
                .ok_or_else(|| Error::NoQuotableContent(message_id.to_string()))
        })?;

        input.set_quoted_reply(quoted.clone());
        input.begin_editing_message();

        tracing::debug!(message_id = %message_id, "Populated quoted reply");
        Ok(quoted)
    }
}

// ============================================================================
// TESTS
// ============================================================================
