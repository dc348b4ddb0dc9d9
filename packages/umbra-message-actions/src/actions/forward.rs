//! Forwarding hand-off.

use std::sync::Arc;

use super::context::ConversationContext;
use super::surface::ForwardFlow;
use crate::model::MessageRef;

/// Hands a single message to the forwarding picker
pub struct ForwardLauncher {
    flow: Arc<dyn ForwardFlow>,
}

impl ForwardLauncher {
    /// Create a launcher presenting `flow`
    pub fn new(flow: Arc<dyn ForwardFlow>) -> Self {
        Self { flow }
    }

    /// Present the picker for `item`. Nothing local changes.
    pub fn forward(&self, item: &MessageRef, context: &ConversationContext) {
        tracing::debug!(message_id = %item.message_id(), "Forwarding message");
        self.flow
            .present(vec![item.clone()], context, context.forward_delegate());
    }
}
