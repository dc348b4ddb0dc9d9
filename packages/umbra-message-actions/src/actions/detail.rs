//! # Detail View Cache
//!
//! At most one "message details" session is current per conversation
//! context.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        DETAIL SESSION REUSE                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  swipe starts ──► begin_interactive(ctx, transition)                   │
//! │                         │                                               │
//! │                         ▼                                               │
//! │               prewarm(ctx, message) ──► session stored in pan slot     │
//! │                         │                                               │
//! │  swipe ends   ──► resolve(ctx, message)                                │
//! │                         │                                               │
//! │            same message id?                                            │
//! │             ├── yes ──► reuse session, re-attach slot transition       │
//! │             └── no  ──► new session, register as transition delegate,  │
//! │                         replaces the slot's current session            │
//! │                                                                         │
//! │  pan handler reset ──► clear(ctx)                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Superseded sessions are never invalidated. A caller holding an old one
//! still sees the message snapshot it was built for.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use super::surface::NavigationHost;
use crate::error::{Error, Result};
use crate::model::{ContextId, Message, MessageId};

/// A gesture-driven push in progress
#[derive(Debug)]
pub struct InteractiveTransition {
    id: Uuid,
    progress: Mutex<f64>,
}

impl InteractiveTransition {
    /// Start a transition at zero progress
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            progress: Mutex::new(0.0),
        }
    }

    /// Transition id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Completed fraction, 0.0 to 1.0
    pub fn progress(&self) -> f64 {
        *self.progress.lock()
    }

    /// Update the completed fraction (clamped)
    pub fn update(&self, progress: f64) {
        *self.progress.lock() = progress.clamp(0.0, 1.0);
    }
}

impl Default for InteractiveTransition {
    fn default() -> Self {
        Self::new()
    }
}

/// An open "message details" presentation
#[derive(Debug)]
pub struct DetailViewSession {
    id: Uuid,
    context_id: ContextId,
    message: Message,
    transition: Mutex<Option<Arc<InteractiveTransition>>>,
}

impl DetailViewSession {
    fn new(context_id: ContextId, message: Message) -> Self {
        Self {
            id: Uuid::new_v4(),
            context_id,
            message,
            transition: Mutex::new(None),
        }
    }

    /// Session id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Context the session was built in
    pub fn context_id(&self) -> &ContextId {
        &self.context_id
    }

    /// Message snapshot the session shows
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Id of the message the session shows
    pub fn message_id(&self) -> &MessageId {
        self.message.id()
    }

    /// Transition currently driving the push, if any
    pub fn transition(&self) -> Option<Arc<InteractiveTransition>> {
        self.transition.lock().clone()
    }

    fn attach_transition(&self, transition: Option<Arc<InteractiveTransition>>) {
        *self.transition.lock() = transition;
    }
}

#[derive(Default)]
struct PanSlot {
    /// A pan handler exists for the context
    interactive: bool,
    transition: Option<Arc<InteractiveTransition>>,
    session: Option<Arc<DetailViewSession>>,
}

/// `ContextId → current detail session` cache
#[derive(Default)]
pub struct DetailViewCache {
    slots: RwLock<HashMap<ContextId, PanSlot>>,
}

impl DetailViewCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// A pan gesture started in `context`, driven by `transition`.
    pub fn begin_interactive(&self, context: &ContextId, transition: Arc<InteractiveTransition>) {
        let mut slots = self.slots.write();
        let slot = slots.entry(context.clone()).or_default();
        slot.interactive = true;
        slot.transition = Some(transition);
    }

    /// Replace the transition of `context`'s pan slot, if it has one
    pub fn set_transition(&self, context: &ContextId, transition: Option<Arc<InteractiveTransition>>) {
        if let Some(slot) = self.slots.write().get_mut(context) {
            slot.transition = transition;
        }
    }

    /// Current session of `context`
    pub fn current(&self, context: &ContextId) -> Option<Arc<DetailViewSession>> {
        self.slots.read().get(context)?.session.clone()
    }

    /// Whether `context` has an active pan handler
    pub fn is_interactive(&self, context: &ContextId) -> bool {
        self.slots
            .read()
            .get(context)
            .map_or(false, |slot| slot.interactive)
    }

    /// Drop `context`'s slot (pan handler reset)
    pub fn clear(&self, context: &ContextId) {
        if self.slots.write().remove(context).is_some() {
            tracing::debug!(context = %context, "Cleared detail view slot");
        }
    }

    /// Session for showing `message` in `context`, reusing the current one
    /// when it already shows the same message.
    pub fn resolve(
        &self,
        context: &ContextId,
        message: &Message,
        navigation: &dyn NavigationHost,
    ) -> Result<Arc<DetailViewSession>> {
        ensure_has_details(message)?;

        if let Some(session) = self.reuse(context, message.id()) {
            return Ok(session);
        }
        Ok(self.install(context, message, navigation))
    }

    /// Build (or reuse) the session ahead of an interactive push so the
    /// gesture has a view to drive.
    pub fn prewarm(
        &self,
        context: &ContextId,
        message: &Message,
        navigation: &dyn NavigationHost,
    ) -> Result<Arc<DetailViewSession>> {
        ensure_has_details(message)?;

        if !self.is_interactive(context) {
            return Err(Error::MissingSessionContext(context.to_string()));
        }
        if let Some(session) = self.reuse(context, message.id()) {
            return Ok(session);
        }
        Ok(self.install(context, message, navigation))
    }

    fn reuse(&self, context: &ContextId, message_id: &MessageId) -> Option<Arc<DetailViewSession>> {
        let slots = self.slots.read();
        let slot = slots.get(context)?;
        let session = slot.session.as_ref()?;
        if session.message_id() != message_id {
            return None;
        }

        session.attach_transition(slot.transition.clone());
        tracing::debug!(context = %context, message_id = %message_id, "Reusing detail view session");
        Some(Arc::clone(session))
    }

    fn install(
        &self,
        context: &ContextId,
        message: &Message,
        navigation: &dyn NavigationHost,
    ) -> Arc<DetailViewSession> {
        let session = Arc::new(DetailViewSession::new(context.clone(), message.clone()));

        {
            let mut slots = self.slots.write();
            let slot = slots.entry(context.clone()).or_default();
            if let Some(previous) = slot.session.replace(Arc::clone(&session)) {
                tracing::debug!(
                    context = %context,
                    superseded = %previous.message_id(),
                    "Superseding detail view session"
                );
            }
        }

        // Called with the slot lock released; the host may call back in.
        navigation.set_transition_delegate(Arc::clone(&session));
        session
    }
}

fn ensure_has_details(message: &Message) -> Result<()> {
    if message.is_user_message() {
        Ok(())
    } else {
        Err(Error::InvalidInteraction(format!(
            "{} message {} has no detail view",
            message.kind(),
            message.id()
        )))
    }
}

// ============================================================================
// TESTS
// ============================================================================
