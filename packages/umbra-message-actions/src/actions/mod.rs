//! # Message Actions
//!
//! What the user can do to a single message from its action menu.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          MESSAGE ACTIONS                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   (MessageRef, ConversationContext)                                     │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │   ┌──────────────────────────────┐                                      │
//! │   │ MessageActions               │  UI thread + same-thread guard,      │
//! │   │                              │  failures logged through `report`    │
//! │   └──────────────┬───────────────┘                                      │
//! │                  │                                                      │
//! │     ┌────────────┼─────────────┬──────────────┬──────────────┐          │
//! │     ▼            ▼             ▼              ▼              ▼          │
//! │  ┌────────┐  ┌────────┐  ┌──────────┐  ┌───────────┐  ┌───────────┐     │
//! │  │ Detail │  │ Reply  │  │ Forward  │  │ Selection │  │ Delete    │     │
//! │  │ cache  │  │composer│  │ launcher │  │ controller│  │orchestr.  │     │
//! │  └───┬────┘  └───┬────┘  └────┬─────┘  └─────┬─────┘  └─────┬─────┘     │
//! │      │           │            │              │              │           │
//! │      ▼           ▼            ▼              ▼              ▼           │
//! │  Navigation  InputSurface  ForwardFlow   SelectionSet   Storage +       │
//! │    Host                                                 OutboundQueue   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entry point must be called on the thread that created the
//! [`ConversationContext`], and the message must belong to the thread that
//! context shows.

mod context;
mod delete;
mod detail;
mod forward;
mod reply;
mod selection;
mod surface;

pub use context::{ConversationContext, ViewHandles};
pub use delete::{
    ActionSheet, ActionStyle, DeleteChoice, DeleteOrchestrator, RemoteDeleteEligibility,
    SheetAction, CANCEL_KEY, DELETE_FOR_EVERYONE_KEY, DELETE_FOR_ME_KEY, DELETE_SHEET_TITLE_KEY,
};
pub use detail::{DetailViewCache, DetailViewSession, InteractiveTransition};
pub use forward::ForwardLauncher;
pub use reply::{QuoteAuthor, QuotedAttachment, QuotedReply, ReplyComposer};
pub use selection::SelectionModeController;
pub use surface::{
    ActionSheetPresenter, ConfirmationPrompt, ForwardDelegate, ForwardFlow, InputSurface,
    NavigationHost, SelectionGranularity, SelectionSet, UiMode,
};

use std::sync::Arc;

use crate::config::ActionsConfig;
use crate::error::{report, Error, Result};
use crate::model::MessageRef;
use crate::outbound::OutboundQueue;
use crate::storage::Storage;

/// Services the actions are built on
pub struct Collaborators<S, Q> {
    /// Message store
    pub storage: Arc<S>,
    /// Outbound job queue
    pub outbound: Arc<Q>,
    /// Remote-delete eligibility rule
    pub eligibility: Arc<dyn RemoteDeleteEligibility>,
    /// Delete-for-everyone confirmation prompt
    pub confirmation: Arc<dyn ConfirmationPrompt>,
    /// Forwarding picker
    pub forward_flow: Arc<dyn ForwardFlow>,
}

/// Entry point for the message action menu
pub struct MessageActions<S, Q> {
    config: ActionsConfig,
    details: DetailViewCache,
    replies: ReplyComposer<S>,
    forwarding: ForwardLauncher,
    selection: SelectionModeController,
    deletes: Arc<DeleteOrchestrator<S, Q>>,
}

impl<S, Q> MessageActions<S, Q>
where
    S: Storage + 'static,
    Q: OutboundQueue + 'static,
{
    /// Wire up the actions
    pub fn new(collaborators: Collaborators<S, Q>, config: ActionsConfig) -> Self {
        let Collaborators {
            storage,
            outbound,
            eligibility,
            confirmation,
            forward_flow,
        } = collaborators;

        tracing::debug!(
            delete_confirmation = ?config.delete_confirmation,
            assert_on_failure = config.assert_on_failure,
            "Message actions initialized"
        );

        Self {
            replies: ReplyComposer::new(Arc::clone(&storage), config.max_quote_body_chars),
            forwarding: ForwardLauncher::new(forward_flow),
            selection: SelectionModeController::new(),
            deletes: Arc::new(DeleteOrchestrator::new(
                storage,
                outbound,
                eligibility,
                confirmation,
                config.clone(),
            )),
            details: DetailViewCache::new(),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ActionsConfig {
        &self.config
    }

    /// Detail view sessions, one slot per conversation
    pub fn details(&self) -> &DetailViewCache {
        &self.details
    }

    /// The delete orchestrator
    pub fn deletes(&self) -> &Arc<DeleteOrchestrator<S, Q>> {
        &self.deletes
    }

    // ========================================================================
    // DETAILS
    // ========================================================================

    /// Push the detail view for `item`, reusing the current session when it
    /// already shows the same message.
    pub fn show_details(
        &self,
        item: &MessageRef,
        context: &ConversationContext,
    ) -> Result<Arc<DetailViewSession>> {
        self.run("show_details", item, context, || {
            let session =
                self.details
                    .resolve(context.id(), item.message(), context.navigation())?;
            context.navigation().push_detail_view(Arc::clone(&session));
            Ok(session)
        })
    }

    /// Build the detail session ahead of an interactive (pan) push.
    ///
    /// Requires a pan slot, see [`DetailViewCache::begin_interactive`].
    pub fn prepare_interactive_details(
        &self,
        item: &MessageRef,
        context: &ConversationContext,
    ) -> Result<Arc<DetailViewSession>> {
        self.run("prepare_interactive_details", item, context, || {
            self.details
                .prewarm(context.id(), item.message(), context.navigation())
        })
    }

    // ========================================================================
    // REPLY / FORWARD / SELECT
    // ========================================================================

    /// Quote `item` into the composer and focus it
    pub fn reply(&self, item: &MessageRef, context: &ConversationContext) -> Result<QuotedReply> {
        self.run("reply", item, context, || {
            let input = context.input_surface().ok_or(Error::MissingInputSurface)?;
            context.set_ui_mode(UiMode::Normal);
            self.replies.populate_reply(item, Some(input.as_ref()))
        })
    }

    /// Open the forwarding picker for `item`
    pub fn forward(&self, item: &MessageRef, context: &ConversationContext) -> Result<()> {
        self.run("forward", item, context, || {
            self.forwarding.forward(item, context);
            Ok(())
        })
    }

    /// Enter selection mode with `item` selected
    pub fn start_selection(&self, item: &MessageRef, context: &ConversationContext) -> Result<()> {
        self.run("start_selection", item, context, || {
            self.selection.start_selection(item, context);
            Ok(())
        })
    }

    // ========================================================================
    // DELETE
    // ========================================================================

    /// Present the delete sheet for `item`.
    ///
    /// Whatever the user picks runs later; its failures are reported, not
    /// returned.
    pub fn delete_item(&self, item: &MessageRef, context: &ConversationContext) -> Result<()> {
        self.run("delete_item", item, context, || {
            let sheet = self.deletes.delete_sheet(item);
            let deletes = Arc::clone(&self.deletes);
            let item = item.clone();
            let assert_on_failure = self.config.assert_on_failure;

            context.action_sheets().present(
                sheet,
                Box::new(move |choice: DeleteChoice| {
                    if let Err(err) = deletes.handle_choice(&item, choice) {
                        report("delete_item", err, assert_on_failure);
                    }
                }),
            );
            Ok(())
        })
    }

    /// Delete `item` from this device only
    pub fn delete_for_me(&self, item: &MessageRef, context: &ConversationContext) -> Result<()> {
        self.run("delete_for_me", item, context, || self.deletes.delete_for_me(item))
    }

    /// Delete `item` for every participant, confirming per config
    pub fn delete_for_everyone(
        &self,
        item: &MessageRef,
        context: &ConversationContext,
    ) -> Result<()> {
        self.run("delete_for_everyone", item, context, || {
            self.deletes.delete_for_everyone(item)
        })
    }

    fn run<T>(
        &self,
        action: &'static str,
        item: &MessageRef,
        context: &ConversationContext,
        block: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        check_preconditions(item, context)
            .and_then(|()| block())
            .map_err(|err| report(action, err, self.config.assert_on_failure))
    }
}

fn check_preconditions(item: &MessageRef, context: &ConversationContext) -> Result<()> {
    context.ensure_ui_thread()?;
    if item.message().thread_id() != context.thread_id() {
        return Err(Error::InvalidInteraction(format!(
            "message {} is not in thread {}",
            item.message_id(),
            context.thread_id()
        )));
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
