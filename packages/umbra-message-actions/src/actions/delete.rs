//! # Delete Orchestration
//!
//! Delete-for-me and delete-for-everyone.
//!
//! ## Delete For Everyone
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     DELETE FOR EVERYONE                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  MessageRef                                                             │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Outgoing + eligible? ── no ──► fail, nothing touched                  │
//! │      │ yes                                                              │
//! │      ▼                                                                  │
//! │  confirmation (per ConfirmationMode) ── declined ──► nothing touched   │
//! │      │ accepted                                                         │
//! │      ▼                                                                  │
//! │  tombstone = TombstoneMessage::new(thread, original)                   │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  ┌─────────────── storage.write ─────────────────────────────┐          │
//! │  │ 1. re-read original, copy recipient states → tombstone    │          │
//! │  │ 2. mark original remotely deleted, clear content, save    │          │
//! │  │ 3. outbound.submit(tombstone, tx)                         │          │
//! │  └───────────── commit all, or roll back all ────────────────┘          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The local placeholder appears as soon as the transaction commits. Peers
//! learn about the deletion whenever the sender worker delivers the job.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::surface::ConfirmationPrompt;
use crate::config::{ActionsConfig, ConfirmationMode};
use crate::error::{report, Error, Result};
use crate::model::{Message, MessageRef, OutgoingMessage, TombstoneMessage};
use crate::outbound::OutboundQueue;
use crate::storage::Storage;

/// Localization key of the delete sheet title
pub const DELETE_SHEET_TITLE_KEY: &str = "MESSAGE_ACTION_DELETE_FOR_TITLE";
/// Localization key of the delete-for-me action
pub const DELETE_FOR_ME_KEY: &str = "MESSAGE_ACTION_DELETE_FOR_ME";
/// Localization key of the delete-for-everyone action
pub const DELETE_FOR_EVERYONE_KEY: &str = "MESSAGE_ACTION_DELETE_FOR_EVERYONE";
/// Localization key of the cancel action
pub const CANCEL_KEY: &str = "TXT_CANCEL_TITLE";

/// Decides whether a message may still be deleted for everyone
///
/// Time windows and similar rules live with the implementor.
pub trait RemoteDeleteEligibility {
    /// Whether `message` may be deleted for everyone
    fn can_be_remotely_deleted(&self, message: &Message) -> bool;
}

impl<F> RemoteDeleteEligibility for F
where
    F: Fn(&Message) -> bool,
{
    fn can_be_remotely_deleted(&self, message: &Message) -> bool {
        self(message)
    }
}

/// An option in the delete sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteChoice {
    /// Remove from this device only
    DeleteForMe,
    /// Remove for every participant
    DeleteForEveryone,
    /// Do nothing
    Cancel,
}

/// Visual style of a sheet action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionStyle {
    /// Plain
    Default,
    /// Red
    Destructive,
    /// Dismisses the sheet
    Cancel,
}

/// One row of an action sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetAction {
    /// What picking it does
    pub choice: DeleteChoice,
    /// Localization key of the title
    pub title_key: String,
    /// Style
    pub style: ActionStyle,
}

impl SheetAction {
    fn new(choice: DeleteChoice, title_key: &str, style: ActionStyle) -> Self {
        Self {
            choice,
            title_key: title_key.to_string(),
            style,
        }
    }
}

/// An action sheet, ready for the view layer to localize and render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSheet {
    /// Localization key of the title
    pub title_key: String,
    /// Rows, top to bottom
    pub actions: Vec<SheetAction>,
}

impl ActionSheet {
    /// Whether the sheet offers `choice`
    pub fn offers(&self, choice: DeleteChoice) -> bool {
        self.actions.iter().any(|a| a.choice == choice)
    }
}

/// Runs delete-for-me and delete-for-everyone
pub struct DeleteOrchestrator<S, Q> {
    storage: Arc<S>,
    outbound: Arc<Q>,
    eligibility: Arc<dyn RemoteDeleteEligibility>,
    confirmation: Arc<dyn ConfirmationPrompt>,
    config: ActionsConfig,
    /// The user accepted the confirmation at least once
    confirmation_recorded: AtomicBool,
}

impl<S, Q> DeleteOrchestrator<S, Q>
where
    S: Storage + 'static,
    Q: OutboundQueue + 'static,
{
    /// Create an orchestrator
    pub fn new(
        storage: Arc<S>,
        outbound: Arc<Q>,
        eligibility: Arc<dyn RemoteDeleteEligibility>,
        confirmation: Arc<dyn ConfirmationPrompt>,
        config: ActionsConfig,
    ) -> Self {
        Self {
            storage,
            outbound,
            eligibility,
            confirmation,
            config,
            confirmation_recorded: AtomicBool::new(false),
        }
    }

    /// Whether the user has accepted the delete-for-everyone prompt before
    pub fn confirmation_recorded(&self) -> bool {
        self.confirmation_recorded.load(Ordering::Relaxed)
    }

    /// Restore the prompt preference from settings
    pub fn set_confirmation_recorded(&self, recorded: bool) {
        self.confirmation_recorded.store(recorded, Ordering::Relaxed);
    }

    /// Whether delete-for-everyone is offered for `message`
    pub fn can_delete_for_everyone(&self, message: &Message) -> bool {
        message.is_outgoing() && self.eligibility.can_be_remotely_deleted(message)
    }

    /// The delete sheet for `item`
    pub fn delete_sheet(&self, item: &MessageRef) -> ActionSheet {
        let mut actions = vec![SheetAction::new(
            DeleteChoice::DeleteForMe,
            DELETE_FOR_ME_KEY,
            ActionStyle::Destructive,
        )];

        if self.can_delete_for_everyone(item.message()) {
            actions.push(SheetAction::new(
                DeleteChoice::DeleteForEveryone,
                DELETE_FOR_EVERYONE_KEY,
                ActionStyle::Destructive,
            ));
        }

        actions.push(SheetAction::new(DeleteChoice::Cancel, CANCEL_KEY, ActionStyle::Cancel));

        ActionSheet {
            title_key: DELETE_SHEET_TITLE_KEY.to_string(),
            actions,
        }
    }

    /// Run the action picked from the delete sheet
    pub fn handle_choice(self: &Arc<Self>, item: &MessageRef, choice: DeleteChoice) -> Result<()> {
        match choice {
            DeleteChoice::DeleteForMe => self.delete_for_me(item),
            DeleteChoice::DeleteForEveryone => self.delete_for_everyone(item),
            DeleteChoice::Cancel => {
                tracing::debug!(message_id = %item.message_id(), "Delete cancelled");
                Ok(())
            }
        }
    }

    /// Remove `item` from this device only
    pub fn delete_for_me(&self, item: &MessageRef) -> Result<()> {
        let message_id = item.message_id();
        self.storage.write(|tx| {
            if tx.remove_message(message_id)? {
                Ok(())
            } else {
                Err(Error::MessageNotFound(message_id.to_string()))
            }
        })?;

        tracing::info!(message_id = %message_id, "Deleted message locally");
        Ok(())
    }

    /// Delete `item` for everyone, asking first if the confirmation mode
    /// says so.
    ///
    /// Validation happens up front; an ineligible message never prompts.
    /// When the prompt is shown the commit happens in its accept callback,
    /// and failures there are reported rather than returned. Acceptance is
    /// only remembered once the commit succeeds.
    pub fn delete_for_everyone(self: &Arc<Self>, item: &MessageRef) -> Result<()> {
        self.remote_delete_target(item)?;

        if !self.needs_confirmation() {
            self.commit_delete_for_everyone(item)?;
            return Ok(());
        }

        tracing::debug!(message_id = %item.message_id(), "Awaiting delete confirmation");
        let this = Arc::clone(self);
        let item = item.clone();
        self.confirmation.confirm(Box::new(move || {
            match this.commit_delete_for_everyone(&item) {
                Ok(_) => this.set_confirmation_recorded(true),
                Err(err) => {
                    report("delete_for_everyone", err, this.config.assert_on_failure);
                }
            }
        }));
        Ok(())
    }

    /// Build the tombstone and apply the delete in one transaction.
    ///
    /// Callers that have already confirmed can use this directly.
    pub fn commit_delete_for_everyone(&self, item: &MessageRef) -> Result<TombstoneMessage> {
        let original = self.remote_delete_target(item)?;
        let mut tombstone = TombstoneMessage::new(original.thread_id.clone(), original);

        self.storage.write(|tx| {
            let mut current = match tx.fetch_message(&original.id)? {
                Some(Message::Outgoing(message)) => message,
                Some(_) => return Err(Error::NotOutgoing(original.id.to_string())),
                None => return Err(Error::MessageNotFound(original.id.to_string())),
            };
            // The snapshot may predate an earlier delete of the same message.
            if current.remotely_deleted {
                return Err(Error::RemoteDeleteNotEligible(original.id.to_string()));
            }

            tombstone.transfer_recipient_states(&current);
            current.mark_remotely_deleted();
            tx.save_message(&Message::Outgoing(current))?;
            self.outbound.submit(&tombstone, tx)
        })?;

        tracing::info!(
            message_id = %original.id,
            tombstone_id = %tombstone.id(),
            recipients = tombstone.recipient_states().len(),
            "Message deleted for everyone"
        );
        Ok(tombstone)
    }

    fn remote_delete_target<'a>(&self, item: &'a MessageRef) -> Result<&'a OutgoingMessage> {
        let Message::Outgoing(original) = item.message() else {
            return Err(Error::NotOutgoing(item.message_id().to_string()));
        };
        if !self.eligibility.can_be_remotely_deleted(item.message()) {
            return Err(Error::RemoteDeleteNotEligible(item.message_id().to_string()));
        }
        Ok(original)
    }

    fn needs_confirmation(&self) -> bool {
        match self.config.delete_confirmation {
            ConfirmationMode::Always => true,
            ConfirmationMode::FirstTimeOnly => !self.confirmation_recorded(),
            ConfirmationMode::Never => false,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Address, DeliveryState, IncomingMessage, MessageId, RecipientStates, ThreadId};
    use crate::outbound::MessageSenderJobQueue;
    use crate::storage::Database;
    use crate::test_support::{FailingQueue, ScriptedPrompt};

    type Orchestrator<Q = MessageSenderJobQueue> = DeleteOrchestrator<Database, Q>;

    fn thread() -> ThreadId {
        ThreadId::new("thread-t")
    }

    /// Outgoing message 7 with receipts from Alice and Bob
    fn message_seven() -> OutgoingMessage {
        OutgoingMessage::new(thread(), "see you at 7")
            .with_id("7")
            .with_recipient_state("did:key:alice", DeliveryState::Delivered)
            .with_recipient_state("did:key:bob", DeliveryState::Read)
    }

    fn always_eligible() -> Arc<dyn RemoteDeleteEligibility> {
        Arc::new(|_: &Message| true)
    }

    fn never_eligible() -> Arc<dyn RemoteDeleteEligibility> {
        Arc::new(|_: &Message| false)
    }

    fn config(mode: ConfirmationMode) -> ActionsConfig {
        ActionsConfig {
            delete_confirmation: mode,
            ..ActionsConfig::default()
        }
    }

    fn orchestrator(
        db: &Arc<Database>,
        eligibility: Arc<dyn RemoteDeleteEligibility>,
        prompt: &Arc<ScriptedPrompt>,
        mode: ConfirmationMode,
    ) -> Arc<Orchestrator> {
        Arc::new(DeleteOrchestrator::new(
            Arc::clone(db),
            Arc::new(MessageSenderJobQueue::new()),
            eligibility,
            prompt.clone(),
            config(mode),
        ))
    }

    fn stored(db: &Database, message: OutgoingMessage) -> MessageRef {
        db.store_message(&message.clone().into()).unwrap();
        MessageRef::for_message(message)
    }

    fn load_outgoing(db: &Database, id: &str) -> OutgoingMessage {
        match db.get_message(&MessageId::new(id)).unwrap() {
            Some(Message::Outgoing(message)) => message,
            other => panic!("expected outgoing message, got {:?}", other),
        }
    }

    #[test]
    fn test_sheet_offers_everyone_for_eligible_outgoing() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let orchestrator = orchestrator(&db, always_eligible(), &prompt, ConfirmationMode::Always);

        let sheet = orchestrator.delete_sheet(&MessageRef::for_message(message_seven()));

        assert_eq!(sheet.title_key, DELETE_SHEET_TITLE_KEY);
        let choices: Vec<DeleteChoice> = sheet.actions.iter().map(|a| a.choice).collect();
        assert_eq!(
            choices,
            vec![DeleteChoice::DeleteForMe, DeleteChoice::DeleteForEveryone, DeleteChoice::Cancel]
        );
        assert_eq!(sheet.actions[2].style, ActionStyle::Cancel);
    }

    #[test]
    fn test_sheet_hides_everyone_when_ineligible() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let orchestrator = orchestrator(&db, never_eligible(), &prompt, ConfirmationMode::Always);

        let sheet = orchestrator.delete_sheet(&MessageRef::for_message(message_seven()));

        assert!(sheet.offers(DeleteChoice::DeleteForMe));
        assert!(!sheet.offers(DeleteChoice::DeleteForEveryone));
        assert!(sheet.offers(DeleteChoice::Cancel));
    }

    #[test]
    fn test_sheet_hides_everyone_for_incoming() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let orchestrator = orchestrator(&db, always_eligible(), &prompt, ConfirmationMode::Always);
        let incoming = IncomingMessage::new(thread(), Address::new("did:key:bob"), "hi");

        let sheet = orchestrator.delete_sheet(&MessageRef::for_message(incoming));

        assert!(!sheet.offers(DeleteChoice::DeleteForEveryone));
    }

    #[test]
    fn test_delete_for_everyone_scenario() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let orchestrator = orchestrator(&db, always_eligible(), &prompt, ConfirmationMode::Always);
        let item = stored(&db, message_seven());
        let states_before: RecipientStates = message_seven().recipient_states;

        orchestrator.delete_for_everyone(&item).unwrap();

        assert_eq!(prompt.prompts(), 1);

        let original = load_outgoing(&db, "7");
        assert!(original.remotely_deleted);
        assert!(original.body.is_none());
        assert!(original.attachments.is_empty());

        let jobs = db.outbound_jobs().unwrap();
        assert_eq!(jobs.len(), 1);
        let tombstone = jobs[0].tombstone().unwrap();
        assert_eq!(tombstone.target_message_id().as_str(), "7");
        assert_eq!(tombstone.thread_id(), &thread());
        assert_eq!(tombstone.recipient_states(), &states_before);
        assert_eq!(
            tombstone.recipient_states().get(&Address::new("did:key:bob")),
            Some(&DeliveryState::Read)
        );
    }

    #[test]
    fn test_tombstone_copies_state_at_commit_time() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let orchestrator = orchestrator(&db, always_eligible(), &prompt, ConfirmationMode::Never);
        let item = MessageRef::for_message(message_seven());
        // A read receipt arrived after the action menu captured the snapshot.
        let newer = message_seven().with_recipient_state("did:key:alice", DeliveryState::Read);
        db.store_message(&newer.clone().into()).unwrap();

        let tombstone = orchestrator.commit_delete_for_everyone(&item).unwrap();

        assert_eq!(tombstone.recipient_states(), &newer.recipient_states);
    }

    #[test]
    fn test_declined_confirmation_changes_nothing() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::declining());
        let orchestrator = orchestrator(&db, always_eligible(), &prompt, ConfirmationMode::Always);
        let item = stored(&db, message_seven());

        orchestrator.delete_for_everyone(&item).unwrap();
        orchestrator.delete_for_everyone(&item).unwrap();

        assert_eq!(prompt.prompts(), 2);
        assert_eq!(load_outgoing(&db, "7"), message_seven_as_stored(&item));
        assert!(db.outbound_jobs().unwrap().is_empty());
        assert!(!orchestrator.confirmation_recorded());
    }

    fn message_seven_as_stored(item: &MessageRef) -> OutgoingMessage {
        match item.message() {
            Message::Outgoing(message) => message.clone(),
            other => panic!("expected outgoing message, got {:?}", other),
        }
    }

    #[test]
    fn test_ineligible_fails_without_prompt() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let orchestrator = orchestrator(&db, never_eligible(), &prompt, ConfirmationMode::Always);
        let item = stored(&db, message_seven());

        let result = orchestrator.delete_for_everyone(&item);

        assert!(matches!(result, Err(Error::RemoteDeleteNotEligible(_))));
        assert_eq!(prompt.prompts(), 0);
        assert!(!load_outgoing(&db, "7").remotely_deleted);
    }

    #[test]
    fn test_incoming_fails_without_prompt() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let orchestrator = orchestrator(&db, always_eligible(), &prompt, ConfirmationMode::Always);
        let incoming = IncomingMessage::new(thread(), Address::new("did:key:bob"), "hi");

        let result = orchestrator.delete_for_everyone(&MessageRef::for_message(incoming));

        assert!(matches!(result, Err(Error::NotOutgoing(_))));
        assert_eq!(prompt.prompts(), 0);
    }

    #[test]
    fn test_first_time_only_prompts_once() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let orchestrator =
            orchestrator(&db, always_eligible(), &prompt, ConfirmationMode::FirstTimeOnly);
        let first = stored(&db, message_seven());
        let second = stored(&db, OutgoingMessage::new(thread(), "again").with_id("8"));

        orchestrator.delete_for_everyone(&first).unwrap();
        orchestrator.delete_for_everyone(&second).unwrap();

        assert_eq!(prompt.prompts(), 1);
        assert!(orchestrator.confirmation_recorded());
        assert_eq!(db.outbound_jobs().unwrap().len(), 2);
    }

    #[test]
    fn test_restored_preference_skips_prompt() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let orchestrator =
            orchestrator(&db, always_eligible(), &prompt, ConfirmationMode::FirstTimeOnly);
        orchestrator.set_confirmation_recorded(true);
        let item = stored(&db, message_seven());

        orchestrator.delete_for_everyone(&item).unwrap();

        assert_eq!(prompt.prompts(), 0);
        assert!(load_outgoing(&db, "7").remotely_deleted);
    }

    #[test]
    fn test_queue_failure_rolls_back() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let orchestrator: Arc<Orchestrator<FailingQueue>> = Arc::new(DeleteOrchestrator::new(
            Arc::clone(&db),
            Arc::new(FailingQueue),
            always_eligible(),
            prompt.clone(),
            config(ConfirmationMode::Never),
        ));
        let item = stored(&db, message_seven());

        let result = orchestrator.delete_for_everyone(&item);

        assert!(matches!(result, Err(Error::EnqueueFailed(_))));
        let original = load_outgoing(&db, "7");
        assert!(!original.remotely_deleted);
        assert_eq!(original.body.as_deref(), Some("see you at 7"));
    }

    #[test]
    fn test_commit_missing_record_fails() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let orchestrator = orchestrator(&db, always_eligible(), &prompt, ConfirmationMode::Never);

        let result = orchestrator.commit_delete_for_everyone(&MessageRef::for_message(message_seven()));

        assert!(matches!(result, Err(Error::MessageNotFound(_))));
        assert!(db.outbound_jobs().unwrap().is_empty());
    }

    #[test]
    fn test_second_delete_with_stale_snapshot_fails() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let orchestrator = orchestrator(&db, always_eligible(), &prompt, ConfirmationMode::Never);
        let item = stored(&db, message_seven());

        orchestrator.delete_for_everyone(&item).unwrap();
        let second = orchestrator.delete_for_everyone(&item);

        assert!(matches!(second, Err(Error::RemoteDeleteNotEligible(_))));
        assert_eq!(db.outbound_jobs().unwrap().len(), 1);
        assert!(load_outgoing(&db, "7").remotely_deleted);
    }

    #[test]
    fn test_failed_commit_does_not_record_confirmation() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let orchestrator: Arc<Orchestrator<FailingQueue>> = Arc::new(DeleteOrchestrator::new(
            Arc::clone(&db),
            Arc::new(FailingQueue),
            always_eligible(),
            prompt.clone(),
            config(ConfirmationMode::FirstTimeOnly),
        ));
        let item = stored(&db, message_seven());

        orchestrator.delete_for_everyone(&item).unwrap();
        assert!(!orchestrator.confirmation_recorded());

        orchestrator.delete_for_everyone(&item).unwrap();
        assert_eq!(prompt.prompts(), 2);
        assert!(!load_outgoing(&db, "7").remotely_deleted);
    }

    #[test]
    fn test_delete_for_me_removes_locally_only() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let orchestrator = orchestrator(&db, always_eligible(), &prompt, ConfirmationMode::Always);
        let item = stored(&db, message_seven());

        orchestrator.handle_choice(&item, DeleteChoice::DeleteForMe).unwrap();

        assert!(db.get_message(&MessageId::new("7")).unwrap().is_none());
        assert!(db.outbound_jobs().unwrap().is_empty());
        assert_eq!(prompt.prompts(), 0);

        let again = orchestrator.delete_for_me(&item);
        assert!(matches!(again, Err(Error::MessageNotFound(_))));
    }

    #[test]
    fn test_cancel_is_a_no_op() {
        let db = Arc::new(Database::open(None).unwrap());
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let orchestrator = orchestrator(&db, always_eligible(), &prompt, ConfirmationMode::Always);
        let item = stored(&db, message_seven());

        orchestrator.handle_choice(&item, DeleteChoice::Cancel).unwrap();

        assert_eq!(load_outgoing(&db, "7"), message_seven_as_stored(&item));
        assert_eq!(prompt.prompts(), 0);
    }
}
