//! View-layer collaborators.
//!
//! The conversation view implements these; actions only call them. All of
//! them run on the UI thread, so implementations are free to use plain
//! interior mutability.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::context::ConversationContext;
use super::delete::{ActionSheet, DeleteChoice};
use super::detail::DetailViewSession;
use super::reply::QuotedReply;
use crate::model::MessageRef;

/// Interaction mode of a conversation view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiMode {
    /// Messages are acted on one at a time
    #[default]
    Normal,
    /// Messages are being picked into a selection
    Selection,
}

/// How much of a message a selection covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionGranularity {
    /// The whole item
    AllContent,
    /// Only the body or media
    PrimaryContent,
    /// Only the caption or link preview
    SecondaryContent,
}

/// The composer toolbar
pub trait InputSurface {
    /// Replace the active quote
    fn set_quoted_reply(&self, reply: QuotedReply);

    /// Focus the text field
    fn begin_editing_message(&self);
}

/// The conversation-wide selection
pub trait SelectionSet {
    /// Add an item; duplicates are the set's own concern
    fn add(&self, item: &MessageRef, granularity: SelectionGranularity);
}

/// Navigation stack of the conversation
pub trait NavigationHost {
    /// Route navigation-transition callbacks to `session`
    fn set_transition_delegate(&self, session: Arc<DetailViewSession>);

    /// Push the detail view for `session`
    fn push_detail_view(&self, session: Arc<DetailViewSession>);
}

/// Receives the outcome of a forwarding flow
pub trait ForwardDelegate {
    /// The items were forwarded
    fn forward_did_complete(&self, items: &[MessageRef]);

    /// The user backed out
    fn forward_did_cancel(&self);
}

/// The forwarding picker
pub trait ForwardFlow {
    /// Present the picker for `items`
    fn present(
        &self,
        items: Vec<MessageRef>,
        source: &ConversationContext,
        delegate: Arc<dyn ForwardDelegate>,
    );
}

/// Yes/no prompt shown before deleting for everyone
pub trait ConfirmationPrompt {
    /// Ask the user. `on_accept` runs at most once, only if they accept;
    /// it may run before `confirm` returns or later.
    fn confirm(&self, on_accept: Box<dyn FnOnce()>);
}

/// Renders action sheets
pub trait ActionSheetPresenter {
    /// Show `sheet`; `on_choice` runs with the picked action, if any.
    fn present(&self, sheet: ActionSheet, on_choice: Box<dyn FnOnce(DeleteChoice)>);
}
