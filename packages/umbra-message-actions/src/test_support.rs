//! Recording fakes for the view-layer traits, shared by unit tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::actions::{
    ActionSheet, ActionSheetPresenter, ConfirmationPrompt, ConversationContext,
    DeleteChoice, DetailViewSession, ForwardDelegate, ForwardFlow, InputSurface, NavigationHost,
    QuotedReply, SelectionGranularity, SelectionSet, ViewHandles,
};
use crate::error::{Error, Result};
use crate::model::{ContextId, MessageRef, OutgoingMessage, RenderItemId, ThreadId, TombstoneMessage};
use crate::outbound::OutboundQueue;
use crate::storage::WriteTransaction;
use crate::ui_thread::UiThread;

/// Thread every harness conversation shows
pub const THREAD: &str = "thread-1";

/// An outgoing message in [`THREAD`] with the given id
pub fn outgoing_ref(id: &str) -> MessageRef {
    MessageRef::for_message(OutgoingMessage::new(ThreadId::new(THREAD), "hello").with_id(id))
}

#[derive(Default)]
pub struct RecordingInputSurface {
    quoted: Mutex<Option<QuotedReply>>,
    editing: Mutex<usize>,
}

impl RecordingInputSurface {
    pub fn quoted_reply(&self) -> Option<QuotedReply> {
        self.quoted.lock().clone()
    }

    pub fn editing_began(&self) -> usize {
        *self.editing.lock()
    }
}

impl InputSurface for RecordingInputSurface {
    fn set_quoted_reply(&self, reply: QuotedReply) {
        *self.quoted.lock() = Some(reply);
    }

    fn begin_editing_message(&self) {
        *self.editing.lock() += 1;
    }
}

#[derive(Default)]
pub struct RecordingSelection {
    added: Mutex<Vec<(RenderItemId, SelectionGranularity)>>,
}

impl RecordingSelection {
    pub fn added(&self) -> Vec<(RenderItemId, SelectionGranularity)> {
        self.added.lock().clone()
    }
}

impl SelectionSet for RecordingSelection {
    fn add(&self, item: &MessageRef, granularity: SelectionGranularity) {
        self.added.lock().push((item.item_id().clone(), granularity));
    }
}

#[derive(Default)]
pub struct RecordingNavigation {
    delegates: Mutex<Vec<Arc<DetailViewSession>>>,
    pushed: Mutex<Vec<Arc<DetailViewSession>>>,
}

impl RecordingNavigation {
    pub fn delegate_count(&self) -> usize {
        self.delegates.lock().len()
    }

    pub fn pushed(&self) -> Vec<Arc<DetailViewSession>> {
        self.pushed.lock().clone()
    }
}

impl NavigationHost for RecordingNavigation {
    fn set_transition_delegate(&self, session: Arc<DetailViewSession>) {
        self.delegates.lock().push(session);
    }

    fn push_detail_view(&self, session: Arc<DetailViewSession>) {
        self.pushed.lock().push(session);
    }
}

#[derive(Default)]
pub struct RecordingForwardDelegate {
    completed: Mutex<usize>,
}

impl RecordingForwardDelegate {
    pub fn completed(&self) -> usize {
        *self.completed.lock()
    }
}

impl ForwardDelegate for RecordingForwardDelegate {
    fn forward_did_complete(&self, _items: &[MessageRef]) {
        *self.completed.lock() += 1;
    }

    fn forward_did_cancel(&self) {}
}

/// Records each presentation and completes it on the spot
#[derive(Default)]
pub struct RecordingForwardFlow {
    presented: Mutex<Vec<Vec<MessageRef>>>,
}

impl RecordingForwardFlow {
    pub fn presented(&self) -> Vec<Vec<MessageRef>> {
        self.presented.lock().clone()
    }
}

impl ForwardFlow for RecordingForwardFlow {
    fn present(
        &self,
        items: Vec<MessageRef>,
        _source: &ConversationContext,
        delegate: Arc<dyn ForwardDelegate>,
    ) {
        self.presented.lock().push(items.clone());
        delegate.forward_did_complete(&items);
    }
}

/// Answers every prompt the same way
pub struct ScriptedPrompt {
    accept: bool,
    prompts: Mutex<usize>,
}

impl ScriptedPrompt {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            prompts: Mutex::new(0),
        }
    }

    pub fn declining() -> Self {
        Self {
            accept: false,
            prompts: Mutex::new(0),
        }
    }

    pub fn prompts(&self) -> usize {
        *self.prompts.lock()
    }
}

impl ConfirmationPrompt for ScriptedPrompt {
    fn confirm(&self, on_accept: Box<dyn FnOnce()>) {
        *self.prompts.lock() += 1;
        if self.accept {
            on_accept();
        }
    }
}

/// Records sheets and picks the scripted choice, if any
#[derive(Default)]
pub struct ScriptedSheetPresenter {
    choice: Mutex<Option<DeleteChoice>>,
    sheets: Mutex<Vec<ActionSheet>>,
}

impl ScriptedSheetPresenter {
    pub fn choose(&self, choice: DeleteChoice) {
        *self.choice.lock() = Some(choice);
    }

    pub fn sheets(&self) -> Vec<ActionSheet> {
        self.sheets.lock().clone()
    }
}

impl ActionSheetPresenter for ScriptedSheetPresenter {
    fn present(&self, sheet: ActionSheet, on_choice: Box<dyn FnOnce(DeleteChoice)>) {
        self.sheets.lock().push(sheet);
        let choice = *self.choice.lock();
        on_choice(choice.unwrap_or(DeleteChoice::Cancel));
    }
}

/// Rejects every job
pub struct FailingQueue;

impl OutboundQueue for FailingQueue {
    fn submit(&self, _message: &TombstoneMessage, _tx: &mut dyn WriteTransaction) -> Result<()> {
        Err(Error::EnqueueFailed("queue offline".into()))
    }
}

/// A conversation wired to recording fakes
pub struct Harness {
    pub context: ConversationContext,
    pub input: Arc<RecordingInputSurface>,
    pub selection: Arc<RecordingSelection>,
    pub navigation: Arc<RecordingNavigation>,
    pub forward_flow: Arc<RecordingForwardFlow>,
    pub forward_delegate: Arc<RecordingForwardDelegate>,
    pub action_sheets: Arc<ScriptedSheetPresenter>,
}

impl Harness {
    pub fn new() -> Self {
        Self::owned_by(UiThread::current())
    }

    /// A harness whose conversation belongs to `ui_thread`
    pub fn owned_by(ui_thread: UiThread) -> Self {
        let input = Arc::new(RecordingInputSurface::default());
        let selection = Arc::new(RecordingSelection::default());
        let navigation = Arc::new(RecordingNavigation::default());
        let forward_delegate = Arc::new(RecordingForwardDelegate::default());
        let action_sheets = Arc::new(ScriptedSheetPresenter::default());

        let context = ConversationContext::with_ui_thread(
            ContextId::new("conversation-1"),
            ThreadId::new(THREAD),
            ViewHandles {
                input_surface: Some(input.clone() as Arc<dyn InputSurface>),
                selection: selection.clone(),
                navigation: navigation.clone(),
                forward_delegate: forward_delegate.clone(),
                action_sheets: action_sheets.clone(),
            },
            ui_thread,
        );

        Self {
            context,
            input,
            selection,
            navigation,
            forward_flow: Arc::new(RecordingForwardFlow::default()),
            forward_delegate,
            action_sheets,
        }
    }
}
