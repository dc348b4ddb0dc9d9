//! Per-conversation state threaded through every action.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::surface::{
    ActionSheetPresenter, ForwardDelegate, InputSurface, NavigationHost, SelectionSet, UiMode,
};
use crate::error::Result;
use crate::model::{ContextId, ThreadId};
use crate::ui_thread::UiThread;

/// View-layer handles a conversation supplies
pub struct ViewHandles {
    /// Composer toolbar, if already built
    pub input_surface: Option<Arc<dyn InputSurface>>,
    /// Conversation-wide selection
    pub selection: Arc<dyn SelectionSet>,
    /// Navigation stack
    pub navigation: Arc<dyn NavigationHost>,
    /// Receives forwarding outcomes
    pub forward_delegate: Arc<dyn ForwardDelegate>,
    /// Renders action sheets
    pub action_sheets: Arc<dyn ActionSheetPresenter>,
}

/// An open conversation view
///
/// Actions receive the context explicitly instead of holding on to the view,
/// so nothing here outlives the conversation that created it.
pub struct ConversationContext {
    id: ContextId,
    thread_id: ThreadId,
    ui_thread: UiThread,
    ui_mode: Mutex<UiMode>,
    input_surface: RwLock<Option<Arc<dyn InputSurface>>>,
    selection: Arc<dyn SelectionSet>,
    navigation: Arc<dyn NavigationHost>,
    forward_delegate: Arc<dyn ForwardDelegate>,
    action_sheets: Arc<dyn ActionSheetPresenter>,
}

impl ConversationContext {
    /// Create a context owned by the calling (UI) thread
    pub fn new(id: ContextId, thread_id: ThreadId, handles: ViewHandles) -> Self {
        Self::with_ui_thread(id, thread_id, handles, UiThread::current())
    }

    /// Create a context owned by `ui_thread`, for views assembled off the
    /// UI thread
    pub fn with_ui_thread(
        id: ContextId,
        thread_id: ThreadId,
        handles: ViewHandles,
        ui_thread: UiThread,
    ) -> Self {
        Self {
            id,
            thread_id,
            ui_thread,
            ui_mode: Mutex::new(UiMode::Normal),
            input_surface: RwLock::new(handles.input_surface),
            selection: handles.selection,
            navigation: handles.navigation,
            forward_delegate: handles.forward_delegate,
            action_sheets: handles.action_sheets,
        }
    }

    /// Context id
    pub fn id(&self) -> &ContextId {
        &self.id
    }

    /// Thread shown by this conversation
    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    /// Fail unless called on the thread that created the context
    pub fn ensure_ui_thread(&self) -> Result<()> {
        self.ui_thread.ensure()
    }

    /// Current interaction mode
    pub fn ui_mode(&self) -> UiMode {
        *self.ui_mode.lock()
    }

    /// Switch mode. Returns whether the mode changed.
    pub fn set_ui_mode(&self, mode: UiMode) -> bool {
        let mut current = self.ui_mode.lock();
        if *current == mode {
            return false;
        }
        *current = mode;
        true
    }

    /// Composer toolbar, if built
    pub fn input_surface(&self) -> Option<Arc<dyn InputSurface>> {
        self.input_surface.read().clone()
    }

    /// Install or drop the composer toolbar
    pub fn set_input_surface(&self, surface: Option<Arc<dyn InputSurface>>) {
        *self.input_surface.write() = surface;
    }

    /// Conversation-wide selection
    pub fn selection(&self) -> &dyn SelectionSet {
        self.selection.as_ref()
    }

    /// Navigation stack
    pub fn navigation(&self) -> &dyn NavigationHost {
        self.navigation.as_ref()
    }

    /// Forwarding delegate
    pub fn forward_delegate(&self) -> Arc<dyn ForwardDelegate> {
        Arc::clone(&self.forward_delegate)
    }

    /// Action sheet presenter
    pub fn action_sheets(&self) -> &dyn ActionSheetPresenter {
        self.action_sheets.as_ref()
    }
}
