//! Multi-select entry.

use super::context::ConversationContext;
use super::surface::{SelectionGranularity, UiMode};
use crate::model::MessageRef;

/// Switches a conversation into selection mode
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectionModeController;

impl SelectionModeController {
    /// Create the controller
    pub fn new() -> Self {
        Self
    }

    /// Enter selection mode with `item` as the first pick.
    pub fn start_selection(&self, item: &MessageRef, context: &ConversationContext) {
        if context.set_ui_mode(UiMode::Selection) {
            tracing::debug!(context = %context.id(), "Entered selection mode");
        }
        context
            .selection()
            .add(item, SelectionGranularity::AllContent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{outgoing_ref, Harness};

    #[test]
    fn test_start_selection_switches_mode_and_adds() {
        let harness = Harness::new();
        let item = outgoing_ref("7");

        SelectionModeController::new().start_selection(&item, &harness.context);

        assert_eq!(harness.context.ui_mode(), UiMode::Selection);
        assert_eq!(
            harness.selection.added(),
            vec![(item.item_id().clone(), SelectionGranularity::AllContent)]
        );
    }

    #[test]
    fn test_start_selection_twice_delegates_dedup() {
        let harness = Harness::new();
        let item = outgoing_ref("7");
        let controller = SelectionModeController::new();

        controller.start_selection(&item, &harness.context);
        controller.start_selection(&item, &harness.context);

        assert_eq!(harness.context.ui_mode(), UiMode::Selection);
        // The recording set keeps duplicates; dedup is not our concern.
        assert_eq!(harness.selection.added().len(), 2);
    }
}
