//! Ephemeral view state: selection and event-edit mode.
//!
//! # Responsibility
//! - Track which event page the user is on and whether event editing is
//!   active.
//!
//! # Invariants
//! - Never persisted; structurally separate from the life document.
//! - At most one event is selected at a time.

/// UI-side state the view layer keeps next to the document store.
///
/// The two flags are independent: entering a todo page does not leave event
/// edit mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    selected_event_id: Option<String>,
    event_editing: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the todo page for one event, replacing any previous selection.
    pub fn select_event(&mut self, event_id: impl Into<String>) {
        self.selected_event_id = Some(event_id.into());
    }

    /// Returns to the life path view.
    pub fn back_to_path(&mut self) {
        self.selected_event_id = None;
    }

    pub fn selected_event_id(&self) -> Option<&str> {
        self.selected_event_id.as_deref()
    }

    pub fn toggle_event_editing(&mut self) {
        self.event_editing = !self.event_editing;
    }

    pub fn is_event_editing(&self) -> bool {
        self.event_editing
    }
}
