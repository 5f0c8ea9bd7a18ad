use crate::keys;
use crate::store::{KeyValueStore, StoreError};
use stilllift_core::{Context, Mood, SelectedMessage};
use std::sync::Arc;

/// Where the flow should go given what has been chosen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ChooseMood,
    ChooseContext,
    ChooseMessage,
    ShowMessage,
}

/// The in-progress mood → context → message flow, read and written
/// straight through the store so every view sees the same state.
pub struct SessionState {
    store: Arc<dyn KeyValueStore>,
}

impl SessionState {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn set_mood(&self, mood: Mood) -> Result<(), StoreError> {
        self.store.set(keys::CURRENT_MOOD, mood.as_str())
    }

    pub fn set_context(&self, context: Context) -> Result<(), StoreError> {
        self.store.set(keys::CURRENT_CONTEXT, context.as_str())
    }

    pub fn select_message(&self, selected: &SelectedMessage) -> Result<(), StoreError> {
        let json = serde_json::to_string(selected)?;
        self.store.set(keys::SELECTED_MESSAGE, &json)
    }

    pub fn current_mood(&self) -> Option<Mood> {
        let raw = self.store.get(keys::CURRENT_MOOD)?;
        match raw.parse() {
            Ok(mood) => Some(mood),
            Err(e) => {
                tracing::warn!("Ignoring stored mood: {}", e);
                None
            }
        }
    }

    pub fn current_context(&self) -> Option<Context> {
        let raw = self.store.get(keys::CURRENT_CONTEXT)?;
        match raw.parse() {
            Ok(context) => Some(context),
            Err(e) => {
                tracing::warn!("Ignoring stored context: {}", e);
                None
            }
        }
    }

    /// The stored snapshot, or `None` when it is missing, literally
    /// `"undefined"`, unparseable, or has no message text.
    pub fn selected_message(&self) -> Option<SelectedMessage> {
        let raw = self.store.get(keys::SELECTED_MESSAGE)?;
        if raw.trim().is_empty() || raw == "undefined" {
            return None;
        }
        match serde_json::from_str::<SelectedMessage>(&raw) {
            Ok(selected) if selected.is_displayable() => Some(selected),
            Ok(_) => {
                tracing::warn!("Stored message has no text");
                None
            }
            Err(e) => {
                tracing::warn!("Error parsing stored message: {}", e);
                None
            }
        }
    }

    pub fn next_step(&self) -> Step {
        if self.current_mood().is_none() {
            Step::ChooseMood
        } else if self.current_context().is_none() {
            Step::ChooseContext
        } else if self.selected_message().is_none() {
            Step::ChooseMessage
        } else {
            Step::ShowMessage
        }
    }

    /// Forget mood, context and message. Preferences are untouched.
    pub fn start_over(&self) -> Result<(), StoreError> {
        self.store.remove(keys::CURRENT_MOOD)?;
        self.store.remove(keys::CURRENT_CONTEXT)?;
        self.store.remove(keys::SELECTED_MESSAGE)?;
        tracing::debug!("Session cleared");
        Ok(())
    }
}
