#![forbid(unsafe_code)]

//! Sequential input dialog.
//!
//! ```text
//! Idle --open(n)--> Open --Enter on last field / submit--> Submitted
//!                     \--Escape / cancel---------------> Cancelled
//! ```
//!
//! Once resolved, the collector ignores every further event. Values are
//! returned only on submit; a cancelled dialog yields no partial input.

use serde::Serialize;
use tracing::debug;

use crate::error::RunError;

/// Placeholder shown in every empty field.
pub const FIELD_PLACEHOLDER: &str = "Enter value...";

/// Label of the field at `index` (0-based).
#[must_use]
pub fn field_label(index: usize) -> String {
    format!("Input {}:", index + 1)
}

/// Keys the dialog reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Advance to the next field, or submit on the last one.
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Char(char),
}

/// Lifecycle of one collection flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollectorState {
    #[default]
    Idle,
    Open,
    Submitted,
    Cancelled,
}

/// Gathers exactly N ordered values before a run starts.
#[derive(Debug, Clone, Default)]
pub struct InputCollector {
    values: Vec<String>,
    focused: usize,
    state: CollectorState,
}

impl InputCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Present `count` empty fields with the first one focused.
    ///
    /// Opening with zero fields submits immediately with no values.
    pub fn open(&mut self, count: usize) {
        self.values = vec![String::new(); count];
        self.focused = 0;
        self.state = if count == 0 {
            CollectorState::Submitted
        } else {
            CollectorState::Open
        };
        debug!(fields = count, "input dialog opened");
    }

    #[must_use]
    pub fn state(&self) -> CollectorState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == CollectorState::Open
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(
            self.state,
            CollectorState::Submitted | CollectorState::Cancelled
        )
    }

    #[must_use]
    pub fn field_count(&self) -> usize {
        self.values.len()
    }

    /// Index of the focused field.
    #[must_use]
    pub fn focused(&self) -> usize {
        self.focused
    }

    #[must_use]
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Replace a field's value (the host's input element changed). Returns
    /// `false` when the dialog is not open or the index is out of range.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) -> bool {
        if !self.is_open() {
            return false;
        }
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Focus a field directly (the host moved focus with the pointer).
    pub fn focus(&mut self, index: usize) -> bool {
        if !self.is_open() || index >= self.values.len() {
            return false;
        }
        self.focused = index;
        true
    }

    /// Handle a key press. Returns `true` if state changed.
    pub fn handle_key(&mut self, key: InputKey) -> bool {
        if !self.is_open() {
            return false;
        }
        match key {
            InputKey::Enter => {
                if self.focused + 1 < self.values.len() {
                    self.focused += 1;
                } else {
                    self.submit();
                }
                true
            }
            InputKey::Escape => self.cancel(),
            InputKey::Tab => {
                self.focused = (self.focused + 1) % self.values.len();
                true
            }
            InputKey::BackTab => {
                self.focused = self
                    .focused
                    .checked_sub(1)
                    .unwrap_or(self.values.len() - 1);
                true
            }
            InputKey::Backspace => self
                .values
                .get_mut(self.focused)
                .and_then(String::pop)
                .is_some(),
            InputKey::Char(c) => match self.values.get_mut(self.focused) {
                Some(value) if !c.is_control() => {
                    value.push(c);
                    true
                }
                _ => false,
            },
        }
    }

    /// Explicit submit action.
    pub fn submit(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = CollectorState::Submitted;
        debug!(fields = self.values.len(), "input dialog submitted");
        true
    }

    /// Explicit cancel action.
    pub fn cancel(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = CollectorState::Cancelled;
        debug!(focused = self.focused, "input dialog cancelled");
        true
    }

    /// Consume a resolved collector: the ordered values on submit,
    /// [`RunError::InputCancelled`] on cancel, `None` while unresolved.
    #[must_use]
    pub fn into_resolution(self) -> Option<Result<Vec<String>, RunError>> {
        match self.state {
            CollectorState::Submitted => Some(Ok(self.values)),
            CollectorState::Cancelled => Some(Err(RunError::InputCancelled)),
            CollectorState::Idle | CollectorState::Open => None,
        }
    }

    /// Snapshot for the host to render.
    #[must_use]
    pub fn view(&self) -> DialogView {
        DialogView {
            fields: self
                .values
                .iter()
                .enumerate()
                .map(|(i, value)| DialogField {
                    label: field_label(i),
                    placeholder: FIELD_PLACEHOLDER,
                    value: value.clone(),
                })
                .collect(),
            focused: self.focused,
        }
    }
}

/// Renderable state of the input dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogView {
    pub fields: Vec<DialogField>,
    pub focused: usize,
}

/// One labelled text field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogField {
    pub label: String,
    pub placeholder: &'static str,
    pub value: String,
}
