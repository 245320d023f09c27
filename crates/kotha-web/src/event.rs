#![forbid(unsafe_code)]

//! Host event schema.
//!
//! Every DOM interaction the editor cares about arrives as one JSON object
//! with a `kind` tag, e.g. `{"kind":"scroll","top":120,"left":0}`.

use kotha_run::InputKey;
use serde::{Deserialize, Serialize};

use crate::error::HostError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostEvent {
    /// The editable surface's content changed.
    Input { text: String },
    /// The editable surface scrolled.
    Scroll { top: f64, left: f64 },
    /// The caret moved (UTF-16 offset into the text).
    Cursor { offset: usize },
    /// The run command was triggered.
    Run,
    /// A key was pressed inside the input dialog.
    DialogKey {
        key: String,
        #[serde(default)]
        shift: bool,
    },
    /// An input dialog field's value changed.
    DialogField { index: usize, value: String },
    DialogSubmit,
    DialogCancel,
    /// The run service answered; `body` is the raw response text.
    RunResponse { body: String },
    /// The run request failed before a response arrived.
    RunFailed { message: String },
    ClearConsole,
    NewFile,
    /// A file was opened.
    Load { filename: String, text: String },
}

impl HostEvent {
    /// Encode this event as a JSON string.
    pub fn to_json_string(&self) -> Result<String, HostError> {
        serde_json::to_string(self).map_err(HostError::Encode)
    }

    /// Decode an event JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, HostError> {
        serde_json::from_str(s).map_err(HostError::Decode)
    }
}

/// Map a DOM `KeyboardEvent.key` to a dialog key.
///
/// Keys the dialog does not handle map to `None`.
#[must_use]
pub fn normalize_dom_key(dom_key: &str, shift: bool) -> Option<InputKey> {
    if dom_key == "Tab" && shift {
        return Some(InputKey::BackTab);
    }

    // Printable keys arrive as the character itself (already shifted).
    let mut chars = dom_key.chars();
    if let Some(first) = chars.next()
        && chars.next().is_none()
    {
        return Some(InputKey::Char(first));
    }

    match dom_key {
        "Enter" => Some(InputKey::Enter),
        "Escape" | "Esc" => Some(InputKey::Escape),
        "Backspace" => Some(InputKey::Backspace),
        "Tab" => Some(InputKey::Tab),
        "Spacebar" => Some(InputKey::Char(' ')),
        _ => None,
    }
}
