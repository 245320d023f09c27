#![forbid(unsafe_code)]

//! Host-driven editor session.
//!
//! The host forwards DOM events with [`EditorSession::handle`] and then
//! drains what changed with [`EditorSession::take_outputs`]. Every event is
//! processed to completion before the next one; the session never blocks
//! and never performs I/O. A run request leaves as an [`OutboundRequest`]
//! and its answer comes back as a `run_response` or `run_failed` event.

use kotha_highlight::{CursorPosition, Highlighter, LineGutter, Overlay, ScrollOffset};
use kotha_run::{DEFAULT_FILENAME, DialogView, RunError, RunSession, RunUpdate};
use kotha_syntax::TokenizerRegistry;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::EditorConfig;
use crate::error::HostError;
use crate::event::{HostEvent, normalize_dom_key};

pub const NEW_FILE_TEMPLATE: &str = "main function {\n    \n}";
pub const READY_STATUS: &str = "Ready";
pub const NEW_FILE_STATUS: &str = "New file created";
pub const CONSOLE_CLEARED: &str = "Console cleared.\n";

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Run request the host must post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundRequest {
    pub endpoint: String,
    /// JSON body (`{"code": ..., "inputs": [...]}`).
    pub body: String,
}

/// Input dialog change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DialogUpdate {
    Open(DialogView),
    Closed,
}

/// Everything that changed since the last drain. `None` means unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HostOutputs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_scroll: Option<ScrollOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gutter_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gutter_scroll_top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub console: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialog: Option<DialogUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_request: Option<OutboundRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_enabled: Option<bool>,
}

impl HostOutputs {
    /// Encode as a JSON object holding only the changed fields.
    pub fn to_json_string(&self) -> Result<String, HostError> {
        serde_json::to_string(self).map_err(HostError::Encode)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// EditorSession
// ---------------------------------------------------------------------------

/// One editor instance: source text, overlay, gutter, run state and the
/// console and status lines.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    registry: TokenizerRegistry,
    source: String,
    surface_scroll: ScrollOffset,
    cursor: CursorPosition,
    overlay: Overlay,
    gutter: LineGutter,
    run: RunSession,
    console: String,
    status: String,
    dialog_open: bool,
    outputs: HostOutputs,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    /// Create an empty, untitled session with status `Ready`.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let registry = TokenizerRegistry::with_defaults();
        let highlighter = Highlighter::for_file(&registry, DEFAULT_FILENAME, config.theme());
        let run = RunSession::new(config.scanner());
        let mut session = Self {
            config,
            registry,
            source: String::new(),
            surface_scroll: ScrollOffset::ZERO,
            cursor: CursorPosition::default(),
            overlay: Overlay::new(highlighter),
            gutter: LineGutter::default(),
            run,
            console: String::new(),
            status: String::new(),
            dialog_open: false,
            outputs: HostOutputs::default(),
        };
        session.outputs.gutter_text = Some(session.gutter.text().to_string());
        session.outputs.cursor_status = Some(session.cursor.status_text());
        session.outputs.filename = Some(session.run.filename().to_string());
        session.outputs.run_enabled = Some(true);
        session.set_status(READY_STATUS);
        session
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        self.run.filename()
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn console(&self) -> &str {
        &self.console
    }

    #[must_use]
    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    #[must_use]
    pub fn gutter(&self) -> &LineGutter {
        &self.gutter
    }

    #[must_use]
    pub fn run_session(&self) -> &RunSession {
        &self.run
    }

    /// Outputs accumulated so far.
    #[must_use]
    pub const fn outputs(&self) -> &HostOutputs {
        &self.outputs
    }

    /// Take accumulated outputs, leaving empty defaults.
    pub fn take_outputs(&mut self) -> HostOutputs {
        std::mem::take(&mut self.outputs)
    }

    /// Decode and handle one JSON event.
    pub fn handle_json(&mut self, event: &str) -> Result<(), HostError> {
        let event = HostEvent::from_json_str(event)?;
        self.handle(event)
    }

    /// Handle one host event.
    pub fn handle(&mut self, event: HostEvent) -> Result<(), HostError> {
        match event {
            HostEvent::Input { text } => {
                self.source = text;
                self.refresh_text();
            }
            HostEvent::Scroll { top, left } => self.scroll(ScrollOffset::new(top, left)),
            HostEvent::Cursor { offset } => {
                self.cursor = CursorPosition::from_offset(&self.source, offset);
                self.outputs.cursor_status = Some(self.cursor.status_text());
            }
            HostEvent::Run => {
                let result = self.run.request_run(&self.source);
                self.apply_run(result)?;
            }
            HostEvent::DialogKey { key, shift } => {
                let Some(key) = normalize_dom_key(&key, shift) else {
                    return Ok(());
                };
                let result = self.run.dialog_key(key);
                self.apply_run(result)?;
            }
            HostEvent::DialogField { index, value } => {
                if self.run.dialog_set_field(index, value) {
                    self.sync_dialog();
                }
            }
            HostEvent::DialogSubmit => {
                let result = self.run.dialog_submit();
                self.apply_run(result)?;
            }
            HostEvent::DialogCancel => {
                let result = self.run.dialog_cancel();
                self.apply_run(result)?;
            }
            HostEvent::RunResponse { body } => {
                let result = self.run.complete_with_body(&body);
                self.apply_run(result)?;
            }
            HostEvent::RunFailed { message } => {
                let result = self
                    .run
                    .complete(Err(kotha_run::ConnectivityFailure::Transport(message)));
                self.apply_run(result)?;
            }
            HostEvent::ClearConsole => self.set_console(CONSOLE_CLEARED),
            HostEvent::NewFile => {
                self.open_file(DEFAULT_FILENAME, NEW_FILE_TEMPLATE.to_string());
                self.set_status(NEW_FILE_STATUS);
            }
            HostEvent::Load { filename, text } => {
                let status = format!("Loaded {filename}");
                self.open_file(&filename, text);
                self.set_status(&status);
            }
        }
        Ok(())
    }

    fn refresh_text(&mut self) {
        let element = self.overlay.render(&self.source, self.surface_scroll);
        self.outputs.overlay_html = Some(element.markup.html().to_string());
        self.outputs.overlay_scroll = Some(element.scroll);
        if self.gutter.update(&self.source) {
            self.outputs.gutter_text = Some(self.gutter.text().to_string());
        }
    }

    fn scroll(&mut self, offset: ScrollOffset) {
        self.surface_scroll = offset;
        if self.overlay.sync_scroll(offset) {
            self.outputs.overlay_scroll = Some(offset);
        }
        self.gutter.sync_scroll(offset.top);
        self.outputs.gutter_scroll_top = Some(offset.top);
    }

    fn open_file(&mut self, filename: &str, text: String) {
        info!(file = filename, bytes = text.len(), "file opened");
        self.run.set_filename(filename);
        self.overlay.set_highlighter(Highlighter::for_file(
            &self.registry,
            filename,
            self.config.theme(),
        ));
        self.source = text;
        self.cursor = CursorPosition::default();
        self.outputs.filename = Some(filename.to_string());
        self.outputs.cursor_status = Some(self.cursor.status_text());
        self.refresh_text();
    }

    fn apply_run(&mut self, result: Result<RunUpdate, RunError>) -> Result<(), HostError> {
        let update = result.unwrap_or_else(|err| {
            debug!(error = %err, "run error reported");
            RunUpdate::for_error(&err)
        });
        if let Some(status) = update.status {
            self.set_status(&status);
        }
        if let Some(console) = update.console {
            self.set_console(&console);
        }
        if let Some(request) = update.request {
            let body = request.to_json_string().map_err(HostError::Encode)?;
            self.outputs.run_request = Some(OutboundRequest {
                endpoint: self.config.run_endpoint.clone(),
                body,
            });
        }
        self.sync_dialog();
        self.outputs.run_enabled = Some(self.run.run_enabled());
        Ok(())
    }

    fn sync_dialog(&mut self) {
        match self.run.collector() {
            Some(collector) if collector.is_open() => {
                self.dialog_open = true;
                self.outputs.dialog = Some(DialogUpdate::Open(collector.view()));
            }
            _ if self.dialog_open => {
                self.dialog_open = false;
                self.outputs.dialog = Some(DialogUpdate::Closed);
            }
            _ => {}
        }
    }

    fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.outputs.status = Some(self.status.clone());
    }

    fn set_console(&mut self, console: &str) {
        self.console = console.to_string();
        self.outputs.console = Some(self.console.clone());
    }
}
