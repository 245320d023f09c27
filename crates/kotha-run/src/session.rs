#![forbid(unsafe_code)]

//! Run session: the gate between the run command and the run service.
//!
//! A session is in exactly one [`RunPhase`]. The run action is enabled only
//! in [`RunPhase::Idle`], so at most one collection flow or execution
//! request exists at a time. Cancelling the input dialog returns to idle
//! before any request is built.
//!
//! The session never performs I/O. [`RunSession::request_run`] and the
//! dialog methods hand back a [`RunUpdate`] that may carry a
//! [`RunRequest`]; the host sends it and reports back through
//! [`RunSession::complete`].

use tracing::{info, warn};

use crate::classify::classify;
use crate::collector::{InputCollector, InputKey};
use crate::error::{ConnectivityFailure, RunError};
use crate::protocol::{ExecutionResult, RunRequest};
use crate::scan::InputScanner;

pub const DEFAULT_FILENAME: &str = "Untitled.kotha";

pub const NO_CODE_MESSAGE: &str = "Error: No code to run!";
pub const CANCELLED_MESSAGE: &str = "Execution cancelled by user.";
pub const CANCELLED_STATUS: &str = "Cancelled";
pub const DISPATCH_MESSAGE: &str = "Compiling and running...\n";
pub const RUNNING_STATUS: &str = "Running...";
pub const CONNECTIVITY_PREFIX: &str = "Error: Cannot connect to server\n";
pub const SERVER_ERROR_STATUS: &str = "Server error";

/// Status shown while the input dialog is open.
#[must_use]
pub fn waiting_status(count: usize) -> String {
    format!("Waiting for {count} input(s)...")
}

// ---------------------------------------------------------------------------
// RunUpdate
// ---------------------------------------------------------------------------

/// What the host should show or send after a session step.
///
/// `console` replaces the console text; `status` replaces the status line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunUpdate {
    pub status: Option<String>,
    pub console: Option<String>,
    pub request: Option<RunRequest>,
}

impl RunUpdate {
    /// Boundary conversion of a run error into status and console text.
    ///
    /// A blocked run is silent.
    #[must_use]
    pub fn for_error(err: &RunError) -> Self {
        match err {
            RunError::InputCancelled => Self {
                status: Some(CANCELLED_STATUS.to_string()),
                console: Some(CANCELLED_MESSAGE.to_string()),
                request: None,
            },
            RunError::ConnectivityFailure(failure) => Self {
                status: Some(SERVER_ERROR_STATUS.to_string()),
                console: Some(format!("{CONNECTIVITY_PREFIX}{failure}")),
                request: None,
            },
            RunError::NoCode => Self {
                status: None,
                console: Some(NO_CODE_MESSAGE.to_string()),
                request: None,
            },
            RunError::Busy => Self::default(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.console.is_none() && self.request.is_none()
    }
}

// ---------------------------------------------------------------------------
// RunSession
// ---------------------------------------------------------------------------

/// Where the run workflow currently is.
#[derive(Debug, Clone, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    /// Suspended on the input dialog.
    CollectingInput(InputCollector),
    /// Suspended on the run service.
    AwaitingResponse,
}

impl RunPhase {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CollectingInput(_) => "collecting_input",
            Self::AwaitingResponse => "awaiting_response",
        }
    }
}

/// Per-editor run state: current filename, run phase and input scanner.
#[derive(Debug, Clone)]
pub struct RunSession {
    filename: String,
    scanner: InputScanner,
    phase: RunPhase,
    pending_code: String,
    dispatched: u64,
}

impl Default for RunSession {
    fn default() -> Self {
        Self::new(InputScanner::default())
    }
}

impl RunSession {
    #[must_use]
    pub fn new(scanner: InputScanner) -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_string(),
            scanner,
            phase: RunPhase::Idle,
            pending_code: String::new(),
            dispatched: 0,
        }
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.filename = filename.into();
    }

    #[must_use]
    pub fn scanner(&self) -> &InputScanner {
        &self.scanner
    }

    #[must_use]
    pub fn phase(&self) -> &RunPhase {
        &self.phase
    }

    /// Whether the run action accepts a trigger.
    #[must_use]
    pub fn run_enabled(&self) -> bool {
        self.phase.is_idle()
    }

    /// The open input dialog, if any.
    #[must_use]
    pub fn collector(&self) -> Option<&InputCollector> {
        match &self.phase {
            RunPhase::CollectingInput(collector) => Some(collector),
            _ => None,
        }
    }

    /// Number of execution requests handed to the host so far.
    #[must_use]
    pub fn requests_dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Handle the run command for `source`.
    ///
    /// The trimmed source is what gets sent. With no input call sites the
    /// request is built immediately; otherwise the input dialog opens.
    pub fn request_run(&mut self, source: &str) -> Result<RunUpdate, RunError> {
        if !self.phase.is_idle() {
            warn!(phase = self.phase.name(), "run blocked");
            return Err(RunError::Busy);
        }
        let code = source.trim();
        if code.is_empty() {
            return Err(RunError::NoCode);
        }

        let count = self.scanner.count(code);
        if count == 0 {
            return Ok(self.dispatch(code.to_string(), Vec::new()));
        }

        let mut collector = InputCollector::new();
        collector.open(count);
        self.phase = RunPhase::CollectingInput(collector);
        self.pending_code = code.to_string();
        info!(inputs = count, "run waiting for input");
        Ok(RunUpdate {
            status: Some(waiting_status(count)),
            ..RunUpdate::default()
        })
    }

    /// Forward a key to the input dialog.
    pub fn dialog_key(&mut self, key: InputKey) -> Result<RunUpdate, RunError> {
        if let RunPhase::CollectingInput(collector) = &mut self.phase {
            collector.handle_key(key);
        }
        self.settle_dialog()
    }

    /// Write a whole field value into the input dialog.
    pub fn dialog_set_field(&mut self, index: usize, value: impl Into<String>) -> bool {
        match &mut self.phase {
            RunPhase::CollectingInput(collector) => collector.set_value(index, value),
            _ => false,
        }
    }

    /// Explicit submit of the input dialog.
    pub fn dialog_submit(&mut self) -> Result<RunUpdate, RunError> {
        if let RunPhase::CollectingInput(collector) = &mut self.phase {
            collector.submit();
        }
        self.settle_dialog()
    }

    /// Explicit cancel of the input dialog.
    pub fn dialog_cancel(&mut self) -> Result<RunUpdate, RunError> {
        if let RunPhase::CollectingInput(collector) = &mut self.phase {
            collector.cancel();
        }
        self.settle_dialog()
    }

    /// Report the outcome of the outstanding request. Always returns to idle.
    ///
    /// A response with no request outstanding is ignored.
    pub fn complete(
        &mut self,
        response: Result<ExecutionResult, ConnectivityFailure>,
    ) -> Result<RunUpdate, RunError> {
        if !matches!(self.phase, RunPhase::AwaitingResponse) {
            warn!(phase = self.phase.name(), "unexpected run response ignored");
            return Ok(RunUpdate::default());
        }
        self.phase = RunPhase::Idle;

        match response {
            Ok(result) => {
                let narrative = classify(&result);
                info!(
                    exit_code = result.exit_code,
                    outcome = ?narrative.outcome,
                    "run complete"
                );
                Ok(RunUpdate {
                    status: Some(narrative.status.to_string()),
                    console: Some(narrative.text),
                    request: None,
                })
            }
            Err(failure) => {
                warn!(error = %failure, "run request failed");
                Err(RunError::ConnectivityFailure(failure))
            }
        }
    }

    /// [`complete`](Self::complete) with a raw response body.
    pub fn complete_with_body(&mut self, body: &str) -> Result<RunUpdate, RunError> {
        self.complete(ExecutionResult::from_json_str(body))
    }

    fn settle_dialog(&mut self) -> Result<RunUpdate, RunError> {
        let resolved =
            matches!(&self.phase, RunPhase::CollectingInput(collector) if collector.is_resolved());
        if !resolved {
            return Ok(RunUpdate::default());
        }
        let RunPhase::CollectingInput(collector) = std::mem::take(&mut self.phase) else {
            return Ok(RunUpdate::default());
        };
        let code = std::mem::take(&mut self.pending_code);
        match collector.into_resolution() {
            Some(Ok(inputs)) => Ok(self.dispatch(code, inputs)),
            Some(Err(err)) => {
                info!("run cancelled before dispatch");
                Err(err)
            }
            None => Ok(RunUpdate::default()),
        }
    }

    fn dispatch(&mut self, code: String, inputs: Vec<String>) -> RunUpdate {
        self.phase = RunPhase::AwaitingResponse;
        self.dispatched += 1;
        info!(
            file = %self.filename,
            bytes = code.len(),
            inputs = inputs.len(),
            "run dispatched"
        );
        RunUpdate {
            status: Some(RUNNING_STATUS.to_string()),
            console: Some(DISPATCH_MESSAGE.to_string()),
            request: Some(RunRequest::new(code, inputs)),
        }
    }
}
