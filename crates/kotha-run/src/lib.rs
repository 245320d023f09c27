#![forbid(unsafe_code)]

//! Run workflow for the Kotha editor.
//!
//! A run command flows through four steps:
//!
//! 1. [`InputScanner`] counts the input call sites in the source.
//! 2. If there are any, [`InputCollector`] gathers that many values.
//! 3. The host posts the resulting [`RunRequest`] to the run service.
//! 4. [`classify`] turns the [`ExecutionResult`] into console text.
//!
//! [`RunSession`] drives the steps and enforces a single run in flight.
//!
//! # Example
//!
//! ```
//! use kotha_run::{ExecutionResult, RunSession};
//!
//! let mut session = RunSession::default();
//! let update = session.request_run("main function { dekhaw(42); }").unwrap();
//! let request = update.request.unwrap();
//! assert!(request.inputs.is_empty());
//!
//! let update = session
//!     .complete(Ok(ExecutionResult::new(0, "42\n", "")))
//!     .unwrap();
//! assert_eq!(update.console.as_deref(), Some("=== SUCCESS ===\n42\n"));
//! ```

pub mod classify;
pub mod collector;
pub mod error;
pub mod protocol;
pub mod scan;
pub mod session;

pub use classify::{Narrative, Outcome, classify};
pub use collector::{CollectorState, DialogField, DialogView, InputCollector, InputKey};
pub use error::{ConnectivityFailure, RunError};
pub use protocol::{ExecutionResult, RunRequest};
pub use scan::{DEFAULT_INPUT_CALL, InputScanner, ScanMode};
pub use session::{DEFAULT_FILENAME, RunPhase, RunSession, RunUpdate};
