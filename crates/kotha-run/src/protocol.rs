#![forbid(unsafe_code)]

//! Wire format of the run service.
//!
//! Request: `{"code": "...", "inputs": ["...", ...]}`.
//! Response: `{"exit_code": n, "stdout": "...", "stderr": "..."}` where
//! either stream may be missing or `null`.

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::ConnectivityFailure;

/// Payload posted to the run service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub code: String,
    pub inputs: Vec<String>,
}

impl RunRequest {
    pub fn new(code: impl Into<String>, inputs: Vec<String>) -> Self {
        Self {
            code: code.into(),
            inputs,
        }
    }

    /// Serialize to the JSON request body.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Outcome of one execution, received once per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub exit_code: i64,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Deserialize)]
struct WireResult {
    exit_code: Number,
    #[serde(default)]
    stdout: Option<String>,
    #[serde(default)]
    stderr: Option<String>,
}

impl ExecutionResult {
    pub fn new(exit_code: i64, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Parse a response body. Absent streams are empty; a body without a
    /// numeric `exit_code` is not a result. Codes outside `i64` saturate.
    pub fn from_json_str(body: &str) -> Result<Self, ConnectivityFailure> {
        let wire: WireResult = serde_json::from_str(body)
            .map_err(|err| ConnectivityFailure::MalformedResponse(err.to_string()))?;
        Ok(Self {
            exit_code: saturating_exit_code(&wire.exit_code),
            stdout: wire.stdout.unwrap_or_default(),
            stderr: wire.stderr.unwrap_or_default(),
        })
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Only a numeric zero maps to 0; every other number keeps its sign.
fn saturating_exit_code(code: &Number) -> i64 {
    if let Some(code) = code.as_i64() {
        return code;
    }
    if code.is_u64() {
        return i64::MAX;
    }
    let value = code.as_f64().unwrap_or(f64::MAX);
    if value == 0.0 {
        return 0;
    }
    // `as` saturates; keep fractions like 0.5 from collapsing to success.
    match value as i64 {
        0 if value > 0.0 => 1,
        0 => -1,
        code => code,
    }
}
