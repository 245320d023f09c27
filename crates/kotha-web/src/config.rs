#![forbid(unsafe_code)]

//! Editor configuration.
//!
//! Native hosts read the environment; the web host passes a JSON options
//! object to `init`. Both fall back to the stock client's behavior.
//!
//! | variable             | option         | default     |
//! |----------------------|----------------|-------------|
//! | `KOTHA_RUN_ENDPOINT` | `run_endpoint` | `/api/run`  |
//! | `KOTHA_CLASS_PREFIX` | `class_prefix` | (empty)     |
//! | `KOTHA_INPUT_CALL`   | `input_call`   | `nao`       |
//! | `KOTHA_INPUT_SCAN`   | `input_scan`   | `syntactic` |
//! | `KOTHA_LOG`          | `log`          | `info`      |

use kotha_highlight::HighlightTheme;
use kotha_run::{DEFAULT_INPUT_CALL, InputScanner, ScanMode};
use serde::Deserialize;
use tracing::warn;

use crate::error::HostError;

const ENV_RUN_ENDPOINT: &str = "KOTHA_RUN_ENDPOINT";
const ENV_CLASS_PREFIX: &str = "KOTHA_CLASS_PREFIX";
const ENV_INPUT_CALL: &str = "KOTHA_INPUT_CALL";
const ENV_INPUT_SCAN: &str = "KOTHA_INPUT_SCAN";
pub(crate) const ENV_LOG: &str = "KOTHA_LOG";

pub const DEFAULT_RUN_ENDPOINT: &str = "/api/run";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Path the run request is posted to.
    pub run_endpoint: String,
    /// Prefix for highlight classes.
    pub class_prefix: String,
    /// Name of the input-reading call counted before a run.
    pub input_call: String,
    pub input_scan: ScanMode,
    /// `tracing` filter directive.
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            run_endpoint: DEFAULT_RUN_ENDPOINT.to_string(),
            class_prefix: String::new(),
            input_call: DEFAULT_INPUT_CALL.to_string(),
            input_scan: ScanMode::Syntactic,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EditorConfig {
    /// Configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Configuration from a custom environment lookup (for tests).
    ///
    /// Empty values are treated as unset; an unknown scan mode keeps the
    /// default.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get_env(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(endpoint) = get(ENV_RUN_ENDPOINT) {
            config.run_endpoint = endpoint;
        }
        if let Some(prefix) = get_env(ENV_CLASS_PREFIX) {
            config.class_prefix = prefix;
        }
        if let Some(call) = get(ENV_INPUT_CALL) {
            config.input_call = call.trim().to_string();
        }
        if let Some(value) = get(ENV_INPUT_SCAN) {
            match ScanMode::parse(&value) {
                Some(mode) => config.input_scan = mode,
                None => warn!(key = ENV_INPUT_SCAN, value = %value, "unknown scan mode ignored"),
            }
        }
        if let Some(filter) = get(ENV_LOG) {
            config.log_filter = filter;
        }
        config
    }

    /// Configuration from the web host's JSON options. Missing keys keep
    /// their defaults.
    pub fn from_json_str(options: &str) -> Result<Self, HostError> {
        let json: EditorOptionsJson = serde_json::from_str(options).map_err(HostError::Decode)?;
        let mut config = Self::default();
        if let Some(endpoint) = json.run_endpoint {
            config.run_endpoint = endpoint;
        }
        if let Some(prefix) = json.class_prefix {
            config.class_prefix = prefix;
        }
        if let Some(call) = json.input_call {
            config.input_call = call;
        }
        if let Some(value) = json.input_scan {
            config.input_scan = ScanMode::parse(&value).ok_or(HostError::InvalidConfig {
                key: "input_scan",
                value,
            })?;
        }
        if let Some(filter) = json.log {
            config.log_filter = filter;
        }
        Ok(config)
    }

    #[must_use]
    pub fn scanner(&self) -> InputScanner {
        InputScanner::new(self.input_call.clone(), self.input_scan)
    }

    #[must_use]
    pub fn theme(&self) -> HighlightTheme {
        HighlightTheme::with_prefix(self.class_prefix.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct EditorOptionsJson {
    run_endpoint: Option<String>,
    class_prefix: Option<String>,
    input_call: Option<String>,
    input_scan: Option<String>,
    log: Option<String>,
}
