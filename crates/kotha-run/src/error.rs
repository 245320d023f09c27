#![forbid(unsafe_code)]

//! Error taxonomy for the run workflow.
//!
//! A non-zero exit code is not an error here; it is a classification branch
//! of a completed run (see [`crate::classify`]).

/// The execution request could not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityFailure {
    /// Network or transport failure reported by the host.
    Transport(String),
    /// The service answered with a body that is not a run result.
    MalformedResponse(String),
}

impl core::fmt::Display for ConnectivityFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Transport(msg) => f.write_str(msg),
            Self::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for ConnectivityFailure {}

/// Ways a run attempt ends without a classified result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// The user dismissed the input dialog.
    InputCancelled,
    /// The execution request did not complete.
    ConnectivityFailure(ConnectivityFailure),
    /// A run is already collecting input or awaiting a response.
    Busy,
    /// The source is empty or whitespace only.
    NoCode,
}

impl core::fmt::Display for RunError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InputCancelled => f.write_str("input cancelled"),
            Self::ConnectivityFailure(failure) => write!(f, "cannot connect to server: {failure}"),
            Self::Busy => f.write_str("a run is already in progress"),
            Self::NoCode => f.write_str("no code to run"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConnectivityFailure(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<ConnectivityFailure> for RunError {
    fn from(failure: ConnectivityFailure) -> Self {
        Self::ConnectivityFailure(failure)
    }
}
