#![forbid(unsafe_code)]

/// Errors at the host boundary.
#[derive(Debug)]
pub enum HostError {
    /// An event or options payload did not match the expected schema.
    Decode(serde_json::Error),
    /// An outbound payload could not be serialized.
    Encode(serde_json::Error),
    /// A configuration value was out of range.
    InvalidConfig { key: &'static str, value: String },
}

impl core::fmt::Display for HostError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "invalid host payload: {err}"),
            Self::Encode(err) => write!(f, "cannot encode output: {err}"),
            Self::InvalidConfig { key, value } => write!(f, "invalid value for {key}: {value:?}"),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(err) | Self::Encode(err) => Some(err),
            Self::InvalidConfig { .. } => None,
        }
    }
}
