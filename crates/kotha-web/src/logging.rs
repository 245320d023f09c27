#![forbid(unsafe_code)]

//! Global `tracing` subscriber setup.
//!
//! Native hosts get a `fmt` subscriber filtered by `KOTHA_LOG`. On `wasm32`
//! there is no stdout, so installation is a no-op and the embedding page is
//! expected to bring its own subscriber if it wants logs.

/// Install the global subscriber with `filter` (an `EnvFilter` directive).
///
/// Invalid directives fall back to the default filter. Returns `false` when
/// a subscriber was already installed or the target has no console.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(filter: &str) -> bool {
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_new(filter)
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(target_arch = "wasm32")]
pub fn init(_filter: &str) -> bool {
    false
}

/// Install the global subscriber with the filter from `KOTHA_LOG`.
pub fn init_from_env() -> bool {
    let filter = std::env::var(crate::config::ENV_LOG)
        .ok()
        .filter(|v| !v.trim().is_empty());
    init(filter.as_deref().unwrap_or(crate::config::DEFAULT_LOG_FILTER))
}
