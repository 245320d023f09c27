#![forbid(unsafe_code)]

//! Browser host for the Kotha editor.
//!
//! [`EditorSession`] ties the highlighter, gutter and run workflow to a
//! stream of DOM events. The page owns the DOM and the network; this crate
//! owns the state and tells the page what to update.
//!
//! ```
//! use kotha_web::{EditorSession, HostEvent};
//!
//! let mut editor = EditorSession::default();
//! editor
//!     .handle(HostEvent::Input { text: "dhoro x = 1;".into() })
//!     .unwrap();
//! let outputs = editor.take_outputs();
//! assert!(outputs.overlay_html.unwrap().contains("class=\"keyword\""));
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod session;

pub use config::EditorConfig;
pub use error::HostError;
pub use event::{HostEvent, normalize_dom_key};
pub use session::{DialogUpdate, EditorSession, HostOutputs, OutboundRequest};

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::KothaEditor;

/// Native builds compile this crate with a JSON-in/JSON-out stand-in so the
/// same host protocol can be driven from tests and tools.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct KothaEditor {
    session: EditorSession,
}

#[cfg(not(target_arch = "wasm32"))]
impl KothaEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconfigure from a JSON options object. Resets the session.
    pub fn init(&mut self, options: Option<&str>) -> Result<(), HostError> {
        let config = match options {
            Some(json) => EditorConfig::from_json_str(json)?,
            None => EditorConfig::default(),
        };
        logging::init(&config.log_filter);
        self.session = EditorSession::new(config);
        Ok(())
    }

    /// Handle one event JSON string.
    pub fn input(&mut self, event: &str) -> Result<(), HostError> {
        self.session.handle_json(event)
    }

    /// Drain accumulated outputs as a JSON string.
    pub fn take_outputs(&mut self) -> Result<String, HostError> {
        self.session.take_outputs().to_json_string()
    }

    pub fn run_enabled(&self) -> bool {
        self.session.run_session().run_enabled()
    }
}
