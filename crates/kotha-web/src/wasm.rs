#![forbid(unsafe_code)]

use wasm_bindgen::prelude::*;

use crate::config::EditorConfig;
use crate::session::EditorSession;

fn to_js(err: crate::HostError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// JS-facing editor handle.
///
/// Events go in as JSON strings (see `HostEvent`); changes come out of
/// `takeOutputs` as one JSON object.
#[wasm_bindgen]
pub struct KothaEditor {
    session: EditorSession,
}

#[wasm_bindgen]
impl KothaEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            session: EditorSession::default(),
        }
    }

    /// Reconfigure from a JSON options object. Resets the session.
    pub fn init(&mut self, options: Option<String>) -> Result<(), JsValue> {
        let config = match options.as_deref() {
            Some(json) => EditorConfig::from_json_str(json).map_err(to_js)?,
            None => EditorConfig::default(),
        };
        crate::logging::init(&config.log_filter);
        self.session = EditorSession::new(config);
        Ok(())
    }

    /// Handle one event JSON string.
    pub fn input(&mut self, event: &str) -> Result<(), JsValue> {
        self.session.handle_json(event).map_err(to_js)
    }

    /// Drain accumulated outputs as a JSON string.
    #[wasm_bindgen(js_name = takeOutputs)]
    pub fn take_outputs(&mut self) -> Result<String, JsValue> {
        self.session.take_outputs().to_json_string().map_err(to_js)
    }

    /// Whether the run button should be enabled.
    #[wasm_bindgen(js_name = runEnabled)]
    pub fn run_enabled(&self) -> bool {
        self.session.run_session().run_enabled()
    }
}

impl Default for KothaEditor {
    fn default() -> Self {
        Self::new()
    }
}
