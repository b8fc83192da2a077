//! Browser entry point. The page creates a `WebHandle` and starts it on its canvas.
use eframe::web_sys;
use tracing::{error, info};
use wasm_bindgen::prelude::*;

use crate::logs::start_logging;
use crate::message::Message;
use crate::{StartupParams, SystemState, run_egui, try_log_error};

#[derive(Clone)]
#[wasm_bindgen]
pub struct WebHandle {
    runner: eframe::WebRunner,
}

#[wasm_bindgen]
impl WebHandle {
    #[allow(clippy::new_without_default)]
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        try_log_error!(start_logging(), "Failed to start logging");
        Self {
            runner: eframe::WebRunner::new(),
        }
    }

    #[wasm_bindgen]
    pub async fn start(&self, canvas: web_sys::HtmlCanvasElement) -> Result<(), JsValue> {
        let state = SystemState::new()
            .map_err(|e| JsValue::from_str(&format!("{e:#}")))?
            .with_params(StartupParams::empty());
        info!("Starting sifter in the browser");

        self.runner
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(move |cc| Ok(run_egui(cc, state)?)),
            )
            .await
    }

    #[wasm_bindgen]
    pub fn destroy(&self) {
        self.runner.destroy();
    }

    /// Hands a table to the app, e.g. from a page level file input.
    #[wasm_bindgen]
    pub fn load_data(&self, name: String, data: Vec<u8>) {
        let Some(mut state) = self.runner.app_mut::<SystemState>() else {
            error!("load_data called before the app was started");
            return;
        };
        state.update(Message::LoadFromData { name, data });
        if let Some(ctx) = &state.context {
            ctx.request_repaint();
        }
    }

    #[wasm_bindgen]
    pub fn has_panicked(&self) -> bool {
        self.runner.has_panicked()
    }

    #[wasm_bindgen]
    pub fn panic_message(&self) -> Option<String> {
        self.runner.panic_summary().map(|s| s.message())
    }
}
