//! wasm-bindgen surface for the browser page

use wasm_bindgen::prelude::*;

use super::bridge::Bridge;
use crate::config::GameConfig;

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Cube Sweeper starting...");
}

/// Game instance exported to JS
#[wasm_bindgen]
pub struct WebGame {
    bridge: Bridge,
}

#[wasm_bindgen]
impl WebGame {
    /// New game from the page's `size` / `bombs` query parameters
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let config = GameConfig::from_location();
        let seed = js_sys::Date::now() as u64;
        WebGame {
            bridge: Bridge::new(config, seed),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> u32 {
        self.bridge.session().config().size
    }

    #[wasm_bindgen(getter, js_name = bombCount)]
    pub fn bomb_count(&self) -> u32 {
        self.bridge.session().config().bomb_count
    }

    /// JSON array of `{id, position}` for building the scene
    pub fn blocks(&self) -> String {
        serde_json::to_string(&self.bridge.blocks()).unwrap_or_else(|e| {
            log::error!("Failed to serialize block layout: {e}");
            String::from("[]")
        })
    }

    /// Player released the mouse over block `id`; `flag` for the right button
    pub fn act(&mut self, id: &str, flag: bool) -> String {
        self.bridge.act(id, flag).to_json()
    }

    /// Check the flags; ends the game
    pub fn validate(&mut self) -> String {
        self.bridge.validate().to_json()
    }

    #[wasm_bindgen(js_name = showNumbers)]
    pub fn show_numbers(&mut self) -> String {
        self.bridge.show_numbers().to_json()
    }

    #[wasm_bindgen(js_name = restartUrl)]
    pub fn restart_url(&self) -> String {
        self.bridge.session().config().restart_url()
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
