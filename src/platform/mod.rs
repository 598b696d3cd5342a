//! Platform layer
//!
//! The scene graph lives in JavaScript. It picks blocks by name, hands the
//! name and the mouse button to the game, and replays the renderer calls that
//! come back as JSON:
//! - `bridge`: platform-neutral session wrapper producing JSON responses
//! - `web`: wasm-bindgen class and start hook (WASM only)

pub mod bridge;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use bridge::{ActionResponse, BlockInfo, Bridge};
#[cfg(target_arch = "wasm32")]
pub use web::WebGame;
