//! Cube Sweeper - Minesweeper on a cubic grid of blocks
//!
//! Core modules:
//! - `sim`: Grid model, flood-fill reveal engine, game session
//! - `config`: Typed, clamped game parameters and the restart query
//! - `error`: Parse errors for parameters and cell identifiers
//! - `platform`: Browser bridge handing cell events to the JS scene graph

pub mod config;
pub mod error;
pub mod platform;
pub mod sim;

pub use config::GameConfig;
pub use error::{CellIdError, ConfigError};

/// Game configuration constants
pub mod consts {
    /// Smallest allowed grid side length
    pub const MIN_GRID_SIZE: u32 = 2;
    /// Largest allowed grid side length (9³ = 729 cells)
    pub const MAX_GRID_SIZE: u32 = 9;
    pub const DEFAULT_GRID_SIZE: u32 = 6;

    pub const MIN_BOMBS: u32 = 1;
    pub const DEFAULT_BOMBS: u32 = 20;

    /// World-space distance between block centres
    pub const BLOCK_SPACING: i32 = 100;

    /// Risk values above this are labelled "9+"
    pub const MAX_RISK_LABEL: u8 = 9;

    /// Page the restart mechanism navigates back to
    pub const INDEX_PAGE: &str = "index.html";
}

/// Clamp an optional parameter into `[min, max]`.
///
/// Missing or zero input takes `default` first, then the usual bounds apply,
/// so a default larger than `max` still ends up at `max`.
#[inline]
pub fn limit(value: Option<i64>, min: i64, max: i64, default: i64) -> i64 {
    let value = match value {
        Some(v) if v != 0 => v,
        _ => default,
    };
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
