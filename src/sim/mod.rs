//! Game logic module
//!
//! All gameplay rules live here. This module must stay free of rendering and
//! platform code:
//! - Seeded RNG only
//! - Dense grid indexed by integer coordinates
//! - Presentation changes go out through `GridRenderer`

pub mod grid;
pub mod reveal;
pub mod session;

pub use grid::{CELL_ID_PREFIX, Cell, Grid, neighbor_offsets, risk_label};
pub use reveal::{
    FlagReport, GameEvent, GridRenderer, RevealOutcome, check_win, reveal, reveal_all_bombs,
    reveal_all_numbers, toggle_flag,
};
pub use session::{GamePhase, GameSession, PlayerAction};
