//! One game from bomb placement to win or loss
//!
//! A session owns the grid and the phase. It is built once from a validated
//! [`GameConfig`] and thrown away afterwards; the config survives through
//! [`GameSession::teardown`] to seed the next one.

use glam::IVec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::reveal::{self, FlagReport, GridRenderer, RevealOutcome};
use crate::config::GameConfig;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// All bombs flagged and nothing else, on validation
    Won,
    /// Bomb revealed, or flags failed validation
    Lost,
}

impl GamePhase {
    pub fn is_over(&self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// What the player did to a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    Reveal,
    Flag,
}

/// A running game
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    seed: u64,
    grid: Grid,
    phase: GamePhase,
}

impl GameSession {
    /// Start a game: build the grid and scatter bombs from `seed`
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut grid = Grid::new(config.size);
        let mut rng = Pcg32::seed_from_u64(seed);
        grid.place_bombs(config.bomb_count, &mut rng);
        log::info!(
            "New game: size={} bombs={} seed={}",
            config.size,
            grid.bomb_count(),
            seed
        );
        Self::with_grid(config, seed, grid)
    }

    /// Start a game on a prepared grid
    pub fn with_grid(config: GameConfig, seed: u64, grid: Grid) -> Self {
        Self {
            config,
            seed,
            grid,
            phase: GamePhase::Playing,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Apply a player action to the block at `coord`.
    ///
    /// Ignored once the game is over. Returns the phase afterwards.
    pub fn act<R: GridRenderer + ?Sized>(
        &mut self,
        coord: IVec3,
        action: PlayerAction,
        renderer: &mut R,
    ) -> GamePhase {
        if self.phase.is_over() {
            log::debug!("Ignoring {action:?} at {coord}: game over");
            return self.phase;
        }

        match action {
            PlayerAction::Reveal => {
                if reveal::reveal(&mut self.grid, coord, renderer) == RevealOutcome::Detonated {
                    log::info!("Bomb at {coord}, game over");
                    self.phase = GamePhase::Lost;
                }
            }
            PlayerAction::Flag => {
                reveal::toggle_flag(&mut self.grid, coord, renderer);
            }
        }
        self.phase
    }

    /// Apply a player action to a block named by the renderer.
    ///
    /// Names that are not blocks of this grid (camera, lights, typos) are
    /// logged and ignored.
    pub fn act_on_id<R: GridRenderer + ?Sized>(
        &mut self,
        id: &str,
        action: PlayerAction,
        renderer: &mut R,
    ) -> GamePhase {
        match self.grid.parse_cell_id(id) {
            Ok(coord) => self.act(coord, action, renderer),
            Err(e) => {
                log::warn!("Ignoring {action:?}: {e}");
                self.phase
            }
        }
    }

    /// Check the player's flags and end the game either way.
    ///
    /// A finished game keeps its phase; the report is still returned.
    pub fn validate_flags(&mut self) -> FlagReport {
        let report = reveal::check_win(&self.grid);
        if !self.phase.is_over() {
            self.phase = if report.is_win() {
                GamePhase::Won
            } else {
                GamePhase::Lost
            };
            log::info!(
                "Flags validated: {} correct, {} incorrect of {} bombs -> {:?}",
                report.correct,
                report.incorrect,
                report.bombs,
                self.phase
            );
        }
        report
    }

    /// Show every risk number (debug view)
    pub fn show_numbers<R: GridRenderer + ?Sized>(&mut self, renderer: &mut R) {
        reveal::reveal_all_numbers(&mut self.grid, renderer);
    }

    /// Query string that restarts with the same parameters
    pub fn restart_query(&self) -> String {
        self.config.to_query()
    }

    /// End the session, handing back its parameters for the next one
    pub fn teardown(self) -> GameConfig {
        log::info!("Session ended in {:?}", self.phase);
        self.config
    }
}
