//! Session wrapper speaking JSON to the presentation layer

use glam::Vec3;
use serde::Serialize;

use crate::config::GameConfig;
use crate::sim::{FlagReport, GameEvent, GamePhase, GameSession, PlayerAction};

/// Layout entry for one block, used by JS to build the scene
#[derive(Debug, Clone, Serialize)]
pub struct BlockInfo {
    pub id: String,
    /// World-space centre, serialized as `[x, y, z]`
    pub position: Vec3,
}

/// Everything JS needs after one call into the game
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    pub phase: GamePhase,
    /// Renderer calls to replay, in order
    pub events: Vec<GameEvent>,
    /// Flag tally, after validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<FlagReport>,
    /// Where to go next, once the game is over
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart_url: Option<String>,
}

impl ActionResponse {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("Failed to serialize response: {e}");
            String::from("{}")
        })
    }
}

/// Owns the current session and turns calls into [`ActionResponse`]s
#[derive(Debug)]
pub struct Bridge {
    session: GameSession,
}

impl Bridge {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            session: GameSession::new(config, seed),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Every block with its scene-graph name and position
    pub fn blocks(&self) -> Vec<BlockInfo> {
        let grid = self.session.grid();
        grid.coords()
            .map(|coord| BlockInfo {
                id: grid.cell_id(coord),
                position: grid.world_position(coord),
            })
            .collect()
    }

    /// Player clicked a block; right button flags
    pub fn act(&mut self, id: &str, flag: bool) -> ActionResponse {
        let action = if flag {
            PlayerAction::Flag
        } else {
            PlayerAction::Reveal
        };
        let mut events = Vec::new();
        self.session.act_on_id(id, action, &mut events);
        self.respond(events, None)
    }

    /// Player asked to check their flags
    pub fn validate(&mut self) -> ActionResponse {
        let report = self.session.validate_flags();
        self.respond(Vec::new(), Some(report))
    }

    pub fn show_numbers(&mut self) -> ActionResponse {
        let mut events = Vec::new();
        self.session.show_numbers(&mut events);
        self.respond(events, None)
    }

    /// Replace the session with a fresh one on the same parameters
    pub fn restart(&mut self, seed: u64) {
        let config = *self.session.config();
        let old = std::mem::replace(&mut self.session, GameSession::new(config, seed));
        old.teardown();
    }

    fn respond(&self, events: Vec<GameEvent>, report: Option<FlagReport>) -> ActionResponse {
        let phase = self.session.phase();
        ActionResponse {
            phase,
            events,
            report,
            restart_url: phase.is_over().then(|| self.session.config().restart_url()),
        }
    }
}
