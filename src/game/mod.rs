//! Game simulation modules

pub mod combat;
pub mod fighter;
pub mod r#match;
pub mod particle;
pub mod physics;
pub mod projectile;
pub mod snapshot;

pub use r#match::{GameMatch, GamePhase, MatchHandle, MatchRegistry, MatchState};

use serde::{Deserialize, Serialize};

/// Which of the two player slots a fighter occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerSide {
    One,
    Two,
}

impl PlayerSide {
    pub fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Index into per-player arrays (fighters, scores, inputs)
    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// The set of logical action keys a player is holding this tick.
///
/// Produced by the input-capture collaborator; the simulation only ever
/// reads it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InputFrame {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub attack: bool,
    pub block: bool,
    pub special: bool,
}

/// Control messages sent into a running match task
#[derive(Debug, Clone)]
pub enum MatchCommand {
    /// Replace one player's held-key snapshot
    Input { side: PlayerSide, frame: InputFrame },
    /// Begin a round (from the menu or after a round ended)
    Start,
    /// Freeze the simulation, preserving all entity state
    Pause,
    /// Resume a paused match
    Resume,
    /// Stop the match task
    Shutdown,
}
