//! World snapshot building - the read-only per-tick state published to
//! rendering and UI collaborators

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fighter::{Facing, Fighter, FighterKind, FighterState};
use super::particle::Particle;
use super::projectile::{Projectile, ProjectileKind};
use super::r#match::{GamePhase, MatchState};
use super::PlayerSide;

/// A fighter's state as exposed to consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FighterSnapshot {
    pub side: PlayerSide,
    pub kind: FighterKind,
    pub name: String,
    pub color: String,
    pub facing: Facing,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub grounded: bool,
    pub health: f32,
    pub max_health: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub state: FighterState,
    pub attack_cooldown: u32,
    pub special_cooldown: u32,
    pub hit_stun: u32,
    pub block_stun: u32,
    pub combo: u32,
    pub anim: u32,
}

impl From<&Fighter> for FighterSnapshot {
    fn from(f: &Fighter) -> Self {
        Self {
            side: f.side,
            kind: f.kind,
            name: f.name.to_string(),
            color: f.color.to_string(),
            facing: f.facing,
            x: f.x,
            y: f.y,
            width: f.width,
            height: f.height,
            vel_x: f.vel_x,
            vel_y: f.vel_y,
            grounded: f.grounded,
            health: f.health,
            max_health: f.max_health,
            energy: f.energy,
            max_energy: f.max_energy,
            state: f.state,
            attack_cooldown: f.attack_cooldown,
            special_cooldown: f.special_cooldown,
            hit_stun: f.hit_stun,
            block_stun: f.block_stun,
            combo: f.combo,
            anim: f.anim,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub id: Uuid,
    pub kind: ProjectileKind,
    pub owner: PlayerSide,
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub anim: u32,
}

impl From<&Projectile> for ProjectileSnapshot {
    fn from(p: &Projectile) -> Self {
        Self {
            id: p.id,
            kind: p.kind,
            owner: p.owner,
            x: p.x,
            y: p.y,
            vel_x: p.vel_x,
            anim: p.anim,
        }
    }
}

/// Particle as exposed to the renderer; fade is `life / max_life`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleSnapshot {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
    pub color: String,
    pub size: f32,
    pub life: u32,
    pub max_life: u32,
}

impl From<&Particle> for ParticleSnapshot {
    fn from(p: &Particle) -> Self {
        Self {
            id: p.id,
            x: p.x,
            y: p.y,
            color: p.color.to_string(),
            size: p.size,
            life: p.life,
            max_life: p.max_life,
        }
    }
}

/// Combat events that occurred during one tick
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GameEvent {
    MeleeHit {
        attacker: PlayerSide,
        target: PlayerSide,
        damage: f32,
        combo: u32,
    },

    MeleeBlocked {
        attacker: PlayerSide,
        target: PlayerSide,
    },

    ProjectileSpawned {
        owner: PlayerSide,
        kind: ProjectileKind,
    },

    ProjectileHit {
        target: PlayerSide,
        kind: ProjectileKind,
        damage: f32,
    },

    ProjectileBlocked {
        target: PlayerSide,
        kind: ProjectileKind,
    },

    /// A fighter's health reached zero; the round is over
    RoundEnd {
        winner: PlayerSide,
        winner_name: String,
        scores: [u32; 2],
    },
}

/// The full world state published after each tick; immutable to consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub round: u32,
    pub phase: GamePhase,
    pub scores: [u32; 2],
    pub winner: Option<PlayerSide>,
    pub fighters: Vec<FighterSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub particles: Vec<ParticleSnapshot>,
    /// Events raised during this tick
    pub events: Vec<GameEvent>,
}

impl WorldSnapshot {
    /// Capture the match state after a tick
    pub fn capture(state: &MatchState, events: Vec<GameEvent>) -> Self {
        Self {
            tick: state.tick,
            round: state.round,
            phase: state.phase,
            scores: state.scores,
            winner: state.winner,
            fighters: state.fighters.iter().map(FighterSnapshot::from).collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(ProjectileSnapshot::from)
                .collect(),
            particles: state.particles.iter().map(ParticleSnapshot::from).collect(),
            events,
        }
    }
}

/// Messages broadcast by a running match to its subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimMsg {
    /// World snapshot, published once per simulated tick
    Snapshot(WorldSnapshot),

    /// Round outcome, published once when a winner is determined
    RoundOver {
        round: u32,
        winner: PlayerSide,
        winner_name: String,
        scores: [u32; 2],
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_snake_case_tags() {
        let event = GameEvent::MeleeHit {
            attacker: PlayerSide::One,
            target: PlayerSide::Two,
            damage: 15.0,
            combo: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "melee_hit");
        assert_eq!(json["attacker"], "one");
    }

    #[test]
    fn sim_msgs_tag_by_type() {
        let msg = SimMsg::RoundOver {
            round: 1,
            winner: PlayerSide::One,
            winner_name: "Blaze".to_string(),
            scores: [1, 0],
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "round_over");
        assert_eq!(json["scores"][0], 1);
    }
}
