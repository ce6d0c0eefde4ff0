//! Projectile lifecycle - spawning, advancement, hit resolution

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fighter::{Fighter, FighterState};
use super::physics::{Rect, ARENA_WIDTH};
use super::PlayerSide;

/// Horizontal speed, units per tick
pub const PROJECTILE_SPEED: f32 = 8.0;
/// Health removed from an unblocked target
pub const PROJECTILE_DAMAGE: f32 = 25.0;
/// Hit stun applied to an unblocked target
pub const PROJECTILE_HIT_STUN: u32 = 25;
pub const PROJECTILE_WIDTH: f32 = 20.0;
pub const PROJECTILE_HEIGHT: f32 = 12.0;
/// Distance past either arena edge at which projectiles are retired
pub const BOUNDS_MARGIN: f32 = 50.0;
/// Particle burst on a projectile hit
pub const PROJECTILE_BURST_COUNT: u32 = 10;

/// Damage-type tag; also selects the burst color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    Fireball,
    Ice,
    Lightning,
}

impl ProjectileKind {
    pub fn color(self) -> &'static str {
        match self {
            Self::Fireball => "#ff6b35",
            Self::Ice => "#74d0f1",
            Self::Lightning => "#ffe84a",
        }
    }
}

/// Active projectile owned by the match state
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: Uuid,
    pub kind: ProjectileKind,
    pub owner: PlayerSide,
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub damage: f32,
    pub anim: u32,
}

impl Projectile {
    /// Create a projectile at the owner's leading edge, traveling in its
    /// facing direction
    pub fn spawn(owner: &Fighter, kind: ProjectileKind) -> Self {
        let x = if owner.facing.dir() > 0.0 {
            owner.x + owner.width
        } else {
            owner.x - PROJECTILE_WIDTH
        };
        let (_, cy) = owner.center();

        Self {
            id: Uuid::new_v4(),
            kind,
            owner: owner.side,
            x,
            y: cy - PROJECTILE_HEIGHT / 2.0,
            vel_x: owner.facing.dir() * PROJECTILE_SPEED,
            damage: PROJECTILE_DAMAGE,
            anim: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, PROJECTILE_WIDTH, PROJECTILE_HEIGHT)
    }

    fn advance(&mut self) {
        self.x += self.vel_x;
        self.anim = self.anim.wrapping_add(1);
    }

    fn in_bounds(&self) -> bool {
        self.x >= -BOUNDS_MARGIN && self.x <= ARENA_WIDTH + BOUNDS_MARGIN
    }
}

/// Result of a projectile reaching the opposing fighter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileOutcome {
    /// Unblocked hit at (x, y); `killed` when the target's health reached zero
    Struck {
        target: PlayerSide,
        kind: ProjectileKind,
        x: f32,
        y: f32,
        killed: bool,
    },
    /// Fully negated by a blocking target
    Blocked {
        target: PlayerSide,
        kind: ProjectileKind,
    },
}

/// Projectile manager: advances and retires the live collection
pub struct ProjectileSystem;

impl ProjectileSystem {
    /// Advance every projectile one tick, resolve hits against the fighter
    /// that does not own it, and drop retired projectiles.
    ///
    /// `combat_live` is false once a winner is set; projectiles then still
    /// move and expire but no longer resolve hits.
    pub fn advance(
        projectiles: &mut Vec<Projectile>,
        fighters: &mut [Fighter; 2],
        combat_live: bool,
    ) -> Vec<ProjectileOutcome> {
        let mut outcomes = Vec::new();
        let mut retired: Vec<usize> = Vec::new();
        let mut live = combat_live;

        for (idx, projectile) in projectiles.iter_mut().enumerate() {
            projectile.advance();

            if !projectile.in_bounds() {
                retired.push(idx);
                continue;
            }

            if !live {
                continue;
            }

            let target = &mut fighters[projectile.owner.opponent().index()];
            if !projectile.rect().overlaps(&target.rect()) {
                continue;
            }

            if target.state == FighterState::Blocking {
                outcomes.push(ProjectileOutcome::Blocked {
                    target: target.side,
                    kind: projectile.kind,
                });
            } else {
                target.health = (target.health - projectile.damage).max(0.0);
                target.hit_stun = PROJECTILE_HIT_STUN;
                target.state = FighterState::Hit;
                target.combo = 0;

                let killed = target.health <= 0.0;
                if killed {
                    live = false;
                }

                let (cx, cy) = target.center();
                outcomes.push(ProjectileOutcome::Struck {
                    target: target.side,
                    kind: projectile.kind,
                    x: cx,
                    y: cy,
                    killed,
                });
            }
            retired.push(idx);
        }

        for idx in retired.into_iter().rev() {
            projectiles.remove(idx);
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::fighter::{Facing, FighterKind, MAX_HEALTH};

    fn fighters() -> [Fighter; 2] {
        [
            Fighter::new(PlayerSide::One, FighterKind::Blaze),
            Fighter::new(PlayerSide::Two, FighterKind::Frost),
        ]
    }

    #[test]
    fn spawns_at_leading_edge_in_facing_direction() {
        let [p1, p2] = fighters();

        let right = Projectile::spawn(&p1, ProjectileKind::Fireball);
        assert_eq!(right.x, p1.x + p1.width);
        assert_eq!(right.vel_x, PROJECTILE_SPEED);

        let left = Projectile::spawn(&p2, ProjectileKind::Ice);
        assert_eq!(left.x, p2.x - PROJECTILE_WIDTH);
        assert_eq!(left.vel_x, -PROJECTILE_SPEED);
    }

    #[test]
    fn moves_at_fixed_speed_each_tick() {
        let mut fighters = fighters();
        fighters[1].x = 700.0; // out of the flight path for 10 ticks
        let mut projectiles = vec![Projectile::spawn(&fighters[0], ProjectileKind::Fireball)];
        assert_eq!(projectiles[0].x, 260.0);

        for _ in 0..10 {
            ProjectileSystem::advance(&mut projectiles, &mut fighters, true);
        }
        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].x, 340.0);
    }

    #[test]
    fn unblocked_hit_damages_stuns_and_retires() {
        let mut fighters = fighters();
        fighters[1].x = 300.0;
        let mut projectile = Projectile::spawn(&fighters[0], ProjectileKind::Fireball);
        projectile.x = fighters[1].x - PROJECTILE_WIDTH - 4.0; // lands next tick
        let mut projectiles = vec![projectile];

        let outcomes = ProjectileSystem::advance(&mut projectiles, &mut fighters, true);

        assert!(projectiles.is_empty());
        assert_eq!(fighters[1].health, MAX_HEALTH - PROJECTILE_DAMAGE);
        assert_eq!(fighters[1].hit_stun, PROJECTILE_HIT_STUN);
        assert_eq!(fighters[1].state, FighterState::Hit);
        assert!(matches!(
            outcomes[0],
            ProjectileOutcome::Struck {
                target: PlayerSide::Two,
                killed: false,
                ..
            }
        ));
    }

    #[test]
    fn blocking_negates_a_projectile_entirely() {
        let mut fighters = fighters();
        fighters[1].x = 300.0;
        fighters[1].state = FighterState::Blocking;
        // Facing does not matter for projectile blocks
        fighters[1].facing = Facing::Left;
        let energy_before = fighters[1].energy;

        let mut projectile = Projectile::spawn(&fighters[0], ProjectileKind::Fireball);
        projectile.x = fighters[1].x - PROJECTILE_WIDTH - 4.0;
        let mut projectiles = vec![projectile];

        let outcomes = ProjectileSystem::advance(&mut projectiles, &mut fighters, true);

        assert!(projectiles.is_empty());
        assert_eq!(fighters[1].health, MAX_HEALTH);
        assert_eq!(fighters[1].hit_stun, 0);
        assert_eq!(fighters[1].energy, energy_before);
        assert!(matches!(outcomes[0], ProjectileOutcome::Blocked { .. }));
    }

    #[test]
    fn retires_once_past_the_arena_margin() {
        let mut fighters = fighters();
        let mut projectile = Projectile::spawn(&fighters[0], ProjectileKind::Fireball);
        projectile.x = ARENA_WIDTH + BOUNDS_MARGIN - 4.0;
        let mut projectiles = vec![projectile];

        ProjectileSystem::advance(&mut projectiles, &mut fighters, true);
        assert!(projectiles.is_empty());
    }

    #[test]
    fn killing_hit_reports_and_halts_further_resolution() {
        let mut fighters = fighters();
        fighters[1].x = 300.0;
        fighters[1].health = 20.0;

        let mut first = Projectile::spawn(&fighters[0], ProjectileKind::Fireball);
        first.x = fighters[1].x - PROJECTILE_WIDTH - 4.0;
        let mut second = first.clone();
        second.id = Uuid::new_v4();
        let mut projectiles = vec![first, second];

        let outcomes = ProjectileSystem::advance(&mut projectiles, &mut fighters, true);

        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            outcomes[0],
            ProjectileOutcome::Struck { killed: true, .. }
        ));
        assert_eq!(fighters[1].health, 0.0);
        // The second projectile flies on, untested
        assert_eq!(projectiles.len(), 1);
    }

    #[test]
    fn no_hits_once_combat_is_over() {
        let mut fighters = fighters();
        fighters[1].x = 300.0;
        let mut projectile = Projectile::spawn(&fighters[0], ProjectileKind::Fireball);
        projectile.x = fighters[1].x - PROJECTILE_WIDTH - 4.0;
        let mut projectiles = vec![projectile];

        let outcomes = ProjectileSystem::advance(&mut projectiles, &mut fighters, false);

        assert!(outcomes.is_empty());
        assert_eq!(fighters[1].health, MAX_HEALTH);
        assert_eq!(projectiles.len(), 1);
    }
}
