//! Fighter state machine - combat states, timers, and input rules

use serde::{Deserialize, Serialize};

use super::physics::{PhysicsSystem, Rect, ARENA_WIDTH, GROUND_Y, JUMP_IMPULSE, MOVE_SPEED};
use super::projectile::ProjectileKind;
use super::{InputFrame, PlayerSide};

/// Fighter hitbox width
pub const FIGHTER_WIDTH: f32 = 60.0;
/// Fighter hitbox height
pub const FIGHTER_HEIGHT: f32 = 100.0;
/// Distance of each spawn point from its arena edge
pub const SPAWN_MARGIN: f32 = 200.0;

pub const MAX_HEALTH: f32 = 100.0;
pub const MAX_ENERGY: f32 = 100.0;
/// Energy regained per tick while below max
pub const ENERGY_REGEN: f32 = 0.25;
/// Energy cost of a special action
pub const SPECIAL_COST: f32 = 30.0;

/// Ticks before an attack can be initiated again
pub const ATTACK_COOLDOWN: u32 = 30;
/// Ticks before a special can be initiated again
pub const SPECIAL_COOLDOWN: u32 = 60;
/// Ticks after initiation at which the melee strike lands
pub const STRIKE_DELAY: u32 = 1;
/// Ticks the attacking animation holds before reverting to idle
pub const ATTACK_ANIM_TICKS: u32 = 12;
/// Ticks the special animation holds before reverting to idle
pub const SPECIAL_ANIM_TICKS: u32 = 20;

/// Horizontal facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// Unit sign along the x axis
    pub fn dir(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    pub fn opposes(self, other: Facing) -> bool {
        self != other
    }
}

/// Combat state; exactly one holds at any tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FighterState {
    Idle,
    Walking,
    Jumping,
    Attacking,
    Blocking,
    Hit,
    Special,
}

/// Selectable fighter archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FighterKind {
    /// Fireball thrower
    Blaze,
    /// Ice shard thrower
    Frost,
    /// Lightning bolt thrower
    Volt,
}

impl FighterKind {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Blaze => "Blaze",
            Self::Frost => "Frost",
            Self::Volt => "Volt",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Blaze => "#e74c3c",
            Self::Frost => "#3498db",
            Self::Volt => "#f1c40f",
        }
    }

    /// Projectile type spawned by this fighter's special
    pub fn signature(self) -> ProjectileKind {
        match self {
            Self::Blaze => ProjectileKind::Fireball,
            Self::Frost => ProjectileKind::Ice,
            Self::Volt => ProjectileKind::Lightning,
        }
    }
}

/// A fighter's full authoritative state for one round
#[derive(Debug, Clone)]
pub struct Fighter {
    pub side: PlayerSide,
    pub kind: FighterKind,
    pub name: &'static str,
    pub color: &'static str,
    pub facing: Facing,

    // Position and movement
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub grounded: bool,

    // Combat
    pub health: f32,
    pub max_health: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub state: FighterState,
    pub attack_cooldown: u32,
    pub special_cooldown: u32,
    pub hit_stun: u32,
    pub block_stun: u32,
    /// One-shot flag armed at attack initiation; the strike resolves the
    /// tick `strike_delay` reaches zero and is consumed whether it lands
    /// or whiffs
    pub strike_pending: bool,
    pub strike_delay: u32,
    /// Remaining ticks of the current attack/special animation window
    pub action_timer: u32,
    pub combo: u32,

    // Animation
    pub anim: u32,
}

impl Fighter {
    /// Create a fighter at its side's mirrored spawn point
    pub fn new(side: PlayerSide, kind: FighterKind) -> Self {
        let (x, facing) = match side {
            PlayerSide::One => (SPAWN_MARGIN, Facing::Right),
            PlayerSide::Two => (ARENA_WIDTH - SPAWN_MARGIN - FIGHTER_WIDTH, Facing::Left),
        };

        Self {
            side,
            kind,
            name: kind.display_name(),
            color: kind.color(),
            facing,
            x,
            y: GROUND_Y - FIGHTER_HEIGHT,
            width: FIGHTER_WIDTH,
            height: FIGHTER_HEIGHT,
            vel_x: 0.0,
            vel_y: 0.0,
            grounded: true,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            energy: MAX_ENERGY,
            max_energy: MAX_ENERGY,
            state: FighterState::Idle,
            attack_cooldown: 0,
            special_cooldown: 0,
            hit_stun: 0,
            block_stun: 0,
            strike_pending: false,
            strike_delay: 0,
            action_timer: 0,
            combo: 0,
            anim: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        self.rect().center()
    }

    /// Whether an armed melee strike resolves this tick
    pub fn strike_ready(&self) -> bool {
        self.state == FighterState::Attacking && self.strike_pending && self.strike_delay == 0
    }

    /// Advance this fighter by one tick: animation, timers, energy, input
    /// rules, then physics. Returns the projectile kind to spawn if a
    /// special was cast.
    pub fn update(&mut self, frame: &InputFrame) -> Option<ProjectileKind> {
        self.anim = self.anim.wrapping_add(1);

        // Stun is sampled before timer decay: the tick a stun expires is
        // still input-dead.
        let stunned = self.hit_stun > 0 || self.block_stun > 0;

        self.tick_timers();

        if self.energy < self.max_energy {
            self.energy = (self.energy + ENERGY_REGEN).min(self.max_energy);
        }

        let mut move_held = false;
        let mut cast = None;

        if !stunned {
            let mut acted = false;

            // 1. Horizontal movement; with both keys held, left wins
            if frame.move_left {
                self.vel_x = -MOVE_SPEED;
                self.facing = Facing::Left;
                self.state = FighterState::Walking;
                move_held = true;
                acted = true;
            } else if frame.move_right {
                self.vel_x = MOVE_SPEED;
                self.facing = Facing::Right;
                self.state = FighterState::Walking;
                move_held = true;
                acted = true;
            }

            // 2. Jump, grounded only
            if frame.jump && self.grounded {
                self.vel_y = JUMP_IMPULSE;
                self.grounded = false;
                self.state = FighterState::Jumping;
                acted = true;
            }

            // 3. Attack, gated on its cooldown; the strike itself lands one
            //    tick later, exactly once
            if frame.attack && self.attack_cooldown == 0 {
                self.state = FighterState::Attacking;
                self.attack_cooldown = ATTACK_COOLDOWN;
                self.strike_pending = true;
                self.strike_delay = STRIKE_DELAY;
                self.action_timer = ATTACK_ANIM_TICKS;
                acted = true;
            }

            // 4. Special, gated on energy and its cooldown
            if frame.special && self.energy >= SPECIAL_COST && self.special_cooldown == 0 {
                self.state = FighterState::Special;
                self.energy -= SPECIAL_COST;
                self.special_cooldown = SPECIAL_COOLDOWN;
                self.action_timer = SPECIAL_ANIM_TICKS;
                cast = Some(self.kind.signature());
                acted = true;
            }

            // 5. Block, overridden by any action above this tick
            if frame.block {
                if !acted {
                    self.state = FighterState::Blocking;
                }
            } else if self.state == FighterState::Blocking {
                self.state = FighterState::Idle;
            }

            // Attack/special animations run out back to idle
            if !acted
                && self.action_timer == 0
                && matches!(self.state, FighterState::Attacking | FighterState::Special)
            {
                self.state = FighterState::Idle;
            }
        }

        let step = PhysicsSystem::step_body(
            self.x,
            self.y,
            self.width,
            self.height,
            self.vel_x,
            self.vel_y,
            self.grounded,
            move_held,
        );

        self.x = step.x;
        self.y = step.y;
        self.vel_x = step.vel_x;
        self.vel_y = step.vel_y;
        self.grounded = step.grounded;

        if step.landed && self.state == FighterState::Jumping {
            self.state = FighterState::Idle;
        }
        if step.halted && self.state == FighterState::Walking {
            self.state = FighterState::Idle;
        }

        cast
    }

    fn tick_timers(&mut self) {
        if self.attack_cooldown > 0 {
            self.attack_cooldown -= 1;
        }
        if self.special_cooldown > 0 {
            self.special_cooldown -= 1;
        }
        if self.hit_stun > 0 {
            self.hit_stun -= 1;
        }
        if self.block_stun > 0 {
            self.block_stun -= 1;
        }
        if self.strike_delay > 0 {
            self.strike_delay -= 1;
        }
        if self.action_timer > 0 {
            self.action_timer -= 1;
        }

        if self.state == FighterState::Hit && self.hit_stun == 0 && self.block_stun == 0 {
            self.state = FighterState::Idle;
        }
    }
}
