//! Melee combat resolution - hitboxes, damage, block mitigation

use super::fighter::{Facing, Fighter, FighterState};
use super::physics::Rect;

/// Horizontal reach of a melee strike in front of the attacker
pub const MELEE_REACH: f32 = 40.0;
/// Health removed by an unblocked melee strike
pub const MELEE_DAMAGE: f32 = 15.0;
/// Hit stun applied by an unblocked melee strike
pub const MELEE_HIT_STUN: u32 = 20;
/// Block stun applied to a blocking defender
pub const MELEE_BLOCK_STUN: u32 = 15;
/// Energy a defender pays to block a melee strike
pub const BLOCK_ENERGY_COST: f32 = 5.0;
/// Knockback velocity applied to a struck defender
pub const KNOCKBACK_SPEED: f32 = 8.0;

/// Particle burst on a clean hit
pub const HIT_BURST_COUNT: u32 = 12;
pub const HIT_BURST_COLOR: &str = "#ff4444";
/// Smaller burst on a blocked strike
pub const BLOCK_BURST_COUNT: u32 = 6;
pub const BLOCK_BURST_COLOR: &str = "#ffd700";

/// Outcome of one melee strike resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeleeOutcome {
    /// Hitbox missed the defender
    Whiff,
    /// Defender blocked facing the attacker
    Blocked,
    /// Clean hit; `killed` when the defender's health reached zero
    Hit { killed: bool },
}

/// Combat system for resolving melee exchanges
pub struct CombatSystem;

impl CombatSystem {
    /// Hitbox extending in front of the attacker, spanning its height
    pub fn strike_hitbox(attacker: &Fighter) -> Rect {
        let x = match attacker.facing {
            Facing::Right => attacker.x + attacker.width,
            Facing::Left => attacker.x - MELEE_REACH,
        };
        Rect::new(x, attacker.y, MELEE_REACH, attacker.height)
    }

    /// Resolve the attacker's armed strike against the defender, if one is
    /// due this tick. The strike is consumed either way, so each attack
    /// activation lands at most once.
    pub fn resolve_melee(attacker: &mut Fighter, defender: &mut Fighter) -> Option<MeleeOutcome> {
        if !attacker.strike_ready() {
            return None;
        }
        attacker.strike_pending = false;

        let hitbox = Self::strike_hitbox(attacker);
        if !hitbox.overlaps(&defender.rect()) {
            return Some(MeleeOutcome::Whiff);
        }

        if defender.state == FighterState::Blocking && defender.facing.opposes(attacker.facing) {
            defender.block_stun = MELEE_BLOCK_STUN;
            defender.energy = (defender.energy - BLOCK_ENERGY_COST).max(0.0);
            return Some(MeleeOutcome::Blocked);
        }

        defender.health = (defender.health - MELEE_DAMAGE).max(0.0);
        defender.hit_stun = MELEE_HIT_STUN;
        defender.state = FighterState::Hit;
        defender.combo = 0;
        defender.vel_x = attacker.facing.dir() * KNOCKBACK_SPEED;
        attacker.combo += 1;

        Some(MeleeOutcome::Hit {
            killed: defender.health <= 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::fighter::{Facing, FighterKind, MAX_HEALTH};
    use crate::game::{InputFrame, PlayerSide};

    /// Attacker at x=200 with an armed, due strike; defender in reach
    fn engaged_pair() -> (Fighter, Fighter) {
        let mut attacker = Fighter::new(PlayerSide::One, FighterKind::Blaze);
        let mut defender = Fighter::new(PlayerSide::Two, FighterKind::Frost);
        attacker.state = FighterState::Attacking;
        attacker.strike_pending = true;
        attacker.strike_delay = 0;
        defender.x = 280.0; // hitbox spans 260..300
        (attacker, defender)
    }

    #[test]
    fn clean_hit_applies_damage_stun_and_combo() {
        let (mut attacker, mut defender) = engaged_pair();
        let outcome = CombatSystem::resolve_melee(&mut attacker, &mut defender);

        assert_eq!(outcome, Some(MeleeOutcome::Hit { killed: false }));
        assert_eq!(defender.health, MAX_HEALTH - MELEE_DAMAGE);
        assert_eq!(defender.hit_stun, MELEE_HIT_STUN);
        assert_eq!(defender.state, FighterState::Hit);
        assert_eq!(defender.vel_x, KNOCKBACK_SPEED);
        assert_eq!(attacker.combo, 1);
    }

    #[test]
    fn facing_block_negates_damage_and_costs_energy() {
        let (mut attacker, mut defender) = engaged_pair();
        defender.state = FighterState::Blocking;
        let energy_before = defender.energy;

        let outcome = CombatSystem::resolve_melee(&mut attacker, &mut defender);

        assert_eq!(outcome, Some(MeleeOutcome::Blocked));
        assert_eq!(defender.health, MAX_HEALTH);
        assert_eq!(defender.block_stun, MELEE_BLOCK_STUN);
        assert_eq!(defender.energy, energy_before - BLOCK_ENERGY_COST);
        assert_eq!(attacker.combo, 0);
    }

    #[test]
    fn block_facing_away_is_a_full_hit() {
        let (mut attacker, mut defender) = engaged_pair();
        defender.state = FighterState::Blocking;
        defender.facing = Facing::Right; // same as attacker, turned away

        let outcome = CombatSystem::resolve_melee(&mut attacker, &mut defender);
        assert_eq!(outcome, Some(MeleeOutcome::Hit { killed: false }));
        assert_eq!(defender.health, MAX_HEALTH - MELEE_DAMAGE);
    }

    #[test]
    fn strike_is_consumed_even_on_whiff() {
        let (mut attacker, mut defender) = engaged_pair();
        defender.x = 600.0;

        assert_eq!(
            CombatSystem::resolve_melee(&mut attacker, &mut defender),
            Some(MeleeOutcome::Whiff)
        );
        assert!(!attacker.strike_pending);
        assert_eq!(
            CombatSystem::resolve_melee(&mut attacker, &mut defender),
            None
        );
    }

    #[test]
    fn strike_resolves_at_most_once() {
        let (mut attacker, mut defender) = engaged_pair();
        assert!(CombatSystem::resolve_melee(&mut attacker, &mut defender).is_some());
        assert_eq!(
            CombatSystem::resolve_melee(&mut attacker, &mut defender),
            None
        );
        assert_eq!(defender.health, MAX_HEALTH - MELEE_DAMAGE);
    }

    #[test]
    fn no_resolution_without_an_armed_strike() {
        let (mut attacker, mut defender) = engaged_pair();
        attacker.strike_pending = false;
        assert_eq!(
            CombatSystem::resolve_melee(&mut attacker, &mut defender),
            None
        );

        attacker.strike_pending = true;
        attacker.strike_delay = 1;
        assert_eq!(
            CombatSystem::resolve_melee(&mut attacker, &mut defender),
            None
        );
    }

    #[test]
    fn killing_blow_clamps_health_and_reports() {
        let (mut attacker, mut defender) = engaged_pair();
        defender.health = 10.0;

        let outcome = CombatSystem::resolve_melee(&mut attacker, &mut defender);
        assert_eq!(outcome, Some(MeleeOutcome::Hit { killed: true }));
        assert_eq!(defender.health, 0.0);
    }

    #[test]
    fn left_facing_hitbox_extends_behind_the_left_edge() {
        let mut attacker = Fighter::new(PlayerSide::Two, FighterKind::Frost);
        attacker.x = 300.0;
        let hitbox = CombatSystem::strike_hitbox(&attacker);
        assert_eq!(hitbox.x, 300.0 - MELEE_REACH);
        assert_eq!(hitbox.w, MELEE_REACH);
    }

    #[test]
    fn strike_lands_one_tick_after_initiation_through_the_state_machine() {
        let mut attacker = Fighter::new(PlayerSide::One, FighterKind::Blaze);
        let mut defender = Fighter::new(PlayerSide::Two, FighterKind::Frost);
        defender.x = 280.0;

        let mut frame = InputFrame::default();
        frame.attack = true;

        attacker.update(&frame);
        assert_eq!(
            CombatSystem::resolve_melee(&mut attacker, &mut defender),
            None
        );

        attacker.update(&frame);
        assert_eq!(
            CombatSystem::resolve_melee(&mut attacker, &mut defender),
            Some(MeleeOutcome::Hit { killed: false })
        );
    }
}
