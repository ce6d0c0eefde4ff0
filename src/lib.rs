//! Duel Engine - authoritative simulation for a two-fighter arena duel
//!
//! The engine advances fighter physics, resolves melee and projectile
//! combat, manages timed state transitions (attack, block, hit stun,
//! cooldowns), and spawns ephemeral particle feedback. Each match runs as a
//! fixed-rate tick task that consumes abstract input frames and publishes a
//! read-only world snapshot every tick; rendering, input capture, and menu
//! presentation are external collaborators wired up over channels.

pub mod config;
pub mod game;
pub mod util;
