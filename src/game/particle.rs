//! Particle feedback - decorative bursts spawned by combat events

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

/// Lifetime of every particle, in ticks
pub const PARTICLE_LIFE: u32 = 30;
/// Velocity decay factor per tick
pub const PARTICLE_DRAG: f32 = 0.98;
/// Spawn position jitter around the burst center, per axis
pub const SPAWN_JITTER: f32 = 10.0;
/// Initial velocity range per axis
pub const MAX_PARTICLE_SPEED: f32 = 5.0;
pub const MIN_PARTICLE_SIZE: f32 = 2.0;
pub const MAX_PARTICLE_SIZE: f32 = 6.0;

/// A transient visual-feedback entity; carries no gameplay effect.
///
/// The renderer derives fade from `life / max_life`; the core never
/// computes colors beyond the burst's base color.
#[derive(Debug, Clone)]
pub struct Particle {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub life: u32,
    pub max_life: u32,
    pub color: &'static str,
    pub size: f32,
}

/// Particle manager: spawns bursts and decays the live collection
pub struct ParticleSystem;

impl ParticleSystem {
    /// Spawn `count` particles jittered around (x, y)
    pub fn spawn_burst(
        particles: &mut Vec<Particle>,
        rng: &mut ChaCha8Rng,
        x: f32,
        y: f32,
        color: &'static str,
        count: u32,
    ) {
        for _ in 0..count {
            particles.push(Particle {
                id: Uuid::new_v4(),
                x: x + rng.gen_range(-SPAWN_JITTER..=SPAWN_JITTER),
                y: y + rng.gen_range(-SPAWN_JITTER..=SPAWN_JITTER),
                vel_x: rng.gen_range(-MAX_PARTICLE_SPEED..=MAX_PARTICLE_SPEED),
                vel_y: rng.gen_range(-MAX_PARTICLE_SPEED..=MAX_PARTICLE_SPEED),
                life: PARTICLE_LIFE,
                max_life: PARTICLE_LIFE,
                color,
                size: rng.gen_range(MIN_PARTICLE_SIZE..=MAX_PARTICLE_SIZE),
            });
        }
    }

    /// Move, drag, and decay every particle; drop the expired
    pub fn advance(particles: &mut Vec<Particle>) {
        particles.retain_mut(|p| {
            p.x += p.vel_x;
            p.y += p.vel_y;
            p.vel_x *= PARTICLE_DRAG;
            p.vel_y *= PARTICLE_DRAG;
            p.life -= 1;
            p.life > 0
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn burst_spawns_count_particles_within_ranges() {
        let mut particles = Vec::new();
        ParticleSystem::spawn_burst(&mut particles, &mut rng(), 400.0, 300.0, "#ff4444", 12);

        assert_eq!(particles.len(), 12);
        for p in &particles {
            assert!((p.x - 400.0).abs() <= SPAWN_JITTER);
            assert!((p.y - 300.0).abs() <= SPAWN_JITTER);
            assert!(p.vel_x.abs() <= MAX_PARTICLE_SPEED);
            assert!(p.vel_y.abs() <= MAX_PARTICLE_SPEED);
            assert!(p.size >= MIN_PARTICLE_SIZE && p.size <= MAX_PARTICLE_SIZE);
            assert_eq!(p.life, PARTICLE_LIFE);
            assert_eq!(p.max_life, PARTICLE_LIFE);
        }
    }

    #[test]
    fn particles_live_exactly_their_lifetime() {
        let mut particles = Vec::new();
        ParticleSystem::spawn_burst(&mut particles, &mut rng(), 0.0, 0.0, "#ffd700", 1);

        for _ in 0..PARTICLE_LIFE - 1 {
            ParticleSystem::advance(&mut particles);
        }
        assert_eq!(particles.len(), 1);
        assert_eq!(particles[0].life, 1);

        ParticleSystem::advance(&mut particles);
        assert!(particles.is_empty());
    }

    #[test]
    fn drag_slows_particles_each_tick() {
        let mut particles = Vec::new();
        ParticleSystem::spawn_burst(&mut particles, &mut rng(), 0.0, 0.0, "#ffd700", 1);
        particles[0].vel_x = 4.0;
        particles[0].vel_y = -2.0;
        particles[0].x = 0.0;
        particles[0].y = 0.0;

        ParticleSystem::advance(&mut particles);
        assert_eq!(particles[0].x, 4.0);
        assert_eq!(particles[0].y, -2.0);
        assert_eq!(particles[0].vel_x, 4.0 * PARTICLE_DRAG);
        assert_eq!(particles[0].vel_y, -2.0 * PARTICLE_DRAG);
    }
}
