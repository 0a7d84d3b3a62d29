//! Decorative particle bursts.
//!
//! Particles are spawned in bursts at an event location, drift outward and
//! upward, fade linearly and grow while fading, and are removed the moment
//! their lifetime runs out. Advancing is unconditional while the scene lives.

use rand::Rng;

use crate::math::Vec3;

pub const MIN_LIFE: f32 = 1.8;
pub const MAX_LIFE: f32 = 2.3;

const HORIZONTAL_SPREAD: f32 = 1.2;
const MIN_RISE: f32 = 1.0;
const MAX_RISE: f32 = 2.4;
/// Scale reached at the instant of expiry.
const GROWTH: f32 = 1.5;

pub type ParticleId = u64;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub life: f32,
    pub max_life: f32,
    pub color: u32,
}

impl Particle {
    /// Linear fade: 1 at birth, 0 at expiry.
    pub fn opacity(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    pub fn elapsed_fraction(&self) -> f32 {
        1.0 - self.opacity()
    }

    pub fn scale(&self) -> f32 {
        1.0 + GROWTH * self.elapsed_fraction()
    }
}

#[derive(Debug, Default)]
pub struct ParticleSystem {
    live: Vec<Particle>,
    next_id: ParticleId,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_burst<R: Rng>(&mut self, rng: &mut R, position: Vec3, color: u32, count: u32) {
        for _ in 0..count {
            let velocity = Vec3::new(
                rng.gen_range(-HORIZONTAL_SPREAD..=HORIZONTAL_SPREAD),
                rng.gen_range(MIN_RISE..=MAX_RISE),
                rng.gen_range(-HORIZONTAL_SPREAD..=HORIZONTAL_SPREAD),
            );
            let life = rng.gen_range(MIN_LIFE..=MAX_LIFE);
            self.live.push(Particle {
                id: self.next_id,
                position,
                velocity,
                life,
                max_life: life,
                color,
            });
            self.next_id += 1;
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.live.retain_mut(|p| {
            p.life -= dt;
            if p.life <= 0.0 {
                return false;
            }
            p.position += p.velocity * dt;
            true
        });
    }

    pub fn live(&self) -> &[Particle] {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }
}
