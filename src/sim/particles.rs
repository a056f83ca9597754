//! Visual particles
//!
//! Particles never affect gameplay. They are spawned in bursts by feedback
//! events and live for an integer number of ticks.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Downward acceleration applied to particles each tick
pub const PARTICLE_GRAVITY: f32 = 0.1;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining ticks
    pub life: u32,
    /// 0xRRGGBB
    pub color: u32,
    pub size: f32,
}

/// How a burst scatters its particles
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub count: usize,
    pub life: u32,
    pub color: u32,
    /// Particles spawn uniformly inside `origin + [0, spread)`
    pub spread: Vec2,
    /// Velocity x is drawn from `[-vel_x, vel_x)`
    pub vel_x: f32,
    /// Velocity y is drawn from this half-open range
    pub vel_y: (f32, f32),
    /// Size is drawn from this half-open range
    pub size: (f32, f32),
}

/// Particle list with a quality-dependent cap
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    cap: usize,
}

impl ParticleSystem {
    pub fn new(cap: usize) -> Self {
        Self {
            particles: Vec::with_capacity(cap.min(256)),
            cap,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Spawn a burst at `origin`, evicting the oldest particles past the cap
    pub fn burst<R: Rng + ?Sized>(&mut self, rng: &mut R, origin: Vec2, burst: &Burst) {
        if self.cap == 0 {
            return;
        }
        for _ in 0..burst.count {
            let offset = Vec2::new(
                rng.random::<f32>() * burst.spread.x,
                rng.random::<f32>() * burst.spread.y,
            );
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * 2.0 * burst.vel_x,
                burst.vel_y.0 + rng.random::<f32>() * (burst.vel_y.1 - burst.vel_y.0),
            );
            let size = burst.size.0 + rng.random::<f32>() * (burst.size.1 - burst.size.0);
            self.particles.push(Particle {
                pos: origin + offset,
                vel,
                life: burst.life,
                color: burst.color,
                size,
            });
        }
        self.enforce_cap();
    }

    /// Integrate and age every particle; expired ones are removed
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.life = p.life.saturating_sub(1);
            p.vel.y += PARTICLE_GRAVITY;
        }
        self.particles.retain(|p| p.life > 0);
    }

    fn enforce_cap(&mut self) {
        if self.particles.len() > self.cap {
            let excess = self.particles.len() - self.cap;
            self.particles.drain(..excess);
        }
    }
}
