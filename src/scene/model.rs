use crate::foundation::math::Rng64;
use crate::scene::config::SceneConfig;

/// A receding rectangular background shape.
///
/// All fields are fixed at generation; the on-screen position is recomputed every frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pillar {
    /// Horizontal world position as a multiple of the viewport width.
    pub x_ratio: f64,
    /// Distance from the camera (`> 0`).
    pub depth: f64,
    /// Vertical world position as a multiple of the viewport height.
    pub y_ratio: f64,
    /// Unprojected width.
    pub width: f64,
    /// Unprojected height.
    pub height: f64,
    /// Bob angular rate per frame.
    pub bob_speed: f64,
    /// Bob phase in radians.
    pub phase_offset: f64,
}

/// A glowing point orbiting the scene center on a tilted circle.
///
/// Only `angle` changes after generation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Particle {
    /// Current orbit angle in radians (unbounded).
    pub angle: f64,
    /// Orbit radius as a fraction of `1.5 * min(vw, vh)`.
    pub radius_ratio: f64,
    /// Orbit plane tilt.
    pub tilt: f64,
    /// Signed angle step per frame.
    pub angular_speed: f64,
    /// Vertical orbit offset as a fraction of `min(vw, vh)`.
    pub y_offset_ratio: f64,
}

impl Particle {
    /// Advance one frame along the orbit.
    pub fn advance(&mut self) {
        self.angle += self.angular_speed;
    }
}

/// The fixed entity population of one mounted background.
///
/// Created once per mount and dropped on unmount. Pillars are never mutated after generation;
/// particles only accumulate their angle through [`SceneState::advance`].
#[derive(Clone, Debug)]
pub struct SceneState {
    seed: u64,
    pillars: Vec<Pillar>,
    particles: Vec<Particle>,
}

impl SceneState {
    /// Generate a population from a validated config and a resolved seed.
    #[tracing::instrument(skip(cfg), fields(pillars = cfg.pillar_count, particles = cfg.particle_count))]
    pub fn generate(cfg: &SceneConfig, seed: u64) -> Self {
        let mut rng = Rng64::new(seed);
        let pb = &cfg.pillars;
        let pillars = (0..cfg.pillar_count)
            .map(|_| Pillar {
                x_ratio: pb.x_ratio.sample(&mut rng),
                depth: pb.depth.sample(&mut rng),
                y_ratio: pb.y_ratio.sample(&mut rng),
                width: pb.width.sample(&mut rng),
                height: pb.height.sample(&mut rng),
                bob_speed: pb.bob_speed.sample(&mut rng),
                phase_offset: pb.phase_offset.sample(&mut rng),
            })
            .collect();

        let qb = &cfg.particles;
        let particles = (0..cfg.particle_count)
            .map(|_| {
                let angle = qb.angle.sample(&mut rng);
                let radius_ratio = qb.radius_ratio.sample(&mut rng);
                let tilt = qb.tilt.sample(&mut rng);
                let speed = qb.angular_speed.sample(&mut rng);
                let angular_speed = speed * rng.sign();
                Particle {
                    angle,
                    radius_ratio,
                    tilt,
                    angular_speed,
                    y_offset_ratio: qb.y_offset_ratio.sample(&mut rng),
                }
            })
            .collect();

        tracing::debug!(seed, "scene generated");
        Self {
            seed,
            pillars,
            particles,
        }
    }

    /// Build a scene from explicit entities.
    pub fn from_parts(seed: u64, pillars: Vec<Pillar>, particles: Vec<Particle>) -> Self {
        Self {
            seed,
            pillars,
            particles,
        }
    }

    /// Seed the population was drawn from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Pillars in generation order.
    pub fn pillars(&self) -> &[Pillar] {
        &self.pillars
    }

    /// Particles in generation order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Advance every particle by one frame.
    pub fn advance(&mut self) {
        for p in &mut self.particles {
            p.advance();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
