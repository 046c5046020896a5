use crate::foundation::error::{BackdropError, BackdropResult};
use crate::foundation::math::Rng64;
use std::f64::consts::TAU;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Closed sampling interval `[min, max]` for one randomized field.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bounds {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Bounds {
    /// Build an interval.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Uniform draw inside the interval.
    pub fn sample(self, rng: &mut Rng64) -> f64 {
        rng.range(self.min, self.max)
    }

    /// `true` when `v` lies inside the interval (inclusive).
    pub fn contains(self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }

    fn validate(self, name: &str) -> BackdropResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(BackdropError::validation(format!(
                "{name} bounds must be finite"
            )));
        }
        if self.min > self.max {
            return Err(BackdropError::validation(format!(
                "{name} bounds must satisfy min <= max (got {} > {})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Sampling bounds for every randomized pillar field.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PillarBounds {
    /// Horizontal world position as a multiple of the viewport width.
    pub x_ratio: Bounds,
    /// Vertical world position as a multiple of the viewport height.
    pub y_ratio: Bounds,
    /// Distance from the camera; must stay strictly positive.
    pub depth: Bounds,
    /// Unprojected width.
    pub width: Bounds,
    /// Unprojected height.
    pub height: Bounds,
    /// Bob angular rate per frame.
    pub bob_speed: Bounds,
    /// Bob phase in radians.
    pub phase_offset: Bounds,
}

impl Default for PillarBounds {
    fn default() -> Self {
        Self {
            x_ratio: Bounds::new(-1.25, 1.25),
            y_ratio: Bounds::new(-0.75, 0.75),
            depth: Bounds::new(200.0, 1000.0),
            width: Bounds::new(30.0, 70.0),
            height: Bounds::new(100.0, 400.0),
            bob_speed: Bounds::new(0.0015, 0.0045),
            phase_offset: Bounds::new(0.0, TAU),
        }
    }
}

/// Sampling bounds for every randomized particle field.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticleBounds {
    /// Initial orbit angle in radians.
    pub angle: Bounds,
    /// Orbit radius as a fraction of `1.5 * min(vw, vh)`.
    pub radius_ratio: Bounds,
    /// Orbit plane tilt around the horizontal axis.
    pub tilt: Bounds,
    /// Magnitude of the per-frame angle step; the sign is drawn separately.
    pub angular_speed: Bounds,
    /// Vertical orbit offset as a fraction of `min(vw, vh)`.
    pub y_offset_ratio: Bounds,
}

impl Default for ParticleBounds {
    fn default() -> Self {
        Self {
            angle: Bounds::new(0.0, TAU),
            radius_ratio: Bounds::new(0.15, 0.40),
            tilt: Bounds::new(-0.25, 0.25),
            angular_speed: Bounds::new(0.001, 0.004),
            y_offset_ratio: Bounds::new(-0.2, 0.2),
        }
    }
}

/// Mount-time configuration of the background scene.
///
/// Every field is optional in JSON; omitted fields keep their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Fixed seed; `None` draws a fresh seed at every mount.
    pub seed: Option<u64>,
    /// Number of pillars.
    pub pillar_count: usize,
    /// Number of orbiting particles.
    pub particle_count: usize,
    /// Pillar sampling bounds.
    pub pillars: PillarBounds,
    /// Particle sampling bounds.
    pub particles: ParticleBounds,
    /// Per-particle, per-frame probability of the sparkle halo.
    pub sparkle_probability: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            pillar_count: 50,
            particle_count: 7,
            pillars: PillarBounds::default(),
            particles: ParticleBounds::default(),
            sparkle_probability: 0.05,
        }
    }
}

impl SceneConfig {
    /// Default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse a configuration from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> BackdropResult<Self> {
        let cfg: SceneConfig = serde_json::from_reader(r)
            .map_err(|e| BackdropError::serde(format!("parse scene config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BackdropResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BackdropError::validation(format!("open scene config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pretty JSON form, suitable as a starting point for a config file.
    pub fn to_json_pretty(&self) -> BackdropResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BackdropError::serde(format!("serialize scene config: {e}")))
    }

    /// Check that every bound can be sampled and keeps the scene invariants.
    pub fn validate(&self) -> BackdropResult<()> {
        let p = &self.pillars;
        p.x_ratio.validate("pillars.x_ratio")?;
        p.y_ratio.validate("pillars.y_ratio")?;
        p.depth.validate("pillars.depth")?;
        p.width.validate("pillars.width")?;
        p.height.validate("pillars.height")?;
        p.bob_speed.validate("pillars.bob_speed")?;
        p.phase_offset.validate("pillars.phase_offset")?;
        if p.depth.min <= 0.0 {
            return Err(BackdropError::validation("pillars.depth.min must be > 0"));
        }
        if p.width.min < 0.0 || p.height.min < 0.0 {
            return Err(BackdropError::validation(
                "pillar width/height must be non-negative",
            ));
        }

        let q = &self.particles;
        q.angle.validate("particles.angle")?;
        q.radius_ratio.validate("particles.radius_ratio")?;
        q.tilt.validate("particles.tilt")?;
        q.angular_speed.validate("particles.angular_speed")?;
        q.y_offset_ratio.validate("particles.y_offset_ratio")?;
        if q.angular_speed.min < 0.0 {
            return Err(BackdropError::validation(
                "particles.angular_speed is a magnitude and must be >= 0",
            ));
        }
        if q.radius_ratio.min < 0.0 {
            return Err(BackdropError::validation(
                "particles.radius_ratio must be >= 0",
            ));
        }

        if !(0.0..=1.0).contains(&self.sparkle_probability) {
            return Err(BackdropError::validation(
                "sparkle_probability must be within [0, 1]",
            ));
        }
        Ok(())
    }

    /// The configured seed, or one drawn from the system clock.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(clock_seed)
    }
}

fn clock_seed() -> u64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    // Fold the high bits in so two mounts in the same second still differ.
    (nanos as u64) ^ ((nanos >> 64) as u64) ^ u64::from(std::process::id()).rotate_left(32)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
