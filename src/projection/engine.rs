//! Perspective projection of scene entities into screen space.
//!
//! Every function here is pure: the same entity, viewport and frame always produce the same
//! output. Nothing is cached between frames.

use crate::foundation::core::{FrameIndex, Point, Rect, Viewport};
use crate::foundation::math::{MIN_DEPTH, clamp01, clamp_depth};
use crate::scene::model::{Particle, Pillar};

/// Focal length `k` of the `k / depth` perspective scale.
pub const FOCAL_LENGTH: f64 = 400.0;
/// Vertical bob amplitude of pillars, in world units.
pub const BOB_AMPLITUDE: f64 = 50.0;
/// Pillar opacity per unit of projected scale.
pub const PILLAR_ALPHA_PER_SCALE: f64 = 0.4;
/// Orbit radius multiplier applied to `min(vw, vh)`.
pub const ORBIT_RADIUS_SCALE: f64 = 1.5;
/// Flattening of orbit depth before the perspective divide.
pub const ORBIT_DEPTH_FLATTEN: f64 = 0.5;
/// Smallest particle radius in pixels.
pub const MIN_PARTICLE_SIZE: f64 = 0.5;
/// Particle radius per unit of projected scale.
pub const PARTICLE_SIZE_PER_SCALE: f64 = 2.0;
/// Breathing glow angular rate per frame.
pub const GLOW_PULSE_RATE: f64 = 0.01;
/// Breathing glow relative amplitude.
pub const GLOW_PULSE_AMPLITUDE: f64 = 0.1;

/// Screen-space draw parameters of one pillar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PillarProjection {
    /// Perspective scale `FOCAL_LENGTH / depth`.
    pub scale: f64,
    /// Projected center.
    pub center: Point,
    /// Projected width.
    pub width: f64,
    /// Projected height.
    pub height: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

impl PillarProjection {
    /// Axis-aligned rectangle centered on the projected position.
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, (self.width, self.height))
    }

    /// Coarse visibility test.
    ///
    /// A pillar is drawn only while its projected center lies inside the viewport grown by the
    /// projected extent on every side, i.e. inside `(-w, vw + w) x (-h, vh + h)`.
    pub fn is_visible(&self, viewport: Viewport) -> bool {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return false;
        }
        let (x, y) = (self.center.x, self.center.y);
        let (w, h) = (self.width, self.height);
        x > -w && x < viewport.width_f64() + w && y > -h && y < viewport.height_f64() + h
    }
}

/// Screen-space draw parameters of one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleProjection {
    /// Perspective scale `FOCAL_LENGTH / depth`.
    pub scale: f64,
    /// Effective (clamped) depth used for the divide.
    pub depth: f64,
    /// Projected center.
    pub center: Point,
    /// Circle radius in pixels.
    pub size: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// `false` when the unclamped depth is at or behind the near plane; such a particle is not
    /// drawn.
    pub in_front: bool,
}

/// Project a pillar at frame `t`.
pub fn project_pillar(pillar: &Pillar, viewport: Viewport, t: FrameIndex) -> PillarProjection {
    let (vw, vh) = (viewport.width_f64(), viewport.height_f64());
    let bob = (t.as_f64() * pillar.bob_speed + pillar.phase_offset).sin() * BOB_AMPLITUDE;
    let world_x = pillar.x_ratio * vw;
    let world_y = pillar.y_ratio * vh + bob;

    let scale = FOCAL_LENGTH / clamp_depth(pillar.depth);
    let c = viewport.center();
    PillarProjection {
        scale,
        center: Point::new(c.x + world_x * scale, c.y + world_y * scale),
        width: pillar.width * scale,
        height: pillar.height * scale,
        alpha: clamp01(scale * PILLAR_ALPHA_PER_SCALE),
    }
}

/// Project a particle at its current angle.
///
/// The angle is advanced by the scene, not here, so projecting twice yields the same result.
pub fn project_particle(particle: &Particle, viewport: Viewport) -> ParticleProjection {
    let min_dim = viewport.min_dim();
    let radius = particle.radius_ratio * (min_dim * ORBIT_RADIUS_SCALE);

    let x3d = particle.angle.cos() * radius;
    let z3d = particle.angle.sin() * radius;
    let y3d = z3d * particle.tilt + particle.y_offset_ratio * min_dim;

    let raw_depth = FOCAL_LENGTH + z3d * ORBIT_DEPTH_FLATTEN;
    let depth = clamp_depth(raw_depth);
    let scale = FOCAL_LENGTH / depth;
    let c = viewport.center();
    ParticleProjection {
        scale,
        depth,
        center: Point::new(c.x + x3d * scale, c.y + y3d * scale),
        size: (PARTICLE_SIZE_PER_SCALE * scale).max(MIN_PARTICLE_SIZE),
        alpha: clamp01(scale),
        in_front: raw_depth > MIN_DEPTH,
    }
}

/// Radius of the breathing center glow at frame `t`.
pub fn glow_radius(viewport: Viewport, t: FrameIndex) -> f64 {
    let pulse = 1.0 + (t.as_f64() * GLOW_PULSE_RATE).sin() * GLOW_PULSE_AMPLITUDE;
    viewport.min_dim() * 0.5 * pulse
}

#[cfg(test)]
#[path = "../../tests/unit/projection/engine.rs"]
mod tests;
