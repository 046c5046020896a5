//! Per-frame drawing of the backdrop.
//!
//! Layers are composited bottom-up in a fixed order: background, breathing glow, pillars (far to
//! near), particles. Vector shapes go through `vello_cpu`; since it renders into a fresh buffer,
//! every vector layer is rendered into a scratch pixmap and premul-over'd onto the frame.

use vello_cpu::kurbo::Shape;

use crate::foundation::core::{FrameIndex, Point, Rect, StraightColor, Viewport};
use crate::foundation::error::{BackdropError, BackdropResult};
use crate::foundation::math::Rng64;
use crate::projection::engine::{
    ParticleProjection, glow_radius, project_particle, project_pillar,
};
use crate::render::backend::{FrameSurface, surface_dims};
use crate::render::blur::{blur_rgba8_premul, shadow_kernel_params};
use crate::render::composite::{over_at, over_in_place};
use crate::render::gradient::{ColorStop, RadialGradient, over_radial_disc, rasterize_radial};
use crate::scene::model::{Pillar, SceneState};

const BACKGROUND_STOPS: [ColorStop; 3] = [
    ColorStop::new(0.0, StraightColor::rgba(15, 23, 42, 1.0)),
    ColorStop::new(0.6, StraightColor::rgba(0, 0, 0, 1.0)),
    ColorStop::new(1.0, StraightColor::rgba(0, 0, 0, 1.0)),
];

const GLOW_STOPS: [ColorStop; 2] = [
    ColorStop::new(0.0, StraightColor::rgba(40, 80, 200, 0.08)),
    ColorStop::new(1.0, StraightColor::rgba(0, 0, 0, 0.0)),
];

/// Pillar body; alpha is multiplied by the projected alpha.
pub const PILLAR_FILL: StraightColor = StraightColor::rgba(100, 150, 255, 0.1);
/// Pillar outline; alpha is multiplied by the projected alpha.
pub const PILLAR_STROKE: StraightColor = StraightColor::rgba(150, 200, 255, 0.25);
/// Pillar outline width in pixels.
pub const PILLAR_STROKE_WIDTH: f64 = 1.0;
/// Particle core; alpha is multiplied by the projected alpha.
pub const PARTICLE_CORE: StraightColor = StraightColor::rgba(200, 230, 255, 1.0);
/// Glow cast by every particle shape.
pub const PARTICLE_SHADOW: StraightColor = StraightColor::rgba(120, 180, 255, 0.8);
/// Canvas-style shadow blur of the particle glow.
pub const PARTICLE_SHADOW_BLUR: f64 = 15.0;
/// Sparkle halo radius relative to the particle size.
pub const SPARKLE_RADIUS_SCALE: f64 = 2.0;
/// Sparkle halo alpha relative to the particle alpha.
pub const SPARKLE_ALPHA_SCALE: f64 = 0.5;

/// Counters for one rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Pillars that passed the visibility test.
    pub pillars_drawn: usize,
    /// Pillars skipped by the visibility test.
    pub pillars_culled: usize,
    /// Particles drawn (all of them, unless offscreen or behind the near plane).
    pub particles_drawn: usize,
    /// Particles that also got a sparkle halo this frame.
    pub sparkles: usize,
}

/// Indices of `pillars` sorted far to near (depth descending), written into `order`.
///
/// The sort is stable, so pillars at equal depth keep their generation order.
pub fn painter_order(pillars: &[Pillar], order: &mut Vec<usize>) {
    order.clear();
    order.extend(0..pillars.len());
    order.sort_by(|&a, &b| pillars[b].depth.total_cmp(&pillars[a].depth));
}

/// Draws [`SceneState`] frames onto a [`FrameSurface`].
///
/// Owns the sparkle random stream and the caches that survive between frames.
pub struct Compositor {
    sparkle_probability: f64,
    sparkle_rng: Rng64,
    background: Option<(Viewport, Vec<u8>)>,
    layer: Option<vello_cpu::Pixmap>,
    order: Vec<usize>,
    draws: Vec<PillarDraw>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("sparkle_probability", &self.sparkle_probability)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// New compositor whose sparkle draws come from a stream seeded with `sparkle_seed`.
    pub fn new(sparkle_probability: f64, sparkle_seed: u64) -> Self {
        Self {
            sparkle_probability,
            sparkle_rng: Rng64::new(sparkle_seed),
            background: None,
            layer: None,
            order: Vec::new(),
            draws: Vec::new(),
        }
    }

    /// Render `scene` at frame `t` into `surface`, replacing its contents.
    #[tracing::instrument(level = "trace", skip(self, scene, surface), fields(t = t.0))]
    pub fn render(
        &mut self,
        scene: &SceneState,
        viewport: Viewport,
        t: FrameIndex,
        surface: &mut FrameSurface,
    ) -> BackdropResult<FrameStats> {
        if surface.viewport() != viewport {
            return Err(BackdropError::render(format!(
                "surface is {} but frame viewport is {viewport}",
                surface.viewport()
            )));
        }
        let (w, h) = surface_dims(viewport)?;
        let mut stats = FrameStats::default();

        let background = self.background(viewport);
        surface.data_mut().copy_from_slice(background);

        over_radial_disc(
            surface.data_mut(),
            viewport,
            &RadialGradient {
                center: viewport.center(),
                radius: glow_radius(viewport, t),
                stops: &GLOW_STOPS,
            },
        )?;

        self.draw_pillars(scene, viewport, t, (w, h), surface, &mut stats)?;

        for particle in scene.particles() {
            let proj = project_particle(particle, viewport);
            let sparkle = self.sparkle_rng.chance(self.sparkle_probability);
            if !proj.in_front {
                continue;
            }
            if draw_particle(&proj, sparkle, viewport, surface)? {
                stats.particles_drawn += 1;
                if sparkle {
                    stats.sparkles += 1;
                }
            }
        }

        Ok(stats)
    }

    fn background(&mut self, viewport: Viewport) -> &[u8] {
        let stale = !matches!(&self.background, Some((vp, _)) if *vp == viewport);
        if stale {
            tracing::debug!(%viewport, "rasterizing background");
            let buf = rasterize_radial(
                viewport,
                &RadialGradient {
                    center: viewport.center(),
                    radius: viewport.width_f64(),
                    stops: &BACKGROUND_STOPS,
                },
            );
            self.background = Some((viewport, buf));
        }
        self.background
            .as_ref()
            .map(|(_, buf)| buf.as_slice())
            .unwrap_or(&[])
    }

    fn draw_pillars(
        &mut self,
        scene: &SceneState,
        viewport: Viewport,
        t: FrameIndex,
        (w, h): (u16, u16),
        surface: &mut FrameSurface,
        stats: &mut FrameStats,
    ) -> BackdropResult<()> {
        painter_order(scene.pillars(), &mut self.order);
        plan_pillars(scene, viewport, t, &self.order, &mut self.draws, stats);
        if self.draws.is_empty() {
            return Ok(());
        }

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(PILLAR_STROKE_WIDTH));
        for draw in &self.draws {
            let r = to_cpu_rect(draw.rect);
            ctx.set_paint(cpu_color(PILLAR_FILL.with_alpha_scaled(draw.alpha)));
            ctx.fill_rect(&r);
            ctx.set_paint(cpu_color(PILLAR_STROKE.with_alpha_scaled(draw.alpha)));
            ctx.stroke_rect(&r);
        }

        if !matches!(&self.layer, Some(p) if p.width() == w && p.height() == h) {
            self.layer = None;
        }
        let layer = self
            .layer
            .get_or_insert_with(|| vello_cpu::Pixmap::new(w, h));
        clear_pixmap(layer);
        ctx.flush();
        ctx.render_to_pixmap(layer);
        over_in_place(surface.data_mut(), layer.data_as_u8_slice(), 1.0)
    }
}

/// One pillar rectangle, clipped and ready to paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PillarDraw {
    pub(crate) rect: Rect,
    pub(crate) alpha: f64,
}

/// Project the pillars in `order`, cull them, and collect what remains in paint order.
fn plan_pillars(
    scene: &SceneState,
    viewport: Viewport,
    t: FrameIndex,
    order: &[usize],
    draws: &mut Vec<PillarDraw>,
    stats: &mut FrameStats,
) {
    draws.clear();
    // Clip generously so huge near-plane rects stay well-conditioned; the outline of a
    // clipped edge lies outside the frame either way.
    let clip = Rect::new(0.0, 0.0, viewport.width_f64(), viewport.height_f64()).inflate(4.0, 4.0);
    for &index in order {
        let proj = project_pillar(&scene.pillars()[index], viewport, t);
        if !proj.is_visible(viewport) {
            stats.pillars_culled += 1;
            continue;
        }
        stats.pillars_drawn += 1;

        let rect = proj.rect().intersect(clip);
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            continue;
        }
        draws.push(PillarDraw {
            rect,
            alpha: proj.alpha,
        });
    }
}

/// One particle: its core circle and, when sparkling, the halo. Each shape casts the blurred
/// glow before it is painted, as a canvas shadow does.
///
/// Returns `false` when the particle and its glow lie entirely outside the frame.
fn draw_particle(
    proj: &ParticleProjection,
    sparkle: bool,
    viewport: Viewport,
    surface: &mut FrameSurface,
) -> BackdropResult<bool> {
    let (blur_radius, sigma) = shadow_kernel_params(PARTICLE_SHADOW_BLUR);
    let margin = f64::from(blur_radius) + 2.0;

    let mut shapes = vec![(proj.size, PARTICLE_CORE.with_alpha_scaled(proj.alpha))];
    if sparkle {
        shapes.push((
            proj.size * SPARKLE_RADIUS_SCALE,
            PARTICLE_CORE.with_alpha_scaled(proj.alpha * SPARKLE_ALPHA_SCALE),
        ));
    }
    let extent = shapes.iter().map(|(r, _)| *r).fold(0.0, f64::max) + margin;

    let frame = Rect::new(0.0, 0.0, viewport.width_f64(), viewport.height_f64());
    let sprite = Rect::from_center_size(proj.center, (2.0 * extent, 2.0 * extent))
        .intersect(frame.inflate(margin, margin));
    if !(sprite.width() >= 1.0 && sprite.height() >= 1.0) {
        return Ok(false);
    }
    let origin = Point::new(sprite.x0.floor(), sprite.y0.floor());
    let sw = (sprite.x1.ceil() - origin.x) as u32;
    let sh = (sprite.y1.ceil() - origin.y) as u32;
    let sprite_vp = Viewport::new(sw, sh);
    let (sw16, sh16) = surface_dims(sprite_vp)?;

    let local = vello_cpu::kurbo::Point::new(proj.center.x - origin.x, proj.center.y - origin.y);
    let mut sprite_px = vec![0u8; sprite_vp.area() * 4];
    let mut scratch = vello_cpu::Pixmap::new(sw16, sh16);
    for (radius, color) in shapes {
        let circle = vello_cpu::kurbo::Circle::new(local, radius).to_path(0.1);

        let shadow = PARTICLE_SHADOW.with_alpha_scaled(color.alpha);
        fill_into(&mut scratch, &circle, shadow);
        let blurred = blur_rgba8_premul(
            scratch.data_as_u8_slice(),
            u32::from(sw16),
            u32::from(sh16),
            blur_radius,
            sigma,
        )?;
        over_in_place(&mut sprite_px, &blurred, 1.0)?;

        fill_into(&mut scratch, &circle, color);
        over_in_place(&mut sprite_px, scratch.data_as_u8_slice(), 1.0)?;
    }

    over_at(
        surface.data_mut(),
        viewport,
        &sprite_px,
        sw,
        sh,
        origin.x as i64,
        origin.y as i64,
    )?;
    Ok(true)
}

fn fill_into(
    pixmap: &mut vello_cpu::Pixmap,
    path: &vello_cpu::kurbo::BezPath,
    color: StraightColor,
) {
    clear_pixmap(pixmap);
    let mut ctx = vello_cpu::RenderContext::new(pixmap.width(), pixmap.height());
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(cpu_color(color));
    ctx.fill_path(path);
    ctx.flush();
    ctx.render_to_pixmap(pixmap);
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn cpu_color(c: StraightColor) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.alpha_u8())
}

fn to_cpu_rect(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
