use crate::foundation::core::{Point, StraightColor, Viewport};
use crate::foundation::error::{BackdropError, BackdropResult};
use crate::render::composite::over;

/// One stop of a gradient ramp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    /// Position along the ramp in `[0, 1]`.
    pub offset: f64,
    /// Straight-alpha color at this position.
    pub color: StraightColor,
}

impl ColorStop {
    /// Stop at `offset` with `color`.
    pub const fn new(offset: f64, color: StraightColor) -> Self {
        Self { offset, color }
    }
}

/// Radial gradient from `center` out to `radius`.
#[derive(Clone, Copy, Debug)]
pub struct RadialGradient<'a> {
    /// Center in pixel coordinates.
    pub center: Point,
    /// Distance at which the ramp reaches offset 1.
    pub radius: f64,
    /// Stops sorted by offset.
    pub stops: &'a [ColorStop],
}

impl RadialGradient<'_> {
    /// Premultiplied color at distance `d` from the center, in float `[0, 1]` channels.
    ///
    /// Colors are interpolated in premultiplied space, so a stop fading to transparent black
    /// does not darken the ramp.
    fn sample_premul(&self, d: f64) -> [f64; 4] {
        let t = if self.radius > 0.0 { d / self.radius } else { 1.0 };
        let Some(first) = self.stops.first() else {
            return [0.0; 4];
        };
        if t <= first.offset {
            return premul_f64(first.color);
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                let u = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
                let (ca, cb) = (premul_f64(a.color), premul_f64(b.color));
                let mut out = [0.0; 4];
                for i in 0..4 {
                    out[i] = ca[i] + (cb[i] - ca[i]) * u;
                }
                return out;
            }
        }
        self.stops
            .last()
            .map(|s| premul_f64(s.color))
            .unwrap_or([0.0; 4])
    }

    fn sample_u8(&self, d: f64) -> [u8; 4] {
        let c = self.sample_premul(d);
        c.map(|v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
    }
}

fn premul_f64(c: StraightColor) -> [f64; 4] {
    let a = crate::foundation::math::clamp01(c.alpha);
    [
        f64::from(c.r) / 255.0 * a,
        f64::from(c.g) / 255.0 * a,
        f64::from(c.b) / 255.0 * a,
        a,
    ]
}

/// Rasterize `gradient` over the whole viewport into a new premultiplied buffer.
///
/// Pixels beyond the radius take the last stop. Pixels are sampled at their centers.
pub fn rasterize_radial(viewport: Viewport, gradient: &RadialGradient<'_>) -> Vec<u8> {
    let (w, h) = (viewport.width as usize, viewport.height as usize);
    let mut out = vec![0u8; w * h * 4];
    for (y, row) in out.chunks_exact_mut(w * 4).enumerate() {
        let dy = y as f64 + 0.5 - gradient.center.y;
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let dx = x as f64 + 0.5 - gradient.center.x;
            px.copy_from_slice(&gradient.sample_u8(dx.hypot(dy)));
        }
    }
    out
}

/// Source-over a disc filled with `gradient` onto `dst`.
///
/// Only pixels whose centers lie inside the disc are touched.
pub fn over_radial_disc(
    dst: &mut [u8],
    viewport: Viewport,
    gradient: &RadialGradient<'_>,
) -> BackdropResult<()> {
    if dst.len() != viewport.area() * 4 {
        return Err(BackdropError::render(
            "over_radial_disc expects dst matching width*height*4",
        ));
    }
    let r = gradient.radius;
    if !(r.is_finite() && r > 0.0) || viewport.is_empty() {
        return Ok(());
    }

    let c = gradient.center;
    let x0 = (c.x - r).floor().max(0.0) as usize;
    let y0 = (c.y - r).floor().max(0.0) as usize;
    let x1 = ((c.x + r).ceil().max(0.0) as usize).min(viewport.width as usize);
    let y1 = ((c.y + r).ceil().max(0.0) as usize).min(viewport.height as usize);

    let w = viewport.width as usize;
    for y in y0..y1 {
        let dy = y as f64 + 0.5 - c.y;
        for x in x0..x1 {
            let dx = x as f64 + 0.5 - c.x;
            let d = dx.hypot(dy);
            if d > r {
                continue;
            }
            let src = gradient.sample_u8(d);
            if src[3] == 0 {
                continue;
            }
            let i = (y * w + x) * 4;
            let out = over([dst[i], dst[i + 1], dst[i + 2], dst[i + 3]], src, 1.0);
            dst[i..i + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/gradient.rs"]
mod tests;
