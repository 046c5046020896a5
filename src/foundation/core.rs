use crate::foundation::error::{BackdropError, BackdropResult};

pub use kurbo::{Point, Rect};

/// Monotonic frame counter driving every periodic term of the animation.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Counter value as `f64`, the unit used by the projection formulas.
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// The next frame (saturating).
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Display refresh rate, used for pacing and encoding only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator, must be > 0.
    pub den: u32,
}

impl Fps {
    /// Build a validated rate.
    pub fn new(num: u32, den: u32) -> BackdropResult<Self> {
        if den == 0 {
            return Err(BackdropError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(BackdropError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as `f64`.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }
}

/// Current size of the drawing area in pixels.
///
/// A viewport may be empty (a minimized host window); renderers skip such frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Build a viewport from raw dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `true` when either side is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width as `f64`.
    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`.
    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    /// `min(vw, vh)`, the reference length for orbit radii and the glow.
    pub fn min_dim(self) -> f64 {
        self.width_f64().min(self.height_f64())
    }

    /// Screen-space center `(vw/2, vh/2)`.
    pub fn center(self) -> Point {
        Point::new(self.width_f64() * 0.5, self.height_f64() * 0.5)
    }

    /// Number of pixels covered.
    pub fn area(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Viewport {
    type Err = BackdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| BackdropError::validation(format!("viewport '{s}' is not WxH")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| BackdropError::validation(format!("viewport '{s}': {e}")))
        };
        Ok(Self::new(parse(w)?, parse(h)?))
    }
}

/// Straight-alpha color with a fractional alpha, as CSS `rgba()` spells it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StraightColor {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha in `[0, 1]`.
    pub alpha: f64,
}

impl StraightColor {
    /// Build a color from `rgba(r, g, b, alpha)` components.
    pub const fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self { r, g, b, alpha }
    }

    /// Same color with alpha multiplied by `k` (clamped to `[0, 1]`).
    pub fn with_alpha_scaled(self, k: f64) -> Self {
        Self {
            alpha: crate::foundation::math::clamp01(self.alpha * k),
            ..self
        }
    }

    /// Alpha quantized to 8 bits.
    pub fn alpha_u8(self) -> u8 {
        (crate::foundation::math::clamp01(self.alpha) * 255.0).round() as u8
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
