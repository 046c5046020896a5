//! Backdrop is a procedural, depth-layered background animation rendered on the CPU.
//!
//! A fixed population of receding pillars and orbiting particles is projected with a simple
//! `k / depth` perspective every frame and painted far to near:
//!
//! - Generate a [`SceneState`] from a [`SceneConfig`]
//! - Mount a [`BackdropView`] on a [`FrameScheduler`], feeding viewport changes through a
//!   [`ViewportWatcher`]
//! - Tick the scheduler once per display refresh; frames land on the view's surface and,
//!   optionally, in a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Output sinks for rendered frames.
pub mod encode;
/// Perspective projection of scene entities.
pub mod projection;
/// Drawing surfaces and the per-frame compositor.
pub mod render;
/// Scheduling, viewport tracking and the mounted view.
pub mod runtime;
/// Scene configuration and entities.
pub mod scene;

pub use crate::foundation::core::{Fps, FrameIndex, Point, Rect, StraightColor, Viewport};
pub use crate::foundation::error::{BackdropError, BackdropResult};
pub use crate::foundation::math::{MIN_DEPTH, Rng64, clamp_depth};

pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig, write_png};
pub use crate::projection::engine::{
    ParticleProjection, PillarProjection, glow_radius, project_particle, project_pillar,
};
pub use crate::render::backend::{CpuSurfaceProvider, FrameRGBA, FrameSurface, SurfaceProvider};
pub use crate::render::compositor::{Compositor, FrameStats, painter_order};
pub use crate::runtime::scheduler::{FramePacer, FrameScheduler, FrameToken};
pub use crate::runtime::view::{BackdropView, FrameOutput, MountStats, render_frames};
pub use crate::runtime::viewport::ViewportWatcher;
pub use crate::scene::config::{Bounds, ParticleBounds, PillarBounds, SceneConfig};
pub use crate::scene::model::{Particle, Pillar, SceneState};
