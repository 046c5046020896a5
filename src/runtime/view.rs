//! The mounted background: scene, compositor and surface wired to a scheduler registration.

use std::cell::RefCell;
use std::rc::Rc;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex, Viewport};
use crate::foundation::error::{BackdropError, BackdropResult};
use crate::render::backend::{FrameRGBA, FrameSurface, SurfaceProvider};
use crate::render::compositor::{Compositor, FrameStats};
use crate::runtime::scheduler::{FrameScheduler, FrameToken};
use crate::runtime::viewport::ViewportWatcher;
use crate::scene::config::SceneConfig;
use crate::scene::model::SceneState;

/// Mixed into the scene seed to derive the independent sparkle stream.
const SPARKLE_STREAM: u64 = 0xA076_1D64_78BD_642F;

/// Where rendered frames go besides the owned surface.
pub struct FrameOutput {
    /// Consumer of every rendered frame.
    pub sink: Box<dyn FrameSink>,
    /// Nominal display rate reported to the sink.
    pub fps: Fps,
}

impl std::fmt::Debug for FrameOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameOutput")
            .field("fps", &self.fps)
            .finish_non_exhaustive()
    }
}

/// Frame counters of one mount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MountStats {
    /// Frames fully rendered onto the surface.
    pub frames_rendered: u64,
    /// Scheduler invocations that produced no frame (empty viewport, render error).
    pub frames_skipped: u64,
}

struct ViewState {
    scene: SceneState,
    compositor: Compositor,
    surface: FrameSurface,
    watcher: ViewportWatcher,
    sink: Option<Box<dyn FrameSink>>,
    stats: MountStats,
    last: Option<(FrameIndex, FrameStats)>,
    first_error: Option<BackdropError>,
}

impl ViewState {
    fn on_frame(&mut self, t: FrameIndex) {
        // Motion keeps its pace while nothing can be drawn.
        self.scene.advance();

        let viewport = self.watcher.current();
        match self.surface.resize(viewport) {
            Ok(true) => tracing::debug!(%viewport, "surface reallocated"),
            Ok(false) => {}
            Err(e) => {
                tracing::trace!(t = t.0, error = %e, "frame skipped");
                self.stats.frames_skipped += 1;
                return;
            }
        }

        let stats = match self
            .compositor
            .render(&self.scene, viewport, t, &mut self.surface)
        {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(t = t.0, error = %e, "frame render failed; skipped");
                self.stats.frames_skipped += 1;
                self.record(e);
                return;
            }
        };
        self.stats.frames_rendered += 1;
        self.last = Some((t, stats));
        tracing::trace!(
            t = t.0,
            pillars = stats.pillars_drawn,
            culled = stats.pillars_culled,
            sparkles = stats.sparkles,
            "frame rendered"
        );

        if let Some(sink) = self.sink.as_mut()
            && let Err(e) = sink.push_frame(t, &self.surface.to_frame())
        {
            tracing::warn!(t = t.0, error = %e, "frame sink failed; detaching it");
            self.sink = None;
            self.record(e);
        }
    }

    fn record(&mut self, e: BackdropError) {
        if self.first_error.is_none() {
            self.first_error = Some(e);
        }
    }
}

/// A background mounted on a host surface.
///
/// Dropping the view without [`BackdropView::unmount`] still cancels its registration; the
/// scheduler discards it on the next tick.
pub struct BackdropView {
    token: FrameToken,
    seed: u64,
    state: Rc<RefCell<ViewState>>,
}

impl std::fmt::Debug for BackdropView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackdropView")
            .field("token", &self.token)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl BackdropView {
    /// Generate the scene, acquire a surface and start the per-frame callback.
    ///
    /// Returns `Ok(None)` without registering anything when `provider` cannot supply a surface
    /// for the current viewport. Errors are reserved for an invalid `config` or an output sink
    /// that fails to start.
    #[tracing::instrument(skip_all, fields(viewport = %watcher.current()))]
    pub fn mount(
        scheduler: &mut FrameScheduler,
        provider: &mut dyn SurfaceProvider,
        watcher: &ViewportWatcher,
        config: &SceneConfig,
        output: Option<FrameOutput>,
    ) -> BackdropResult<Option<Self>> {
        config.validate()?;

        let viewport = watcher.current();
        let surface = match provider.acquire(viewport) {
            Ok(surface) => surface,
            Err(e) => {
                tracing::debug!(error = %e, "no drawing surface; backdrop not started");
                return Ok(None);
            }
        };

        let seed = config.resolve_seed();
        let scene = SceneState::generate(config, seed);

        let sink = match output {
            Some(FrameOutput { mut sink, fps }) => {
                sink.begin(SinkConfig {
                    width: viewport.width,
                    height: viewport.height,
                    fps,
                })?;
                Some(sink)
            }
            None => None,
        };

        let state = Rc::new(RefCell::new(ViewState {
            scene,
            compositor: Compositor::new(config.sparkle_probability, seed ^ SPARKLE_STREAM),
            surface,
            watcher: watcher.clone(),
            sink,
            stats: MountStats::default(),
            last: None,
            first_error: None,
        }));

        let frame_state = Rc::clone(&state);
        let token = scheduler.start(move |t| frame_state.borrow_mut().on_frame(t));
        tracing::debug!(seed, id = token.id(), "backdrop mounted");

        Ok(Some(Self { token, seed, state }))
    }

    /// Stop the callback, finish the sink and release the scene.
    ///
    /// Reports the first per-frame error, if any frame failed.
    pub fn unmount(self, scheduler: &mut FrameScheduler) -> BackdropResult<MountStats> {
        scheduler.stop(&self.token);

        let mut st = self.state.borrow_mut();
        let end = match st.sink.as_mut() {
            Some(sink) => sink.end(),
            None => Ok(()),
        };
        st.sink = None;
        let stats = st.stats;
        tracing::debug!(
            rendered = stats.frames_rendered,
            skipped = stats.frames_skipped,
            "backdrop unmounted"
        );
        if let Some(e) = st.first_error.take() {
            return Err(e);
        }
        end?;
        Ok(stats)
    }

    /// Scheduler registration of this view.
    pub fn token(&self) -> &FrameToken {
        &self.token
    }

    /// Seed the scene was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Counters so far.
    pub fn stats(&self) -> MountStats {
        self.state.borrow().stats
    }

    /// Frame counter and draw counters of the most recent rendered frame.
    pub fn last_frame(&self) -> Option<(FrameIndex, FrameStats)> {
        self.state.borrow().last
    }

    /// Current surface size.
    pub fn surface_viewport(&self) -> Viewport {
        self.state.borrow().surface.viewport()
    }

    /// Copy of the surface pixels.
    pub fn frame(&self) -> FrameRGBA {
        self.state.borrow().surface.to_frame()
    }

    /// Copy of the live scene (particle angles included).
    pub fn scene(&self) -> SceneState {
        self.state.borrow().scene.clone()
    }
}

impl Drop for BackdropView {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Mount on an in-memory surface, run `count` refreshes and return every rendered frame.
///
/// Headless shortcut over [`FrameScheduler`] + [`BackdropView`]; the viewport stays fixed.
pub fn render_frames(
    config: &SceneConfig,
    viewport: Viewport,
    count: u64,
) -> BackdropResult<Vec<FrameRGBA>> {
    let mut scheduler = FrameScheduler::new();
    let watcher = ViewportWatcher::new(viewport);
    let sink = Rc::new(RefCell::new(crate::encode::sink::InMemorySink::new()));
    let output = FrameOutput {
        sink: Box::new(Rc::clone(&sink)),
        fps: Fps::new(60, 1)?,
    };
    let view = BackdropView::mount(
        &mut scheduler,
        &mut crate::render::backend::CpuSurfaceProvider,
        &watcher,
        config,
        Some(output),
    )?
    .ok_or_else(|| BackdropError::surface(format!("no surface for viewport {viewport}")))?;

    for _ in 0..count {
        scheduler.tick();
    }
    view.unmount(&mut scheduler)?;

    let frames = sink
        .borrow()
        .frames()
        .iter()
        .map(|(_, f)| f.clone())
        .collect();
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/view.rs"]
mod tests;
