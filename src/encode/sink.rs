use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{BackdropError, BackdropResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] when a view starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Width of the first frame in pixels.
    pub width: u32,
    /// Height of the first frame in pixels.
    pub height: u32,
    /// Nominal display rate.
    pub fps: Fps,
}

/// Consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called with strictly increasing `FrameIndex`. Frame sizes
/// follow the viewport and may change between frames; sinks that need a fixed size reject the
/// mismatch.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> BackdropResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BackdropResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> BackdropResult<()>;
}

/// Shared handle, so the caller can inspect a sink that a view owns a clone of.
impl<S: FrameSink + ?Sized> FrameSink for Rc<RefCell<S>> {
    fn begin(&mut self, cfg: SinkConfig) -> BackdropResult<()> {
        self.borrow_mut().begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BackdropResult<()> {
        self.borrow_mut().push_frame(idx, frame)
    }

    fn end(&mut self) -> BackdropResult<()> {
        self.borrow_mut().end()
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Take the captured frames out of the sink.
    pub fn into_frames(self) -> Vec<(FrameIndex, FrameRGBA)> {
        self.frames
    }

    /// `true` once `end` was called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> BackdropResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BackdropResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> BackdropResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes every frame as `frame_NNNNNN.png` into a directory.
///
/// Files carry straight alpha, as PNG expects.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    started: bool,
    written: usize,
}

impl PngSequenceSink {
    /// Sink writing into `dir` (created on `begin`).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            started: false,
            written: 0,
        }
    }

    /// Path of the file written for `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", idx.0))
    }

    /// Number of files written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, _cfg: SinkConfig) -> BackdropResult<()> {
        ensure_dir(&self.dir)?;
        self.started = true;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BackdropResult<()> {
        if !self.started {
            return Err(BackdropError::encode("png sink not started"));
        }
        let path = self.frame_path(idx);
        write_png(&path, frame)?;
        self.written += 1;
        tracing::trace!(path = %path.display(), "wrote frame");
        Ok(())
    }

    fn end(&mut self) -> BackdropResult<()> {
        self.started = false;
        tracing::debug!(dir = %self.dir.display(), frames = self.written, "png sequence done");
        Ok(())
    }
}

/// Write one frame as a PNG file, converting premultiplied data to straight alpha.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> BackdropResult<()> {
    let mut straight = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_in_place(&mut straight);
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, straight)
        .ok_or_else(|| BackdropError::encode("invalid rgba buffer size"))?;
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| BackdropError::encode(format!("write png '{}': {e}", path.display())))
}

/// Convert premultiplied RGBA8 to straight alpha in place.
pub fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Ensure `dir` exists.
pub fn ensure_dir(dir: &Path) -> BackdropResult<()> {
    use anyhow::Context as _;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
