use crate::foundation::core::Viewport;
use crate::foundation::error::{BackdropError, BackdropResult};

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. The `premultiplied` flag is included to make this explicit
/// at API boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Premultiplied pixel at `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data
            .get(i..i + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}

/// Owned CPU drawing surface that tracks the viewport size.
pub struct FrameSurface {
    viewport: Viewport,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for FrameSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSurface")
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

impl FrameSurface {
    /// Allocate a transparent surface for `viewport`.
    ///
    /// Fails with [`BackdropError::Surface`] when the viewport is empty or larger than the
    /// rasterizer supports.
    pub fn new(viewport: Viewport) -> BackdropResult<Self> {
        let (w, h) = surface_dims(viewport)?;
        Ok(Self {
            viewport,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Current size.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Match a new viewport size. Returns `true` when the surface was reallocated.
    ///
    /// Like a canvas whose dimensions are reassigned, the old contents are discarded.
    pub fn resize(&mut self, viewport: Viewport) -> BackdropResult<bool> {
        if viewport == self.viewport {
            return Ok(false);
        }
        let (w, h) = surface_dims(viewport)?;
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        self.viewport = viewport;
        Ok(true)
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    /// Copy the current contents out as a frame.
    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.viewport.width,
            height: self.viewport.height,
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }
}

/// Source of drawing surfaces, i.e. the rendering context a host can hand out.
pub trait SurfaceProvider {
    /// Obtain a surface sized to `viewport`.
    fn acquire(&mut self, viewport: Viewport) -> BackdropResult<FrameSurface>;
}

/// Default provider: in-memory `vello_cpu` pixmaps.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuSurfaceProvider;

impl SurfaceProvider for CpuSurfaceProvider {
    fn acquire(&mut self, viewport: Viewport) -> BackdropResult<FrameSurface> {
        FrameSurface::new(viewport)
    }
}

pub(crate) fn surface_dims(viewport: Viewport) -> BackdropResult<(u16, u16)> {
    if viewport.is_empty() {
        return Err(BackdropError::surface(format!(
            "viewport {viewport} has no drawable area"
        )));
    }
    let w: u16 = viewport
        .width
        .try_into()
        .map_err(|_| BackdropError::surface("surface width exceeds u16"))?;
    let h: u16 = viewport
        .height
        .try_into()
        .map_err(|_| BackdropError::surface("surface height exceeds u16"))?;
    Ok((w, h))
}
