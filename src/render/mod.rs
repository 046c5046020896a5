/// Frame buffers, drawing surfaces and surface providers.
pub mod backend;
pub(crate) mod blur;
pub(crate) mod composite;
/// Layered per-frame drawing.
pub mod compositor;
pub(crate) mod gradient;
