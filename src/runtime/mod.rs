/// Frame callback driver and pacing.
pub mod scheduler;
/// Mount/unmount wiring of scene, compositor and surface.
pub mod view;
/// Shared viewport size.
pub mod viewport;
