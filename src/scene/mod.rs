/// Mount-time configuration and sampling bounds.
pub mod config;
/// Pillars, particles and the scene that owns them.
pub mod model;
