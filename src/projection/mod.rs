/// Pure pillar, particle and glow projection.
pub mod engine;
