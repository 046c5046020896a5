//! Output sinks for rendered frames.

/// Generic frame sink trait and built-in sinks.
pub mod sink;
