//! Placement in scene units.
//!
//! `pattern` spreads a run of items over a frame; `place` positions one box relative to another.

/// Patterns that place a run of items and the descriptor syntax that names them.
pub mod pattern;
/// Relative placement of single boxes.
pub mod place;
