//! Scene model and authoring surface.

/// Entities (items, connections, groups) and the graph that holds them.
pub mod model;
/// `SceneBuilder` and the finished `Scene`.
pub mod dsl;
