//! Steps, per-step interpolation plans, and the sequencer that plays them.

/// Resolves one step against the scene into per-entity tweens.
pub mod plan;
/// Plays a timeline against a renderer.
pub mod sequencer;
/// Actions, steps and the timeline.
pub mod step;
