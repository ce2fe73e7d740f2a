//! Renderers driven by the sequencer.
//!
//! [`backend::Renderer`] is the seam. [`record::RecordingRenderer`] logs what it is asked to do;
//! [`pipeline::FrameRenderer`] samples steps at a frame rate and rasterizes them through SVG.

/// Renderer trait and frame buffer type.
pub mod backend;
/// CPU rasterization of SVG documents.
pub mod cpu;
/// Frame-rate sampling into a sink, plus one-shot helpers.
pub mod pipeline;
/// Event-log renderer.
pub mod record;
/// Scene graph to SVG conversion.
pub mod svg;
