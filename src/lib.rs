//! mlreel builds short animated explainers for machine-learning concepts.
//!
//! A scene is authored with a [`SceneBuilder`]: visual items, connections and groups first,
//! then a queue of [`TimelineStep`]s. Playing a [`Scene`] drives a [`Renderer`]:
//!
//! - [`RecordingRenderer`] keeps an event log (tests, `mlreel dump`)
//! - [`FrameRenderer`] samples every step at a fixed rate, rasterizes through SVG, and pushes
//!   frames into a [`FrameSink`] (memory, PNG sequence, or `ffmpeg`)
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Easing curves.
pub mod animation;
/// Render configuration.
pub mod config;
pub mod encode;
/// Geometry, colour, errors and numeric helpers.
pub mod foundation;
pub mod layout;
pub mod render;
pub mod scene;
pub mod scenes;
pub mod timeline;

pub use crate::animation::ease::Ease;
pub use crate::config::{OutputFormat, RenderConfig};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::foundation::color::Color;
pub use crate::foundation::core::{Direction, Fps, FrameSpec, Point, Rect, Vec2};
pub use crate::foundation::error::{SceneError, SceneResult};
pub use crate::layout::pattern::{LayoutFrame, LayoutPattern, layout};
pub use crate::render::backend::{FrameRGBA, Renderer};
pub use crate::render::pipeline::{FrameRenderer, render_scene, render_still, render_to_path};
pub use crate::render::record::{RecordingRenderer, RenderEvent};
pub use crate::scene::dsl::{Scene, SceneBuilder};
pub use crate::scene::model::{Connection, SceneGraph, VisualItem};
pub use crate::timeline::sequencer::PlaybackReport;
pub use crate::timeline::step::{Action, TimelineStep};
