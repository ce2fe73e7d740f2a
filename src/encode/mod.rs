//! Frame sinks.
//!
//! Sinks consume rasterized frames in timeline order.

/// `ffmpeg`-based MP4 output via the system binary.
pub mod ffmpeg;
/// Sink trait plus memory and PNG sequence sinks.
pub mod sink;
