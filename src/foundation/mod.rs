/// Frame geometry, frame rate, and direction primitives.
pub mod core;
/// Colour values and the named palette.
pub mod color;
/// Error type shared by every layer.
pub mod error;
/// Small numeric helpers behind the illustrative values in scenes.
pub mod math;
