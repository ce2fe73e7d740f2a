/// Rate functions applied to step progress.
pub mod ease;
