/// Convenience result type used across mlreel.
pub type SceneResult<T> = Result<T, SceneError>;

/// Top-level error taxonomy.
///
/// Everything here is a developer-time failure: scenes are scripts, and a bad script is fixed
/// by editing it, not by handling the error at runtime.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Invalid configuration or builder input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A layout pattern could not place the requested items.
    #[error("layout error: {0}")]
    Layout(String),

    /// Malformed timeline: unknown ids, conflicting actions, bad durations.
    #[error("authoring error: {0}")]
    Authoring(String),

    /// Failures while converting or rasterizing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Failures while writing frames to an output sink.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SceneError {
    /// Build a [`SceneError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SceneError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`SceneError::Authoring`] value.
    pub fn authoring(msg: impl Into<String>) -> Self {
        Self::Authoring(msg.into())
    }

    /// Build a [`SceneError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SceneError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SceneError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
