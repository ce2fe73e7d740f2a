//! The explainer scenes, each a builder over a default palette.

pub mod attention;
pub mod auto_regression;
pub mod common;
pub mod multi_head;
pub mod rnn_limitations;
pub mod token_embedding;
pub mod training_pipeline;

use crate::{foundation::error::SceneResult, scene::dsl::Scene};

/// A catalogued scene: stable name, human title, and builder with the default palette.
#[derive(Clone, Copy)]
pub struct SceneEntry {
    /// Stable name used on the command line.
    pub name: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// Builds the scene with its default palette.
    pub build: fn() -> SceneResult<Scene>,
}

impl std::fmt::Debug for SceneEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneEntry")
            .field("name", &self.name)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

static CATALOG: [SceneEntry; 6] = [
    SceneEntry {
        name: attention::NAME,
        title: "Self-attention, step by step",
        build: || attention::build(&attention::Palette::default()),
    },
    SceneEntry {
        name: auto_regression::NAME,
        title: "Repeated words in an autoregressive chain",
        build: || auto_regression::build(&auto_regression::Palette::default()),
    },
    SceneEntry {
        name: multi_head::NAME,
        title: "Multi-head attention",
        build: || multi_head::build(&multi_head::Palette::default()),
    },
    SceneEntry {
        name: rnn_limitations::NAME,
        title: "Limitations of RNNs",
        build: || rnn_limitations::build(&rnn_limitations::Palette::default()),
    },
    SceneEntry {
        name: token_embedding::NAME,
        title: "The journey of a token",
        build: || token_embedding::build(&token_embedding::Palette::default()),
    },
    SceneEntry {
        name: training_pipeline::NAME,
        title: "LLM training pipeline",
        build: || training_pipeline::build(&training_pipeline::Palette::default()),
    },
];

/// Every scene, sorted by name.
pub fn catalog() -> &'static [SceneEntry] {
    &CATALOG
}

/// Entry named `name`.
pub fn find(name: &str) -> Option<&'static SceneEntry> {
    CATALOG.iter().find(|e| e.name == name)
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/catalog.rs"]
mod tests;
