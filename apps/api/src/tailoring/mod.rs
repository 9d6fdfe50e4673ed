pub mod content;
pub mod diff;
pub mod handlers;
pub mod improver;
pub mod keywords;
pub mod orchestrator;
pub mod prompts;
pub mod suggestions;

use thiserror::Error;

use crate::store::StoreError;

/// Failures of the tailoring pipeline. The diff engine and suggestion rules are total
/// and never produce one of these.
#[derive(Debug, Error)]
pub enum TailorError {
    #[error("Keyword extraction failed: {0}")]
    Extraction(String),

    /// The improver's output lacks a required top-level section, the usual sign of a
    /// truncated generation.
    #[error("Missing required section: {0}")]
    MissingSection(String),

    #[error("Improved resume is malformed: {0}")]
    MalformedResume(String),

    #[error("Resume improvement failed: {0}")]
    Improvement(String),

    #[error("Content generation failed: {0}")]
    Generation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
