//! Error types for paste handling
//!
//! Divergent clipboard shapes are never errors: they fall through to the next
//! resolution step or end as a no-op. These variants cover broken
//! collaborator contracts only.

use scribe_model::EditorError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasteError {
    #[error("Editor rejected the paste: {0}")]
    Editor(#[from] EditorError),

    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Deferred paste belongs to editor {expected}, not {actual}")]
    ForeignResumption { expected: String, actual: String },

    #[error("Selection moved while the paste was deferred")]
    SelectionMoved,

    #[error("No capture target is registered")]
    NoCaptureTarget,
}
