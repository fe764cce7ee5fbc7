// Resume screening: percentage extraction, bucketing, and report orchestration.
// All model calls go through llm_client and all document handling through document.

pub mod bucketer;
pub mod charts;
pub mod extractor;
pub mod handlers;
pub mod prompts;
pub mod reporter;

use std::path::PathBuf;

use thiserror::Error;

use crate::document::{DiscoveryError, DocumentError};
use crate::llm_client::LlmError;

#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error("Please upload the resume")]
    MissingInput,

    #[error("Directory {} does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("{0}")]
    NoInputsFound(String),

    #[error("Document conversion failed: {0}")]
    Document(DocumentError),

    #[error("Text generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("Failed to list resumes: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DocumentError> for ScreeningError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::MissingInput => ScreeningError::MissingInput,
            other => ScreeningError::Document(other),
        }
    }
}

impl From<DiscoveryError> for ScreeningError {
    fn from(err: DiscoveryError) -> Self {
        match err {
            DiscoveryError::DirectoryNotFound(path) => ScreeningError::DirectoryNotFound(path),
            DiscoveryError::NoInputsFound(_) => {
                ScreeningError::NoInputsFound("No PDF files found in the directory".to_string())
            }
            DiscoveryError::Io(e) => ScreeningError::Io(e),
        }
    }
}
