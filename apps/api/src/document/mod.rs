//! Document-to-representation collaborator.
//!
//! Turns a resume document (uploaded bytes or a file on disk) into something
//! the model can consume. Only the first page is ever used.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod discovery;
pub mod poppler;
pub mod text;

pub use discovery::{discover_resumes, DiscoveryError};
pub use poppler::PopplerConverter;
pub use text::TextConverter;

pub const JPEG_MIME: &str = "image/jpeg";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("No resume document was supplied")]
    MissingInput,

    #[error("Document {0} has no renderable pages")]
    NoPages(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdftoppm exited with status {status}: {stderr}")]
    Rasterize { status: i32, stderr: String },

    #[error("Text extraction failed: {0}")]
    Extract(String),
}

/// Where a resume document comes from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// An uploaded file held in memory.
    Bytes { name: String, data: Bytes },
    /// A file discovered on disk.
    Path(PathBuf),
}

impl DocumentSource {
    /// Display name used in logs and reports.
    pub fn name(&self) -> String {
        match self {
            DocumentSource::Bytes { name, .. } => name.clone(),
            DocumentSource::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    pub(crate) async fn read(&self) -> Result<Bytes, DocumentError> {
        match self {
            DocumentSource::Bytes { data, .. } => Ok(data.clone()),
            DocumentSource::Path(path) => Ok(Bytes::from(tokio::fs::read(path).await?)),
        }
    }
}

/// Model-consumable form of the first page of a resume.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentRepresentation {
    Image { mime_type: String, data: Bytes },
    Text(String),
}

/// Converts a document into its model-consumable representation.
///
/// Held in `AppState` as `Arc<dyn DocumentConverter>`.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert(&self, source: &DocumentSource)
        -> Result<DocumentRepresentation, DocumentError>;
}

/// Runs `converter` over `source`, signalling `MissingInput` when there is nothing to convert.
pub async fn prepare(
    converter: &dyn DocumentConverter,
    source: Option<&DocumentSource>,
) -> Result<DocumentRepresentation, DocumentError> {
    let source = source.ok_or(DocumentError::MissingInput)?;
    converter.convert(source).await
}
