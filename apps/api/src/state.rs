use std::sync::Arc;

use crate::document::DocumentConverter;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Text-generation collaborator. `LlmClient` in production, stubs in tests.
    pub generator: Arc<dyn TextGenerator>,
    /// Document-to-representation collaborator, chosen by `RESUME_REPRESENTATION`.
    pub converter: Arc<dyn DocumentConverter>,
    pub max_upload_bytes: usize,
}
