use async_trait::async_trait;
use tracing::debug;

use super::{DocumentConverter, DocumentError, DocumentRepresentation, DocumentSource};

/// Extracts the text layer of a PDF with `pdf-extract`.
/// Used where poppler is not installed; scanned resumes yield nothing.
#[derive(Debug, Clone, Default)]
pub struct TextConverter;

#[async_trait]
impl DocumentConverter for TextConverter {
    async fn convert(
        &self,
        source: &DocumentSource,
    ) -> Result<DocumentRepresentation, DocumentError> {
        let data = source.read().await?;

        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| DocumentError::Extract(e.to_string()))?
        .map_err(DocumentError::Extract)?;

        let text = normalize(&text);
        if text.is_empty() {
            return Err(DocumentError::NoPages(source.name()));
        }

        debug!("Extracted {} chars from {}", text.len(), source.name());
        Ok(DocumentRepresentation::Text(text))
    }
}

/// Collapses runs of blank lines and trailing spaces left by PDF layout.
fn normalize(text: &str) -> String {
    let mut out = Vec::new();
    let mut blank = false;
    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            if !blank && !out.is_empty() {
                out.push("");
            }
            blank = true;
        } else {
            out.push(line);
            blank = false;
        }
    }
    while out.last() == Some(&"") {
        out.pop();
    }
    out.join("\n")
}
