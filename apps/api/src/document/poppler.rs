use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::process::Command;
use tracing::debug;

use super::{DocumentConverter, DocumentError, DocumentRepresentation, DocumentSource, JPEG_MIME};

const OUTPUT_PREFIX: &str = "page";

/// Rasterizes the first page of a PDF to JPEG by shelling out to poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PopplerConverter {
    binary: PathBuf,
    dpi: u32,
}

impl PopplerConverter {
    pub fn new(binary: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            binary: binary.into(),
            dpi,
        }
    }

    fn args(&self, input: &std::path::Path, output_prefix: &std::path::Path) -> Vec<String> {
        vec![
            "-jpeg".to_string(),
            "-r".to_string(),
            self.dpi.to_string(),
            "-f".to_string(),
            "1".to_string(),
            "-l".to_string(),
            "1".to_string(),
            "-singlefile".to_string(),
            input.display().to_string(),
            output_prefix.display().to_string(),
        ]
    }
}

#[async_trait]
impl DocumentConverter for PopplerConverter {
    async fn convert(
        &self,
        source: &DocumentSource,
    ) -> Result<DocumentRepresentation, DocumentError> {
        let workdir = tempfile::tempdir()?;

        let input = match source {
            DocumentSource::Path(path) => path.clone(),
            DocumentSource::Bytes { data, .. } => {
                let path = workdir.path().join("input.pdf");
                tokio::fs::write(&path, data).await?;
                path
            }
        };
        let output_prefix = workdir.path().join(OUTPUT_PREFIX);

        let output = Command::new(&self.binary)
            .args(self.args(&input, &output_prefix))
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if is_empty_document(&stderr) {
                return Err(DocumentError::NoPages(source.name()));
            }
            return Err(DocumentError::Rasterize {
                status: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        let jpeg_path = output_prefix.with_extension("jpg");
        let data = match tokio::fs::read(&jpeg_path).await {
            Ok(data) if !data.is_empty() => data,
            Ok(_) => return Err(DocumentError::NoPages(source.name())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DocumentError::NoPages(source.name()))
            }
            Err(e) => return Err(e.into()),
        };

        debug!(
            "Rasterized first page of {} ({} bytes at {} dpi)",
            source.name(),
            data.len(),
            self.dpi
        );

        Ok(DocumentRepresentation::Image {
            mime_type: JPEG_MIME.to_string(),
            data: Bytes::from(data),
        })
    }
}

/// pdftoppm reports a zero-page document as an impossible page range.
fn is_empty_document(stderr: &str) -> bool {
    stderr.contains("Wrong page range")
}
