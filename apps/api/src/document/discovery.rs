use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Directory {0} does not exist")]
    DirectoryNotFound(PathBuf),

    #[error("No PDF files found in {0}")]
    NoInputsFound(PathBuf),

    #[error("Failed to read directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Lists the `.pdf` files directly inside `dir`, sorted by file name.
pub async fn discover_resumes(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {}
        _ => return Err(DiscoveryError::DirectoryNotFound(dir.to_path_buf())),
    }

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_pdf(&path) && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(DiscoveryError::NoInputsFound(dir.to_path_buf()));
    }

    files.sort();
    debug!("Discovered {} resume(s) in {}", files.len(), dir.display());
    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
