//! Document discovery and selection

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::utils::error::{AnalyzerError, Result};

/// Extension of the documents picked up from directories
pub const DOCUMENT_EXTENSION: &str = "md";

/// Expand input paths into the sorted document list
///
/// A file is taken as-is. A directory contributes the Markdown files directly
/// inside it; subdirectories are not descended into.
pub async fn discover_documents(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for input in inputs {
        let metadata = tokio::fs::metadata(input).await.map_err(|e| {
            AnalyzerError::invalid_input(format!("Cannot access {}: {}", input.display(), e))
        })?;

        if metadata.is_dir() {
            let mut entries = tokio::fs::read_dir(input).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_file() && is_document(&path) {
                    documents.push(path);
                }
            }
        } else {
            documents.push(input.clone());
        }
    }

    documents.sort();
    documents.dedup();
    debug!("Discovered {} documents", documents.len());
    Ok(documents)
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
}

/// Pick documents by 0-based index; no indices selects all of them
pub fn select_documents(documents: &[PathBuf], indices: &[usize]) -> Result<Vec<PathBuf>> {
    if documents.is_empty() {
        return Err(AnalyzerError::invalid_input("No documents found to process"));
    }
    if indices.is_empty() {
        return Ok(documents.to_vec());
    }

    indices
        .iter()
        .map(|&index| {
            documents.get(index).cloned().ok_or_else(|| {
                AnalyzerError::invalid_input(format!(
                    "Invalid file index {}; valid range is 0 to {}",
                    index,
                    documents.len() - 1
                ))
            })
        })
        .collect()
}

/// Final path component, used to label results
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
