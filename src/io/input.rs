use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use indexmap::IndexMap;

/// A document's text and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    /// Text with LF line endings
    pub text: String,
    /// Provenance entries carried into the transcript unchanged
    pub source_locations: IndexMap<String, String>,
}

/// Read a normalized hearing text file
pub fn read_source_file(path: &Path) -> Result<SourceDocument> {
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;

    let mut source_locations = IndexMap::new();
    source_locations.insert(
        "text_file_location".to_string(),
        path.display().to_string(),
    );
    source_locations.insert("status".to_string(), "read text from file".to_string());
    source_locations.insert("parsed_at".to_string(), Utc::now().to_rfc3339());

    Ok(SourceDocument {
        text: raw.replace("\r\n", "\n"),
        source_locations,
    })
}

/// List the `.txt` files in a directory, sorted by path
pub fn collect_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to read directory: {:?}", dir))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list directory: {:?}", dir))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
