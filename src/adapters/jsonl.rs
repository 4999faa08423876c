use std::path::Path;

use serde::de::DeserializeOwned;

use crate::core::errors::{FeedError, Result};

/// Parse JSON-lines content: one JSON object per line, blank lines ignored.
///
/// `path` is only used to name the file in errors.
pub fn parse<T: DeserializeOwned>(path: &Path, content: &str) -> Result<Vec<T>> {
    let mut records = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record = serde_json::from_str(trimmed).map_err(|e| FeedError::StoreError {
            path: path.to_path_buf(),
            detail: format!("malformed record at line {}: {e}", line_num + 1),
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Read and parse a JSON-lines file. A missing file is an empty collection.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(path, &content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(FeedError::StoreError {
            path: path.to_path_buf(),
            detail: e.to_string(),
        }),
    }
}
