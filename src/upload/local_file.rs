//! Handle for a user-selected local file.

use crate::registry::DEFAULT_MIME_TYPE;
use crate::error::ApiError;
use std::path::Path;

/// What the simulator needs to know about a selected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub size_bytes: u64,
    /// Declared content type; may be empty
    pub content_type: String,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, size_bytes: u64, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            content_type: content_type.into(),
        }
    }

    /// Describe a regular file on disk. The content type is guessed from the
    /// extension with `mime_guess` and left empty when unknown.
    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            ApiError::NotFound(format!("Cannot read {}: {}", path.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(ApiError::NotFound(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            size_bytes: metadata.len(),
            content_type: guess_content_type(path).to_string(),
        })
    }

    /// Declared content type, or the generic fallback when none was declared
    pub fn effective_mime_type(&self) -> &str {
        if self.content_type.trim().is_empty() {
            DEFAULT_MIME_TYPE
        } else {
            &self.content_type
        }
    }
}

fn guess_content_type(path: &Path) -> &'static str {
    mime_guess::from_path(path).first_raw().unwrap_or("")
}
