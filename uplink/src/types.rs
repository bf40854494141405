//! Opaque identifier types for entities owned by the remote storage service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle of a folder in the remote service.
///
/// The relay never interprets the contents; it only threads handles back into
/// subsequent API calls within the same request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(String);

impl FolderId {
    /// The well-known sentinel for the top-level container with no parent.
    pub fn root() -> Self {
        FolderId("root".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FolderId {
    fn from(id: String) -> Self {
        FolderId(id)
    }
}

impl From<&str> for FolderId {
    fn from(id: &str) -> Self {
        FolderId(id.to_string())
    }
}

/// Opaque handle of a file object in the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FileId {
    fn from(id: String) -> Self {
        FileId(id)
    }
}

impl From<&str> for FileId {
    fn from(id: &str) -> Self {
        FileId(id.to_string())
    }
}
