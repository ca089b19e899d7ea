use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading or interpreting stack documents.
///
/// `RootNotFound` is fatal for a run. `NotFound` and `Malformed` are fatal
/// for the affected stack only; `UnresolvedReference` merely drops the
/// statement resource that carried the reference.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("stack root {} does not exist or cannot be listed", .path.display())]
    RootNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document {} not found", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document {} is malformed: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("stack {stack}: Ref {reference} has no deployed parameter value or physical id")]
    UnresolvedReference { stack: String, reference: String },
}

impl DocumentError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors that only drop one statement resource.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnresolvedReference { .. })
    }
}

/// Read and parse a JSON document, mapping failures onto the taxonomy above.
pub fn read_json<T: serde::de::DeserializeOwned>(
    path: &std::path::Path,
) -> Result<T, DocumentError> {
    let content = std::fs::read_to_string(path).map_err(|source| DocumentError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| DocumentError::malformed(path, e.to_string()))
}
