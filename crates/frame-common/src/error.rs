//! Error types for frame export operations.

use thiserror::Error;

/// Result type alias using FrameError.
pub type FrameResult<T> = Result<T, FrameError>;

/// Primary error type shared by the archive, grid-file and rendering crates.
#[derive(Debug, Error)]
pub enum FrameError {
    // === Validation Errors ===
    #[error("Array dimensions {actual:?} do not match the expected dimensions {expected:?}")]
    ShapeMismatch {
        actual: Vec<usize>,
        expected: Vec<usize>,
    },

    #[error("Could not determine experiment length: {0}")]
    UndeterminedLength(String),

    #[error("Experiment index {index} overflows the frame range for length {length}")]
    IndexOverflow { index: usize, length: usize },

    // === Archive Errors ===
    #[error("Archive access failed: {0}")]
    ArchiveAccess(String),

    // === Grid File Errors ===
    #[error("Invalid grid file: {0}")]
    GridFormat(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// Create a ShapeMismatch error from any pair of shapes.
    pub fn shape_mismatch(actual: impl Into<Vec<usize>>, expected: impl Into<Vec<usize>>) -> Self {
        Self::ShapeMismatch {
            actual: actual.into(),
            expected: expected.into(),
        }
    }

    /// Create an ArchiveAccess error.
    pub fn archive_access(msg: impl Into<String>) -> Self {
        Self::ArchiveAccess(msg.into())
    }

    /// Short, stable name of the error kind, used in batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            FrameError::ShapeMismatch { .. } => "ShapeMismatch",
            FrameError::UndeterminedLength(_) => "UndeterminedLength",
            FrameError::IndexOverflow { .. } => "IndexOverflow",
            FrameError::ArchiveAccess(_) => "ArchiveAccessFailure",
            FrameError::GridFormat(_) => "GridFormat",
            FrameError::UnsupportedFormat(_) => "UnsupportedFormat",
            FrameError::Render(_) => "Render",
            FrameError::Io(_) => "Io",
        }
    }
}

impl From<serde_json::Error> for FrameError {
    fn from(err: serde_json::Error) -> Self {
        FrameError::GridFormat(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message_carries_both_shapes() {
        let err = FrameError::shape_mismatch(vec![4, 5], vec![100, 100]);
        let msg = err.to_string();
        assert!(msg.contains("[4, 5]"));
        assert!(msg.contains("[100, 100]"));
        assert_eq!(err.kind(), "ShapeMismatch");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: FrameError = io.into();
        assert_eq!(err.kind(), "Io");
    }
}
