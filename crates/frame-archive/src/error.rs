//! Error types for frame archive access.

use frame_common::FrameError;
use thiserror::Error;

/// Errors that can occur while opening, reading or writing a frame archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Failed to open the archive.
    #[error("failed to open archive: {0}")]
    OpenFailed(String),

    /// Failed to read frames from the archive.
    #[error("failed to read frames: {0}")]
    ReadFailed(String),

    /// Failed to write frames to the archive.
    #[error("failed to write frames: {0}")]
    WriteFailed(String),

    /// The named frame dataset does not exist.
    #[error("dataset '{0}' not found in archive")]
    MissingDataset(String),

    /// The frame dataset is not a stack of 2D arrays.
    #[error("dataset '{name}' has shape {shape:?}, expected (frames, rows, cols)")]
    InvalidLayout { name: String, shape: Vec<usize> },

    /// A stored value does not fit the frame value type.
    #[error("value {0} does not fit in a 32-bit frame")]
    ValueOutOfRange(String),

    /// Storage/IO error.
    #[error("storage error: {0}")]
    StorageError(String),
}

impl ArchiveError {
    pub fn open_failed(msg: impl Into<String>) -> Self {
        Self::OpenFailed(msg.into())
    }

    pub fn read_failed(msg: impl Into<String>) -> Self {
        Self::ReadFailed(msg.into())
    }

    pub fn write_failed(msg: impl Into<String>) -> Self {
        Self::WriteFailed(msg.into())
    }
}

impl From<std::io::Error> for ArchiveError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<ArchiveError> for FrameError {
    fn from(err: ArchiveError) -> Self {
        FrameError::ArchiveAccess(err.to_string())
    }
}

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;
