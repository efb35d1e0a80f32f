//! Error types for grid-file reading and writing.

use frame_common::FrameError;
use thiserror::Error;

/// Errors raised while writing or parsing a grid file.
#[derive(Error, Debug)]
pub enum GridFileError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed XML
    #[error("XML error: {0}")]
    Xml(String),

    /// Content that does not follow the grid-file grammar
    #[error("parse error: {0}")]
    Parse(String),

    /// Extension or encoding this crate does not handle
    #[error("unsupported grid format: {0}")]
    UnsupportedFormat(String),

    /// A data array whose length does not match the geometry
    #[error("array '{name}' holds {actual} values, geometry requires {expected}")]
    SizeMismatch {
        name: String,
        actual: usize,
        expected: usize,
    },

    /// A requested data array is absent
    #[error("missing data array: {0}")]
    MissingArray(String),
}

impl GridFileError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

impl From<quick_xml::Error> for GridFileError {
    fn from(err: quick_xml::Error) -> Self {
        GridFileError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for GridFileError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        GridFileError::Xml(err.to_string())
    }
}

impl From<GridFileError> for FrameError {
    fn from(err: GridFileError) -> Self {
        match err {
            GridFileError::Io(e) => FrameError::Io(e),
            GridFileError::UnsupportedFormat(f) => FrameError::UnsupportedFormat(f),
            other => FrameError::GridFormat(other.to_string()),
        }
    }
}

/// Result type for grid-file operations.
pub type Result<T> = std::result::Result<T, GridFileError>;
