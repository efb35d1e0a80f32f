//! Error types for rendering.

use frame_common::FrameError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    /// Input frame rejected by validation (shape against the expected extent)
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Grid cannot be drawn (empty, non-planar, missing scalars)
    #[error("invalid render input: {0}")]
    InvalidInput(String),

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<RenderError> for FrameError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Frame(e) => e,
            RenderError::Io(e) => FrameError::Io(e),
            other => FrameError::Render(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
