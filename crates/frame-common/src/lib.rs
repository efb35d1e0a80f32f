//! Common types shared across the lattice frame export workspace.

pub mod error;
pub mod extent;
pub mod frame;
pub mod geometry;

pub use error::{FrameError, FrameResult};
pub use extent::{
    expected_cell_shape, validate_shape, CELL_DATA, DEFAULT_DATASET, EXTENT_SIZE_2D,
    EXTENT_SIZE_3D, ORIGIN, SPACING,
};
pub use frame::{Frame, Volume};
pub use geometry::{GridConventions, GridGeometry};
