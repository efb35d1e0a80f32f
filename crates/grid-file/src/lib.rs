//! Structured grid files for cell-centred frame data.
//!
//! A `(H, W)` frame is written as a uniform grid of `(H + 1, W + 1, 1)`
//! points with the frame attached as a single cell channel. Two ASCII
//! encodings are supported, chosen by extension:
//!
//! - `.vti`: VTK XML ImageData with inline `format="ascii"` arrays
//! - `.vtk`: legacy VTK `STRUCTURED_POINTS`
//!
//! # Example
//!
//! ```no_run
//! use frame_common::{Frame, ORIGIN, SPACING};
//! use grid_file::{read_grid_file, write_grid_file};
//!
//! let frame = Frame::filled(100, 100, 1);
//! write_grid_file(&frame, "frame.0.vti", SPACING, ORIGIN)?;
//! let grid = read_grid_file("frame.0.vti")?;
//! assert_eq!(grid.to_frame("Spin")?, frame);
//! # Ok::<(), grid_file::GridFileError>(())
//! ```

pub mod error;
pub mod format;
pub mod legacy;
pub mod model;
pub mod writer;
pub mod xml;

pub use error::{GridFileError, Result};
pub use format::GridFileFormat;
pub use model::{ArrayValues, DataArray, GridFile};
pub use writer::{read_grid_file, write_grid, write_grid_file, write_volume_grid_file, GridWriter};
