//! Expected-extent constants and shape validation.
//!
//! Extents count grid *points*, including the zero index. Data arrays hold
//! one value per *cell*, so the cell shape an extent admits is `extent - 1`
//! along every axis.

use crate::error::{FrameError, FrameResult};

/// Total point dimensions of a 3D lattice volume.
pub const EXTENT_SIZE_3D: [usize; 3] = [101, 101, 51];

/// Total point dimensions expected for 2D rendering.
pub const EXTENT_SIZE_2D: [usize; 2] = [101, 101];

/// Default grid origin.
pub const ORIGIN: [f64; 3] = [0.0, 0.0, 0.0];

/// Default grid spacing.
pub const SPACING: [f64; 3] = [1.0, 1.0, 1.0];

/// Name of the cell-scalar channel carrying the field values.
pub const CELL_DATA: &str = "Spin";

/// Name of the frame dataset inside an archive.
pub const DEFAULT_DATASET: &str = "images";

/// Cell shape admitted by a point extent (`extent - 1` per axis).
///
/// Fails with `ShapeMismatch` if any axis of the extent is zero, since such
/// an extent admits no cell array at all.
pub fn expected_cell_shape(extent: &[usize]) -> FrameResult<Vec<usize>> {
    extent
        .iter()
        .map(|&e| e.checked_sub(1))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| FrameError::shape_mismatch(Vec::new(), extent.to_vec()))
}

/// Check that `actual` equals `expected_point_extent - 1` element-wise.
///
/// Dimensionality differences are mismatches too. The error carries both
/// the actual shape and the derived expected cell shape.
pub fn validate_shape(actual: &[usize], expected_point_extent: &[usize]) -> FrameResult<()> {
    let expected = expected_cell_shape(expected_point_extent)?;
    if actual != expected.as_slice() {
        return Err(FrameError::shape_mismatch(actual.to_vec(), expected));
    }
    Ok(())
}
