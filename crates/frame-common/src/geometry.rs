//! Structured-grid geometry for cell-centred scalar fields.

use serde::{Deserialize, Serialize};

use crate::extent::{CELL_DATA, EXTENT_SIZE_2D, EXTENT_SIZE_3D, ORIGIN, SPACING};
use crate::frame::{Frame, Volume};

/// Geometry of a uniform grid whose scalar field lives on cells.
///
/// A `(H, W)` array becomes a grid of `(H + 1, W + 1, 1)` points. The first
/// axis (`x`) varies fastest when cells are enumerated, so the row-major
/// buffer of a frame is read as `values[i + j * nx_cells + k * nx_cells * ny_cells]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Number of points along x, y, z.
    pub dimensions: [usize; 3],
    pub origin: [f64; 3],
    pub spacing: [f64; 3],
}

impl GridGeometry {
    pub fn new(dimensions: [usize; 3], origin: [f64; 3], spacing: [f64; 3]) -> Self {
        Self {
            dimensions,
            origin,
            spacing,
        }
    }

    /// Geometry for a 2D frame: one more point than cell along each array axis.
    pub fn for_frame(frame: &Frame, spacing: [f64; 3], origin: [f64; 3]) -> Self {
        Self::new([frame.rows() + 1, frame.cols() + 1, 1], origin, spacing)
    }

    /// Geometry for a 3D volume.
    pub fn for_volume(volume: &Volume, spacing: [f64; 3], origin: [f64; 3]) -> Self {
        let [d0, d1, d2] = volume.shape();
        Self::new([d0 + 1, d1 + 1, d2 + 1], origin, spacing)
    }

    /// Number of cells along each axis. A flat axis (one point) still counts
    /// as one layer of cells.
    pub fn cell_dimensions(&self) -> [usize; 3] {
        self.dimensions.map(|d| d.saturating_sub(1).max(1))
    }

    pub fn num_points(&self) -> usize {
        self.dimensions.iter().product()
    }

    pub fn num_cells(&self) -> usize {
        if self.dimensions.iter().any(|&d| d == 0) {
            return 0;
        }
        self.cell_dimensions().iter().product()
    }

    /// True when the grid spans a single layer along z.
    pub fn is_planar(&self) -> bool {
        self.dimensions[2] <= 1
    }

    /// Whole extent as `[x0, x1, y0, y1, z0, z1]` point indices.
    pub fn whole_extent(&self) -> [usize; 6] {
        let [nx, ny, nz] = self.dimensions;
        [
            0,
            nx.saturating_sub(1),
            0,
            ny.saturating_sub(1),
            0,
            nz.saturating_sub(1),
        ]
    }

    /// Flat cell index of cell `(i, j, k)`, x fastest.
    pub fn cell_index(&self, i: usize, j: usize, k: usize) -> usize {
        let [cx, cy, _] = self.cell_dimensions();
        i + j * cx + k * cx * cy
    }
}

/// Process-wide grid conventions: defaults for geometry, channel naming and
/// the expected extents used to validate render inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConventions {
    pub origin: [f64; 3],
    pub spacing: [f64; 3],
    pub cell_data_name: String,
    pub expected_extent_2d: [usize; 2],
    pub expected_extent_3d: [usize; 3],
}

impl Default for GridConventions {
    fn default() -> Self {
        Self {
            origin: ORIGIN,
            spacing: SPACING,
            cell_data_name: CELL_DATA.to_string(),
            expected_extent_2d: EXTENT_SIZE_2D,
            expected_extent_3d: EXTENT_SIZE_3D,
        }
    }
}

impl GridConventions {
    pub fn geometry_for_frame(&self, frame: &Frame) -> GridGeometry {
        GridGeometry::for_frame(frame, self.spacing, self.origin)
    }

    pub fn geometry_for_volume(&self, volume: &Volume) -> GridGeometry {
        GridGeometry::for_volume(volume, self.spacing, self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_geometry_has_one_more_point_per_axis() {
        let frame = Frame::filled(4, 7, 0);
        let geom = GridGeometry::for_frame(&frame, SPACING, ORIGIN);
        assert_eq!(geom.dimensions, [5, 8, 1]);
        assert_eq!(geom.cell_dimensions(), [4, 7, 1]);
        assert_eq!(geom.num_cells(), frame.len());
        assert_eq!(geom.num_points(), 40);
        assert!(geom.is_planar());
        assert_eq!(geom.whole_extent(), [0, 4, 0, 7, 0, 0]);
    }

    #[test]
    fn test_volume_geometry() {
        let volume = Volume::new([2, 3, 4], vec![0; 24]).unwrap();
        let geom = GridGeometry::for_volume(&volume, SPACING, ORIGIN);
        assert_eq!(geom.dimensions, [3, 4, 5]);
        assert_eq!(geom.num_cells(), 24);
        assert!(!geom.is_planar());
    }

    #[test]
    fn test_cell_index_x_fastest() {
        let geom = GridGeometry::new([4, 3, 1], ORIGIN, SPACING);
        assert_eq!(geom.cell_index(0, 0, 0), 0);
        assert_eq!(geom.cell_index(2, 0, 0), 2);
        assert_eq!(geom.cell_index(0, 1, 0), 3);
        assert_eq!(geom.cell_index(2, 1, 0), 5);
    }

    #[test]
    fn test_default_conventions() {
        let conv = GridConventions::default();
        assert_eq!(conv.cell_data_name, "Spin");
        assert_eq!(conv.expected_extent_2d, [101, 101]);
        assert_eq!(conv.spacing, [1.0, 1.0, 1.0]);
    }
}
