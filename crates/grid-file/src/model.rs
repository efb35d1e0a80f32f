//! In-memory structured grid: geometry plus named cell and point arrays.

use frame_common::{Frame, GridGeometry, Volume};

use crate::error::{GridFileError, Result};

/// Values of a single-component data array.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValues {
    Int32(Vec<i32>),
    Float64(Vec<f64>),
}

impl ArrayValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Int32(v) => v.len(),
            Self::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// VTK type name used when writing.
    pub fn vtk_type(&self) -> &'static str {
        match self {
            Self::Int32(_) => "Int32",
            Self::Float64(_) => "Float64",
        }
    }

    /// Values widened to `f64`; exact for `Int32`.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            Self::Int32(v) => v.iter().map(|&x| x as f64).collect(),
            Self::Float64(v) => v.clone(),
        }
    }

    pub fn as_i32(&self) -> Option<&[i32]> {
        match self {
            Self::Int32(v) => Some(v),
            Self::Float64(_) => None,
        }
    }

    /// Smallest and largest value, or `None` when empty.
    pub fn range(&self) -> Option<(f64, f64)> {
        let values = self.to_f64();
        let first = *values.first()?;
        Some(
            values
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }
}

/// A named single-component data array.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    pub name: String,
    pub values: ArrayValues,
}

impl DataArray {
    pub fn new(name: impl Into<String>, values: ArrayValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// A uniform structured grid with cell and point data.
#[derive(Debug, Clone, PartialEq)]
pub struct GridFile {
    pub geometry: GridGeometry,
    pub cell_data: Vec<DataArray>,
    pub point_data: Vec<DataArray>,
}

impl GridFile {
    /// Empty grid (no arrays) over `geometry`.
    pub fn new(geometry: GridGeometry) -> Self {
        Self {
            geometry,
            cell_data: Vec::new(),
            point_data: Vec::new(),
        }
    }

    /// Grid over a frame's cells with the frame attached as the only cell
    /// channel and no point channels.
    ///
    /// The frame's row-major buffer is attached unchanged.
    pub fn from_frame(frame: &Frame, geometry: GridGeometry, channel: &str) -> Self {
        let mut grid = Self::new(geometry);
        grid.set_cell_scalars(channel, ArrayValues::Int32(frame.values().to_vec()));
        grid
    }

    /// Grid over a volume's cells, same convention as [`GridFile::from_frame`].
    pub fn from_volume(volume: &Volume, geometry: GridGeometry, channel: &str) -> Self {
        let mut grid = Self::new(geometry);
        grid.set_cell_scalars(channel, ArrayValues::Int32(volume.values().to_vec()));
        grid
    }

    /// Attach (or replace) a cell channel.
    pub fn set_cell_scalars(&mut self, name: &str, values: ArrayValues) {
        self.cell_data.retain(|a| a.name != name);
        self.cell_data.insert(0, DataArray::new(name, values));
    }

    pub fn cell_array(&self, name: &str) -> Option<&DataArray> {
        self.cell_data.iter().find(|a| a.name == name)
    }

    /// First cell channel, which is the active scalars when written.
    pub fn active_cell_array(&self) -> Option<&DataArray> {
        self.cell_data.first()
    }

    /// Check every array length against the geometry.
    ///
    /// Geometries whose point or cell count does not fit in `usize` are
    /// rejected before any count is taken.
    pub fn validate(&self) -> Result<()> {
        let too_large = || {
            GridFileError::parse(format!(
                "dimensions {:?} are too large",
                self.geometry.dimensions
            ))
        };
        let points = checked_count(self.geometry.dimensions).ok_or_else(too_large)?;
        let cells = if points == 0 {
            0
        } else {
            checked_count(self.geometry.cell_dimensions()).ok_or_else(too_large)?
        };
        for (arrays, expected) in [(&self.cell_data, cells), (&self.point_data, points)] {
            for array in arrays {
                if array.values.len() != expected {
                    return Err(GridFileError::SizeMismatch {
                        name: array.name.clone(),
                        actual: array.values.len(),
                        expected,
                    });
                }
            }
        }
        Ok(())
    }

    /// Reshape a planar grid's integer cell channel back into a frame of
    /// `(dims[0] - 1, dims[1] - 1)`, in the same flattening order it was
    /// written with.
    pub fn to_frame(&self, channel: &str) -> Result<Frame> {
        let array = self
            .cell_array(channel)
            .ok_or_else(|| GridFileError::MissingArray(channel.to_string()))?;
        if !self.geometry.is_planar() {
            return Err(GridFileError::parse(format!(
                "grid with dimensions {:?} is not planar",
                self.geometry.dimensions
            )));
        }
        let values = array
            .values
            .as_i32()
            .ok_or_else(|| GridFileError::parse(format!("array '{}' is not integer", channel)))?;
        let [nx, ny, _] = self.geometry.dimensions;
        let rows = nx.saturating_sub(1);
        let cols = ny.saturating_sub(1);
        Frame::new(rows, cols, values.to_vec()).map_err(|_| GridFileError::SizeMismatch {
            name: channel.to_string(),
            actual: values.len(),
            expected: rows * cols,
        })
    }
}

fn checked_count(dims: [usize; 3]) -> Option<usize> {
    if dims.contains(&0) {
        return Some(0);
    }
    dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_common::{ORIGIN, SPACING};

    #[test]
    fn test_from_frame_attaches_single_cell_channel() {
        let frame = Frame::new(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let geom = GridGeometry::for_frame(&frame, SPACING, ORIGIN);
        let grid = GridFile::from_frame(&frame, geom, "Spin");

        assert_eq!(grid.cell_data.len(), 1);
        assert!(grid.point_data.is_empty());
        assert_eq!(grid.active_cell_array().unwrap().name, "Spin");
        assert_eq!(grid.cell_array("Spin").unwrap().values.len(), 6);
        grid.validate().unwrap();
        assert_eq!(grid.to_frame("Spin").unwrap(), frame);
    }

    #[test]
    fn test_set_cell_scalars_replaces_by_name() {
        let frame = Frame::filled(2, 2, 0);
        let geom = GridGeometry::for_frame(&frame, SPACING, ORIGIN);
        let mut grid = GridFile::from_frame(&frame, geom, "Spin");
        grid.set_cell_scalars("Spin", ArrayValues::Int32(vec![9; 4]));
        assert_eq!(grid.cell_data.len(), 1);
        assert_eq!(grid.cell_array("Spin").unwrap().values, ArrayValues::Int32(vec![9; 4]));
    }

    #[test]
    fn test_validate_rejects_wrong_length() {
        let geom = GridGeometry::new([3, 3, 1], ORIGIN, SPACING);
        let mut grid = GridFile::new(geom);
        grid.set_cell_scalars("Spin", ArrayValues::Int32(vec![0; 5]));
        assert!(matches!(grid.validate(), Err(GridFileError::SizeMismatch { .. })));
    }

    #[test]
    fn test_validate_rejects_overflowing_dimensions() {
        let geom = GridGeometry::new([usize::MAX, 3, 2], ORIGIN, SPACING);
        assert!(matches!(GridFile::new(geom).validate(), Err(GridFileError::Parse(_))));

        let empty = GridGeometry::new([usize::MAX, usize::MAX, 0], ORIGIN, SPACING);
        assert!(GridFile::new(empty).validate().is_ok());
    }

    #[test]
    fn test_array_range() {
        assert_eq!(ArrayValues::Int32(vec![3, -1, 8]).range(), Some((-1.0, 8.0)));
        assert_eq!(ArrayValues::Float64(vec![]).range(), None);
    }
}
