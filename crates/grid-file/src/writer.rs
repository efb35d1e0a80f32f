//! Path-level entry points: build a grid from a frame and write it, or read
//! a grid file back.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use frame_common::{Frame, GridConventions, GridGeometry, Volume, CELL_DATA};
use tracing::debug;

use crate::error::Result;
use crate::format::GridFileFormat;
use crate::legacy;
use crate::model::GridFile;
use crate::xml;

/// Write `frame` as a cell-centred grid file at `path`.
///
/// The grid has `(H + 1, W + 1, 1)` points, a single `"Spin"` cell channel
/// holding the frame's values in row-major order, and no point channels.
/// The encoding follows the extension (`.vti` or `.vtk`). The frame's shape
/// is not checked against any expected extent.
pub fn write_grid_file(
    frame: &Frame,
    path: impl AsRef<Path>,
    spacing: [f64; 3],
    origin: [f64; 3],
) -> Result<GridFile> {
    let geometry = GridGeometry::for_frame(frame, spacing, origin);
    let grid = GridFile::from_frame(frame, geometry, CELL_DATA);
    write_grid(&grid, path.as_ref())?;
    Ok(grid)
}

/// Write a 3D `volume` with `(D0 + 1, D1 + 1, D2 + 1)` points.
pub fn write_volume_grid_file(
    volume: &Volume,
    path: impl AsRef<Path>,
    spacing: [f64; 3],
    origin: [f64; 3],
) -> Result<GridFile> {
    let geometry = GridGeometry::for_volume(volume, spacing, origin);
    let grid = GridFile::from_volume(volume, geometry, CELL_DATA);
    write_grid(&grid, path.as_ref())?;
    Ok(grid)
}

/// Write an already-built grid, choosing the encoding from the extension.
pub fn write_grid(grid: &GridFile, path: &Path) -> Result<()> {
    let format = GridFileFormat::from_path(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    match format {
        GridFileFormat::ImageDataXml => xml::write_image_data(grid, &mut out)?,
        GridFileFormat::LegacyStructuredPoints => {
            let title = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("grid");
            legacy::write_structured_points(grid, title, &mut out)?
        }
    }
    out.flush()?;
    debug!(
        path = %path.display(),
        dimensions = ?grid.geometry.dimensions,
        "Wrote grid file"
    );
    Ok(())
}

/// Parse a `.vti` or `.vtk` file.
pub fn read_grid_file(path: impl AsRef<Path>) -> Result<GridFile> {
    let path = path.as_ref();
    let format = GridFileFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    match format {
        GridFileFormat::ImageDataXml => xml::read_image_data(&content),
        GridFileFormat::LegacyStructuredPoints => legacy::read_structured_points(&content),
    }
}

/// Grid writer bound to a set of conventions (spacing, origin, channel name).
#[derive(Debug, Clone, Default)]
pub struct GridWriter {
    conventions: GridConventions,
}

impl GridWriter {
    pub fn new(conventions: GridConventions) -> Self {
        Self { conventions }
    }

    pub fn conventions(&self) -> &GridConventions {
        &self.conventions
    }

    pub fn write_frame(&self, frame: &Frame, path: &Path) -> Result<GridFile> {
        let geometry = self.conventions.geometry_for_frame(frame);
        let grid = GridFile::from_frame(frame, geometry, &self.conventions.cell_data_name);
        write_grid(&grid, path)?;
        Ok(grid)
    }

    pub fn write_volume(&self, volume: &Volume, path: &Path) -> Result<GridFile> {
        let geometry = self.conventions.geometry_for_volume(volume);
        let grid = GridFile::from_volume(volume, geometry, &self.conventions.cell_data_name);
        write_grid(&grid, path)?;
        Ok(grid)
    }
}
