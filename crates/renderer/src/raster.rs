//! Rasterization of planar cell fields, and the z projection that flattens
//! volumes onto them.

use frame_common::GridGeometry;
use rayon::prelude::*;

use crate::colormap::ColorMap;
use crate::error::{RenderError, Result};

/// Reusable RGBA pixel buffer.
#[derive(Debug, Default)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize to `width x height` and clear to transparent. The allocation
    /// is kept when shrinking.
    pub fn reset(&mut self, width: usize, height: usize) {
        let size = width * height * 4;
        self.width = width;
        self.height = height;
        self.pixels.resize(size, 0);
        self.pixels[..size].fill(0);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn capacity(&self) -> usize {
        self.pixels.capacity()
    }

    /// RGBA of the pixel at column `x`, row `y` (row 0 is the top).
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }
}

/// Backend that turns a grid's cell scalars into pixels.
pub trait Rasterizer: Send + Sync {
    /// Draw `cells` (one value per grid cell, x fastest) onto `canvas`,
    /// colouring through `colormap` over `range`.
    fn rasterize(
        &self,
        geometry: &GridGeometry,
        cells: &[f64],
        colormap: &ColorMap,
        range: (f64, f64),
        canvas: &mut Canvas,
    ) -> Result<()>;

    fn name(&self) -> &'static str;
}

/// Draws each cell as a `cell_pixels x cell_pixels` square. Grid x runs
/// left to right and grid y bottom to top, so a `(nx, ny)` cell field gives
/// an image `nx * cell_pixels` wide and `ny * cell_pixels` tall.
#[derive(Debug, Clone, Copy)]
pub struct CellRasterizer {
    cell_pixels: usize,
}

impl CellRasterizer {
    pub fn new(cell_pixels: usize) -> Self {
        Self {
            cell_pixels: cell_pixels.max(1),
        }
    }

    pub fn cell_pixels(&self) -> usize {
        self.cell_pixels
    }

    /// Image size for a geometry.
    pub fn image_size(&self, geometry: &GridGeometry) -> (usize, usize) {
        let [cx, cy, _] = geometry.cell_dimensions();
        (cx * self.cell_pixels, cy * self.cell_pixels)
    }
}

impl Default for CellRasterizer {
    fn default() -> Self {
        Self::new(4)
    }
}

impl Rasterizer for CellRasterizer {
    fn rasterize(
        &self,
        geometry: &GridGeometry,
        cells: &[f64],
        colormap: &ColorMap,
        range: (f64, f64),
        canvas: &mut Canvas,
    ) -> Result<()> {
        if !geometry.is_planar() {
            return Err(RenderError::invalid_input(format!(
                "cannot rasterize non-planar grid {:?}",
                geometry.dimensions
            )));
        }
        if geometry.num_cells() == 0 {
            return Err(RenderError::invalid_input("grid has no cells"));
        }
        if cells.len() != geometry.num_cells() {
            return Err(RenderError::invalid_input(format!(
                "{} scalars for {} cells",
                cells.len(),
                geometry.num_cells()
            )));
        }

        let (width, height) = self.image_size(geometry);
        canvas.reset(width, height);
        let s = self.cell_pixels;
        let row_bytes = width * 4;

        canvas
            .pixels_mut()
            .par_chunks_mut(row_bytes)
            .enumerate()
            .for_each(|(py, row)| {
                let j = (height - 1 - py) / s;
                for (i, cell_px) in row.chunks_mut(s * 4).enumerate() {
                    let value = cells[geometry.cell_index(i, j, 0)];
                    let rgba = colormap.color_for(value, range).to_rgba();
                    for px in cell_px.chunks_exact_mut(4) {
                        px.copy_from_slice(&rgba);
                    }
                }
            });

        Ok(())
    }

    fn name(&self) -> &'static str {
        "cell"
    }
}

/// Collapse a volume's cells along z, keeping the maximum of each column.
///
/// Returns the planar geometry (same x/y points, one z point) and its cells.
/// Planar input comes back unchanged.
pub fn max_intensity_projection(
    geometry: &GridGeometry,
    cells: &[f64],
) -> Result<(GridGeometry, Vec<f64>)> {
    let [cx, cy, _] = geometry.cell_dimensions();
    if geometry.num_cells() == 0 {
        return Err(RenderError::invalid_input("grid has no cells"));
    }
    if cells.len() != geometry.num_cells() {
        return Err(RenderError::invalid_input(format!(
            "{} scalars for {} cells",
            cells.len(),
            geometry.num_cells()
        )));
    }

    let [dx, dy, _] = geometry.dimensions;
    let plane = GridGeometry::new([dx, dy, 1], geometry.origin, geometry.spacing);
    let mut projected = vec![f64::NEG_INFINITY; cx * cy];
    for layer in cells.chunks_exact(cx * cy) {
        for (out, &v) in projected.iter_mut().zip(layer) {
            *out = out.max(v);
        }
    }
    Ok((plane, projected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_common::{ORIGIN, SPACING};

    fn geometry(nx_cells: usize, ny_cells: usize) -> GridGeometry {
        GridGeometry::new([nx_cells + 1, ny_cells + 1, 1], ORIGIN, SPACING)
    }

    #[test]
    fn test_image_size_scales_with_cell_pixels() {
        let raster = CellRasterizer::new(3);
        assert_eq!(raster.image_size(&geometry(4, 2)), (12, 6));
        assert_eq!(CellRasterizer::new(0).cell_pixels(), 1);
    }

    #[test]
    fn test_y_axis_points_up() {
        // 1 x 2 cells: cell (0, 0) low, cell (0, 1) high
        let geom = geometry(1, 2);
        let map = ColorMap::viridis();
        let mut canvas = Canvas::new();
        CellRasterizer::new(2)
            .rasterize(&geom, &[0.0, 1.0], &map, (0.0, 1.0), &mut canvas)
            .unwrap();

        assert_eq!((canvas.width(), canvas.height()), (2, 4));
        let low = map.lut()[0].to_rgba();
        let high = map.lut()[255].to_rgba();
        assert_eq!(canvas.pixel(0, 0), Some(high));
        assert_eq!(canvas.pixel(1, 1), Some(high));
        assert_eq!(canvas.pixel(0, 2), Some(low));
        assert_eq!(canvas.pixel(1, 3), Some(low));
    }

    #[test]
    fn test_x_axis_runs_left_to_right() {
        let geom = geometry(2, 1);
        let map = ColorMap::viridis();
        let mut canvas = Canvas::new();
        CellRasterizer::new(1)
            .rasterize(&geom, &[0.0, 1.0], &map, (0.0, 1.0), &mut canvas)
            .unwrap();
        assert_eq!(canvas.pixel(0, 0), Some(map.lut()[0].to_rgba()));
        assert_eq!(canvas.pixel(1, 0), Some(map.lut()[255].to_rgba()));
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let map = ColorMap::viridis();
        let mut canvas = Canvas::new();
        let raster = CellRasterizer::new(1);
        assert!(raster
            .rasterize(&geometry(2, 2), &[0.0; 3], &map, (0.0, 1.0), &mut canvas)
            .is_err());
        let volume = GridGeometry::new([3, 3, 3], ORIGIN, SPACING);
        assert!(raster
            .rasterize(&volume, &[0.0; 8], &map, (0.0, 1.0), &mut canvas)
            .is_err());
    }

    #[test]
    fn test_canvas_reuses_allocation() {
        let mut canvas = Canvas::new();
        canvas.reset(10, 10);
        let cap = canvas.capacity();
        canvas.reset(5, 5);
        assert_eq!(canvas.pixels().len(), 100);
        assert_eq!(canvas.capacity(), cap);
    }

    #[test]
    fn test_projection_keeps_column_maximum() {
        // 2 x 2 cells, 3 layers; x fastest, then y, then z
        let geom = GridGeometry::new([3, 3, 4], ORIGIN, SPACING);
        let cells = vec![
            0.0, 5.0, 1.0, 1.0, //
            7.0, 2.0, 1.0, 0.0, //
            3.0, 3.0, 9.0, -4.0,
        ];
        let (plane, projected) = max_intensity_projection(&geom, &cells).unwrap();
        assert_eq!(plane.dimensions, [3, 3, 1]);
        assert!(plane.is_planar());
        assert_eq!(projected, vec![7.0, 5.0, 9.0, 1.0]);
    }

    #[test]
    fn test_projection_of_planar_grid_is_identity() {
        let geom = geometry(3, 2);
        let cells: Vec<f64> = (0..6).map(f64::from).collect();
        let (plane, projected) = max_intensity_projection(&geom, &cells).unwrap();
        assert_eq!(plane, geom);
        assert_eq!(projected, cells);
    }

    #[test]
    fn test_projection_rejects_wrong_length() {
        let geom = GridGeometry::new([3, 3, 3], ORIGIN, SPACING);
        assert!(max_intensity_projection(&geom, &[0.0; 5]).is_err());
    }
}
