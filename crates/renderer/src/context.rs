//! Render options and the per-batch render context.

use serde::{Deserialize, Serialize};
use tracing::debug;

use frame_common::GridGeometry;

use crate::colormap::{ColorMap, ColorRange};
use crate::error::{RenderError, Result};
use crate::png::encode_png_auto;
use crate::raster::{Canvas, CellRasterizer, Rasterizer};

/// User-facing render settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Side of the square drawn for each cell, in pixels.
    pub cell_pixels: usize,
    pub color_range: ColorRange,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cell_pixels: 4,
            color_range: ColorRange::Auto,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.cell_pixels == 0 {
            return Err("cell_pixels must be at least 1".to_string());
        }
        if let ColorRange::Fixed { min, max } = self.color_range {
            if !min.is_finite() || !max.is_finite() || min >= max {
                return Err(format!("invalid fixed colour range [{}, {}]", min, max));
            }
        }
        Ok(())
    }
}

/// Rendering resources shared by every frame of a batch: the colour lookup
/// table, the rasterizer and a reusable pixel buffer.
///
/// Acquire one per batch and drop it when the batch ends.
pub struct RenderContext {
    colormap: ColorMap,
    rasterizer: Box<dyn Rasterizer>,
    color_range: ColorRange,
    canvas: Canvas,
    rendered: usize,
}

impl RenderContext {
    pub fn new(options: &RenderOptions) -> Self {
        let colormap = ColorMap::viridis();
        debug!(
            colormap = colormap.name(),
            cell_pixels = options.cell_pixels,
            "Acquired render context"
        );
        Self {
            colormap,
            rasterizer: Box::new(CellRasterizer::new(options.cell_pixels)),
            color_range: options.color_range,
            canvas: Canvas::new(),
            rendered: 0,
        }
    }

    /// Swap in another rasterization backend.
    pub fn with_rasterizer(mut self, rasterizer: Box<dyn Rasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    pub fn colormap(&self) -> &ColorMap {
        &self.colormap
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Number of images drawn with this context.
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Rasterize cell scalars onto the canvas and encode it as PNG.
    pub fn draw_png(&mut self, geometry: &GridGeometry, cells: &[f64]) -> Result<Vec<u8>> {
        let range = self
            .color_range
            .resolve(cells)
            .ok_or_else(|| RenderError::invalid_input("no finite values to colour"))?;

        self.rasterizer
            .rasterize(geometry, cells, &self.colormap, range, &mut self.canvas)?;
        let png = encode_png_auto(self.canvas.pixels(), self.canvas.width(), self.canvas.height())?;
        self.rendered += 1;
        Ok(png)
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        debug!(
            rasterizer = self.rasterizer.name(),
            rendered = self.rendered,
            "Released render context"
        );
    }
}
