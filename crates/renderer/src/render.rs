//! Frame, volume and grid rendering to PNG files.
//!
//! Volumes are drawn as their maximum-intensity projection along z.

use std::path::{Path, PathBuf};

use frame_common::{validate_shape, Frame, FrameResult, GridConventions, Volume};
use grid_file::GridFile;
use tracing::debug;

use crate::context::{RenderContext, RenderOptions};
use crate::error::{RenderError, Result};
use crate::raster::max_intensity_projection;

/// A PNG written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub path: PathBuf,
    pub width: usize,
    pub height: usize,
    pub bytes: usize,
}

/// Renders frames and grid files through a [`RenderContext`].
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    conventions: GridConventions,
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            conventions: GridConventions::default(),
            options,
        }
    }

    pub fn with_conventions(conventions: GridConventions, options: RenderOptions) -> Self {
        Self {
            conventions,
            options,
        }
    }

    pub fn conventions(&self) -> &GridConventions {
        &self.conventions
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Acquire the context for one batch of renders.
    pub fn context(&self) -> RenderContext {
        RenderContext::new(&self.options)
    }

    /// Render a frame to a PNG at `path`.
    ///
    /// The frame must match the expected 2D extent (cell shape `extent - 1`).
    /// Values are coloured as-is through the context's colour map.
    pub fn render_to_image(
        &self,
        ctx: &mut RenderContext,
        frame: &Frame,
        path: &Path,
    ) -> Result<RenderedImage> {
        validate_shape(&frame.shape(), &self.conventions.expected_extent_2d)?;

        let geometry = self.conventions.geometry_for_frame(frame);
        let cells: Vec<f64> = frame.values().iter().map(|&v| f64::from(v)).collect();
        let png = ctx.draw_png(&geometry, &cells)?;
        write_png(ctx, path, &png)
    }

    /// Render a volume to a PNG at `path`.
    ///
    /// The volume must match the expected 3D extent. It is drawn as its
    /// maximum-intensity projection along the third axis.
    pub fn render_volume_to_image(
        &self,
        ctx: &mut RenderContext,
        volume: &Volume,
        path: &Path,
    ) -> Result<RenderedImage> {
        validate_shape(&volume.shape(), &self.conventions.expected_extent_3d)?;

        let geometry = self.conventions.geometry_for_volume(volume);
        let cells: Vec<f64> = volume.values().iter().map(|&v| f64::from(v)).collect();
        let (plane, projected) = max_intensity_projection(&geometry, &cells)?;
        let png = ctx.draw_png(&plane, &projected)?;
        write_png(ctx, path, &png)
    }

    /// Render the active cell channel of a grid. No extent check is applied.
    /// Volumetric grids are projected along z first.
    pub fn render_grid(
        &self,
        ctx: &mut RenderContext,
        grid: &GridFile,
        path: &Path,
    ) -> Result<RenderedImage> {
        let array = grid
            .active_cell_array()
            .ok_or_else(|| RenderError::invalid_input("grid has no cell data"))?;
        let cells = array.values.to_f64();
        let png = if grid.geometry.is_planar() {
            ctx.draw_png(&grid.geometry, &cells)?
        } else {
            let (plane, projected) = max_intensity_projection(&grid.geometry, &cells)?;
            ctx.draw_png(&plane, &projected)?
        };
        write_png(ctx, path, &png)
    }
}

fn write_png(ctx: &RenderContext, path: &Path, png: &[u8]) -> Result<RenderedImage> {
    std::fs::write(path, png)?;
    let image = RenderedImage {
        path: path.to_path_buf(),
        width: ctx.canvas().width(),
        height: ctx.canvas().height(),
        bytes: png.len(),
    };
    debug!(
        path = %path.display(),
        width = image.width,
        height = image.height,
        bytes = image.bytes,
        "Wrote image"
    );
    Ok(image)
}

/// Render one frame with default conventions and options.
///
/// Acquires and releases a context for this single call; batch callers
/// should hold a [`Renderer`] and one context instead.
pub fn render_to_image(frame: &Frame, path: impl AsRef<Path>) -> FrameResult<RenderedImage> {
    let renderer = Renderer::default();
    let mut ctx = renderer.context();
    Ok(renderer.render_to_image(&mut ctx, frame, path.as_ref())?)
}

/// Render one volume with default conventions and options.
pub fn render_volume_to_image(volume: &Volume, path: impl AsRef<Path>) -> FrameResult<RenderedImage> {
    let renderer = Renderer::default();
    let mut ctx = renderer.context();
    Ok(renderer.render_volume_to_image(&mut ctx, volume, path.as_ref())?)
}
