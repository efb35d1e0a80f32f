//! Image rendering for lattice frames.
//!
//! A frame is checked against the expected 2D extent, mapped onto its
//! cell-centred grid geometry, coloured through a fixed viridis lookup table
//! and written as PNG.
//!
//! - [`colormap`]: colour lookup tables and value ranges
//! - [`raster`]: the [`Rasterizer`] seam, the cell-square implementation and
//!   the z projection used for volumes
//! - [`context`]: per-batch [`RenderContext`]
//! - [`png`]: indexed/RGBA PNG encoding

pub mod colormap;
pub mod context;
pub mod error;
pub mod png;
pub mod raster;
pub mod render;

pub use colormap::{Color, ColorMap, ColorRange};
pub use context::{RenderContext, RenderOptions};
pub use error::{RenderError, Result};
pub use raster::{max_intensity_projection, Canvas, CellRasterizer, Rasterizer};
pub use render::{render_to_image, render_volume_to_image, RenderedImage, Renderer};
