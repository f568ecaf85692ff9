//! Native rasterizer backend
//!
//! Parse with `usvg`, resolve the canvas, composite the background, scan-convert
//! with `resvg` and encode PNG. Every stage fails the whole attempt; nothing is
//! retried and no pixels are allocated before the document parses.

pub mod encode;
pub mod raster;

use crate::color::parse_color;
use crate::dimensions::resolve_canvas;
use crate::{ConversionRequest, Renderer, Result};
use log::debug;

/// A rendered PNG and its pixel size
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

/// Pure rasterizer backend, no external process
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRenderer;

impl Renderer for NativeRenderer {
    fn name(&self) -> &'static str {
        "native"
    }

    fn render(&self, svg: &str, request: &ConversionRequest) -> Result<RenderedImage> {
        let resources_dir = request.input.parent().filter(|p| !p.as_os_str().is_empty());
        let tree = raster::parse_document(svg, resources_dir)?;

        let natural = raster::natural_size(&tree);
        debug!("SVG natural size: {:.1} x {:.1}", natural.0, natural.1);

        let canvas = resolve_canvas(natural, request.width, request.height, request.scale);
        debug!(
            "Output size: {} x {} px (scale {:.2}x)",
            canvas.width, canvas.height, request.scale
        );

        let background = parse_color(&request.background)?;
        let pixmap = raster::rasterize(&tree, canvas, background)?;
        let png_data = encode::encode_png(&pixmap, request.compression)?;

        Ok(RenderedImage {
            width: canvas.width,
            height: canvas.height,
            png_data,
        })
    }
}
