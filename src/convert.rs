//! Single-file conversion: read, preprocess, dispatch to a backend.

use crate::preprocess::preprocess;
use crate::{new_renderer, ConversionRequest, Error, RenderMode, Result};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

/// A finished conversion
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Conversion {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Size of the written PNG
    pub bytes: u64,
    pub mode: RenderMode,
}

/// Convert one SVG file to PNG.
///
/// Input read failures surface as [`Error::InputRead`]; anything the backend
/// raises is wrapped in [`Error::ConversionFailed`]. Nothing is retried.
pub fn convert(request: &ConversionRequest) -> Result<Conversion> {
    request.validate()?;
    let output = request.output_path();

    let raw = fs::read(&request.input).map_err(|source| Error::InputRead {
        path: request.input.clone(),
        source,
    })?;
    let mut svg = String::from_utf8(raw).map_err(|e| {
        Error::ConversionFailed(Box::new(Error::DocumentParse(format!("input is not UTF-8: {}", e))))
    })?;

    if request.should_preprocess() {
        let before = svg.len();
        svg = preprocess(&svg)?;
        debug!("SVG preprocess: {} -> {} bytes", before, svg.len());
    }

    let renderer = new_renderer(request.mode);
    debug!(
        "Read {} ({} bytes), renderer: {}",
        request.input.display(),
        svg.len(),
        renderer.name()
    );

    let written = renderer
        .render_to_file(&svg, request, &output)
        .map_err(|e| Error::ConversionFailed(Box::new(e)))?;
    debug!("Output file size: {:.2} KB", written.bytes as f64 / 1024.0);
    info!(
        "Converted {} -> {} ({}x{}, {} mode)",
        request.input.display(),
        output.display(),
        written.width,
        written.height,
        request.mode
    );

    Ok(Conversion {
        input: request.input.clone(),
        output,
        width: written.width,
        height: written.height,
        bytes: written.bytes,
        mode: request.mode,
    })
}
