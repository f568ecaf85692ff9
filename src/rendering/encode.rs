//! PNG encoding for rendered pixmaps

use crate::{Error, Result};
use resvg::tiny_skia::Pixmap;

/// Map a 1-9 effort level onto the encoder's presets.
pub fn compression_for_level(level: u8) -> png::Compression {
    match level {
        0..=3 => png::Compression::Fast,
        4..=6 => png::Compression::Default,
        _ => png::Compression::Best,
    }
}

/// Encode a premultiplied pixmap as straight-alpha RGBA8 PNG.
pub fn encode_png(pixmap: &Pixmap, level: u8) -> Result<Vec<u8>> {
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(compression_for_level(level));

    let mut writer = encoder
        .write_header()
        .map_err(|e| Error::Render(format!("PNG header encoding failed: {}", e)))?;
    writer
        .write_image_data(&rgba)
        .map_err(|e| Error::Render(format!("PNG encoding failed: {}", e)))?;
    writer
        .finish()
        .map_err(|e| Error::Render(format!("PNG encoding failed: {}", e)))?;

    Ok(out)
}
