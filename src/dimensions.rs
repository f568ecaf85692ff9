//! Output canvas size resolution

/// Natural size substituted for documents with no usable intrinsic size.
pub const FALLBACK_NATURAL_SIZE: f64 = 512.0;
/// Natural dimensions below this are treated as degenerate.
pub const MIN_NATURAL_DIMENSION: f64 = 64.0;
/// Replacement for a degenerate natural dimension.
pub const SMALL_DOCUMENT_DIMENSION: f64 = 256.0;
/// Browser canvas defaults, used because the intrinsic size is unknown before rendering.
pub const BROWSER_DEFAULT_WIDTH: u32 = 1024;
pub const BROWSER_DEFAULT_HEIGHT: u32 = 768;

/// Final raster size in device pixels. Both axes are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Grow the canvas by a fixed margin on each axis.
    pub fn with_margin(self, dw: u32, dh: u32) -> Canvas {
        Canvas {
            width: self.width.saturating_add(dw),
            height: self.height.saturating_add(dh),
        }
    }
}

/// Resolve the canvas for a document of natural size `natural` (0 = unknown),
/// requested `width`/`height` (0 = unspecified) and a `scale` multiplier.
///
/// One requested axis preserves the document aspect ratio. Two requested axes are
/// honored independently, so the result may stretch.
pub fn resolve_canvas(natural: (f64, f64), width: u32, height: u32, scale: f64) -> Canvas {
    let (doc_w, doc_h) = natural;
    let known = doc_w > 0.0 && doc_h > 0.0;
    // ratio math only; the defaulted case below keeps the raw size
    let (ratio_w, ratio_h) = if known {
        (doc_w, doc_h)
    } else {
        (FALLBACK_NATURAL_SIZE, FALLBACK_NATURAL_SIZE)
    };

    let (w, h) = match (width, height) {
        (0, 0) => {
            let floor = |v: f64| {
                if v < MIN_NATURAL_DIMENSION {
                    SMALL_DOCUMENT_DIMENSION
                } else {
                    v
                }
            };
            (floor(doc_w.max(0.0)), floor(doc_h.max(0.0)))
        }
        (0, h) => ((f64::from(h) * ratio_w / ratio_h).round(), f64::from(h)),
        (w, 0) => (f64::from(w), (f64::from(w) * ratio_h / ratio_w).round()),
        (w, h) => (f64::from(w), f64::from(h)),
    };

    Canvas {
        width: scale_axis(w, scale),
        height: scale_axis(h, scale),
    }
}

/// Browser canvas: requested axes, defaulting to 1024x768, then scaled.
pub fn resolve_browser_canvas(width: u32, height: u32, scale: f64) -> Canvas {
    let w = if width == 0 { BROWSER_DEFAULT_WIDTH } else { width };
    let h = if height == 0 { BROWSER_DEFAULT_HEIGHT } else { height };
    Canvas {
        width: scale_axis(f64::from(w), scale),
        height: scale_axis(f64::from(h), scale),
    }
}

fn scale_axis(value: f64, scale: f64) -> u32 {
    let scaled = (value * scale).round();
    if scaled.is_nan() || scaled < 1.0 {
        1
    } else if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        scaled as u32
    }
}
