//! SVG to PNG conversion
//!
//! Converts SVG documents to PNG images one file at a time or across a
//! directory, using one of two interchangeable renderers:
//!
//! - **Native** (default): parses the document with `usvg`, scan-converts it
//!   with `resvg` and encodes the pixels as PNG. No external process.
//! - **Browser** (`cdp` feature): embeds the markup in an HTML page, renders it
//!   in headless Chrome over the DevTools protocol and captures a screenshot.
//!
//! # Example
//!
//! ```no_run
//! use svgpng::{ConversionRequest, RenderMode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = ConversionRequest {
//!     scale: 2.0,
//!     background: "white".to_string(),
//!     mode: RenderMode::Native,
//!     ..ConversionRequest::new("diagram.svg")
//! };
//!
//! let done = svgpng::convert(&request)?;
//! println!("wrote {} ({} bytes)", done.output.display(), done.bytes);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod error;
pub use error::{Error, Result};

pub mod batch;
pub mod color;
pub mod convert;
pub mod dimensions;
pub mod preprocess;
pub mod wrapper;

// Native rasterizer backend
pub mod rendering;

// Browser screenshot backend over the Chrome DevTools Protocol
#[cfg(feature = "cdp")]
pub mod cdp;

// Async-friendly facade (worker thread + oneshot replies)
pub mod async_api;

pub use batch::{run_batch, BatchSummary, FileOutcome};
pub use color::{parse_color, Rgba};
pub use convert::{convert, Conversion};
pub use dimensions::Canvas;
pub use rendering::RenderedImage;

/// Which backend renders the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Pure rasterizer, no external process
    #[default]
    Native,
    /// Headless browser screenshot
    Browser,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Native => f.write_str("native"),
            RenderMode::Browser => f.write_str("browser"),
        }
    }
}

impl FromStr for RenderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(RenderMode::Native),
            "browser" => Ok(RenderMode::Browser),
            other => Err(Error::InvalidRequest(format!("unknown render mode '{}'", other))),
        }
    }
}

/// One conversion, fully described.
///
/// Built once per file and never mutated after dispatch. Batch runs derive a
/// fresh request per input with [`ConversionRequest::for_input`].
///
/// # Examples
///
/// ```
/// let req = svgpng::ConversionRequest::new("icons/logo.svg");
/// assert_eq!(req.output_path(), std::path::PathBuf::from("icons/logo.png"));
/// assert_eq!(req.compression, 9);
/// ```
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// SVG file to read
    pub input: PathBuf,
    /// PNG file to write; `None` derives it from `input`
    pub output: Option<PathBuf>,
    /// Requested width in pixels, 0 = unspecified
    pub width: u32,
    /// Requested height in pixels, 0 = unspecified
    pub height: u32,
    /// Multiplier applied after width/height resolution
    pub scale: f64,
    /// `transparent`, `white`, `black` or `#RRGGBB`
    pub background: String,
    /// PNG compression effort, 1 (fastest) to 9 (smallest). Native backend only.
    pub compression: u8,
    /// Backend selection
    pub mode: RenderMode,
    /// Overall bound on a browser render, in milliseconds
    pub timeout_ms: u64,
    /// Hide the browser window
    pub headless: bool,
    /// Force the compatibility pass (browser mode always applies it)
    pub preprocess: bool,
    /// Wait after the SVG becomes visible before capturing, in milliseconds
    pub settle_ms: u64,
}

impl Default for ConversionRequest {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            width: 0,
            height: 0,
            scale: 1.0,
            background: "transparent".to_string(),
            compression: 9,
            mode: RenderMode::Native,
            timeout_ms: 30_000,
            headless: true,
            preprocess: false,
            settle_ms: 3_000,
        }
    }
}

impl ConversionRequest {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    /// Same settings for another input, with the output path derived again.
    pub fn for_input(&self, input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            ..self.clone()
        }
    }

    /// Explicit output, or the input path with its extension replaced by `.png`.
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(p) if !p.as_os_str().is_empty() => p.clone(),
            _ => self.input.with_extension("png"),
        }
    }

    /// Whether the compatibility pass runs for this request.
    pub fn should_preprocess(&self) -> bool {
        self.preprocess || self.mode == RenderMode::Browser
    }

    /// Reject out-of-range numeric settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::InvalidRequest(format!("scale must be positive, got {}", self.scale)));
        }
        if !(1..=9).contains(&self.compression) {
            return Err(Error::InvalidRequest(format!(
                "compression level must be 1-9, got {}",
                self.compression
            )));
        }
        Ok(())
    }
}

/// A rendering backend: turns SVG markup into PNG bytes.
pub trait Renderer {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Render the markup according to `request`.
    fn render(&self, svg: &str, request: &ConversionRequest) -> Result<RenderedImage>;

    /// Render and write the PNG to `output`, returning the number of bytes written.
    fn render_to_file(&self, svg: &str, request: &ConversionRequest, output: &Path) -> Result<RenderedFile> {
        let image = self.render(svg, request)?;
        std::fs::write(output, &image.png_data).map_err(|source| Error::OutputWrite {
            path: output.to_path_buf(),
            source,
        })?;
        Ok(RenderedFile {
            width: image.width,
            height: image.height,
            bytes: image.png_data.len() as u64,
        })
    }
}

/// What a backend wrote to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedFile {
    pub width: u32,
    pub height: u32,
    pub bytes: u64,
}

/// Select the backend for `mode`.
pub fn new_renderer(mode: RenderMode) -> Box<dyn Renderer> {
    match mode {
        RenderMode::Native => Box::new(rendering::NativeRenderer),
        #[cfg(feature = "cdp")]
        RenderMode::Browser => Box::new(cdp::BrowserRenderer),
        #[cfg(not(feature = "cdp"))]
        RenderMode::Browser => Box::new(NoBrowser),
    }
}

#[cfg(not(feature = "cdp"))]
struct NoBrowser;

#[cfg(not(feature = "cdp"))]
impl Renderer for NoBrowser {
    fn name(&self) -> &'static str {
        "browser"
    }

    fn render(&self, _svg: &str, _request: &ConversionRequest) -> Result<RenderedImage> {
        Err(Error::BrowserLaunch("built without the `cdp` feature".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request() {
        let req = ConversionRequest::default();
        assert_eq!(req.scale, 1.0);
        assert_eq!(req.background, "transparent");
        assert_eq!(req.mode, RenderMode::Native);
        assert_eq!(req.timeout_ms, 30_000);
        assert!(req.headless);
        assert!(!req.preprocess);
    }

    #[test]
    fn output_path_is_derived_from_input() {
        let req = ConversionRequest::new("dir/chart.svg");
        assert_eq!(req.output_path(), PathBuf::from("dir/chart.png"));

        let req = ConversionRequest::new("noext");
        assert_eq!(req.output_path(), PathBuf::from("noext.png"));

        let req = ConversionRequest {
            output: Some(PathBuf::from("out/x.png")),
            ..ConversionRequest::new("a.svg")
        };
        assert_eq!(req.output_path(), PathBuf::from("out/x.png"));

        let req = ConversionRequest {
            output: Some(PathBuf::new()),
            ..ConversionRequest::new("a.svg")
        };
        assert_eq!(req.output_path(), PathBuf::from("a.png"));
    }

    #[test]
    fn for_input_resets_output() {
        let template = ConversionRequest {
            output: Some(PathBuf::from("fixed.png")),
            scale: 3.0,
            ..ConversionRequest::new("a.svg")
        };
        let derived = template.for_input("b.svg");
        assert_eq!(derived.output_path(), PathBuf::from("b.png"));
        assert_eq!(derived.scale, 3.0);
    }

    #[test]
    fn browser_mode_always_preprocesses() {
        let mut req = ConversionRequest::new("a.svg");
        assert!(!req.should_preprocess());
        req.mode = RenderMode::Browser;
        assert!(req.should_preprocess());
        req.mode = RenderMode::Native;
        req.preprocess = true;
        assert!(req.should_preprocess());
    }

    #[test]
    fn validate_rejects_bad_numbers() {
        let ok = ConversionRequest::new("a.svg");
        assert!(ok.validate().is_ok());
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let req = ConversionRequest { scale, ..ok.clone() };
            assert!(matches!(req.validate(), Err(Error::InvalidRequest(_))));
        }
        for compression in [0, 10] {
            let req = ConversionRequest { compression, ..ok.clone() };
            assert!(matches!(req.validate(), Err(Error::InvalidRequest(_))));
        }
    }

    #[test]
    fn render_mode_parses() {
        assert_eq!("Browser".parse::<RenderMode>().unwrap(), RenderMode::Browser);
        assert_eq!("native".parse::<RenderMode>().unwrap(), RenderMode::Native);
        assert!("gpu".parse::<RenderMode>().is_err());
        assert_eq!(RenderMode::Browser.to_string(), "browser");
    }
}
