//! Chrome DevTools Protocol screenshot backend
//!
//! Wraps the markup in an HTML page, opens it in a headless Chrome tab, waits
//! for the `<svg>` root to appear, lets it settle and captures the full page.
//! The whole attempt runs against one wall-clock deadline.

use crate::color::parse_color;
use crate::dimensions::{resolve_browser_canvas, Canvas};
use crate::wrapper::wrap_document;
use crate::{ConversionRequest, Error, RenderedImage, Renderer, Result};
use base64::Engine as Base64Engine;
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::types::Bounds;
use headless_chrome::{Browser, LaunchOptions};
use log::{debug, warn};
use std::ffi::OsStr;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Extra room around the canvas so overflowing content is not clipped during layout.
const VIEWPORT_MARGIN_WIDTH: u32 = 100;
const VIEWPORT_MARGIN_HEIGHT: u32 = 200;
const SCREENSHOT_QUALITY: u32 = 90;
const READY_SELECTOR: &str = "svg";
/// The DevTools connection is dropped after this much silence.
const MIN_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

const DOCUMENT_SIZE_SCRIPT: &str = r#"
(function() {
    const d = document.documentElement;
    const b = document.body;
    const w = Math.max(d.scrollWidth, b ? b.scrollWidth : 0);
    const h = Math.max(d.scrollHeight, b ? b.scrollHeight : 0);
    return JSON.stringify([Math.ceil(w), Math.ceil(h)]);
})()
"#;

/// Headless Chrome screenshot backend
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserRenderer;

impl Renderer for BrowserRenderer {
    fn name(&self) -> &'static str {
        "browser"
    }

    fn render(&self, svg: &str, request: &ConversionRequest) -> Result<RenderedImage> {
        let deadline = Deadline::new(Duration::from_millis(request.timeout_ms));

        let background = parse_color(&request.background)?;
        let canvas = resolve_browser_canvas(request.width, request.height, request.scale);
        let html = wrap_document(svg, canvas, background);
        let viewport = canvas.with_margin(VIEWPORT_MARGIN_WIDTH, VIEWPORT_MARGIN_HEIGHT);
        debug!(
            "Browser canvas {}x{}, viewport {}x{}",
            canvas.width, canvas.height, viewport.width, viewport.height
        );

        // Dropping the session closes the tab and the browser process on every path.
        let mut session = BrowserSession::launch(request.headless, viewport, &deadline)?;
        let tab = Arc::clone(&session.tab);
        let settle = Duration::from_millis(request.settle_ms);
        let result = deadline.run(move || capture(&tab, &html, &deadline, settle));
        if matches!(result, Err(Error::RenderTimeout(_))) {
            // the capture worker may still hold the connection
            session.abandon();
        }
        let image = result?;
        debug!("Browser screenshot: {:.2} KB", image.png_data.len() as f64 / 1024.0);
        Ok(image)
    }
}

/// Wall-clock budget for one render attempt.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn new(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn expired(&self) -> bool {
        self.started.elapsed() >= self.budget
    }

    /// Time left, or `RenderTimeout` once the budget is spent.
    pub fn remaining(&self) -> Result<Duration> {
        match self.budget.checked_sub(self.started.elapsed()) {
            Some(left) if !left.is_zero() => Ok(left),
            _ => Err(self.timeout()),
        }
    }

    pub fn timeout(&self) -> Error {
        Error::RenderTimeout(self.budget.as_millis() as u64)
    }

    /// Sleep for `delay`, failing up front when it cannot finish inside the budget.
    pub fn sleep(&self, delay: Duration) -> Result<()> {
        if delay >= self.remaining()? {
            return Err(self.timeout());
        }
        std::thread::sleep(delay);
        Ok(())
    }

    /// Run `work` on a worker thread and wait at most the remaining budget.
    ///
    /// On timeout the worker is left behind; callers tear down whatever it is
    /// blocked on so its pending call fails.
    pub fn run<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let budget = self.remaining()?;
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("svgpng-capture".into())
            .spawn(move || {
                let _ = tx.send(work());
            })
            .map_err(|e| Error::Render(format!("Failed to start capture worker: {}", e)))?;

        match rx.recv_timeout(budget) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(self.timeout()),
            Err(RecvTimeoutError::Disconnected) => {
                Err(Error::Render("Capture worker exited without a result".into()))
            }
        }
    }

    /// Timeouts win over whatever error the browser reported.
    fn classify(&self, stage: &str, err: anyhow::Error) -> Error {
        if self.expired() {
            self.timeout()
        } else {
            Error::Render(format!("{} failed: {}", stage, err))
        }
    }
}

/// A launched browser with one tab. Torn down on drop.
struct BrowserSession {
    browser: Browser,
    tab: Arc<Tab>,
    abandoned: bool,
}

impl BrowserSession {
    fn launch(headless: bool, viewport: Canvas, deadline: &Deadline) -> Result<Self> {
        let launch_options = LaunchOptions::default_builder()
            .headless(headless)
            .sandbox(false)
            .window_size(Some((viewport.width, viewport.height)))
            .idle_browser_timeout(deadline.budget.max(MIN_IDLE_TIMEOUT))
            .launch_timeout(deadline.remaining()?)
            .args(vec![
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--disable-extensions"),
                OsStr::new("--hide-scrollbars"),
            ])
            .build()
            .map_err(|e| Error::BrowserLaunch(format!("Failed to build launch options: {}", e)))?;

        let launch_error = |what: &str, e: anyhow::Error| {
            if deadline.expired() {
                deadline.timeout()
            } else {
                Error::BrowserLaunch(format!("{}: {}", what, e))
            }
        };

        let browser = Browser::new(launch_options).map_err(|e| launch_error("Failed to launch browser", e))?;
        let tab = browser
            .new_tab()
            .map_err(|e| launch_error("Failed to create tab", e))?;

        let session = Self {
            browser,
            tab,
            abandoned: false,
        };
        deadline.remaining()?;
        Ok(session)
    }

    /// Leave the tab to the browser teardown; a stalled worker may still own the
    /// connection, so closing it here could block.
    fn abandon(&mut self) {
        self.abandoned = true;
    }
}

/// Navigate, wait for the SVG, settle, size the window and take the screenshot.
fn capture(tab: &Tab, html: &str, deadline: &Deadline, settle: Duration) -> Result<RenderedImage> {
    let url = format!(
        "data:text/html;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(html)
    );

    tab.set_default_timeout(deadline.remaining()?);
    tab.navigate_to(&url)
        .map_err(|e| deadline.classify("Navigation", e))?;
    tab.wait_until_navigated()
        .map_err(|e| deadline.classify("Wait for navigation", e))?;

    tab.wait_for_element_with_custom_timeout(READY_SELECTOR, deadline.remaining()?)
        .map_err(|e| deadline.classify("Wait for SVG", e))?;

    // Visible is not settled: diagram internals keep laying out afterwards.
    deadline.sleep(settle)?;

    let (width, height) = document_size(tab, deadline)?;
    fit_window(tab, width, height, deadline)?;

    let png_data = tab
        .capture_screenshot(
            Page::CaptureScreenshotFormatOption::Png,
            Some(SCREENSHOT_QUALITY),
            Some(Page::Viewport {
                x: 0.0,
                y: 0.0,
                width: f64::from(width),
                height: f64::from(height),
                scale: 1.0,
            }),
            true,
        )
        .map_err(|e| deadline.classify("Screenshot", e))?;
    deadline.remaining()?;

    Ok(RenderedImage {
        width,
        height,
        png_data,
    })
}

fn document_size(tab: &Tab, deadline: &Deadline) -> Result<(u32, u32)> {
    let eval = tab
        .evaluate(DOCUMENT_SIZE_SCRIPT, false)
        .map_err(|e| deadline.classify("Measuring document", e))?;

    let raw = match eval.value {
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
        None => return Err(Error::Render("No value returned from document measurement".into())),
    };
    let (w, h): (u32, u32) = serde_json::from_str(&raw)
        .map_err(|e| Error::Render(format!("Unexpected document size {}: {}", raw, e)))?;
    Ok((w.max(1), h.max(1)))
}

/// Grow the window when the page is larger than the viewport so the capture
/// covers the whole document.
fn fit_window(tab: &Tab, width: u32, height: u32, deadline: &Deadline) -> Result<()> {
    let metrics = tab
        .evaluate("JSON.stringify([window.innerWidth, window.innerHeight])", false)
        .map_err(|e| deadline.classify("Measuring viewport", e))?;
    let (vw, vh): (u32, u32) = metrics
        .value
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or((0, 0));
    if width <= vw && height <= vh {
        return Ok(());
    }

    tab.set_bounds(Bounds::Normal {
            left: Some(0),
            top: Some(0),
            width: Some(f64::from(width.max(vw))),
            height: Some(f64::from(height.max(vh))),
        })
        .map_err(|e| deadline.classify("Resizing window", e))?;
    Ok(())
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if !self.abandoned {
            if let Err(e) = self.tab.close(false) {
                warn!("Failed to close browser tab: {}", e);
            }
        }
        // The browser process is killed once the last `Browser` handle goes away.
        debug!("Browser session closed (pid {:?})", self.browser.get_process_id());
    }
}
