//! Browser backend tests. These need Chrome; they skip when it cannot launch.
#![cfg(feature = "cdp")]

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use svgpng::{ConversionRequest, Error, RenderMode};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("svgpng-browser-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

const TEARDOWN_ALLOWANCE: Duration = Duration::from_secs(2);

fn chrome_unavailable(err: &Error) -> bool {
    matches!(err.cause_kind(), Error::BrowserLaunch(_))
}

#[test]
fn slow_settle_hits_the_timeout() {
    if std::env::var("CI").is_ok() {
        return;
    }
    let dir = scratch_dir("timeout");
    let input = dir.join("chart.svg");
    fs::write(
        &input,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><rect width="10" height="10"/></svg>"#,
    )
    .unwrap();

    let request = ConversionRequest {
        mode: RenderMode::Browser,
        timeout_ms: 1_000,
        settle_ms: 3_000,
        ..ConversionRequest::new(&input)
    };

    let started = Instant::now();
    let err = svgpng::convert(&request).unwrap_err();
    if chrome_unavailable(&err) {
        eprintln!("Skipping browser timeout test because Chrome is not available: {}", err);
        return;
    }
    assert!(matches!(err.cause_kind(), Error::RenderTimeout(1000)), "{err:?}");
    // budget plus browser teardown, never the settle delay or the default launch timeout
    assert!(started.elapsed() < Duration::from_millis(1_000) + TEARDOWN_ALLOWANCE, "{:?}", started.elapsed());
}

#[test]
fn tiny_budget_bounds_the_launch() {
    if std::env::var("CI").is_ok() {
        return;
    }
    let dir = scratch_dir("launch-budget");
    let input = dir.join("dot.svg");
    fs::write(
        &input,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 4 4"><circle cx="2" cy="2" r="1"/></svg>"#,
    )
    .unwrap();

    // too short for Chrome to come up at all
    let request = ConversionRequest {
        mode: RenderMode::Browser,
        timeout_ms: 50,
        settle_ms: 0,
        ..ConversionRequest::new(&input)
    };

    let started = Instant::now();
    let err = svgpng::convert(&request).unwrap_err();
    if chrome_unavailable(&err) {
        eprintln!("Skipping launch budget test because Chrome is not available: {}", err);
        return;
    }
    assert!(matches!(err.cause_kind(), Error::RenderTimeout(50)), "{err:?}");
    assert!(started.elapsed() < Duration::from_millis(50) + TEARDOWN_ALLOWANCE, "{:?}", started.elapsed());
}

#[test]
#[ignore] // Requires Chrome to be installed
fn browser_screenshot_is_png() {
    let dir = scratch_dir("shot");
    let input = dir.join("shape.svg");
    fs::write(
        &input,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100"><rect width="200" height="100" fill="navy"/></svg>"#,
    )
    .unwrap();

    let request = ConversionRequest {
        mode: RenderMode::Browser,
        width: 300,
        height: 200,
        background: "white".into(),
        settle_ms: 200,
        ..ConversionRequest::new(&input)
    };
    let done = svgpng::convert(&request).expect("browser conversion");
    assert_eq!(done.mode, RenderMode::Browser);

    let png_data = fs::read(&done.output).unwrap();
    assert_eq!(&png_data[0..8], b"\x89PNG\r\n\x1a\n");

    let decoder = png::Decoder::new(&png_data[..]);
    let reader = decoder.read_info().expect("decode");
    assert!(reader.info().width >= 200);
    assert!(reader.info().height >= 100);
}
