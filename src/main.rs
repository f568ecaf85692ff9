//! svgpng CLI
//!
//! Convert one SVG file, or every `*.svg` in a directory, to PNG.

use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use svgpng::{ConversionRequest, RenderMode};

#[derive(Parser)]
#[command(name = "svgpng")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert SVG documents to PNG images", long_about = None)]
struct Cli {
    /// Input SVG file
    #[arg(short, long, required_unless_present = "batch")]
    input: Option<PathBuf>,

    /// Output PNG file (defaults to the input with a .png extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output width in pixels (0 keeps the aspect ratio from the height)
    #[arg(long, default_value_t = 0)]
    width: u32,

    /// Output height in pixels (0 keeps the aspect ratio from the width)
    #[arg(long, default_value_t = 0)]
    height: u32,

    /// Scale factor applied after width/height
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Background: transparent, white, black or #RRGGBB
    #[arg(long = "bg", default_value = "transparent")]
    background: String,

    /// PNG compression level (1 fastest, 9 smallest)
    #[arg(long, default_value_t = 9, value_parser = clap::value_parser!(u8).range(1..=9))]
    quality: u8,

    /// Show detailed progress
    #[arg(short, long)]
    verbose: bool,

    /// Convert every *.svg in --dir
    #[arg(long)]
    batch: bool,

    /// Directory for batch mode
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Renderer: native or browser
    #[arg(long, default_value = "native")]
    mode: RenderMode,

    /// Shorthand for --mode browser
    #[arg(long)]
    browser: bool,

    /// Browser render timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Run the browser without a window
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    headless: bool,

    /// Apply the compatibility pass in native mode too
    #[arg(long)]
    preprocess: bool,

    /// Wait after the SVG becomes visible before the browser capture, in milliseconds
    #[arg(long, default_value_t = 3000)]
    settle_ms: u64,

    /// Print the batch summary as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn request(&self) -> ConversionRequest {
        ConversionRequest {
            input: self.input.clone().unwrap_or_default(),
            output: self.output.clone(),
            width: self.width,
            height: self.height,
            scale: self.scale,
            background: self.background.clone(),
            compression: self.quality,
            mode: if self.browser { RenderMode::Browser } else { self.mode },
            timeout_ms: self.timeout.saturating_mul(1000),
            headless: self.headless,
            preprocess: self.preprocess,
            settle_ms: self.settle_ms,
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run_single(request: &ConversionRequest) -> ExitCode {
    match svgpng::convert(request) {
        Ok(done) => {
            println!(
                "Converted {} to {} ({}x{}, {} mode)",
                done.input.display(),
                done.output.display(),
                done.width,
                done.height,
                done.mode
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Conversion failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_batch(cli: &Cli, template: &ConversionRequest) -> ExitCode {
    let quiet = cli.json;
    let result = svgpng::run_batch(&cli.dir, template, |index, total, outcome| {
        if quiet {
            return;
        }
        let name = outcome
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match &outcome.result {
            Ok(_) => println!("[{}/{}] {}: ok", index + 1, total, name),
            Err(e) => println!("[{}/{}] {}: failed: {}", index + 1, total, name, e),
        }
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            error!("Batch conversion failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize batch summary: {}", e),
        }
    } else {
        println!(
            "\nBatch conversion complete: {}/{} succeeded in {:.2?}",
            summary.succeeded, summary.total, summary.elapsed
        );
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let request = cli.request();
    if cli.batch {
        run_batch(&cli, &request)
    } else {
        run_single(&request)
    }
}
