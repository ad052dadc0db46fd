//! CLI binary for anyfile-convert.
//!
//! Starts the interactive menu on stdin/stdout. The flags only tune
//! logging, progress display and encoder settings; every conversion is
//! still chosen from the menu.

use anyfile_convert::{
    ConversionProgressCallback, ConverterConfig, LogConfig, LogLevel, Menu, OperationKind,
    ProgressCallback,
};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Renders one progress bar per operation on stderr.
struct CliProgressCallback {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: Mutex::new(None),
        })
    }

    fn unit(kind: OperationKind) -> &'static str {
        match kind {
            OperationKind::DocxToPdf => "paragraphs",
            OperationKind::JpegToJpg => "images",
            OperationKind::PdfToDocx | OperationKind::ExtractImages => "pages",
        }
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_operation_start(&self, kind: OperationKind, total_steps: usize) {
        let style = ProgressStyle::with_template(&format!(
            "{{spinner:.cyan}} {{prefix:.bold}}  [{{bar:42.green/238}}] {{pos:>3}}/{{len}} {}  ⏱ {{elapsed_precise}}",
            Self::unit(kind)
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        let bar = ProgressBar::new(total_steps as u64);
        bar.set_style(style);
        bar.set_prefix(kind.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn on_step_complete(&self, step: usize, _total_steps: usize) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.set_position(step as u64);
            }
        }
    }

    fn on_operation_complete(&self, _kind: OperationKind, _success: bool) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}

const AFTER_HELP: &str = r#"MENU:
  1. Convert PDF to DOCX        text lines become paragraphs, RGB images embedded
  2. Convert DOCX to PDF        paragraph text on A4 pages, Courier 12 pt
  3. Extract Images from PDF    image_<page>.jpg per page into a folder
  4. Convert JPEG to JPG        re-encoded as RGB JPEG
  5. Exit

  Outputs of 1, 2 and 4 are rewritten without their metadata (document
  properties, PDF /Info, EXIF, revision ids). Extracted images are not.

ENVIRONMENT VARIABLES:
  RUST_LOG                  Overrides the log filter (e.g. anyfile_convert=debug)
  ANYCONVERT_JPEG_QUALITY   JPEG quality 1-100
  ANYCONVERT_TEXT_ONLY      Skip images when converting PDF to DOCX
"#;

/// Interactive PDF / DOCX / JPEG converter with metadata removal.
#[derive(Parser, Debug)]
#[command(
    name = "anyconvert",
    version,
    about = "Interactive PDF / DOCX / JPEG converter that strips metadata from its output",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "ANYCONVERT_VERBOSE")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, env = "ANYCONVERT_QUIET")]
    quiet: bool,

    /// Disable progress bars.
    #[arg(long, env = "ANYCONVERT_NO_PROGRESS")]
    no_progress: bool,

    /// JPEG quality (1–100) for every JPEG written.
    #[arg(long, env = "ANYCONVERT_JPEG_QUALITY", default_value_t = 75,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// Do not embed page images when converting PDF to DOCX.
    #[arg(long, env = "ANYCONVERT_TEXT_ONLY")]
    text_only: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // With a progress bar on screen, per-operation INFO lines are noise.
    let show_progress = !cli.quiet && !cli.no_progress;
    let mut log = LogConfig::from_flags(cli.verbose, cli.quiet);
    if show_progress && log.level == LogLevel::Info {
        log.level = LogLevel::Warn;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log.filter_directive())),
        )
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to install the log subscriber")?;

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ConverterConfig::builder()
        .jpeg_quality(cli.jpeg_quality)
        .embed_images(!cli.text_only);
    if show_progress {
        builder = builder.progress_callback(CliProgressCallback::new() as ProgressCallback);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Menu loop ────────────────────────────────────────────────────────
    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = Menu::new(stdin.lock(), stdout.lock(), config)
        .run()
        .context("Menu I/O failed")?;

    tracing::debug!(?summary, "Exiting");
    Ok(())
}
