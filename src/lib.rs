//! # anyfile-convert
//!
//! Convert between a handful of everyday document and image formats and
//! strip identifying metadata from whatever gets written.
//!
//! ## Operations
//!
//! | Operation    | Input     | Output                    | Sanitized |
//! |--------------|-----------|---------------------------|-----------|
//! | PDF → DOCX   | `.pdf`    | `.docx`                   | yes       |
//! | DOCX → PDF   | `.docx`   | `.pdf` (A4, Courier 12pt) | yes       |
//! | PDF → images | `.pdf`    | `image_<page>.jpg` files  | no        |
//! | JPEG → JPG   | `.jpeg`   | `.jpg` (RGB)              | yes       |
//!
//! ## Pipeline Overview
//!
//! ```text
//! ConversionRequest
//!  │
//!  ├─ 1. Validate  source must exist, otherwise nothing is touched
//!  ├─ 2. Convert   lopdf / docx-rs + zip / image, built in memory
//!  ├─ 3. Write     one file, or one per page with images
//!  ├─ 4. Sanitize  per-format metadata removal, atomic replace
//!  └─ 5. Report    ConversionResult (never Err, never panics)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use anyfile_convert::{docx_to_pdf, ConverterConfig};
//!
//! let config = ConverterConfig::default();
//! let result = docx_to_pdf("letter.docx", "letter.pdf", &config);
//! if let Some(msg) = result.error_message() {
//!     eprintln!("conversion failed: {msg}");
//! }
//! for issue in &result.sanitize_errors {
//!     eprintln!("metadata left in place: {issue}");
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `anyconvert` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! anyfile-convert = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod menu;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod request;
pub mod sanitize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConverterConfig, ConverterConfigBuilder, LogConfig, LogLevel, PageLayout};
pub use convert::{docx_to_pdf, execute, extract_images, jpeg_to_jpg, pdf_to_docx};
pub use error::{ConvertError, ErrorKind, SanitizeError};
pub use format::{FileFormat, FilePath};
pub use menu::{Menu, MenuChoice, MenuSummary};
pub use output::ConversionResult;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use request::{ConversionRequest, OperationKind};
pub use sanitize::{sanitize, sanitize_best_effort, SanitizeOutcome};
