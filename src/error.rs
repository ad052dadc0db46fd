//! Error types for the anyfile-convert library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ConvertError`]: **Fatal** for one operation: the input is missing,
//!   the source cannot be parsed, or the output cannot be written. It ends up
//!   inside [`crate::output::ConversionResult`] as the failure cause.
//!
//! * [`SanitizeError`]: **Non-fatal**: the conversion succeeded but the
//!   metadata pass over its output did not. The unsanitized file stays on
//!   disk; the error is logged and attached to the result for inspection.
//!
//! Neither type ever escapes [`crate::convert::execute`] as a panic or an
//! `Err`: every operation is its own failure boundary.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification shared by both error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source path does not exist.
    NotFound,
    /// A collaborator failed during the primary transform.
    Conversion,
    /// Metadata stripping failed after a successful conversion.
    Sanitization,
    /// Builder validation failed.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::NotFound => "not-found",
            ErrorKind::Conversion => "conversion",
            ErrorKind::Sanitization => "sanitization",
            ErrorKind::Config => "config",
        };
        f.write_str(s)
    }
}

/// All errors that abort a single conversion operation.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt, or the page tree cannot be walked.
    #[error("PDF '{path}' could not be read: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// Building the output PDF failed.
    #[error("Failed to render PDF: {detail}")]
    PdfRender { detail: String },

    // ── DOCX errors ───────────────────────────────────────────────────────
    /// The OOXML package is not a readable zip or lacks `word/document.xml`.
    #[error("DOCX '{path}' could not be read: {detail}")]
    DocxRead { path: PathBuf, detail: String },

    /// Packing the output DOCX failed.
    #[error("Failed to build DOCX: {detail}")]
    DocxWrite { detail: String },

    // ── Image errors ──────────────────────────────────────────────────────
    /// The image codec could not decode the source.
    #[error("Failed to decode image '{path}': {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image codec could not encode the output.
    #[error("Failed to encode image '{path}': {source}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// An image XObject's sample data does not form an RGB buffer of the
    /// declared size.
    #[error("Image '{name}' on page {page} is not decodable as RGB: {detail}")]
    ImageData {
        page: u32,
        name: String,
        detail: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file or directory.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::FileNotFound { .. } => ErrorKind::NotFound,
            ConvertError::InvalidConfig(_) => ErrorKind::Config,
            _ => ErrorKind::Conversion,
        }
    }

    pub(crate) fn corrupt_pdf(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        ConvertError::CorruptPdf {
            path: path.into(),
            detail: err.to_string(),
        }
    }

    pub(crate) fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::OutputWriteFailed {
            path: path.into(),
            source,
        }
    }
}

/// A failure while stripping metadata from an already-written output.
///
/// Always recovered locally: logged by [`crate::sanitize::sanitize_best_effort`]
/// and stored in [`crate::output::ConversionResult::sanitize_errors`].
#[derive(Debug, Error)]
pub enum SanitizeError {
    /// Image decode or re-encode failed.
    #[error("Image metadata removal failed for '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The PDF could not be reloaded or rewritten.
    #[error("PDF metadata removal failed for '{path}': {detail}")]
    Pdf { path: PathBuf, detail: String },

    /// The OOXML package could not be re-serialised.
    #[error("DOCX metadata removal failed for '{path}': {detail}")]
    Docx { path: PathBuf, detail: String },

    /// Reading the file or replacing it in place failed.
    #[error("Could not rewrite '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SanitizeError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Sanitization
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            SanitizeError::Image { path, .. }
            | SanitizeError::Pdf { path, .. }
            | SanitizeError::Docx { path, .. }
            | SanitizeError::Io { path, .. } => path,
        }
    }
}
