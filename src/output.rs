//! The outcome record returned by every conversion operation.

use crate::error::{ConvertError, ErrorKind, SanitizeError};
use crate::request::OperationKind;
use std::path::PathBuf;

/// Result of one [`crate::convert::execute`] call.
///
/// A failed operation carries its [`ConvertError`]; a successful one lists the
/// files it produced (one per operation, or one per written image for
/// extraction). Sanitization problems never turn a success into a failure;
/// they are kept in `sanitize_errors` after being logged.
#[derive(Debug)]
pub struct ConversionResult {
    pub kind: OperationKind,
    /// Files written, in the order they were produced.
    pub outputs: Vec<PathBuf>,
    /// Why the operation failed, if it did.
    pub error: Option<ConvertError>,
    /// Non-fatal failures of the metadata pass.
    pub sanitize_errors: Vec<SanitizeError>,
    /// Wall-clock time of the whole operation.
    pub duration_ms: u64,
}

impl ConversionResult {
    pub(crate) fn succeeded(kind: OperationKind, outputs: Vec<PathBuf>) -> Self {
        Self {
            kind,
            outputs,
            error: None,
            sanitize_errors: Vec::new(),
            duration_ms: 0,
        }
    }

    pub(crate) fn failed(kind: OperationKind, error: ConvertError) -> Self {
        Self {
            kind,
            outputs: Vec::new(),
            error: Some(error),
            sanitize_errors: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(ConvertError::kind)
    }

    /// Human-readable failure description, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }

    /// True when every output went through the sanitizer cleanly.
    pub fn fully_sanitized(&self) -> bool {
        self.is_success() && self.kind.sanitizes_output() && self.sanitize_errors.is_empty()
    }

    /// Convert into a plain `Result`, dropping sanitization notes.
    pub fn into_result(self) -> Result<Vec<PathBuf>, ConvertError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.outputs),
        }
    }
}
