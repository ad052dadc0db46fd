//! Progress-callback trait for per-step conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConverterConfigBuilder::progress_callback`] to receive
//! events while an operation walks its input. A "step" is a page for PDF
//! sources, a paragraph for DOCX sources and the whole image for JPEG → JPG.
//!
//! # Example
//!
//! ```rust
//! use anyfile_convert::{ConversionProgressCallback, ConverterConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     steps: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_step_complete(&self, _step: usize, _total_steps: usize) {
//!         self.steps.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { steps: AtomicUsize::new(0) });
//!
//! let config = ConverterConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::request::OperationKind;
use std::sync::Arc;

/// Called by the conversion operations as they process their input.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once the source has been opened and its size is known.
    ///
    /// # Arguments
    /// * `kind`:        the running operation
    /// * `total_steps`: number of pages/paragraphs that will be processed
    fn on_operation_start(&self, kind: OperationKind, total_steps: usize) {
        let _ = (kind, total_steps);
    }

    /// Called after each page or paragraph.
    ///
    /// # Arguments
    /// * `step`:        1-indexed step number
    /// * `total_steps`: total steps announced by `on_operation_start`
    fn on_step_complete(&self, step: usize, total_steps: usize) {
        let _ = (step, total_steps);
    }

    /// Called once when the operation ends, successfully or not.
    fn on_operation_complete(&self, kind: OperationKind, success: bool) {
        let _ = (kind, success);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConverterConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

/// Fan events out to an optional callback without `if let` at every call site.
#[derive(Clone, Default)]
pub(crate) struct Progress {
    callback: Option<ProgressCallback>,
}

impl Progress {
    pub(crate) fn new(callback: Option<ProgressCallback>) -> Self {
        Self { callback }
    }

    pub(crate) fn start(&self, kind: OperationKind, total_steps: usize) {
        if let Some(cb) = &self.callback {
            cb.on_operation_start(kind, total_steps);
        }
    }

    pub(crate) fn step(&self, step: usize, total_steps: usize) {
        if let Some(cb) = &self.callback {
            cb.on_step_complete(step, total_steps);
        }
    }

    pub(crate) fn finish(&self, kind: OperationKind, success: bool) {
        if let Some(cb) = &self.callback {
            cb.on_operation_complete(kind, success);
        }
    }
}
