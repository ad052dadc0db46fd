//! Input validation: confirm a source path exists before any side effect.
//!
//! This is deliberately the only check made on a source. Formats are sniffed
//! from the suffix elsewhere; content is left for the collaborator to reject.

use crate::error::ConvertError;
use std::path::Path;
use tracing::{debug, warn};

/// Existence check used by the menu before it asks for a destination.
pub fn source_exists(path: &Path) -> bool {
    path.exists()
}

/// Validate that `path` exists, signalling [`ConvertError::FileNotFound`] if not.
pub fn validate_source(path: &Path) -> Result<(), ConvertError> {
    if !source_exists(path) {
        warn!("Source not found: {}", path.display());
        return Err(ConvertError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    debug!("Validated source: {}", path.display());
    Ok(())
}
