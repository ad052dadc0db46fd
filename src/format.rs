//! Format resolution from file suffixes.
//!
//! Every dispatch decision in the crate (which sanitizer to run, which codec
//! to hand a file to) goes through [`FileFormat::from_path`]. The set of
//! formats is closed; anything unrecognised resolves to
//! [`FileFormat::Unsupported`] so callers must handle it explicitly.

use std::fmt;
use std::path::{Path, PathBuf};

/// The formats this tool knows about, inferred from a path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Jpg,
    Jpeg,
    Png,
    Bmp,
    Pdf,
    Docx,
    /// No extension, or one outside the set above.
    Unsupported,
}

impl FileFormat {
    /// Resolve the format of `path` from its suffix, case-insensitively.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileFormat::Unsupported)
    }

    /// Resolve a bare extension (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" => FileFormat::Jpg,
            "jpeg" => FileFormat::Jpeg,
            "png" => FileFormat::Png,
            "bmp" => FileFormat::Bmp,
            "pdf" => FileFormat::Pdf,
            "docx" => FileFormat::Docx,
            _ => FileFormat::Unsupported,
        }
    }

    /// Raster formats handled by the image codec.
    pub fn is_image(self) -> bool {
        self.image_format().is_some()
    }

    /// The codec format used to re-encode files of this type.
    pub fn image_format(self) -> Option<image::ImageFormat> {
        match self {
            FileFormat::Jpg | FileFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            FileFormat::Png => Some(image::ImageFormat::Png),
            FileFormat::Bmp => Some(image::ImageFormat::Bmp),
            _ => None,
        }
    }

    pub fn extension(self) -> Option<&'static str> {
        match self {
            FileFormat::Jpg => Some("jpg"),
            FileFormat::Jpeg => Some("jpeg"),
            FileFormat::Png => Some("png"),
            FileFormat::Bmp => Some("bmp"),
            FileFormat::Pdf => Some("pdf"),
            FileFormat::Docx => Some("docx"),
            FileFormat::Unsupported => None,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension().unwrap_or("unsupported"))
    }
}

/// A user-supplied filesystem location together with its inferred format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePath {
    path: PathBuf,
    format: FileFormat,
}

impl FilePath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = FileFormat::from_path(&path);
        Self { path, format }
    }

    /// Build from a line of user input: surrounding whitespace is trimmed and
    /// one pair of matching quotes (as left by terminal drag-and-drop) removed.
    pub fn from_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        let unquoted = ['"', '\'']
            .iter()
            .find_map(|q| {
                trimmed
                    .strip_prefix(*q)
                    .and_then(|rest| rest.strip_suffix(*q))
            })
            .unwrap_or(trimmed);
        Self::new(unquoted)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }
}

impl AsRef<Path> for FilePath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
