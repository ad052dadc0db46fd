//! Metadata removal for files this tool has just written.
//!
//! Dispatch is by extension through [`FileFormat::from_path`]:
//!
//! | Format              | Strategy                                              |
//! |---------------------|-------------------------------------------------------|
//! | jpg, jpeg, png, bmp | decode to pixels, re-encode (EXIF, text chunks gone)  |
//! | pdf                 | fresh catalog + trailer, unreachable objects pruned   |
//! | docx                | repack the zip with blank property parts, no rsids    |
//! | anything else       | warn and leave the file alone                         |
//!
//! Every rewrite is built in memory and lands through a temporary file in the
//! target's directory that is then renamed over it, so a failure at any point
//! leaves the unsanitized original in place.

use crate::config::ConverterConfig;
use crate::error::SanitizeError;
use crate::format::FileFormat;
use crate::pipeline::raster;
use lopdf::{dictionary, Document, Object};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// What [`sanitize`] did with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeOutcome {
    /// The file was rewritten without its metadata.
    Rewritten(FileFormat),
    /// No strategy exists for this extension; the file is untouched.
    Skipped,
}

/// Strip identifying metadata from `path` in place.
pub fn sanitize(path: &Path, config: &ConverterConfig) -> Result<SanitizeOutcome, SanitizeError> {
    let format = FileFormat::from_path(path);
    match format {
        format if format.is_image() => sanitize_image(path, format, config.jpeg_quality)?,
        FileFormat::Pdf => sanitize_pdf(path)?,
        FileFormat::Docx => sanitize_docx(path)?,
        _ => {
            warn!(
                "No metadata removal for '{}': unsupported extension",
                path.display()
            );
            return Ok(SanitizeOutcome::Skipped);
        }
    }
    debug!("Removed metadata from {} ({})", path.display(), format);
    Ok(SanitizeOutcome::Rewritten(format))
}

/// [`sanitize`], with failures logged and handed back instead of propagated.
pub fn sanitize_best_effort(path: &Path, config: &ConverterConfig) -> Option<SanitizeError> {
    match sanitize(path, config) {
        Ok(_) => None,
        Err(e) => {
            warn!("{e}");
            Some(e)
        }
    }
}

// ── Images ───────────────────────────────────────────────────────────────────

fn sanitize_image(path: &Path, format: FileFormat, jpeg_quality: u8) -> Result<(), SanitizeError> {
    let image_err = |source| SanitizeError::Image {
        path: path.to_path_buf(),
        source,
    };
    let Some(target) = format.image_format() else {
        return Ok(());
    };

    let img = raster::decode_sniffed(path).map_err(image_err)?;
    let bytes = raster::encode(&img, target, jpeg_quality).map_err(image_err)?;
    replace_atomically(path, &bytes)
}

// ── PDF ──────────────────────────────────────────────────────────────────────

fn sanitize_pdf(path: &Path) -> Result<(), SanitizeError> {
    let fail = |detail: String| SanitizeError::Pdf {
        path: path.to_path_buf(),
        detail,
    };

    let mut doc = Document::load(path).map_err(|e| fail(e.to_string()))?;
    let pages_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .and_then(|root| doc.get_dictionary(root))
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| fail(format!("no page tree: {e}")))?;

    // Only the page tree survives: /Info, /ID, /Metadata, outlines, names
    // and the rest of the old catalog become unreachable.
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer = dictionary! { "Root" => catalog_id };
    let pruned = doc.prune_objects();
    doc.renumber_objects();
    doc.compress();
    debug!("Pruned {} unreachable PDF object(s)", pruned.len());

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(|e| fail(e.to_string()))?;
    replace_atomically(path, &bytes)
}

// ── DOCX ─────────────────────────────────────────────────────────────────────

const EMPTY_CORE_PROPERTIES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
    r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
    r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"/>"#,
);

const EMPTY_APP_PROPERTIES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
    r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"/>"#,
);

const EMPTY_CUSTOM_PROPERTIES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/custom-properties" "#,
    r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"/>"#,
);

static RE_RSID_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\s+w:rsid[A-Za-z]*="[0-9A-Fa-f]*""#).unwrap());
static RE_RSID_TABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<w:rsids>.*?</w:rsids>|<w:rsids\s*/>").unwrap());

fn empty_property_part(name: &str) -> Option<&'static str> {
    match name {
        "docProps/core.xml" => Some(EMPTY_CORE_PROPERTIES),
        "docProps/app.xml" => Some(EMPTY_APP_PROPERTIES),
        "docProps/custom.xml" => Some(EMPTY_CUSTOM_PROPERTIES),
        _ => None,
    }
}

fn is_word_xml(name: &str) -> bool {
    name.starts_with("word/") && name.ends_with(".xml")
}

/// Drop revision-session ids from a WordprocessingML part.
pub fn strip_rsids(xml: &str) -> String {
    let without_table = RE_RSID_TABLE.replace_all(xml, "");
    RE_RSID_ATTR.replace_all(&without_table, "").into_owned()
}

fn sanitize_docx(path: &Path) -> Result<(), SanitizeError> {
    let fail = |detail: String| SanitizeError::Docx {
        path: path.to_path_buf(),
        detail,
    };
    let io_err = |source| SanitizeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(io_err)?;
    let mut archive = ZipArchive::new(file).map_err(|e| fail(e.to_string()))?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| fail(e.to_string()))?;
        let name = entry.name().to_string();

        let rewritten = if let Some(blank) = empty_property_part(&name) {
            Some(blank.to_string())
        } else if is_word_xml(&name) {
            let mut xml = String::new();
            entry
                .read_to_string(&mut xml)
                .map_err(|e| fail(format!("{name}: {e}")))?;
            Some(strip_rsids(&xml))
        } else {
            None
        };

        match rewritten {
            Some(content) => {
                drop(entry);
                writer
                    .start_file(name.as_str(), options)
                    .map_err(|e| fail(e.to_string()))?;
                writer.write_all(content.as_bytes()).map_err(io_err)?;
            }
            None => writer
                .raw_copy_file(entry)
                .map_err(|e| fail(format!("{name}: {e}")))?,
        }
    }

    let bytes = writer
        .finish()
        .map_err(|e| fail(e.to_string()))?
        .into_inner();
    replace_atomically(path, &bytes)
}

// ── Atomic replace ───────────────────────────────────────────────────────────

/// Write `bytes` next to `path`, then rename over it.
fn replace_atomically(path: &Path, bytes: &[u8]) -> Result<(), SanitizeError> {
    let io_err = |source| SanitizeError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
