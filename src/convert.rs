//! Conversion entry points.
//!
//! [`execute`] is the single failure boundary: it validates the source,
//! dispatches to one of the four operations, sanitizes what was written and
//! folds every outcome into a [`ConversionResult`]. It never returns `Err`
//! and never panics on bad input.
//!
//! The four `pub fn` wrappers below ([`pdf_to_docx`], [`docx_to_pdf`],
//! [`extract_images`], [`jpeg_to_jpg`]) build the request for you.

use crate::config::ConverterConfig;
use crate::error::ConvertError;
use crate::format::{FileFormat, FilePath};
use crate::output::ConversionResult;
use crate::pipeline::docx::{self, DocxBuilder};
use crate::pipeline::layout::TextPdfWriter;
use crate::pipeline::{input, pdf, pdf_text, postprocess, raster, xobject};
use crate::progress::Progress;
use crate::request::{ConversionRequest, OperationKind};
use crate::sanitize;
use image::RgbImage;
use lopdf::{Document, ObjectId};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Run one conversion request end to end.
///
/// # Returns
/// A [`ConversionResult`] in every case. On failure `error` holds the cause
/// and nothing was sanitized; on success `outputs` lists the written files
/// and `sanitize_errors` any metadata pass that did not complete.
pub fn execute(request: &ConversionRequest, config: &ConverterConfig) -> ConversionResult {
    let start = Instant::now();
    let kind = request.kind;
    info!(
        "Starting {}: {} → {}",
        kind, request.source, request.destination
    );
    if kind.sanitizes_output() && request.destination.format() == FileFormat::Unsupported {
        warn!(
            "'{}' has no recognised extension; metadata removal will be skipped",
            request.destination
        );
    }
    let progress = Progress::new(config.progress_callback.clone());

    // ── Step 1: Validate source ──────────────────────────────────────────
    // ── Step 2: Convert ──────────────────────────────────────────────────
    let outcome = input::validate_source(request.source.path())
        .and_then(|()| dispatch(request, config, &progress));

    let mut result = match outcome {
        Ok(outputs) => ConversionResult::succeeded(kind, outputs),
        Err(e) => {
            error!("{} failed: {}", kind, e);
            ConversionResult::failed(kind, e)
        }
    };

    // ── Step 3: Sanitize outputs ─────────────────────────────────────────
    if result.is_success() && kind.sanitizes_output() {
        for path in &result.outputs {
            if let Some(e) = sanitize::sanitize_best_effort(path, config) {
                result.sanitize_errors.push(e);
            }
        }
    }

    progress.finish(kind, result.is_success());
    result.duration_ms = start.elapsed().as_millis() as u64;

    if result.is_success() {
        info!(
            "{} complete: {} output(s), {} sanitization issue(s), {}ms",
            kind,
            result.outputs.len(),
            result.sanitize_errors.len(),
            result.duration_ms
        );
    }
    result
}

/// Convert a PDF into a DOCX with one paragraph per extracted text line.
pub fn pdf_to_docx(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    config: &ConverterConfig,
) -> ConversionResult {
    run(OperationKind::PdfToDocx, source, destination, config)
}

/// Lay the paragraphs of a DOCX out as monospaced text on A4 PDF pages.
pub fn docx_to_pdf(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    config: &ConverterConfig,
) -> ConversionResult {
    run(OperationKind::DocxToPdf, source, destination, config)
}

/// Write the image XObjects of every page as `image_<page>.jpg` into
/// `output_dir`, creating it if needed.
pub fn extract_images(
    source: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ConverterConfig,
) -> ConversionResult {
    run(OperationKind::ExtractImages, source, output_dir, config)
}

/// Re-encode a JPEG-family image as an RGB baseline JPEG.
pub fn jpeg_to_jpg(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    config: &ConverterConfig,
) -> ConversionResult {
    run(OperationKind::JpegToJpg, source, destination, config)
}

fn run(
    kind: OperationKind,
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    config: &ConverterConfig,
) -> ConversionResult {
    let request = ConversionRequest::new(
        kind,
        FilePath::new(source.as_ref()),
        FilePath::new(destination.as_ref()),
    );
    execute(&request, config)
}

// ── Operations ───────────────────────────────────────────────────────────

fn dispatch(
    request: &ConversionRequest,
    config: &ConverterConfig,
    progress: &Progress,
) -> Result<Vec<PathBuf>, ConvertError> {
    let src = request.source.path();
    let dst = request.destination.path();
    match request.kind {
        OperationKind::PdfToDocx => run_pdf_to_docx(src, dst, config, progress).map(|p| vec![p]),
        OperationKind::DocxToPdf => run_docx_to_pdf(src, dst, config, progress).map(|p| vec![p]),
        OperationKind::ExtractImages => run_extract_images(src, dst, config, progress),
        OperationKind::JpegToJpg => run_jpeg_to_jpg(src, dst, config, progress).map(|p| vec![p]),
    }
}

fn run_pdf_to_docx(
    src: &Path,
    dst: &Path,
    config: &ConverterConfig,
    progress: &Progress,
) -> Result<PathBuf, ConvertError> {
    let doc = pdf::load(src)?;
    let pages = doc.get_pages();
    let total = pages.len();
    info!("PDF has {} page(s)", total);
    progress.start(OperationKind::PdfToDocx, total);

    let mut builder = DocxBuilder::new();
    for (step, (&page_no, &page_id)) in pages.iter().enumerate() {
        let raw = pdf_text::page_lines(&doc, page_id)
            .map_err(|e| ConvertError::corrupt_pdf(src, format!("page {page_no}: {e}")))?;
        let lines = postprocess::clean_lines(&raw);
        let images = if config.embed_images {
            decodable_images(&doc, page_no, page_id)
        } else {
            Vec::new()
        };
        debug!(
            "Page {}: {} line(s), {} image(s)",
            page_no,
            lines.len(),
            images.len()
        );
        builder.push_page(&lines, &images)?;
        progress.step(step + 1, total);
    }

    let bytes = builder.finish()?;
    write_output(dst, &bytes)?;
    Ok(dst.to_path_buf())
}

/// Images on a page that decode as RGB; the rest are logged and skipped.
fn decodable_images(doc: &Document, page_no: u32, page_id: ObjectId) -> Vec<RgbImage> {
    let xobjects = match xobject::page_image_xobjects(doc, page_id) {
        Ok(x) => x,
        Err(e) => {
            warn!("Page {}: cannot read image resources: {}", page_no, e);
            return Vec::new();
        }
    };
    xobjects
        .iter()
        .filter_map(|x| match xobject::decode_rgb(doc, page_no, x) {
            Ok(img) => Some(img),
            Err(e) => {
                warn!("Skipping image: {}", e);
                None
            }
        })
        .collect()
}

fn run_docx_to_pdf(
    src: &Path,
    dst: &Path,
    config: &ConverterConfig,
    progress: &Progress,
) -> Result<PathBuf, ConvertError> {
    let paragraphs = docx::read_paragraphs(src)?;
    let total = paragraphs.len();
    progress.start(OperationKind::DocxToPdf, total);

    let mut writer = TextPdfWriter::new(config.layout);
    for (i, paragraph) in paragraphs.iter().enumerate() {
        if paragraph.page_break_before {
            writer.page_break();
        }
        writer.write_paragraph(&paragraph.text);
        progress.step(i + 1, total);
    }

    let pages = writer.page_count();
    let bytes = writer.finish().map_err(|e| ConvertError::PdfRender {
        detail: e.to_string(),
    })?;
    info!("Laid out {} paragraph(s) on {} page(s)", total, pages);
    write_output(dst, &bytes)?;
    Ok(dst.to_path_buf())
}

fn run_extract_images(
    src: &Path,
    out_dir: &Path,
    config: &ConverterConfig,
    progress: &Progress,
) -> Result<Vec<PathBuf>, ConvertError> {
    let doc = pdf::load(src)?;
    std::fs::create_dir_all(out_dir).map_err(|e| ConvertError::write_failed(out_dir, e))?;

    let pages = doc.get_pages();
    let total = pages.len();
    progress.start(OperationKind::ExtractImages, total);

    let mut outputs: Vec<PathBuf> = Vec::new();
    for (step, (&page_no, &page_id)) in pages.iter().enumerate() {
        let xobjects = xobject::page_image_xobjects(&doc, page_id)
            .map_err(|e| ConvertError::corrupt_pdf(src, format!("page {page_no}: {e}")))?;

        // One name per page: later images on the same page overwrite earlier ones.
        for x in &xobjects {
            let img = xobject::decode_rgb(&doc, page_no, x)?;
            let out = out_dir.join(format!("image_{page_no}.jpg"));
            let bytes = raster::encode_jpeg(&img, config.jpeg_quality).map_err(|source| {
                ConvertError::ImageEncode {
                    path: out.clone(),
                    source,
                }
            })?;
            write_output(&out, &bytes)?;
            debug!("Saved {} ({}x{})", out.display(), img.width(), img.height());
            if !outputs.contains(&out) {
                outputs.push(out);
            }
        }
        progress.step(step + 1, total);
    }

    info!("Extracted {} image file(s) into {}", outputs.len(), out_dir.display());
    Ok(outputs)
}

fn run_jpeg_to_jpg(
    src: &Path,
    dst: &Path,
    config: &ConverterConfig,
    progress: &Progress,
) -> Result<PathBuf, ConvertError> {
    progress.start(OperationKind::JpegToJpg, 1);
    let img = raster::decode_sniffed(src).map_err(|source| ConvertError::ImageDecode {
        path: src.to_path_buf(),
        source,
    })?;
    debug!("Decoded {} as {:?}", src.display(), img.color());

    let rgb = raster::to_rgb(&img);
    let bytes =
        raster::encode_jpeg(&rgb, config.jpeg_quality).map_err(|source| ConvertError::ImageEncode {
            path: dst.to_path_buf(),
            source,
        })?;
    write_output(dst, &bytes)?;
    progress.step(1, 1);
    Ok(dst.to_path_buf())
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    std::fs::write(path, bytes).map_err(|e| ConvertError::write_failed(path, e))
}
