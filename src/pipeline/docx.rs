//! DOCX on both sides of the pipeline.
//!
//! Both directions use `docx-rs`. Reading walks the parsed document body
//! paragraph by paragraph; writing emits one paragraph per extracted line
//! with a page break run at the start of every page after the first.

use crate::error::ConvertError;
use docx_rs::{
    read_docx, Break, BreakType, Document, DocumentChild, Docx, InsertChild, MoveToChild,
    Paragraph, ParagraphChild, Pic, Run, RunChild,
};
use image::RgbImage;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// EMU per pixel at 96 dpi.
const EMU_PER_PX: u32 = 9525;

/// Widest image placed in the body: 6 in, the text width of a Letter/A4 page
/// with default Word margins.
const MAX_IMAGE_WIDTH_EMU: u32 = 6 * 914_400;

/// One body paragraph in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocParagraph {
    pub text: String,
    /// A hard page break precedes this paragraph.
    pub page_break_before: bool,
}

// ── Reading ──────────────────────────────────────────────────────────────────

/// Read the body paragraphs of the DOCX at `path`.
pub fn read_paragraphs(path: &Path) -> Result<Vec<DocParagraph>, ConvertError> {
    let fail = |detail: String| ConvertError::DocxRead {
        path: path.to_path_buf(),
        detail,
    };
    let bytes = std::fs::read(path).map_err(|e| fail(e.to_string()))?;
    let docx = read_docx(&bytes).map_err(|e| fail(e.to_string()))?;
    let paragraphs = body_paragraphs(&docx.document);
    debug!(
        "Read {} paragraph(s) from {}",
        paragraphs.len(),
        path.display()
    );
    Ok(paragraphs)
}

/// Top-level body paragraphs in document order.
///
/// Tables, text boxes and other drawings are skipped, as are deleted runs
/// and field instructions. Inserted and hyperlinked runs count as text. A
/// tab becomes `\t`, a line or column break `\n`, and a page break either
/// flags the paragraph or, if text precedes it, splits the paragraph there.
pub fn body_paragraphs(document: &Document) -> Vec<DocParagraph> {
    let mut out = Vec::new();
    for child in &document.children {
        if let DocumentChild::Paragraph(p) = child {
            collect_paragraph(p, &mut out);
        }
    }
    out
}

fn collect_paragraph(paragraph: &Paragraph, out: &mut Vec<DocParagraph>) {
    let mut runs = Vec::new();
    collect_runs(&paragraph.children, &mut runs);

    let page_break = Break::new(BreakType::Page);
    let mut current = DocParagraph {
        text: String::new(),
        page_break_before: paragraph.property.page_break_before.unwrap_or(false),
    };
    for run in runs {
        for child in &run.children {
            match child {
                RunChild::Text(t) => current.text.push_str(&t.text),
                RunChild::Tab(_) => current.text.push('\t'),
                RunChild::CarriageReturn(_) => current.text.push('\n'),
                RunChild::Break(b) if *b == page_break => {
                    if !current.text.is_empty() {
                        out.push(std::mem::take(&mut current));
                    }
                    current.page_break_before = true;
                }
                RunChild::Break(_) => current.text.push('\n'),
                _ => {}
            }
        }
    }
    out.push(current);
}

fn collect_runs<'a>(children: &'a [ParagraphChild], runs: &mut Vec<&'a Run>) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => runs.push(&**run),
            ParagraphChild::Insert(insert) => {
                runs.extend(insert.children.iter().filter_map(|c| match c {
                    InsertChild::Run(run) => Some(&**run),
                    _ => None,
                }));
            }
            ParagraphChild::MoveTo(moved) => {
                runs.extend(moved.children.iter().filter_map(|c| match c {
                    MoveToChild::Run(run) => Some(&**run),
                    _ => None,
                }));
            }
            ParagraphChild::Hyperlink(link) => collect_runs(&link.children, runs),
            _ => {}
        }
    }
}

// ── Writing ──────────────────────────────────────────────────────────────────

/// Accumulates pages of text lines and images into a DOCX body.
#[derive(Default)]
pub struct DocxBuilder {
    paragraphs: Vec<Paragraph>,
    pages: usize,
    images: usize,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one source page: its text lines, then its images.
    pub fn push_page(&mut self, lines: &[String], images: &[RgbImage]) -> Result<(), ConvertError> {
        let mut pending_break = self.pages > 0;
        let mut start_paragraph = || {
            let p = Paragraph::new();
            if std::mem::take(&mut pending_break) {
                p.add_run(Run::new().add_break(BreakType::Page))
            } else {
                p
            }
        };

        let mut page = Vec::with_capacity(lines.len() + images.len() + 1);
        for line in lines {
            page.push(start_paragraph().add_run(Run::new().add_text(line)));
        }
        for img in images {
            let png = super::raster::encode_png(img).map_err(|e| ConvertError::DocxWrite {
                detail: format!("cannot embed image: {e}"),
            })?;
            let (w, h) = image_extent_emu(img.width(), img.height());
            page.push(start_paragraph().add_run(Run::new().add_image(Pic::new(&png).size(w, h))));
            self.images += 1;
        }
        if page.is_empty() && self.pages > 0 {
            // Blank source page: keep the break.
            page.push(start_paragraph());
        }

        self.paragraphs.extend(page);
        self.pages += 1;
        Ok(())
    }

    /// Pack the document into DOCX bytes.
    pub fn finish(self) -> Result<Vec<u8>, ConvertError> {
        debug!(
            "Packing DOCX: {} page(s), {} paragraph(s), {} image(s)",
            self.pages,
            self.paragraphs.len(),
            self.images
        );
        let docx = self
            .paragraphs
            .into_iter()
            .fold(Docx::new(), |doc, p| doc.add_paragraph(p));

        let mut cursor = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut cursor)
            .map_err(|e| ConvertError::DocxWrite {
                detail: e.to_string(),
            })?;
        Ok(cursor.into_inner())
    }
}

/// Display size for an image, scaled down to fit the text width.
fn image_extent_emu(width_px: u32, height_px: u32) -> (u32, u32) {
    let w = width_px.saturating_mul(EMU_PER_PX);
    let h = height_px.saturating_mul(EMU_PER_PX);
    if w <= MAX_IMAGE_WIDTH_EMU || w == 0 {
        return (w, h);
    }
    let scaled_h = (u64::from(h) * u64::from(MAX_IMAGE_WIDTH_EMU) / u64::from(w)) as u32;
    (MAX_IMAGE_WIDTH_EMU, scaled_h.max(1))
}
