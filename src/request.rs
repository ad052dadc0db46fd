//! Operation kinds and the request value handed to [`crate::convert::execute`].

use crate::format::FilePath;
use std::fmt;

/// The four conversion routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    PdfToDocx,
    DocxToPdf,
    ExtractImages,
    JpegToJpg,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::PdfToDocx,
        OperationKind::DocxToPdf,
        OperationKind::ExtractImages,
        OperationKind::JpegToJpg,
    ];

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            OperationKind::PdfToDocx => "Convert PDF to DOCX",
            OperationKind::DocxToPdf => "Convert DOCX to PDF",
            OperationKind::ExtractImages => "Extract Images from PDF",
            OperationKind::JpegToJpg => "Convert JPEG to JPG",
        }
    }

    pub fn source_prompt(self) -> &'static str {
        match self {
            OperationKind::PdfToDocx | OperationKind::ExtractImages => "Enter the PDF file path: ",
            OperationKind::DocxToPdf => "Enter the DOCX file path: ",
            OperationKind::JpegToJpg => "Enter the JPEG file path: ",
        }
    }

    pub fn destination_prompt(self) -> &'static str {
        match self {
            OperationKind::PdfToDocx => "Enter the output DOCX file path: ",
            OperationKind::DocxToPdf => "Enter the output PDF file path: ",
            OperationKind::ExtractImages => "Enter the output folder for images: ",
            OperationKind::JpegToJpg => "Enter the output JPG file path: ",
        }
    }

    /// Line printed after a successful run.
    pub fn success_message(self, destination: &FilePath) -> String {
        match self {
            OperationKind::PdfToDocx => format!("PDF successfully converted to DOCX: {destination}"),
            OperationKind::DocxToPdf => format!("DOCX successfully converted to PDF: {destination}"),
            OperationKind::ExtractImages => format!("Images successfully extracted to: {destination}"),
            OperationKind::JpegToJpg => format!("JPEG successfully converted to JPG: {destination}"),
        }
    }

    /// Prefix of the line printed when a run fails.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            OperationKind::PdfToDocx => "Error converting PDF to DOCX",
            OperationKind::DocxToPdf => "Error converting DOCX to PDF",
            OperationKind::ExtractImages => "Error extracting images from PDF",
            OperationKind::JpegToJpg => "Error converting JPEG to JPG",
        }
    }

    /// Whether outputs of this operation go through the metadata sanitizer.
    ///
    /// Extracted images are written as-is.
    pub fn sanitizes_output(self) -> bool {
        !matches!(self, OperationKind::ExtractImages)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationKind::PdfToDocx => "PDF → DOCX",
            OperationKind::DocxToPdf => "DOCX → PDF",
            OperationKind::ExtractImages => "PDF → images",
            OperationKind::JpegToJpg => "JPEG → JPG",
        };
        f.write_str(s)
    }
}

/// One conversion to run: where from, where to, and how.
///
/// For [`OperationKind::ExtractImages`] the destination is a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub source: FilePath,
    pub destination: FilePath,
    pub kind: OperationKind,
}

impl ConversionRequest {
    pub fn new(kind: OperationKind, source: FilePath, destination: FilePath) -> Self {
        Self {
            source,
            destination,
            kind,
        }
    }
}
