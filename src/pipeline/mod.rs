//! Pipeline stages behind the four conversion operations.
//!
//! Each submodule wraps one collaborator capability so the operations in
//! [`crate::convert`] stay a short sequence of calls, and each stage can be
//! tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! PDF → DOCX    input ──▶ pdf ──▶ pdf_text ──▶ postprocess ──┐
//!                              └─▶ xobject ──▶ raster ───────┴─▶ docx (write)
//!
//! DOCX → PDF    input ──▶ docx (read) ──▶ layout
//!
//! PDF → images  input ──▶ pdf ──▶ xobject ──▶ raster (JPEG)
//!
//! JPEG → JPG    input ──▶ raster (decode, RGB, JPEG)
//! ```
//!
//! 1. [`input`]:       existence check on the source path
//! 2. [`pdf`]:         `lopdf` loading, reference and resource resolution
//! 3. [`pdf_text`]:    text lines from a page content stream
//! 4. [`postprocess`]: whitespace and invisible-character cleanup
//! 5. [`xobject`]:     image XObject discovery and RGB decoding
//! 6. [`raster`]:      `image` decode/encode helpers
//! 7. [`docx`]:        `docx-rs` paragraph reader and writer
//! 8. [`layout`]:      word wrap, pagination and the text PDF writer

pub mod docx;
pub mod input;
pub mod layout;
pub mod pdf;
pub mod pdf_text;
pub mod postprocess;
pub mod raster;
pub mod xobject;
