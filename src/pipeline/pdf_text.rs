//! Text-line extraction from a page's content stream.
//!
//! Walks the text operators of the decoded content and groups shown strings
//! into lines by the vertical position of the text matrix. The current
//! transformation matrix is ignored, so rotated or scaled text still comes
//! out in stream order.
//!
//! Shown strings are decoded through the encoding of the font selected by
//! `Tf`, as `lopdf` resolves it (`/Encoding` name or `/ToUnicode` CMap).
//! Strings shown without a usable font encoding fall back to PDF text-string
//! decoding: UTF-16BE or UTF-8 with a byte-order mark, PDFDocEncoding
//! otherwise.

use super::pdf::number;
use lopdf::content::Content;
use lopdf::{Document, Encoding, Object, ObjectId};
use std::collections::BTreeMap;
use tracing::debug;

/// Font resource name → text encoding, for the fonts of one page.
pub type FontEncodings<'a> = BTreeMap<Vec<u8>, Encoding<'a>>;

/// Vertical movement (text space units) below which two shows share a line.
const SAME_LINE_EPSILON: f32 = 0.5;

/// `TJ` adjustment (thousandths of an em) wide enough to read as a space.
const TJ_SPACE_THRESHOLD: f32 = 250.0;

/// Extract the text lines of one page, top to bottom in stream order.
pub fn page_lines(doc: &Document, page_id: ObjectId) -> lopdf::Result<Vec<String>> {
    let encodings = page_font_encodings(doc, page_id)?;
    let data = doc.get_page_content(page_id)?;
    let content = Content::decode(&data)?;
    Ok(lines_from_content(&content, &encodings))
}

/// Encodings of the fonts in a page's (possibly inherited) resources. Fonts
/// whose encoding `lopdf` cannot resolve are left out.
pub fn page_font_encodings(doc: &Document, page_id: ObjectId) -> lopdf::Result<FontEncodings<'_>> {
    let mut encodings = FontEncodings::new();
    for (name, font) in doc.get_page_fonts(page_id)? {
        if !font.type_is(b"Font") {
            continue;
        }
        match font.get_font_encoding(doc) {
            Ok(encoding) => {
                encodings.insert(name, encoding);
            }
            Err(e) => debug!(
                "No usable encoding for font {}: {}",
                String::from_utf8_lossy(&name),
                e
            ),
        }
    }
    Ok(encodings)
}

/// Line grouping over already-decoded operations.
pub fn lines_from_content(content: &Content, encodings: &FontEncodings<'_>) -> Vec<String> {
    let mut state = TextState::default();
    let mut font: Option<&Encoding<'_>> = None;

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => state.begin_text(),
            "Tf" => {
                font = operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .and_then(|name| encodings.get(name));
            }
            "Tm" => {
                if let (Some(e), Some(f)) = (
                    operands.get(4).and_then(number),
                    operands.get(5).and_then(number),
                ) {
                    state.set_position(e, f);
                }
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (
                    operands.first().and_then(number),
                    operands.get(1).and_then(number),
                ) {
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_by(tx, ty);
                }
            }
            "TL" => {
                if let Some(tl) = operands.first().and_then(number) {
                    state.leading = tl;
                }
            }
            "T*" => state.next_line(),
            "Tj" => {
                if let Some(obj) = operands.first() {
                    state.show(obj, font);
                }
            }
            "'" => {
                state.next_line();
                if let Some(obj) = operands.first() {
                    state.show(obj, font);
                }
            }
            "\"" => {
                state.next_line();
                if let Some(obj) = operands.get(2) {
                    state.show(obj, font);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    state.show_array(items, font);
                }
            }
            _ => {}
        }
    }

    state.finish()
}

#[derive(Default)]
struct TextState {
    x: f32,
    y: f32,
    leading: f32,
    /// y of the line currently being collected.
    line_y: Option<f32>,
    /// The text position moved sideways since the last show.
    moved_right: bool,
    current: String,
    lines: Vec<String>,
}

impl TextState {
    fn begin_text(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
    }

    fn set_position(&mut self, x: f32, y: f32) {
        if x > self.x {
            self.moved_right = true;
        }
        self.x = x;
        self.y = y;
    }

    fn move_by(&mut self, tx: f32, ty: f32) {
        self.set_position(self.x + tx, self.y + ty);
    }

    fn next_line(&mut self) {
        self.x = 0.0;
        self.y -= self.leading;
        // Force a break even when leading is zero.
        self.flush();
    }

    fn show(&mut self, obj: &Object, font: Option<&Encoding<'_>>) {
        if let Object::String(..) = obj {
            self.position_for_show();
            self.current.push_str(&decode_shown(obj, font));
        }
    }

    fn show_array(&mut self, items: &[Object], font: Option<&Encoding<'_>>) {
        self.position_for_show();
        for item in items {
            match item {
                Object::String(..) => self.current.push_str(&decode_shown(item, font)),
                other => {
                    if number(other).is_some_and(|n| n < -TJ_SPACE_THRESHOLD) {
                        self.push_space();
                    }
                }
            }
        }
    }

    fn position_for_show(&mut self) {
        match self.line_y {
            Some(y) if (y - self.y).abs() > SAME_LINE_EPSILON => self.flush(),
            Some(_) if self.moved_right => self.push_space(),
            _ => {}
        }
        self.line_y = Some(self.y);
        self.moved_right = false;
    }

    fn push_space(&mut self) {
        if !self.current.is_empty() && !self.current.ends_with(char::is_whitespace) {
            self.current.push(' ');
        }
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
        self.line_y = None;
        self.moved_right = false;
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.lines
    }
}

/// Decode a shown string operand with the current font's encoding.
fn decode_shown(obj: &Object, font: Option<&Encoding<'_>>) -> String {
    let Object::String(bytes, _) = obj else {
        return String::new();
    };
    if let Some(encoding) = font {
        match Document::decode_text(encoding, bytes) {
            Ok(text) => return text,
            Err(e) => debug!("Font encoding could not decode string: {}", e),
        }
    }
    lopdf::decode_text_string(obj)
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control() || *c == '\t')
        .collect()
}
