//! Page-based text layout: wrap paragraphs into lines, lines into pages, and
//! serialise the result as a PDF.
//!
//! The font is the standard Type 1 Courier, so every glyph advances 0.6 em
//! and wrapping reduces to counting characters. Text is written with
//! `WinAnsiEncoding`; characters the encoding cannot represent become `?`.

use crate::config::{PageLayout, PT_PER_MM};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use tracing::debug;

/// Courier glyph advance as a fraction of the font size.
const COURIER_ADVANCE_EM: f32 = 0.6;

/// Baseline offset below the vertical centre of a line, in font-size units.
const BASELINE_SHIFT_EM: f32 = 0.3;

const FONT_RESOURCE: &str = "F1";

/// Accumulates wrapped lines onto pages.
pub struct TextPdfWriter {
    layout: PageLayout,
    /// Per page: (top of line in mm from the page top, text).
    pages: Vec<Vec<(f32, String)>>,
    cursor_mm: f32,
}

impl TextPdfWriter {
    /// Start a document with one empty page.
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            pages: vec![Vec::new()],
            cursor_mm: layout.margin_mm,
        }
    }

    /// Characters that fit on one line.
    pub fn chars_per_line(&self) -> usize {
        let usable_pt = self.layout.text_width_mm() * PT_PER_MM;
        let advance_pt = COURIER_ADVANCE_EM * self.layout.font_size_pt;
        ((usable_pt / advance_pt).floor() as usize).max(1)
    }

    pub fn add_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor_mm = self.layout.margin_mm;
    }

    /// Start a new page unless the current one is still empty.
    pub fn page_break(&mut self) {
        if self.pages.last().is_some_and(|p| !p.is_empty()) {
            self.add_page();
        }
    }

    /// Append one paragraph. An empty paragraph still takes one line.
    pub fn write_paragraph(&mut self, text: &str) {
        for line in wrap(text, self.chars_per_line()) {
            self.write_line(line);
        }
    }

    fn write_line(&mut self, line: String) {
        if self.cursor_mm + self.layout.line_height_mm > self.layout.break_at_mm() {
            self.add_page();
        }
        if let Some(page) = self.pages.last_mut() {
            page.push((self.cursor_mm, line));
        }
        self.cursor_mm += self.layout.line_height_mm;
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialise all pages into PDF bytes.
    pub fn finish(self) -> lopdf::Result<Vec<u8>> {
        let layout = self.layout;
        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { FONT_RESOURCE => font_id },
        });

        let font_mm = layout.font_size_pt / PT_PER_MM;
        let x_pt = layout.margin_mm * PT_PER_MM;
        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());

        for lines in &self.pages {
            let mut operations = Vec::with_capacity(lines.len() * 5);
            for (top_mm, text) in lines {
                if text.is_empty() {
                    continue;
                }
                let baseline_mm = top_mm + layout.line_height_mm / 2.0 + BASELINE_SHIFT_EM * font_mm;
                let y_pt = (layout.height_mm - baseline_mm) * PT_PER_MM;
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![FONT_RESOURCE.into(), layout.font_size_pt.into()],
                ));
                operations.push(Operation::new("Td", vec![x_pt.into(), y_pt.into()]));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    (layout.width_mm * PT_PER_MM).into(),
                    (layout.height_mm * PT_PER_MM).into(),
                ],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        debug!("Laid out {} page(s), {} bytes", count, bytes.len());
        Ok(bytes)
    }
}

/// Greedy word wrap at `width` characters.
///
/// Embedded newlines start new lines, words longer than a line are split,
/// and an empty input yields a single empty line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for segment in text.split('\n') {
        let mut line = String::new();
        let mut line_len = 0usize;

        for word in segment.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            if line_len > 0 && line_len + 1 + word.len() > width {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            while word.len() > width {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            if word.is_empty() {
                continue;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line_len += word.len();
            line.extend(word);
        }

        lines.push(line);
    }
    lines
}

/// Characters WinAnsiEncoding places in 0x80..=0x9F, in code order. Unused
/// codes hold `None`.
const WIN_ANSI_HIGH: [Option<char>; 32] = [
    Some('€'),
    None,
    Some('‚'),
    Some('ƒ'),
    Some('„'),
    Some('…'),
    Some('†'),
    Some('‡'),
    Some('ˆ'),
    Some('‰'),
    Some('Š'),
    Some('‹'),
    Some('Œ'),
    None,
    Some('Ž'),
    None,
    None,
    Some('‘'),
    Some('’'),
    Some('“'),
    Some('”'),
    Some('•'),
    Some('–'),
    Some('—'),
    Some('˜'),
    Some('™'),
    Some('š'),
    Some('›'),
    Some('œ'),
    None,
    Some('ž'),
    Some('Ÿ'),
];

/// Single-byte encoding for the standard fonts.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match u32::from(c) {
        // C1 controls share their codes with the table above.
        0x80..=0x9F => b'?',
        code @ (0x00..=0x7F | 0xA0..=0xFF) => code as u8,
        _ => WIN_ANSI_HIGH
            .iter()
            .position(|&mapped| mapped == Some(c))
            .map_or(b'?', |i| 0x80 + i as u8),
    }
}
