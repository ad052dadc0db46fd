//! Fixture builders shared by the integration tests.
//!
//! Everything is generated on the fly into a `tempfile` directory: PDFs with
//! `lopdf`, DOCX packages with `zip`, images with `image` and `png`.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

pub const PDF_AUTHOR: &str = "Jane Fixture";
pub const DOCX_AUTHOR: &str = "Alice Fixture";

/// A raw RGB image XObject of `width` × `height` filled with `rgb`.
pub struct FixtureImage {
    pub width: u32,
    pub height: u32,
    pub rgb: [u8; 3],
    /// Flate-compress the samples.
    pub compressed: bool,
}

impl FixtureImage {
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self {
            width,
            height,
            rgb,
            compressed: false,
        }
    }

    fn to_stream(&self) -> Stream {
        let samples: Vec<u8> = std::iter::repeat(self.rgb)
            .take((self.width * self.height) as usize)
            .flatten()
            .collect();
        let mut stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => self.width as i64,
                "Height" => self.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            samples,
        );
        if self.compressed {
            let _ = stream.compress();
        }
        stream
    }
}

/// One page of a fixture PDF.
#[derive(Default)]
pub struct FixturePage {
    pub lines: Vec<String>,
    pub images: Vec<FixtureImage>,
}

impl FixturePage {
    pub fn text(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            images: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: FixtureImage) -> Self {
        self.images.push(image);
        self
    }
}

/// Write a PDF with WinAnsi-encoded Helvetica text lines and image XObjects per page, plus an
/// `/Info` dictionary naming [`PDF_AUTHOR`].
pub fn write_pdf(path: &Path, pages: &[FixturePage]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids = Vec::new();
    for page in pages {
        let mut operations = Vec::new();
        let mut xobjects = lopdf::Dictionary::new();

        for (i, line) in page.lines.iter().enumerate() {
            let y = 750 - 20 * i as i64;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new("Td", vec![72.into(), y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(line.as_bytes().to_vec(), StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        for (i, image) in page.images.iter().enumerate() {
            let name = format!("Im{}", i + 1);
            let image_id = doc.add_object(image.to_stream());
            xobjects.set(name.as_bytes().to_vec(), image_id);
            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new(
                "cm",
                vec![100.into(), 0.into(), 0.into(), 100.into(), 72.into(), 300.into()],
            ));
            operations.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
            operations.push(Operation::new("Q", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
                "XObject" => xobjects,
            },
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Author" => Object::string_literal(PDF_AUTHOR),
        "Producer" => Object::string_literal("fixture-writer 1.0"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.save(path).unwrap();
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Write a DOCX package with one paragraph per entry, revision ids on every
/// paragraph and run, an rsid table in settings and [`DOCX_AUTHOR`] as
/// creator. A paragraph starting with `\u{000C}` gets a page break run.
pub fn write_docx(path: &Path, paragraphs: &[&str]) {
    let mut body = String::new();
    for text in paragraphs {
        let (page_break, text) = match text.strip_prefix('\u{000C}') {
            Some(rest) => (r#"<w:r><w:br w:type="page"/></w:r>"#, rest),
            None => ("", *text),
        };
        body.push_str(&format!(
            r#"<w:p w:rsidR="00AB12CD" w:rsidRDefault="00AB12CD">{page_break}<w:r w:rsidRPr="00112233"><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            xml_escape(text)
        ));
    }
    write_docx_body(path, &body);
}

/// Write a DOCX package around raw `w:body` content. The document element
/// declares the WordprocessingML, markup-compatibility, drawing and VML
/// namespaces.
pub fn write_docx_body(path: &Path, body: &str) {
    let parts: Vec<(&str, String)> = vec![
        (
            "[Content_Types].xml",
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
                r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
                r#"<Default Extension="xml" ContentType="application/xml"/>"#,
                r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
                r#"</Types>"#
            )
            .to_string(),
        ),
        (
            "_rels/.rels",
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
                r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
                r#"</Relationships>"#
            )
            .to_string(),
        ),
        (
            "word/document.xml",
            format!(
                concat!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                    r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#,
                    r#" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006""#,
                    r#" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing""#,
                    r#" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#,
                    r#" xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape""#,
                    r#" xmlns:v="urn:schemas-microsoft-com:vml""#,
                    r#" mc:Ignorable="wps">"#,
                    r#"<w:body>{}<w:sectPr w:rsidR="00AB12CD"/></w:body></w:document>"#
                ),
                body
            ),
        ),
        (
            "word/_rels/document.xml.rels",
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#
            )
            .to_string(),
        ),
        (
            "word/settings.xml",
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
                r#"<w:rsids><w:rsidRoot w:val="00AB12CD"/><w:rsid w:val="00112233"/></w:rsids>"#,
                r#"<w:defaultTabStop w:val="720"/></w:settings>"#
            )
            .to_string(),
        ),
        (
            "docProps/core.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/"><dc:creator>{DOCX_AUTHOR}</dc:creator><cp:lastModifiedBy>{DOCX_AUTHOR}</cp:lastModifiedBy><cp:revision>7</cp:revision></cp:coreProperties>"#
            ),
        ),
        (
            "docProps/app.xml",
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
                r#"<Application>Fixture Office</Application><Company>Fixture Corp</Company><TotalTime>42</TotalTime></Properties>"#
            )
            .to_string(),
        ),
    ];

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, content) in parts {
        writer.start_file(name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    let bytes = writer.finish().unwrap().into_inner();
    std::fs::write(path, bytes).unwrap();
}

/// Read one part of a zip package as text.
pub fn zip_part(path: &Path, name: &str) -> Option<String> {
    use std::io::Read;
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut part = archive.by_name(name).ok()?;
    let mut text = String::new();
    part.read_to_string(&mut text).unwrap();
    Some(text)
}

pub fn zip_names(path: &Path) -> Vec<String> {
    let file = std::fs::File::open(path).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    archive.file_names().map(str::to_string).collect()
}

/// Deterministic RGB gradient.
pub fn gradient(width: u32, height: u32) -> image::RgbImage {
    image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 20) as u8, (y * 30) as u8, ((x + y) * 10) as u8])
    })
}

/// Write an 8-bit RGB PNG carrying a `tEXt` chunk.
pub fn write_png_with_text(path: &Path, img: &image::RgbImage) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = png::Encoder::new(BufWriter::new(file), img.width(), img.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder
        .add_text_chunk("Author".to_string(), PDF_AUTHOR.to_string())
        .unwrap();
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(img.as_raw()).unwrap();
}

/// Write a JPEG with an `Exif` APP1 segment right after SOI.
pub fn write_jpeg_with_exif(path: &Path, img: &image::RgbImage) {
    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 90)
        .encode_image(img)
        .unwrap();

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(b"MM\0\x2a\0\0\0\x08\0\0\0\0\0\0");
    payload.extend_from_slice(PDF_AUTHOR.as_bytes());
    let mut segment = vec![0xFF, 0xE1];
    segment.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    segment.extend_from_slice(&payload);
    jpeg.splice(2..2, segment);

    std::fs::write(path, jpeg).unwrap();
}

/// Huffman codes (code, length) for DC categories 0..=11, from the standard
/// luminance DC table.
const DC_CODES: [(u16, u8); 12] = [
    (0b00, 2),
    (0b010, 3),
    (0b011, 3),
    (0b100, 3),
    (0b101, 3),
    (0b110, 3),
    (0b1110, 4),
    (0b11110, 5),
    (0b111110, 6),
    (0b1111110, 7),
    (0b11111110, 8),
    (0b111111110, 9),
];

/// Write a baseline four-component (CMYK) JPEG, 8 px high and `blocks_wide`
/// × 8 px wide. Every block is flat; the four channels sit at different
/// levels. `image` cannot encode CMYK, so the stream is assembled by hand.
pub fn write_cmyk_jpeg(path: &Path, blocks_wide: u16) {
    // DC coefficients per channel; sample level is 128 + dc / 8.
    const DC: [i16; 4] = [64, -64, 0, 32];

    let mut jpeg = vec![0xFF, 0xD8];

    // DQT: table 0, all ones.
    jpeg.extend_from_slice(&[0xFF, 0xDB, 0x00, 67, 0x00]);
    jpeg.extend_from_slice(&[1; 64]);

    // SOF0: 8-bit, 4 components, no subsampling, all on table 0.
    jpeg.extend_from_slice(&[0xFF, 0xC0, 0x00, 20, 8, 0x00, 8]);
    jpeg.extend_from_slice(&(blocks_wide * 8).to_be_bytes());
    jpeg.push(4);
    for id in 1..=4u8 {
        jpeg.extend_from_slice(&[id, 0x11, 0x00]);
    }

    // DHT: DC table 0 (standard luminance), AC table 0 with EOB as `00`.
    jpeg.extend_from_slice(&[0xFF, 0xC4, 0x00, 50, 0x00]);
    jpeg.extend_from_slice(&[0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0]);
    jpeg.extend_from_slice(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
    jpeg.push(0x10);
    jpeg.extend_from_slice(&[0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    jpeg.extend_from_slice(&[0x00, 0x01]);

    // SOS: all four components interleaved.
    jpeg.extend_from_slice(&[0xFF, 0xDA, 0x00, 14, 4]);
    for id in 1..=4u8 {
        jpeg.extend_from_slice(&[id, 0x00]);
    }
    jpeg.extend_from_slice(&[0, 63, 0]);

    let mut bits = BitWriter::default();
    let mut previous = [0i16; 4];
    for _ in 0..blocks_wide {
        for (channel, &dc) in DC.iter().enumerate() {
            let diff = dc - previous[channel];
            previous[channel] = dc;
            let category = (16 - diff.unsigned_abs().leading_zeros()) as u8;
            let (code, len) = DC_CODES[category as usize];
            bits.put(code, len);
            if category > 0 {
                let magnitude = if diff < 0 { diff - 1 } else { diff };
                bits.put(magnitude as u16 & ((1 << category) - 1), category);
            }
            // EOB: no AC coefficients.
            bits.put(0b00, 2);
        }
    }
    jpeg.extend(bits.finish());

    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    std::fs::write(path, jpeg).unwrap();
}

/// MSB-first entropy-coded segment writer with `0xFF` byte stuffing.
#[derive(Default)]
struct BitWriter {
    out: Vec<u8>,
    acc: u32,
    len: u8,
}

impl BitWriter {
    fn put(&mut self, value: u16, len: u8) {
        self.acc = (self.acc << len) | u32::from(value);
        self.len += len;
        while self.len >= 8 {
            self.len -= 8;
            let byte = (self.acc >> self.len) as u8;
            self.out.push(byte);
            if byte == 0xFF {
                self.out.push(0x00);
            }
        }
        self.acc &= (1 << self.len) - 1;
    }

    fn finish(mut self) -> Vec<u8> {
        if self.len > 0 {
            let pad = 8 - self.len;
            self.put((1 << pad) - 1, pad);
        }
        self.out
    }
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Extracted text lines of every page, in order.
pub fn pdf_lines(path: &Path) -> Vec<Vec<String>> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| anyfile_convert::pipeline::pdf_text::page_lines(&doc, id).unwrap())
        .collect()
}
