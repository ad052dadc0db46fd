//! Raster helpers on top of the `image` crate: content-sniffed decoding and
//! in-memory encoding.
//!
//! Encoders never see the source file's ancillary chunks or segments, so
//! anything produced here carries pixels only.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader, ImageResult, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// Decode `path`, trusting its content over its extension.
pub fn decode_sniffed(path: &Path) -> ImageResult<DynamicImage> {
    ImageReader::open(path)?.with_guessed_format()?.decode()
}

/// JPEG has no alpha channel and this encoder takes 8-bit samples only.
pub fn to_rgb(img: &DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Baseline JPEG at `quality` (1–100).
pub fn encode_jpeg(img: &RgbImage, quality: u8) -> ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).encode_image(img)?;
    Ok(buf)
}

pub fn encode_png(img: &RgbImage) -> ImageResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Re-encode `img` as `format`. JPEG output stays grayscale for 8-bit gray
/// sources and is flattened to RGB otherwise.
pub fn encode(img: &DynamicImage, format: ImageFormat, jpeg_quality: u8) -> ImageResult<Vec<u8>> {
    if format == ImageFormat::Jpeg {
        if let DynamicImage::ImageLuma8(gray) = img {
            let mut buf = Vec::new();
            JpegEncoder::new_with_quality(&mut buf, jpeg_quality.clamp(1, 100)).encode_image(gray)?;
            return Ok(buf);
        }
        return encode_jpeg(&to_rgb(img), jpeg_quality);
    }
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format)?;
    Ok(buf.into_inner())
}
