//! Image XObjects: discovery in page resources and decoding to RGB buffers.
//!
//! Only `/DeviceRGB` images with 8 bits per component are decoded. Stream
//! filters `lopdf` can undo (Flate, LZW, ASCII85 …) are undone, then the
//! sample count must match `/Width` × `/Height` × 3 exactly. Any other colour
//! space or bit depth fails with [`ConvertError::ImageData`] rather than
//! being reinterpreted as RGB.

use super::pdf::{get_resolved, page_resources, resolve};
use crate::error::ConvertError;
use image::RgbImage;
use lopdf::{Document, Object, ObjectId, Stream};
use tracing::debug;

/// An image XObject found on a page, before decoding.
pub struct ImageXObject<'a> {
    /// Resource name, e.g. `Im1`.
    pub name: String,
    pub stream: &'a Stream,
}

/// All image XObjects in the page's (possibly inherited) resources, in
/// resource-dictionary order.
pub fn page_image_xobjects(
    doc: &Document,
    page_id: ObjectId,
) -> lopdf::Result<Vec<ImageXObject<'_>>> {
    let Some(resources) = page_resources(doc, page_id)? else {
        return Ok(Vec::new());
    };
    let Ok(xobjects) = get_resolved(doc, resources, b"XObject") else {
        return Ok(Vec::new());
    };

    let mut found = Vec::new();
    for (name, obj) in xobjects.as_dict()?.iter() {
        let Ok(stream) = resolve(doc, obj)?.as_stream() else {
            continue;
        };
        if is_image(stream) {
            found.push(ImageXObject {
                name: String::from_utf8_lossy(name).into_owned(),
                stream,
            });
        }
    }
    Ok(found)
}

fn is_image(stream: &Stream) -> bool {
    matches!(stream.dict.get(b"Subtype"), Ok(Object::Name(n)) if n == b"Image")
}

/// Decode an image XObject's samples as an 8-bit RGB buffer.
///
/// `page` is 1-based and only used for error context.
pub fn decode_rgb(
    doc: &Document,
    page: u32,
    xobject: &ImageXObject<'_>,
) -> Result<RgbImage, ConvertError> {
    let fail = |detail: String| ConvertError::ImageData {
        page,
        name: xobject.name.clone(),
        detail,
    };
    let dict = &xobject.stream.dict;

    let dimension = |key: &[u8]| -> Result<u32, ConvertError> {
        get_resolved(doc, dict, key)
            .and_then(Object::as_i64)
            .ok()
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v > 0)
            .ok_or_else(|| {
                fail(format!(
                    "missing or invalid /{}",
                    String::from_utf8_lossy(key)
                ))
            })
    };
    let width = dimension(b"Width")?;
    let height = dimension(b"Height")?;

    match get_resolved(doc, dict, b"ColorSpace").and_then(Object::as_name) {
        Ok(b"DeviceRGB") => {}
        Ok(other) => {
            return Err(fail(format!(
                "unsupported colour space /{}",
                String::from_utf8_lossy(other)
            )))
        }
        Err(_) => return Err(fail("missing or non-device /ColorSpace".into())),
    }
    match get_resolved(doc, dict, b"BitsPerComponent").and_then(Object::as_i64) {
        Ok(8) => {}
        Ok(bits) => return Err(fail(format!("unsupported /BitsPerComponent {bits}"))),
        Err(_) => return Err(fail("missing /BitsPerComponent".into())),
    }

    let samples = if dict.has(b"Filter") {
        xobject
            .stream
            .decompressed_content()
            .map_err(|e| fail(format!("cannot undo stream filter: {e}")))?
    } else {
        xobject.stream.content.clone()
    };

    let expected = width as usize * height as usize * 3;
    if samples.len() != expected {
        return Err(fail(format!(
            "{} bytes of samples, expected {} for {}x{} RGB",
            samples.len(),
            expected,
            width,
            height
        )));
    }

    debug!(
        "Decoded image {} on page {} → {}x{} px",
        xobject.name, page, width, height
    );
    RgbImage::from_raw(width, height, samples)
        .ok_or_else(|| fail("sample buffer does not match dimensions".into()))
}
