//! Shared `lopdf` helpers: loading, reference resolution, inherited resources.

use crate::error::ConvertError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::path::Path;
use tracing::debug;

/// Guard against cyclic `/Parent` chains in malformed page trees.
const MAX_TREE_DEPTH: usize = 32;

/// Load a PDF from disk, mapping parse failures to [`ConvertError::CorruptPdf`].
pub fn load(path: &Path) -> Result<Document, ConvertError> {
    let doc = Document::load(path).map_err(|e| ConvertError::corrupt_pdf(path, e))?;
    debug!(
        "Loaded PDF {} (version {}, {} objects)",
        path.display(),
        doc.version,
        doc.objects.len()
    );
    Ok(doc)
}

/// Follow an indirect reference (one or more hops) to the object it names.
pub fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> lopdf::Result<&'a Object> {
    let mut current = obj;
    for _ in 0..MAX_TREE_DEPTH {
        match current {
            Object::Reference(id) => current = doc.get_object(*id)?,
            other => return Ok(other),
        }
    }
    Ok(current)
}

/// Look up `key` in `dict` and resolve it.
pub fn get_resolved<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> lopdf::Result<&'a Object> {
    resolve(doc, dict.get(key)?)
}

/// The resource dictionary in effect for a page, walking up `/Parent` for
/// inherited resources. `None` when neither the page nor any ancestor has one.
pub fn page_resources(doc: &Document, page_id: ObjectId) -> lopdf::Result<Option<&Dictionary>> {
    let mut node = doc.get_dictionary(page_id)?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(resources) = node.get(b"Resources") {
            return resolve(doc, resources)?.as_dict().map(Some);
        }
        match node.get(b"Parent") {
            Ok(parent) => node = resolve(doc, parent)?.as_dict()?,
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

/// Numeric operand as `f32`, for integers and reals alike.
pub fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}
