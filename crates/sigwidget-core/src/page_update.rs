//! Revised page objects for incremental updates

use crate::context::{page_tree_root, resolve_root};
use crate::encode::{encode_object, reference, write_name};
use crate::error::{Result, SigWidgetError};
use crate::page_locator::PageLocator;
use lopdf::{Document, Object};
use std::fmt::Write;
use tracing::{debug, instrument, warn};

/// Re-serializes a page with one extra entry in its `/Annots` array
///
/// Every other key keeps its position and value. References stay
/// indirect references, so the revised page points at exactly the same
/// objects as the original plus the new annotation.
pub struct IncrementalPageUpdater<'a> {
    doc: &'a Document,
}

impl<'a> IncrementalPageUpdater<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }

    /// Body of page `page` (1-based) with `annotation_id` appended to `/Annots`
    #[instrument(skip(self))]
    pub fn revise(&self, page: u32, annotation_id: u32) -> Result<Vec<u8>> {
        let (_, catalog) = resolve_root(self.doc)?;
        let pages = page_tree_root(catalog)?.ok_or(SigWidgetError::PageNotFound(page))?;
        let located = PageLocator::new(self.doc).locate(pages, page)?;
        let new_annot = reference((annotation_id, 0));

        let mut out = String::from("<<\n");
        let mut has_annots = false;

        for (key, value) in located.dict.iter() {
            if key.as_slice() == b"Annots" {
                has_annots = true;
                out.push_str("  /Annots [\n");
                for entry in self.annotation_entries(value)? {
                    let _ = writeln!(out, "    {}", entry);
                }
                let _ = writeln!(out, "    {}", new_annot);
                out.push_str("  ]\n");
                continue;
            }

            out.push_str("  ");
            write_name(&mut out, key);
            out.push(' ');
            out.push_str(&encode_object(value)?);
            out.push('\n');
        }

        if !has_annots {
            let _ = writeln!(out, "  /Annots [{}]", new_annot);
        }
        out.push_str(">>\n");

        debug!(page = ?located.id, annotation_id, "revised page");
        Ok(out.into_bytes())
    }

    /// Existing `/Annots` entries in order, each rendered as written
    ///
    /// An indirect array is resolved so its entries can be extended in place.
    /// A reference to a missing object reads as null.
    fn annotation_entries(&self, value: &Object) -> Result<Vec<String>> {
        let resolved = match value {
            Object::Reference(id) => match self.doc.get_object(*id) {
                Ok(obj) => obj,
                Err(e) => {
                    warn!(annots = ?id, error = %e, "page /Annots reference is dangling");
                    return Ok(Vec::new());
                }
            },
            direct => direct,
        };
        match resolved {
            Object::Array(items) => items.iter().map(encode_object).collect(),
            Object::Null => Ok(Vec::new()),
            other => {
                warn!(value = ?other, "page /Annots is not an array, replacing it");
                Ok(Vec::new())
            }
        }
    }
}
