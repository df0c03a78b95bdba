//! Signature widget annotation objects

use crate::allocator::ObjectAllocator;
use crate::appearance::AppearanceGenerator;
use crate::context::{page_tree_root, resolve_root, SignContext};
use crate::encode::{reference, text_string};
use crate::error::{Result, SigWidgetError};
use crate::flags;
use crate::page_locator::PageLocator;
use std::fmt::Write;
use tracing::{debug, instrument};

/// Builds the body of a signature field widget annotation
///
/// A visible widget carries the caller's rectangle and a normal appearance
/// stream. An invisible widget gets a zero rectangle plus tooltip and
/// alternate text so accessibility checkers can describe it.
pub struct AnnotationBuilder<'g, G: AppearanceGenerator + ?Sized> {
    appearance: &'g G,
}

impl<'g, G: AppearanceGenerator + ?Sized> AnnotationBuilder<'g, G> {
    pub fn new(appearance: &'g G) -> Self {
        Self { appearance }
    }

    /// Build the widget for page `page` (1-based)
    ///
    /// On success the catalog and host page references are recorded in
    /// `ctx`. On failure nothing is recorded and no bytes are returned.
    #[instrument(skip(self, ctx), fields(existing = ctx.existing_signatures()))]
    pub fn build<A: ObjectAllocator>(
        &self,
        ctx: &mut SignContext<'_, A>,
        visible: bool,
        page: u32,
        rect: [f64; 4],
    ) -> Result<Vec<u8>> {
        if visible && rect.iter().any(|c| !c.is_finite()) {
            return Err(SigWidgetError::InvalidRect(rect));
        }

        let doc = ctx.document();
        let (root_id, catalog) = resolve_root(doc)?;

        let host_page = match page_tree_root(catalog)? {
            Some(pages) => Some(PageLocator::new(doc).locate(pages, page)?.id),
            None => {
                debug!("catalog has no page tree, building a document-level field");
                None
            }
        };

        let appearance_id = if visible {
            let body = self
                .appearance
                .appearance(rect, ctx.allocator_mut())
                .map_err(|source| SigWidgetError::AppearanceGenerationFailed { source })?;
            let id = ctx
                .allocator_mut()
                .add_object(body)
                .map_err(|source| SigWidgetError::ObjectAllocationFailed { source })?;
            Some(id)
        } else {
            None
        };

        let mut out = String::from("<<\n");
        out.push_str("  /Type /Annot\n");
        out.push_str("  /Subtype /Widget\n");

        match appearance_id {
            Some(id) => {
                let _ = writeln!(
                    out,
                    "  /Rect [{} {} {} {}]",
                    rect[0], rect[1], rect[2], rect[3]
                );
                let _ = writeln!(out, "  /AP << /N {} 0 R >>", id);
            }
            None => {
                out.push_str("  /Rect [0 0 0 0]\n");
                let _ = writeln!(out, "  /TU {}", text_string(&ctx.config().tooltip));
                let _ = writeln!(out, "  /Alt {}", text_string(&ctx.config().alt_text));
            }
        }

        if let Some(page_id) = host_page {
            let _ = writeln!(out, "  /P {}", reference(page_id));
        }

        let _ = writeln!(out, "  /F {}", flags::SIGNATURE_WIDGET);
        out.push_str("  /FT /Sig\n");
        let title = ctx.config().title(ctx.existing_signatures());
        let _ = writeln!(out, "  /T {}", text_string(&title));
        let _ = writeln!(out, "  /V {} 0 R", ctx.signature_object_id());
        out.push_str(">>\n");

        ctx.record_refs(root_id, host_page);
        debug!(?host_page, ?appearance_id, %title, "built signature widget");

        Ok(out.into_bytes())
    }
}
