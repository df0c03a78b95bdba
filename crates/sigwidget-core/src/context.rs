//! Signing session state threaded through the widget builders

use crate::allocator::{ObjectAllocator, SessionAllocator};
use crate::config::FieldConfig;
use crate::error::{Result, SigWidgetError};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeSet;

/// State of one signing operation over a parsed base document
///
/// The base document is only read. New object numbers come from the
/// allocator, and the catalog and host page discovered while building the
/// widget are recorded here for the cross-reference writer.
pub struct SignContext<'a, A: ObjectAllocator = SessionAllocator> {
    doc: &'a Document,
    config: FieldConfig,
    existing_signatures: usize,
    signature_object_id: u32,
    allocator: A,
    root_ref: Option<ObjectId>,
    page_ref: Option<ObjectId>,
}

impl<'a> SignContext<'a, SessionAllocator> {
    /// Session numbering new objects after the document's highest object id
    pub fn new(doc: &'a Document, signature_object_id: u32) -> Self {
        let allocator = SessionAllocator::for_document(doc);
        Self::with_allocator(doc, signature_object_id, allocator)
    }
}

impl<'a, A: ObjectAllocator> SignContext<'a, A> {
    pub fn with_allocator(doc: &'a Document, signature_object_id: u32, allocator: A) -> Self {
        Self {
            doc,
            config: FieldConfig::default(),
            existing_signatures: count_existing_signatures(doc),
            signature_object_id,
            allocator,
            root_ref: None,
            page_ref: None,
        }
    }

    /// Override the number of signatures already present in the document
    pub fn with_existing_signatures(mut self, count: usize) -> Self {
        self.existing_signatures = count;
        self
    }

    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn existing_signatures(&self) -> usize {
        self.existing_signatures
    }

    /// Count one more signature once the current one has been written out
    pub fn mark_signed(&mut self) {
        self.existing_signatures += 1;
    }

    /// Object number of the signature value dictionary the widget points at
    pub fn signature_object_id(&self) -> u32 {
        self.signature_object_id
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    pub fn allocator_mut(&mut self) -> &mut A {
        &mut self.allocator
    }

    pub fn into_allocator(self) -> A {
        self.allocator
    }

    /// Catalog reference recorded by the last successful widget build
    pub fn root_ref(&self) -> Option<ObjectId> {
        self.root_ref
    }

    /// Host page recorded by the last successful widget build
    pub fn page_ref(&self) -> Option<ObjectId> {
        self.page_ref
    }

    pub(crate) fn record_refs(&mut self, root: ObjectId, page: Option<ObjectId>) {
        self.root_ref = Some(root);
        self.page_ref = page;
    }
}

/// Resolve the trailer's `/Root` to the catalog's id and dictionary
pub(crate) fn resolve_root(doc: &Document) -> Result<(ObjectId, &Dictionary)> {
    let root = doc
        .trailer
        .get(b"Root")
        .map_err(|_| SigWidgetError::RootResolutionFailed("trailer has no /Root entry".into()))?;
    let root_id = root.as_reference().map_err(|_| {
        SigWidgetError::RootResolutionFailed("/Root is not an indirect reference".into())
    })?;
    let catalog = doc.get_dictionary(root_id).map_err(|e| {
        SigWidgetError::RootResolutionFailed(format!("catalog {} {} R: {}", root_id.0, root_id.1, e))
    })?;
    Ok((root_id, catalog))
}

/// The catalog's page tree root, if it has one
pub(crate) fn page_tree_root(catalog: &Dictionary) -> Result<Option<ObjectId>> {
    match catalog.get(b"Pages") {
        Err(_) | Ok(Object::Null) => Ok(None),
        Ok(Object::Reference(id)) => Ok(Some(*id)),
        Ok(_) => Err(SigWidgetError::RootResolutionFailed(
            "/Pages is not an indirect reference".into(),
        )),
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        direct => Some(direct),
    }
}

/// Count signed signature fields in the document's interactive form
///
/// Walks `/AcroForm /Fields` including `/Kids` of non-terminal fields. A
/// field counts when its (possibly inherited) `/FT` is `/Sig` and it has a
/// `/V` value.
pub fn count_existing_signatures(doc: &Document) -> usize {
    let Ok((_, catalog)) = resolve_root(doc) else {
        return 0;
    };
    let fields = catalog
        .get(b"AcroForm")
        .ok()
        .and_then(|form| resolve(doc, form))
        .and_then(|form| form.as_dict().ok())
        .and_then(|form| form.get(b"Fields").ok())
        .and_then(|fields| resolve(doc, fields))
        .and_then(|fields| fields.as_array().ok());

    let Some(fields) = fields else {
        return 0;
    };

    // Explicit stack of (field, inherited /FT); field trees can be deep
    let mut stack: Vec<(&Object, Option<&[u8]>)> =
        fields.iter().rev().map(|field| (field, None)).collect();
    let mut visited = BTreeSet::new();
    let mut count = 0;

    while let Some((field, inherited_type)) = stack.pop() {
        if let Object::Reference(id) = field {
            if !visited.insert(*id) {
                continue;
            }
        }
        let Some(dict) = resolve(doc, field).and_then(|f| f.as_dict().ok()) else {
            continue;
        };

        let field_type = dict
            .get(b"FT")
            .and_then(Object::as_name)
            .ok()
            .or(inherited_type);
        let kids = dict
            .get(b"Kids")
            .ok()
            .and_then(|kids| resolve(doc, kids))
            .and_then(|kids| kids.as_array().ok());

        match kids {
            Some(kids) => stack.extend(kids.iter().rev().map(|kid| (kid, field_type))),
            None => {
                if field_type == Some(b"Sig".as_slice()) && dict.has(b"V") {
                    count += 1;
                }
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::build_document;
    use lopdf::dictionary;

    fn add_acroform(doc: &mut Document, fields: Vec<Object>) {
        let form_id = doc.add_object(dictionary! { "Fields" => fields });
        let (root_id, _) = resolve_root(doc).unwrap();
        let mut catalog = doc.get_dictionary(root_id).unwrap().clone();
        catalog.set("AcroForm", form_id);
        doc.objects.insert(root_id, Object::Dictionary(catalog));
    }

    #[test]
    fn test_no_acroform_means_no_signatures() {
        let (doc, _, _) = build_document(1);
        assert_eq!(count_existing_signatures(&doc), 0);
    }

    #[test]
    fn test_counts_signed_sig_fields_only() {
        let (mut doc, _, _) = build_document(1);
        let signed = doc.add_object(dictionary! { "FT" => "Sig", "V" => Object::Reference((90, 0)) });
        let unsigned = doc.add_object(dictionary! { "FT" => "Sig" });
        let text = doc.add_object(dictionary! { "FT" => "Tx", "V" => Object::Integer(1) });
        add_acroform(&mut doc, vec![signed.into(), unsigned.into(), text.into()]);

        assert_eq!(count_existing_signatures(&doc), 1);
    }

    #[test]
    fn test_kids_inherit_field_type() {
        let (mut doc, _, _) = build_document(1);
        let kid_a = doc.add_object(dictionary! { "V" => Object::Reference((90, 0)) });
        let kid_b = doc.add_object(dictionary! { "V" => Object::Reference((91, 0)) });
        let parent = doc.add_object(dictionary! {
            "FT" => "Sig",
            "Kids" => vec![Object::Reference(kid_a), Object::Reference(kid_b)],
        });
        add_acroform(&mut doc, vec![parent.into()]);

        assert_eq!(count_existing_signatures(&doc), 2);
    }

    #[test]
    fn test_self_referencing_field_terminates() {
        let (mut doc, _, _) = build_document(1);
        let field_id = doc.new_object_id();
        doc.objects.insert(
            field_id,
            Object::Dictionary(dictionary! {
                "FT" => "Sig",
                "Kids" => vec![Object::Reference(field_id)],
            }),
        );
        add_acroform(&mut doc, vec![field_id.into()]);

        assert_eq!(count_existing_signatures(&doc), 0);
    }

    #[test]
    fn test_deep_field_tree_is_counted() {
        let (mut doc, _, _) = build_document(1);
        let mut node = doc.add_object(dictionary! { "V" => Object::Reference((90, 0)) });
        for _ in 0..200_000 {
            node = doc.add_object(dictionary! { "Kids" => vec![Object::Reference(node)] });
        }
        let top = doc.add_object(dictionary! {
            "FT" => "Sig",
            "Kids" => vec![Object::Reference(node)],
        });
        add_acroform(&mut doc, vec![top.into()]);

        assert_eq!(count_existing_signatures(&doc), 1);
    }

    #[test]
    fn test_context_defaults() {
        let (doc, _, _) = build_document(1);
        let mut ctx = SignContext::new(&doc, 42).with_existing_signatures(3);

        assert_eq!(ctx.signature_object_id(), 42);
        assert_eq!(ctx.existing_signatures(), 3);
        assert_eq!(ctx.allocator().peek_next_id(), doc.max_id + 1);
        assert!(ctx.root_ref().is_none());
        assert!(ctx.page_ref().is_none());

        ctx.mark_signed();
        assert_eq!(ctx.existing_signatures(), 4);
    }

    #[test]
    fn test_root_resolution_failures() {
        let (mut doc, _, _) = build_document(1);
        doc.trailer.remove(b"Root");
        assert!(matches!(
            resolve_root(&doc),
            Err(SigWidgetError::RootResolutionFailed(_))
        ));

        doc.trailer.set("Root", Object::Integer(1));
        assert!(matches!(
            resolve_root(&doc),
            Err(SigWidgetError::RootResolutionFailed(_))
        ));

        doc.trailer.set("Root", Object::Reference((999, 0)));
        assert!(matches!(
            resolve_root(&doc),
            Err(SigWidgetError::RootResolutionFailed(_))
        ));
    }

    #[test]
    fn test_page_tree_root_variants() {
        let with_pages = dictionary! { "Pages" => Object::Reference((2, 0)) };
        assert_eq!(page_tree_root(&with_pages).unwrap(), Some((2, 0)));

        assert_eq!(page_tree_root(&Dictionary::new()).unwrap(), None);

        let inline = dictionary! { "Pages" => dictionary! { "Type" => "Pages" } };
        assert!(page_tree_root(&inline).is_err());
    }
}
