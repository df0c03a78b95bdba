//! In-memory documents shared by the unit tests

use lopdf::{dictionary, Document, Object, ObjectId};

fn media_box() -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ])
}

/// A flat page tree with `pages` leaves under one `/Pages` node
pub fn build_document(pages: usize) -> (Document, ObjectId, Vec<ObjectId>) {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let page_ids: Vec<ObjectId> = (0..pages)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box(),
            })
        })
        .collect();

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(pages as i64),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    (doc, pages_id, page_ids)
}

/// Page tree shaped `[[p1, p2], p3, [[p4]]]`
pub fn nested_document() -> (Document, ObjectId, Vec<ObjectId>) {
    let mut doc = Document::with_version("1.7");
    let root = doc.new_object_id();
    let left = doc.new_object_id();
    let right = doc.new_object_id();
    let right_inner = doc.new_object_id();

    let leaf = |doc: &mut Document, parent: ObjectId| {
        doc.add_object(dictionary! { "Type" => "Page", "Parent" => parent })
    };
    let p1 = leaf(&mut doc, left);
    let p2 = leaf(&mut doc, left);
    let p3 = leaf(&mut doc, root);
    let p4 = leaf(&mut doc, right_inner);

    let node = |parent: Option<ObjectId>, kids: &[ObjectId]| {
        let mut dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        };
        if let Some(parent) = parent {
            dict.set("Parent", parent);
        }
        Object::Dictionary(dict)
    };
    doc.objects.insert(root, node(None, &[left, p3, right]));
    doc.objects.insert(left, node(Some(root), &[p1, p2]));
    doc.objects.insert(right, node(Some(root), &[right_inner]));
    doc.objects.insert(right_inner, node(Some(right), &[p4]));

    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => root });
    doc.trailer.set("Root", catalog_id);

    (doc, root, vec![p1, p2, p3, p4])
}
