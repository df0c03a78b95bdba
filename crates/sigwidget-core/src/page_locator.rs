//! Page tree descent by ordinal page number

use crate::error::{Result, SigWidgetError};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// A leaf page found in the page tree
#[derive(Debug, Clone, Copy)]
pub struct LocatedPage<'a> {
    pub id: ObjectId,
    pub dict: &'a Dictionary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Intermediate,
    Leaf,
    Unknown,
}

fn node_kind(dict: &Dictionary) -> NodeKind {
    match dict.get(b"Type").and_then(Object::as_name) {
        Ok(b"Pages") => NodeKind::Intermediate,
        Ok(b"Page") => NodeKind::Leaf,
        // An untyped node with Kids can only be a container
        Err(_) if dict.has(b"Kids") => NodeKind::Intermediate,
        _ => NodeKind::Unknown,
    }
}

/// Resolves 1-based page ordinals against a document's page tree
pub struct PageLocator<'a> {
    doc: &'a Document,
}

impl<'a> PageLocator<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }

    /// Find the `ordinal`-th leaf page below `root` in document order
    ///
    /// Only leaf pages are counted. The first subtree that resolves the
    /// ordinal wins and remaining siblings are not visited.
    pub fn locate(&self, root: ObjectId, ordinal: u32) -> Result<LocatedPage<'a>> {
        if ordinal == 0 {
            return Err(SigWidgetError::PageNotFound(ordinal));
        }

        let page = self
            .search(root, ordinal)
            .ok_or(SigWidgetError::PageNotFound(ordinal))?;

        debug!(ordinal, page = ?page.id, "located page");
        Ok(page)
    }

    /// Depth-first, left-to-right walk with an explicit stack
    ///
    /// Tree depth is bounded only by the document, so the walk must not
    /// recurse.
    fn search(&self, root: ObjectId, ordinal: u32) -> Option<LocatedPage<'a>> {
        let mut remaining = ordinal;
        let mut visited = BTreeSet::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                warn!(node = ?id, "page tree cycle detected, skipping node");
                continue;
            }

            let dict = match self.doc.get_dictionary(id) {
                Ok(dict) => dict,
                Err(e) => {
                    warn!(node = ?id, error = %e, "page tree node is not a dictionary");
                    continue;
                }
            };

            match node_kind(dict) {
                NodeKind::Intermediate => {
                    if let Some(kids) = self.kids(dict) {
                        // Reversed so the leftmost kid is popped first
                        stack.extend(
                            kids.iter()
                                .rev()
                                .filter_map(|kid| kid.as_reference().ok()),
                        );
                    }
                }
                NodeKind::Leaf => {
                    if remaining == 1 {
                        return Some(LocatedPage { id, dict });
                    }
                    remaining -= 1;
                }
                NodeKind::Unknown => {
                    warn!(node = ?id, "page tree node has neither /Pages nor /Page type");
                }
            }
        }
        None
    }

    fn kids(&self, dict: &'a Dictionary) -> Option<&'a Vec<Object>> {
        let kids = match dict.get(b"Kids").ok()? {
            Object::Reference(id) => self.doc.get_object(*id).ok()?,
            direct => direct,
        };
        kids.as_array().ok()
    }
}
