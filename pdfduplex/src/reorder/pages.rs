//! Page source and sink over `lopdf` documents.
//!
//! The sink rebuilds the page tree as a single flat `Kids` array under the
//! root `Pages` node. Attributes pages used to inherit from intermediate
//! nodes are copied onto the pages themselves before those nodes are pruned.

use std::collections::HashSet;

use lopdf::{Document, Object, ObjectId};

use super::{PageSink, PageSource, ReorderError};

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// Page object ids of a document, in current page order.
#[derive(Debug, Clone)]
pub struct PageList {
    ids: Vec<ObjectId>,
}

impl PageList {
    /// Collect the page ids of `doc` in page order.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            ids: doc.get_pages().into_values().collect(),
        }
    }

    /// Page ids in order.
    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }
}

impl PageSource for PageList {
    type Page = ObjectId;

    fn page_count(&self) -> usize {
        self.ids.len()
    }

    fn page(&self, index: usize) -> Option<ObjectId> {
        self.ids.get(index).copied()
    }
}

/// Sink that rewrites a document's page tree to the appended order.
///
/// The document is owned by the sink and only handed back from `finish`,
/// after every page has been placed.
pub struct PageTreeSink {
    document: Document,
    kids: Vec<ObjectId>,
    seen: HashSet<ObjectId>,
}

impl PageTreeSink {
    /// Create a sink that will rebuild the page tree of `document`.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            kids: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Number of pages appended so far.
    pub fn len(&self) -> usize {
        self.kids.len()
    }

    /// Whether no page has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.kids.is_empty()
    }

    fn root_pages_id(&self) -> Result<ObjectId, ReorderError> {
        let catalog = self
            .document
            .catalog()
            .map_err(|e| ReorderError::page_tree(format!("Failed to get catalog: {e}")))?;

        catalog
            .get(b"Pages")
            .and_then(|p| p.as_reference())
            .map_err(|e| ReorderError::page_tree(format!("Failed to get pages reference: {e}")))
    }
}

impl PageSink<ObjectId> for PageTreeSink {
    type Output = Document;

    fn append(&mut self, page: ObjectId) -> Result<(), ReorderError> {
        match self.document.get_object(page) {
            Ok(Object::Dictionary(_)) => {}
            Ok(_) => {
                return Err(ReorderError::page_tree(format!(
                    "Page object {} {} is not a dictionary",
                    page.0, page.1
                )));
            }
            Err(e) => {
                return Err(ReorderError::page_tree(format!(
                    "Page object {} {} missing: {e}",
                    page.0, page.1
                )));
            }
        }

        if !self.seen.insert(page) {
            return Err(ReorderError::page_tree(format!(
                "Page object {} {} appended twice",
                page.0, page.1
            )));
        }

        self.kids.push(page);
        Ok(())
    }

    fn finish(mut self) -> Result<Document, ReorderError> {
        let pages_id = self.root_pages_id()?;

        // Resolve inheritance against the original tree before touching it.
        let inherited: Vec<(ObjectId, Vec<(Vec<u8>, Object)>)> = self
            .kids
            .iter()
            .map(|&page_id| (page_id, inherited_attributes(&self.document, page_id, pages_id)))
            .collect();

        for (page_id, attributes) in inherited {
            let page = self
                .document
                .get_dictionary_mut(page_id)
                .map_err(|e| ReorderError::page_tree(format!("Failed to get page: {e}")))?;

            for (key, value) in attributes {
                page.set(key, value);
            }
            page.set("Parent", Object::Reference(pages_id));
        }

        let pages_dict = self
            .document
            .get_dictionary_mut(pages_id)
            .map_err(|e| ReorderError::page_tree(format!("Failed to get pages object: {e}")))?;

        let kids: Vec<Object> = self.kids.iter().map(|&id| Object::Reference(id)).collect();
        pages_dict.set("Kids", Object::Array(kids));
        pages_dict.set("Count", Object::Integer(self.kids.len() as i64));

        // Intermediate Pages nodes are unreachable now.
        self.document.prune_objects();

        Ok(self.document)
    }
}

/// Inheritable attributes that `page_id` lacks but an ancestor below the
/// root `Pages` node provides.
///
/// The root keeps its own attributes, so they stay inherited after the tree
/// is flattened and are not copied.
fn inherited_attributes(
    doc: &Document,
    page_id: ObjectId,
    root_id: ObjectId,
) -> Vec<(Vec<u8>, Object)> {
    let mut found = Vec::new();

    let Ok(page) = doc.get_dictionary(page_id) else {
        return found;
    };

    let mut missing: Vec<&[u8]> = INHERITABLE_KEYS
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();

    let mut parent = page.get(b"Parent").and_then(|p| p.as_reference()).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if missing.is_empty() || node_id == root_id || depth >= MAX_TREE_DEPTH {
            break;
        }

        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };

        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });

        parent = node.get(b"Parent").and_then(|p| p.as_reference()).ok();
        depth += 1;
    }

    found
}
