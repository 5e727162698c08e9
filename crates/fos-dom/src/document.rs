//! Document - High-level document API

use crate::{is_valid_name, DomError, DomResult, DomTree, NodeId, SelectorList};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with `html`, `head` and `body`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh detached elements under the document node cannot fail
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Create a detached element, validating the tag name
    pub fn create_element(&mut self, tag: &str) -> DomResult<NodeId> {
        if !is_valid_name(tag) {
            return Err(DomError::InvalidCharacter(tag.to_string()));
        }
        Ok(self.tree.create_element(tag))
    }

    /// Get attached element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let root = self.tree.root();
        self.tree
            .descendants(root)
            .into_iter()
            .find(|&n| self.tree.get(n).and_then(|node| node.as_element()).and_then(|e| e.id()) == Some(id))
    }

    /// First attached element matching a selector
    pub fn query_selector(&self, selector: &str) -> DomResult<Option<NodeId>> {
        Ok(SelectorList::parse(selector)?.query_first(&self.tree, self.tree.root()))
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_structure() {
        let doc = Document::default();
        let tree = doc.tree();
        assert_eq!(tree.parent(doc.body()), Some(doc.document_element()));
        assert_eq!(tree.parent(doc.head()), Some(doc.document_element()));
        assert_eq!(doc.url(), "about:blank");
    }

    #[test]
    fn test_create_element_validates_tag() {
        let mut doc = Document::default();
        assert!(doc.create_element("section").is_ok());
        assert!(matches!(doc.create_element("no tag"), Err(DomError::InvalidCharacter(_))));
    }

    #[test]
    fn test_get_element_by_id_only_attached() {
        let mut doc = Document::default();
        let div = doc.create_element("div").unwrap();
        doc.tree.set_attribute(div, "id", "main").unwrap();
        assert_eq!(doc.get_element_by_id("main"), None);

        let body = doc.body();
        doc.tree.append_child(body, div).unwrap();
        assert_eq!(doc.get_element_by_id("main"), Some(div));
        assert_eq!(doc.query_selector("body > #main").unwrap(), Some(div));
    }
}
