//! HTML5 Parser implementation
//!
//! Parses with html5ever's fragment algorithm into an RcDom and copies the
//! result into a `fos-dom` tree. The target parent's tag is the parsing
//! context, so `<td>` under a `tr` or `<option>` under a `select` survive
//! as they would through innerHTML.

use crate::HtmlError;
use fos_dom::{DomError, DomTree, NodeId};
use html5ever::tendril::TendrilSink;
use html5ever::{ns, parse_fragment, LocalName, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// Context used when the parent is not an element
const DEFAULT_CONTEXT: &str = "body";

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse `html` in the context of `parent` and append its nodes there.
    ///
    /// Returns the top-level nodes created. Whitespace-only text between
    /// top-level nodes is dropped.
    pub fn parse_fragment_into(
        &self,
        tree: &mut DomTree,
        parent: NodeId,
        html: &str,
    ) -> Result<Vec<NodeId>, HtmlError> {
        let node = tree.get(parent).ok_or(DomError::NotFound(parent))?;
        if !node.is_container() {
            return Err(DomError::NotAnElement(parent).into());
        }
        let context = node.as_element().map_or(DEFAULT_CONTEXT, |e| e.tag.as_str());
        let context = QualName::new(None, ns!(html), LocalName::from(context));

        let dom = parse_fragment(RcDom::default(), Default::default(), context, Vec::new(), false)
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let before = tree.len();
        let mut created = Vec::new();
        // The fragment algorithm parents everything under a synthetic <html>
        let roots = dom.document.children.borrow().clone();
        for root in roots {
            for child in root.children.borrow().iter() {
                if let Some(id) = self.convert_node(child, tree, parent, true)? {
                    created.push(id);
                }
            }
        }

        tracing::debug!(
            "Parsed fragment into {}: {} top-level, {} total nodes",
            parent,
            created.len(),
            tree.len() - before
        );
        Ok(created)
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(
        &self,
        handle: &Handle,
        tree: &mut DomTree,
        parent: NodeId,
        top_level: bool,
    ) -> Result<Option<NodeId>, HtmlError> {
        let id = match &handle.data {
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if top_level && text.trim().is_empty() {
                    return Ok(None);
                }
                tree.create_text(&text)
            }
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                let elem = tree.element_mut(id)?;
                for attr in attrs.borrow().iter() {
                    elem.set_attr(&attr.name.local, &attr.value);
                }
                id
            }
            // Doctype, processing instructions
            _ => return Ok(None),
        };

        tree.append_child(parent, id)?;
        for child in handle.children.borrow().iter() {
            self.convert_node(child, tree, id, false)?;
        }
        Ok(Some(id))
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}
