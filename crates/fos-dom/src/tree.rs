//! DOM Tree (arena-based allocation)
//!
//! Detached subtrees stay in the arena and can be re-inserted later.
//! `free_subtree` and `free_children` release slots for reuse; ids of
//! freed nodes resolve to nothing until a new node takes the slot.

use crate::{is_valid_name, DomError, DomResult, ElementData, Node, NodeData, NodeId};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Option<Node>>,
    free: Vec<NodeId>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::document())],
            free: Vec::new(),
        }
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())?.as_ref()
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())?.as_mut()
    }

    /// Number of live nodes (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = Some(node);
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NotFound(id))
    }

    /// Element data of a node
    pub fn element(&self, id: NodeId) -> DomResult<&ElementData> {
        self.node(id)?.as_element().ok_or(DomError::NotAnElement(id))
    }

    /// Mutable element data of a node
    pub fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.node_mut(id)?.as_element_mut().ok_or(DomError::NotAnElement(id))
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent.to_option()
    }

    /// First child of a node
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.first_child.to_option()
    }

    /// Last child of a node
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.last_child.to_option()
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// All descendants of a node in document order, excluding the node
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).map(|(c, _)| c).collect();
        stack.reverse();
        while let Some(current) = stack.pop() {
            out.push(current);
            let start = stack.len();
            stack.extend(self.children(current).map(|(c, _)| c));
            stack[start..].reverse();
        }
        out
    }

    /// Ancestors of a node, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Check whether `node` is `ancestor` or one of its descendants
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if !self.node(parent)?.is_container() {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        let child_node = self.node(child)?;
        if matches!(child_node.data, NodeData::Document) || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.check_insertion(parent, child)?;
        self.detach(child);

        let last = self.node(parent)?.last_child;
        {
            let node = self.node_mut(child)?;
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.node_mut(last)?.next_sibling = child;
        } else {
            self.node_mut(parent)?.first_child = child;
        }
        self.node_mut(parent)?.last_child = child;
        Ok(child)
    }

    /// Insert `new_child` before `reference`, or append when `reference` is `None`
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        let Some(reference) = reference else {
            return self.append_child(parent, new_child);
        };
        if self.node(reference)?.parent != parent {
            return Err(DomError::NotAChild { parent, child: reference });
        }
        if reference == new_child {
            return Ok(new_child);
        }
        self.check_insertion(parent, new_child)?;
        self.detach(new_child);

        let prev = self.node(reference)?.prev_sibling;
        {
            let node = self.node_mut(new_child)?;
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        self.node_mut(reference)?.prev_sibling = new_child;
        if prev.is_valid() {
            self.node_mut(prev)?.next_sibling = new_child;
        } else {
            self.node_mut(parent)?.first_child = new_child;
        }
        Ok(new_child)
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.node(child)?.parent != parent {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(child)
    }

    /// Unlink a node from its parent; returns the former parent
    pub fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let (parent, prev, next) = {
            let node = self.get(id)?;
            (node.parent.to_option()?, node.prev_sibling, node.next_sibling)
        };

        let sibling_or_parent = if prev.is_valid() { prev } else { parent };
        if let Some(node) = self.get_mut(sibling_or_parent) {
            if prev.is_valid() {
                node.next_sibling = next;
            } else {
                node.first_child = next;
            }
        }
        let sibling_or_parent = if next.is_valid() { next } else { parent };
        if let Some(node) = self.get_mut(sibling_or_parent) {
            if next.is_valid() {
                node.prev_sibling = prev;
            } else {
                node.last_child = prev;
            }
        }

        let node = self.get_mut(id)?;
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        Some(parent)
    }

    /// Detach a node and release it with all its descendants
    pub fn free_subtree(&mut self, id: NodeId) -> DomResult<usize> {
        if matches!(self.node(id)?.data, NodeData::Document) {
            return Err(DomError::HierarchyRequest { parent: NodeId::NONE, child: id });
        }
        self.detach(id);
        let mut released = self.descendants(id);
        released.push(id);
        for &n in &released {
            self.nodes[n.index()] = None;
            self.free.push(n);
        }
        Ok(released.len())
    }

    /// Release every child subtree of a node; returns the number of nodes freed
    pub fn free_children(&mut self, id: NodeId) -> DomResult<usize> {
        self.node(id)?;
        let mut released = 0;
        while let Some(child) = self.first_child(id) {
            released += self.free_subtree(child)?;
        }
        Ok(released)
    }

    /// Get an attribute of an element
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.get_attr(name)
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        if !is_valid_name(name) {
            return Err(DomError::InvalidCharacter(name.to_string()));
        }
        self.element_mut(id)?.set_attr(&name.to_ascii_lowercase(), value);
        Ok(())
    }

    /// Remove an attribute; returns whether it was present
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<bool> {
        Ok(self.element_mut(id)?.remove_attr(&name.to_ascii_lowercase()).is_some())
    }

    /// Check for a class on an element
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get(id)
            .and_then(Node::as_element)
            .is_some_and(|e| e.has_class(class))
    }

    /// Add a class to an element
    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        if class.chars().any(char::is_whitespace) {
            return Err(DomError::InvalidCharacter(class.to_string()));
        }
        self.element_mut(id)?.add_class(class);
        Ok(())
    }

    /// Remove a class from an element
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        self.element_mut(id)?.remove_class(class);
        Ok(())
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.get(n).and_then(Node::as_text))
            .collect()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.to_option()?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_ids(tree: &DomTree, id: NodeId) -> Vec<NodeId> {
        tree.children(id).map(|(c, _)| c).collect()
    }

    #[test]
    fn test_append_and_siblings() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("p");
        let b = tree.create_element("p");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();

        assert_eq!(child_ids(&tree, div), vec![a, b]);
        assert_eq!(tree.get(a).unwrap().next_sibling, b);
        assert_eq!(tree.get(b).unwrap().prev_sibling, a);
        assert_eq!(tree.parent(a), Some(div));
    }

    #[test]
    fn test_insert_before_first() {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        let first = tree.create_element("li");
        let second = tree.create_element("li");
        tree.append_child(ul, second).unwrap();
        tree.insert_before(ul, first, tree.first_child(ul)).unwrap();

        assert_eq!(child_ids(&tree, ul), vec![first, second]);
        assert_eq!(tree.first_child(ul), Some(first));
        assert_eq!(tree.last_child(ul), Some(second));
    }

    #[test]
    fn test_insert_before_foreign_reference() {
        let mut tree = DomTree::new();
        let a = tree.create_element("div");
        let b = tree.create_element("div");
        let stray = tree.create_element("span");
        let new = tree.create_element("span");
        tree.append_child(b, stray).unwrap();

        let err = tree.insert_before(a, new, Some(stray)).unwrap_err();
        assert_eq!(err, DomError::NotAChild { parent: a, child: stray });
    }

    #[test]
    fn test_append_moves_node() {
        let mut tree = DomTree::new();
        let a = tree.create_element("div");
        let b = tree.create_element("div");
        let child = tree.create_element("span");
        tree.append_child(a, child).unwrap();
        tree.append_child(b, child).unwrap();

        assert!(child_ids(&tree, a).is_empty());
        assert_eq!(child_ids(&tree, b), vec![child]);
    }

    #[test]
    fn test_hierarchy_errors() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        let text = tree.create_text("hi");
        tree.append_child(outer, inner).unwrap();

        assert!(matches!(
            tree.append_child(inner, outer),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert!(matches!(
            tree.append_child(text, inner),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert!(matches!(
            tree.append_child(outer, NodeId(999)),
            Err(DomError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_child_and_detach() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        let c = tree.create_element("i");
        for n in [a, b, c] {
            tree.append_child(div, n).unwrap();
        }

        tree.remove_child(div, b).unwrap();
        assert_eq!(child_ids(&tree, div), vec![a, c]);
        assert!(tree.remove_child(div, b).is_err());

        assert_eq!(tree.detach(c), Some(div));
        assert_eq!(tree.detach(c), None);
        assert_eq!(tree.last_child(div), Some(a));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let mut tree = DomTree::new();
        let root = tree.create_element("div");
        let a = tree.create_element("section");
        let a1 = tree.create_element("p");
        let a2 = tree.create_element("p");
        let b = tree.create_element("footer");
        tree.append_child(root, a).unwrap();
        tree.append_child(a, a1).unwrap();
        tree.append_child(a, a2).unwrap();
        tree.append_child(root, b).unwrap();

        assert_eq!(tree.descendants(root), vec![a, a1, a2, b]);
        assert!(tree.contains(root, a2));
        assert!(!tree.contains(a, b));
    }

    #[test]
    fn test_attribute_helpers() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.set_attribute(div, "data-foo", "1").unwrap();
        assert_eq!(tree.get_attribute(div, "data-foo"), Some("1"));
        assert!(tree.remove_attribute(div, "data-foo").unwrap());
        assert!(!tree.remove_attribute(div, "data-foo").unwrap());

        assert!(matches!(
            tree.set_attribute(div, "bad name", "x"),
            Err(DomError::InvalidCharacter(_))
        ));

        let text = tree.create_text("x");
        assert_eq!(tree.add_class(text, "a"), Err(DomError::NotAnElement(text)));
    }

    #[test]
    fn test_text_content() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let t1 = tree.create_text("Hello, ");
        let b = tree.create_element("b");
        let t2 = tree.create_text("World");
        tree.append_child(p, t1).unwrap();
        tree.append_child(p, b).unwrap();
        tree.append_child(b, t2).unwrap();

        assert_eq!(tree.text_content(p), "Hello, World");
    }

    #[test]
    fn test_free_children_reuses_slots() {
        let mut tree = DomTree::new();
        let host = tree.create_element("div");
        for _ in 0..3 {
            let p = tree.create_element("p");
            let t = tree.create_text("x");
            tree.append_child(host, p).unwrap();
            tree.append_child(p, t).unwrap();
        }
        let stale = tree.first_child(host).unwrap();
        let live = tree.len();

        assert_eq!(tree.free_children(host).unwrap(), 6);
        assert_eq!(tree.len(), live - 6);
        assert!(tree.first_child(host).is_none());
        assert!(tree.get(stale).is_none());

        let reused = tree.create_element("span");
        assert!(reused.index() < live);
        assert_eq!(tree.len(), live - 5);
    }

    #[test]
    fn test_free_subtree_unlinks() {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        let a = tree.create_element("li");
        let b = tree.create_element("li");
        tree.append_child(ul, a).unwrap();
        tree.append_child(ul, b).unwrap();

        assert_eq!(tree.free_subtree(a).unwrap(), 1);
        assert_eq!(child_ids(&tree, ul), vec![b]);
        assert_eq!(tree.get(b).unwrap().prev_sibling, NodeId::NONE);
        assert!(tree.free_subtree(a).is_err());
        assert!(tree.free_subtree(tree.root()).is_err());
    }
}
