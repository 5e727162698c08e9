//! fOS DOM - Document Object Model
//!
//! Arena-based DOM tree with attributes, class lists, selector queries
//! and delegated event routing.

mod attributes;
mod classlist;
mod document;
mod events;
mod node;
mod selector;
mod tree;

pub use attributes::{Attr, NamedNodeMap};
pub use classlist::ClassList;
pub use document::Document;
pub use events::{Delegator, DomEvent, ListenerId};
pub use node::{ElementData, Node, NodeData};
pub use selector::{Combinator, CompoundSelector, SelectorList, SimpleSelector};
pub use tree::{Children, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Convert the sentinel into `None`
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }

    /// Raw arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#none")
        }
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NotFound(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Hierarchy request error: cannot insert {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("Invalid character in name: {0:?}")]
    InvalidCharacter(String),

    #[error("Invalid selector {selector:?}: {reason}")]
    Syntax { selector: String, reason: String },
}

/// Check a tag or attribute name
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':') || !c.is_ascii())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_sentinel() {
        assert!(NodeId::ROOT.is_valid());
        assert!(!NodeId::NONE.is_valid());
        assert_eq!(NodeId::NONE.to_option(), None);
        assert_eq!(NodeId(3).to_option(), Some(NodeId(3)));
    }

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("div"));
        assert!(is_valid_name("data-foo-bar"));
        assert!(is_valid_name("my-element"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("1div"));
        assert!(!is_valid_name("di v"));
        assert!(!is_valid_name("<p>"));
    }
}
