//! fOS HTML
//!
//! HTML5 fragment parsing built on html5ever, and innerHTML/outerHTML
//! serialization of `fos-dom` trees.

mod parser;
mod serializer;

pub use parser::HtmlParser;
pub use serializer::{get_inner_html, get_outer_html, HtmlSerializer};

use fos_dom::{DomError, DomTree, NodeId};

/// Parse `html` and append the resulting nodes to `parent`
pub fn parse_fragment_into(tree: &mut DomTree, parent: NodeId, html: &str) -> Result<Vec<NodeId>, HtmlError> {
    HtmlParser::new().parse_fragment_into(tree, parent, html)
}

/// HTML errors
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dom(#[from] DomError),
}
