//! Element Query
//!
//! Selector parsing and matching: querySelector, querySelectorAll,
//! matches, closest.
//!
//! Supported grammar: selector lists (`a, b`), descendant (` `) and child
//! (`>`) combinators, and compound selectors built from `tag`, `*`,
//! `#id`, `.class`, `[attr]` and `[attr=value]`.

use crate::{DomError, DomResult, DomTree, ElementData, NodeId};

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
}

impl SimpleSelector {
    fn matches(&self, elem: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => elem.tag.eq_ignore_ascii_case(tag),
            Self::Id(id) => elem.id() == Some(id.as_str()),
            Self::Class(class) => elem.has_class(class),
            Self::Attribute { name, value: None } => elem.has_attr(name),
            Self::Attribute { name, value: Some(v) } => elem.get_attr(name) == Some(v.as_str()),
        }
    }
}

/// Sequence of simple selectors that must all match one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub parts: Vec<SimpleSelector>,
}

impl CompoundSelector {
    fn matches(&self, elem: &ElementData) -> bool {
        self.parts.iter().all(|s| s.matches(elem))
    }
}

/// Relationship between two compounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

/// `compounds[i]` and `compounds[i + 1]` are joined by `combinators[i]`
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComplexSelector {
    compounds: Vec<CompoundSelector>,
    combinators: Vec<Combinator>,
}

impl ComplexSelector {
    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.matches_at(tree, node, self.compounds.len() - 1)
    }

    fn matches_at(&self, tree: &DomTree, node: NodeId, index: usize) -> bool {
        let Some(elem) = tree.get(node).and_then(|n| n.as_element()) else {
            return false;
        };
        if !self.compounds[index].matches(elem) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => tree
                .parent(node)
                .is_some_and(|p| self.matches_at(tree, p, index - 1)),
            Combinator::Descendant => tree
                .ancestors(node)
                .any(|a| self.matches_at(tree, a, index - 1)),
        }
    }
}

/// Parsed, comma-separated selector list.
///
/// Equality compares the parsed form, so `.a>b` equals `.a > b`.
#[derive(Debug, Clone)]
pub struct SelectorList {
    source: String,
    selectors: Vec<ComplexSelector>,
}

impl PartialEq for SelectorList {
    fn eq(&self, other: &Self) -> bool {
        self.selectors == other.selectors
    }
}

impl Eq for SelectorList {}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(source: &str) -> DomResult<Self> {
        let selectors = Parser::new(source).parse_list()?;
        Ok(Self {
            source: source.trim().to_string(),
            selectors,
        })
    }

    /// The trimmed source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Check if an element matches any selector in the list
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.selectors.iter().any(|s| s.matches(tree, node))
    }

    /// First matching descendant of `scope` in document order
    pub fn query_first(&self, tree: &DomTree, scope: NodeId) -> Option<NodeId> {
        tree.descendants(scope).into_iter().find(|&n| self.matches(tree, n))
    }

    /// All matching descendants of `scope` in document order
    pub fn query_all(&self, tree: &DomTree, scope: NodeId) -> Vec<NodeId> {
        tree.descendants(scope)
            .into_iter()
            .filter(|&n| self.matches(tree, n))
            .collect()
    }
}

impl std::fmt::Display for SelectorList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl DomTree {
    /// Query single descendant by CSS selector
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        Ok(SelectorList::parse(selector)?.query_first(self, scope))
    }

    /// Query all descendants by CSS selector
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        Ok(SelectorList::parse(selector)?.query_all(self, scope))
    }

    /// Check if element matches selector
    pub fn matches(&self, node: NodeId, selector: &str) -> DomResult<bool> {
        Ok(SelectorList::parse(selector)?.matches(self, node))
    }

    /// Find closest inclusive ancestor matching selector
    pub fn closest(&self, node: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        Ok(std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|&n| list.matches(self, n)))
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> DomError {
        DomError::Syntax {
            selector: self.source.to_string(),
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Skip whitespace, returning whether any was skipped
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn ident(&mut self) -> Option<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        (self.pos > start).then(|| self.chars[start..self.pos].iter().collect())
    }

    fn parse_list(&mut self) -> DomResult<Vec<ComplexSelector>> {
        let mut list = Vec::new();
        loop {
            self.skip_ws();
            list.push(self.parse_complex()?);
            self.skip_ws();
            match self.bump() {
                None => return Ok(list),
                Some(',') => continue,
                Some(c) => return Err(self.error(format!("unexpected {c:?}"))),
            }
        }
    }

    fn parse_complex(&mut self) -> DomResult<ComplexSelector> {
        let first = self
            .parse_compound()?
            .ok_or_else(|| self.error("expected a selector"))?;
        let mut compounds = vec![first];
        let mut combinators = Vec::new();

        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    Combinator::Child
                }
                Some(_) if had_ws => Combinator::Descendant,
                Some(c) => return Err(self.error(format!("unexpected {c:?}"))),
            };
            let compound = self
                .parse_compound()?
                .ok_or_else(|| self.error("combinator without a selector after it"))?;
            combinators.push(combinator);
            compounds.push(compound);
        }

        Ok(ComplexSelector { compounds, combinators })
    }

    fn parse_compound(&mut self) -> DomResult<Option<CompoundSelector>> {
        let mut parts = Vec::new();

        if self.peek() == Some('*') {
            self.pos += 1;
            parts.push(SimpleSelector::Universal);
        } else if let Some(tag) = self.ident() {
            parts.push(SimpleSelector::Tag(tag.to_ascii_lowercase()));
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    let id = self.ident().ok_or_else(|| self.error("expected an id after '#'"))?;
                    parts.push(SimpleSelector::Id(id));
                }
                Some('.') => {
                    self.pos += 1;
                    let class = self
                        .ident()
                        .ok_or_else(|| self.error("expected a class name after '.'"))?;
                    parts.push(SimpleSelector::Class(class));
                }
                Some('[') => {
                    self.pos += 1;
                    parts.push(self.parse_attribute()?);
                }
                _ => break,
            }
        }

        Ok((!parts.is_empty()).then_some(CompoundSelector { parts }))
    }

    fn parse_attribute(&mut self) -> DomResult<SimpleSelector> {
        self.skip_ws();
        let name = self
            .ident()
            .ok_or_else(|| self.error("expected an attribute name"))?
            .to_ascii_lowercase();
        self.skip_ws();

        let value = if self.peek() == Some('=') {
            self.pos += 1;
            self.skip_ws();
            let value = match self.peek() {
                Some(quote @ ('"' | '\'')) => {
                    self.pos += 1;
                    let mut value = String::new();
                    loop {
                        match self.bump() {
                            Some(c) if c == quote => break,
                            Some(c) => value.push(c),
                            None => return Err(self.error("unterminated string")),
                        }
                    }
                    value
                }
                _ => self
                    .ident()
                    .ok_or_else(|| self.error("expected an attribute value"))?,
            };
            self.skip_ws();
            Some(value)
        } else {
            None
        };

        match self.bump() {
            Some(']') => Ok(SimpleSelector::Attribute { name, value }),
            _ => Err(self.error("expected ']'")),
        }
    }
}
