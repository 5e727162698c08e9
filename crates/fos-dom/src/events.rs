//! DOM Events
//!
//! Event objects and the delegated listener registry. Listeners are bound
//! at a root element and may be scoped to descendants matching a selector;
//! `Delegator::route` computes which handlers an event reaches, in order.

use crate::{DomTree, NodeId, SelectorList};

/// DOM event
#[derive(Debug, Clone)]
pub struct DomEvent {
    event_type: String,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl DomEvent {
    /// Create a bubbling, cancelable event
    pub fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: None,
            bubbles: true,
            cancelable: true,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create an event that only reaches its target (focus, blur, ...)
    pub fn non_bubbling(event_type: &str, target: NodeId) -> Self {
        Self {
            bubbles: false,
            ..Self::new(event_type, target)
        }
    }

    /// Event type name
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation once the current node's handlers have run
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Check if propagation was stopped
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Registered listener ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

#[derive(Debug)]
struct Listener<H> {
    id: ListenerId,
    root: NodeId,
    event_type: String,
    selector: Option<SelectorList>,
    handler: H,
}

/// Delegated listener registry
#[derive(Debug)]
pub struct Delegator<H> {
    listeners: Vec<Listener<H>>,
    next_id: u64,
}

impl<H> Default for Delegator<H> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 1,
        }
    }
}

impl<H> Delegator<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler at `root`, optionally scoped to matching descendants
    pub fn add(
        &mut self,
        root: NodeId,
        event_type: &str,
        selector: Option<SelectorList>,
        handler: H,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        tracing::trace!(
            "Delegated {} at {} (selector {:?})",
            event_type,
            root,
            selector.as_ref().map(SelectorList::source)
        );
        self.listeners.push(Listener {
            id,
            root,
            event_type: event_type.to_string(),
            selector,
            handler,
        });
        id
    }

    /// Remove listeners at `root`; `None` filters match everything.
    ///
    /// Selectors compare by parsed form. Returns the number of listeners removed.
    pub fn remove(
        &mut self,
        root: NodeId,
        event_type: Option<&str>,
        selector: Option<&SelectorList>,
    ) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|l| {
            let hit = l.root == root
                && event_type.is_none_or(|t| l.event_type == t)
                && selector.is_none_or(|s| l.selector.as_ref() == Some(s));
            !hit
        });
        before - self.listeners.len()
    }

    /// Remove a single listener
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() < before
    }

    /// Number of listeners bound at `root`
    pub fn count(&self, root: NodeId) -> usize {
        self.listeners.iter().filter(|l| l.root == root).count()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<H: Clone> Delegator<H> {
    /// Handlers `event` reaches through `root`, with the node each runs at.
    ///
    /// The path from the target up to `root` is walked; scoped listeners
    /// fire at each descendant their selector matches, then unscoped
    /// listeners fire at `root`. Events whose target is outside `root`
    /// reach nothing.
    pub fn route(&self, tree: &DomTree, root: NodeId, event: &DomEvent) -> Vec<(NodeId, H)> {
        let target = event.target;
        if !tree.contains(root, target) {
            return Vec::new();
        }

        let mut path = vec![target];
        if event.bubbles && target != root {
            path.extend(tree.ancestors(target).take_while(|&n| n != root));
            path.push(root);
        }

        let mut routed = Vec::new();
        for node in path {
            for listener in self
                .listeners
                .iter()
                .filter(|l| l.root == root && l.event_type == event.event_type)
            {
                let fires = match &listener.selector {
                    None => node == root,
                    Some(selector) => node != root && selector.matches(tree, node),
                };
                if fires {
                    routed.push((node, listener.handler.clone()));
                }
            }
        }
        tracing::trace!("Routed {} to {} handler(s)", event.event_type, routed.len());
        routed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let root = tree.create_element("div");
        let button = tree.create_element("button");
        let icon = tree.create_element("i");
        tree.append_child(tree.root(), root).unwrap();
        tree.append_child(root, button).unwrap();
        tree.append_child(button, icon).unwrap();
        tree.set_attribute(button, "class", "close").unwrap();
        (tree, root, button, icon)
    }

    fn sel(s: &str) -> Option<SelectorList> {
        Some(SelectorList::parse(s).unwrap())
    }

    #[test]
    fn test_prevent_default_needs_cancelable() {
        let mut event = DomEvent::new("click", NodeId(1));
        event.prevent_default();
        assert!(event.is_default_prevented());

        let mut event = DomEvent::new("click", NodeId(1));
        event.cancelable = false;
        event.prevent_default();
        assert!(!event.is_default_prevented());
    }

    #[test]
    fn test_route_scoped_then_root() {
        let (tree, root, button, icon) = sample();
        let mut delegator = Delegator::new();
        delegator.add(root, "click", None, "root");
        delegator.add(root, "click", sel(".close"), "close");
        delegator.add(root, "keydown", None, "key");

        let routed = delegator.route(&tree, root, &DomEvent::new("click", icon));
        assert_eq!(routed, vec![(button, "close"), (root, "root")]);
    }

    #[test]
    fn test_route_outside_root() {
        let (mut tree, root, ..) = sample();
        let outside = tree.create_element("p");
        let mut delegator = Delegator::new();
        delegator.add(root, "click", None, 1);

        assert!(delegator.route(&tree, root, &DomEvent::new("click", outside)).is_empty());
    }

    #[test]
    fn test_route_non_bubbling() {
        let (tree, root, button, icon) = sample();
        let mut delegator = Delegator::new();
        delegator.add(root, "focus", None, "root");
        delegator.add(root, "focus", sel("button"), "button");

        let routed = delegator.route(&tree, root, &DomEvent::non_bubbling("focus", icon));
        assert!(routed.is_empty());
        let routed = delegator.route(&tree, root, &DomEvent::non_bubbling("focus", button));
        assert_eq!(routed, vec![(button, "button")]);
    }

    #[test]
    fn test_remove_filters() {
        let (_, root, ..) = sample();
        let other = NodeId(42);
        let mut delegator = Delegator::new();
        delegator.add(root, "click", None, 1);
        delegator.add(root, "click", sel(".close"), 2);
        delegator.add(root, "input", sel("input"), 3);
        delegator.add(other, "click", None, 4);

        let close = SelectorList::parse(" .close ").unwrap();
        assert_eq!(delegator.remove(root, Some("click"), Some(&close)), 1);
        assert_eq!(delegator.remove(root, Some("click"), None), 1);
        assert_eq!(delegator.count(root), 1);
        assert_eq!(delegator.remove(root, None, None), 1);
        assert_eq!(delegator.len(), 1);

        let id = delegator.add(root, "click", None, 5);
        assert!(delegator.remove_listener(id));
        assert!(!delegator.remove_listener(id));
    }

    #[test]
    fn test_remove_compares_parsed_selectors() {
        let (_, root, ..) = sample();
        let mut delegator = Delegator::new();
        delegator.add(root, "click", sel(".a>b"), 1);
        delegator.add(root, "click", sel(".a b"), 2);

        let spaced = SelectorList::parse(".a  >  b").unwrap();
        assert_eq!(delegator.remove(root, None, Some(&spaced)), 1);
        assert_eq!(delegator.len(), 1);
    }
}
