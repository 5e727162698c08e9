//! View
//!
//! The state every component carries: its root element, named child
//! elements, lifecycle emitter and delegated listeners.

use crate::state::{data_attribute, enabled_pair};
use crate::{
    dasherize, to_class_name, DestroyOptions, Emitter, FlagAction, FlagValue, RemoveOptions,
    Setter, SharedDocument, SubscriptionId, ViewConfig, ViewError, ViewResult,
};
use fos_dom::{Delegator, DomError, ListenerId, NodeId, SelectorList};
use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

fn next_view_id() -> String {
    format!("view-{}", NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
}

/// Root element binding of a component
pub struct View {
    doc: SharedDocument,
    el: Option<NodeId>,
    id: String,
    name: String,
    elements: HashMap<String, NodeId>,
    emitter: Emitter,
    pub(crate) delegator: Delegator<Rc<dyn Any>>,
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("el", &self.el)
            .field("elements", &self.elements)
            .field("listeners", &self.delegator.len())
            .finish()
    }
}

impl View {
    /// Resolve and tag the root element described by `config`
    pub fn new(doc: &SharedDocument, config: ViewConfig) -> ViewResult<Self> {
        let (el, id) = {
            let mut doc = doc.borrow_mut();
            let el = match config.el {
                Some(el) => {
                    doc.tree().element(el)?;
                    el
                }
                None => doc.create_element(&config.tag)?,
            };

            let tree = doc.tree_mut();
            let existing = tree.get_attribute(el, "id").map(str::to_string);
            let id = match existing {
                Some(id) => id,
                None => {
                    let id = config.id.clone().unwrap_or_else(next_view_id);
                    tree.set_attribute(el, "id", &id)?;
                    id
                }
            };
            if let Some(class_name) = &config.class_name {
                for class in class_name.split_whitespace() {
                    tree.add_class(el, class)?;
                }
            }
            if !config.name.is_empty() {
                tree.add_class(el, &config.name)?;
            }
            (el, id)
        };

        tracing::debug!("Created view {} ({}) at {}", id, config.name, el);

        Ok(Self {
            doc: Rc::clone(doc),
            el: Some(el),
            id,
            name: config.name,
            elements: HashMap::new(),
            emitter: Emitter::new(),
            delegator: Delegator::new(),
        })
    }

    /// Root element; `None` once destroyed
    pub fn el(&self) -> Option<NodeId> {
        self.el
    }

    /// Id the root element carried at construction
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> &SharedDocument {
        &self.doc
    }

    pub fn is_destroyed(&self) -> bool {
        self.el.is_none()
    }

    pub(crate) fn live_el(&self) -> ViewResult<NodeId> {
        self.el.ok_or(ViewError::Destroyed)
    }

    // === Child elements ===

    /// Named child element
    pub fn element(&self, name: &str) -> Option<NodeId> {
        self.elements.get(name).copied()
    }

    /// Record a named child element
    pub fn set_element(&mut self, name: &str, node: NodeId) -> Option<NodeId> {
        self.elements.insert(name.to_string(), node)
    }

    pub fn elements(&self) -> &HashMap<String, NodeId> {
        &self.elements
    }

    // === Structure ===

    /// Append the root element to `parent`; no-op without a parent
    pub fn insert_as_last_child(&mut self, parent: Option<NodeId>) -> ViewResult<&mut Self> {
        let Some(parent) = parent else {
            return Ok(self);
        };
        let el = self.live_el()?;
        self.doc.borrow_mut().tree_mut().append_child(parent, el)?;
        self.emitter.emit("inserted");
        Ok(self)
    }

    /// Prepend the root element to `parent`; no-op without a parent
    pub fn insert_as_first_child(&mut self, parent: Option<NodeId>) -> ViewResult<&mut Self> {
        let Some(parent) = parent else {
            return Ok(self);
        };
        let el = self.live_el()?;
        {
            let mut doc = self.doc.borrow_mut();
            let tree = doc.tree_mut();
            let first = tree.first_child(parent);
            tree.insert_before(parent, el, first)?;
        }
        self.emitter.emit("inserted");
        Ok(self)
    }

    /// First descendant of the root element matching `selector`
    pub fn find(&self, selector: &str) -> ViewResult<Option<NodeId>> {
        let el = self.live_el()?;
        Ok(self.doc.borrow().tree().query_selector(el, selector)?)
    }

    /// Every descendant of the root element matching `selector`
    pub fn find_all(&self, selector: &str) -> ViewResult<Vec<NodeId>> {
        let el = self.live_el()?;
        Ok(self.doc.borrow().tree().query_selector_all(el, selector)?)
    }

    /// Detach the root element from its parent
    pub fn remove(&mut self, options: RemoveOptions) -> ViewResult<&mut Self> {
        let Some(el) = self.el else {
            return Ok(self);
        };
        let detached = self.doc.borrow_mut().tree_mut().detach(el);
        if detached.is_some() && !options.silent {
            self.emitter.emit("remove");
        }
        Ok(self)
    }

    /// Replace the root element's content with parsed `html`.
    ///
    /// The previous content is freed; named elements that pointed into it
    /// are forgotten.
    pub fn set_html(&mut self, html: &str) -> ViewResult<Vec<NodeId>> {
        let el = self.live_el()?;
        let mut doc = self.doc.borrow_mut();
        let tree = doc.tree_mut();
        tree.free_children(el)?;
        self.elements.retain(|_, node| tree.get(*node).is_some());
        Ok(fos_html::parse_fragment_into(tree, el, html)?)
    }

    /// Serialized content of the root element
    pub fn html(&self) -> ViewResult<String> {
        let el = self.live_el()?;
        Ok(fos_html::get_inner_html(self.doc.borrow().tree(), el))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.el
            .is_some_and(|el| self.doc.borrow().tree().has_class(el, class))
    }

    /// Classes on the root element, in order
    pub fn classes(&self) -> Vec<String> {
        let Some(el) = self.el else {
            return Vec::new();
        };
        self.doc
            .borrow()
            .tree()
            .element(el)
            .map(|e| e.class_list().iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    // === State flags ===

    /// Raw value of a flag
    pub fn get(&self, key: &str) -> Option<String> {
        let el = self.el?;
        let attr = data_attribute(&dasherize(key));
        self.doc
            .borrow()
            .tree()
            .get_attribute(el, &attr)
            .map(str::to_string)
    }

    /// Set a flag; falsy values unset it
    pub fn set(&mut self, key: &str, value: impl Into<FlagValue>) -> ViewResult<&mut Self> {
        let value = value.into();
        if !value.is_truthy() {
            return self.unset(key);
        }
        let el = self.live_el()?;
        let dashed = flag_key(key)?;
        let attr = data_attribute(&dashed);
        let next = to_class_name(&dashed, &value);
        if let Some(class) = next.as_deref().filter(|c| c.chars().any(char::is_whitespace)) {
            return Err(DomError::InvalidCharacter(class.to_string()).into());
        }

        {
            let mut doc = self.doc.borrow_mut();
            let tree = doc.tree_mut();
            let prior = tree
                .get_attribute(el, &attr)
                .map(FlagValue::from)
                .and_then(|v| to_class_name(&dashed, &v));
            if let Some(prior) = prior {
                tree.remove_class(el, &prior)?;
            }
            if let Some(next) = &next {
                tree.add_class(el, next)?;
            }
            tree.set_attribute(el, &attr, &value.to_string())?;
        }

        tracing::trace!("{}: {}={} (class {:?})", self.id, attr, value, next);
        Ok(self)
    }

    /// Set a flag to `true`
    pub fn mark(&mut self, key: &str) -> ViewResult<&mut Self> {
        self.set(key, true)
    }

    /// Clear a flag and its derived class
    pub fn unset(&mut self, key: &str) -> ViewResult<&mut Self> {
        let el = self.live_el()?;
        let dashed = flag_key(key)?;
        let attr = data_attribute(&dashed);
        {
            let mut doc = self.doc.borrow_mut();
            let tree = doc.tree_mut();
            let class = tree
                .get_attribute(el, &attr)
                .map(FlagValue::from)
                .and_then(|v| to_class_name(&dashed, &v));
            if let Some(class) = class {
                tree.remove_class(el, &class)?;
            }
            tree.remove_attribute(el, &attr)?;
        }

        tracing::trace!("{}: {} unset", self.id, attr);
        Ok(self)
    }

    /// Deferred `set`; `forced` wins over the value given at call time
    pub fn setter(key: &str, forced: Option<FlagValue>) -> Setter {
        Setter::new(key, forced)
    }

    /// Set `<key>-enabled` and clear `<key>-disabled`
    pub fn enable(&mut self, key: Option<&str>) -> ViewResult<&mut Self> {
        let (on, off) = enabled_pair(key);
        self.set(&on, true)?.unset(&off)
    }

    /// Set `<key>-disabled` and clear `<key>-enabled`
    pub fn disable(&mut self, key: Option<&str>) -> ViewResult<&mut Self> {
        let (on, off) = enabled_pair(key);
        self.set(&off, true)?.unset(&on)
    }

    /// Disable when enabled, enable otherwise
    pub fn toggle(&mut self, key: Option<&str>) -> ViewResult<&mut Self> {
        self.live_el()?;
        let (on, _) = enabled_pair(key);
        let enabled = self.get(&on).is_some_and(|v| !v.is_empty());
        if enabled {
            self.disable(key)
        } else {
            self.enable(key)
        }
    }

    pub fn enabler(key: Option<&str>) -> FlagAction {
        FlagAction::enable(key)
    }

    pub fn disabler(key: Option<&str>) -> FlagAction {
        FlagAction::disable(key)
    }

    pub fn toggler(key: Option<&str>) -> FlagAction {
        FlagAction::toggle(key)
    }

    // === Lifecycle events ===

    pub fn on(&mut self, event: &str, listener: impl FnMut(&str) + 'static) -> SubscriptionId {
        self.emitter.on(event, listener)
    }

    pub fn once(&mut self, event: &str, listener: impl FnMut(&str) + 'static) -> SubscriptionId {
        self.emitter.once(event, listener)
    }

    pub fn off(&mut self, event: &str, id: Option<SubscriptionId>) -> usize {
        self.emitter.off(event, id)
    }

    pub fn emit(&mut self, event: &str) -> usize {
        self.emitter.emit(event)
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    // === Delegated listeners ===

    pub(crate) fn register(
        &mut self,
        event: &str,
        selector: Option<SelectorList>,
        handler: Rc<dyn Any>,
    ) -> ViewResult<ListenerId> {
        let el = self.live_el()?;
        Ok(self.delegator.add(el, event, selector, handler))
    }

    /// Remove delegated listeners; `None` filters match everything
    pub fn detach(&mut self, event: Option<&str>, selector: Option<&str>) -> ViewResult<usize> {
        let el = self.live_el()?;
        let selector = selector.map(SelectorList::parse).transpose()?;
        Ok(self.delegator.remove(el, event, selector.as_ref()))
    }

    /// Remove one delegated listener
    pub fn detach_listener(&mut self, id: ListenerId) -> bool {
        self.delegator.remove_listener(id)
    }

    /// Number of delegated listeners
    pub fn listener_count(&self) -> usize {
        self.delegator.len()
    }

    /// Tear down: remove, drop listeners, emit `destroy`, release the root
    pub fn destroy(&mut self, options: DestroyOptions) -> ViewResult<()> {
        if self.is_destroyed() {
            return Ok(());
        }
        if !options.no_remove {
            self.remove(RemoveOptions::default())?;
        }
        let detached = self.detach(None, None)?;
        self.emitter.emit("destroy");
        self.el = None;
        self.elements.clear();
        tracing::debug!("Destroyed view {} ({} listener(s) detached)", self.id, detached);
        Ok(())
    }
}

fn flag_key(key: &str) -> ViewResult<String> {
    let dashed = dasherize(key);
    if dashed.is_empty() {
        return Err(DomError::InvalidCharacter(key.to_string()).into());
    }
    Ok(dashed)
}
