//! Event Specs and Handlers
//!
//! An event spec is `"<event>"` or `"<event> <selector>"`. An `EventMap`
//! pairs specs with callbacks: closures taking the component explicitly,
//! or names resolved through the component's method table.

use crate::{Component, ViewError, ViewResult};
use fos_dom::{DomEvent, SelectorList};
use std::rc::Rc;

/// Delegated event handler for component `C`
pub type Handler<C> = Rc<dyn Fn(&mut C, &mut DomEvent) -> ViewResult<()>>;

/// Box a closure as a `Handler`
pub fn handler<C, F>(f: F) -> Handler<C>
where
    F: Fn(&mut C, &mut DomEvent) -> ViewResult<()> + 'static,
{
    Rc::new(f)
}

/// Handler, or the name of a component method
pub enum Callback<C> {
    Handler(Handler<C>),
    Method(String),
}

impl<C> Clone for Callback<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Handler(h) => Self::Handler(Rc::clone(h)),
            Self::Method(name) => Self::Method(name.clone()),
        }
    }
}

impl<C> std::fmt::Debug for Callback<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Handler(_) => f.write_str("Handler(..)"),
            Self::Method(name) => f.debug_tuple("Method").field(name).finish(),
        }
    }
}

impl<C: Component> Callback<C> {
    /// Resolve to a handler through `component`'s method table
    pub fn resolve(self, component: &C) -> ViewResult<Handler<C>> {
        match self {
            Self::Handler(h) => Ok(h),
            Self::Method(name) => component.method(&name).ok_or(ViewError::UnknownMethod(name)),
        }
    }
}

/// Ordered spec-to-callback map; inserting an existing spec replaces it
pub struct EventMap<C> {
    entries: Vec<(String, Callback<C>)>,
}

impl<C> Default for EventMap<C> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<C> Clone for EventMap<C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<C> std::fmt::Debug for EventMap<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries.iter().map(|(k, v)| (k, v))).finish()
    }
}

impl<C> EventMap<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prebuilt handler
    pub fn on(mut self, spec: &str, handler: Handler<C>) -> Self {
        self.insert(spec, Callback::Handler(handler));
        self
    }

    /// Add a closure
    pub fn handler<F>(self, spec: &str, f: F) -> Self
    where
        F: Fn(&mut C, &mut DomEvent) -> ViewResult<()> + 'static,
    {
        self.on(spec, Rc::new(f))
    }

    /// Add a named method
    pub fn method(mut self, spec: &str, name: &str) -> Self {
        self.insert(spec, Callback::Method(name.to_string()));
        self
    }

    /// Insert a callback; returns the one it replaced
    pub fn insert(&mut self, spec: &str, callback: Callback<C>) -> Option<Callback<C>> {
        match self.entries.iter_mut().find(|(k, _)| k == spec) {
            Some((_, existing)) => Some(std::mem::replace(existing, callback)),
            None => {
                self.entries.push((spec.to_string(), callback));
                None
            }
        }
    }

    /// Overlay `other`; its entries win on shared specs
    pub fn merge(mut self, other: EventMap<C>) -> Self {
        for (spec, callback) in other.entries {
            self.insert(&spec, callback);
        }
        self
    }

    pub fn get(&self, spec: &str) -> Option<&Callback<C>> {
        self.entries.iter().find(|(k, _)| k == spec).map(|(_, v)| v)
    }

    pub fn specs(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(String, Callback<C>)> {
        self.entries
    }
}

impl<P: Component> EventMap<P> {
    /// Re-target a parent component's map at an extending component.
    ///
    /// Handlers run against the child's embedded parent; method names stay
    /// names, so they resolve against the child's table first.
    pub fn lift<C: Component<Parent = P>>(self) -> EventMap<C> {
        let entries = self
            .entries
            .into_iter()
            .map(|(spec, callback)| {
                let callback = match callback {
                    Callback::Handler(h) => Callback::Handler(lift(h)),
                    Callback::Method(name) => Callback::Method(name),
                };
                (spec, callback)
            })
            .collect();
        EventMap { entries }
    }
}

/// Run a parent component's handler against the child's embedded parent
pub(crate) fn lift<P, C>(h: Handler<P>) -> Handler<C>
where
    P: Component,
    C: Component<Parent = P>,
{
    Rc::new(move |component: &mut C, event: &mut DomEvent| match component.parent_mut() {
        Some(parent) => h(parent, event),
        None => Ok(()),
    })
}

/// Parsed event spec
#[derive(Debug, Clone)]
pub struct EventSpec {
    pub event: String,
    pub selector: Option<SelectorList>,
}

impl EventSpec {
    /// Parse `"<event>[ <selector>]"`
    pub fn parse(spec: &str) -> ViewResult<Self> {
        let trimmed = spec.trim();
        let (event, rest) = match trimmed.find(char::is_whitespace) {
            Some(split) => (&trimmed[..split], trimmed[split..].trim()),
            None => (trimmed, ""),
        };
        let selector = (!rest.is_empty()).then_some(rest);
        Self::build(spec, event, selector)
    }

    /// Spec from separate event and selector parts
    pub fn new(event: &str, selector: Option<&str>) -> ViewResult<Self> {
        let selector = selector.map(str::trim).filter(|s| !s.is_empty());
        let spec = match selector {
            Some(s) => format!("{event} {s}"),
            None => event.to_string(),
        };
        Self::build(&spec, event, selector)
    }

    fn build(spec: &str, event: &str, selector: Option<&str>) -> ViewResult<Self> {
        let invalid = |reason: String| ViewError::EventSpec {
            spec: spec.to_string(),
            reason,
        };
        if event.is_empty() {
            return Err(invalid("missing event name".to_string()));
        }
        if let Some(c) = event
            .chars()
            .find(|&c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')))
        {
            return Err(invalid(format!("unexpected {c:?} in event name")));
        }
        let selector = selector
            .map(SelectorList::parse)
            .transpose()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            event: event.to_string(),
            selector,
        })
    }

    pub fn selector_source(&self) -> Option<&str> {
        self.selector.as_ref().map(SelectorList::source)
    }
}

impl std::fmt::Display for EventSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.selector_source() {
            Some(selector) => write!(f, "{} {}", self.event, selector),
            None => f.write_str(&self.event),
        }
    }
}
