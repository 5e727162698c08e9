//! Components
//!
//! `Component` is implemented by every struct that owns (directly or through
//! an embedded parent component) a `View`. Hooks have default bodies; an
//! extending component names the component it embeds as `Parent`, and the
//! hooks it does not override fall through to that parent, level by level.

use crate::events::lift;
use crate::{
    DestroyOptions, EventMap, EventSpec, Handler, SharedDocument, View, ViewConfig, ViewResult,
};
use fos_dom::{DomEvent, ListenerId};
use std::any::Any;
use std::rc::Rc;

/// UI component bound to one root element
pub trait Component: Sized + 'static {
    /// Component this one extends; `Root` for none
    type Parent: Component;

    fn view(&self) -> &View;

    fn view_mut(&mut self) -> &mut View;

    /// Embedded parent component
    fn parent(&self) -> Option<&Self::Parent> {
        None
    }

    fn parent_mut(&mut self) -> Option<&mut Self::Parent> {
        None
    }

    /// Runs once after construction, before events are attached.
    ///
    /// The parent's `initialize` runs first, then `render` on this level.
    fn initialize(&mut self) -> ViewResult<()> {
        if let Some(parent) = self.parent_mut() {
            parent.initialize()?;
        }
        self.render()
    }

    /// Replace the root element's content with `template()`
    fn render(&mut self) -> ViewResult<()> {
        let html = self.template();
        self.view_mut().set_html(&html)?;
        Ok(())
    }

    fn template(&self) -> String {
        self.parent().map(Component::template).unwrap_or_default()
    }

    /// Delegated events attached at construction
    fn events(&self) -> EventMap<Self> {
        parent_events(self)
    }

    /// Method table for named event callbacks
    fn method(&self, name: &str) -> Option<Handler<Self>> {
        parent_method(self, name)
    }

    /// Forwards to the parent's `destroy`; the last level tears down the view
    fn destroy(&mut self, options: DestroyOptions) -> ViewResult<()> {
        match self.parent_mut() {
            Some(parent) => parent.destroy(options),
            None => self.view_mut().destroy(options),
        }
    }

    /// Build a view from `config`, wrap it with `build`, initialize and
    /// attach `events()`
    fn create(
        doc: &SharedDocument,
        config: ViewConfig,
        build: impl FnOnce(View) -> Self,
    ) -> ViewResult<Self> {
        let view = View::new(doc, config)?;
        let mut component = build(view);
        component.initialize()?;
        let events = component.events();
        component.attach_all(events)?;
        Ok(component)
    }

    /// Attach one handler, scoped to descendants matching `selector`
    fn attach(
        &mut self,
        event: &str,
        selector: Option<&str>,
        handler: Handler<Self>,
    ) -> ViewResult<ListenerId> {
        let spec = EventSpec::new(event, selector)?;
        let erased: Rc<dyn Any> = Rc::new(handler);
        self.view_mut().register(&spec.event, spec.selector, erased)
    }

    /// Attach every entry of `events`, or none if any entry is invalid
    fn attach_all(&mut self, events: EventMap<Self>) -> ViewResult<Vec<ListenerId>> {
        self.view().live_el()?;

        let mut resolved = Vec::with_capacity(events.len());
        for (spec, callback) in events.into_entries() {
            let spec = EventSpec::parse(&spec)?;
            let handler = callback.resolve(self)?;
            resolved.push((spec, handler));
        }

        let mut ids = Vec::with_capacity(resolved.len());
        for (spec, handler) in resolved {
            let erased: Rc<dyn Any> = Rc::new(handler);
            ids.push(self.view_mut().register(&spec.event, spec.selector, erased)?);
        }
        tracing::debug!("Attached {} delegated event(s) to {}", ids.len(), self.view().id());
        Ok(ids)
    }

    /// Route a DOM event through the delegated handlers; returns how many ran
    fn dispatch(&mut self, event: &mut DomEvent) -> ViewResult<usize> {
        let root = self.view().live_el()?;
        let routed = {
            let view = self.view();
            let doc = view.document().borrow();
            view.delegator.route(doc.tree(), root, event)
        };

        let mut ran = 0;
        let mut current = None;
        for (node, erased) in routed {
            if self.view().is_destroyed() {
                break;
            }
            if event.is_propagation_stopped() && current != Some(node) {
                break;
            }
            current = Some(node);

            let Some(handler) = (*erased).downcast_ref::<Handler<Self>>().cloned() else {
                tracing::trace!("Skipped handler bound by another component type");
                continue;
            };
            event.current_target = Some(node);
            handler(self, event)?;
            ran += 1;
        }
        event.current_target = None;
        Ok(ran)
    }
}

/// A parent's events, re-targeted at `component`
pub fn parent_events<C: Component>(component: &C) -> EventMap<C> {
    component
        .parent()
        .map(|parent| parent.events().lift::<C>())
        .unwrap_or_default()
}

/// A parent's named method, re-targeted at `component`
pub fn parent_method<C: Component>(component: &C, name: &str) -> Option<Handler<C>> {
    component.parent()?.method(name).map(lift::<C::Parent, C>)
}

/// End of every extension chain; uninhabited
#[derive(Debug)]
pub enum Root {}

impl Component for Root {
    type Parent = Root;

    fn view(&self) -> &View {
        match *self {}
    }

    fn view_mut(&mut self) -> &mut View {
        match *self {}
    }
}

/// Component with no behavior beyond the defaults
#[derive(Debug)]
pub struct BasicView {
    view: View,
}

impl BasicView {
    pub fn new(doc: &SharedDocument, config: ViewConfig) -> ViewResult<Self> {
        Self::create(doc, config, Self::from_view)
    }

    /// Wrap a view without running any hooks
    pub fn from_view(view: View) -> Self {
        Self { view }
    }
}

impl Component for BasicView {
    type Parent = Root;

    fn view(&self) -> &View {
        &self.view
    }

    fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }
}
