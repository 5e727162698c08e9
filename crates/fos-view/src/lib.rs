//! fOS View
//!
//! Structured UI components bound to a single root element of a `fos-dom`
//! document. A view projects state flags onto `data-*` attributes and
//! derived classes, routes delegated DOM events to its component, emits
//! lifecycle events and can be extended by embedding.
//!
//! # Example
//! ```rust,ignore
//! use fos_view::{shared_document, BasicView, Component, ViewConfig};
//!
//! let doc = shared_document(Document::default());
//! let mut dialog = BasicView::new(&doc, ViewConfig::new().with_name("dialog"))?;
//! let body = doc.borrow().body();
//! dialog.view_mut().insert_as_last_child(Some(body))?.set("open", true)?;
//! ```

mod component;
mod config;
mod emitter;
mod events;
mod state;
mod view;

pub use component::{parent_events, parent_method, BasicView, Component, Root};
pub use config::{DestroyOptions, RemoveOptions, ViewConfig};
pub use emitter::{Emitter, SubscriptionId};
pub use events::{handler, Callback, EventMap, EventSpec, Handler};
pub use state::{dasherize, to_class_name, FlagAction, FlagValue, Setter};
pub use view::View;

pub use fos_dom::{Document, DomEvent, ListenerId, NodeId};

use fos_dom::DomError;
use fos_html::HtmlError;
use std::cell::RefCell;
use std::rc::Rc;

/// Document shared between the views rendering into it
pub type SharedDocument = Rc<RefCell<Document>>;

/// Wrap a document for sharing between views
pub fn shared_document(doc: Document) -> SharedDocument {
    Rc::new(RefCell::new(doc))
}

/// Result type for view operations
pub type ViewResult<T> = Result<T, ViewError>;

/// View errors
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Html(#[from] HtmlError),

    #[error("Invalid event spec {spec:?}: {reason}")]
    EventSpec { spec: String, reason: String },

    #[error("No method named {0:?} to handle events")]
    UnknownMethod(String),

    #[error("View has been destroyed")]
    Destroyed,
}
