//! View Configuration

use fos_dom::NodeId;
use serde::{Deserialize, Serialize};

/// View construction options
///
/// Deserializes from camelCase keys (`tag`, `name`, `className`, `id`);
/// unknown keys are rejected. `el` can only be set in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ViewConfig {
    /// Existing element to adopt instead of creating one
    #[serde(skip)]
    pub el: Option<NodeId>,

    /// Tag of the element created when `el` is absent
    pub tag: String,

    /// Semantic class name added to the root element
    pub name: String,

    /// Extra class(es) added before `name`
    pub class_name: Option<String>,

    /// Id used when the root element has none; generated otherwise
    pub id: Option<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            el: None,
            tag: "div".to_string(),
            name: "view".to_string(),
            class_name: None,
            id: None,
        }
    }
}

impl ViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_el(mut self, el: NodeId) -> Self {
        self.el = Some(el);
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_class_name(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }
}

/// Options for `View::remove`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Skip the `remove` event
    pub silent: bool,
}

impl RemoveOptions {
    pub fn silent() -> Self {
        Self { silent: true }
    }
}

/// Options for `View::destroy`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DestroyOptions {
    /// Leave the root element attached to its parent
    pub no_remove: bool,
}

impl DestroyOptions {
    pub fn no_remove() -> Self {
        Self { no_remove: true }
    }
}
