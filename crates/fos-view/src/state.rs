//! State Flags
//!
//! Flags live in `data-<dashed-key>` attributes on a view's root element
//! and are mirrored to at most one derived class per key: `<key>` for
//! `true` (or a falsy non-boolean), `<key>-<value>` for other truthy
//! values, nothing for `false`.

use crate::{Component, Handler, View, ViewResult};
use std::rc::Rc;

/// Flag value
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
    Number(f64),
    Null,
}

impl FlagValue {
    /// JavaScript-style truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => !s.is_empty(),
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Null => false,
        }
    }

    /// Coerce the strings `"true"` and `"false"` to booleans
    pub fn to_boolean(self) -> Self {
        match self {
            Self::Text(s) if s == "true" => Self::Bool(true),
            Self::Text(s) if s == "false" => Self::Bool(false),
            other => other,
        }
    }
}

impl std::fmt::Display for FlagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => format_number(*n, f),
            Self::Null => f.write_str("null"),
        }
    }
}

fn format_number(n: f64, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        f.write_str("0")
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // 1e21 -> "1e+21", 1.5e-7 -> "1.5e-7"
        let formatted = format!("{n:e}");
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{mantissa}e+{exp}"),
            _ => f.write_str(&formatted),
        }
    } else {
        write!(f, "{n}")
    }
}

impl From<bool> for FlagValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for FlagValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for FlagValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

macro_rules! number_from {
    ($($t:ty),*) => {
        $(impl From<$t> for FlagValue {
            fn from(n: $t) -> Self {
                Self::Number(n as f64)
            }
        })*
    };
}

number_from!(i32, i64, u32, u64, usize, f32, f64);

impl<T: Into<FlagValue>> From<Option<T>> for FlagValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Normalize a flag key into a lowercase, hyphen-separated token.
///
/// Runs of characters outside `[A-Za-z0-9_]` become one hyphen, a
/// lowercase letter or digit followed by an uppercase letter gets a hyphen
/// between them, and hyphens at either end are dropped.
pub fn dasherize(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    let mut pending_hyphen = false;

    for c in key.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            let camel_boundary = prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
                && c.is_ascii_uppercase();
            if (pending_hyphen || camel_boundary) && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
            prev = Some(c);
        } else {
            pending_hyphen = true;
            prev = None;
        }
    }

    out
}

/// Class derived from a dashed key and a value
pub fn to_class_name(key: &str, value: &FlagValue) -> Option<String> {
    match value.clone().to_boolean() {
        FlagValue::Bool(true) => Some(key.to_string()),
        FlagValue::Bool(false) => None,
        v if v.is_truthy() => Some(format!("{key}-{v}")),
        _ => Some(key.to_string()),
    }
}

/// Attribute name holding a flag
pub(crate) fn data_attribute(dashed: &str) -> String {
    format!("data-{dashed}")
}

/// The `-enabled` / `-disabled` flag pair for a key
pub(crate) fn enabled_pair(key: Option<&str>) -> (String, String) {
    match key {
        Some(key) => (format!("{key}-enabled"), format!("{key}-disabled")),
        None => ("enabled".to_string(), "disabled".to_string()),
    }
}

/// Deferred `set` of one flag
///
/// A forced value always wins over the value passed to `apply`; with
/// neither, `apply` marks the flag `true`.
#[derive(Debug, Clone, PartialEq)]
pub struct Setter {
    key: String,
    forced: Option<FlagValue>,
}

impl Setter {
    pub fn new(key: &str, forced: Option<FlagValue>) -> Self {
        Self {
            key: key.to_string(),
            forced,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn apply(&self, view: &mut View, value: Option<FlagValue>) -> ViewResult<()> {
        match self.forced.clone().or(value) {
            Some(value) => view.set(&self.key, value)?,
            None => view.mark(&self.key)?,
        };
        Ok(())
    }

    /// Event handler applying this setter with no call-time value
    pub fn into_handler<C: Component>(self) -> Handler<C> {
        Rc::new(move |component: &mut C, _event| self.apply(component.view_mut(), None))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagOp {
    Enable,
    Disable,
    Toggle,
}

/// Deferred `enable`, `disable` or `toggle`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagAction {
    op: FlagOp,
    key: Option<String>,
}

impl FlagAction {
    pub fn enable(key: Option<&str>) -> Self {
        Self::with(FlagOp::Enable, key)
    }

    pub fn disable(key: Option<&str>) -> Self {
        Self::with(FlagOp::Disable, key)
    }

    pub fn toggle(key: Option<&str>) -> Self {
        Self::with(FlagOp::Toggle, key)
    }

    fn with(op: FlagOp, key: Option<&str>) -> Self {
        Self {
            op,
            key: key.map(str::to_string),
        }
    }

    pub fn apply(&self, view: &mut View) -> ViewResult<()> {
        let key = self.key.as_deref();
        match self.op {
            FlagOp::Enable => view.enable(key)?,
            FlagOp::Disable => view.disable(key)?,
            FlagOp::Toggle => view.toggle(key)?,
        };
        Ok(())
    }

    /// Event handler applying this action
    pub fn into_handler<C: Component>(self) -> Handler<C> {
        Rc::new(move |component: &mut C, _event| self.apply(component.view_mut()))
    }
}
