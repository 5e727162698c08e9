//! Edge case tests for fos-view

use fos_view::{
    dasherize, handler, shared_document, BasicView, Component, DestroyOptions, Document, DomEvent,
    EventMap, EventSpec, FlagValue, RemoveOptions, ViewConfig, ViewError,
};
use std::cell::RefCell;
use std::rc::Rc;

fn view() -> BasicView {
    let doc = shared_document(Document::default());
    BasicView::new(&doc, ViewConfig::default()).unwrap()
}

#[test]
fn test_insert_without_parent_is_silent() {
    let mut view = view();
    let count = Rc::new(RefCell::new(0));
    let sink = count.clone();
    view.view_mut().on("inserted", move |_| *sink.borrow_mut() += 1);

    view.view_mut().insert_as_last_child(None).unwrap();
    view.view_mut().insert_as_first_child(None).unwrap();
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn test_insert_into_text_node_fails() {
    let doc = shared_document(Document::default());
    let text = doc.borrow_mut().tree_mut().create_text("hi");
    let mut view = BasicView::new(&doc, ViewConfig::default()).unwrap();

    let result = view.view_mut().insert_as_last_child(Some(text));
    assert!(matches!(result, Err(ViewError::Dom(_))));
}

#[test]
fn test_remove_without_parent_emits_nothing() {
    let mut view = view();
    let count = Rc::new(RefCell::new(0));
    let sink = count.clone();
    view.view_mut().on("remove", move |_| *sink.borrow_mut() += 1);

    view.view_mut().remove(RemoveOptions::default()).unwrap();
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn test_remove_after_destroy_is_noop() {
    let mut view = view();
    view.destroy(DestroyOptions::default()).unwrap();
    assert!(view.view_mut().remove(RemoveOptions::default()).is_ok());
    assert!(view.destroy(DestroyOptions::default()).is_ok());
}

#[test]
fn test_destroy_emits_once() {
    let mut view = view();
    let count = Rc::new(RefCell::new(0));
    let sink = count.clone();
    view.view_mut().on("destroy", move |_| *sink.borrow_mut() += 1);

    view.destroy(DestroyOptions::default()).unwrap();
    view.destroy(DestroyOptions::default()).unwrap();
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn test_ops_after_destroy() {
    let mut view = view();
    view.destroy(DestroyOptions::default()).unwrap();

    assert!(matches!(view.view_mut().set("a", 1), Err(ViewError::Destroyed)));
    assert!(matches!(view.view_mut().unset("a"), Err(ViewError::Destroyed)));
    assert!(matches!(view.view_mut().toggle(None), Err(ViewError::Destroyed)));
    assert!(matches!(view.view_mut().set_html("<p></p>"), Err(ViewError::Destroyed)));
    assert!(matches!(
        view.attach("click", None, handler(|_: &mut BasicView, _| Ok(()))),
        Err(ViewError::Destroyed)
    ));
    assert!(matches!(
        view.dispatch(&mut DomEvent::new("click", fos_view::NodeId::ROOT)),
        Err(ViewError::Destroyed)
    ));
    assert_eq!(view.view().get("a"), None);
    assert!(view.view().classes().is_empty());
}

#[test]
fn test_falsy_values_unset() {
    let mut view = view();
    for falsy in [FlagValue::from(false), FlagValue::from(""), FlagValue::from(0), FlagValue::Null] {
        view.view_mut().set("flag", true).unwrap();
        view.view_mut().set("flag", falsy).unwrap();
        assert_eq!(view.view().get("flag"), None);
        assert!(!view.view().has_class("flag"));
    }
}

#[test]
fn test_unset_missing_flag() {
    let mut view = view();
    let before = view.view().classes();
    view.view_mut().unset("never").unwrap();
    assert_eq!(view.view().classes(), before);
}

#[test]
fn test_one_derived_class_per_key() {
    let mut view = view();
    for value in ["a", "b", "c"] {
        view.view_mut().set("step", value).unwrap();
    }
    let derived: Vec<_> = view
        .view()
        .classes()
        .into_iter()
        .filter(|c| c == "step" || c.starts_with("step-"))
        .collect();
    assert_eq!(derived, vec!["step-c"]);
}

#[test]
fn test_punctuated_keys() {
    let mut view = view();
    view.view_mut().set("foo bar!", true).unwrap();
    assert_eq!(view.view().get("foo-bar").as_deref(), Some("true"));
    assert!(view.view().has_class("foo-bar"));
    assert_eq!(dasherize("-leading"), "leading");
}

#[test]
fn test_whitespace_value_rejected() {
    let mut view = view();
    let result = view.view_mut().set("mode", "dark blue");
    assert!(matches!(result, Err(ViewError::Dom(_))));
    assert_eq!(view.view().get("mode"), None);
}

#[test]
fn test_event_spec_errors() {
    assert!(matches!(EventSpec::parse(""), Err(ViewError::EventSpec { .. })));
    assert!(matches!(EventSpec::parse("click >"), Err(ViewError::EventSpec { .. })));

    let mut view = view();
    let map = EventMap::new().handler("  ", |_: &mut BasicView, _| Ok(()));
    assert!(view.attach_all(map).is_err());
    assert!(view.attach("click", Some("div >"), handler(|_: &mut BasicView, _| Ok(()))).is_err());
    assert_eq!(view.view().listener_count(), 0);
}

#[test]
fn test_duplicate_spec_replaces_entry() {
    let map = EventMap::<BasicView>::new()
        .method("click .a", "first")
        .method("keydown", "other")
        .method("click .a", "second");
    assert_eq!(map.len(), 2);
    assert_eq!(map.specs().collect::<Vec<_>>(), vec!["click .a", "keydown"]);
}

#[test]
fn test_event_outside_root_runs_nothing() {
    let doc = shared_document(Document::default());
    let body = doc.borrow().body();
    let mut view = BasicView::new(&doc, ViewConfig::default()).unwrap();
    view.attach("click", None, handler(|_: &mut BasicView, _| Ok(()))).unwrap();

    assert_eq!(view.dispatch(&mut DomEvent::new("click", body)).unwrap(), 0);
}

#[test]
fn test_scoped_listener_skips_root() {
    let mut view = view();
    view.view_mut().set_html("<div class=\"x\"></div>").unwrap();
    let root = view.view().el().unwrap();
    view.attach("click", Some("div"), handler(|v: &mut BasicView, _| {
        v.view_mut().mark("hit")?;
        Ok(())
    }))
    .unwrap();

    assert_eq!(view.dispatch(&mut DomEvent::new("click", root)).unwrap(), 0);
    assert_eq!(view.view().get("hit"), None);
}

#[test]
fn test_handler_destroying_view_stops_dispatch() {
    let mut view = view();
    view.view_mut().set_html("<button></button>").unwrap();
    view.attach("click", Some("button"), handler(|v: &mut BasicView, _| {
        v.destroy(DestroyOptions::default())
    }))
    .unwrap();
    view.attach("click", None, handler(|v: &mut BasicView, _| {
        v.view_mut().mark("late")?;
        Ok(())
    }))
    .unwrap();

    let button = view.view().find("button").unwrap().unwrap();
    assert_eq!(view.dispatch(&mut DomEvent::new("click", button)).unwrap(), 1);
    assert!(view.view().is_destroyed());
}

#[test]
fn test_adopted_element_id_preserved() {
    let doc = shared_document(Document::default());
    let el = doc.borrow_mut().create_element("form").unwrap();
    doc.borrow_mut().tree_mut().set_attribute(el, "id", "signup").unwrap();

    let view = BasicView::new(&doc, ViewConfig::new().with_el(el)).unwrap();
    assert_eq!(view.view().id(), "signup");
    assert!(view.view().has_class("view"));
}

#[test]
fn test_config_id_used_when_missing() {
    let doc = shared_document(Document::default());
    let view = BasicView::new(&doc, ViewConfig::new().with_id("main-nav")).unwrap();
    let el = view.view().el().unwrap();
    assert_eq!(view.view().id(), "main-nav");
    assert_eq!(doc.borrow().tree().get_attribute(el, "id"), Some("main-nav"));
}
