use std::cell::RefCell;
use std::rc::Rc;

use super::*;

fn record(node: &Node, event_type: &str) -> (Rc<RefCell<Vec<String>>>, Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let sub = node.add_listener(event_type, Box::new(move |target: &Node| sink.borrow_mut().push(target.tag())));
    (seen, sub)
}

// =============================================================
// Construction
// =============================================================

#[test]
fn checkbox_defaults_to_on_value() {
    let node = Node::input("checkbox");
    assert_eq!(node.field_kind(), Some(FieldKind::Checkbox));
    assert_eq!(node.value(), "on");
    assert!(!node.checked());
}

#[test]
fn value_attribute_sets_toggle_value() {
    let node = Node::input("radio").with_attribute("value", "red");
    assert_eq!(node.value(), "red");
    assert_eq!(node.attribute("value").as_deref(), Some("red"));
}

#[test]
fn text_input_kind() {
    assert_eq!(Node::input("text").field_kind(), Some(FieldKind::Input));
    assert_eq!(Node::input("email").field_kind(), Some(FieldKind::Input));
    assert_eq!(Node::select().field_kind(), Some(FieldKind::Select));
    assert_eq!(Node::textarea().field_kind(), Some(FieldKind::TextArea));
    assert_eq!(Node::element("span").field_kind(), None);
}

#[test]
fn set_attribute_replaces_existing() {
    let node = Node::element("div").with_attribute("store", "a");
    node.set_attribute("store", "b");
    assert_eq!(node.attribute("store").as_deref(), Some("b"));
    node.remove_attribute("store");
    assert!(!node.has_attribute("store"));
}

// =============================================================
// Tree
// =============================================================

#[test]
fn descendants_are_in_document_order() {
    let a = Node::element("a");
    let b = Node::element("b");
    let c = Node::element("c");
    let d = Node::element("d");
    let root = Node::element("root").with_child(&a.clone().with_child(&b)).with_child(&c.clone().with_child(&d));

    let tags: Vec<String> = root.descendants().iter().map(Node::tag).collect();
    assert_eq!(tags, ["a", "b", "c", "d"]);
    assert!(b.parent().is_some_and(|p| p.ptr_eq(&a)));
}

#[test]
fn query_attribute_filters_descendants() {
    let bound = Node::element("span").with_attribute("data-get-store", "");
    let root = Node::element("div").with_child(&Node::element("p")).with_child(&bound);
    let found = root.query_attribute("data-get-store");
    assert_eq!(found.len(), 1);
    assert!(found[0].ptr_eq(&bound));
}

#[test]
fn text_content_replaces_children() {
    let root = Node::element("div").with_child(&Node::element("b").with_text("bold")).with_text("");
    assert!(root.children().is_empty());
    root.append_child(&Node::element("i").with_text("x"));
    assert_eq!(root.text_content(), "x");
    root.set_text_content("plain");
    assert_eq!(root.text_content(), "plain");
}

// =============================================================
// Events
// =============================================================

#[test]
fn dispatch_bubbles_to_ancestors_with_original_target() {
    let field = Node::input("text");
    let root = Node::element("form").with_child(&Node::element("div").with_child(&field));
    let (seen, _sub) = record(&root, "change");

    field.dispatch("change");

    assert_eq!(*seen.borrow(), ["input"]);
}

#[test]
fn dispatch_ignores_other_event_types() {
    let field = Node::input("text");
    let root = Node::element("form").with_child(&field);
    let (seen, _sub) = record(&root, "input");

    field.dispatch("change");

    assert!(seen.borrow().is_empty());
}

#[test]
fn dropped_listener_is_removed() {
    let root = Node::element("div");
    let (seen, sub) = record(&root, "change");
    assert_eq!(root.listener_count(), 1);
    drop(sub);
    assert_eq!(root.listener_count(), 0);
    root.dispatch("change");
    assert!(seen.borrow().is_empty());
}

#[test]
fn type_text_fires_input_then_change() {
    let field = Node::input("text");
    let root = Node::element("form").with_child(&field);
    let order = Rc::new(RefCell::new(Vec::new()));
    let (o1, o2) = (Rc::clone(&order), Rc::clone(&order));
    let _a = root.add_listener("input", Box::new(move |_: &Node| o1.borrow_mut().push("input")));
    let _b = root.add_listener("change", Box::new(move |_: &Node| o2.borrow_mut().push("change")));

    field.type_text("hello");

    assert_eq!(field.value(), "hello");
    assert_eq!(*order.borrow(), ["input", "change"]);
}

#[test]
fn click_toggles_checkbox() {
    let checkbox = Node::input("checkbox");
    checkbox.click();
    assert!(checkbox.checked());
    checkbox.click();
    assert!(!checkbox.checked());
}

#[test]
fn click_radio_unchecks_group() {
    let red = Node::input("radio").with_attribute("name", "color").with_attribute("value", "red");
    let blue = Node::input("radio").with_attribute("name", "color").with_attribute("value", "blue");
    let other = Node::input("radio").with_attribute("name", "size").with_checked(true);
    let _root = Node::element("form").with_child(&red).with_child(&blue).with_child(&other);

    red.click();
    blue.click();

    assert!(!red.checked());
    assert!(blue.checked());
    assert!(other.checked());
}

#[test]
fn click_checked_radio_fires_nothing() {
    let radio = Node::input("radio").with_checked(true);
    let root = Node::element("form").with_child(&radio);
    let (seen, _sub) = record(&root, "change");

    radio.click();

    assert!(seen.borrow().is_empty());
}

#[test]
fn listener_may_dispatch_reentrantly() {
    let field = Node::input("text");
    let root = Node::element("form").with_child(&field);
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    let inner = field.clone();
    let _sub = root.add_listener(
        "change",
        Box::new(move |_: &Node| {
            *counter.borrow_mut() += 1;
            if inner.value().is_empty() {
                inner.set_value("x");
                inner.dispatch("change");
            }
        }),
    );

    field.dispatch("change");

    assert_eq!(*count.borrow(), 2);
}
