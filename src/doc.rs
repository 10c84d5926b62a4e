//! In-memory element tree.
//!
//! DESIGN
//! ======
//! A small DOM stand-in so the synchronization logic can run without a
//! browser: elements with attributes, field state, text, children, and
//! listeners that receive bubbling events. `Node` is a cheap `Rc` handle;
//! clones refer to the same element.
//!
//! Event dispatch walks from the target up to the root. Listener lists are
//! snapshotted per node before invocation and no `RefCell` borrow is held
//! while a handler runs, so handlers may mutate the tree or dispatch again.
//!
//! TRADE-OFFS
//! ==========
//! Every event bubbles and there is no capture phase, `preventDefault` or
//! `stopPropagation`. The component never relies on them.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::consts::CHANGE_EVENT;
use crate::dom::{self, EventHandler, FieldKind};
use crate::subscription::Subscription;

#[cfg(test)]
#[path = "doc_test.rs"]
mod tests;

/// Value a checkbox/radio reports when it has no `value` attribute.
const DEFAULT_TOGGLE_VALUE: &str = "on";

const INPUT_EVENT: &str = "input";

struct Listener {
    id: u64,
    event_type: String,
    handler: Rc<dyn Fn(&Node)>,
}

struct NodeData {
    tag: String,
    attributes: Vec<(String, String)>,
    kind: Option<FieldKind>,
    value: String,
    checked: bool,
    text: String,
    parent: Weak<RefCell<NodeData>>,
    children: Vec<Node>,
    listeners: Vec<Listener>,
    next_listener_id: u64,
}

/// Handle to an element in the tree.
#[derive(Clone)]
pub struct Node {
    inner: Rc<RefCell<NodeData>>,
}

// =============================================================================
// CONSTRUCTION
// =============================================================================

impl Node {
    fn with_kind(tag: &str, kind: Option<FieldKind>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(NodeData {
                tag: tag.to_owned(),
                attributes: Vec::new(),
                kind,
                value: String::new(),
                checked: false,
                text: String::new(),
                parent: Weak::new(),
                children: Vec::new(),
                listeners: Vec::new(),
                next_listener_id: 0,
            })),
        }
    }

    /// A plain, non-field element such as `div` or `span`.
    pub fn element(tag: &str) -> Self {
        Self::with_kind(tag, None)
    }

    /// An `<input type=...>`. Checkboxes and radios default to value `on`.
    pub fn input(input_type: &str) -> Self {
        let kind = FieldKind::from_input_type(input_type);
        let node = Self::with_kind("input", Some(kind)).with_attribute("type", input_type);
        if kind.is_toggle() {
            node.inner.borrow_mut().value = DEFAULT_TOGGLE_VALUE.to_owned();
        }
        node
    }

    pub fn select() -> Self {
        Self::with_kind("select", Some(FieldKind::Select))
    }

    pub fn textarea() -> Self {
        Self::with_kind("textarea", Some(FieldKind::TextArea))
    }

    /// Builder form of [`Node::set_attribute`].
    ///
    /// For checkbox/radio inputs a `value` attribute also sets the value.
    #[must_use]
    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        if name == "value" && self.field_kind().is_some_and(FieldKind::is_toggle) {
            self.set_value(value);
        }
        self
    }

    #[must_use]
    pub fn with_value(self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    #[must_use]
    pub fn with_checked(self, checked: bool) -> Self {
        self.set_checked(checked);
        self
    }

    #[must_use]
    pub fn with_text(self, text: &str) -> Self {
        self.set_text_content(text);
        self
    }

    #[must_use]
    pub fn with_child(self, child: &Node) -> Self {
        self.append_child(child);
        self
    }

    /// Attach `child` as the last child of this element.
    pub fn append_child(&self, child: &Node) {
        child.inner.borrow_mut().parent = Rc::downgrade(&self.inner);
        self.inner.borrow_mut().children.push(child.clone());
    }
}

// =============================================================================
// ACCESSORS
// =============================================================================

impl Node {
    pub fn tag(&self) -> String {
        self.inner.borrow().tag.clone()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner.borrow().attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.inner.borrow().attributes.iter().any(|(k, _)| k == name)
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        let mut data = self.inner.borrow_mut();
        match data.attributes.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => value.clone_into(&mut slot.1),
            None => data.attributes.push((name.to_owned(), value.to_owned())),
        }
    }

    pub fn remove_attribute(&self, name: &str) {
        self.inner.borrow_mut().attributes.retain(|(k, _)| k != name);
    }

    pub fn field_kind(&self) -> Option<FieldKind> {
        self.inner.borrow().kind
    }

    pub fn value(&self) -> String {
        self.inner.borrow().value.clone()
    }

    pub fn set_value(&self, value: &str) {
        value.clone_into(&mut self.inner.borrow_mut().value);
    }

    pub fn checked(&self) -> bool {
        self.inner.borrow().checked
    }

    pub fn set_checked(&self, checked: bool) {
        self.inner.borrow_mut().checked = checked;
    }

    /// Own text followed by the text of every descendant.
    pub fn text_content(&self) -> String {
        let (mut text, children) = {
            let data = self.inner.borrow();
            (data.text.clone(), data.children.clone())
        };
        for child in children {
            text.push_str(&child.text_content());
        }
        text
    }

    /// Replace all children with `text`.
    pub fn set_text_content(&self, text: &str) {
        let mut data = self.inner.borrow_mut();
        data.children.clear();
        text.clone_into(&mut data.text);
    }

    pub fn parent(&self) -> Option<Node> {
        self.inner.borrow().parent.upgrade().map(|inner| Node { inner })
    }

    pub fn children(&self) -> Vec<Node> {
        self.inner.borrow().children.clone()
    }

    /// All descendants in document (pre-)order, excluding `self`.
    pub fn descendants(&self) -> Vec<Node> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants(&self, out: &mut Vec<Node>) {
        for child in self.children() {
            out.push(child.clone());
            child.collect_descendants(out);
        }
    }

    /// Descendants carrying `attribute`, in document order.
    pub fn query_attribute(&self, attribute: &str) -> Vec<Node> {
        self.descendants().into_iter().filter(|n| n.has_attribute(attribute)).collect()
    }

    fn root(&self) -> Node {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

// =============================================================================
// EVENTS
// =============================================================================

impl Node {
    /// Listen for `event_type` on this element and events bubbling into it.
    pub fn add_listener(&self, event_type: &str, handler: Box<dyn Fn(&Node)>) -> Subscription {
        let id = {
            let mut data = self.inner.borrow_mut();
            let id = data.next_listener_id;
            data.next_listener_id += 1;
            data.listeners.push(Listener { id, event_type: event_type.to_owned(), handler: Rc::from(handler) });
            id
        };
        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|l| l.id != id);
            }
        })
    }

    /// Dispatch a bubbling `event_type` with this element as target.
    pub fn dispatch(&self, event_type: &str) {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            let handlers: Vec<Rc<dyn Fn(&Node)>> = node
                .inner
                .borrow()
                .listeners
                .iter()
                .filter(|l| l.event_type == event_type)
                .map(|l| Rc::clone(&l.handler))
                .collect();
            for handler in handlers {
                handler(self);
            }
            current = node.parent();
        }
    }

    /// Emulate a user committing `value` into a text-like field.
    pub fn type_text(&self, value: &str) {
        self.set_value(value);
        self.dispatch(INPUT_EVENT);
        self.dispatch(CHANGE_EVENT);
    }

    /// Emulate a user click on a checkbox or radio.
    ///
    /// A checkbox toggles. A radio becomes checked and unchecks radios with
    /// the same `name` in the same tree; clicking a checked radio does nothing.
    pub fn click(&self) {
        match self.field_kind() {
            Some(FieldKind::Checkbox) => self.set_checked(!self.checked()),
            Some(FieldKind::Radio) => {
                if self.checked() {
                    return;
                }
                if let Some(name) = self.attribute("name") {
                    for other in self.root().descendants() {
                        if other.field_kind() == Some(FieldKind::Radio)
                            && other.attribute("name").as_deref() == Some(name.as_str())
                        {
                            other.set_checked(false);
                        }
                    }
                }
                self.set_checked(true);
            }
            _ => return,
        }
        self.dispatch(INPUT_EVENT);
        self.dispatch(CHANGE_EVENT);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.inner.borrow();
        f.debug_struct("Node")
            .field("tag", &data.tag)
            .field("attributes", &data.attributes)
            .field("value", &data.value)
            .field("checked", &data.checked)
            .field("children", &data.children.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// CAPABILITIES
// =============================================================================

impl dom::Element for Node {
    fn attribute(&self, name: &str) -> Option<String> {
        Node::attribute(self, name)
    }

    fn has_attribute(&self, name: &str) -> bool {
        Node::has_attribute(self, name)
    }

    fn field_kind(&self) -> Option<FieldKind> {
        Node::field_kind(self)
    }

    fn value(&self) -> String {
        Node::value(self)
    }

    fn set_value(&self, value: &str) {
        Node::set_value(self, value);
    }

    fn checked(&self) -> bool {
        Node::checked(self)
    }

    fn set_checked(&self, checked: bool) {
        Node::set_checked(self, checked);
    }

    fn set_text_content(&self, text: &str) {
        Node::set_text_content(self, text);
    }

    fn dispatch_change(&self) {
        self.dispatch(CHANGE_EVENT);
    }
}

impl dom::Host for Node {
    type Element = Node;

    fn attribute(&self, name: &str) -> Option<String> {
        Node::attribute(self, name)
    }

    fn has_attribute(&self, name: &str) -> bool {
        Node::has_attribute(self, name)
    }

    fn descendants_with(&self, attribute: &str) -> Vec<Node> {
        self.query_attribute(attribute)
    }

    fn add_listener(&self, event_type: &str, handler: EventHandler<Node>) -> Subscription {
        Node::add_listener(self, event_type, handler)
    }
}
