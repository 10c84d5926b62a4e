//! Element capabilities the synchronization logic depends on.
//!
//! DESIGN
//! ======
//! `StoreSync` only needs a narrow slice of the DOM: attribute lookup,
//! field value/checked state, text content, and a bubbling `change`
//! dispatch. [`Element`] captures that slice; [`Host`] adds what the
//! custom element itself provides (descendant query and delegated event
//! listeners). Both are implemented by `doc::Node` and, in the browser, by
//! the `web` bindings.

use crate::subscription::Subscription;

/// Kind of field-capable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `<input>` of any type other than checkbox/radio.
    Input,
    Checkbox,
    Radio,
    Select,
    TextArea,
}

impl FieldKind {
    /// Classify an `<input>` by its `type` attribute.
    pub fn from_input_type(input_type: &str) -> Self {
        if input_type.eq_ignore_ascii_case("checkbox") {
            Self::Checkbox
        } else if input_type.eq_ignore_ascii_case("radio") {
            Self::Radio
        } else {
            Self::Input
        }
    }

    /// Checkbox and radio controls store their `value` only when checked.
    pub fn is_toggle(self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }
}

/// A node the component reads from or writes into.
pub trait Element {
    fn attribute(&self, name: &str) -> Option<String>;

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// `Some` for inputs, selects and textareas.
    fn field_kind(&self) -> Option<FieldKind>;

    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    fn checked(&self) -> bool;
    fn set_checked(&self, checked: bool);
    fn set_text_content(&self, text: &str);

    /// Dispatch a bubbling `change` event from this element.
    fn dispatch_change(&self);
}

pub type EventHandler<E> = Box<dyn Fn(&E)>;

/// The custom element hosting the bindings.
pub trait Host {
    type Element: Element + Clone + 'static;

    fn attribute(&self, name: &str) -> Option<String>;

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Descendants carrying `attribute`, in document order.
    fn descendants_with(&self, attribute: &str) -> Vec<Self::Element>;

    /// Listen for `event_type` on the host, including events bubbling from
    /// descendants. The handler receives the event target.
    fn add_listener(&self, event_type: &str, handler: EventHandler<Self::Element>) -> Subscription;
}
