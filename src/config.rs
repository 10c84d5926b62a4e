//! Component configuration read from instance attributes.
//!
//! Attributes:
//! - `store`: storage key; absent or empty disables the component
//! - `event-type`: event that triggers a write, `change` when absent or empty
//! - `store-listen`: refresh on storage-change notifications
//! - `debug`: emit diagnostic traces
//!
//! Descendant markers (`data-set-store`, `data-get-store`) are parsed into a
//! [`Selector`] per element at the time of each read or write.

use crate::consts::{ATTR_DEBUG, ATTR_EVENT_TYPE, ATTR_STORE, ATTR_STORE_LISTEN, DEFAULT_EVENT_TYPE};
use crate::dom::{Element, Host};

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSyncConfig {
    pub store: Option<String>,
    pub event_type: String,
    pub listen: bool,
    pub debug: bool,
}

impl Default for StoreSyncConfig {
    fn default() -> Self {
        Self { store: None, event_type: DEFAULT_EVENT_TYPE.to_owned(), listen: false, debug: false }
    }
}

impl StoreSyncConfig {
    /// Config for `store` with every other option at its default.
    pub fn for_key(store: &str) -> Self {
        Self { store: non_empty(Some(store.to_owned())), ..Self::default() }
    }

    /// Read the instance attributes of `host`.
    pub fn from_host<H: Host + ?Sized>(host: &H) -> Self {
        Self::from_attributes(|name| host.attribute(name))
    }

    /// Build from an attribute lookup. Flags count as set when present,
    /// whatever their value.
    pub fn from_attributes(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            store: non_empty(lookup(ATTR_STORE)),
            event_type: non_empty(lookup(ATTR_EVENT_TYPE)).unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_owned()),
            listen: lookup(ATTR_STORE_LISTEN).is_some(),
            debug: lookup(ATTR_DEBUG).is_some(),
        }
    }

    /// The configured storage key, if any.
    pub fn store_key(&self) -> Option<&str> {
        self.store.as_deref()
    }

    #[must_use]
    pub fn listening(mut self, listen: bool) -> Self {
        self.listen = listen;
        self
    }

    #[must_use]
    pub fn debugging(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn on_event(mut self, event_type: &str) -> Self {
        event_type.clone_into(&mut self.event_type);
        self
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.is_empty())
}

/// Which part of the stored value a marked element binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// The whole stored string.
    Whole,
    /// One property of the stored JSON object.
    Property(String),
}

impl Selector {
    /// Parse a marker attribute value. An empty value selects the whole
    /// stored string.
    pub fn from_marker(raw: &str) -> Self {
        if raw.is_empty() { Self::Whole } else { Self::Property(raw.to_owned()) }
    }

    /// Selector declared by `marker` on `element`, or `None` when unmarked.
    pub fn of<E: Element + ?Sized>(element: &E, marker: &str) -> Option<Self> {
        element.attribute(marker).map(|raw| Self::from_marker(&raw))
    }

    pub fn property(&self) -> Option<&str> {
        match self {
            Self::Whole => None,
            Self::Property(name) => Some(name.as_str()),
        }
    }
}
