//! The `StoreSync` component.
//!
//! DESIGN
//! ======
//! Two paths share one configured storage key:
//!
//! - Writer: a delegated listener on the host for the configured event type.
//!   When the target is a field carrying `data-set-store`, its value (or `""`
//!   for an unchecked checkbox/radio) is written under the key, either whole
//!   or merged into one property of the stored JSON object. A
//!   [`StorageEvent`] is then published for listeners in this context.
//! - Reader: every descendant carrying `data-get-store` is refreshed from
//!   the stored value on attachment and, with `store-listen`, whenever a
//!   notification for the key arrives.
//!
//! Refresh dispatches `change` only when it actually changed an element, so
//! an element bound both ways settles after one round trip instead of
//! looping.
//!
//! TRADE-OFFS
//! ==========
//! Read-bound elements are collected once at attachment. Elements added
//! later are not refreshed until the component is attached again.
//!
//! Listener closures hold a strong `Rc` to the component. The returned
//! [`Attachment`] owns every registration, so dropping it releases the
//! closures and with them the component.

use std::rc::Rc;

use crate::config::{Selector, StoreSyncConfig};
use crate::consts::{EMPTY_BAG, MARKER_GET, MARKER_SET};
use crate::dom::{Element, Host};
use crate::error::StoreError;
use crate::notify::{Notifier, StorageEvent};
use crate::storage::Storage;
use crate::subscription::Subscription;
use crate::value::{StoreValue, merge_property};

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;

pub struct StoreSync<S, N> {
    config: StoreSyncConfig,
    storage: S,
    notifier: N,
}

impl<S: Storage, N: Notifier> StoreSync<S, N> {
    pub fn new(config: StoreSyncConfig, storage: S, notifier: N) -> Self {
        Self { config, storage, notifier }
    }

    pub fn config(&self) -> &StoreSyncConfig {
        &self.config
    }

    // --- Writer path ---

    /// Handle a write-triggering event whose target is `target`.
    ///
    /// Ignored unless a key is configured and `target` is a field carrying
    /// `data-set-store`. Storage failures are logged and dropped.
    pub fn write_from<E: Element + ?Sized>(&self, target: &E) {
        let Some(key) = self.config.store_key() else {
            return;
        };
        let Some(kind) = target.field_kind() else {
            return;
        };
        let Some(selector) = Selector::of(target, MARKER_SET) else {
            return;
        };

        let candidate = if kind.is_toggle() && !target.checked() { String::new() } else { target.value() };
        if let Err(err) = self.store(key, &selector, &candidate) {
            tracing::warn!(key, error = %err, "store write failed");
        }
    }

    fn store(&self, key: &str, selector: &Selector, candidate: &str) -> Result<(), StoreError> {
        let previous = self
            .storage
            .get_item(key)?
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| EMPTY_BAG.to_owned());
        if self.config.debug {
            tracing::debug!(key, property = ?selector.property(), value = candidate, previous = %previous, "set_store");
        }

        let next = match selector.property() {
            Some(property) => merge_property(&previous, property, candidate)?,
            None => candidate.to_owned(),
        };
        self.storage.set_item(key, &next)?;
        if self.config.debug {
            tracing::debug!(key, stored = %next, "set_store: stored");
        }

        self.notifier.publish(&StorageEvent::changed(key, Some(&previous), &next));
        Ok(())
    }

    // --- Reader path ---

    /// React to a storage-change notification.
    pub fn handle_storage_event<E: Element>(&self, event: &StorageEvent, elements: &[E]) {
        let Some(key) = self.config.store_key() else {
            return;
        };
        if event.is_for(key) {
            self.refresh_all(elements);
        }
    }

    /// Refresh each element in order.
    pub fn refresh_all<E: Element>(&self, elements: &[E]) {
        for element in elements {
            self.refresh(element);
        }
    }

    /// Push the stored value selected by `element`'s `data-get-store` marker
    /// into it.
    ///
    /// Toggles are checked exactly when their value equals the stored value;
    /// other fields take the value; anything else has its text replaced.
    /// `change` is dispatched only when a field actually changed.
    pub fn refresh<E: Element + ?Sized>(&self, element: &E) {
        let selector = Selector::of(element, MARKER_GET).unwrap_or(Selector::Whole);
        let value = self.current(&selector);
        if self.config.debug {
            tracing::debug!(key = ?self.config.store_key(), property = ?selector.property(), value = ?value, "get_store");
        }
        let Some(value) = value else {
            return;
        };

        match element.field_kind() {
            Some(kind) if kind.is_toggle() => {
                let was_checked = element.checked();
                let checked = element.value() == value;
                element.set_checked(checked);
                if checked != was_checked {
                    element.dispatch_change();
                }
            }
            Some(_) => {
                if element.value() != value {
                    element.set_value(&value);
                    element.dispatch_change();
                }
            }
            None => element.set_text_content(&value),
        }
    }

    /// The stored text `selector` picks out, or `None` when there is no key,
    /// no stored value, or the property cannot be found.
    pub fn current(&self, selector: &Selector) -> Option<String> {
        let key = self.config.store_key()?;
        let raw = self.load(key)?;
        match selector.property() {
            Some(property) => StoreValue::parse(&raw).property(property),
            None => Some(raw),
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(raw) => raw.filter(|raw| !raw.is_empty()),
            Err(err) => {
                tracing::warn!(key, error = %err, "store read failed");
                None
            }
        }
    }
}

// =============================================================================
// ATTACHMENT
// =============================================================================

impl<S: Storage + 'static, N: Notifier + 'static> StoreSync<S, N> {
    /// Configure from `host`'s attributes and attach to it.
    pub fn connect<H: Host>(host: &H, storage: S, notifier: N) -> Attachment {
        Rc::new(Self::new(StoreSyncConfig::from_host(host), storage, notifier)).attach(host)
    }

    /// Register the writer and (optionally) storage listeners on `host`, then
    /// refresh every read-bound descendant once.
    pub fn attach<H: Host>(self: &Rc<Self>, host: &H) -> Attachment {
        let bound = Rc::new(host.descendants_with(MARKER_GET));
        let mut subscriptions = Vec::with_capacity(2);

        let writer = Rc::clone(self);
        subscriptions.push(
            host.add_listener(&self.config.event_type, Box::new(move |target: &H::Element| writer.write_from(target))),
        );

        if self.config.listen {
            let reader = Rc::clone(self);
            let elements = Rc::clone(&bound);
            subscriptions.push(
                self.notifier
                    .subscribe(Box::new(move |event: &StorageEvent| reader.handle_storage_event(event, elements.as_slice()))),
            );
        }

        if self.config.debug {
            tracing::debug!(
                key = ?self.config.store_key(),
                event_type = %self.config.event_type,
                listen = self.config.listen,
                bound = bound.len(),
                "connected"
            );
        }

        self.refresh_all(bound.as_slice());
        Attachment { subscriptions, bound: bound.len() }
    }
}

/// Live registration of a component on its host. Dropping it removes every
/// listener the attachment added.
#[derive(Debug)]
pub struct Attachment {
    subscriptions: Vec<Subscription>,
    bound: usize,
}

impl Attachment {
    /// Number of read-bound elements collected at attachment.
    pub fn bound_count(&self) -> usize {
        self.bound
    }

    /// Number of listeners held (writer, plus storage when listening).
    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Release every listener now.
    pub fn detach(self) {
        drop(self);
    }
}
