//! Storage-change notifications.
//!
//! DESIGN
//! ======
//! Browsers fire a native `storage` event only in *other* browsing contexts,
//! so a writer publishes a synthetic [`StorageEvent`] for listeners in its own
//! context. [`Notifier`] abstracts that broadcast; [`StorageBus`] is the
//! in-memory version used outside the browser.
//!
//! Handlers may publish again while being invoked (refresh -> change ->
//! write -> publish). The handler list is snapshotted before delivery and no
//! borrow is held while a handler runs.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::subscription::Subscription;

#[cfg(test)]
#[path = "notify_test.rs"]
mod tests;

/// A change to one storage key. Field names match the DOM `StorageEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEvent {
    /// `None` when the whole store was cleared.
    pub key: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl StorageEvent {
    pub fn changed(key: &str, old_value: Option<&str>, new_value: &str) -> Self {
        Self {
            key: Some(key.to_owned()),
            old_value: old_value.map(str::to_owned),
            new_value: Some(new_value.to_owned()),
        }
    }

    /// Whether this event concerns `key`.
    pub fn is_for(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }
}

pub type StorageHandler = Box<dyn Fn(&StorageEvent)>;

/// Environment-wide broadcast of storage changes.
pub trait Notifier {
    /// Deliver `event` to every current subscriber.
    fn publish(&self, event: &StorageEvent);

    /// Register `handler` until the returned guard is dropped.
    fn subscribe(&self, handler: StorageHandler) -> Subscription;
}

impl<T: Notifier + ?Sized> Notifier for Rc<T> {
    fn publish(&self, event: &StorageEvent) {
        (**self).publish(event);
    }

    fn subscribe(&self, handler: StorageHandler) -> Subscription {
        (**self).subscribe(handler)
    }
}

// =============================================================================
// IN-MEMORY BUS
// =============================================================================

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, Rc<dyn Fn(&StorageEvent)>)>,
}

/// Single-context notifier. Clones share the same subscriber list.
#[derive(Clone, Default)]
pub struct StorageBus {
    registry: Rc<RefCell<Registry>>,
}

impl StorageBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().handlers.len()
    }
}

impl Notifier for StorageBus {
    fn publish(&self, event: &StorageEvent) {
        let handlers: Vec<_> = self.registry.borrow().handlers.iter().map(|(_, h)| Rc::clone(h)).collect();
        for handler in handlers {
            handler(event);
        }
    }

    fn subscribe(&self, handler: StorageHandler) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.handlers.push((id, Rc::from(handler)));
            id
        };
        let weak: Weak<RefCell<Registry>> = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = weak.upgrade() {
                registry.borrow_mut().handlers.retain(|(handler_id, _)| *handler_id != id);
            }
        })
    }
}

impl std::fmt::Debug for StorageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageBus").field("subscribers", &self.subscriber_count()).finish()
    }
}
