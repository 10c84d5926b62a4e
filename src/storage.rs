//! Persistent key-value storage capability.
//!
//! DESIGN
//! ======
//! `Storage` mirrors the two `localStorage` calls the component needs. The
//! browser implementation lives in `web`; [`MemoryStorage`] backs tests and
//! native use. Methods take `&self` because the browser object is shared and
//! internally mutable; the in-memory version uses a `RefCell` to match.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StoreError;

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;

/// Synchronous string-to-string storage.
pub trait Storage {
    /// Read the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `Read` or `Unavailable` if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `Write` if the backing store rejects the value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: Storage + ?Sized> Storage for Rc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }
}

/// In-memory storage, optionally capped to emulate a quota.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes once keys plus values exceed `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self { items: RefCell::default(), quota: Some(bytes) }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::Write {
                    key: key.to_owned(),
                    reason: format!("quota exceeded ({needed} > {quota} bytes)"),
                });
            }
        }
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
