//! Form-field synchronization with persistent key-value storage.
//!
//! This crate implements the `<store-sync>` custom element. Descendant fields
//! marked with `data-set-store` write their value into `localStorage` under
//! the element's `store` key; descendants marked with `data-get-store` have
//! the stored value pushed back into them on attachment and, when the element
//! carries `store-listen`, on every storage-change notification for that key.
//!
//! The synchronization logic never talks to the browser directly. Storage,
//! notification and the element tree are capabilities ([`storage::Storage`],
//! [`notify::Notifier`], [`dom::Host`]) so the same [`sync::StoreSync`] runs
//! against `web-sys` in the browser (feature `browser`) and against the
//! in-memory [`doc`] tree in tests.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`sync`] | The `StoreSync` component: writer path, reader path, attachment |
//! | [`config`] | Typed configuration read from instance attributes |
//! | [`value`] | Scalar vs property-bag parsing and merging |
//! | [`storage`] | Storage capability and in-memory implementation |
//! | [`notify`] | Storage-change events and the in-memory bus |
//! | [`subscription`] | Listener guards released on drop |
//! | [`dom`] | Element and host capabilities |
//! | [`doc`] | In-memory element tree |
//! | [`consts`] | Attribute names and defaults |
//! | `web` | Browser bindings (feature `browser`) |

pub mod config;
pub mod consts;
pub mod doc;
pub mod dom;
pub mod error;
pub mod notify;
pub mod storage;
pub mod subscription;
pub mod sync;
pub mod value;
#[cfg(feature = "browser")]
pub mod web;

pub use config::{Selector, StoreSyncConfig};
pub use error::StoreError;
pub use notify::{Notifier, StorageBus, StorageEvent};
pub use storage::{MemoryStorage, Storage};
pub use subscription::Subscription;
pub use sync::{Attachment, StoreSync};
pub use value::StoreValue;
