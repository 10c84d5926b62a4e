//! Attribute names, event names and defaults shared across the crate.

/// Tag name the custom element is registered under.
pub const ELEMENT_TAG: &str = "store-sync";

/// Instance attribute naming the storage key.
pub const ATTR_STORE: &str = "store";
/// Instance attribute naming the event type that triggers a write.
pub const ATTR_EVENT_TYPE: &str = "event-type";
/// Instance flag enabling refresh on storage-change notifications.
pub const ATTR_STORE_LISTEN: &str = "store-listen";
/// Instance flag enabling diagnostic traces.
pub const ATTR_DEBUG: &str = "debug";

/// Marker on descendant fields that write into the store.
pub const MARKER_SET: &str = "data-set-store";
/// Marker on descendants that are refreshed from the store.
pub const MARKER_GET: &str = "data-get-store";

/// Event type used when `event-type` is absent or empty.
pub const DEFAULT_EVENT_TYPE: &str = "change";
/// Event type dispatched by an element whose state was refreshed.
pub const CHANGE_EVENT: &str = "change";
/// Event type of storage-change notifications.
pub const STORAGE_EVENT: &str = "storage";

/// Prior value assumed by a write when the key has no value yet.
pub const EMPTY_BAG: &str = "{}";
