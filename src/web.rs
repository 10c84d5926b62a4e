//! Browser bindings for the `<store-sync>` custom element.
//!
//! SYSTEM CONTEXT
//! ==============
//! Maps the crate's capabilities onto `web-sys`:
//!
//! - [`LocalStorage`]: `window.localStorage`
//! - [`WindowNotifier`]: `storage` events on `window`. Publishing dispatches a
//!   synthetic `StorageEvent`; the browser already delivers native ones to
//!   other tabs, and never to the tab that wrote, so nothing is seen twice.
//! - [`WebElement`]: any `HTMLElement`, with field access through
//!   `HTMLInputElement`/`HTMLSelectElement`/`HTMLTextAreaElement`
//!
//! Custom elements must subclass `HTMLElement` in JavaScript, so a small
//! inline shim defines the class and forwards `connectedCallback` /
//! `disconnectedCallback` to [`StoreSyncElement`].

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventInit, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use crate::consts::{CHANGE_EVENT, ELEMENT_TAG, STORAGE_EVENT};
use crate::dom::{self, EventHandler, FieldKind};
use crate::error::StoreError;
use crate::notify::{Notifier, StorageEvent, StorageHandler};
use crate::storage::Storage;
use crate::subscription::Subscription;
use crate::sync::{Attachment, StoreSync};

fn js_reason(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn window() -> Result<web_sys::Window, StoreError> {
    web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))
}

// =============================================================================
// STORAGE
// =============================================================================

/// `window.localStorage`.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// # Errors
    ///
    /// Returns `Unavailable` when there is no window or storage is disabled.
    pub fn from_window() -> Result<Self, StoreError> {
        match window()?.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(StoreError::Unavailable("localStorage disabled".into())),
            Err(err) => Err(StoreError::Unavailable(js_reason(&err))),
        }
    }
}

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(|err| StoreError::Read { key: key.to_owned(), reason: js_reason(&err) })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StoreError::Write { key: key.to_owned(), reason: js_reason(&err) })
    }
}

// =============================================================================
// NOTIFIER
// =============================================================================

/// `storage` events on `window`.
pub struct WindowNotifier {
    window: web_sys::Window,
}

impl WindowNotifier {
    /// # Errors
    ///
    /// Returns `Unavailable` when there is no window.
    pub fn from_window() -> Result<Self, StoreError> {
        Ok(Self { window: window()? })
    }

    fn dispatch(&self, event: &StorageEvent) -> Result<(), JsValue> {
        let init = web_sys::StorageEventInit::new();
        init.set_key(event.key.as_deref());
        init.set_old_value(event.old_value.as_deref());
        init.set_new_value(event.new_value.as_deref());
        let native = web_sys::StorageEvent::new_with_event_init_dict(STORAGE_EVENT, &init)?;
        self.window.dispatch_event(&native)?;
        Ok(())
    }
}

impl Notifier for WindowNotifier {
    fn publish(&self, event: &StorageEvent) {
        if let Err(err) = self.dispatch(event) {
            tracing::warn!(key = ?event.key, error = %js_reason(&err), "storage event dispatch failed");
        }
    }

    fn subscribe(&self, handler: StorageHandler) -> Subscription {
        let closure = Closure::<dyn Fn(web_sys::StorageEvent)>::new(move |native: web_sys::StorageEvent| {
            handler(&StorageEvent { key: native.key(), old_value: native.old_value(), new_value: native.new_value() });
        });
        listen(self.window.clone().into(), STORAGE_EVENT, closure)
    }
}

/// Register `closure` for `event_type` on `target`; the returned guard
/// removes it and frees the closure.
fn listen<T: ?Sized + 'static>(target: web_sys::EventTarget, event_type: &str, closure: Closure<T>) -> Subscription {
    let function: js_sys::Function = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
    if let Err(err) = target.add_event_listener_with_callback(event_type, &function) {
        tracing::warn!(event_type, error = %js_reason(&err), "addEventListener failed");
        return Subscription::empty();
    }
    let event_type = event_type.to_owned();
    Subscription::new(move || {
        if let Err(err) = target.remove_event_listener_with_callback(&event_type, &function) {
            tracing::warn!(event_type, error = %js_reason(&err), "removeEventListener failed");
        }
        drop(closure);
    })
}

// =============================================================================
// ELEMENTS
// =============================================================================

/// An `HTMLElement` seen through [`dom::Element`].
#[derive(Clone, Debug)]
pub struct WebElement(pub HtmlElement);

impl dom::Element for WebElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.0.has_attribute(name)
    }

    fn field_kind(&self) -> Option<FieldKind> {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            Some(FieldKind::from_input_type(&input.type_()))
        } else if self.0.is_instance_of::<HtmlSelectElement>() {
            Some(FieldKind::Select)
        } else if self.0.is_instance_of::<HtmlTextAreaElement>() {
            Some(FieldKind::TextArea)
        } else {
            None
        }
    }

    fn value(&self) -> String {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(select) = self.0.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else if let Some(area) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else {
            String::new()
        }
    }

    fn set_value(&self, value: &str) {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(select) = self.0.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else if let Some(area) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        }
    }

    fn checked(&self) -> bool {
        self.0.dyn_ref::<HtmlInputElement>().is_some_and(HtmlInputElement::checked)
    }

    fn set_checked(&self, checked: bool) {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.set_checked(checked);
        }
    }

    fn set_text_content(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn dispatch_change(&self) {
        let init = EventInit::new();
        init.set_bubbles(true);
        let dispatched = Event::new_with_event_init_dict(CHANGE_EVENT, &init).and_then(|event| self.0.dispatch_event(&event));
        if let Err(err) = dispatched {
            tracing::warn!(error = %js_reason(&err), "change dispatch failed");
        }
    }
}

/// The custom element instance seen through [`dom::Host`].
pub struct WebHost(pub HtmlElement);

impl dom::Host for WebHost {
    type Element = WebElement;

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.0.has_attribute(name)
    }

    fn descendants_with(&self, attribute: &str) -> Vec<WebElement> {
        let nodes = match self.0.query_selector_all(&format!("[{attribute}]")) {
            Ok(nodes) => nodes,
            Err(err) => {
                tracing::warn!(attribute, error = %js_reason(&err), "querySelectorAll failed");
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .map(WebElement)
            .collect()
    }

    fn add_listener(&self, event_type: &str, handler: EventHandler<WebElement>) -> Subscription {
        let closure = Closure::<dyn Fn(Event)>::new(move |event: Event| {
            if let Some(target) = event.target().and_then(|t| t.dyn_into::<HtmlElement>().ok()) {
                handler(&WebElement(target));
            }
        });
        listen(self.0.clone().into(), event_type, closure)
    }
}

// =============================================================================
// CUSTOM ELEMENT
// =============================================================================

#[wasm_bindgen(inline_js = r#"
export function define_store_sync(tag, attach) {
    if (customElements.get(tag)) return;
    customElements.define(tag, class extends HTMLElement {
        connectedCallback() {
            this._storeSync = attach(this);
        }
        disconnectedCallback() {
            if (this._storeSync) {
                this._storeSync.free();
                this._storeSync = undefined;
            }
        }
    });
}
"#)]
extern "C" {
    fn define_store_sync(tag: &str, attach: &js_sys::Function);
}

/// Live `StoreSync` for one connected element. Freed by the shim on
/// `disconnectedCallback`, which releases every listener.
#[wasm_bindgen]
pub struct StoreSyncElement {
    attachment: Option<Attachment>,
}

#[wasm_bindgen]
impl StoreSyncElement {
    /// Attach to `element`, reading its attributes now.
    pub fn attach(element: HtmlElement) -> StoreSyncElement {
        let capabilities = LocalStorage::from_window().and_then(|storage| Ok((storage, WindowNotifier::from_window()?)));
        match capabilities {
            Ok((storage, notifier)) => {
                Self { attachment: Some(StoreSync::connect(&WebHost(element), storage, notifier)) }
            }
            Err(err) => {
                tracing::warn!(error = %err, "store-sync disabled");
                Self { attachment: None }
            }
        }
    }

    /// Number of read-bound elements, for inspection from devtools.
    #[wasm_bindgen(getter)]
    pub fn bound(&self) -> usize {
        self.attachment.as_ref().map_or(0, Attachment::bound_count)
    }
}

/// Register `<store-sync>` with the page.
pub fn define() {
    let attach = Closure::<dyn Fn(HtmlElement) -> JsValue>::new(|element: HtmlElement| {
        JsValue::from(StoreSyncElement::attach(element))
    });
    define_store_sync(ELEMENT_TAG, attach.as_ref().unchecked_ref());
    // The element class keeps calling `attach` for the life of the page.
    attach.forget();
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    }
    define();
}
