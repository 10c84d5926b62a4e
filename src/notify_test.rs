use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;

fn recorder(bus: &StorageBus) -> (Rc<RefCell<Vec<StorageEvent>>>, Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let sub = bus.subscribe(Box::new(move |event: &StorageEvent| sink.borrow_mut().push(event.clone())));
    (seen, sub)
}

// =============================================================
// StorageEvent
// =============================================================

#[test]
fn event_serializes_with_dom_field_names() {
    let event = StorageEvent::changed("prefs", Some("{}"), r#"{"theme":"dark"}"#);
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["key"], "prefs");
    assert_eq!(json["oldValue"], "{}");
    assert_eq!(json["newValue"], r#"{"theme":"dark"}"#);
}

#[test]
fn event_deserializes_clear_notification() {
    let event: StorageEvent = serde_json::from_str(r#"{"key":null,"oldValue":null,"newValue":null}"#).unwrap();
    assert_eq!(event.key, None);
    assert!(!event.is_for("prefs"));
}

#[test]
fn event_matches_only_its_key() {
    let event = StorageEvent::changed("prefs", None, "x");
    assert!(event.is_for("prefs"));
    assert!(!event.is_for("other"));
}

// =============================================================
// StorageBus
// =============================================================

#[test]
fn publish_reaches_all_subscribers() {
    let bus = StorageBus::new();
    let (first, _a) = recorder(&bus);
    let (second, _b) = recorder(&bus);

    bus.publish(&StorageEvent::changed("k", None, "v"));

    assert_eq!(first.borrow().len(), 1);
    assert_eq!(second.borrow().len(), 1);
}

#[test]
fn dropping_subscription_stops_delivery() {
    let bus = StorageBus::new();
    let (seen, sub) = recorder(&bus);
    assert_eq!(bus.subscriber_count(), 1);

    drop(sub);
    bus.publish(&StorageEvent::changed("k", None, "v"));

    assert!(seen.borrow().is_empty());
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn cancel_removes_only_that_subscription() {
    let bus = StorageBus::new();
    let (kept, _keep) = recorder(&bus);
    let (gone, cancel) = recorder(&bus);

    cancel.cancel();
    bus.publish(&StorageEvent::changed("k", None, "v"));

    assert_eq!(kept.borrow().len(), 1);
    assert!(gone.borrow().is_empty());
}

#[test]
fn handler_may_publish_reentrantly() {
    let bus = StorageBus::new();
    let depth = Rc::new(Cell::new(0));
    let inner_bus = bus.clone();
    let counter = Rc::clone(&depth);
    let _sub = bus.subscribe(Box::new(move |event: &StorageEvent| {
        counter.set(counter.get() + 1);
        if event.new_value.as_deref() == Some("first") {
            inner_bus.publish(&StorageEvent::changed("k", Some("first"), "second"));
        }
    }));

    bus.publish(&StorageEvent::changed("k", None, "first"));

    assert_eq!(depth.get(), 2);
}

#[test]
fn subscription_outliving_bus_is_harmless() {
    let bus = StorageBus::new();
    let (_seen, sub) = recorder(&bus);
    drop(bus);
    drop(sub);
}
