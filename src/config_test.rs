use std::collections::HashMap;

use super::*;
use crate::doc::Node;

fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

// =============================================================
// StoreSyncConfig
// =============================================================

#[test]
fn defaults_when_no_attributes() {
    let cfg = StoreSyncConfig::from_attributes(|_| None);
    assert_eq!(cfg, StoreSyncConfig::default());
    assert_eq!(cfg.event_type, "change");
    assert_eq!(cfg.store_key(), None);
    assert!(!cfg.listen);
    assert!(!cfg.debug);
}

#[test]
fn reads_all_attributes() {
    let map = attrs(&[("store", "prefs"), ("event-type", "input"), ("store-listen", ""), ("debug", "")]);
    let cfg = StoreSyncConfig::from_attributes(|name| map.get(name).cloned());
    assert_eq!(cfg.store_key(), Some("prefs"));
    assert_eq!(cfg.event_type, "input");
    assert!(cfg.listen);
    assert!(cfg.debug);
}

#[test]
fn empty_store_disables() {
    let map = attrs(&[("store", "")]);
    let cfg = StoreSyncConfig::from_attributes(|name| map.get(name).cloned());
    assert_eq!(cfg.store_key(), None);
    assert_eq!(StoreSyncConfig::for_key("").store_key(), None);
}

#[test]
fn empty_event_type_falls_back_to_change() {
    let map = attrs(&[("store", "k"), ("event-type", "")]);
    let cfg = StoreSyncConfig::from_attributes(|name| map.get(name).cloned());
    assert_eq!(cfg.event_type, "change");
}

#[test]
fn flag_value_is_irrelevant() {
    let map = attrs(&[("store-listen", "false")]);
    assert!(StoreSyncConfig::from_attributes(|name| map.get(name).cloned()).listen);
}

#[test]
fn from_host_reads_node_attributes() {
    let host = Node::element("store-sync").with_attribute("store", "prefs").with_attribute("debug", "");
    let cfg = StoreSyncConfig::from_host(&host);
    assert_eq!(cfg.store_key(), Some("prefs"));
    assert!(cfg.debug);
    assert!(!cfg.listen);
}

#[test]
fn builders_override_defaults() {
    let cfg = StoreSyncConfig::for_key("k").listening(true).debugging(true).on_event("input");
    assert_eq!(cfg.store_key(), Some("k"));
    assert!(cfg.listen && cfg.debug);
    assert_eq!(cfg.event_type, "input");
}

// =============================================================
// Selector
// =============================================================

#[test]
fn empty_marker_selects_whole_value() {
    assert_eq!(Selector::from_marker(""), Selector::Whole);
    assert_eq!(Selector::Whole.property(), None);
}

#[test]
fn named_marker_selects_property() {
    let selector = Selector::from_marker("theme");
    assert_eq!(selector.property(), Some("theme"));
}

#[test]
fn unmarked_element_has_no_selector() {
    let node = Node::input("text");
    assert_eq!(Selector::of(&node, "data-set-store"), None);
    let marked = node.with_attribute("data-set-store", "theme");
    assert_eq!(Selector::of(&marked, "data-set-store"), Some(Selector::Property("theme".into())));
}
