//! Unit tests for the watch module
//!
//! Drives the listeners directly through the `ChangeListener` trait and
//! observes their watch channels; no streams and no executor involved.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;

use super::guard::ListenerGuard;
use super::listener::{AllPreferencesListener, KeyedContainsListener, KeyedValueListener};
use crate::store::{ChangeListener, MemoryStore, PrefError, PrefKind, PrefValue};

fn int_store(key: &str, value: i32) -> MemoryStore {
    MemoryStore::with_entries(HashMap::from([(key.to_owned(), PrefValue::Int(value))]))
}

#[test]
fn keyed_listener_re_reads_on_matching_key() {
    let store = int_store("count", 5);
    let (tx, rx) = watch::channel(0);
    let listener = KeyedValueListener::new("count".to_owned(), 0, tx);

    listener.on_change(&store, Some("count")).unwrap();

    assert_eq!(*rx.borrow(), 5);
}

#[test]
fn keyed_listener_ignores_other_keys() {
    let store = int_store("count", 5);
    let (tx, rx) = watch::channel(0);
    let listener = KeyedValueListener::new("count".to_owned(), 0, tx);

    listener.on_change(&store, Some("unrelated")).unwrap();

    assert!(!rx.has_changed().unwrap());
}

#[test]
fn keyed_listener_ignores_anonymous_notifications() {
    let store = int_store("count", 5);
    let (tx, rx) = watch::channel(0);
    let listener = KeyedValueListener::new("count".to_owned(), 0, tx);

    listener.on_change(&store, None).unwrap();

    assert!(!rx.has_changed().unwrap());
}

#[test]
fn keyed_listener_reads_default_when_key_was_removed() {
    let store = MemoryStore::new();
    let (tx, rx) = watch::channel(5);
    let listener = KeyedValueListener::new("count".to_owned(), -1, tx);

    listener.on_change(&store, Some("count")).unwrap();

    assert_eq!(*rx.borrow(), -1);
}

#[test]
fn keyed_listener_propagates_read_errors() {
    let store = MemoryStore::with_entries(HashMap::from([(
        "count".to_owned(),
        PrefValue::String("not a number".to_owned()),
    )]));
    let (tx, rx) = watch::channel(0i32);
    let listener = KeyedValueListener::new("count".to_owned(), 0, tx);

    let error = listener.on_change(&store, Some("count")).unwrap_err();

    assert_eq!(
        error,
        PrefError::TypeMismatch {
            key: "count".to_owned(),
            requested: PrefKind::Int,
            stored: PrefKind::String,
        }
    );
    // Nothing reaches the channel on a failed re-read.
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn keyed_listener_survives_dropped_receiver() {
    let store = int_store("count", 5);
    let (tx, rx) = watch::channel(0);
    drop(rx);
    let listener = KeyedValueListener::new("count".to_owned(), 0, tx);

    listener.on_change(&store, Some("count")).unwrap();
}

#[test]
fn contains_listener_reports_presence_changes() {
    let store = int_store("flag", 1);
    let (tx, rx) = watch::channel(false);
    let listener = KeyedContainsListener::new("flag".to_owned(), tx);

    listener.on_change(&store, Some("flag")).unwrap();
    assert!(*rx.borrow());

    listener.on_change(&store, Some("other")).unwrap();
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn all_listener_re_reads_on_any_notification() {
    let store = int_store("count", 5);
    let (tx, rx) = watch::channel(HashMap::new());
    let listener = AllPreferencesListener::new(tx);

    listener.on_change(&store, Some("whatever")).unwrap();
    assert_eq!(
        rx.borrow().get("count"),
        Some(&PrefValue::Int(5))
    );
}

#[test]
fn all_listener_re_reads_on_anonymous_notification() {
    let store = MemoryStore::new();
    let (tx, rx) = watch::channel(HashMap::from([(
        "ghost".to_owned(),
        PrefValue::Int(1),
    )]));
    let listener = AllPreferencesListener::new(tx);

    listener.on_change(&store, None).unwrap();
    assert!(rx.borrow().is_empty());
}

#[test]
fn guard_registers_on_creation_and_unregisters_on_drop() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let (tx, _rx) = watch::channel(false);
    let listener: Arc<dyn ChangeListener> =
        Arc::new(KeyedContainsListener::new("key".to_owned(), tx));

    let guard = ListenerGuard::register(store.clone(), listener);
    assert_eq!(store.listener_count(), 1);

    drop(guard);
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn guard_unregisters_only_its_own_listener() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());

    let (first_tx, _first_rx) = watch::channel(false);
    let first: Arc<dyn ChangeListener> =
        Arc::new(KeyedContainsListener::new("a".to_owned(), first_tx));
    let (second_tx, _second_rx) = watch::channel(false);
    let second: Arc<dyn ChangeListener> =
        Arc::new(KeyedContainsListener::new("b".to_owned(), second_tx));

    let first_guard = ListenerGuard::register(store.clone(), first);
    let _second_guard = ListenerGuard::register(store.clone(), second);
    assert_eq!(store.listener_count(), 2);

    drop(first_guard);
    assert_eq!(store.listener_count(), 1);
}
