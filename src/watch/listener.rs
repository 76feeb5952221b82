use tokio::sync::watch;

use crate::store::{ChangeListener, PrefError, PrefMap, Preference, PreferenceStore};

/// Re-reads a single key on matching change notifications and publishes the
/// result into a conflating watch channel.
///
/// Notifications for other keys, or with no key at all, are ignored. A send
/// against a dropped receiver is ignored too: the consumer is gone and the
/// stream's guard will unregister this listener shortly.
pub(crate) struct KeyedValueListener<T: Preference> {
    key: String,
    default: T,
    tx: watch::Sender<T>,
}

impl<T: Preference> KeyedValueListener<T> {
    pub(crate) fn new(key: String, default: T, tx: watch::Sender<T>) -> Self {
        Self { key, default, tx }
    }
}

impl<T: Preference> ChangeListener for KeyedValueListener<T> {
    fn on_change(&self, store: &dyn PreferenceStore, key: Option<&str>) -> Result<(), PrefError> {
        if key != Some(self.key.as_str()) {
            return Ok(());
        }
        let value = T::read(store, &self.key, &self.default)?;
        let _ = self.tx.send(value);
        Ok(())
    }
}

/// Publishes the contains-check for a single key on matching notifications.
pub(crate) struct KeyedContainsListener {
    key: String,
    tx: watch::Sender<bool>,
}

impl KeyedContainsListener {
    pub(crate) fn new(key: String, tx: watch::Sender<bool>) -> Self {
        Self { key, tx }
    }
}

impl ChangeListener for KeyedContainsListener {
    fn on_change(&self, store: &dyn PreferenceStore, key: Option<&str>) -> Result<(), PrefError> {
        if key == Some(self.key.as_str()) {
            let _ = self.tx.send(store.contains(&self.key));
        }
        Ok(())
    }
}

/// Re-reads the entire store on every change notification.
///
/// A notification that cannot name the changed keys (`None`) is treated the
/// same as a single-key one: the full map is re-read unconditionally. No
/// diffing against the previous snapshot.
pub(crate) struct AllPreferencesListener {
    tx: watch::Sender<PrefMap>,
}

impl AllPreferencesListener {
    pub(crate) fn new(tx: watch::Sender<PrefMap>) -> Self {
        Self { tx }
    }
}

impl ChangeListener for AllPreferencesListener {
    fn on_change(&self, store: &dyn PreferenceStore, _key: Option<&str>) -> Result<(), PrefError> {
        let _ = self.tx.send(store.get_all());
        Ok(())
    }
}
