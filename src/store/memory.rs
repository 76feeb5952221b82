use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};

use tracing::warn;

use super::{ChangeListener, EditBatch, PrefError, PrefKind, PrefMap, PrefValue, PreferenceStore};

/// An in-memory [`PreferenceStore`] with no durability.
///
/// Reference implementation of the store contract (typed reads with
/// defaults, batched commits with remove-before-put ordering, per-key change
/// notification), intended for tests, both this crate's and downstream
/// consumers'. Commits always succeed. A `clear` is reported to listeners as
/// a single `None`-key notification, since the cleared keys are no longer
/// enumerable at dispatch time.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<PrefMap>,
    listeners: Mutex<Vec<Arc<dyn ChangeListener>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `entries`.
    pub fn with_entries(entries: PrefMap) -> Self {
        Self {
            entries: RwLock::new(entries),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Number of currently registered change listeners.
    ///
    /// Test introspection: lets callers assert that stream cancellation
    /// released its registration.
    pub fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, PrefMap> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<Arc<dyn ChangeListener>>> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, key: Option<&str>) {
        // Snapshot so listeners can re-enter the store (reads, even
        // register/unregister) without deadlocking.
        let listeners: Vec<Arc<dyn ChangeListener>> = self.lock_listeners().clone();
        for listener in listeners {
            if let Err(error) = listener.on_change(self, key) {
                warn!(?key, %error, "change listener failed during notification");
            }
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn get_string(&self, key: &str, default: &str) -> Result<String, PrefError> {
        match self.read_entries().get(key) {
            None => Ok(default.to_owned()),
            Some(PrefValue::String(value)) => Ok(value.clone()),
            Some(other) => Err(type_mismatch(key, PrefKind::String, other)),
        }
    }

    fn get_string_set(
        &self,
        key: &str,
        default: &HashSet<String>,
    ) -> Result<HashSet<String>, PrefError> {
        match self.read_entries().get(key) {
            None => Ok(default.clone()),
            Some(PrefValue::StringSet(value)) => Ok(value.clone()),
            Some(other) => Err(type_mismatch(key, PrefKind::StringSet, other)),
        }
    }

    fn get_int(&self, key: &str, default: i32) -> Result<i32, PrefError> {
        match self.read_entries().get(key) {
            None => Ok(default),
            Some(PrefValue::Int(value)) => Ok(*value),
            Some(other) => Err(type_mismatch(key, PrefKind::Int, other)),
        }
    }

    fn get_long(&self, key: &str, default: i64) -> Result<i64, PrefError> {
        match self.read_entries().get(key) {
            None => Ok(default),
            Some(PrefValue::Long(value)) => Ok(*value),
            Some(other) => Err(type_mismatch(key, PrefKind::Long, other)),
        }
    }

    fn get_float(&self, key: &str, default: f32) -> Result<f32, PrefError> {
        match self.read_entries().get(key) {
            None => Ok(default),
            Some(PrefValue::Float(value)) => Ok(*value),
            Some(other) => Err(type_mismatch(key, PrefKind::Float, other)),
        }
    }

    fn get_bool(&self, key: &str, default: bool) -> Result<bool, PrefError> {
        match self.read_entries().get(key) {
            None => Ok(default),
            Some(PrefValue::Bool(value)) => Ok(*value),
            Some(other) => Err(type_mismatch(key, PrefKind::Bool, other)),
        }
    }

    fn get_all(&self) -> PrefMap {
        self.read_entries().clone()
    }

    fn contains(&self, key: &str) -> bool {
        self.read_entries().contains_key(key)
    }

    fn commit(&self, batch: EditBatch) -> bool {
        let mut changed: Vec<Option<String>> = Vec::new();
        {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

            if batch.clears_all() {
                entries.clear();
                changed.push(None);
            }
            for key in batch.removals() {
                if entries.remove(key).is_some() {
                    changed.push(Some(key.clone()));
                }
            }
            for (key, value) in batch.puts() {
                entries.insert(key.clone(), value.clone());
                if !changed.iter().any(|seen| seen.as_deref() == Some(key.as_str())) {
                    changed.push(Some(key.clone()));
                }
            }
        }

        // Dispatch outside the write lock; listeners re-read the store.
        for key in changed {
            self.notify(key.as_deref());
        }
        true
    }

    fn register_change_listener(&self, listener: Arc<dyn ChangeListener>) {
        self.lock_listeners().push(listener);
    }

    fn unregister_change_listener(&self, listener: &Arc<dyn ChangeListener>) {
        self.lock_listeners()
            .retain(|registered| !Arc::ptr_eq(registered, listener));
    }
}

fn type_mismatch(key: &str, requested: PrefKind, stored: &PrefValue) -> PrefError {
    PrefError::TypeMismatch {
        key: key.to_owned(),
        requested,
        stored: stored.kind(),
    }
}
