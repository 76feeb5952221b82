//! The preference store capability: value model, access traits, and an
//! in-memory reference implementation.
//!
//! All durability, atomicity, and change dispatch belongs to whatever
//! implements [`PreferenceStore`]; the rest of the crate treats a store as
//! an opaque synchronous backend reached through these traits.

mod edit;
mod error;
mod memory;
mod value;

#[cfg(test)]
mod tests;

pub use edit::EditBatch;
pub use error::PrefError;
pub use memory::MemoryStore;
pub use value::{PrefKind, PrefMap, PrefValue, Preference};

use std::collections::HashSet;
use std::sync::Arc;

/// Synchronous key-value preference backend.
///
/// Typed getters fall back to the caller-supplied default when the key is
/// absent and fail with [`PrefError::TypeMismatch`] when the stored value's
/// type disagrees with the accessor. Implementations must be safe for
/// concurrent reads, commits, and listener registration; the adapter layer
/// adds no locking of its own.
pub trait PreferenceStore: Send + Sync {
    /// Reads the string stored under `key`, or `default` when absent.
    ///
    /// # Errors
    /// [`PrefError::TypeMismatch`] when the stored value is not a string.
    fn get_string(&self, key: &str, default: &str) -> Result<String, PrefError>;

    /// Reads the string set stored under `key`, or `default` when absent.
    ///
    /// # Errors
    /// [`PrefError::TypeMismatch`] when the stored value is not a string set.
    fn get_string_set(
        &self,
        key: &str,
        default: &HashSet<String>,
    ) -> Result<HashSet<String>, PrefError>;

    /// Reads the int stored under `key`, or `default` when absent.
    ///
    /// # Errors
    /// [`PrefError::TypeMismatch`] when the stored value is not an int.
    fn get_int(&self, key: &str, default: i32) -> Result<i32, PrefError>;

    /// Reads the long stored under `key`, or `default` when absent.
    ///
    /// # Errors
    /// [`PrefError::TypeMismatch`] when the stored value is not a long.
    fn get_long(&self, key: &str, default: i64) -> Result<i64, PrefError>;

    /// Reads the float stored under `key`, or `default` when absent.
    ///
    /// # Errors
    /// [`PrefError::TypeMismatch`] when the stored value is not a float.
    fn get_float(&self, key: &str, default: f32) -> Result<f32, PrefError>;

    /// Reads the bool stored under `key`, or `default` when absent.
    ///
    /// # Errors
    /// [`PrefError::TypeMismatch`] when the stored value is not a bool.
    fn get_bool(&self, key: &str, default: bool) -> Result<bool, PrefError>;

    /// A snapshot of every stored entry.
    fn get_all(&self) -> PrefMap;

    /// Whether any value is stored under `key`.
    fn contains(&self, key: &str) -> bool;

    /// Applies `batch` and reports whether the new values were persisted.
    ///
    /// A clear in the batch takes effect first, then removals, then puts,
    /// regardless of the order the caller recorded them. Failure is reported
    /// as `false`, never as an error, and is not retried. When two commits
    /// race, the store decides the outcome; the platform stores this crate
    /// targets define last-commit-wins.
    fn commit(&self, batch: EditBatch) -> bool;

    /// Registers `listener` to be invoked after every successful commit.
    fn register_change_listener(&self, listener: Arc<dyn ChangeListener>);

    /// Removes a previously registered listener.
    ///
    /// Listener identity is the `Arc` allocation, compared with
    /// [`Arc::ptr_eq`]. Unregistering a listener that was never registered
    /// is a no-op.
    fn unregister_change_listener(&self, listener: &Arc<dyn ChangeListener>);
}

/// Callback invoked by a store after a committed change.
pub trait ChangeListener: Send + Sync {
    /// Called once per changed key, or with `None` when the store cannot
    /// name the changed keys (after a `clear`, for example).
    ///
    /// May run on whatever thread performed the commit. An error returned
    /// here is surfaced to the committer in a store-defined way; it is never
    /// delivered to watch-stream consumers.
    ///
    /// # Errors
    /// Whatever the listener's re-read raises, typically
    /// [`PrefError::TypeMismatch`].
    fn on_change(&self, store: &dyn PreferenceStore, key: Option<&str>) -> Result<(), PrefError>;
}
