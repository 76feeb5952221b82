//! Async facade over a preference store: one-shot reads, watch streams, and
//! batched edits.

use std::any;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use async_stream::stream;
use futures::StreamExt;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use crate::store::{EditBatch, PrefError, PrefMap, Preference, PreferenceStore};
use crate::watch::{
    AllPreferencesListener, KeyedContainsListener, KeyedValueListener, ListenerGuard, PrefStream,
};

/// Asynchronous access to a [`PreferenceStore`].
///
/// Three access styles over the same backend: one-shot async reads, watch
/// streams, and batched edits committed as a unit. The facade owns nothing
/// beyond the store handle (values live in the store, subscriptions live in
/// the streams), so it is cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn PreferenceStore>,
}

impl Preferences {
    /// Creates a facade over `store`.
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// Handle to the underlying store.
    pub fn store(&self) -> &Arc<dyn PreferenceStore> {
        &self.store
    }

    /// Reads the value stored under `key`, falling back to `default` when
    /// the key is absent.
    ///
    /// The read itself is synchronous and completes without waiting; the
    /// async shape exists so callers can await preference reads alongside
    /// other suspending work. Nothing is offloaded to a blocking executor;
    /// a store that actually blocks is the caller's concern.
    ///
    /// # Errors
    /// [`PrefError::TypeMismatch`] when the stored value's type disagrees
    /// with `T`.
    pub async fn get<T: Preference>(&self, key: &str, default: T) -> Result<T, PrefError> {
        T::read(self.store.as_ref(), key, &default)
    }

    /// Reads the string under `key`, or `default` when absent.
    ///
    /// # Errors
    /// [`PrefError::TypeMismatch`] when the stored value is not a string.
    pub async fn get_string(&self, key: &str, default: &str) -> Result<String, PrefError> {
        self.store.get_string(key, default)
    }

    /// Reads the string set under `key`, or `default` when absent.
    ///
    /// # Errors
    /// [`PrefError::TypeMismatch`] when the stored value is not a string set.
    pub async fn get_string_set(
        &self,
        key: &str,
        default: &HashSet<String>,
    ) -> Result<HashSet<String>, PrefError> {
        self.store.get_string_set(key, default)
    }

    /// Reads the int under `key`, or `default` when absent.
    ///
    /// # Errors
    /// [`PrefError::TypeMismatch`] when the stored value is not an int.
    pub async fn get_int(&self, key: &str, default: i32) -> Result<i32, PrefError> {
        self.store.get_int(key, default)
    }

    /// Reads the long under `key`, or `default` when absent.
    ///
    /// # Errors
    /// [`PrefError::TypeMismatch`] when the stored value is not a long.
    pub async fn get_long(&self, key: &str, default: i64) -> Result<i64, PrefError> {
        self.store.get_long(key, default)
    }

    /// Reads the float under `key`, or `default` when absent.
    ///
    /// # Errors
    /// [`PrefError::TypeMismatch`] when the stored value is not a float.
    pub async fn get_float(&self, key: &str, default: f32) -> Result<f32, PrefError> {
        self.store.get_float(key, default)
    }

    /// Reads the bool under `key`, or `default` when absent.
    ///
    /// # Errors
    /// [`PrefError::TypeMismatch`] when the stored value is not a bool.
    pub async fn get_bool(&self, key: &str, default: bool) -> Result<bool, PrefError> {
        self.store.get_bool(key, default)
    }

    /// Reads a snapshot of every stored entry.
    pub async fn get_all(&self) -> PrefMap {
        self.store.get_all()
    }

    /// Whether any value is stored under `key`.
    pub async fn contains(&self, key: &str) -> bool {
        self.store.contains(key)
    }

    /// Reads an enum stored by variant name under `key`.
    ///
    /// When the key is absent, `default`'s own name is read back, so the
    /// default variant is returned. Requires that `E`'s [`FromStr`] accepts
    /// the names its [`AsRef<str>`] produces.
    ///
    /// # Errors
    /// [`PrefError::TypeMismatch`] when the stored value is not a string;
    /// [`PrefError::UnknownVariant`] when the stored string names no variant
    /// of `E`.
    pub async fn get_enum<E>(&self, key: &str, default: E) -> Result<E, PrefError>
    where
        E: FromStr + AsRef<str>,
    {
        let name = self.store.get_string(key, default.as_ref())?;
        parse_enum(key, &name)
    }

    /// Continuously watches the value under `key`.
    ///
    /// The stream yields the current value immediately, then a freshly read
    /// value after every committed change to `key`. Commits to other keys
    /// produce nothing. Delivery is conflating: a consumer that lags sees
    /// only the most recent value.
    ///
    /// The store listener backing the stream is registered when the stream
    /// is first polled and unregistered when the stream is dropped: exactly
    /// one listener per stream, released exactly once.
    ///
    /// A read failure at subscription time is yielded as the stream's only
    /// item, and no listener is ever registered. Re-read failures after a
    /// change notification are surfaced to the committer by the store, never
    /// to this stream.
    pub fn watch<T: Preference>(&self, key: &str, default: T) -> PrefStream<Result<T, PrefError>> {
        let store = Arc::clone(&self.store);
        let key = key.to_owned();

        PrefStream::new(stream! {
            match T::read(store.as_ref(), &key, &default) {
                Err(error) => yield Err(error),
                Ok(initial) => {
                    let (tx, rx) = watch::channel(initial);
                    let listener = Arc::new(KeyedValueListener::new(key, default, tx));
                    let _guard = ListenerGuard::register(store, listener);

                    let mut changes = WatchStream::new(rx);
                    while let Some(value) = changes.next().await {
                        yield Ok(value);
                    }
                }
            }
        })
    }

    /// Watches the string under `key`. See [`Preferences::watch`].
    pub fn watch_string(&self, key: &str, default: &str) -> PrefStream<Result<String, PrefError>> {
        self.watch(key, default.to_owned())
    }

    /// Watches the string set under `key`. See [`Preferences::watch`].
    pub fn watch_string_set(
        &self,
        key: &str,
        default: HashSet<String>,
    ) -> PrefStream<Result<HashSet<String>, PrefError>> {
        self.watch(key, default)
    }

    /// Watches the int under `key`. See [`Preferences::watch`].
    pub fn watch_int(&self, key: &str, default: i32) -> PrefStream<Result<i32, PrefError>> {
        self.watch(key, default)
    }

    /// Watches the long under `key`. See [`Preferences::watch`].
    pub fn watch_long(&self, key: &str, default: i64) -> PrefStream<Result<i64, PrefError>> {
        self.watch(key, default)
    }

    /// Watches the float under `key`. See [`Preferences::watch`].
    pub fn watch_float(&self, key: &str, default: f32) -> PrefStream<Result<f32, PrefError>> {
        self.watch(key, default)
    }

    /// Watches the bool under `key`. See [`Preferences::watch`].
    pub fn watch_bool(&self, key: &str, default: bool) -> PrefStream<Result<bool, PrefError>> {
        self.watch(key, default)
    }

    /// Watches the full contents of the store.
    ///
    /// Yields the current snapshot immediately, then re-reads the entire map
    /// after every committed change, including notifications that cannot
    /// name the changed keys. Every notification is a full re-read; there is
    /// no diffing, and an unrelated-looking notification still produces an
    /// item.
    pub fn watch_all(&self) -> PrefStream<PrefMap> {
        let store = Arc::clone(&self.store);

        PrefStream::new(stream! {
            let (tx, rx) = watch::channel(store.get_all());
            let listener = Arc::new(AllPreferencesListener::new(tx));
            let _guard = ListenerGuard::register(store, listener);

            let mut changes = WatchStream::new(rx);
            while let Some(snapshot) = changes.next().await {
                yield snapshot;
            }
        })
    }

    /// Watches whether any value is stored under `key`.
    ///
    /// Yields the current presence immediately, then the re-checked presence
    /// after every committed change to `key`.
    pub fn watch_contains(&self, key: &str) -> PrefStream<bool> {
        let store = Arc::clone(&self.store);
        let key = key.to_owned();

        PrefStream::new(stream! {
            let (tx, rx) = watch::channel(store.contains(&key));
            let listener = Arc::new(KeyedContainsListener::new(key, tx));
            let _guard = ListenerGuard::register(store, listener);

            let mut changes = WatchStream::new(rx);
            while let Some(present) = changes.next().await {
                yield present;
            }
        })
    }

    /// Watches an enum stored by variant name under `key`.
    ///
    /// Built on [`Preferences::watch`] over the underlying string; each item
    /// is converted by name lookup, so a stored string that names no variant
    /// of `E` reaches the consumer as an [`PrefError::UnknownVariant`] item.
    pub fn watch_enum<E>(&self, key: &str, default: E) -> PrefStream<Result<E, PrefError>>
    where
        E: FromStr + AsRef<str> + 'static,
    {
        let names = self.watch(key, default.as_ref().to_owned());
        let key = key.to_owned();

        PrefStream::new(names.map(move |result| result.and_then(|name| parse_enum(&key, &name))))
    }

    /// Applies a batch of edits and commits them.
    ///
    /// The closure receives a fresh [`EditBatch`] to chain operations on.
    /// Removals and clears take effect before puts regardless of the order
    /// they were chained in; see [`EditBatch`].
    ///
    /// Returns the store's commit result. `false` means the store rejected
    /// the batch and none of its writes took effect; the commit is not
    /// retried.
    pub async fn edit<F>(&self, edits: F) -> bool
    where
        F: FnOnce(&mut EditBatch) -> &mut EditBatch,
    {
        let mut batch = EditBatch::new();
        edits(&mut batch);
        self.commit(batch).await
    }

    /// Commits a prebuilt batch. See [`Preferences::edit`].
    pub async fn commit(&self, batch: EditBatch) -> bool {
        let accepted = self.store.commit(batch);
        if !accepted {
            debug!("preference commit rejected by store");
        }
        accepted
    }
}

fn parse_enum<E: FromStr>(key: &str, name: &str) -> Result<E, PrefError> {
    E::from_str(name).map_err(|_| PrefError::UnknownVariant {
        key: key.to_owned(),
        name: name.to_owned(),
        target: any::type_name::<E>(),
    })
}
