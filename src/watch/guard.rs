use std::sync::Arc;

use tracing::trace;

use crate::store::{ChangeListener, PreferenceStore};

/// Keeps a change listener registered for as long as the guard lives.
///
/// Dropping the guard unregisters the exact listener instance that was
/// registered, exactly once. Watch streams own one of these so that dropping
/// the stream releases the store-side registration deterministically.
pub(crate) struct ListenerGuard {
    store: Arc<dyn PreferenceStore>,
    listener: Option<Arc<dyn ChangeListener>>,
}

impl ListenerGuard {
    /// Registers `listener` with `store` and returns the guard owning that
    /// registration.
    pub(crate) fn register(
        store: Arc<dyn PreferenceStore>,
        listener: Arc<dyn ChangeListener>,
    ) -> Self {
        store.register_change_listener(Arc::clone(&listener));
        trace!("change listener registered");
        Self {
            store,
            listener: Some(listener),
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            self.store.unregister_change_listener(&listener);
            trace!("change listener unregistered");
        }
    }
}
