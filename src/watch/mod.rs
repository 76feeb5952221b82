//! Change-notification streams over a preference store.
//!
//! Converts the store's callback-based listener registry into cancellable
//! [`Stream`](futures::Stream)s: exactly one listener per subscription,
//! registered lazily when the stream is first polled and unregistered when
//! the stream is dropped. A `tokio::sync::watch` channel sits between the
//! store's callback thread and the consuming task, conflating to the latest
//! value under load.

mod guard;
mod listener;
mod stream;

#[cfg(test)]
mod tests;

pub use stream::PrefStream;

pub(crate) use guard::ListenerGuard;
pub(crate) use listener::{AllPreferencesListener, KeyedContainsListener, KeyedValueListener};
