use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;

/// A cancellable stream of preference values.
///
/// The first item is always the value current at subscription time; later
/// items follow the store's change notifications. Delivery is conflating:
/// when notifications outpace the consumer, intermediate values are dropped
/// and only the most recent one is eventually delivered. The contract is
/// "current value", not "every historical transition".
///
/// Dropping the stream cancels the subscription and unregisters its store
/// listener.
pub struct PrefStream<T> {
    inner: Pin<Box<dyn Stream<Item = T> + Send>>,
}

impl<T> PrefStream<T> {
    pub(crate) fn new(stream: impl Stream<Item = T> + Send + 'static) -> Self {
        Self {
            inner: Box::pin(stream),
        }
    }
}

impl<T> Stream for PrefStream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.as_mut().poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> fmt::Debug for PrefStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefStream").finish_non_exhaustive()
    }
}
