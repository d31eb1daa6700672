// ── Status subscriptions ──
//
// The store writes the status channel for two reasons: a fetch result
// (payload or error) and endpoint bookkeeping (`apiUrl`). Subscribers
// only care about the first, so both the async API and the `Stream`
// adapter skip writes that leave the result unchanged.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::status::RuntimeStatus;

/// A subscription to the store's runtime status.
pub struct StatusStream {
    current: RuntimeStatus,
    receiver: watch::Receiver<RuntimeStatus>,
}

impl StatusStream {
    pub(crate) fn new(receiver: watch::Receiver<RuntimeStatus>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The status as of subscription, or as returned by the last
    /// [`changed()`](Self::changed).
    pub fn current(&self) -> &RuntimeStatus {
        &self.current
    }

    pub fn latest(&self) -> RuntimeStatus {
        self.receiver.borrow().clone()
    }

    /// Wait until a fetch lands a different payload or error.
    ///
    /// Endpoint-only rewrites and identical re-fetches are skipped.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<RuntimeStatus> {
        loop {
            self.receiver.changed().await.ok()?;
            let next = self.receiver.borrow_and_update().clone();
            if next.same_result(&self.current) {
                continue;
            }
            self.current = next.clone();
            return Some(next);
        }
    }

    /// Wait until any fetch result is available: a payload or an error.
    ///
    /// Resolves immediately if one is already cached.
    pub async fn settled(&mut self) -> Option<RuntimeStatus> {
        let status = self
            .receiver
            .wait_for(|status| !status.is_empty() || status.error().is_some())
            .await
            .ok()?
            .clone();
        self.current = status.clone();
        Some(status)
    }

    /// Convert into a `Stream` of distinct fetch results, starting with
    /// the status at subscription time.
    pub fn into_stream(self) -> StatusUpdates {
        StatusUpdates {
            inner: WatchStream::new(self.receiver),
            last: None,
        }
    }
}

/// `Stream` of status results; see [`StatusStream::into_stream`].
pub struct StatusUpdates {
    inner: WatchStream<RuntimeStatus>,
    last: Option<RuntimeStatus>,
}

impl Stream for StatusUpdates {
    type Item = RuntimeStatus;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            let Some(next) = ready!(Pin::new(&mut self.inner).poll_next(cx)) else {
                return Poll::Ready(None);
            };
            if self.last.as_ref().is_some_and(|last| last.same_result(&next)) {
                continue;
            }
            self.last = Some(next.clone());
            return Poll::Ready(Some(next));
        }
    }
}
