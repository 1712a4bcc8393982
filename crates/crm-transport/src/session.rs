//! Process-wide session-expiry event channel.
//!
//! Decouples "the credential died" detection (the gateway sees a 401) from
//! "what screen is showing" (the navigation shell decides where to send the
//! user). The channel is constructed once at startup and cloned into the
//! gateway and into whoever owns navigation; there is no module-level
//! global.
//!
//! Delivery is synchronous within the publishing call, in subscription
//! order, with no buffering: a handler registered after a publish does not
//! see it. Consumers are expected to be idempotent to repeated `Expired`
//! emissions.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

/// The one event kind this channel carries. No payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Expired,
}

type Handler = Arc<dyn Fn(SessionEvent) + Send + Sync>;

struct Inner {
    subscribers: Mutex<Vec<(u64, Handler)>>,
    next_id: AtomicU64,
}

/// Publish/subscribe channel for [`SessionEvent`].
///
/// Cheap to clone; all clones share the same subscriber list.
#[derive(Clone)]
pub struct SessionEventChannel {
    inner: Arc<Inner>,
}

impl SessionEventChannel {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Register a handler. Returns a handle whose `unsubscribe` removes it.
    ///
    /// Handlers are invoked in subscription order.
    pub fn subscribe(&self, handler: impl Fn(SessionEvent) + Send + Sync + 'static) -> SubscriberHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers.lock().push((id, Arc::new(handler)));
        SubscriberHandle { channel: self.clone(), id }
    }

    /// Deliver `event` to every current subscriber, synchronously.
    ///
    /// A panicking handler is logged and must not prevent later handlers
    /// from running. The subscriber list is snapshotted before delivery, so
    /// a handler may subscribe or unsubscribe without deadlocking; such
    /// changes take effect from the next publish.
    pub fn publish(&self, event: SessionEvent) {
        let handlers: Vec<Handler> = {
            let subscribers = self.inner.subscribers.lock();
            subscribers.iter().map(|(_, h)| Arc::clone(h)).collect()
        };
        for handler in handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
                warn!(?event, "session event handler panicked");
            }
        }
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

impl Default for SessionEventChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle identifying one subscription. Removes the handler when dropped;
/// long-lived consumers (the navigation shell) hold the handle for the life
/// of the process.
pub struct SubscriberHandle {
    channel: SessionEventChannel,
    id: u64,
}

impl SubscriberHandle {
    /// Remove the handler now. Equivalent to dropping the handle, spelled
    /// out at the call site.
    pub fn unsubscribe(self) {}
}

impl Drop for SubscriberHandle {
    fn drop(&mut self) {
        let mut subscribers = self.channel.inner.subscribers.lock();
        subscribers.retain(|(id, _)| *id != self.id);
    }
}
