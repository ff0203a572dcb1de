//! Multicast publish/subscribe channel.
//!
//! [`Multicast`] fans each published value out to every currently-registered
//! listener, synchronously and in registration order. Listeners may attach
//! and detach at any time, including from other threads while a publish is
//! in flight; a subscription takes effect for publishes that start after
//! `subscribe` returns. There is no history: a late subscriber never sees
//! values published before it registered.
//!
//! # Locking
//!
//! The listener table sits behind a mutex that is held only while the table
//! is mutated or snapshotted, never while listeners run. Each publish clones
//! the current set of listener handles under the lock and invokes them
//! outside it, so a listener may subscribe, unsubscribe, or publish again
//! without deadlocking.
//!
//! # Example
//!
//! ```ignore
//! use trackcast::channel::Multicast;
//!
//! let channel: Multicast<String> = Multicast::new("Tracker0");
//!
//! let handle = channel.subscribe(|value: &String| println!("got {}", value));
//! channel.publish(&"hello".to_string());
//! channel.unsubscribe(handle);
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;

use super::fault::{Fault, SharedFaultSink, TracingFaultSink};

/// Listener callback invoked for every published value.
type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle identifying one subscription on one channel.
///
/// Returned by [`Multicast::subscribe`], consumed by
/// [`Multicast::unsubscribe`]. Handles are never reused within a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Registered listeners in subscription order.
struct ListenerTable<T> {
    entries: Vec<(u64, Listener<T>)>,
    next_id: u64,
}

/// A per-track publish/subscribe primitive.
///
/// Cheap to share as `Arc<Multicast<T>>`; all methods take `&self`.
pub struct Multicast<T> {
    /// Label used in logs and fault reports, typically the track name.
    label: String,
    table: Mutex<ListenerTable<T>>,
    fault_sink: SharedFaultSink,
}

impl<T> Multicast<T> {
    /// Create a channel reporting faults through `tracing`.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_fault_sink(label, Arc::new(TracingFaultSink))
    }

    /// Create a channel reporting faults to a custom sink.
    pub fn with_fault_sink(label: impl Into<String>, fault_sink: SharedFaultSink) -> Self {
        Self {
            label: label.into(),
            table: Mutex::new(ListenerTable {
                entries: Vec::new(),
                next_id: 0,
            }),
            fault_sink,
        }
    }

    /// The channel's label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Register a listener.
    ///
    /// Takes effect for all publishes that start after this call returns;
    /// a publish already snapshotting or delivering does not include the new
    /// listener. Never blocks on listener execution.
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let mut table = self.table.lock();
        let id = table.next_id;
        table.next_id += 1;
        table.entries.push((id, Arc::new(listener)));
        Subscription(id)
    }

    /// Remove a registration.
    ///
    /// Returns `true` if the handle was registered. Deliveries already
    /// dispatched to the listener are unaffected.
    pub fn unsubscribe(&self, handle: Subscription) -> bool {
        let mut table = self.table.lock();
        let before = table.entries.len();
        table.entries.retain(|(id, _)| *id != handle.0);
        table.entries.len() != before
    }

    /// Number of currently-registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.table.lock().entries.len()
    }

    /// Deliver `value` to every currently-registered listener.
    ///
    /// Listeners run synchronously in registration order; this returns once
    /// all of them have been invoked. A listener that panics is reported to
    /// the fault sink and stays registered; delivery continues with the next
    /// listener.
    pub fn publish(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = {
            let table = self.table.lock();
            table.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
        };

        for listener in snapshot {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| listener(value))) {
                self.fault_sink.report(Fault::Listener {
                    channel: self.label.clone(),
                    detail: panic_detail(payload.as_ref()),
                });
            }
        }
    }
}

/// Extract a printable message from a panic payload.
fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "listener panicked".to_string()
    }
}
