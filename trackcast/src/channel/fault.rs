//! Runtime fault reporting.
//!
//! Faults are errors recovered inside the replay machinery: a subscriber
//! panicking mid-delivery, or a replay loop dying without being cancelled.
//! They never propagate to callers of `subscribe` or `channels`; they are
//! observable only through a [`FaultSink`].

use std::fmt;
use std::sync::Arc;

use tracing::warn;

/// A fault recovered at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// A subscriber callback panicked during delivery.
    ///
    /// Delivery to the remaining subscribers continued, and the faulting
    /// subscriber stays registered.
    Listener {
        /// Label of the channel the fault occurred on.
        channel: String,
        /// Panic payload, if it carried a message.
        detail: String,
    },

    /// A replay loop terminated without being cancelled.
    ///
    /// Fatal to that one track; other tracks and the service continue.
    Scheduling {
        /// Name of the affected track.
        track: String,
        /// Description of the failure.
        detail: String,
    },
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Listener { channel, detail } => {
                write!(f, "listener fault on {}: {}", channel, detail)
            }
            Fault::Scheduling { track, detail } => {
                write!(f, "scheduling fault on {}: {}", track, detail)
            }
        }
    }
}

/// Sink for runtime faults.
///
/// Implementations must be `Send + Sync`; faults are reported from replay
/// tasks and from whichever thread is publishing.
pub trait FaultSink: Send + Sync {
    /// Record one fault. Must not block.
    fn report(&self, fault: Fault);
}

/// Shared fault sink handle.
pub type SharedFaultSink = Arc<dyn FaultSink>;

/// Fault sink that logs through `tracing`.
#[derive(Debug, Default)]
pub struct TracingFaultSink;

impl FaultSink for TracingFaultSink {
    fn report(&self, fault: Fault) {
        match &fault {
            Fault::Listener { channel, detail } => {
                warn!(channel = %channel, detail = %detail, "Listener fault during publish");
            }
            Fault::Scheduling { track, detail } => {
                warn!(track = %track, detail = %detail, "Replay loop fault");
            }
        }
    }
}
