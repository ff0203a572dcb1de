//! Per-track multicast publish/subscribe primitive.
//!
//! Each replayed track owns one [`Multicast`] channel. Producers publish
//! synchronously; any number of consumers subscribe and unsubscribe at any
//! time and receive only values published after they attached. Listener
//! panics are isolated per delivery and reported through a [`FaultSink`].
//!
//! # Components
//!
//! - [`Multicast`] / [`Subscription`] - the channel and its registration handle
//! - [`Fault`] / [`FaultSink`] / [`TracingFaultSink`] - out-of-band fault reporting

mod fault;
mod multicast;

pub use fault::{Fault, FaultSink, SharedFaultSink, TracingFaultSink};
pub use multicast::{Multicast, Subscription};
