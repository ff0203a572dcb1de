//! TrackCast - recorded GPS traces replayed as a live event feed.
//!
//! This library loads a multi-track positional-telemetry recording and plays
//! it back in real time: each track runs its own timed loop that advances
//! circularly through the recorded samples forever, and each emission is
//! fanned out to whoever has subscribed to that track's channel. Subscribers
//! attaching late receive only events emitted after they attached.
//!
//! # Architecture
//!
//! ```text
//! Recording ──► TrackSequence (per track) ──► TrackReplayer ──► Multicast ──► subscribers
//!   (disk)          (read-only)               (tokio task)     (per track)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use trackcast::ReplayService;
//!
//! let service = ReplayService::start(Path::new("gps.dat"))?;
//! for channel in service.channels() {
//!     channel.subscribe(|event| println!("{}", event));
//! }
//! // ...
//! service.shutdown().await;
//! ```

pub mod channel;
pub mod recording;
pub mod replay;

pub use channel::{Fault, FaultSink, Multicast, SharedFaultSink, Subscription, TracingFaultSink};
pub use recording::{LoadError, LoadResult, Recording, Sample, TrackSequence};
pub use replay::{
    track_name, EventChannel, ReplayConfig, ReplayService, TrackEvent, TrackReplayer,
    DEFAULT_INITIAL_DELAY,
};

/// Crate version from Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
