//! Track replay loops and service orchestration.
//!
//! One [`TrackReplayer`] per track advances circularly through its recorded
//! samples forever, publishing a [`TrackEvent`] per firing onto that track's
//! channel. The [`ReplayService`] wires it all together: load the recording,
//! build the channel/replayer pairs, spawn the loops, and tear everything
//! down again on shutdown.
//!
//! # Components
//!
//! - [`TrackEvent`] / [`EventChannel`] - what subscribers receive, and where
//! - [`TrackCursor`] - the circular read position into a sequence
//! - [`TrackReplayer`] - the per-track timed loop
//! - [`ReplayService`] / [`ReplayConfig`] - orchestration and lifecycle

mod cursor;
mod event;
mod replayer;
mod service;

pub use cursor::TrackCursor;
pub use event::{track_name, EventChannel, TrackEvent};
pub use replayer::TrackReplayer;
pub use service::{ReplayConfig, ReplayService, DEFAULT_INITIAL_DELAY};
