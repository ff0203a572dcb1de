//! Recording data model and binary loader.
//!
//! A recording holds, for each tracked entity, the full ordered list of
//! position samples captured from a live source. Loading happens once at
//! service startup; the resulting [`TrackSequence`]s are read-only for the
//! life of the process and are consumed circularly by the replay loops.
//!
//! # Components
//!
//! - [`Sample`] / [`TrackSequence`] - the in-memory data model
//! - [`Recording`] - validated container with bincode load/save
//! - [`LoadError`] - structural load failures (all fatal to startup)

mod error;
mod loader;
mod sample;

pub use error::{LoadError, LoadResult};
pub use loader::Recording;
pub use sample::{Sample, TrackSequence};
