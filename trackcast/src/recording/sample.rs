//! Position samples and per-track sample sequences.
//!
//! A [`Sample`] is one recorded position fix plus the wait time before the
//! following fix should be emitted. A [`TrackSequence`] is the full ordered
//! list of samples for one track; it is built once at load time and never
//! mutated afterwards. Playback wraps around to the first sample after the
//! last one, but the wraparound state lives in the replay cursor, not here.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A single recorded position sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Altitude in feet.
    pub altitude_feet: f64,
    /// Wait before the following sample is emitted, in milliseconds.
    pub delay_to_next_ms: u64,
}

impl Sample {
    /// Create a new sample.
    pub fn new(latitude: f64, longitude: f64, altitude_feet: f64, delay_to_next_ms: u64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_feet,
            delay_to_next_ms,
        }
    }

    /// The wait before the following sample, as a [`Duration`].
    pub fn delay_to_next(&self) -> Duration {
        Duration::from_millis(self.delay_to_next_ms)
    }
}

/// Ordered, non-empty sequence of samples belonging to one track.
///
/// Sequences are read-only after construction. Latitude/longitude values are
/// passed through as recorded; range checking belongs to downstream filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSequence {
    samples: Vec<Sample>,
}

impl TrackSequence {
    /// Build a sequence from recorded samples.
    ///
    /// Returns `None` if `samples` is empty; a track with zero samples has
    /// nothing to replay and is rejected at the load boundary.
    pub fn new(samples: Vec<Sample>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        Some(Self { samples })
    }

    /// Number of samples in the sequence, always at least 1.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// The samples in recorded order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}
