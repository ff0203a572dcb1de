//! Events delivered to subscribers.

use std::fmt;

use crate::channel::Multicast;

/// Channel type carrying replayed track events.
pub type EventChannel = Multicast<TrackEvent>;

/// One emitted position fix for a named track.
///
/// Carries no timestamp; emission order on a channel is the only ordering
/// guarantee. Events are built at the moment of emission and discarded after
/// delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEvent {
    /// Name of the originating track.
    pub track_name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Altitude in feet.
    pub altitude_feet: f64,
}

impl TrackEvent {
    /// Create a new event.
    pub fn new(
        track_name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        altitude_feet: f64,
    ) -> Self {
        Self {
            track_name: track_name.into(),
            latitude,
            longitude,
            altitude_feet,
        }
    }
}

impl fmt::Display for TrackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | lat:{} lon:{} alt:{}",
            self.track_name, self.latitude, self.longitude, self.altitude_feet
        )
    }
}

/// Derive the printable name for the track loaded at `index`.
pub fn track_name(index: usize) -> String {
    format!("Tracker{}", index)
}
