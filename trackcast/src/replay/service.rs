//! Replay service orchestration.
//!
//! [`ReplayService`] is the entry point for collaborators: it loads a
//! recording, builds one channel and one replayer per track, and spawns each
//! replayer on the tokio runtime. Loading is all-or-nothing; if any track is
//! invalid, nothing starts. Subscribing to a returned channel is the only
//! way to observe replayed telemetry.
//!
//! # Shutdown
//!
//! The service owns a master [`CancellationToken`] and hands each replayer a
//! child token. [`ReplayService::shutdown`] cancels the master token and
//! waits for every replay task to wind down, so tests and embedders can
//! start any number of services without leaking timer tasks.
//!
//! # Example
//!
//! ```ignore
//! use trackcast::replay::ReplayService;
//!
//! let service = ReplayService::start(Path::new("gps.dat"))?;
//!
//! for channel in service.channels() {
//!     channel.subscribe(|event| println!("{}", event));
//! }
//!
//! // Later:
//! service.shutdown().await;
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::channel::{Fault, SharedFaultSink, TracingFaultSink};
use crate::recording::{LoadResult, Recording};

use super::event::{track_name, EventChannel};
use super::replayer::TrackReplayer;

/// Default wait before each track's first emission.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// Configuration for a replay service.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Wait before the first emission on every track, independent of any
    /// recorded sample.
    pub initial_delay: Duration,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }
}

/// Owns one event channel and one replay task per recorded track.
pub struct ReplayService {
    channels: Vec<Arc<EventChannel>>,
    track_names: Vec<String>,
    handles: Vec<JoinHandle<()>>,
    cancellation: CancellationToken,
    fault_sink: SharedFaultSink,
}

impl ReplayService {
    /// Load a recording from `path` and start replaying every track.
    ///
    /// Fails with a [`crate::recording::LoadError`] if the recording is
    /// missing, malformed, or contains an empty track; in that case no
    /// channels or replayers are constructed. Must be called within a tokio
    /// runtime.
    pub fn start(path: &Path) -> LoadResult<Self> {
        Self::start_with_config(path, ReplayConfig::default())
    }

    /// Load a recording from `path` and start it with a custom configuration.
    pub fn start_with_config(path: &Path, config: ReplayConfig) -> LoadResult<Self> {
        let recording = Recording::load(path)?;
        Ok(Self::from_recording(recording, config))
    }

    /// Start replaying an already-loaded recording.
    pub fn from_recording(recording: Recording, config: ReplayConfig) -> Self {
        Self::from_recording_with_sink(recording, config, Arc::new(TracingFaultSink))
    }

    /// Start replaying with a custom fault sink.
    ///
    /// Runtime faults (listener panics, dead replay loops) are reported to
    /// `fault_sink`; they never propagate to callers.
    pub fn from_recording_with_sink(
        recording: Recording,
        config: ReplayConfig,
        fault_sink: SharedFaultSink,
    ) -> Self {
        let cancellation = CancellationToken::new();
        let tracks = recording.into_tracks();

        info!(
            tracks = tracks.len(),
            initial_delay_ms = config.initial_delay.as_millis() as u64,
            "Starting replay service"
        );

        let mut channels = Vec::with_capacity(tracks.len());
        let mut track_names = Vec::with_capacity(tracks.len());
        let mut handles = Vec::with_capacity(tracks.len());

        for (index, sequence) in tracks.into_iter().enumerate() {
            let name = track_name(index);
            let channel = Arc::new(EventChannel::with_fault_sink(
                name.clone(),
                Arc::clone(&fault_sink),
            ));

            let replayer = TrackReplayer::new(
                name.clone(),
                Arc::new(sequence),
                Arc::clone(&channel),
                config.initial_delay,
            );
            handles.push(tokio::spawn(replayer.run(cancellation.child_token())));

            channels.push(channel);
            track_names.push(name);
        }

        Self {
            channels,
            track_names,
            handles,
            cancellation,
            fault_sink,
        }
    }

    /// The per-track event channels, in load order.
    pub fn channels(&self) -> &[Arc<EventChannel>] {
        &self.channels
    }

    /// Number of replaying tracks.
    pub fn track_count(&self) -> usize {
        self.channels.len()
    }

    /// The master cancellation token (for coordinating shutdown).
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Cancel every replayer and wait for the replay loops to wind down.
    ///
    /// After this resolves, no further events are delivered on any channel.
    /// A replay task found dead by panic is reported to the fault sink as a
    /// scheduling fault.
    pub async fn shutdown(self) {
        let Self {
            channels: _channels,
            track_names,
            handles,
            cancellation,
            fault_sink,
        } = self;

        info!("Shutting down replay service");
        cancellation.cancel();

        for (name, handle) in track_names.into_iter().zip(handles) {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    fault_sink.report(Fault::Scheduling {
                        track: name,
                        detail: e.to_string(),
                    });
                }
            }
        }

        info!("Replay service shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::Sample;
    use crate::replay::event::TrackEvent;
    use parking_lot::Mutex;

    fn two_track_recording() -> Recording {
        Recording::from_tracks(vec![
            vec![
                Sample::new(1.0, 2.0, 100.0, 200),
                Sample::new(1.1, 2.1, 110.0, 200),
            ],
            vec![Sample::new(50.0, 60.0, 900.0, 500)],
        ])
        .unwrap()
    }

    fn collect(channel: &EventChannel) -> Arc<Mutex<Vec<TrackEvent>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        channel.subscribe(move |event: &TrackEvent| sink.lock().push(event.clone()));
        log
    }

    #[tokio::test]
    async fn test_channels_match_load_order() {
        let service = ReplayService::from_recording(two_track_recording(), ReplayConfig::default());

        assert_eq!(service.track_count(), 2);
        assert_eq!(service.channels()[0].label(), "Tracker0");
        assert_eq!(service.channels()[1].label(), "Tracker1");

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_recording_starts_no_tracks() {
        let recording = Recording::from_tracks(Vec::new()).unwrap();
        let service = ReplayService::from_recording(recording, ReplayConfig::default());

        assert_eq!(service.track_count(), 0);
        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_start_missing_file_builds_nothing() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = ReplayService::start(&temp.path().join("missing.dat"));
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tracks_replay_independently() {
        let config = ReplayConfig {
            initial_delay: Duration::from_millis(100),
        };
        let service = ReplayService::from_recording(two_track_recording(), config);

        let fast = collect(&service.channels()[0]);
        let slow = collect(&service.channels()[1]);

        tokio::time::sleep(Duration::from_millis(1050)).await;

        // Track 0 fires at 100, 300, 500, 700, 900; track 1 at 100, 600.
        // Each advances on its own schedule.
        assert_eq!(fast.lock().len(), 5);
        assert_eq!(slow.lock().len(), 2);
        assert!(fast.lock().iter().all(|e| e.track_name == "Tracker0"));
        assert!(slow.lock().iter().all(|e| e.track_name == "Tracker1"));

        service.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_emissions() {
        let config = ReplayConfig {
            initial_delay: Duration::from_millis(100),
        };
        let service = ReplayService::from_recording(two_track_recording(), config);
        let log = collect(&service.channels()[0]);

        tokio::time::sleep(Duration::from_millis(350)).await;
        service.shutdown().await;
        let emitted = log.lock().len();
        assert!(emitted > 0);

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(log.lock().len(), emitted);
    }

    #[tokio::test]
    async fn test_default_initial_delay_is_one_second() {
        assert_eq!(
            ReplayConfig::default().initial_delay,
            Duration::from_millis(1000)
        );
    }
}
