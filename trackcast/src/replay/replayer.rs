//! Per-track timed replay loop.
//!
//! A [`TrackReplayer`] owns one track's sample sequence and its event
//! channel and replays the sequence forever: wait, emit, wait, emit, wrapping
//! after the last sample. Each replayer runs as one tokio task, so firings
//! for a track are strictly serialized and its only suspension point is the
//! timer. Tracks know nothing about each other.
//!
//! # Timing
//!
//! The first emission fires after the configured initial delay, which is not
//! derived from any sample. Every later gap is the `delay_to_next` of the
//! sample that was just emitted. Publishing is synchronous and does no I/O,
//! so the emission schedule is not stretched by slow subscribers beyond the
//! time their callbacks take.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::recording::TrackSequence;

use super::cursor::TrackCursor;
use super::event::{EventChannel, TrackEvent};

/// Replays one track's samples onto its channel until cancelled.
pub struct TrackReplayer {
    name: String,
    sequence: Arc<TrackSequence>,
    channel: Arc<EventChannel>,
    initial_delay: Duration,
}

impl TrackReplayer {
    /// Create a replayer for one track.
    pub fn new(
        name: impl Into<String>,
        sequence: Arc<TrackSequence>,
        channel: Arc<EventChannel>,
        initial_delay: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            sequence,
            channel,
            initial_delay,
        }
    }

    /// The track name carried on every emitted event.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the replay loop until `shutdown` is cancelled.
    ///
    /// Cancellation is observed at every wait, so no further events are
    /// emitted once the token fires.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            track = %self.name,
            samples = self.sequence.sample_count(),
            "Track replayer starting"
        );

        let mut cursor = TrackCursor::new(self.sequence.sample_count());

        // The first firing is armed with the fixed startup delay, not with
        // any sample's delay field.
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                debug!(track = %self.name, "Track replayer cancelled before first emission");
                return;
            }

            _ = sleep(self.initial_delay) => {}
        }

        loop {
            let sample = &self.sequence.samples()[cursor.current()];
            let event = TrackEvent::new(
                self.name.clone(),
                sample.latitude,
                sample.longitude,
                sample.altitude_feet,
            );

            debug!(track = %self.name, position = cursor.current(), "Emitting sample");
            self.channel.publish(&event);

            let gap = sample.delay_to_next();
            cursor.advance();

            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,

                _ = sleep(gap) => {}
            }
        }

        info!(track = %self.name, "Track replayer stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::Sample;
    use parking_lot::Mutex;
    use tokio::time::Instant;

    fn sequence(samples: Vec<Sample>) -> Arc<TrackSequence> {
        Arc::new(TrackSequence::new(samples).unwrap())
    }

    /// Subscribe a listener that records each event with its emission instant.
    fn attach_log(channel: &EventChannel) -> Arc<Mutex<Vec<(Instant, TrackEvent)>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        channel.subscribe(move |event: &TrackEvent| {
            sink.lock().push((Instant::now(), event.clone()));
        });
        log
    }

    fn spawn_replayer(
        samples: Vec<Sample>,
        initial_delay_ms: u64,
    ) -> (
        Arc<EventChannel>,
        Arc<Mutex<Vec<(Instant, TrackEvent)>>>,
        CancellationToken,
    ) {
        let channel = Arc::new(EventChannel::new("Tracker0"));
        let log = attach_log(&channel);
        let replayer = TrackReplayer::new(
            "Tracker0",
            sequence(samples),
            Arc::clone(&channel),
            Duration::from_millis(initial_delay_ms),
        );
        let shutdown = CancellationToken::new();
        tokio::spawn(replayer.run(shutdown.clone()));
        (channel, log, shutdown)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_emission_waits_initial_delay() {
        let (_channel, log, shutdown) =
            spawn_replayer(vec![Sample::new(1.0, 2.0, 100.0, 500)], 1000);

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(log.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(log.lock().len(), 1);

        shutdown.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_gaps_follow_emitted_sample_delays() {
        let start = Instant::now();
        let (_channel, log, shutdown) = spawn_replayer(
            vec![
                Sample::new(1.0, 2.0, 100.0, 500),
                Sample::new(1.1, 2.1, 110.0, 700),
            ],
            1000,
        );

        tokio::time::sleep(Duration::from_millis(3000)).await;
        shutdown.cancel();

        let log = log.lock();
        let offsets: Vec<u64> = log
            .iter()
            .map(|(t, _)| t.duration_since(start).as_millis() as u64)
            .collect();

        // Initial delay, then the gap after each emission equals the delay
        // carried by the sample just emitted: 1000, +500, +700, +500.
        assert_eq!(offsets, vec![1000, 1500, 2200, 2700]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_is_cyclic() {
        let samples = vec![
            Sample::new(0.0, 0.0, 0.0, 100),
            Sample::new(1.0, 1.0, 10.0, 100),
            Sample::new(2.0, 2.0, 20.0, 100),
        ];
        let (_channel, log, shutdown) = spawn_replayer(samples.clone(), 100);

        // Long enough for two full cycles plus one sample.
        tokio::time::sleep(Duration::from_millis(750)).await;
        shutdown.cancel();

        let log = log.lock();
        assert_eq!(log.len(), 7);
        for (k, (_, event)) in log.iter().enumerate() {
            let expected = &samples[k % samples.len()];
            assert_eq!(event.latitude, expected.latitude);
            assert_eq!(event.longitude, expected.longitude);
            assert_eq!(event.altitude_feet, expected.altitude_feet);
            assert_eq!(event.track_name, "Tracker0");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_sample_heartbeat() {
        let start = Instant::now();
        let (_channel, log, shutdown) =
            spawn_replayer(vec![Sample::new(5.0, 6.0, 70.0, 300)], 1000);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        shutdown.cancel();

        let log = log.lock();
        let offsets: Vec<u64> = log
            .iter()
            .map(|(t, _)| t.duration_since(start).as_millis() as u64)
            .collect();

        // Constant-period heartbeat of identical events.
        assert_eq!(offsets, vec![1000, 1300, 1600, 1900]);
        assert!(log.iter().all(|(_, e)| e.latitude == 5.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_first_emission() {
        let (_channel, log, shutdown) =
            spawn_replayer(vec![Sample::new(1.0, 2.0, 100.0, 500)], 1000);

        tokio::time::sleep(Duration::from_millis(500)).await;
        shutdown.cancel();
        tokio::time::sleep(Duration::from_millis(5000)).await;

        assert!(log.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_mid_replay() {
        let (_channel, log, shutdown) =
            spawn_replayer(vec![Sample::new(1.0, 2.0, 100.0, 500)], 100);

        tokio::time::sleep(Duration::from_millis(850)).await;
        shutdown.cancel();
        let emitted = log.lock().len();
        assert_eq!(emitted, 2);

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(log.lock().len(), emitted);
    }
}
