//! Binary recording container.
//!
//! A recording is persisted as a bincode-serialized container holding, for
//! each track, an ordered list of samples. Loading validates structure only:
//! every track must yield at least one sample, and the byte stream must
//! decode cleanly. Coordinate values are passed through unchecked.
//!
//! Saving writes to a temp file and renames it into place, so a crashed
//! writer never leaves a half-written recording behind.

use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{LoadError, LoadResult};
use super::sample::{Sample, TrackSequence};

/// On-disk form of a recording: one ordered sample list per track.
///
/// Kept separate from the validated [`Recording`] so deserialization can
/// never bypass the non-empty-track invariant.
#[derive(Debug, Serialize, Deserialize)]
struct RecordingFile {
    tracks: Vec<Vec<Sample>>,
}

/// A validated multi-track recording, loaded once at service startup.
#[derive(Debug, Clone)]
pub struct Recording {
    tracks: Vec<TrackSequence>,
}

impl Recording {
    /// Build a recording from raw per-track sample lists.
    ///
    /// Fails with [`LoadError::EmptyTrack`] if any track has zero samples.
    /// A recording with zero tracks is valid and yields a service with no
    /// channels.
    pub fn from_tracks(tracks: Vec<Vec<Sample>>) -> LoadResult<Self> {
        let mut sequences = Vec::with_capacity(tracks.len());
        for (index, samples) in tracks.into_iter().enumerate() {
            let sequence =
                TrackSequence::new(samples).ok_or(LoadError::EmptyTrack { track: index })?;
            sequences.push(sequence);
        }
        Ok(Self { tracks: sequences })
    }

    /// Load a recording from a file.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a recording from a reader.
    pub fn from_reader(reader: impl Read) -> LoadResult<Self> {
        let file: RecordingFile = bincode::deserialize_from(reader)
            .map_err(|e| LoadError::Malformed(e.to_string()))?;
        Self::from_tracks(file.tracks)
    }

    /// Save the recording to a file.
    ///
    /// Writes to a temp file first, then renames for atomicity.
    pub fn save(&self, path: &Path) -> LoadResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        let file = std::fs::File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;

        std::fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Serialize the recording to a writer.
    pub fn to_writer(&self, writer: impl Write) -> LoadResult<()> {
        let file = RecordingFile {
            tracks: self.tracks.iter().map(|t| t.samples().to_vec()).collect(),
        };
        bincode::serialize_into(writer, &file)
            .map_err(|e| LoadError::Io(std::io::Error::other(format!("serialize failed: {}", e))))
    }

    /// Number of tracks in the recording.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// The per-track sequences, in load order.
    pub fn tracks(&self) -> &[TrackSequence] {
        &self.tracks
    }

    /// Consume the recording, yielding its sequences in load order.
    pub fn into_tracks(self) -> Vec<TrackSequence> {
        self.tracks
    }
}
