//! Schedule persistence with a schema version.
//!
//! A snapshot stores every track in timeline order. Collision sets are not trusted
//! on load: they are recomputed by re-inserting each shot.

use serde::{Deserialize, Serialize};
use shotcall_core::{GridConfig, Interval, Result, ShotCallConfig, ShotCallError, ShotId};
use std::path::Path;
use tracing::info;

use crate::event::TrackRef;
use crate::instrument::Instrument;
use crate::schedule::ShotSchedule;
use crate::shot::{Identified, Shot, Timed};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// One track and its shots in timeline order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSnapshot {
    pub name: String,
    pub track: TrackRef,
    pub shots: Vec<Shot>,
}

/// Versioned schedule file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleFile {
    /// Schema version for compatibility checks.
    pub version: u32,
    /// Application version that wrote this file.
    pub app_version: String,
    pub cells_per_count: u32,
    /// Next id the schedule would have handed out.
    #[serde(default)]
    pub next_id: u32,
    /// The director track first, then the camera tracks by index.
    pub tracks: Vec<TrackSnapshot>,
    /// Instrument registry in creation order.
    #[serde(default)]
    pub instruments: Vec<Instrument>,
    #[serde(default)]
    pub next_instrument_id: u32,
}

impl ScheduleFile {
    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| ShotCallError::Serialization(format!("Failed to serialize schedule: {}", e)))
    }

    /// Deserialize from JSON bytes, rejecting files from a newer schema.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| ShotCallError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0);
        if version != u64::from(CURRENT_VERSION) {
            return Err(ShotCallError::Serialization(format!(
                "Schedule file version {} is not supported (expected {})",
                version, CURRENT_VERSION
            )));
        }

        serde_json::from_value(raw)
            .map_err(|e| ShotCallError::Serialization(format!("Failed to parse schedule: {}", e)))
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

impl ShotSchedule {
    /// Capture every track for saving.
    pub fn snapshot(&self) -> ScheduleFile {
        let director = std::iter::once((TrackRef::Director, self.director_timeline()));
        let cameras = (0..self.camera_count())
            .filter_map(|index| Some((TrackRef::Camera(index), self.camera_timeline(index)?)));
        let tracks = director
            .chain(cameras)
            .map(|(track, timeline)| TrackSnapshot {
                name: timeline.name.clone(),
                track,
                shots: timeline.iter().cloned().collect(),
            })
            .collect();

        ScheduleFile {
            version: CURRENT_VERSION,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            cells_per_count: self.cells_per_count(),
            next_id: self.next_id(),
            tracks,
            instruments: self.instruments().to_vec(),
            next_instrument_id: self.next_instrument_id,
        }
    }

    /// Rebuild a schedule from a saved file.
    ///
    /// Shot and instrument ids are kept; new ids continue where the saved schedule left off. The rebuilt
    /// schedule must pass [`ShotSchedule::check_invariants`], so a file with dangling
    /// couplings or misplaced shots is rejected.
    pub fn restore(file: ScheduleFile) -> Result<Self> {
        let config = ShotCallConfig {
            cameras: Vec::new(),
            grid: GridConfig {
                cells_per_count: file.cells_per_count,
                ..GridConfig::default()
            },
        };
        config.grid.validate()?;
        let mut schedule = ShotSchedule::new(&config);
        if file.next_id > 1 {
            schedule.reserve_id(ShotId(file.next_id - 1))?;
        }
        schedule.next_instrument_id = schedule.next_instrument_id.max(file.next_instrument_id);
        for instrument in file.instruments {
            schedule.restore_instrument(instrument)?;
        }

        for snapshot in file.tracks {
            let track = match snapshot.track {
                TrackRef::Director => TrackRef::Director,
                TrackRef::Camera(_) => TrackRef::Camera(schedule.add_camera_track(snapshot.name)),
            };
            if track != snapshot.track {
                return Err(ShotCallError::Serialization(format!(
                    "Track {:?} is out of order in the schedule file",
                    snapshot.track
                )));
            }
            // Reverse so identical intervals come back in their saved order.
            for mut shot in snapshot.shots.into_iter().rev() {
                if schedule.shot(shot.id()).is_some() {
                    return Err(ShotCallError::Serialization(format!(
                        "Shot {} appears twice in the schedule file",
                        shot.id()
                    )));
                }
                Interval::new(shot.begin(), shot.end())?;
                shot.clear_collisions();
                schedule.reserve_id(shot.id()).map_err(|_| {
                    ShotCallError::Serialization(format!(
                        "Shot id {} is out of range",
                        shot.id()
                    ))
                })?;
                schedule.place(shot, track);
            }
        }

        schedule.check_invariants()?;
        info!(shots = schedule.len(), cameras = schedule.camera_count(), "Restored schedule");
        Ok(schedule)
    }
}
