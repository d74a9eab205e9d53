//! Shot types for the timeline.
//!
//! Director and camera shots share one struct; the kind-specific data lives in
//! [`ShotKind`]. Cross-shot links (collisions, director/camera coupling) are
//! stored as [`ShotId`]s, never as references.

use serde::{Deserialize, Serialize};
use shotcall_core::{InstrumentId, Interval, Result, ShotCallError, ShotId};
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Ids of the shots a shot currently collides with.
pub type CollisionSet = SmallVec<[ShotId; 4]>;

// ── Capabilities ────────────────────────────────────────────────

/// Something placed on the count axis.
pub trait Timed {
    fn interval(&self) -> Interval;

    fn begin(&self) -> f64 {
        self.interval().begin()
    }

    fn end(&self) -> f64 {
        self.interval().end()
    }

    /// Timeline sort order: begin ascending, then end ascending.
    fn compare_to(&self, other: &impl Timed) -> Ordering {
        self.interval().compare(other.interval())
    }

    /// See [`Interval::overlaps`].
    fn overlaps_with(&self, other: &impl Timed, movement_offset: f64) -> bool {
        self.interval().overlaps(other.interval(), movement_offset)
    }
}

/// Stable identity plus the user-facing labels.
pub trait Identified {
    fn id(&self) -> ShotId;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
}

/// Symmetric collision bookkeeping. Both sides of a pair are always updated together
/// by the owning [`Timeline`](crate::Timeline); a shot never edits only its own side.
pub trait CollisionTracking {
    fn collides_with(&self) -> &[ShotId];

    /// Record `other`. Returns `false` if it was already present.
    fn add_collision(&mut self, other: ShotId) -> bool;

    /// Forget `other`. Returns `false` if it was not present.
    fn remove_collision(&mut self, other: ShotId) -> bool;

    fn is_colliding(&self) -> bool {
        !self.collides_with().is_empty()
    }
}

// ── Kinds ───────────────────────────────────────────────────────

/// A grouping shot on the director track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectorShot {
    /// Coupled camera shots, in coupling order. Membership only: the camera
    /// shots live on their camera timelines.
    pub camera_shots: Vec<ShotId>,
    /// Slack before the director shot's begin applied to every coupled camera shot.
    pub padding_before: f64,
    /// Slack after the director shot's end applied to every coupled camera shot.
    pub padding_after: f64,
}

/// A leaf shot on a camera track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraShot {
    /// Index of the camera timeline holding this shot.
    pub camera: usize,
    /// Director shot this camera shot is coupled to, if any.
    pub parent: Option<ShotId>,
}

/// Kind-specific shot data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShotKind {
    Director(DirectorShot),
    Camera(CameraShot),
}

// ── Shot ────────────────────────────────────────────────────────

/// A named interval on a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    id: ShotId,
    /// Shot name (displayed in the block title)
    pub name: String,
    /// Free-form notes for the director
    pub description: String,
    interval: Interval,
    collides_with: CollisionSet,
    /// Instruments featured in this shot, in the order they were assigned.
    #[serde(default)]
    instruments: Vec<InstrumentId>,
    kind: ShotKind,
}

impl Shot {
    /// Create a director shot. Padding must be finite and non-negative.
    pub fn director(
        id: ShotId,
        name: impl Into<String>,
        description: impl Into<String>,
        interval: Interval,
        padding_before: f64,
        padding_after: f64,
    ) -> Result<Self> {
        Ok(Self {
            id,
            name: name.into(),
            description: description.into(),
            interval,
            collides_with: CollisionSet::new(),
            instruments: Vec::new(),
            kind: ShotKind::Director(DirectorShot {
                camera_shots: Vec::new(),
                padding_before: validate_padding(padding_before)?,
                padding_after: validate_padding(padding_after)?,
            }),
        })
    }

    /// Create an uncoupled camera shot for the given camera track.
    pub fn camera(
        id: ShotId,
        camera: usize,
        name: impl Into<String>,
        description: impl Into<String>,
        interval: Interval,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            interval,
            collides_with: CollisionSet::new(),
            instruments: Vec::new(),
            kind: ShotKind::Camera(CameraShot {
                camera,
                parent: None,
            }),
        }
    }

    pub fn kind(&self) -> &ShotKind {
        &self.kind
    }

    pub fn instruments(&self) -> &[InstrumentId] {
        &self.instruments
    }

    pub fn features(&self, instrument: InstrumentId) -> bool {
        self.instruments.contains(&instrument)
    }

    pub(crate) fn instruments_mut(&mut self) -> &mut Vec<InstrumentId> {
        &mut self.instruments
    }

    pub fn is_director(&self) -> bool {
        matches!(self.kind, ShotKind::Director(_))
    }

    pub fn is_camera(&self) -> bool {
        matches!(self.kind, ShotKind::Camera(_))
    }

    pub fn as_director(&self) -> Option<&DirectorShot> {
        match &self.kind {
            ShotKind::Director(director) => Some(director),
            ShotKind::Camera(_) => None,
        }
    }

    pub fn as_camera(&self) -> Option<&CameraShot> {
        match &self.kind {
            ShotKind::Camera(camera) => Some(camera),
            ShotKind::Director(_) => None,
        }
    }

    pub(crate) fn as_director_mut(&mut self) -> Option<&mut DirectorShot> {
        match &mut self.kind {
            ShotKind::Director(director) => Some(director),
            ShotKind::Camera(_) => None,
        }
    }

    pub(crate) fn as_camera_mut(&mut self) -> Option<&mut CameraShot> {
        match &mut self.kind {
            ShotKind::Camera(camera) => Some(camera),
            ShotKind::Director(_) => None,
        }
    }

    /// Replace the interval. Only the owning timeline may do this, since the
    /// sort position and collisions depend on it.
    pub(crate) fn set_interval(&mut self, interval: Interval) {
        self.interval = interval;
    }

    pub(crate) fn clear_collisions(&mut self) {
        self.collides_with.clear();
    }
}

impl Timed for Shot {
    fn interval(&self) -> Interval {
        self.interval
    }
}

impl Identified for Shot {
    fn id(&self) -> ShotId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl CollisionTracking for Shot {
    fn collides_with(&self) -> &[ShotId] {
        &self.collides_with
    }

    fn add_collision(&mut self, other: ShotId) -> bool {
        if self.collides_with.contains(&other) {
            return false;
        }
        self.collides_with.push(other);
        true
    }

    fn remove_collision(&mut self, other: ShotId) -> bool {
        match self.collides_with.iter().position(|&id| id == other) {
            Some(index) => {
                self.collides_with.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Reject negative or non-finite padding. It is never clamped.
pub fn validate_padding(padding: f64) -> Result<f64> {
    if padding.is_finite() && padding >= 0.0 {
        Ok(padding)
    } else {
        Err(ShotCallError::UnboundedPadding(padding))
    }
}
