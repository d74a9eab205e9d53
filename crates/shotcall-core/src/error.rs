//! Error types for ShotCall.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable instance number of a shot. Assigned once and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShotId(pub u32);

impl fmt::Display for ShotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable number of an instrument in the schedule's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(pub u32);

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instrument #{}", self.0)
    }
}

/// Main error type for ShotCall operations.
#[derive(Error, Debug)]
pub enum ShotCallError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid interval: begin {begin} is after end {end}")]
    InvalidInterval { begin: f64, end: f64 },

    #[error("Padding must be a non-negative count, got {0}")]
    UnboundedPadding(f64),

    #[error("Invalid count: {0:?}")]
    InvalidCount(String),

    #[error("Shot {shot} still references removed shot {dangling}")]
    OrphanCollisionReference { shot: ShotId, dangling: ShotId },

    #[error("Collision between {a} and {b} is only recorded on one side")]
    AsymmetricCollision { a: ShotId, b: ShotId },

    #[error("Camera shot {camera} and director shot {director} disagree about their coupling")]
    BrokenCoupling { director: ShotId, camera: ShotId },

    #[error("Timeline {0:?} is out of order")]
    UnsortedTimeline(String),

    #[error("Shot not found: {0}")]
    ShotNotFound(ShotId),

    #[error("Instrument not found: {0}")]
    InstrumentNotFound(InstrumentId),

    #[error("Shot {0} is not a director shot")]
    NotADirectorShot(ShotId),

    #[error("Shot {0} is not a camera shot")]
    NotACameraShot(ShotId),

    #[error("No ids left to allocate")]
    IdsExhausted,

    #[error("No camera track with index {0}")]
    NoSuchCamera(usize),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for ShotCall operations.
pub type Result<T> = std::result::Result<T, ShotCallError>;
