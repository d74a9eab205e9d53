//! ShotCall Timeline - Shot scheduling model
//!
//! Implements the scheduling model behind the grid editor:
//! - Director and camera shots with incrementally maintained collisions
//! - Sorted timelines, one per track
//! - Padding propagation from director shots to coupled camera shots
//! - An instrument registry with per-shot membership
//! - Edit intents with validated commits and change notifications
//! - Versioned schedule files

pub mod command;
pub mod coupling;
pub mod event;
pub mod instrument;
pub mod schedule;
pub mod shot;
pub mod snapshot;
pub mod timeline;

pub use command::{CommitOutcome, ScheduleCommand, Subject};
pub use event::{ScheduleEvent, TrackRef};
pub use instrument::Instrument;
pub use schedule::ShotSchedule;
pub use shot::{
    CameraShot, CollisionSet, CollisionTracking, DirectorShot, Identified, Shot, ShotKind, Timed,
};
pub use snapshot::{ScheduleFile, TrackSnapshot, CURRENT_VERSION};
pub use timeline::{Recollision, Timeline, TrackKind};
