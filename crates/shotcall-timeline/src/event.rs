//! Change notifications for the presentation layer.

use serde::{Deserialize, Serialize};
use shotcall_core::{InstrumentId, ShotId};

/// Which timeline a shot lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackRef {
    Director,
    Camera(usize),
}

/// A change the presentation layer must render.
///
/// Events are queued in the order operations run and drained with
/// [`ShotSchedule::take_events`](crate::ShotSchedule::take_events).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScheduleEvent {
    /// A shot was created. `colliding` ends with `shot` itself.
    ShotAdded {
        shot: ShotId,
        track: TrackRef,
        colliding: Vec<ShotId>,
    },
    /// A shot's interval, labels, coupling, instruments or track changed. `colliding` ends with
    /// `shot` itself; `released` lists shots that stopped colliding with it.
    ShotUpdated {
        shot: ShotId,
        colliding: Vec<ShotId>,
        released: Vec<ShotId>,
    },
    /// A shot was deleted. `released` lists its former collision peers.
    ShotRemoved { shot: ShotId, released: Vec<ShotId> },
    /// An instrument joined the registry.
    InstrumentAdded { instrument: InstrumentId },
    /// An instrument was renamed or redescribed. `shots` feature it and show its name.
    InstrumentUpdated {
        instrument: InstrumentId,
        shots: Vec<ShotId>,
    },
    /// An instrument left the registry and was taken off `shots`.
    InstrumentRemoved {
        instrument: InstrumentId,
        shots: Vec<ShotId>,
    },
}

impl ScheduleEvent {
    /// The shot this event is about. `None` for registry events.
    pub fn shot(&self) -> Option<ShotId> {
        match self {
            Self::ShotAdded { shot, .. }
            | Self::ShotUpdated { shot, .. }
            | Self::ShotRemoved { shot, .. } => Some(*shot),
            Self::InstrumentAdded { .. }
            | Self::InstrumentUpdated { .. }
            | Self::InstrumentRemoved { .. } => None,
        }
    }
}
