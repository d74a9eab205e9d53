//! Instruments and the shots that feature them.
//!
//! The registry lives on the schedule in creation order. Shots only hold
//! [`InstrumentId`]s, so editing an instrument never touches a shot.

use serde::{Deserialize, Serialize};
use shotcall_core::{InstrumentId, Result, ShotCallError, ShotId};
use tracing::debug;

use crate::event::{ScheduleEvent, TrackRef};
use crate::schedule::ShotSchedule;
use crate::shot::Identified;

/// Something on stage a shot can feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    id: InstrumentId,
    /// Name shown on every block that features it
    pub name: String,
    pub description: String,
}

impl Instrument {
    pub fn new(id: InstrumentId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn id(&self) -> InstrumentId {
        self.id
    }
}

impl ShotSchedule {
    /// Registered instruments, oldest first.
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn instrument(&self, id: InstrumentId) -> Option<&Instrument> {
        self.instruments.iter().find(|instrument| instrument.id == id)
    }

    /// Register a new instrument.
    pub fn add_instrument(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<InstrumentId> {
        let id = InstrumentId(self.next_instrument_id);
        self.next_instrument_id = self
            .next_instrument_id
            .checked_add(1)
            .ok_or(ShotCallError::IdsExhausted)?;
        let instrument = Instrument::new(id, name, description);
        debug!(%id, name = %instrument.name, "Added instrument");
        self.instruments.push(instrument);
        self.push_event(ScheduleEvent::InstrumentAdded { instrument: id });
        Ok(id)
    }

    /// Replace an instrument's name and description.
    pub fn edit_instrument(
        &mut self,
        id: InstrumentId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        let shots = self.shots_featuring(id);
        let instrument = self.instrument_mut(id)?;
        instrument.name = name.into();
        instrument.description = description.into();
        self.push_event(ScheduleEvent::InstrumentUpdated {
            instrument: id,
            shots,
        });
        Ok(())
    }

    /// Delete an instrument and take it off every shot that featured it.
    pub fn remove_instrument(&mut self, id: InstrumentId) -> Result<Instrument> {
        let index = self
            .instruments
            .iter()
            .position(|instrument| instrument.id == id)
            .ok_or(ShotCallError::InstrumentNotFound(id))?;

        let shots = self.shots_featuring(id);
        for &shot in &shots {
            let track = self.locate(shot)?;
            self.unassign(shot, track, id);
        }
        let instrument = self.instruments.remove(index);
        debug!(%id, shots = shots.len(), "Removed instrument");
        self.push_event(ScheduleEvent::InstrumentRemoved {
            instrument: id,
            shots,
        });
        Ok(instrument)
    }

    /// Feature an instrument in a shot. Returns `false` if the shot already featured it.
    pub fn add_instrument_to_shot(&mut self, shot: ShotId, instrument: InstrumentId) -> Result<bool> {
        let track = self.locate(shot)?;
        self.check_instrument(instrument)?;
        let added = match self.timeline_mut(track).get_mut(shot) {
            Some(target) if !target.features(instrument) => {
                target.instruments_mut().push(instrument);
                true
            }
            _ => false,
        };
        if added {
            self.notify_unchanged_placement(shot, track);
        }
        Ok(added)
    }

    /// Stop featuring an instrument in a shot. Returns `false` if it was not featured.
    pub fn remove_instrument_from_shot(
        &mut self,
        shot: ShotId,
        instrument: InstrumentId,
    ) -> Result<bool> {
        let track = self.locate(shot)?;
        self.check_instrument(instrument)?;
        Ok(self.unassign(shot, track, instrument))
    }

    /// Replace the instruments a shot features. Repeated ids keep their first position.
    ///
    /// Every id is checked before the shot changes. Notifies only when the list differs.
    pub fn set_shot_instruments(&mut self, shot: ShotId, instruments: &[InstrumentId]) -> Result<()> {
        let track = self.locate(shot)?;
        let mut wanted = Vec::with_capacity(instruments.len());
        for &instrument in instruments {
            self.check_instrument(instrument)?;
            if !wanted.contains(&instrument) {
                wanted.push(instrument);
            }
        }

        let changed = match self.timeline_mut(track).get_mut(shot) {
            Some(target) if target.instruments() != wanted.as_slice() => {
                *target.instruments_mut() = wanted;
                true
            }
            _ => false,
        };
        if changed {
            self.notify_unchanged_placement(shot, track);
        }
        Ok(())
    }

    /// Shots featuring an instrument: the director track first, then each camera
    /// track, each in timeline order.
    pub fn shots_featuring(&self, instrument: InstrumentId) -> Vec<ShotId> {
        std::iter::once(self.director_timeline())
            .chain((0..self.camera_count()).filter_map(|camera| self.camera_timeline(camera)))
            .flat_map(|timeline| timeline.iter())
            .filter(|shot| shot.features(instrument))
            .map(|shot| shot.id())
            .collect()
    }

    pub(crate) fn check_instrument(&self, id: InstrumentId) -> Result<()> {
        self.instrument(id)
            .map(drop)
            .ok_or(ShotCallError::InstrumentNotFound(id))
    }

    /// Put a saved instrument back under its own id.
    pub(crate) fn restore_instrument(&mut self, instrument: Instrument) -> Result<()> {
        let id = instrument.id;
        if self.instrument(id).is_some() {
            return Err(ShotCallError::Serialization(format!(
                "{id} appears twice in the schedule file"
            )));
        }
        let next = id.0.checked_add(1).ok_or_else(|| {
            ShotCallError::Serialization(format!("{id} is out of range"))
        })?;
        self.next_instrument_id = self.next_instrument_id.max(next);
        self.instruments.push(instrument);
        Ok(())
    }

    fn instrument_mut(&mut self, id: InstrumentId) -> Result<&mut Instrument> {
        self.instruments
            .iter_mut()
            .find(|instrument| instrument.id == id)
            .ok_or(ShotCallError::InstrumentNotFound(id))
    }

    fn unassign(&mut self, shot: ShotId, track: TrackRef, instrument: InstrumentId) -> bool {
        let removed = match self.timeline_mut(track).get_mut(shot) {
            Some(target) if target.features(instrument) => {
                target.instruments_mut().retain(|&other| other != instrument);
                true
            }
            _ => false,
        };
        if removed {
            self.notify_unchanged_placement(shot, track);
        }
        removed
    }
}
