//! The shoot schedule: one director timeline plus one timeline per camera.
//!
//! This is the surface the editor layer talks to. Every operation validates its
//! input first and only then touches a timeline, so a rejected edit leaves the
//! model exactly as it was. Each mutation queues [`ScheduleEvent`]s.

use shotcall_core::{Interval, Result, ShotCallConfig, ShotCallError, ShotId};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::event::{ScheduleEvent, TrackRef};
use crate::instrument::Instrument;
use crate::shot::{validate_padding, Identified, Shot, ShotKind};
use crate::timeline::Timeline;

/// All timelines of a production plus the instrument registry, the id
/// allocators and the event queue.
#[derive(Debug)]
pub struct ShotSchedule {
    director: Timeline,
    cameras: Vec<Timeline>,
    locations: HashMap<ShotId, TrackRef>,
    next_id: u32,
    pub(crate) instruments: Vec<Instrument>,
    pub(crate) next_instrument_id: u32,
    cells_per_count: u32,
    events: Vec<ScheduleEvent>,
}

impl ShotSchedule {
    /// Create an empty schedule with one camera track per configured camera.
    pub fn new(config: &ShotCallConfig) -> Self {
        let mut schedule = Self {
            director: Timeline::new_director("Director"),
            cameras: Vec::new(),
            locations: HashMap::new(),
            next_id: 1,
            instruments: Vec::new(),
            next_instrument_id: 1,
            cells_per_count: config.grid.cells_per_count.max(1),
            events: Vec::new(),
        };
        for name in &config.cameras {
            schedule.add_camera_track(name.clone());
        }
        info!(
            cameras = schedule.cameras.len(),
            cells_per_count = schedule.cells_per_count,
            "Created shot schedule"
        );
        schedule
    }

    /// Grid rows per count, used to quantise committed text.
    pub fn cells_per_count(&self) -> u32 {
        self.cells_per_count
    }

    /// Append a camera track. Returns its index.
    pub fn add_camera_track(&mut self, name: impl Into<String>) -> usize {
        let timeline = Timeline::new_camera(name);
        debug!(track = %timeline.name, id = %timeline.id, "Added camera track");
        self.cameras.push(timeline);
        self.cameras.len() - 1
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    pub fn director_timeline(&self) -> &Timeline {
        &self.director
    }

    pub fn camera_timeline(&self, camera: usize) -> Option<&Timeline> {
        self.cameras.get(camera)
    }

    pub fn timeline(&self, track: TrackRef) -> Option<&Timeline> {
        match track {
            TrackRef::Director => Some(&self.director),
            TrackRef::Camera(camera) => self.cameras.get(camera),
        }
    }

    /// Look up a shot on any track.
    pub fn shot(&self, id: ShotId) -> Option<&Shot> {
        let track = self.locations.get(&id)?;
        self.timeline(*track)?.get(id)
    }

    /// Track a shot lives on.
    pub fn track_of(&self, id: ShotId) -> Option<TrackRef> {
        self.locations.get(&id).copied()
    }

    /// Total number of shots across all tracks.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Pending notifications, oldest first.
    pub fn events(&self) -> &[ScheduleEvent] {
        &self.events
    }

    /// Drain pending notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<ScheduleEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Creation ────────────────────────────────────────────────

    /// Create a director shot on the director track.
    ///
    /// Returns the new shot's id and the shots colliding with it (ending with itself).
    pub fn add_shot(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        begin: f64,
        end: f64,
        padding_before: f64,
        padding_after: f64,
    ) -> Result<(ShotId, Vec<ShotId>)> {
        let interval = Interval::new(begin, end)?;
        validate_padding(padding_before)?;
        validate_padding(padding_after)?;

        let id = self.allocate_id()?;
        let shot = Shot::director(
            id,
            name,
            description,
            interval,
            padding_before,
            padding_after,
        )?;
        let colliding = self.place(shot, TrackRef::Director);
        Ok((id, colliding))
    }

    /// Create an uncoupled camera shot on the given camera track.
    pub fn add_camera_shot(
        &mut self,
        camera: usize,
        name: impl Into<String>,
        description: impl Into<String>,
        begin: f64,
        end: f64,
    ) -> Result<(ShotId, Vec<ShotId>)> {
        self.check_camera(camera)?;
        let interval = Interval::new(begin, end)?;

        let id = self.allocate_id()?;
        let shot = Shot::camera(id, camera, name, description, interval);
        let colliding = self.place(shot, TrackRef::Camera(camera));
        Ok((id, colliding))
    }

    // ── Edits ───────────────────────────────────────────────────

    /// Move or resize a shot. Returns the shots colliding with it afterwards (ending with itself).
    pub fn update_interval(&mut self, id: ShotId, begin: f64, end: f64) -> Result<Vec<ShotId>> {
        let track = self.locate(id)?;
        let interval = Interval::new(begin, end)?;
        Ok(self.apply_interval(id, track, interval))
    }

    /// Rename a shot.
    pub fn set_name(&mut self, id: ShotId, name: impl Into<String>) -> Result<()> {
        let track = self.locate(id)?;
        if let Some(shot) = self.timeline_mut(track).get_mut(id) {
            shot.name = name.into();
        }
        self.notify_unchanged_placement(id, track);
        Ok(())
    }

    /// Replace a shot's description.
    pub fn set_description(&mut self, id: ShotId, description: impl Into<String>) -> Result<()> {
        let track = self.locate(id)?;
        if let Some(shot) = self.timeline_mut(track).get_mut(id) {
            shot.description = description.into();
        }
        self.notify_unchanged_placement(id, track);
        Ok(())
    }

    /// Delete a shot, cleaning every collision and coupling that referenced it.
    ///
    /// Removing a director shot decouples its camera shots; they stay on their tracks.
    pub fn remove_shot(&mut self, id: ShotId) -> Result<Shot> {
        let track = self.locate(id)?;

        match self.shot(id).map(|shot| shot.kind().clone()) {
            Some(ShotKind::Director(director)) => {
                for camera_shot in director.camera_shots {
                    self.set_parent(camera_shot, None);
                }
            }
            Some(ShotKind::Camera(camera)) => {
                if let Some(parent) = camera.parent {
                    self.forget_camera_shot(parent, id);
                }
            }
            None => {}
        }

        let (shot, released) = self.timeline_mut(track).detach(id);
        self.locations.remove(&id);
        debug!(shot = %id, ?track, "Removed shot");
        self.events
            .push(ScheduleEvent::ShotRemoved { shot: id, released });
        Ok(shot)
    }

    /// Shots colliding with `id` (ending with `id` itself), from the maintained collision sets.
    pub fn query_overlaps(&self, id: ShotId) -> Result<Vec<ShotId>> {
        let track = self.locate(id)?;
        self.timeline(track)
            .map(|timeline| timeline.query_overlaps(id))
            .ok_or(ShotCallError::ShotNotFound(id))
    }

    /// Remove every shot from every track.
    pub fn clear(&mut self) {
        let mut removed = self.director.clear();
        for camera in &mut self.cameras {
            removed.extend(camera.clear());
        }
        self.locations.clear();
        for shot in removed {
            self.events.push(ScheduleEvent::ShotRemoved {
                shot: shot.id(),
                released: Vec::new(),
            });
        }
    }

    /// Verify every structural invariant: sorted tracks, symmetric collisions without
    /// orphans, a location for every shot, each shot on a track of its kind,
    /// agreement between both ends of each coupling, and registered instruments only.
    pub fn check_invariants(&self) -> Result<()> {
        for timeline in std::iter::once(&self.director).chain(self.cameras.iter()) {
            if !timeline.is_sorted() {
                return Err(ShotCallError::UnsortedTimeline(timeline.name.clone()));
            }
            timeline.check_collisions()?;
            for shot in timeline.iter() {
                if let Some(&missing) = shot
                    .instruments()
                    .iter()
                    .find(|&&instrument| self.instrument(instrument).is_none())
                {
                    return Err(ShotCallError::InstrumentNotFound(missing));
                }
            }
        }

        for (&id, &track) in &self.locations {
            if !self.timeline(track).is_some_and(|timeline| timeline.contains(id)) {
                return Err(ShotCallError::ShotNotFound(id));
            }
        }
        let on_tracks = self.director.len() + self.cameras.iter().map(Timeline::len).sum::<usize>();
        if on_tracks != self.locations.len() {
            let unlocated = std::iter::once(&self.director)
                .chain(self.cameras.iter())
                .flat_map(|timeline| timeline.ids().iter().copied())
                .find(|id| !self.locations.contains_key(id));
            if let Some(id) = unlocated {
                return Err(ShotCallError::ShotNotFound(id));
            }
        }

        for shot in self.director.iter() {
            let Some(director) = shot.as_director() else {
                return Err(ShotCallError::NotADirectorShot(shot.id()));
            };
            for &camera in &director.camera_shots {
                let coupled = self
                    .shot(camera)
                    .and_then(Shot::as_camera)
                    .is_some_and(|c| c.parent == Some(shot.id()));
                if !coupled {
                    return Err(ShotCallError::BrokenCoupling {
                        director: shot.id(),
                        camera,
                    });
                }
            }
        }
        for (index, timeline) in self.cameras.iter().enumerate() {
            for shot in timeline.iter() {
                let Some(camera) = shot.as_camera() else {
                    return Err(ShotCallError::NotACameraShot(shot.id()));
                };
                if camera.camera != index {
                    return Err(ShotCallError::NoSuchCamera(camera.camera));
                }
                if let Some(parent) = camera.parent {
                    let listed = self
                        .shot(parent)
                        .and_then(Shot::as_director)
                        .is_some_and(|d| d.camera_shots.contains(&shot.id()));
                    if !listed {
                        return Err(ShotCallError::BrokenCoupling {
                            director: parent,
                            camera: shot.id(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────

    fn allocate_id(&mut self) -> Result<ShotId> {
        let id = ShotId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(ShotCallError::IdsExhausted)?;
        Ok(id)
    }

    /// Fail unless `count` more ids can be handed out.
    pub(crate) fn check_ids_available(&self, count: usize) -> Result<()> {
        u32::try_from(count)
            .ok()
            .and_then(|count| self.next_id.checked_add(count))
            .map(drop)
            .ok_or(ShotCallError::IdsExhausted)
    }

    pub(crate) fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Make sure `id` is never handed out again.
    pub(crate) fn reserve_id(&mut self, id: ShotId) -> Result<()> {
        let next = id.0.checked_add(1).ok_or(ShotCallError::IdsExhausted)?;
        self.next_id = self.next_id.max(next);
        Ok(())
    }

    pub(crate) fn locate(&self, id: ShotId) -> Result<TrackRef> {
        self.locations
            .get(&id)
            .copied()
            .ok_or(ShotCallError::ShotNotFound(id))
    }

    pub(crate) fn relocate(&mut self, id: ShotId, track: TrackRef) {
        self.locations.insert(id, track);
    }

    pub(crate) fn push_event(&mut self, event: ScheduleEvent) {
        self.events.push(event);
    }

    pub(crate) fn check_camera(&self, camera: usize) -> Result<()> {
        if camera < self.cameras.len() {
            Ok(())
        } else {
            Err(ShotCallError::NoSuchCamera(camera))
        }
    }

    /// # Panics
    ///
    /// If `track` names a camera that does not exist. Locations only ever hold valid tracks.
    pub(crate) fn timeline_mut(&mut self, track: TrackRef) -> &mut Timeline {
        match track {
            TrackRef::Director => &mut self.director,
            TrackRef::Camera(camera) => &mut self.cameras[camera],
        }
    }

    /// Insert a new shot on a track and announce it.
    pub(crate) fn place(&mut self, shot: Shot, track: TrackRef) -> Vec<ShotId> {
        let id = shot.id();
        let colliding = self.timeline_mut(track).insert(shot);
        self.locations.insert(id, track);
        self.events.push(ScheduleEvent::ShotAdded {
            shot: id,
            track,
            colliding: colliding.clone(),
        });
        colliding
    }

    /// Re-place a shot at a validated interval and announce it.
    pub(crate) fn apply_interval(
        &mut self,
        id: ShotId,
        track: TrackRef,
        interval: Interval,
    ) -> Vec<ShotId> {
        let outcome = self.timeline_mut(track).update_interval(id, interval);
        debug!(shot = %id, %interval, released = outcome.released.len(), "Updated interval");
        self.events.push(ScheduleEvent::ShotUpdated {
            shot: id,
            colliding: outcome.colliding.clone(),
            released: outcome.released,
        });
        outcome.colliding
    }

    /// Announce a change that did not move the shot.
    pub(crate) fn notify_unchanged_placement(&mut self, id: ShotId, track: TrackRef) {
        let colliding = self.timeline_mut(track).query_overlaps(id);
        self.events.push(ScheduleEvent::ShotUpdated {
            shot: id,
            colliding,
            released: Vec::new(),
        });
    }

    pub(crate) fn set_parent(&mut self, camera_shot: ShotId, parent: Option<ShotId>) {
        let Some(track) = self.locations.get(&camera_shot).copied() else {
            return;
        };
        if let Some(camera) = self
            .timeline_mut(track)
            .get_mut(camera_shot)
            .and_then(Shot::as_camera_mut)
        {
            camera.parent = parent;
        }
        self.notify_unchanged_placement(camera_shot, track);
    }

    pub(crate) fn forget_camera_shot(&mut self, director: ShotId, camera_shot: ShotId) {
        if let Some(director) = self
            .director
            .get_mut(director)
            .and_then(Shot::as_director_mut)
        {
            director.camera_shots.retain(|&id| id != camera_shot);
        }
    }
}

impl Default for ShotSchedule {
    fn default() -> Self {
        Self::new(&ShotCallConfig::default())
    }
}
