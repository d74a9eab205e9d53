//! Director/camera coupling and padding propagation.
//!
//! A coupled camera shot is placed at the director shot's interval widened by the
//! director's padding: `[director.begin - padding_before, director.end + padding_after]`.
//! Every coupled camera shot gets the same placement ("uniform shift"); there is no
//! special treatment for camera shots at the group's outer boundary.

use shotcall_core::{Interval, Result, ShotCallError, ShotId};
use tracing::debug;

use crate::event::{ScheduleEvent, TrackRef};
use crate::schedule::ShotSchedule;
use crate::shot::{validate_padding, DirectorShot, Shot, Timed};

impl ShotSchedule {
    /// Create a director shot plus one coupled camera shot on each selected camera track.
    ///
    /// Returns the director shot's id and the created camera shot ids, in `cameras` order.
    #[allow(clippy::too_many_arguments)]
    pub fn add_director_shot_with_cameras(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        begin: f64,
        end: f64,
        padding_before: f64,
        padding_after: f64,
        cameras: &[usize],
    ) -> Result<(ShotId, Vec<ShotId>)> {
        for &camera in cameras {
            self.check_camera(camera)?;
        }
        let placement = Interval::new(begin, end)?.padded(
            validate_padding(padding_before)?,
            validate_padding(padding_after)?,
        )?;
        self.check_ids_available(cameras.len() + 1)?;

        let name = name.into();
        let description = description.into();
        let (director, _) = self.add_shot(
            name.clone(),
            description.clone(),
            begin,
            end,
            padding_before,
            padding_after,
        )?;

        let mut camera_shots = Vec::with_capacity(cameras.len());
        for &camera in cameras {
            let (id, _) = self.add_camera_shot(
                camera,
                name.clone(),
                description.clone(),
                placement.begin(),
                placement.end(),
            )?;
            self.link(director, id);
            camera_shots.push(id);
        }
        debug!(shot = %director, cameras = camera_shots.len(), "Created director shot with cameras");
        Ok((director, camera_shots))
    }

    /// Couple a camera shot to a director shot and move it to the director's padded interval.
    ///
    /// A camera shot coupled elsewhere is taken away from its previous director first.
    /// Returns the shots colliding with the camera shot afterwards (ending with itself).
    pub fn couple(&mut self, director: ShotId, camera_shot: ShotId) -> Result<Vec<ShotId>> {
        let placement = self.padded_interval(self.director_data(director)?, director)?;
        let (track, previous) = self.camera_data(camera_shot)?;

        if let Some(previous) = previous.filter(|&previous| previous != director) {
            self.forget_camera_shot(previous, camera_shot);
        }
        self.link(director, camera_shot);
        Ok(self.apply_interval(camera_shot, track, placement))
    }

    /// Detach a camera shot from its director shot. Its interval is left where it is.
    pub fn decouple(&mut self, camera_shot: ShotId) -> Result<()> {
        let (_, parent) = self.camera_data(camera_shot)?;
        if let Some(parent) = parent {
            self.forget_camera_shot(parent, camera_shot);
            self.set_parent(camera_shot, None);
            debug!(shot = %camera_shot, director = %parent, "Decoupled camera shot");
        }
        Ok(())
    }

    /// Set a director shot's padding and re-place every coupled camera shot.
    ///
    /// Negative padding is rejected, never clamped. Returns the camera shots that were
    /// moved, in coupling order; their collision changes are reported as events.
    pub fn set_padding(&mut self, director: ShotId, before: f64, after: f64) -> Result<Vec<ShotId>> {
        let before = validate_padding(before)?;
        let after = validate_padding(after)?;
        self.director_data(director)?;

        let camera_shots = {
            let Some(data) = self
                .timeline_mut(TrackRef::Director)
                .get_mut(director)
                .and_then(Shot::as_director_mut)
            else {
                return Err(ShotCallError::NotADirectorShot(director));
            };
            data.padding_before = before;
            data.padding_after = after;
            data.camera_shots.clone()
        };
        self.notify_unchanged_placement(director, TrackRef::Director);

        let placement = self.padded_interval(self.director_data(director)?, director)?;
        for &camera_shot in &camera_shots {
            let track = self.locate(camera_shot)?;
            self.apply_interval(camera_shot, track, placement);
        }
        debug!(
            shot = %director,
            before,
            after,
            moved = camera_shots.len(),
            "Applied padding"
        );
        Ok(camera_shots)
    }

    /// Move a camera shot to another camera track (or the same one) at a new interval.
    ///
    /// Returns the shots colliding with it on its new track (ending with itself).
    pub fn move_camera_shot(
        &mut self,
        id: ShotId,
        camera: usize,
        begin: f64,
        end: f64,
    ) -> Result<Vec<ShotId>> {
        let (track, _) = self.camera_data(id)?;
        self.check_camera(camera)?;
        let interval = Interval::new(begin, end)?;

        let target = TrackRef::Camera(camera);
        if track == target {
            return Ok(self.apply_interval(id, track, interval));
        }

        let (mut shot, released) = self.timeline_mut(track).detach(id);
        shot.set_interval(interval);
        if let Some(data) = shot.as_camera_mut() {
            data.camera = camera;
        }
        let colliding = self.timeline_mut(target).insert(shot);
        self.relocate(id, target);
        debug!(shot = %id, from = ?track, to = ?target, "Moved camera shot between tracks");
        self.push_event(ScheduleEvent::ShotUpdated {
            shot: id,
            colliding: colliding.clone(),
            released,
        });
        Ok(colliding)
    }

    // ── Internals ───────────────────────────────────────────────

    fn director_data(&self, id: ShotId) -> Result<&DirectorShot> {
        let shot = self.shot(id).ok_or(ShotCallError::ShotNotFound(id))?;
        shot.as_director().ok_or(ShotCallError::NotADirectorShot(id))
    }

    /// Track and current parent of a camera shot.
    fn camera_data(&self, id: ShotId) -> Result<(TrackRef, Option<ShotId>)> {
        let track = self.locate(id)?;
        let shot = self.shot(id).ok_or(ShotCallError::ShotNotFound(id))?;
        let camera = shot.as_camera().ok_or(ShotCallError::NotACameraShot(id))?;
        Ok((track, camera.parent))
    }

    fn padded_interval(&self, data: &DirectorShot, director: ShotId) -> Result<Interval> {
        let shot = self.shot(director).ok_or(ShotCallError::ShotNotFound(director))?;
        shot.interval().padded(data.padding_before, data.padding_after)
    }

    /// Record the coupling on both ends.
    fn link(&mut self, director: ShotId, camera_shot: ShotId) {
        if let Some(data) = self
            .timeline_mut(TrackRef::Director)
            .get_mut(director)
            .and_then(Shot::as_director_mut)
        {
            if !data.camera_shots.contains(&camera_shot) {
                data.camera_shots.push(camera_shot);
            }
        }
        self.set_parent(camera_shot, Some(director));
    }
}
