//! A single track of shots kept in count order.
//!
//! The timeline owns its shots in a flat table keyed by [`ShotId`] and keeps a
//! separate sorted order. Collisions are recomputed incrementally on every
//! insert or interval change, against every shot on the track.

use serde::{Deserialize, Serialize};
use shotcall_core::{Interval, Result, ShotCallError, ShotId};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::shot::{CollisionTracking, Identified, Shot, Timed};

/// Kind of timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackKind {
    Director,
    Camera,
}

/// Result of re-placing a shot: what collides with it now, and what stopped colliding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recollision {
    /// Shots now colliding with the moved shot, in timeline order, with the moved shot last.
    pub colliding: Vec<ShotId>,
    /// Shots that collided before the move and no longer do.
    pub released: Vec<ShotId>,
}

/// A track containing shots sorted by `(begin, end)`.
#[derive(Debug, Clone)]
pub struct Timeline {
    /// Unique track ID
    pub id: Uuid,
    /// Track name
    pub name: String,
    /// Track kind
    pub kind: TrackKind,
    shots: HashMap<ShotId, Shot>,
    order: Vec<ShotId>,
}

impl Timeline {
    /// Create a new director track.
    pub fn new_director(name: impl Into<String>) -> Self {
        Self::new(name, TrackKind::Director)
    }

    /// Create a new camera track.
    pub fn new_camera(name: impl Into<String>) -> Self {
        Self::new(name, TrackKind::Camera)
    }

    fn new(name: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            shots: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Number of shots on this track.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: ShotId) -> bool {
        self.shots.contains_key(&id)
    }

    pub fn get(&self, id: ShotId) -> Option<&Shot> {
        self.shots.get(&id)
    }

    /// Mutable access for label edits. Intervals go through [`Timeline::update_interval`].
    pub(crate) fn get_mut(&mut self, id: ShotId) -> Option<&mut Shot> {
        self.shots.get_mut(&id)
    }

    /// Shot ids in timeline order.
    pub fn ids(&self) -> &[ShotId] {
        &self.order
    }

    /// Shots in timeline order.
    pub fn iter(&self) -> impl Iterator<Item = &Shot> + '_ {
        self.order.iter().map(move |id| &self.shots[id])
    }

    /// Position of a shot in timeline order.
    pub fn position(&self, id: ShotId) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }

    /// Insert a shot in sorted position and recompute its collisions.
    ///
    /// The shot goes immediately before the first existing shot it does not sort
    /// after, so among identical intervals the newest comes first. Every existing
    /// shot is checked for overlap, not only the neighbours.
    ///
    /// Returns the shots colliding with the new one in timeline order, with the
    /// new shot appended last.
    ///
    /// # Panics
    ///
    /// If a shot with the same id is already on this track.
    pub fn insert(&mut self, shot: Shot) -> Vec<ShotId> {
        let id = shot.id();
        let interval = shot.interval();
        assert!(
            !self.contains(id),
            "shot {id} is already on timeline {:?}",
            self.name
        );
        self.shots.insert(id, shot);

        let existing = self.order.clone();
        let mut position = None;
        let mut colliding = Vec::new();
        for (index, &other) in existing.iter().enumerate() {
            if position.is_none() && interval.compare(self.shot(other).interval()) != Ordering::Greater
            {
                position = Some(index);
            }
            if self.recompute_collision(id, other, 0.0) {
                colliding.push(other);
            }
        }

        match position {
            Some(index) => self.order.insert(index, id),
            None => self.order.push(id),
        }

        debug!(
            shot = %id,
            %interval,
            position = position.unwrap_or(existing.len()),
            collisions = colliding.len(),
            track = %self.name,
            "Inserted shot"
        );

        colliding.push(id);
        colliding
    }

    /// Recompute whether `a` and `b` collide and record the result on both shots.
    ///
    /// `movement_offset` shifts `b` earlier before testing, for previewing a
    /// hypothetical position. Returns the new overlap state.
    ///
    /// # Panics
    ///
    /// If either shot is not on this track.
    pub fn recompute_collision(&mut self, a: ShotId, b: ShotId, movement_offset: f64) -> bool {
        if a == b {
            return false;
        }
        let overlapping = self
            .shot(a)
            .interval()
            .overlaps(self.shot(b).interval(), movement_offset);

        if overlapping {
            self.shot_mut(a).add_collision(b);
            self.shot_mut(b).add_collision(a);
        } else {
            self.shot_mut(a).remove_collision(b);
            self.shot_mut(b).remove_collision(a);
        }
        overlapping
    }

    /// Give a shot a new interval, re-sorting and recolliding it.
    ///
    /// At this level a move is a removal followed by a re-insert at the new interval.
    ///
    /// # Panics
    ///
    /// If the shot is not on this track.
    pub fn update_interval(&mut self, id: ShotId, interval: Interval) -> Recollision {
        let before: Vec<ShotId> = self.shot(id).collides_with().to_vec();
        let mut shot = self.remove(id);
        shot.set_interval(interval);
        let colliding = self.insert(shot);

        let released = before
            .into_iter()
            .filter(|other| !colliding.contains(other))
            .collect();
        Recollision {
            colliding,
            released,
        }
    }

    /// Remove a shot from the sequence and return it.
    ///
    /// Peers still list the removed shot in their collision sets afterwards. A hard
    /// delete must follow up with [`Timeline::release_collisions`], or use
    /// [`Timeline::detach`], which does both.
    ///
    /// # Panics
    ///
    /// If the shot is not on this track.
    pub fn remove(&mut self, id: ShotId) -> Shot {
        let shot = self
            .shots
            .remove(&id)
            .unwrap_or_else(|| panic!("shot {id} is not on timeline {:?}", self.name));
        self.order.retain(|&other| other != id);
        shot
    }

    /// Drop a removed shot from every peer's collision set. Returns the peers touched.
    pub fn release_collisions(&mut self, removed: &Shot) -> Vec<ShotId> {
        let removed_id = removed.id();
        let mut released = Vec::new();
        for &peer in removed.collides_with() {
            if let Some(other) = self.shots.get_mut(&peer) {
                if other.remove_collision(removed_id) {
                    released.push(peer);
                }
            }
        }
        released
    }

    /// Remove a shot and clean up every collision that referenced it.
    ///
    /// Returns the shot with an empty collision set, plus the peers it used to collide with.
    pub fn detach(&mut self, id: ShotId) -> (Shot, Vec<ShotId>) {
        let mut shot = self.remove(id);
        let released = self.release_collisions(&shot);
        shot.clear_collisions();
        debug!(shot = %id, released = released.len(), track = %self.name, "Detached shot");
        (shot, released)
    }

    /// Every shot currently colliding with `id`, in timeline order, plus `id` itself last.
    ///
    /// Reads the incrementally maintained collision sets; nothing is recomputed.
    ///
    /// # Panics
    ///
    /// If the shot is not on this track.
    pub fn query_overlaps(&self, id: ShotId) -> Vec<ShotId> {
        let shot = self.shot(id);
        let mut result: Vec<ShotId> = self
            .order
            .iter()
            .copied()
            .filter(|other| shot.collides_with().contains(other))
            .collect();
        result.push(id);
        result
    }

    /// Remove every shot. Returns them in their former timeline order.
    pub fn clear(&mut self) -> Vec<Shot> {
        let ids = std::mem::take(&mut self.order);
        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(mut shot) = self.shots.remove(&id) {
                shot.clear_collisions();
                removed.push(shot);
            }
        }
        removed
    }

    /// Check that the order is sorted by `(begin, end)`.
    pub fn is_sorted(&self) -> bool {
        self.order.windows(2).all(|pair| {
            self.shot(pair[0]).compare_to(self.shot(pair[1])) != Ordering::Greater
        })
    }

    /// Verify the collision relation: every entry names a shot on this track and is
    /// recorded on both sides.
    pub fn check_collisions(&self) -> Result<()> {
        for id in &self.order {
            let shot = self.shot(*id);
            for &other in shot.collides_with() {
                let peer = self
                    .shots
                    .get(&other)
                    .ok_or(ShotCallError::OrphanCollisionReference {
                        shot: *id,
                        dangling: other,
                    })?;
                if !peer.collides_with().contains(id) {
                    return Err(ShotCallError::AsymmetricCollision { a: *id, b: other });
                }
            }
        }
        Ok(())
    }

    fn shot(&self, id: ShotId) -> &Shot {
        self.shots
            .get(&id)
            .unwrap_or_else(|| panic!("shot {id} is not on timeline {:?}", self.name))
    }

    fn shot_mut(&mut self, id: ShotId) -> &mut Shot {
        let name = &self.name;
        self.shots
            .get_mut(&id)
            .unwrap_or_else(|| panic!("shot {id} is not on timeline {name:?}"))
    }
}
