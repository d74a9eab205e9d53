//! Drag and resize of shot blocks on a grid.
//!
//! A gesture runs `Idle -> Pressed -> Dragging -> Idle`. While dragging, the engine
//! keeps a free-floating block following the pointer and a snapped feedback
//! placement for highlighting. Only [`GridSyncEngine::release`] produces something
//! the model acts on.

use serde::{Deserialize, Serialize};
use shotcall_core::{Rect, Result, ShotId, Vec2};
use shotcall_timeline::{ShotSchedule, Timed, TrackRef};
use tracing::debug;

use crate::layout::{GridGeometry, GridPlacement};

/// What a press on a block will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Move,
    ResizeTop,
    ResizeBottom,
}

/// Which grid the engine drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridMode {
    /// Single-column director grid. Moves are vertical only.
    Director,
    /// One column per camera. Moves may change column.
    Camera,
}

/// Classify a press from its position relative to the block's top-left corner.
///
/// The top margin wins over every other edge. The left and right margins are
/// grab zones for moving, not resizing.
pub fn classify_edge(local: Vec2, size: Vec2, margin: f64) -> DragKind {
    if local.y < margin {
        DragKind::ResizeTop
    } else if local.x > size.x - margin {
        DragKind::Move
    } else if local.y > size.y - margin {
        DragKind::ResizeBottom
    } else {
        DragKind::Move
    }
}

/// State of an active gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub shot: ShotId,
    pub kind: DragKind,
    /// Pointer position relative to the block's top-left corner at press time.
    pub grab_offset: Vec2,
    /// Scene y of the edge a resize keeps fixed: the bottom for `ResizeTop`,
    /// the top otherwise.
    pub starting_y: f64,
    /// Free-floating block following the pointer.
    pub block: Rect,
    /// Snapped preview placement. Never committed until release.
    pub feedback: GridPlacement,
    /// Placement of the block when it was pressed.
    pub origin: GridPlacement,
}

/// Gesture phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragPhase {
    #[default]
    Idle,
    Pressed(DragSession),
    Dragging(DragSession),
}

/// Final placement of a released drag, in model units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragCommit {
    pub shot: ShotId,
    pub kind: DragKind,
    pub track: TrackRef,
    pub placement: GridPlacement,
    pub begin: f64,
    pub end: f64,
}

impl DragCommit {
    /// Write the new interval into the schedule, moving camera shots between
    /// tracks when the column changed. Returns the shots colliding afterwards.
    pub fn apply(&self, schedule: &mut ShotSchedule) -> Result<Vec<ShotId>> {
        match self.track {
            TrackRef::Director => schedule.update_interval(self.shot, self.begin, self.end),
            TrackRef::Camera(camera) => {
                schedule.move_camera_shot(self.shot, camera, self.begin, self.end)
            }
        }
    }
}

/// Keeps grid blocks and the model in sync through press/drag/release gestures.
#[derive(Debug, Clone)]
pub struct GridSyncEngine {
    geometry: GridGeometry,
    mode: GridMode,
    phase: DragPhase,
}

impl GridSyncEngine {
    pub fn new(geometry: GridGeometry, mode: GridMode) -> Self {
        Self {
            geometry,
            mode,
            phase: DragPhase::Idle,
        }
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    /// The snapped preview placement of the gesture in progress.
    pub fn feedback(&self) -> Option<GridPlacement> {
        match &self.phase {
            DragPhase::Idle => None,
            DragPhase::Pressed(session) | DragPhase::Dragging(session) => Some(session.feedback),
        }
    }

    /// Grid placement of a shot currently in the schedule.
    pub fn placement_of(&self, schedule: &ShotSchedule, shot: ShotId) -> Option<GridPlacement> {
        let column = match schedule.track_of(shot)? {
            TrackRef::Director => 0,
            TrackRef::Camera(camera) => camera,
        };
        let interval = schedule.shot(shot)?.interval();
        Some(GridPlacement::for_interval(
            interval,
            column,
            self.geometry.config.cells_per_count,
        ))
    }

    /// Pointer went down on a placed block.
    ///
    /// Any gesture still in progress is dropped.
    pub fn press(&mut self, shot: ShotId, placement: GridPlacement, pointer: Vec2) -> DragKind {
        let block = self.geometry.placement_rect(placement);
        let grab_offset = block.to_local(pointer);
        let kind = classify_edge(grab_offset, block.size(), self.geometry.config.edge_margin);
        let starting_y = match kind {
            DragKind::ResizeTop => block.bottom(),
            DragKind::ResizeBottom | DragKind::Move => block.top(),
        };

        debug!(shot = %shot, ?kind, row = placement.row, column = placement.column, "Pressed block");
        self.phase = DragPhase::Pressed(DragSession {
            shot,
            kind,
            grab_offset,
            starting_y,
            block,
            feedback: placement,
            origin: placement,
        });
        kind
    }

    /// Pointer moved with the button held. Returns the updated preview placement.
    pub fn drag(&mut self, pointer: Vec2) -> Option<GridPlacement> {
        let mut session = match std::mem::take(&mut self.phase) {
            DragPhase::Idle => return None,
            DragPhase::Pressed(session) | DragPhase::Dragging(session) => session,
        };
        self.follow(&mut session, pointer);
        self.snap(&mut session, pointer);
        let feedback = session.feedback;
        self.phase = DragPhase::Dragging(session);
        Some(feedback)
    }

    /// Pointer went up. Returns the placement to commit, if the block was dragged
    /// somewhere other than where it started.
    pub fn release(&mut self, pointer: Vec2) -> Option<DragCommit> {
        match std::mem::take(&mut self.phase) {
            DragPhase::Idle => None,
            DragPhase::Pressed(session) => {
                debug!(shot = %session.shot, "Released without dragging");
                None
            }
            DragPhase::Dragging(mut session) => {
                self.follow(&mut session, pointer);
                self.snap(&mut session, pointer);

                let cells = self.geometry.config.cells_per_count;
                let placement = session.feedback;
                if placement == session.origin {
                    debug!(shot = %session.shot, "Released on the original placement");
                    return None;
                }
                let track = match self.mode {
                    GridMode::Director => TrackRef::Director,
                    GridMode::Camera => TrackRef::Camera(placement.column),
                };
                let commit = DragCommit {
                    shot: session.shot,
                    kind: session.kind,
                    track,
                    placement,
                    begin: placement.begin_count(cells),
                    end: placement.end_count(cells),
                };
                debug!(
                    shot = %commit.shot,
                    begin = commit.begin,
                    end = commit.end,
                    ?track,
                    "Released block"
                );
                Some(commit)
            }
        }
    }

    /// Move or stretch the floating block under the pointer.
    fn follow(&self, session: &mut DragSession, pointer: Vec2) {
        let row_height = self.geometry.config.vertical_element_size;
        let mut y = pointer.y;
        if matches!(session.kind, DragKind::ResizeTop | DragKind::ResizeBottom) {
            y = y.max(self.geometry.origin.y);
        }

        let (top, height) = match session.kind {
            DragKind::ResizeTop => {
                let height = session.starting_y - y;
                if height < row_height {
                    (session.starting_y - row_height, row_height)
                } else {
                    (y, height)
                }
            }
            DragKind::ResizeBottom => (session.starting_y, (y - session.starting_y).max(row_height)),
            DragKind::Move => (y - session.grab_offset.y, session.block.height),
        };
        session.block.y = top;
        session.block.height = height;
        if session.kind == DragKind::Move && self.mode == GridMode::Camera {
            session.block.x = pointer.x - session.grab_offset.x;
        }
    }

    /// Snap the feedback placement to the grid cell under the floating block.
    ///
    /// Leaves the feedback unchanged while the lookup point is off the grid.
    fn snap(&self, session: &mut DragSession, pointer: Vec2) {
        let config = &self.geometry.config;
        let lookup_y = match session.kind {
            DragKind::Move => pointer.y - session.grab_offset.y,
            // The block top, which is the pointer unless the height floor kicked in.
            DragKind::ResizeTop => session.block.top(),
            DragKind::ResizeBottom => pointer.y.max(self.geometry.origin.y),
        };
        let lookup = Vec2::new(session.block.center().x, lookup_y);
        let Some(cell) = self.geometry.cell_at(lookup) else {
            return;
        };

        let height = session.block.height;
        let mut span = (height / config.vertical_element_size).round();
        if cell.bottom_half && session.kind == DragKind::ResizeTop {
            span = ((height - config.edge_margin) / config.vertical_element_size).round();
        }

        let row = match session.kind {
            DragKind::Move | DragKind::ResizeTop if cell.bottom_half => cell.row + 1,
            DragKind::Move | DragKind::ResizeTop => cell.row,
            DragKind::ResizeBottom => session.feedback.row,
        };

        session.feedback = GridPlacement {
            column: cell.column,
            row,
            row_span: span.max(1.0) as u32,
        };
    }
}
