//! Integration tests for grid gestures committing into a schedule.
//!
//! Exercises shotcall-grid driving shotcall-timeline.

use shotcall_core::{GridConfig, ShotId, Vec2};
use shotcall_grid::{DragKind, GridGeometry, GridMode, GridPlacement, GridSyncEngine};
use shotcall_timeline::{ScheduleEvent, ShotSchedule, Timed, TrackRef};

// ── Helpers ────────────────────────────────────────────────────

fn grids(schedule: &ShotSchedule) -> (GridSyncEngine, GridSyncEngine) {
    let config = GridConfig::default();
    let director = GridSyncEngine::new(
        GridGeometry::new(Vec2::ZERO, 1, 400, config),
        GridMode::Director,
    );
    let cameras = GridSyncEngine::new(
        GridGeometry::new(Vec2::new(0.0, 0.0), schedule.camera_count(), 400, config),
        GridMode::Camera,
    );
    (director, cameras)
}

fn interval_of(schedule: &ShotSchedule, id: ShotId) -> (f64, f64) {
    let shot = schedule.shot(id).unwrap();
    (shot.begin(), shot.end())
}

// ── Gestures ───────────────────────────────────────────────────

#[test]
fn dragging_a_director_shot_into_another_collides() {
    let mut schedule = ShotSchedule::default();
    let (a, _) = schedule.add_shot("a", "", 1.0, 2.0, 0.0, 0.0).unwrap();
    let (b, _) = schedule.add_shot("b", "", 4.0, 5.0, 0.0, 0.0).unwrap();
    schedule.take_events();
    let (mut director, _) = grids(&schedule);

    // b occupies rows 16..20 (y 160..200). Grab it and lift it by two rows.
    let placement = director.placement_of(&schedule, b).unwrap();
    assert_eq!(
        placement,
        GridPlacement {
            column: 0,
            row: 16,
            row_span: 4
        }
    );
    assert_eq!(director.press(b, placement, Vec2::new(60.0, 180.0)), DragKind::Move);
    director.drag(Vec2::new(60.0, 170.0));
    let commit = director.release(Vec2::new(60.0, 160.0)).unwrap();
    assert_eq!((commit.begin, commit.end), (3.5, 4.5));

    // Nothing is committed until the gesture ends.
    assert_eq!(interval_of(&schedule, b), (4.0, 5.0));
    assert!(schedule.events().is_empty());

    commit.apply(&mut schedule).unwrap();
    assert_eq!(interval_of(&schedule, b), (3.5, 4.5));
    assert_eq!(schedule.query_overlaps(a).unwrap(), vec![a]);

    // Drag b up onto a.
    let placement = director.placement_of(&schedule, b).unwrap();
    director.press(b, placement, Vec2::new(60.0, 155.0));
    let commit = director.release(Vec2::new(60.0, 155.0));
    assert!(commit.is_none());

    director.press(b, placement, Vec2::new(60.0, 155.0));
    director.drag(Vec2::new(60.0, 75.0));
    let colliding = director
        .release(Vec2::new(60.0, 75.0))
        .unwrap()
        .apply(&mut schedule)
        .unwrap();
    assert_eq!(interval_of(&schedule, b), (1.5, 2.5));
    assert_eq!(colliding, vec![a, b]);
    assert!(schedule.check_invariants().is_ok());
}

#[test]
fn camera_drag_rehomes_onto_another_track() {
    let mut schedule = ShotSchedule::default();
    let (director, cameras) = schedule
        .add_director_shot_with_cameras("wide", "", 2.0, 3.0, 0.0, 0.0, &[0])
        .unwrap();
    let (neighbour, _) = schedule.add_camera_shot(1, "n", "", 2.0, 4.0).unwrap();
    schedule.take_events();
    let (_, mut grid) = grids(&schedule);

    let shot = cameras[0];
    let placement = grid.placement_of(&schedule, shot).unwrap();
    grid.press(shot, placement, Vec2::new(60.0, 85.0));
    grid.drag(Vec2::new(150.0, 85.0));
    let commit = grid.release(Vec2::new(190.0, 85.0)).unwrap();
    assert_eq!(commit.track, TrackRef::Camera(1));

    let colliding = commit.apply(&mut schedule).unwrap();
    assert_eq!(colliding, vec![neighbour, shot]);
    assert_eq!(schedule.track_of(shot), Some(TrackRef::Camera(1)));

    // Still coupled, so padding keeps reaching it on its new track.
    schedule.set_padding(director, 1.0, 0.0).unwrap();
    assert_eq!(interval_of(&schedule, shot), (1.0, 3.0));
    assert!(schedule.check_invariants().is_ok());
}

#[test]
fn camera_shot_padded_before_zero_stays_put_when_nudged() {
    let mut schedule = ShotSchedule::default();
    let (_, cameras) = schedule
        .add_director_shot_with_cameras("intro", "", 0.0, 1.0, 1.0, 0.0, &[0])
        .unwrap();
    let shot = cameras[0];
    assert_eq!(interval_of(&schedule, shot), (-1.0, 1.0));
    schedule.take_events();
    let (_, mut grid) = grids(&schedule);

    // Only the part from count 0 is on the grid: rows 0..4.
    let placement = grid.placement_of(&schedule, shot).unwrap();
    assert_eq!(
        placement,
        GridPlacement {
            column: 0,
            row: 0,
            row_span: 4
        }
    );

    grid.press(shot, placement, Vec2::new(60.0, 20.0));
    grid.drag(Vec2::new(61.0, 21.0));
    assert!(grid.release(Vec2::new(61.0, 21.0)).is_none());
    assert_eq!(interval_of(&schedule, shot), (-1.0, 1.0));
    assert!(schedule.events().is_empty());

    // A real move commits the visible block at its new rows.
    grid.press(shot, placement, Vec2::new(60.0, 20.0));
    grid.drag(Vec2::new(60.0, 40.0));
    grid.release(Vec2::new(60.0, 40.0))
        .unwrap()
        .apply(&mut schedule)
        .unwrap();
    assert_eq!(interval_of(&schedule, shot), (0.5, 1.5));
}

#[test]
fn resize_top_below_one_row_pins_bottom_edge() {
    let mut schedule = ShotSchedule::default();
    let (shot, _) = schedule.add_shot("a", "", 2.0, 3.0, 0.0, 0.0).unwrap();
    let (mut director, _) = grids(&schedule);

    // Rows 8..12, y 80..120. Grab the top edge and drag far below the block.
    let placement = director.placement_of(&schedule, shot).unwrap();
    assert_eq!(
        director.press(shot, placement, Vec2::new(60.0, 81.0)),
        DragKind::ResizeTop
    );
    director.drag(Vec2::new(60.0, 200.0));
    let commit = director.release(Vec2::new(60.0, 200.0)).unwrap();
    commit.apply(&mut schedule).unwrap();

    assert_eq!(interval_of(&schedule, shot), (2.75, 3.0));
}

#[test]
fn resize_bottom_extends_end() {
    let mut schedule = ShotSchedule::default();
    let (shot, _) = schedule.add_shot("a", "", 2.0, 3.0, 0.0, 0.0).unwrap();
    schedule.take_events();
    let (mut director, _) = grids(&schedule);

    let placement = director.placement_of(&schedule, shot).unwrap();
    assert_eq!(
        director.press(shot, placement, Vec2::new(60.0, 118.0)),
        DragKind::ResizeBottom
    );
    director.drag(Vec2::new(60.0, 139.0));
    director
        .release(Vec2::new(60.0, 139.0))
        .unwrap()
        .apply(&mut schedule)
        .unwrap();

    assert_eq!(interval_of(&schedule, shot), (2.0, 3.5));
    assert!(matches!(
        schedule.take_events().as_slice(),
        [ScheduleEvent::ShotUpdated { .. }]
    ));
}
