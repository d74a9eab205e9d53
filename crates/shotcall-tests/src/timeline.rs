//! Integration tests for the scheduling model.
//!
//! Exercises shotcall-timeline through its public surface, together with the
//! count parsing and configuration in shotcall-core.

use proptest::prelude::*;
use std::collections::HashMap;
use shotcall_core::{InstrumentId, Interval, ShotCallConfig, ShotCallError, ShotId};
use shotcall_timeline::{
    CollisionTracking, CommitOutcome, Identified, ScheduleCommand, ScheduleEvent, ScheduleFile,
    Shot, ShotSchedule, Timed, Timeline, TrackRef,
};

// ── Helpers ────────────────────────────────────────────────────

fn camera_shot(id: u32, begin: f64, end: f64) -> Shot {
    Shot::camera(
        ShotId(id),
        0,
        format!("shot {id}"),
        "",
        Interval::new(begin, end).unwrap(),
    )
}

fn three_camera_schedule() -> ShotSchedule {
    let config = ShotCallConfig::from_json(br#"{"cameras": ["A", "B", "C"]}"#).unwrap();
    ShotSchedule::new(&config)
}

// ── Timeline ordering & collisions ─────────────────────────────

#[test]
fn partial_overlap_is_one_pair() {
    let mut timeline = Timeline::new_camera("cam");
    timeline.insert(camera_shot(1, 1.0, 3.0));
    let colliding = timeline.insert(camera_shot(2, 2.0, 4.0));
    assert_eq!(colliding, vec![ShotId(1), ShotId(2)]);
    assert_eq!(timeline.query_overlaps(ShotId(1)), vec![ShotId(2), ShotId(1)]);
    assert_eq!(timeline.query_overlaps(ShotId(2)), vec![ShotId(1), ShotId(2)]);
}

#[test]
fn containment_collides_touching_does_not() {
    let mut timeline = Timeline::new_camera("cam");
    timeline.insert(camera_shot(1, 2.0, 3.0));
    assert_eq!(timeline.insert(camera_shot(2, 1.0, 4.0)).len(), 2);

    let mut timeline = Timeline::new_camera("cam");
    timeline.insert(camera_shot(1, 1.0, 2.0));
    assert_eq!(timeline.insert(camera_shot(2, 2.0, 3.0)), vec![ShotId(2)]);
    assert!(!timeline.get(ShotId(1)).unwrap().is_colliding());
}

#[test]
fn newest_tie_sorts_first() {
    let mut timeline = Timeline::new_camera("cam");
    timeline.insert(camera_shot(1, 1.0, 3.0));
    timeline.insert(camera_shot(2, 1.0, 3.0));
    assert_eq!(timeline.ids(), &[ShotId(2), ShotId(1)]);
}

// ── Schedule behaviour ─────────────────────────────────────────

#[test]
fn padding_shifts_every_coupled_camera_shot() {
    let mut schedule = three_camera_schedule();
    let (director, cameras) = schedule
        .add_director_shot_with_cameras("wide", "", 5.0, 9.0, 0.0, 0.0, &[0, 1, 2])
        .unwrap();
    schedule.take_events();

    let moved = schedule.set_padding(director, 2.0, 0.0).unwrap();
    assert_eq!(moved, cameras);
    for camera in &cameras {
        assert_eq!(schedule.shot(*camera).unwrap().begin(), 3.0);
    }

    let updated: Vec<ShotId> = schedule
        .take_events()
        .iter()
        .filter(|event| matches!(event, ScheduleEvent::ShotUpdated { .. }))
        .filter_map(ScheduleEvent::shot)
        .collect();
    assert_eq!(updated.len(), 4);
    assert!(cameras.iter().all(|camera| updated.contains(camera)));
}

#[test]
fn removal_leaves_no_orphans() {
    let mut schedule = three_camera_schedule();
    let (a, _) = schedule.add_camera_shot(1, "a", "", 0.0, 4.0).unwrap();
    let (b, _) = schedule.add_camera_shot(1, "b", "", 1.0, 2.0).unwrap();
    let (c, _) = schedule.add_camera_shot(1, "c", "", 3.0, 5.0).unwrap();

    schedule.remove_shot(a).unwrap();
    for remaining in [b, c] {
        assert!(!schedule.query_overlaps(remaining).unwrap().contains(&a));
    }
    assert!(schedule.check_invariants().is_ok());
}

#[test]
fn text_commit_round_trip() {
    let mut schedule = ShotSchedule::default();
    let outcome = schedule.dispatch(ScheduleCommand::AddShot {
        name: "Chorus".into(),
        description: String::new(),
        begin: "8".into(),
        end: "12".into(),
        padding_before: None,
        padding_after: None,
        cameras: vec![0],
        instruments: vec![],
    });
    let Some(shot) = outcome.shot().filter(|_| outcome.is_applied()) else {
        panic!("add was rejected");
    };

    let rejected = schedule.dispatch(ScheduleCommand::CommitEndCount {
        shot,
        raw: "7".into(),
    });
    assert!(matches!(
        rejected,
        CommitOutcome::Rejected { error: ShotCallError::InvalidInterval { .. }, ref restore, .. }
            if restore == &vec!["12.0".to_string()]
    ));

    let applied = schedule.dispatch(ScheduleCommand::CommitPadding {
        shot,
        before: "1".into(),
        after: "0.5".into(),
    });
    assert!(applied.is_applied());
    let camera = schedule.shot(shot).unwrap().as_director().unwrap().camera_shots[0];
    let camera = schedule.shot(camera).unwrap();
    assert_eq!((camera.begin(), camera.end()), (7.0, 12.5));
}

#[test]
fn saved_schedule_reloads() {
    let mut schedule = three_camera_schedule();
    schedule
        .add_director_shot_with_cameras("wide", "", 1.0, 2.0, 0.25, 0.25, &[0, 2])
        .unwrap();
    schedule.add_camera_shot(2, "close", "", 1.5, 3.0).unwrap();

    let json = schedule.snapshot().to_json().unwrap();
    let restored = ShotSchedule::restore(ScheduleFile::from_json(&json).unwrap()).unwrap();
    assert_eq!(restored.camera_count(), 3);
    assert_eq!(restored.camera_timeline(2).unwrap().name, "C");
    assert_eq!(restored.len(), schedule.len());
}

#[test]
fn events_serialize_as_tagged_json() {
    let mut schedule = ShotSchedule::default();
    schedule.add_camera_shot(1, "a", "", 0.0, 1.0).unwrap();
    let events = schedule.take_events();
    let json = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(json["event"], "shot_added");
    assert_eq!(json["track"], serde_json::json!({"Camera": 1}));
}

#[test]
fn zero_length_shot_collides_only_when_placed_last() {
    let mut schedule = ShotSchedule::default();
    let (long, _) = schedule.add_camera_shot(0, "long", "", 1.0, 3.0).unwrap();
    let (instant, colliding) = schedule.add_camera_shot(0, "instant", "", 1.0, 1.0).unwrap();
    assert_eq!(colliding, vec![long, instant]);
    schedule.take_events();

    // Re-placing the long shot re-evaluates the pair from its side.
    assert_eq!(schedule.update_interval(long, 1.0, 3.0).unwrap(), vec![long]);
    assert_eq!(
        schedule.take_events(),
        vec![ScheduleEvent::ShotUpdated {
            shot: long,
            colliding: vec![long],
            released: vec![instant],
        }]
    );
    assert!(schedule.check_invariants().is_ok());
}

#[test]
fn instruments_follow_shots_through_a_reload() {
    let mut schedule = three_camera_schedule();
    let outcome = schedule.dispatch(ScheduleCommand::AddInstrument {
        name: "Cello".into(),
        description: String::new(),
    });
    assert!(outcome.is_applied());
    let cello = schedule.instruments()[0].id();

    let outcome = schedule.dispatch(ScheduleCommand::AddShot {
        name: "Solo".into(),
        description: String::new(),
        begin: "4".into(),
        end: "6".into(),
        padding_before: None,
        padding_after: None,
        cameras: vec![1],
        instruments: vec![cello, cello],
    });
    let director = outcome.shot().unwrap();
    let camera = schedule.shot(director).unwrap().as_director().unwrap().camera_shots[0];
    assert_eq!(schedule.shots_featuring(cello), vec![director, camera]);

    let json = schedule.snapshot().to_json().unwrap();
    let mut restored = ShotSchedule::restore(ScheduleFile::from_json(&json).unwrap()).unwrap();
    assert_eq!(restored.shot(camera).unwrap().instruments(), &[cello]);

    let outcome = restored.dispatch(ScheduleCommand::RemoveInstrument { instrument: cello });
    assert!(outcome.is_applied());
    assert!(restored.shots_featuring(cello).is_empty());
    assert!(matches!(
        restored.dispatch(ScheduleCommand::CommitInstruments {
            shot: director,
            instruments: vec![cello],
        }),
        CommitOutcome::Rejected { error: ShotCallError::InstrumentNotFound(InstrumentId(1)), .. }
    ));
    assert!(restored.check_invariants().is_ok());
}

// ── Properties ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    AddDirector { begin: u8, len: u8, pad: u8, cameras: Vec<usize> },
    AddCamera { camera: usize, begin: u8, len: u8 },
    Update { pick: usize, begin: u8, len: u8 },
    Pad { pick: usize, before: u8, after: u8 },
    Couple { director: usize, camera: usize },
    Decouple { pick: usize },
    Move { pick: usize, camera: usize, begin: u8, len: u8 },
    Remove { pick: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..40, 0u8..12, 0u8..4, proptest::collection::vec(0usize..3, 0..3))
            .prop_map(|(begin, len, pad, cameras)| Op::AddDirector { begin, len, pad, cameras }),
        (0usize..3, 0u8..40, 0u8..12).prop_map(|(camera, begin, len)| Op::AddCamera {
            camera,
            begin,
            len
        }),
        (any::<usize>(), 0u8..40, 0u8..12).prop_map(|(pick, begin, len)| Op::Update {
            pick,
            begin,
            len
        }),
        (any::<usize>(), 0u8..4, 0u8..4).prop_map(|(pick, before, after)| Op::Pad {
            pick,
            before,
            after
        }),
        (any::<usize>(), any::<usize>())
            .prop_map(|(director, camera)| Op::Couple { director, camera }),
        any::<usize>().prop_map(|pick| Op::Decouple { pick }),
        (any::<usize>(), 0usize..3, 0u8..40, 0u8..12).prop_map(|(pick, camera, begin, len)| {
            Op::Move {
                pick,
                camera,
                begin,
                len,
            }
        }),
        any::<usize>().prop_map(|pick| Op::Remove { pick }),
    ]
}

fn quarter(value: u8) -> f64 {
    f64::from(value) / 4.0
}

/// When each shot was last placed on its track. A colliding pair is decided
/// from the side of whichever shot was placed later.
#[derive(Default)]
struct Placements {
    clock: u64,
    last: HashMap<ShotId, u64>,
}

impl Placements {
    fn touch(&mut self, ids: impl IntoIterator<Item = ShotId>) {
        for id in ids {
            self.clock += 1;
            self.last.insert(id, self.clock);
        }
    }

    fn placed_later(&self, a: ShotId, b: ShotId) -> bool {
        self.last.get(&a) > self.last.get(&b)
    }
}

fn all_ids(schedule: &ShotSchedule, track: Option<TrackRef>) -> Vec<ShotId> {
    let mut ids: Vec<ShotId> = schedule.director_timeline().ids().to_vec();
    for camera in 0..schedule.camera_count() {
        ids.extend_from_slice(schedule.camera_timeline(camera).unwrap().ids());
    }
    ids.retain(|id| track.map_or(true, |t| match t {
        TrackRef::Director => schedule.track_of(*id) == Some(TrackRef::Director),
        TrackRef::Camera(_) => matches!(schedule.track_of(*id), Some(TrackRef::Camera(_))),
    }));
    ids
}

fn pick(ids: &[ShotId], index: usize) -> Option<ShotId> {
    (!ids.is_empty()).then(|| ids[index % ids.len()])
}

fn run(schedule: &mut ShotSchedule, placements: &mut Placements, op: Op) {
    let directors = all_ids(schedule, Some(TrackRef::Director));
    let camera_shots = all_ids(schedule, Some(TrackRef::Camera(0)));
    let everything = all_ids(schedule, None);
    match op {
        Op::AddDirector { begin, len, pad, cameras } => {
            if let Ok((director, created)) = schedule.add_director_shot_with_cameras(
                "d",
                "",
                quarter(begin),
                quarter(begin + len),
                quarter(pad),
                quarter(pad),
                &cameras,
            ) {
                placements.touch(std::iter::once(director).chain(created));
            }
        }
        Op::AddCamera { camera, begin, len } => {
            if let Ok((id, _)) =
                schedule.add_camera_shot(camera, "c", "", quarter(begin), quarter(begin + len))
            {
                placements.touch([id]);
            }
        }
        Op::Update { pick: p, begin, len } => {
            if let Some(id) = pick(&everything, p) {
                if schedule
                    .update_interval(id, quarter(begin), quarter(begin + len))
                    .is_ok()
                {
                    placements.touch([id]);
                }
            }
        }
        Op::Pad { pick: p, before, after } => {
            if let Some(id) = pick(&directors, p) {
                if let Ok(moved) = schedule.set_padding(id, quarter(before), quarter(after)) {
                    placements.touch(moved);
                }
            }
        }
        Op::Couple { director, camera } => {
            if let (Some(d), Some(c)) = (pick(&directors, director), pick(&camera_shots, camera)) {
                if schedule.couple(d, c).is_ok() {
                    placements.touch([c]);
                }
            }
        }
        Op::Decouple { pick: p } => {
            if let Some(id) = pick(&camera_shots, p) {
                let _ = schedule.decouple(id);
            }
        }
        Op::Move { pick: p, camera, begin, len } => {
            if let Some(id) = pick(&camera_shots, p) {
                if schedule
                    .move_camera_shot(id, camera, quarter(begin), quarter(begin + len))
                    .is_ok()
                {
                    placements.touch([id]);
                }
            }
        }
        Op::Remove { pick: p } => {
            if let Some(id) = pick(&everything, p) {
                let _ = schedule.remove_shot(id);
            }
        }
    }
}

proptest! {
    #[test]
    fn invariants_hold_after_any_edit_sequence(ops in proptest::collection::vec(op(), 1..60)) {
        let mut schedule = three_camera_schedule();
        let mut placements = Placements::default();
        for op in ops {
            run(&mut schedule, &mut placements, op);
            prop_assert!(schedule.check_invariants().is_ok(), "{:?}", schedule.check_invariants());
        }
    }

    #[test]
    fn collision_sets_match_a_full_scan(ops in proptest::collection::vec(op(), 1..40)) {
        let mut schedule = three_camera_schedule();
        let mut placements = Placements::default();
        for op in ops {
            run(&mut schedule, &mut placements, op);
        }
        let tracks = std::iter::once(schedule.director_timeline())
            .chain((0..schedule.camera_count()).filter_map(|c| schedule.camera_timeline(c)));
        for timeline in tracks {
            for a in timeline.iter() {
                for b in timeline.iter() {
                    if a.id() == b.id() {
                        continue;
                    }
                    let (mover, other) = if placements.placed_later(a.id(), b.id()) {
                        (a, b)
                    } else {
                        (b, a)
                    };
                    let expected = mover.interval().overlaps(other.interval(), 0.0);
                    prop_assert_eq!(a.collides_with().contains(&b.id()), expected);
                }
            }
        }
    }
}
