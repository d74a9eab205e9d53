//! Edit intents from the presentation layer.
//!
//! The editor never mutates a timeline directly. It sends a [`ScheduleCommand`]
//! carrying the raw text the user typed, and gets back a [`CommitOutcome`] telling
//! it what to display: the new values, or the previous valid values to restore.

use serde::{Deserialize, Serialize};
use shotcall_core::{
    format_count, parse_count, parse_padding, InstrumentId, Result, ShotCallError, ShotId,
};
use tracing::{debug, warn};

use crate::schedule::ShotSchedule;
use crate::shot::{Identified, Shot, Timed};

/// A single edit intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScheduleCommand {
    /// Create a director shot, plus one coupled camera shot per listed camera.
    /// Listed instruments go on every shot created.
    AddShot {
        name: String,
        #[serde(default)]
        description: String,
        begin: String,
        end: String,
        /// Missing padding means zero.
        #[serde(default)]
        padding_before: Option<String>,
        #[serde(default)]
        padding_after: Option<String>,
        #[serde(default)]
        cameras: Vec<usize>,
        #[serde(default)]
        instruments: Vec<InstrumentId>,
    },
    /// Create an uncoupled camera shot.
    AddCameraShot {
        camera: usize,
        name: String,
        #[serde(default)]
        description: String,
        begin: String,
        end: String,
        #[serde(default)]
        instruments: Vec<InstrumentId>,
    },
    /// The begin field of a shot lost focus with `raw` in it.
    CommitBeginCount { shot: ShotId, raw: String },
    /// The end field of a shot lost focus with `raw` in it.
    CommitEndCount { shot: ShotId, raw: String },
    /// The padding fields of a director shot were committed.
    CommitPadding {
        shot: ShotId,
        before: String,
        after: String,
    },
    CommitName { shot: ShotId, name: String },
    CommitDescription { shot: ShotId, description: String },
    /// The instrument checkboxes of a shot were committed.
    CommitInstruments {
        shot: ShotId,
        instruments: Vec<InstrumentId>,
    },
    Couple { director: ShotId, camera_shot: ShotId },
    Decouple { camera_shot: ShotId },
    /// A camera shot was dropped on a camera column at a grid-derived interval.
    MoveCameraShot {
        shot: ShotId,
        camera: usize,
        begin: f64,
        end: f64,
    },
    Remove { shot: ShotId },
    AddInstrument {
        name: String,
        #[serde(default)]
        description: String,
    },
    EditInstrument {
        instrument: InstrumentId,
        name: String,
        #[serde(default)]
        description: String,
    },
    RemoveInstrument { instrument: InstrumentId },
}

/// What a command edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subject {
    Shot(ShotId),
    Instrument(InstrumentId),
}

impl ScheduleCommand {
    /// The existing shot or instrument this command edits. `None` for creations.
    pub fn subject(&self) -> Option<Subject> {
        match self {
            Self::AddShot { .. } | Self::AddCameraShot { .. } | Self::AddInstrument { .. } => None,
            Self::CommitBeginCount { shot, .. }
            | Self::CommitEndCount { shot, .. }
            | Self::CommitPadding { shot, .. }
            | Self::CommitName { shot, .. }
            | Self::CommitDescription { shot, .. }
            | Self::CommitInstruments { shot, .. }
            | Self::MoveCameraShot { shot, .. }
            | Self::Remove { shot } => Some(Subject::Shot(*shot)),
            Self::Couple { camera_shot, .. } | Self::Decouple { camera_shot } => {
                Some(Subject::Shot(*camera_shot))
            }
            Self::EditInstrument { instrument, .. } | Self::RemoveInstrument { instrument } => {
                Some(Subject::Instrument(*instrument))
            }
        }
    }
}

/// What the editor should show after a commit.
#[derive(Debug)]
pub enum CommitOutcome {
    /// The model changed. `display` holds the committed field values as text.
    Applied {
        subject: Subject,
        display: Vec<String>,
    },
    /// The model is untouched. `restore` holds the previous valid field values as text.
    Rejected {
        subject: Option<Subject>,
        error: ShotCallError,
        restore: Vec<String>,
    },
}

impl CommitOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// The shot the command applied to or created, if it was about a shot.
    pub fn shot(&self) -> Option<ShotId> {
        match self {
            Self::Applied {
                subject: Subject::Shot(shot),
                ..
            }
            | Self::Rejected {
                subject: Some(Subject::Shot(shot)),
                ..
            } => Some(*shot),
            _ => None,
        }
    }
}

impl ShotSchedule {
    /// Validate and apply an edit intent.
    ///
    /// A rejected command never touches the model and queues no events.
    pub fn dispatch(&mut self, command: ScheduleCommand) -> CommitOutcome {
        let subject = command.subject();
        let restore = subject
            .map(|subject| self.display_fields(&command, subject))
            .unwrap_or_default();

        match self.execute(&command) {
            Ok(applied) => {
                let fields = self.display_fields(&command, applied);
                debug!(?applied, ?fields, "Applied edit");
                CommitOutcome::Applied {
                    subject: applied,
                    display: fields,
                }
            }
            Err(error) => {
                warn!(?command, %error, "Rejected edit");
                CommitOutcome::Rejected {
                    subject,
                    error,
                    restore,
                }
            }
        }
    }

    fn execute(&mut self, command: &ScheduleCommand) -> Result<Subject> {
        let cells = self.cells_per_count();
        match command {
            ScheduleCommand::AddShot {
                name,
                description,
                begin,
                end,
                padding_before,
                padding_after,
                cameras,
                instruments,
            } => {
                let begin = parse_count(begin, cells)?;
                let end = parse_count(end, cells)?;
                let before = optional_padding(padding_before.as_deref(), cells)?;
                let after = optional_padding(padding_after.as_deref(), cells)?;
                for &instrument in instruments {
                    self.check_instrument(instrument)?;
                }
                let (id, camera_shots) = if cameras.is_empty() {
                    let (id, _) = self.add_shot(name, description, begin, end, before, after)?;
                    (id, Vec::new())
                } else {
                    self.add_director_shot_with_cameras(
                        name,
                        description,
                        begin,
                        end,
                        before,
                        after,
                        cameras,
                    )?
                };
                if !instruments.is_empty() {
                    for shot in std::iter::once(id).chain(camera_shots) {
                        self.set_shot_instruments(shot, instruments)?;
                    }
                }
                Ok(Subject::Shot(id))
            }
            ScheduleCommand::AddCameraShot {
                camera,
                name,
                description,
                begin,
                end,
                instruments,
            } => {
                let begin = parse_count(begin, cells)?;
                let end = parse_count(end, cells)?;
                for &instrument in instruments {
                    self.check_instrument(instrument)?;
                }
                let (id, _) = self.add_camera_shot(*camera, name, description, begin, end)?;
                if !instruments.is_empty() {
                    self.set_shot_instruments(id, instruments)?;
                }
                Ok(Subject::Shot(id))
            }
            ScheduleCommand::CommitBeginCount { shot, raw } => {
                let current = self.existing(*shot)?.interval();
                let begin = parse_count(raw, cells)?;
                self.update_interval(*shot, begin, current.end())?;
                Ok(Subject::Shot(*shot))
            }
            ScheduleCommand::CommitEndCount { shot, raw } => {
                let current = self.existing(*shot)?.interval();
                let end = parse_count(raw, cells)?;
                self.update_interval(*shot, current.begin(), end)?;
                Ok(Subject::Shot(*shot))
            }
            ScheduleCommand::CommitPadding {
                shot,
                before,
                after,
            } => {
                let before = parse_padding(before, cells)?;
                let after = parse_padding(after, cells)?;
                self.set_padding(*shot, before, after)?;
                Ok(Subject::Shot(*shot))
            }
            ScheduleCommand::CommitName { shot, name } => {
                self.set_name(*shot, name.as_str())?;
                Ok(Subject::Shot(*shot))
            }
            ScheduleCommand::CommitDescription { shot, description } => {
                self.set_description(*shot, description.as_str())?;
                Ok(Subject::Shot(*shot))
            }
            ScheduleCommand::CommitInstruments { shot, instruments } => {
                self.set_shot_instruments(*shot, instruments)?;
                Ok(Subject::Shot(*shot))
            }
            ScheduleCommand::Couple {
                director,
                camera_shot,
            } => {
                self.couple(*director, *camera_shot)?;
                Ok(Subject::Shot(*camera_shot))
            }
            ScheduleCommand::Decouple { camera_shot } => {
                self.decouple(*camera_shot)?;
                Ok(Subject::Shot(*camera_shot))
            }
            ScheduleCommand::MoveCameraShot {
                shot,
                camera,
                begin,
                end,
            } => {
                self.move_camera_shot(*shot, *camera, *begin, *end)?;
                Ok(Subject::Shot(*shot))
            }
            ScheduleCommand::Remove { shot } => {
                self.remove_shot(*shot)?;
                Ok(Subject::Shot(*shot))
            }
            ScheduleCommand::AddInstrument { name, description } => {
                let id = self.add_instrument(name.as_str(), description.as_str())?;
                Ok(Subject::Instrument(id))
            }
            ScheduleCommand::EditInstrument {
                instrument,
                name,
                description,
            } => {
                self.edit_instrument(*instrument, name.as_str(), description.as_str())?;
                Ok(Subject::Instrument(*instrument))
            }
            ScheduleCommand::RemoveInstrument { instrument } => {
                self.remove_instrument(*instrument)?;
                Ok(Subject::Instrument(*instrument))
            }
        }
    }

    fn existing(&self, id: ShotId) -> Result<&Shot> {
        self.shot(id).ok_or(ShotCallError::ShotNotFound(id))
    }

    /// Text of the fields a command edits, read from the current model.
    fn display_fields(&self, command: &ScheduleCommand, subject: Subject) -> Vec<String> {
        let id = match subject {
            Subject::Shot(id) => id,
            Subject::Instrument(id) => {
                return self
                    .instrument(id)
                    .map(|instrument| vec![instrument.name.clone(), instrument.description.clone()])
                    .unwrap_or_default();
            }
        };
        let Some(shot) = self.shot(id) else {
            return Vec::new();
        };
        match command {
            ScheduleCommand::CommitBeginCount { .. } => vec![format_count(shot.begin())],
            ScheduleCommand::CommitEndCount { .. } => vec![format_count(shot.end())],
            ScheduleCommand::CommitPadding { .. } => shot
                .as_director()
                .map(|d| vec![format_count(d.padding_before), format_count(d.padding_after)])
                .unwrap_or_default(),
            ScheduleCommand::CommitName { .. } => vec![shot.name().to_string()],
            ScheduleCommand::CommitDescription { .. } => vec![shot.description().to_string()],
            ScheduleCommand::CommitInstruments { .. } => shot
                .instruments()
                .iter()
                .filter_map(|&instrument| self.instrument(instrument))
                .map(|instrument| instrument.name.clone())
                .collect(),
            _ => vec![format_count(shot.begin()), format_count(shot.end())],
        }
    }
}

fn optional_padding(text: Option<&str>, cells_per_count: u32) -> Result<f64> {
    text.map_or(Ok(0.0), |text| parse_padding(text, cells_per_count))
}
