//! Saved project documents
//!
//! A document is the JSON shape
//! `{meta: {version, createdAt}, layers: {blueprint, execution, validation, outcome}}`.
//! Blueprint, execution and validation must be all present or all absent.
//! A loaded project holds only values the state machine could have produced:
//! the execution follows the frozen timeline, every execution value passes
//! the edit checks and the outcome passes its range checks. Validation
//! reports are never trusted from disk: loading recomputes the report and
//! replaces a stale one.

use crate::command::ExecutionEdit;
use crate::error::{PersistError, ProjectError};
use crate::state_machine::{ProductionPlan, Project, ProjectStateMachine};
use crate::types::{Blueprint, ExecutionMapping, OutcomeLog, ProjectMeta, ValidationReport};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Format major version this build reads
const SUPPORTED_MAJOR: &str = "2";

/// Serialized layers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectLayers {
    /// Frozen blueprint
    #[serde(default)]
    pub blueprint: Option<Blueprint>,
    /// Execution mapping
    #[serde(default)]
    pub execution: Option<ExecutionMapping>,
    /// Validation report
    #[serde(default)]
    pub validation: Option<ValidationReport>,
    /// Outcome record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<OutcomeLog>,
}

/// Serialized project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Metadata
    pub meta: ProjectMeta,
    /// Layers
    pub layers: ProjectLayers,
}

impl ProjectDocument {
    /// Snapshot a project
    #[must_use]
    pub fn from_project(project: &Project) -> Self {
        let plan = project.plan();
        Self {
            meta: project.meta().clone(),
            layers: ProjectLayers {
                blueprint: plan.map(|p| p.blueprint().clone()),
                execution: plan.map(|p| p.execution().clone()),
                validation: plan.map(|p| p.validation().clone()),
                outcome: project.outcome().cloned(),
            },
        }
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    ///
    /// [`PersistError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse JSON without checking layer consistency
    ///
    /// # Errors
    ///
    /// [`PersistError::Json`] on malformed input.
    pub fn from_json(text: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Rebuild a project, checking the document's invariants
    ///
    /// The validation layer is recomputed with `machine`'s configuration and
    /// replaced if it differs from the stored one.
    ///
    /// # Errors
    ///
    /// - [`PersistError::UnsupportedVersion`] for another major version
    /// - [`PersistError::PartialLayers`] when only some locked layers exist
    /// - [`PersistError::InvalidOutcome`] for an out-of-range outcome
    /// - [`PersistError::MisalignedDensity`] when density and segments differ in length
    /// - [`PersistError::SegmentCountMismatch`] or [`PersistError::TimelineDrift`]
    ///   when the execution no longer follows the blueprint timeline
    /// - [`PersistError::InvalidExecution`] for a value no edit accepts
    pub fn into_project(self, machine: &ProjectStateMachine) -> Result<Project, PersistError> {
        let major = self.meta.version.split('.').next().unwrap_or_default();
        if major != SUPPORTED_MAJOR {
            return Err(PersistError::UnsupportedVersion(self.meta.version));
        }

        let ProjectLayers {
            blueprint,
            execution,
            validation,
            outcome,
        } = self.layers;

        if let Some(outcome) = &outcome {
            outcome.validate()?;
        }

        let plan = match (blueprint, execution, validation) {
            (None, None, None) => None,
            (Some(blueprint), Some(execution), Some(stored)) => {
                check_execution(&blueprint, &execution)?;
                let fresh = machine.validate(&execution, blueprint.platform_context());
                if fresh != stored {
                    tracing::warn!(
                        blueprint = %blueprint.id(),
                        "stored validation report is stale; recomputed"
                    );
                }
                Some(ProductionPlan {
                    blueprint,
                    execution,
                    validation: fresh,
                })
            }
            _ => return Err(PersistError::PartialLayers),
        };

        Ok(Project {
            meta: self.meta,
            plan,
            outcome,
        })
    }
}

fn check_execution(blueprint: &Blueprint, execution: &ExecutionMapping) -> Result<(), PersistError> {
    if !execution.is_aligned() {
        return Err(PersistError::MisalignedDensity {
            density: execution.visual_density.len(),
            segments: execution.segment_count(),
        });
    }

    let timeline = &blueprint.phase1_data().timeline;
    if execution.segment_count() != timeline.len() {
        return Err(PersistError::SegmentCountMismatch {
            execution: execution.segment_count(),
            blueprint: timeline.len(),
        });
    }
    if let Some(index) = execution
        .edit_rhythm
        .segments
        .iter()
        .zip(timeline)
        .position(|(seg, frozen)| seg.segment != *frozen)
    {
        return Err(PersistError::TimelineDrift(index));
    }

    // Each stored value is replayed as the edit that would have written it.
    let segments = execution.edit_rhythm.segments.iter().enumerate();
    let replay = std::iter::once(ExecutionEdit::SetBpm(execution.audio_plan.bpm))
        .chain(segments.map(|(index, seg)| ExecutionEdit::SetSegmentTargetAsl {
            index,
            seconds: seg.target_asl,
        }))
        .chain(
            execution
                .audio_plan
                .silence_markers
                .iter()
                .map(|&range| ExecutionEdit::AddSilenceMarker(range)),
        );
    for edit in replay {
        edit.check(execution).map_err(PersistError::InvalidExecution)?;
    }
    Ok(())
}

/// Serialize a project to JSON
///
/// # Errors
///
/// [`PersistError::Json`] if serialization fails.
pub fn save_project(project: &Project) -> Result<String, PersistError> {
    ProjectDocument::from_project(project).to_json()
}

/// Parse and check a saved project
///
/// # Errors
///
/// As [`ProjectDocument::from_json`] and [`ProjectDocument::into_project`].
pub fn load_project(text: &str, machine: &ProjectStateMachine) -> Result<Project, PersistError> {
    ProjectDocument::from_json(text)?.into_project(machine)
}

/// Read and check a saved project file
///
/// # Errors
///
/// [`ProjectError::Io`] when the file cannot be read, otherwise
/// [`ProjectError::Persist`] as [`load_project`].
pub fn read_project(
    path: impl AsRef<Path>,
    machine: &ProjectStateMachine,
) -> Result<Project, ProjectError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let project = load_project(&text, machine)?;
    tracing::debug!(path = %path.display(), state = ?project.state(), "project loaded");
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ProjectCommand;
    use crate::error::{OutcomeError, StateMachineError};
    use crate::types::{PlatformContext, TimeRange, ValidationStatus, VisualIntensity};
    use chrono::Utc;
    use resonance_timeline::{plan, Platform, SegmentType, TargetDuration, TimelineRequest};

    fn locked(machine: &ProjectStateMachine) -> Project {
        let plan = plan(&TimelineRequest::new(
            TargetDuration::new(30).unwrap(),
            "climb",
            Platform::Instagram,
        ));
        machine.apply(
            &machine.new_project(),
            ProjectCommand::LockBlueprint {
                phase1: plan.to_phase1_data(),
                platform_context: PlatformContext::for_plan(&plan),
            },
        )
    }

    #[test]
    fn document_shape() {
        let machine = ProjectStateMachine::default();
        let json: serde_json::Value =
            serde_json::from_str(&save_project(&locked(&machine)).unwrap()).unwrap();

        assert_eq!(json["meta"]["version"], "2.0.0");
        assert!(json["meta"]["createdAt"].is_string());
        assert!(json["layers"]["blueprint"]["phase1Data"]["timeline"].is_array());
        assert_eq!(json["layers"]["blueprint"]["platformContext"]["maxDuration"], 30);
        assert_eq!(json["layers"]["execution"]["audioPlan"]["bpm"], 120);
        assert_eq!(json["layers"]["execution"]["editRhythm"]["segments"][0]["type"], "HOOK");
        assert_eq!(json["layers"]["execution"]["editRhythm"]["segments"][0]["targetASL"], 1.5);
        assert_eq!(json["layers"]["execution"]["visualDensity"][0]["intensity"], "MED");
        assert!(json["layers"]["validation"]["globalStatus"].is_string());
    }

    #[test]
    fn unlocked_project_has_null_layers() {
        let machine = ProjectStateMachine::default();
        let json: serde_json::Value =
            serde_json::from_str(&save_project(&machine.new_project()).unwrap()).unwrap();
        assert!(json["layers"]["blueprint"].is_null());
        assert!(json["layers"]["execution"].is_null());
        assert!(json["layers"]["validation"].is_null());
    }

    #[test]
    fn round_trip() {
        let machine = ProjectStateMachine::default();
        let project = machine.apply(
            &locked(&machine),
            ProjectCommand::UpdateExecution(ExecutionEdit::SetSegmentIntensity {
                index: 0,
                intensity: VisualIntensity::High,
            }),
        );
        let restored = load_project(&save_project(&project).unwrap(), &machine).unwrap();
        assert_eq!(restored, project);
    }

    #[test]
    fn partial_layers_rejected() {
        let machine = ProjectStateMachine::default();
        let mut doc = ProjectDocument::from_project(&locked(&machine));
        doc.layers.validation = None;

        assert!(matches!(doc.into_project(&machine), Err(PersistError::PartialLayers)));
    }

    #[test]
    fn misaligned_density_rejected() {
        let machine = ProjectStateMachine::default();
        let mut doc = ProjectDocument::from_project(&locked(&machine));
        if let Some(exec) = doc.layers.execution.as_mut() {
            exec.visual_density.pop();
        }

        assert!(matches!(
            doc.into_project(&machine),
            Err(PersistError::MisalignedDensity { .. })
        ));
    }

    #[test]
    fn stale_validation_is_replaced() {
        let machine = ProjectStateMachine::default();
        let project = locked(&machine);
        let mut doc = ProjectDocument::from_project(&project);
        doc.layers.validation = Some(ValidationReport {
            global_status: ValidationStatus::Pass,
            signals: Vec::new(),
        });

        let restored = doc.into_project(&machine).unwrap();
        assert_eq!(restored.validation(), project.validation());
    }

    #[test]
    fn other_major_version_rejected() {
        let machine = ProjectStateMachine::default();
        let mut doc = ProjectDocument::from_project(&machine.new_project());
        doc.meta.version = "1.4.0".to_string();

        assert!(matches!(
            doc.into_project(&machine),
            Err(PersistError::UnsupportedVersion(v)) if v == "1.4.0"
        ));
    }

    fn outcome(retention_3s: u8, user_confidence: u8) -> OutcomeLog {
        OutcomeLog {
            posted: true,
            platform: Platform::Instagram.to_string(),
            retention_3s,
            user_confidence,
            drop_off_timestamp: None,
            logged_at: Utc::now(),
        }
    }

    #[test]
    fn out_of_range_outcome_rejected() {
        let machine = ProjectStateMachine::default();
        for (record, expected) in [
            (outcome(250, 3), OutcomeError::RetentionOutOfRange(250)),
            (outcome(60, 0), OutcomeError::ConfidenceOutOfRange(0)),
        ] {
            let mut doc = ProjectDocument::from_project(&locked(&machine));
            doc.layers.outcome = Some(record);
            assert!(matches!(
                doc.into_project(&machine),
                Err(PersistError::InvalidOutcome(e)) if e == expected
            ));
        }
    }

    #[test]
    fn outcome_on_unlocked_project_is_checked() {
        let machine = ProjectStateMachine::default();
        let mut doc = ProjectDocument::from_project(&machine.new_project());
        doc.layers.outcome = Some(outcome(101, 5));
        assert!(matches!(
            doc.into_project(&machine),
            Err(PersistError::InvalidOutcome(_))
        ));
    }

    #[test]
    fn zero_bpm_rejected() {
        let machine = ProjectStateMachine::default();
        let mut doc = ProjectDocument::from_project(&locked(&machine));
        if let Some(exec) = doc.layers.execution.as_mut() {
            exec.audio_plan.bpm = 0;
        }
        assert!(matches!(
            doc.into_project(&machine),
            Err(PersistError::InvalidExecution(StateMachineError::InvalidValue {
                field: "audioPlan.bpm",
                ..
            }))
        ));
    }

    #[test]
    fn non_positive_asl_rejected() {
        let machine = ProjectStateMachine::default();
        for seconds in [-4.0, 0.0, f64::NAN] {
            let mut doc = ProjectDocument::from_project(&locked(&machine));
            if let Some(exec) = doc.layers.execution.as_mut() {
                exec.edit_rhythm.segments[0].target_asl = seconds;
            }
            assert!(matches!(
                doc.into_project(&machine),
                Err(PersistError::InvalidExecution(StateMachineError::InvalidValue {
                    field: "targetASL",
                    ..
                }))
            ));
        }
    }

    #[test]
    fn reversed_silence_marker_rejected() {
        let machine = ProjectStateMachine::default();
        let mut doc = ProjectDocument::from_project(&locked(&machine));
        if let Some(exec) = doc.layers.execution.as_mut() {
            exec.audio_plan
                .silence_markers
                .push(TimeRange { start: 4.0, end: 2.0 });
        }
        assert!(matches!(
            doc.into_project(&machine),
            Err(PersistError::InvalidExecution(_))
        ));
    }

    #[test]
    fn dropped_segment_rejected() {
        let machine = ProjectStateMachine::default();
        let mut doc = ProjectDocument::from_project(&locked(&machine));
        if let Some(exec) = doc.layers.execution.as_mut() {
            exec.edit_rhythm.segments.pop();
            exec.visual_density.pop();
        }
        assert!(matches!(
            doc.into_project(&machine),
            Err(PersistError::SegmentCountMismatch { execution, blueprint }) if execution + 1 == blueprint
        ));
    }

    #[test]
    fn retimed_segment_rejected() {
        let machine = ProjectStateMachine::default();
        let mut doc = ProjectDocument::from_project(&locked(&machine));
        if let Some(exec) = doc.layers.execution.as_mut() {
            exec.edit_rhythm.segments[1].segment.duration += 1;
            exec.edit_rhythm.segments[1].segment.end_time += 1;
        }
        assert!(matches!(doc.into_project(&machine), Err(PersistError::TimelineDrift(1))));
    }

    #[test]
    fn retyped_segment_rejected() {
        let machine = ProjectStateMachine::default();
        let mut doc = ProjectDocument::from_project(&locked(&machine));
        if let Some(exec) = doc.layers.execution.as_mut() {
            exec.edit_rhythm.segments[0].segment.segment_type = SegmentType::Peak;
        }
        assert!(matches!(doc.into_project(&machine), Err(PersistError::TimelineDrift(0))));
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let machine = ProjectStateMachine::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(matches!(read_project(&path, &machine), Err(ProjectError::Io(_))));
    }

    #[test]
    fn read_saved_file() {
        let machine = ProjectStateMachine::default();
        let project = locked(&machine);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(&path, save_project(&project).unwrap()).unwrap();

        assert_eq!(read_project(&path, &machine).unwrap(), project);
    }
}
