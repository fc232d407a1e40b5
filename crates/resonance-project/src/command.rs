//! Commands accepted by the project state machine
//!
//! Execution edits are a closed set of typed operations. Each edit is
//! checked against the current mapping before it is applied, so an
//! out-of-range index or an invalid value never writes anything.

use crate::config::is_positive;
use crate::error::StateMachineError;
use crate::types::{
    ExecutionMapping, OutcomeLog, PacingCurve, PlatformContext, TimeRange, VisualIntensity,
};
use resonance_timeline::Phase1Data;
use serde::{Deserialize, Serialize};

/// A state transition request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectCommand {
    /// Freeze a timeline into a new blueprint
    LockBlueprint {
        /// Structure and timeline to freeze
        phase1: Phase1Data,
        /// Where the video will be published
        platform_context: PlatformContext,
    },
    /// Edit the execution mapping
    UpdateExecution(ExecutionEdit),
    /// Recompute the validation report
    RunValidation,
    /// Record a post-publication outcome
    LogOutcome(OutcomeLog),
    /// Discard the blueprint and everything derived from it
    UnlockBlueprint,
}

impl ProjectCommand {
    /// Short label for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LockBlueprint { .. } => "LOCK_BLUEPRINT",
            Self::UpdateExecution(_) => "UPDATE_EXECUTION",
            Self::RunValidation => "RUN_VALIDATION",
            Self::LogOutcome(_) => "LOG_OUTCOME",
            Self::UnlockBlueprint => "UNLOCK_BLUEPRINT",
        }
    }
}

/// A single typed edit of the execution mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionEdit {
    /// Set the audio grid
    SetBpm(u32),
    /// Toggle music ducking
    SetDuckingEnabled(bool),
    /// Set one segment's pacing curve
    SetSegmentPacing {
        /// Segment index
        index: usize,
        /// New curve
        curve: PacingCurve,
    },
    /// Set one segment's visual intensity
    SetSegmentIntensity {
        /// Segment index
        index: usize,
        /// New intensity
        intensity: VisualIntensity,
    },
    /// Set one segment's average shot length
    SetSegmentTargetAsl {
        /// Segment index
        index: usize,
        /// Seconds, finite and positive
        seconds: f64,
    },
    /// Append a silence marker
    AddSilenceMarker(TimeRange),
}

impl ExecutionEdit {
    /// Check the edit against a mapping without applying it
    ///
    /// # Errors
    ///
    /// [`StateMachineError::IndexOutOfBounds`] for a bad segment index,
    /// [`StateMachineError::InvalidValue`] for a rejected value.
    pub fn check(&self, execution: &ExecutionMapping) -> Result<(), StateMachineError> {
        match self {
            Self::SetBpm(0) => Err(invalid("audioPlan.bpm", "must be positive")),
            Self::SetBpm(_) | Self::SetDuckingEnabled(_) => Ok(()),
            Self::SetSegmentPacing { index, .. } | Self::SetSegmentTargetAsl { index, .. } => {
                check_index(*index, execution.edit_rhythm.segments.len())?;
                match self {
                    Self::SetSegmentTargetAsl { seconds, .. } if !is_positive(*seconds) => {
                        Err(invalid("targetASL", "must be finite and positive"))
                    }
                    _ => Ok(()),
                }
            }
            Self::SetSegmentIntensity { index, .. } => {
                check_index(*index, execution.visual_density.len())
            }
            Self::AddSilenceMarker(range) => {
                if !range.start.is_finite() || !range.end.is_finite() {
                    return Err(invalid("silenceMarkers", "bounds must be finite"));
                }
                if range.start < 0.0 || range.start > range.end {
                    return Err(invalid("silenceMarkers", "start must be in 0..=end"));
                }
                Ok(())
            }
        }
    }

    /// Check, then write into the mapping
    ///
    /// On error the mapping is left untouched.
    ///
    /// # Errors
    ///
    /// As [`Self::check`].
    pub fn apply_to(&self, execution: &mut ExecutionMapping) -> Result<(), StateMachineError> {
        self.check(execution)?;
        match *self {
            Self::SetBpm(bpm) => execution.audio_plan.bpm = bpm,
            Self::SetDuckingEnabled(enabled) => execution.audio_plan.ducking_enabled = enabled,
            Self::SetSegmentPacing { index, curve } => {
                execution.edit_rhythm.segments[index].pacing_curve = curve;
            }
            Self::SetSegmentIntensity { index, intensity } => {
                execution.visual_density[index].intensity = intensity;
            }
            Self::SetSegmentTargetAsl { index, seconds } => {
                execution.edit_rhythm.segments[index].target_asl = seconds;
            }
            Self::AddSilenceMarker(range) => execution.audio_plan.silence_markers.push(range),
        }
        Ok(())
    }
}

fn check_index(index: usize, len: usize) -> Result<(), StateMachineError> {
    if index < len {
        Ok(())
    } else {
        Err(StateMachineError::IndexOutOfBounds { index, len })
    }
}

fn invalid(field: &'static str, reason: &str) -> StateMachineError {
    StateMachineError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AudioPlan, EditRhythm, ExecutionSegment, VisualDensityMarker};
    use resonance_timeline::{CalculatedSegment, CutSpeed, SegmentTemplate, SegmentType, SoundDensity};

    fn mapping() -> ExecutionMapping {
        let template = SegmentTemplate::new(SegmentType::Hook, 50, CutSpeed::Fast, SoundDensity::Med);
        let segments: Vec<_> = [(0, 5), (5, 5)]
            .into_iter()
            .map(|(start, duration)| ExecutionSegment {
                segment: CalculatedSegment::from_template(&template, start, duration),
                target_asl: 1.5,
                pacing_curve: PacingCurve::Static,
            })
            .collect();
        ExecutionMapping {
            audio_plan: AudioPlan {
                bpm: 120,
                silence_markers: Vec::new(),
                ducking_enabled: false,
            },
            visual_density: segments
                .iter()
                .map(|s| VisualDensityMarker {
                    time_range: format!("{}-{}", s.segment.start_time, s.segment.end_time),
                    intensity: VisualIntensity::Med,
                })
                .collect(),
            edit_rhythm: EditRhythm { segments },
        }
    }

    #[test]
    fn applies_each_edit() {
        let mut exec = mapping();
        ExecutionEdit::SetBpm(90).apply_to(&mut exec).unwrap();
        ExecutionEdit::SetDuckingEnabled(true).apply_to(&mut exec).unwrap();
        ExecutionEdit::SetSegmentPacing { index: 1, curve: PacingCurve::ExpDecel }
            .apply_to(&mut exec)
            .unwrap();
        ExecutionEdit::SetSegmentIntensity { index: 0, intensity: VisualIntensity::High }
            .apply_to(&mut exec)
            .unwrap();
        ExecutionEdit::SetSegmentTargetAsl { index: 1, seconds: 0.8 }
            .apply_to(&mut exec)
            .unwrap();
        ExecutionEdit::AddSilenceMarker(TimeRange { start: 4.0, end: 4.5 })
            .apply_to(&mut exec)
            .unwrap();

        assert_eq!(exec.audio_plan.bpm, 90);
        assert!(exec.audio_plan.ducking_enabled);
        assert_eq!(exec.edit_rhythm.segments[1].pacing_curve, PacingCurve::ExpDecel);
        assert_eq!(exec.visual_density[0].intensity, VisualIntensity::High);
        assert_eq!(exec.edit_rhythm.segments[1].target_asl, 0.8);
        assert_eq!(exec.audio_plan.silence_markers.len(), 1);
    }

    #[test]
    fn out_of_bounds_leaves_mapping_untouched() {
        let mut exec = mapping();
        let before = exec.clone();
        let err = ExecutionEdit::SetSegmentIntensity { index: 2, intensity: VisualIntensity::High }
            .apply_to(&mut exec)
            .unwrap_err();

        assert_eq!(err, StateMachineError::IndexOutOfBounds { index: 2, len: 2 });
        assert_eq!(exec, before);
    }

    #[test]
    fn rejects_invalid_values() {
        let exec = mapping();
        assert!(ExecutionEdit::SetBpm(0).check(&exec).is_err());
        assert!(ExecutionEdit::SetSegmentTargetAsl { index: 0, seconds: 0.0 }.check(&exec).is_err());
        assert!(ExecutionEdit::SetSegmentTargetAsl { index: 0, seconds: f64::NAN }.check(&exec).is_err());
        assert!(ExecutionEdit::AddSilenceMarker(TimeRange { start: 3.0, end: 2.0 }).check(&exec).is_err());
        assert!(ExecutionEdit::AddSilenceMarker(TimeRange { start: 2.0, end: 2.0 }).check(&exec).is_ok());
    }

    #[test]
    fn command_names() {
        assert_eq!(ProjectCommand::RunValidation.name(), "RUN_VALIDATION");
        assert_eq!(
            ProjectCommand::UpdateExecution(ExecutionEdit::SetBpm(100)).name(),
            "UPDATE_EXECUTION"
        );
    }
}
