//! Production-readiness checks over an execution mapping
//!
//! Three independent checks run in a fixed order and accumulate signals:
//!
//! 1. **Hook Integrity**: a hook longer than the cap needs HIGH motion (FAIL)
//! 2. **Peak Presence**: at least one HIGH segment (WARNING)
//! 3. **Rhythm Integrity**: each shot length lands on a whole frame (INFO)
//!
//! INFO signals never change the global status. The report is rebuilt from
//! scratch on every call; nothing is patched incrementally.

use crate::audio::frame_drift;
use crate::config::ProductionConfig;
use crate::types::{
    ExecutionMapping, PlatformContext, SignalResult, ValidationCheck, ValidationReport,
    ValidationSignal, ValidationStatus, VisualIntensity,
};
use resonance_timeline::SegmentType;

/// Validate with the default configuration
#[must_use]
pub fn validate_execution(
    execution: &ExecutionMapping,
    platform_context: &PlatformContext,
) -> ValidationReport {
    validate_execution_with(execution, platform_context, &ProductionConfig::default())
}

/// Validate with explicit thresholds
///
/// The platform context is accepted for platform-specific rules; the
/// current checks do not depend on it.
#[must_use]
pub fn validate_execution_with(
    execution: &ExecutionMapping,
    _platform_context: &PlatformContext,
    config: &ProductionConfig,
) -> ValidationReport {
    let mut status = ValidationStatus::Pass;
    let mut signals = Vec::new();

    if let Some(signal) = hook_integrity(execution, config) {
        status = status.escalate(ValidationStatus::Fail);
        signals.push(signal);
    }

    if let Some(signal) = peak_presence(execution) {
        status = status.escalate(ValidationStatus::Warning);
        signals.push(signal);
    }

    signals.extend(rhythm_integrity(execution, config));

    tracing::debug!(
        status = ?status,
        signals = signals.len(),
        "execution validated"
    );

    ValidationReport {
        global_status: status,
        signals,
    }
}

fn hook_integrity(execution: &ExecutionMapping, config: &ProductionConfig) -> Option<ValidationSignal> {
    let index = execution
        .edit_rhythm
        .segments
        .iter()
        .position(|s| s.segment_type() == SegmentType::Hook)?;
    let hook = &execution.edit_rhythm.segments[index];
    let intensity = execution.visual_density.get(index).map(|d| d.intensity);

    if hook.duration() > config.hook_cap_seconds && intensity != Some(VisualIntensity::High) {
        return Some(ValidationSignal {
            check_name: ValidationCheck::HookIntegrity,
            result: SignalResult::Fail,
            message: "Hook is too long for low motion. Increase intensity to stop the scroll."
                .to_string(),
            segment_index: Some(index),
        });
    }
    None
}

fn peak_presence(execution: &ExecutionMapping) -> Option<ValidationSignal> {
    let has_peak = execution
        .visual_density
        .iter()
        .any(|d| d.intensity == VisualIntensity::High);
    if has_peak {
        return None;
    }
    Some(ValidationSignal {
        check_name: ValidationCheck::PeakPresence,
        result: SignalResult::Warning,
        message: "Flatline Structure: No Peak detected.".to_string(),
        segment_index: None,
    })
}

fn rhythm_integrity<'a>(
    execution: &'a ExecutionMapping,
    config: &'a ProductionConfig,
) -> impl Iterator<Item = ValidationSignal> + 'a {
    execution
        .edit_rhythm
        .segments
        .iter()
        .enumerate()
        .filter(move |(_, seg)| frame_drift(seg.target_asl, config.frame_rate) > config.drift_tolerance)
        .map(|(index, seg)| ValidationSignal {
            check_name: ValidationCheck::RhythmIntegrity,
            result: SignalResult::Info,
            message: format!(
                "Micro-drift detected in {}. Adjust BPM for perfect frame alignment.",
                seg.segment_type()
            ),
            segment_index: Some(index),
        })
}
