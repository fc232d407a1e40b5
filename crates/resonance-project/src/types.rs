//! Production-planning data model
//!
//! Four layers hang off a project:
//! 1. **Blueprint** (frozen): the committed timeline and platform context
//! 2. **Execution mapping** (mutable): pacing, visual density and audio plan
//! 3. **Validation report** (computed): readiness signals for the mapping
//! 4. **Outcome log** (independent): what happened after publishing

use crate::error::OutcomeError;
use chrono::{DateTime, Utc};
use resonance_timeline::{CalculatedSegment, Phase1Data, Phase1Plan, Platform, SegmentType};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Layer 1: Blueprint
// ============================================================================

/// Opaque unique blueprint token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlueprintId(pub Uuid);

impl BlueprintId {
    /// Random id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlueprintId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlueprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Platform UI margins, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SafeZones {
    /// Top margin
    pub top: u32,
    /// Bottom margin
    pub bottom: u32,
    /// Left margin
    pub left: u32,
    /// Right margin
    pub right: u32,
}

/// Where the video will be published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformContext {
    /// Target platform
    pub platform_id: Platform,
    /// Committed duration, in seconds
    pub max_duration: u32,
    /// UI margins
    pub safe_zones: SafeZones,
}

impl PlatformContext {
    /// Context with empty safe zones
    #[must_use]
    pub fn new(platform_id: Platform, max_duration: u32) -> Self {
        Self {
            platform_id,
            max_duration,
            safe_zones: SafeZones::default(),
        }
    }

    /// Context for a phase-1 plan: its platform and target duration
    #[must_use]
    pub fn for_plan(plan: &Phase1Plan) -> Self {
        Self::new(plan.request.platform, plan.request.duration.seconds())
    }
}

/// Frozen snapshot that begins production planning
///
/// Created once per lock and never modified; only read accessors exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    id: BlueprintId,
    timestamp: DateTime<Utc>,
    platform_context: PlatformContext,
    phase1_data: Phase1Data,
}

impl Blueprint {
    pub(crate) fn new(
        id: BlueprintId,
        timestamp: DateTime<Utc>,
        platform_context: PlatformContext,
        phase1_data: Phase1Data,
    ) -> Self {
        Self {
            id,
            timestamp,
            platform_context,
            phase1_data,
        }
    }

    /// Unique token
    #[must_use]
    pub fn id(&self) -> BlueprintId {
        self.id
    }

    /// When the blueprint was locked
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Platform context at lock time
    #[must_use]
    pub fn platform_context(&self) -> &PlatformContext {
        &self.platform_context
    }

    /// Structure and timeline at lock time
    #[must_use]
    pub fn phase1_data(&self) -> &Phase1Data {
        &self.phase1_data
    }
}

// ============================================================================
// Layer 2: Execution mapping
// ============================================================================

/// Shot-length curve across a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PacingCurve {
    /// Constant shot length
    #[default]
    Static,
    /// Shots shorten linearly
    LinearAccel,
    /// Shots lengthen exponentially
    ExpDecel,
}

impl PacingCurve {
    /// Upper-case label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "STATIC",
            Self::LinearAccel => "LINEAR_ACCEL",
            Self::ExpDecel => "EXP_DECEL",
        }
    }
}

impl std::str::FromStr for PacingCurve {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "STATIC" => Ok(Self::Static),
            "LINEAR_ACCEL" => Ok(Self::LinearAccel),
            "EXP_DECEL" => Ok(Self::ExpDecel),
            _ => Err(format!("unknown pacing curve: {s}")),
        }
    }
}

/// On-screen motion level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisualIntensity {
    /// Little motion
    Low,
    /// Moderate motion
    #[default]
    Med,
    /// High motion
    High,
}

impl VisualIntensity {
    /// Upper-case label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Med => "MED",
            Self::High => "HIGH",
        }
    }
}

impl std::str::FromStr for VisualIntensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MED" | "MEDIUM" => Ok(Self::Med),
            "HIGH" => Ok(Self::High),
            _ => Err(format!("unknown visual intensity: {s}")),
        }
    }
}

/// Calculated segment plus shot-level pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSegment {
    /// Segment timing from the blueprint
    #[serde(flatten)]
    pub segment: CalculatedSegment,
    /// Average shot length, in seconds
    #[serde(rename = "targetASL")]
    pub target_asl: f64,
    /// Shot-length curve
    #[serde(rename = "pacingCurve")]
    pub pacing_curve: PacingCurve,
}

impl ExecutionSegment {
    /// Narrative function
    #[inline]
    #[must_use]
    pub fn segment_type(&self) -> SegmentType {
        self.segment.segment_type
    }

    /// Whole seconds
    #[inline]
    #[must_use]
    pub fn duration(&self) -> u32 {
        self.segment.duration
    }
}

/// Span in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start, in seconds
    pub start: f64,
    /// End, in seconds
    pub end: f64,
}

/// Audio grid and mixing plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioPlan {
    /// Beats per minute
    pub bpm: u32,
    /// Deliberate silences
    pub silence_markers: Vec<TimeRange>,
    /// Duck music under dialogue
    pub ducking_enabled: bool,
}

/// Edit rhythm layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRhythm {
    /// One entry per blueprint segment
    pub segments: Vec<ExecutionSegment>,
}

/// Visual density for one segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualDensityMarker {
    /// `"start-end"` in seconds
    pub time_range: String,
    /// Motion level
    pub intensity: VisualIntensity,
}

/// Mutable production plan layered on a blueprint
///
/// `visual_density` is aligned by index with `edit_rhythm.segments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionMapping {
    /// Audio plan
    pub audio_plan: AudioPlan,
    /// Per-segment pacing
    pub edit_rhythm: EditRhythm,
    /// Per-segment motion level
    pub visual_density: Vec<VisualDensityMarker>,
}

impl ExecutionMapping {
    /// Number of segments
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.edit_rhythm.segments.len()
    }

    /// Whether density entries line up with segments
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.visual_density.len() == self.edit_rhythm.segments.len()
    }
}

// ============================================================================
// Layer 3: Validation report
// ============================================================================

/// Overall readiness, ordered so that the worst status is the maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    /// Ready
    #[default]
    Pass,
    /// Advisory issues
    Warning,
    /// Must be fixed
    Fail,
}

impl ValidationStatus {
    /// Raise to `other` if it is worse; never lowers
    #[inline]
    #[must_use]
    pub fn escalate(self, other: Self) -> Self {
        self.max(other)
    }
}

/// Outcome of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalResult {
    /// Check passed
    Pass,
    /// Advisory
    Warning,
    /// Blocking
    Fail,
    /// Informational, never affects status
    Info,
}

/// Named production-readiness checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationCheck {
    /// Long hooks need high motion
    #[serde(rename = "Hook Integrity")]
    HookIntegrity,
    /// At least one high-motion segment
    #[serde(rename = "Peak Presence")]
    PeakPresence,
    /// Shot lengths land on whole frames
    #[serde(rename = "Rhythm Integrity")]
    RhythmIntegrity,
}

impl ValidationCheck {
    /// Display name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HookIntegrity => "Hook Integrity",
            Self::PeakPresence => "Peak Presence",
            Self::RhythmIntegrity => "Rhythm Integrity",
        }
    }
}

impl fmt::Display for ValidationCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSignal {
    /// Which check produced it
    pub check_name: ValidationCheck,
    /// Result
    pub result: SignalResult,
    /// Human-readable explanation
    pub message: String,
    /// Segment concerned, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_index: Option<usize>,
}

/// Computed assessment of an execution mapping
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Worst status across checks
    pub global_status: ValidationStatus,
    /// Findings in check order
    pub signals: Vec<ValidationSignal>,
}

// ============================================================================
// Layer 4: Outcome log
// ============================================================================

/// Post-publication record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeLog {
    /// Whether the video was published
    pub posted: bool,
    /// Where it was published
    pub platform: String,
    /// Viewers still watching at 3 seconds, percent
    #[serde(rename = "retention3s")]
    pub retention_3s: u8,
    /// Self-reported confidence, 1-5
    pub user_confidence: u8,
    /// Where viewers dropped off, free-form timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_off_timestamp: Option<String>,
    /// When the record was written
    pub logged_at: DateTime<Utc>,
}

impl OutcomeLog {
    /// Check ranges
    ///
    /// # Errors
    ///
    /// [`OutcomeError`] when retention exceeds 100 or confidence is outside 1-5.
    pub fn validate(&self) -> Result<(), OutcomeError> {
        if self.retention_3s > 100 {
            return Err(OutcomeError::RetentionOutOfRange(self.retention_3s));
        }
        if !(1..=5).contains(&self.user_confidence) {
            return Err(OutcomeError::ConfidenceOutOfRange(self.user_confidence));
        }
        Ok(())
    }
}

// ============================================================================
// Project metadata
// ============================================================================

/// Project format version written into documents
pub const PROJECT_FORMAT_VERSION: &str = "2.0.0";

/// Document metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    /// Format version
    pub version: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl ProjectMeta {
    /// Metadata for a project created at `created_at`
    #[must_use]
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            version: PROJECT_FORMAT_VERSION.to_string(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn outcome(retention_3s: u8, user_confidence: u8) -> OutcomeLog {
        OutcomeLog {
            posted: true,
            platform: "TikTok".to_string(),
            retention_3s,
            user_confidence,
            drop_off_timestamp: None,
            logged_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn status_escalation_never_downgrades() {
        assert_eq!(ValidationStatus::Pass.escalate(ValidationStatus::Warning), ValidationStatus::Warning);
        assert_eq!(ValidationStatus::Fail.escalate(ValidationStatus::Warning), ValidationStatus::Fail);
        assert_eq!(ValidationStatus::Warning.escalate(ValidationStatus::Pass), ValidationStatus::Warning);
    }

    #[test]
    fn outcome_ranges() {
        assert!(outcome(100, 1).validate().is_ok());
        assert!(outcome(0, 5).validate().is_ok());
        assert_eq!(outcome(101, 3).validate(), Err(OutcomeError::RetentionOutOfRange(101)));
        assert_eq!(outcome(50, 0).validate(), Err(OutcomeError::ConfidenceOutOfRange(0)));
        assert_eq!(outcome(50, 6).validate(), Err(OutcomeError::ConfidenceOutOfRange(6)));
    }

    #[test]
    fn outcome_wire_names() {
        let json = serde_json::to_value(outcome(42, 4)).unwrap();
        assert_eq!(json["retention3s"], 42);
        assert_eq!(json["userConfidence"], 4);
        assert!(json.get("dropOffTimestamp").is_none());
    }

    #[test]
    fn check_names_serialize_as_display() {
        let json = serde_json::to_value(ValidationCheck::HookIntegrity).unwrap();
        assert_eq!(json, "Hook Integrity");
    }

    #[test]
    fn parse_edit_values() {
        assert_eq!("linear-accel".parse::<PacingCurve>().unwrap(), PacingCurve::LinearAccel);
        assert_eq!("high".parse::<VisualIntensity>().unwrap(), VisualIntensity::High);
        assert!("loud".parse::<VisualIntensity>().is_err());
    }
}
