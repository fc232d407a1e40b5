//! Phase-1 planning
//!
//! Composes the engines the way the configuration dashboard consumes them:
//! the dialogue modifier feeds the partition engine, the rules engine sees
//! the structure id, and the quality scorer grades the final timeline.

use crate::dialogue::apply_dialogue_constraints;
use crate::error::Result;
use crate::input::{lookup_structure, resolve_structure, TargetDuration};
use crate::partition::partition;
use crate::quality::calculate_quality;
use crate::rules::{has_blocking, validate_configuration};
use crate::types::{CalculatedSegment, Conflict, Platform, QualityReport, StructureTemplate};
use serde::{Deserialize, Serialize};

/// User parameters for a timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRequest {
    /// Target duration
    pub duration: TargetDuration,
    /// Structure id (case-insensitive)
    pub structure_id: String,
    /// Distribution platform
    pub platform: Platform,
    /// Whether the content carries speech
    pub has_dialogue: bool,
}

impl TimelineRequest {
    /// Create a request without dialogue
    #[must_use]
    pub fn new(duration: TargetDuration, structure_id: impl Into<String>, platform: Platform) -> Self {
        Self {
            duration,
            structure_id: structure_id.into(),
            platform,
            has_dialogue: false,
        }
    }

    /// Request from raw boundary values, rejecting instead of normalising
    ///
    /// The structure id is kept as given; lookup stays case-insensitive.
    ///
    /// # Errors
    ///
    /// [`TimelineError::Input`](crate::TimelineError::Input) for a duration
    /// outside `5..=180` or a structure id missing from the catalog.
    pub fn strict(seconds: i64, structure_id: &str, platform: Platform) -> Result<Self> {
        let duration = TargetDuration::new(seconds)?;
        lookup_structure(structure_id)?;
        Ok(Self::new(duration, structure_id, platform))
    }

    /// Set the dialogue flag
    #[must_use]
    pub fn with_dialogue(mut self, has_dialogue: bool) -> Self {
        self.has_dialogue = has_dialogue;
        self
    }
}

/// Structure and timeline frozen into a blueprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase1Data {
    /// Structure after dialogue constraints
    pub structure: StructureTemplate,
    /// Calculated timeline
    pub timeline: Vec<CalculatedSegment>,
}

/// Everything derived from a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase1Plan {
    /// The request this plan answers
    pub request: TimelineRequest,
    /// Structure after fallback and dialogue constraints
    pub structure: StructureTemplate,
    /// Calculated timeline
    pub timeline: Vec<CalculatedSegment>,
    /// Rule conflicts
    pub conflicts: Vec<Conflict>,
    /// Retention score
    pub quality: QualityReport,
}

impl Phase1Plan {
    /// A BLOCK conflict disables locking the plan
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        has_blocking(&self.conflicts)
    }

    /// Payload for locking a blueprint
    #[must_use]
    pub fn to_phase1_data(&self) -> Phase1Data {
        Phase1Data {
            structure: self.structure.clone(),
            timeline: self.timeline.clone(),
        }
    }
}

/// Derive a full plan from user parameters
///
/// Unknown structure ids fall back to the default structure (with a
/// warning). Conflicts are evaluated on the resolved structure id; the
/// timeline uses the dialogue-modified template.
#[must_use]
pub fn plan(request: &TimelineRequest) -> Phase1Plan {
    let base = resolve_structure(&request.structure_id);
    let structure = if request.has_dialogue {
        apply_dialogue_constraints(base)
    } else {
        base.clone()
    };

    let timeline = partition(request.duration.seconds(), &structure, Some(request.platform));
    let conflicts = validate_configuration(request.duration.seconds(), &base.id, request.platform);
    let quality = calculate_quality(&timeline, request.platform);

    tracing::debug!(
        structure = %structure.id,
        duration = request.duration.seconds(),
        platform = %request.platform,
        score = quality.total_score,
        conflicts = conflicts.len(),
        "phase-1 plan computed"
    );

    Phase1Plan {
        request: request.clone(),
        structure,
        timeline,
        conflicts,
        quality,
    }
}
