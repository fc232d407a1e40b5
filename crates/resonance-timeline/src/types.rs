//! Core timeline types
//!
//! Structure templates describe an emotional arc as percentages; calculated
//! segments carry the integer seconds produced by the partition engine.

use crate::error::InputError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Narrative function of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentType {
    /// Opening hook to capture attention
    Hook,
    /// Rising action building tension
    Build,
    /// Climactic peak moment
    Peak,
    /// Sustained energy plateau
    Sustain,
    /// Resolution and conclusion
    Resolve,
    /// Silence or pause for impact
    Break,
}

impl SegmentType {
    /// Upper-case label used in reports and serialized data
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hook => "HOOK",
            Self::Build => "BUILD",
            Self::Peak => "PEAK",
            Self::Sustain => "SUSTAIN",
            Self::Resolve => "RESOLVE",
            Self::Break => "BREAK",
        }
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cut rhythm guidance for a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CutSpeed {
    /// Fast-paced cutting
    Fast,
    /// Slow, deliberate cuts
    Slow,
    /// Accelerating rhythm
    Accel,
    /// Decelerating rhythm
    Decel,
    /// Steady rhythm
    Constant,
    /// Moderate rhythm, used under dialogue
    Moderate,
}

impl CutSpeed {
    /// Upper-case label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "FAST",
            Self::Slow => "SLOW",
            Self::Accel => "ACCEL",
            Self::Decel => "DECEL",
            Self::Constant => "CONSTANT",
            Self::Moderate => "MODERATE",
        }
    }
}

impl fmt::Display for CutSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fullness of the soundscape for a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SoundDensity {
    /// Complete silence
    Silence,
    /// Minimal sound elements
    Low,
    /// Moderate layering
    Med,
    /// Rich, full sound
    High,
    /// Maximum intensity
    Max,
}

impl SoundDensity {
    /// Upper-case label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Silence => "SILENCE",
            Self::Low => "LOW",
            Self::Med => "MED",
            Self::High => "HIGH",
            Self::Max => "MAX",
        }
    }

    /// HIGH or MAX
    #[inline]
    #[must_use]
    pub const fn is_high_energy(self) -> bool {
        matches!(self, Self::High | Self::Max)
    }
}

impl fmt::Display for SoundDensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a structure opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PacingStart {
    /// High energy opening
    Fast,
    /// Gentle opening
    Slow,
    /// Steady opening
    Constant,
}

/// Pacing rules attached to a structure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pacing {
    /// Opening energy
    pub start: PacingStart,
    /// Latest relative position of the peak (0.0 - 1.0)
    pub peak_position_max: f64,
    /// Whether silence is required before the peak
    pub silence_required: bool,
}

/// One segment of a structure template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentTemplate {
    /// Narrative function
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    /// Share of the total duration, in whole percent
    pub base_percentage: u32,
    /// Cut rhythm guidance
    pub cut_speed_guidance: CutSpeed,
    /// Sound density
    pub sound_density: SoundDensity,
}

impl SegmentTemplate {
    /// Create a segment template
    #[inline]
    #[must_use]
    pub const fn new(
        segment_type: SegmentType,
        base_percentage: u32,
        cut_speed_guidance: CutSpeed,
        sound_density: SoundDensity,
    ) -> Self {
        Self {
            segment_type,
            base_percentage,
            cut_speed_guidance,
            sound_density,
        }
    }
}

/// Named emotional structure
///
/// Percentages of a catalog template always sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureTemplate {
    /// Lower-case identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Purpose and best use case
    pub description: String,
    /// Pacing rules
    pub pacing: Pacing,
    /// Ordered segments
    pub segments: Vec<SegmentTemplate>,
}

impl StructureTemplate {
    /// Sum of segment percentages
    #[must_use]
    pub fn percentage_total(&self) -> u32 {
        self.segments.iter().map(|s| s.base_percentage).sum()
    }

    /// First segment of the given type
    #[must_use]
    pub fn position_of(&self, segment_type: SegmentType) -> Option<usize> {
        self.segments
            .iter()
            .position(|s| s.segment_type == segment_type)
    }
}

/// A segment with integer timing
///
/// `end_time == start_time + duration` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedSegment {
    /// Narrative function
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    /// Share of the total duration, in whole percent
    pub base_percentage: u32,
    /// Cut rhythm guidance
    pub cut_speed_guidance: CutSpeed,
    /// Sound density
    pub sound_density: SoundDensity,
    /// Whole seconds
    pub duration: u32,
    /// Seconds from the beginning
    pub start_time: u32,
    /// Seconds from the beginning
    pub end_time: u32,
}

impl CalculatedSegment {
    /// Attach timing to a template segment
    #[must_use]
    pub const fn from_template(template: &SegmentTemplate, start_time: u32, duration: u32) -> Self {
        Self {
            segment_type: template.segment_type,
            base_percentage: template.base_percentage,
            cut_speed_guidance: template.cut_speed_guidance,
            sound_density: template.sound_density,
            duration,
            start_time,
            end_time: start_time + duration,
        }
    }
}

/// Distribution platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// TikTok
    #[serde(rename = "TikTok")]
    TikTok,
    /// Instagram Reels
    #[serde(rename = "Instagram")]
    Instagram,
    /// Standard YouTube
    #[serde(rename = "YouTube")]
    YouTube,
    /// YouTube Shorts
    #[serde(rename = "YouTube Shorts")]
    YouTubeShorts,
    /// LinkedIn
    #[serde(rename = "LinkedIn")]
    LinkedIn,
}

impl Platform {
    /// All platforms in display order
    pub const ALL: [Platform; 5] = [
        Self::TikTok,
        Self::Instagram,
        Self::YouTube,
        Self::YouTubeShorts,
        Self::LinkedIn,
    ];

    /// Display name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TikTok => "TikTok",
            Self::Instagram => "Instagram",
            Self::YouTube => "YouTube",
            Self::YouTubeShorts => "YouTube Shorts",
            Self::LinkedIn => "LinkedIn",
        }
    }

    /// Vertical short-form feeds where the first seconds decide retention
    #[inline]
    #[must_use]
    pub const fn is_short_form(self) -> bool {
        matches!(self, Self::TikTok | Self::Instagram | Self::YouTubeShorts)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "tiktok" => Ok(Self::TikTok),
            "instagram" => Ok(Self::Instagram),
            "youtube" => Ok(Self::YouTube),
            "youtubeshorts" | "shorts" => Ok(Self::YouTubeShorts),
            "linkedin" => Ok(Self::LinkedIn),
            _ => Err(InputError::UnknownPlatform(s.to_string())),
        }
    }
}

/// Conflict severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Advisory only
    Warning,
    /// Disables downstream commit actions
    Block,
}

/// Known configuration incompatibilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictCode {
    /// Low-energy structure on a high-dopamine feed
    BoredomProtocol,
    /// Shorts over the platform length limit
    ShortsLimit,
    /// Multi-peak structure squeezed into too few seconds
    WaveCompression,
}

impl ConflictCode {
    /// Upper-case code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BoredomProtocol => "BOREDOM_PROTOCOL",
            Self::ShortsLimit => "SHORTS_LIMIT",
            Self::WaveCompression => "WAVE_COMPRESSION",
        }
    }
}

impl fmt::Display for ConflictCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detected incompatibility between duration, structure and platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Stable code
    pub code: ConflictCode,
    /// Severity
    pub severity: Severity,
    /// What is wrong
    pub message: String,
    /// How to fix it
    pub fix: String,
}

impl Conflict {
    /// Whether this conflict disables commit actions
    #[inline]
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Block
    }
}

/// Retention quality of a timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    /// Score in `0..=100`
    pub total_score: u8,
    /// One message per triggered deduction, in check order
    pub feedback: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_display_names() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn platform_parse_is_lenient_on_case_and_separators() {
        assert_eq!("youtube-shorts".parse::<Platform>().unwrap(), Platform::YouTubeShorts);
        assert_eq!("TIKTOK".parse::<Platform>().unwrap(), Platform::TikTok);
        assert!(matches!(
            "myspace".parse::<Platform>(),
            Err(InputError::UnknownPlatform(_))
        ));
    }

    #[test]
    fn short_form_platforms() {
        assert!(Platform::TikTok.is_short_form());
        assert!(Platform::Instagram.is_short_form());
        assert!(Platform::YouTubeShorts.is_short_form());
        assert!(!Platform::YouTube.is_short_form());
        assert!(!Platform::LinkedIn.is_short_form());
    }

    #[test]
    fn calculated_segment_end_time() {
        let template = SegmentTemplate::new(SegmentType::Hook, 15, CutSpeed::Fast, SoundDensity::Med);
        let seg = CalculatedSegment::from_template(&template, 4, 9);
        assert_eq!(seg.end_time, 13);
        assert_eq!(seg.segment_type, SegmentType::Hook);
    }

    #[test]
    fn segment_serializes_with_type_key() {
        let template = SegmentTemplate::new(SegmentType::Peak, 10, CutSpeed::Fast, SoundDensity::Max);
        let json = serde_json::to_value(template).unwrap();
        assert_eq!(json["type"], "PEAK");
        assert_eq!(json["basePercentage"], 10);
        assert_eq!(json["cutSpeedGuidance"], "FAST");
        assert_eq!(json["soundDensity"], "MAX");
    }
}
