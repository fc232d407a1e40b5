//! Production configuration
//!
//! Every constant the execution layer depends on lives here so hosts can
//! tune them from a TOML file. Defaults reproduce the stock behaviour.
//!
//! ```toml
//! frame_rate = 30
//! drift_tolerance = 0.001
//! hook_cap_seconds = 3
//! default_bpm = 120
//! fallback_asl = 2.5
//! outcome_on_unlock = "retain"
//!
//! [target_asl]
//! hook = 1.5
//! peak = 0.8
//! ```

use crate::error::ConfigError;
use resonance_timeline::SegmentType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What unlocking does to a logged outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomePolicy {
    /// Outcome history survives unlock
    #[default]
    Retain,
    /// Unlock also clears the outcome
    Clear,
}

/// Average shot length per segment type, in seconds
///
/// Keys missing from a TOML table keep their defaults; entries set to
/// `None` fall back to [`ProductionConfig::fallback_asl`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AslTable {
    /// HOOK
    pub hook: Option<f64>,
    /// BUILD
    pub build: Option<f64>,
    /// PEAK
    pub peak: Option<f64>,
    /// SUSTAIN
    pub sustain: Option<f64>,
    /// RESOLVE
    pub resolve: Option<f64>,
    /// BREAK
    #[serde(rename = "break")]
    pub break_: Option<f64>,
}

impl AslTable {
    /// Table with no entries
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            hook: None,
            build: None,
            peak: None,
            sustain: None,
            resolve: None,
            break_: None,
        }
    }

    /// Entry for a segment type
    #[must_use]
    pub const fn get(&self, segment_type: SegmentType) -> Option<f64> {
        match segment_type {
            SegmentType::Hook => self.hook,
            SegmentType::Build => self.build,
            SegmentType::Peak => self.peak,
            SegmentType::Sustain => self.sustain,
            SegmentType::Resolve => self.resolve,
            SegmentType::Break => self.break_,
        }
    }

    /// Replace the entry for a segment type
    #[must_use]
    pub fn with(mut self, segment_type: SegmentType, seconds: Option<f64>) -> Self {
        let slot = match segment_type {
            SegmentType::Hook => &mut self.hook,
            SegmentType::Build => &mut self.build,
            SegmentType::Peak => &mut self.peak,
            SegmentType::Sustain => &mut self.sustain,
            SegmentType::Resolve => &mut self.resolve,
            SegmentType::Break => &mut self.break_,
        };
        *slot = seconds;
        self
    }

    fn entries(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("target_asl.hook", self.hook),
            ("target_asl.build", self.build),
            ("target_asl.peak", self.peak),
            ("target_asl.sustain", self.sustain),
            ("target_asl.resolve", self.resolve),
            ("target_asl.break", self.break_),
        ]
    }
}

impl Default for AslTable {
    fn default() -> Self {
        Self {
            hook: Some(1.5),
            build: Some(2.0),
            peak: Some(0.8),
            sustain: Some(3.0),
            resolve: Some(4.0),
            break_: Some(5.0),
        }
    }
}

/// Execution-layer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionConfig {
    /// Frames per second for rhythm checks
    pub frame_rate: u32,
    /// Allowed distance from a whole frame
    pub drift_tolerance: f64,
    /// Hooks longer than this need high motion
    pub hook_cap_seconds: u32,
    /// Initial audio grid
    pub default_bpm: u32,
    /// Initial average shot length per segment type
    pub target_asl: AslTable,
    /// Average shot length for unmapped types
    pub fallback_asl: f64,
    /// Outcome handling on unlock
    pub outcome_on_unlock: OutcomePolicy,
}

impl ProductionConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With frame rate
    #[inline]
    #[must_use]
    pub fn with_frame_rate(mut self, fps: u32) -> Self {
        self.frame_rate = fps;
        self
    }

    /// With drift tolerance
    #[inline]
    #[must_use]
    pub fn with_drift_tolerance(mut self, tolerance: f64) -> Self {
        self.drift_tolerance = tolerance;
        self
    }

    /// With hook cap
    #[inline]
    #[must_use]
    pub fn with_hook_cap_seconds(mut self, seconds: u32) -> Self {
        self.hook_cap_seconds = seconds;
        self
    }

    /// With initial BPM
    #[inline]
    #[must_use]
    pub fn with_default_bpm(mut self, bpm: u32) -> Self {
        self.default_bpm = bpm;
        self
    }

    /// With ASL table
    #[inline]
    #[must_use]
    pub fn with_target_asl(mut self, table: AslTable) -> Self {
        self.target_asl = table;
        self
    }

    /// With fallback ASL
    #[inline]
    #[must_use]
    pub fn with_fallback_asl(mut self, seconds: f64) -> Self {
        self.fallback_asl = seconds;
        self
    }

    /// With outcome policy
    #[inline]
    #[must_use]
    pub fn with_outcome_on_unlock(mut self, policy: OutcomePolicy) -> Self {
        self.outcome_on_unlock = policy;
        self
    }

    /// Initial average shot length for a segment type
    #[must_use]
    pub fn asl_for(&self, segment_type: SegmentType) -> f64 {
        self.target_asl.get(segment_type).unwrap_or(self.fallback_asl)
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed TOML, [`ConfigError::Invalid`]
    /// on out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "production config loaded");
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 {
            return Err(invalid("frame_rate", "must be positive"));
        }
        if self.default_bpm == 0 {
            return Err(invalid("default_bpm", "must be positive"));
        }
        if !self.drift_tolerance.is_finite() || self.drift_tolerance < 0.0 {
            return Err(invalid("drift_tolerance", "must be finite and non-negative"));
        }
        if !is_positive(self.fallback_asl) {
            return Err(invalid("fallback_asl", "must be finite and positive"));
        }
        for (field, value) in self.target_asl.entries() {
            if let Some(seconds) = value {
                if !is_positive(seconds) {
                    return Err(invalid(field, "must be finite and positive"));
                }
            }
        }
        Ok(())
    }
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30,
            drift_tolerance: 0.001,
            hook_cap_seconds: 3,
            default_bpm: 120,
            target_asl: AslTable::default(),
            fallback_asl: 2.5,
            outcome_on_unlock: OutcomePolicy::Retain,
        }
    }
}

pub(crate) fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
