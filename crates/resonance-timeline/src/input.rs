//! Boundary normalisation
//!
//! Everything here runs before the engines: durations are clamped or
//! rejected, unknown structure ids fall back to the default structure.

use crate::catalog::{catalog, DEFAULT_STRUCTURE_ID};
use crate::error::InputError;
use crate::types::StructureTemplate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shortest supported duration, in seconds
pub const MIN_DURATION_SECONDS: u32 = 5;
/// Longest supported duration, in seconds
pub const MAX_DURATION_SECONDS: u32 = 180;
/// Duration used when nothing else is specified, in seconds
pub const DEFAULT_DURATION_SECONDS: u32 = 60;

/// Target duration guaranteed to lie in `5..=180` seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TargetDuration(u32);

impl TargetDuration {
    /// Strict constructor
    ///
    /// # Errors
    ///
    /// [`InputError::DurationOutOfRange`] outside `5..=180`.
    pub fn new(seconds: i64) -> Result<Self, InputError> {
        match u32::try_from(seconds) {
            Ok(s) if (MIN_DURATION_SECONDS..=MAX_DURATION_SECONDS).contains(&s) => Ok(Self(s)),
            _ => Err(InputError::DurationOutOfRange {
                seconds,
                min: MIN_DURATION_SECONDS,
                max: MAX_DURATION_SECONDS,
            }),
        }
    }

    /// Lenient constructor: clamps into range, logging when it had to
    #[must_use]
    pub fn clamped(seconds: i64) -> Self {
        let clamped = seconds.clamp(
            i64::from(MIN_DURATION_SECONDS),
            i64::from(MAX_DURATION_SECONDS),
        );
        if clamped != seconds {
            tracing::warn!(requested = seconds, clamped, "duration clamped into supported range");
        }
        // In range after the clamp above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self(clamped as u32)
    }

    /// Whole seconds
    #[inline]
    #[must_use]
    pub const fn seconds(self) -> u32 {
        self.0
    }
}

impl Default for TargetDuration {
    fn default() -> Self {
        Self(DEFAULT_DURATION_SECONDS)
    }
}

impl TryFrom<u32> for TargetDuration {
    type Error = InputError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<TargetDuration> for u32 {
    fn from(value: TargetDuration) -> Self {
        value.0
    }
}

impl fmt::Display for TargetDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Strict structure lookup
///
/// # Errors
///
/// [`InputError::UnknownStructure`] when the id is not in the catalog.
pub fn lookup_structure(id: &str) -> Result<&'static StructureTemplate, InputError> {
    catalog()
        .get_by_id(id)
        .ok_or_else(|| InputError::UnknownStructure(id.to_string()))
}

/// Lenient structure lookup, falling back to the default structure
///
/// # Panics
///
/// Only if the built-in catalog lacks its own default, which catalog tests
/// rule out.
#[must_use]
pub fn resolve_structure(id: &str) -> &'static StructureTemplate {
    if let Some(found) = catalog().get_by_id(id) {
        return found;
    }
    tracing::warn!(
        requested = id,
        fallback = DEFAULT_STRUCTURE_ID,
        "unknown structure id, using default"
    );
    catalog()
        .get_by_id(DEFAULT_STRUCTURE_ID)
        .unwrap_or_else(|| panic!("catalog is missing default structure `{DEFAULT_STRUCTURE_ID}`"))
}
