//! Error types for the project crate
//!
//! The reducer itself never fails; these errors surface from strict
//! pre-dispatch checks, configuration loading, outcome validation and
//! document persistence.

use resonance_timeline::TimelineError;

/// Main project error type
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Command rejected by a strict check
    #[error("state machine error: {0}")]
    StateMachine(#[from] StateMachineError),

    /// Outcome record out of range
    #[error("outcome error: {0}")]
    Outcome(#[from] OutcomeError),

    /// Configuration invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Document could not be saved or restored
    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),

    /// Timeline boundary error
    #[error("timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Project file could not be read
    #[error("failed to read project: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a command would be ignored by the reducer
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateMachineError {
    /// Command needs a live blueprint
    #[error("no blueprint is locked")]
    NotLocked,

    /// Lock requested while a blueprint is live
    #[error("blueprint already locked; unlock first")]
    AlreadyLocked,

    /// Segment index outside the execution plan
    #[error("segment index {index} out of bounds (segments: {len})")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Segment count
        len: usize,
    },

    /// Edit value rejected
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Edited field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// Outcome record rejected
    #[error("invalid outcome: {0}")]
    InvalidOutcome(#[from] OutcomeError),
}

/// Outcome record range errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutcomeError {
    /// Retention percentage above 100
    #[error("3-second retention {0}% outside 0..=100")]
    RetentionOutOfRange(u8),

    /// Confidence outside the 1-5 scale
    #[error("user confidence {0} outside 1..=5")]
    ConfidenceOutOfRange(u8),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration file could not be read
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Value outside its valid range
    #[error("invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it is invalid
        reason: String,
    },
}

/// Persistence errors
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// JSON encoding or decoding failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Blueprint, execution and validation must be jointly present or absent
    #[error("blueprint, execution and validation layers are partially present")]
    PartialLayers,

    /// Visual density does not line up with edit rhythm
    #[error("visual density has {density} entries for {segments} segments")]
    MisalignedDensity {
        /// Visual density entries
        density: usize,
        /// Execution segments
        segments: usize,
    },

    /// Document written by an incompatible format version
    #[error("unsupported project version {0}")]
    UnsupportedVersion(String),

    /// Stored outcome outside its ranges
    #[error("stored outcome rejected: {0}")]
    InvalidOutcome(#[from] OutcomeError),

    /// Stored execution value no edit could have written
    #[error("stored execution rejected: {0}")]
    InvalidExecution(StateMachineError),

    /// Execution and blueprint timeline differ in length
    #[error("execution has {execution} segments, blueprint timeline has {blueprint}")]
    SegmentCountMismatch {
        /// Execution segments
        execution: usize,
        /// Blueprint timeline segments
        blueprint: usize,
    },

    /// Execution segment timing differs from the frozen timeline
    #[error("execution segment {0} drifted from the blueprint timeline")]
    TimelineDrift(usize),
}

/// Result alias for project operations
pub type Result<T> = std::result::Result<T, ProjectError>;
