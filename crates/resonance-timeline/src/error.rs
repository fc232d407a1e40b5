//! Error types for the timeline crate
//!
//! Two concerns surface errors here:
//! - Catalog authoring bugs (caught once, at catalog load)
//! - Boundary input that could not be normalised

/// Main timeline error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    /// Structure catalog failed validation
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Boundary input rejected
    #[error("input error: {0}")]
    Input(#[from] InputError),
}

/// Structure catalog authoring errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Segment percentages do not sum to 100
    #[error("structure `{id}` segment percentages sum to {total}, expected 100")]
    PercentageSum {
        /// Offending structure id
        id: String,
        /// Actual percentage total
        total: u32,
    },

    /// Template carries no segments
    #[error("structure `{0}` has no segments")]
    Empty(String),

    /// Two templates share an id (ids are compared case-insensitively)
    #[error("duplicate structure id `{0}`")]
    DuplicateId(String),
}

/// Boundary input errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// Duration outside the supported window
    #[error("duration {seconds}s outside supported range {min}..={max}s")]
    DurationOutOfRange {
        /// Requested seconds
        seconds: i64,
        /// Lower bound
        min: u32,
        /// Upper bound
        max: u32,
    },

    /// Platform name not recognised
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    /// Structure id not present in the catalog
    #[error("unknown structure: {0}")]
    UnknownStructure(String),
}

/// Result alias for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;
