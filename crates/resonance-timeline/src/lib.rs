//! Resonance Timeline
//!
//! Turns a target duration, an emotional structure and a platform into an
//! exact-second timeline, then grades it.
//!
//! # Core Concepts
//!
//! - [`StructureCatalog`]: the seven immutable structure templates
//! - [`partition`]: Largest Remainder apportionment with the short-form hook clamp
//! - [`apply_dialogue_constraints`]: caps density and cut speed under speech
//! - [`validate_configuration`]: platform/structure conflicts
//! - [`calculate_quality`]: retention score and feedback
//! - [`plan`]: all of the above for one [`TimelineRequest`]
//!
//! # Example
//!
//! ```rust
//! use resonance_timeline::{get_by_id, partition, Platform};
//!
//! let surge = get_by_id("surge").unwrap();
//! let timeline = partition(60, surge, Some(Platform::TikTok));
//!
//! assert_eq!(timeline[0].duration, 3);
//! assert_eq!(timeline.iter().map(|s| s.duration).sum::<u32>(), 60);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod catalog;
pub mod dialogue;
pub mod error;
pub mod input;
pub mod partition;
pub mod plan;
pub mod quality;
pub mod render;
pub mod rules;
pub mod types;

// Re-exports
pub use catalog::{
    catalog, get_by_id, validate_template, StructureCatalog, DEFAULT_STRUCTURE_ID, STRUCTURE_COUNT,
};
pub use dialogue::apply_dialogue_constraints;
pub use error::{CatalogError, InputError, Result, TimelineError};
pub use input::{
    lookup_structure, resolve_structure, TargetDuration, DEFAULT_DURATION_SECONDS,
    MAX_DURATION_SECONDS, MIN_DURATION_SECONDS,
};
pub use partition::{
    apportion, partition, timeline_sum, validate_timeline_sum, Apportionment, SHORT_FORM_HOOK_CAP,
};
pub use plan::{plan, Phase1Data, Phase1Plan, TimelineRequest};
pub use quality::calculate_quality;
pub use render::render_timeline;
pub use rules::{has_blocking, validate_configuration};
pub use types::{
    CalculatedSegment, Conflict, ConflictCode, CutSpeed, Pacing, PacingStart, Platform,
    QualityReport, SegmentTemplate, SegmentType, Severity, SoundDensity, StructureTemplate,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
