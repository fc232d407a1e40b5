//! Resonance Project
//!
//! Production planning on top of a computed timeline. A project moves
//! between two states:
//!
//! - **UNLOCKED**: no blueprint; only outcomes can be logged
//! - **LOCKED**: a frozen [`Blueprint`], a mutable [`ExecutionMapping`] and
//!   a [`ValidationReport`] that is recomputed after every edit
//!
//! All transitions go through [`ProjectStateMachine::apply`], which never
//! fails: illegal commands return the project unchanged. Hosts with many
//! writers share a [`ProjectStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use resonance_project::{ExecutionEdit, PlatformContext, ProjectCommand, ProjectStateMachine};
//! use resonance_timeline::{plan, Platform, TargetDuration, TimelineRequest};
//!
//! let plan = plan(&TimelineRequest::new(TargetDuration::new(60)?, "surge", Platform::TikTok));
//! let machine = ProjectStateMachine::default();
//!
//! let project = machine.apply_all(&machine.new_project(), [
//!     ProjectCommand::LockBlueprint {
//!         phase1: plan.to_phase1_data(),
//!         platform_context: PlatformContext::for_plan(&plan),
//!     },
//!     ProjectCommand::UpdateExecution(ExecutionEdit::SetBpm(96)),
//! ]);
//! assert!(project.is_locked());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod audio;
pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod persist;
pub mod state_machine;
pub mod store;
pub mod types;
pub mod validation;

// Re-exports
pub use audio::{frame_drift, frames_per_beat};
pub use clock::{Clock, IdGenerator, RandomIds, SystemClock};
pub use command::{ExecutionEdit, ProjectCommand};
pub use config::{AslTable, OutcomePolicy, ProductionConfig};
pub use error::{
    ConfigError, OutcomeError, PersistError, ProjectError, Result, StateMachineError,
};
pub use persist::{load_project, read_project, save_project, ProjectDocument, ProjectLayers};
pub use state_machine::{ProductionPlan, Project, ProjectState, ProjectStateMachine};
pub use store::ProjectStore;
pub use types::{
    AudioPlan, Blueprint, BlueprintId, EditRhythm, ExecutionMapping, ExecutionSegment,
    OutcomeLog, PacingCurve, PlatformContext, ProjectMeta, SafeZones, SignalResult, TimeRange,
    ValidationCheck, ValidationReport, ValidationSignal, ValidationStatus, VisualDensityMarker,
    VisualIntensity, PROJECT_FORMAT_VERSION,
};
pub use validation::{validate_execution, validate_execution_with};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
