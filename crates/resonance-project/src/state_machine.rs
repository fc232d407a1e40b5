//! Project state machine
//!
//! A project is either UNLOCKED (no blueprint) or LOCKED (blueprint,
//! execution mapping and validation report all present). [`ProductionPlan`]
//! keeps the three locked layers together so a partially locked project
//! cannot be represented.
//!
//! [`ProjectStateMachine::apply`] is a total function: every command yields
//! a new project value, and illegal commands yield an unchanged copy. Callers
//! that need to know why a command would be ignored use
//! [`ProjectStateMachine::check`] first.
//!
//! # Transitions
//!
//! | command            | from      | to        |
//! |--------------------|-----------|-----------|
//! | `LockBlueprint`    | UNLOCKED  | LOCKED    |
//! | `UpdateExecution`  | LOCKED    | LOCKED    |
//! | `RunValidation`    | LOCKED    | LOCKED    |
//! | `LogOutcome`       | any       | unchanged |
//! | `UnlockBlueprint`  | LOCKED    | UNLOCKED  |

use crate::clock::{Clock, IdGenerator, RandomIds, SystemClock};
use crate::command::ProjectCommand;
use crate::config::{OutcomePolicy, ProductionConfig};
use crate::error::StateMachineError;
use crate::types::{
    AudioPlan, Blueprint, EditRhythm, ExecutionMapping, ExecutionSegment, OutcomeLog,
    PacingCurve, PlatformContext, ProjectMeta, ValidationReport, VisualDensityMarker,
    VisualIntensity,
};
use crate::validation::validate_execution_with;
use resonance_timeline::Phase1Data;
use std::fmt;
use std::sync::Arc;

/// Lock state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectState {
    /// No blueprint
    Unlocked,
    /// Blueprint, execution and validation present
    Locked,
}

impl ProjectState {
    /// Whether a command can change a project in this state
    #[must_use]
    pub fn allows(self, command: &ProjectCommand) -> bool {
        matches!(
            (self, command),
            (_, ProjectCommand::LogOutcome(_))
                | (Self::Unlocked, ProjectCommand::LockBlueprint { .. })
                | (
                    Self::Locked,
                    ProjectCommand::UpdateExecution(_)
                        | ProjectCommand::RunValidation
                        | ProjectCommand::UnlockBlueprint
                )
        )
    }
}

/// The three layers that exist only while a blueprint is locked
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionPlan {
    pub(crate) blueprint: Blueprint,
    pub(crate) execution: ExecutionMapping,
    pub(crate) validation: ValidationReport,
}

impl ProductionPlan {
    /// Frozen blueprint
    #[must_use]
    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    /// Current execution mapping
    #[must_use]
    pub fn execution(&self) -> &ExecutionMapping {
        &self.execution
    }

    /// Report for the current execution mapping
    #[must_use]
    pub fn validation(&self) -> &ValidationReport {
        &self.validation
    }

    /// Platform context frozen in the blueprint
    #[must_use]
    pub fn platform_context(&self) -> &PlatformContext {
        self.blueprint.platform_context()
    }
}

/// One project record
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub(crate) meta: ProjectMeta,
    pub(crate) plan: Option<ProductionPlan>,
    pub(crate) outcome: Option<OutcomeLog>,
}

impl Project {
    /// Empty, unlocked project
    #[must_use]
    pub fn new(meta: ProjectMeta) -> Self {
        Self {
            meta,
            plan: None,
            outcome: None,
        }
    }

    /// Current lock state
    #[must_use]
    pub fn state(&self) -> ProjectState {
        if self.plan.is_some() {
            ProjectState::Locked
        } else {
            ProjectState::Unlocked
        }
    }

    /// Whether a blueprint is locked
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.plan.is_some()
    }

    /// Metadata
    #[must_use]
    pub fn meta(&self) -> &ProjectMeta {
        &self.meta
    }

    /// Locked layers
    #[must_use]
    pub fn plan(&self) -> Option<&ProductionPlan> {
        self.plan.as_ref()
    }

    /// Blueprint, if locked
    #[must_use]
    pub fn blueprint(&self) -> Option<&Blueprint> {
        self.plan.as_ref().map(|p| &p.blueprint)
    }

    /// Execution mapping, if locked
    #[must_use]
    pub fn execution(&self) -> Option<&ExecutionMapping> {
        self.plan.as_ref().map(|p| &p.execution)
    }

    /// Validation report, if locked
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationReport> {
        self.plan.as_ref().map(|p| &p.validation)
    }

    /// Logged outcome
    #[must_use]
    pub fn outcome(&self) -> Option<&OutcomeLog> {
        self.outcome.as_ref()
    }
}

/// Reducer over [`Project`] values
///
/// Time and ids come from injected sources; everything else is pure.
#[derive(Clone)]
pub struct ProjectStateMachine {
    config: ProductionConfig,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl fmt::Debug for ProjectStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectStateMachine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for ProjectStateMachine {
    fn default() -> Self {
        Self::new(ProductionConfig::default())
    }
}

impl ProjectStateMachine {
    /// Machine using the system clock and random ids
    #[must_use]
    pub fn new(config: ProductionConfig) -> Self {
        Self::with_sources(config, Arc::new(SystemClock), Arc::new(RandomIds))
    }

    /// Machine with explicit time and id sources
    #[must_use]
    pub fn with_sources(
        config: ProductionConfig,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { config, clock, ids }
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &ProductionConfig {
        &self.config
    }

    /// Empty project stamped with the current time
    #[must_use]
    pub fn new_project(&self) -> Project {
        Project::new(ProjectMeta::new(self.clock.now()))
    }

    /// Report for a mapping under this machine's configuration
    #[must_use]
    pub fn validate(
        &self,
        execution: &ExecutionMapping,
        platform_context: &PlatformContext,
    ) -> ValidationReport {
        validate_execution_with(execution, platform_context, &self.config)
    }

    /// Initial execution mapping for a timeline
    ///
    /// Every segment starts with the configured ASL for its type, a static
    /// pacing curve and medium intensity.
    #[must_use]
    pub fn initial_execution(&self, phase1: &Phase1Data) -> ExecutionMapping {
        let segments: Vec<ExecutionSegment> = phase1
            .timeline
            .iter()
            .map(|seg| ExecutionSegment {
                segment: *seg,
                target_asl: self.config.asl_for(seg.segment_type),
                pacing_curve: PacingCurve::Static,
            })
            .collect();

        let visual_density = segments
            .iter()
            .map(|seg| VisualDensityMarker {
                time_range: format!("{}-{}", seg.segment.start_time, seg.segment.end_time),
                intensity: VisualIntensity::Med,
            })
            .collect();

        ExecutionMapping {
            audio_plan: AudioPlan {
                bpm: self.config.default_bpm,
                silence_markers: Vec::new(),
                ducking_enabled: false,
            },
            edit_rhythm: EditRhythm { segments },
            visual_density,
        }
    }

    /// Why `command` would be ignored, if it would be
    ///
    /// # Errors
    ///
    /// - [`StateMachineError::AlreadyLocked`] for a lock while locked
    /// - [`StateMachineError::NotLocked`] for edits, validation or unlock while unlocked
    /// - edit and outcome range errors
    pub fn check(&self, project: &Project, command: &ProjectCommand) -> Result<(), StateMachineError> {
        let state = project.state();
        if !state.allows(command) {
            return Err(match state {
                ProjectState::Locked => StateMachineError::AlreadyLocked,
                ProjectState::Unlocked => StateMachineError::NotLocked,
            });
        }

        match (command, project.plan.as_ref()) {
            (ProjectCommand::UpdateExecution(edit), Some(plan)) => edit.check(&plan.execution),
            (ProjectCommand::LogOutcome(outcome), _) => {
                outcome.validate().map_err(StateMachineError::from)
            }
            _ => Ok(()),
        }
    }

    /// Apply one command, returning the next project value
    ///
    /// Commands that fail [`Self::check`] return an unchanged copy.
    #[must_use]
    pub fn apply(&self, project: &Project, command: ProjectCommand) -> Project {
        if let Err(error) = self.check(project, &command) {
            tracing::warn!(command = command.name(), %error, "command ignored");
            return project.clone();
        }

        let mut next = project.clone();
        match command {
            ProjectCommand::LockBlueprint {
                phase1,
                platform_context,
            } => {
                let execution = self.initial_execution(&phase1);
                let validation = self.validate(&execution, &platform_context);
                let blueprint = Blueprint::new(
                    self.ids.next_id(),
                    self.clock.now(),
                    platform_context,
                    phase1,
                );
                tracing::info!(
                    blueprint = %blueprint.id(),
                    platform = %platform_context.platform_id,
                    segments = execution.segment_count(),
                    status = ?validation.global_status,
                    "blueprint locked"
                );
                next.plan = Some(ProductionPlan {
                    blueprint,
                    execution,
                    validation,
                });
            }
            ProjectCommand::UpdateExecution(edit) => {
                if let Some(plan) = next.plan.as_mut() {
                    // Already checked; a failure here leaves the mapping untouched.
                    if edit.apply_to(&mut plan.execution).is_ok() {
                        plan.validation = self.validate(&plan.execution, plan.platform_context());
                        tracing::debug!(edit = ?edit, status = ?plan.validation.global_status, "execution updated");
                    }
                }
            }
            ProjectCommand::RunValidation => {
                if let Some(plan) = next.plan.as_mut() {
                    plan.validation = self.validate(&plan.execution, plan.platform_context());
                }
            }
            ProjectCommand::LogOutcome(outcome) => {
                tracing::info!(
                    platform = %outcome.platform,
                    retention_3s = outcome.retention_3s,
                    "outcome logged"
                );
                next.outcome = Some(outcome);
            }
            ProjectCommand::UnlockBlueprint => {
                if let Some(plan) = next.plan.take() {
                    tracing::info!(blueprint = %plan.blueprint.id(), "blueprint unlocked");
                }
                if self.config.outcome_on_unlock == OutcomePolicy::Clear {
                    next.outcome = None;
                }
            }
        }
        next
    }

    /// Apply commands in order
    #[must_use]
    pub fn apply_all<I>(&self, project: &Project, commands: I) -> Project
    where
        I: IntoIterator<Item = ProjectCommand>,
    {
        commands
            .into_iter()
            .fold(project.clone(), |current, command| self.apply(&current, command))
    }
}
