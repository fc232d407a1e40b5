//! Shared single-writer project store
//!
//! One [`Project`] behind a mutex. Each dispatch holds the lock for the full
//! reduction, so commands from many threads are applied one at a time and
//! readers only ever see whole states.

use crate::command::ProjectCommand;
use crate::error::{PersistError, StateMachineError};
use crate::persist::save_project;
use crate::state_machine::{Project, ProjectState, ProjectStateMachine};
use parking_lot::Mutex;

/// Owner of the current project record
#[derive(Debug)]
pub struct ProjectStore {
    machine: ProjectStateMachine,
    project: Mutex<Project>,
}

impl ProjectStore {
    /// Store holding a fresh project
    #[must_use]
    pub fn new(machine: ProjectStateMachine) -> Self {
        let project = machine.new_project();
        Self::with_project(machine, project)
    }

    /// Store holding an existing project
    #[must_use]
    pub fn with_project(machine: ProjectStateMachine, project: Project) -> Self {
        Self {
            machine,
            project: Mutex::new(project),
        }
    }

    /// The reducer in use
    #[must_use]
    pub fn machine(&self) -> &ProjectStateMachine {
        &self.machine
    }

    /// Apply a command; illegal commands leave the project unchanged
    pub fn dispatch(&self, command: ProjectCommand) -> ProjectState {
        let mut project = self.project.lock();
        *project = self.machine.apply(&project, command);
        project.state()
    }

    /// Apply a command only if it passes the strict check
    ///
    /// # Errors
    ///
    /// The [`StateMachineError`] explaining why the command was refused.
    pub fn dispatch_checked(&self, command: ProjectCommand) -> Result<ProjectState, StateMachineError> {
        let mut project = self.project.lock();
        self.machine.check(&project, &command)?;
        *project = self.machine.apply(&project, command);
        Ok(project.state())
    }

    /// Copy of the current project
    #[must_use]
    pub fn snapshot(&self) -> Project {
        self.project.lock().clone()
    }

    /// Current lock state
    #[must_use]
    pub fn state(&self) -> ProjectState {
        self.project.lock().state()
    }

    /// Serialize the current project
    ///
    /// # Errors
    ///
    /// [`PersistError::Json`] if serialization fails.
    pub fn save(&self) -> Result<String, PersistError> {
        save_project(&self.project.lock())
    }

    /// Swap in another project, returning the previous one
    pub fn replace(&self, project: Project) -> Project {
        std::mem::replace(&mut *self.project.lock(), project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ExecutionEdit;
    use crate::types::PlatformContext;
    use resonance_timeline::{plan, Platform, TargetDuration, TimelineRequest};
    use std::sync::Arc;
    use std::thread;

    fn lock_command() -> ProjectCommand {
        let plan = plan(&TimelineRequest::new(
            TargetDuration::new(60).unwrap(),
            "pulse",
            Platform::YouTube,
        ));
        ProjectCommand::LockBlueprint {
            phase1: plan.to_phase1_data(),
            platform_context: PlatformContext::for_plan(&plan),
        }
    }

    #[test]
    fn dispatch_and_snapshot() {
        let store = ProjectStore::new(ProjectStateMachine::default());
        assert_eq!(store.state(), ProjectState::Unlocked);
        assert_eq!(store.dispatch(lock_command()), ProjectState::Locked);
        assert_eq!(
            store.dispatch(ProjectCommand::UpdateExecution(ExecutionEdit::SetBpm(100))),
            ProjectState::Locked
        );
        assert_eq!(store.snapshot().execution().unwrap().audio_plan.bpm, 100);
    }

    #[test]
    fn checked_dispatch_reports_refusal() {
        let store = ProjectStore::new(ProjectStateMachine::default());
        let before = store.snapshot();
        let err = store.dispatch_checked(ProjectCommand::UnlockBlueprint).unwrap_err();

        assert_eq!(err, StateMachineError::NotLocked);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn concurrent_locks_apply_once() {
        let store = Arc::new(ProjectStore::new(ProjectStateMachine::default()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.dispatch_checked(lock_command()).is_ok())
            })
            .collect();

        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(accepted, 1);
        assert_eq!(store.state(), ProjectState::Locked);
    }

    #[test]
    fn replace_returns_previous() {
        let store = ProjectStore::new(ProjectStateMachine::default());
        store.dispatch(lock_command());
        let fresh = store.machine().new_project();
        let previous = store.replace(fresh);

        assert!(previous.is_locked());
        assert_eq!(store.state(), ProjectState::Unlocked);
    }
}
