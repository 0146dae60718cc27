#![allow(clippy::result_large_err)] // Wizard operations return AppError so the CLI can show codes and context.

//! Workflow creation wizard: a linear six-step state machine over [`WizardState`].
//!
//! The controller owns the current step and the latest state snapshot. Every
//! screen interaction goes through [`WizardController::dispatch`], which runs
//! the pure [`reduce`] function and swaps in the resulting snapshot.

pub mod session;
pub mod state;
pub mod step;

pub use session::WizardSession;
pub use state::{reduce, ReduceContext, TemplateSelection, WizardAction, WizardState, WorkflowDetails};
pub use step::WizardStep;

use crate::core::clock::{Clock, SystemClock};
use crate::core::error::AppError;
use crate::core::submission::{build_payload, SubmissionPayload};
use crate::core::task_filter::{ApplicableTask, TaskFilter};
use crate::core::types::ErrorCategory;
use plantflow_types::Plant;
use std::sync::Arc;

/// Terminal state of a wizard run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    Cancelled,
    Submitted { workflow_id: String },
}

pub struct WizardController {
    step: WizardStep,
    state: WizardState,
    filter: Arc<TaskFilter>,
    clock: Arc<dyn Clock>,
    outcome: Option<WizardOutcome>,
}

impl WizardController {
    pub fn new(filter: Arc<TaskFilter>, clock: Arc<dyn Clock>) -> Self {
        WizardController {
            step: WizardStep::FIRST,
            state: WizardState::default(),
            filter,
            clock,
            outcome: None,
        }
    }

    /// Controller using the system clock and the default task filter.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(TaskFilter::default()), Arc::new(SystemClock))
    }

    /// Start from an existing snapshot, e.g. defaults read from configuration.
    pub fn with_state(mut self, state: WizardState) -> Self {
        self.state = state;
        self
    }

    /// Start with the plant already chosen by the caller.
    pub fn with_plant(mut self, plant: Plant) -> Self {
        self.state.plant = Some(plant);
        self
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    pub fn outcome(&self) -> Option<&WizardOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn is_step_valid(&self) -> bool {
        self.state.is_step_valid(self.step, &self.filter)
    }

    pub fn step_issues(&self) -> Vec<String> {
        self.state.step_issues(self.step, &self.filter)
    }

    pub fn applicable_tasks(&self) -> Vec<ApplicableTask> {
        self.state.applicable_tasks(&self.filter)
    }

    /// Apply a screen action to the current snapshot.
    pub fn dispatch(&mut self, action: WizardAction) -> Result<(), AppError> {
        self.ensure_active()?;
        if !action.steps().contains(&self.step) {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                format!("'{}' is not available on step {}", action.name(), self.step),
            )
            .with_code("WIZ-STEP-002"));
        }

        let name = action.name();
        let ctx = ReduceContext {
            filter: &self.filter,
            today: self.clock.today(),
        };
        self.state = reduce(self.state.clone(), action, &ctx)?;
        tracing::debug!(step = ?self.step, action = name, "wizard action applied");
        Ok(())
    }

    /// Advance one step when the current one is valid.
    pub fn next(&mut self) -> Result<WizardStep, AppError> {
        self.ensure_active()?;
        let issues = self.step_issues();
        if !issues.is_empty() {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                format!("step {} is incomplete: {}", self.step, issues.join("; ")),
            )
            .with_code("WIZ-STEP-001"));
        }
        let Some(next) = self.step.next() else {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                "review is the last step; submit the workflow instead",
            )
            .with_code("WIZ-STEP-003"));
        };

        self.step = next;
        if next == WizardStep::AssignTasks {
            self.prefill_assignments();
        }
        tracing::info!(step = %self.step, "wizard advanced");
        Ok(self.step)
    }

    /// Go back one step; stays put on the first step.
    pub fn back(&mut self) -> Result<WizardStep, AppError> {
        self.ensure_active()?;
        if let Some(previous) = self.step.previous() {
            self.step = previous;
            tracing::debug!(step = %self.step, "wizard moved back");
        }
        Ok(self.step)
    }

    /// Abandon the wizard without submitting anything.
    pub fn cancel(&mut self) {
        if self.outcome.is_none() {
            tracing::info!(step = %self.step, "wizard cancelled");
            self.outcome = Some(WizardOutcome::Cancelled);
        }
    }

    /// Build the submission payload from the Review step.
    ///
    /// Leaves the wizard open; call [`WizardController::complete`] once the
    /// backend has accepted the payload.
    pub fn payload(&self) -> Result<SubmissionPayload, AppError> {
        self.ensure_active()?;
        if self.step != WizardStep::Review || !self.is_step_valid() {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                format!("cannot submit from step {}", self.step),
            )
            .with_code("WIZ-SUBMIT-001"));
        }
        build_payload(&self.state, &self.applicable_tasks())
    }

    /// Record the workflow created from this wizard and close it.
    pub fn complete(&mut self, workflow_id: String) -> Result<(), AppError> {
        self.ensure_active()?;
        if self.step != WizardStep::Review {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                format!("cannot complete from step {}", self.step),
            )
            .with_code("WIZ-SUBMIT-001"));
        }
        tracing::info!(%workflow_id, "wizard submitted");
        self.outcome = Some(WizardOutcome::Submitted { workflow_id });
        Ok(())
    }

    fn prefill_assignments(&mut self) {
        if self.state.use_phase_templates() || !self.state.defaults.is_set() {
            return;
        }
        let tasks = self.applicable_tasks();
        if self.state.assignments.is_complete(&tasks) {
            return;
        }
        let today = self.clock.today();
        let changed = self
            .state
            .assignments
            .apply_defaults(&tasks, &self.state.defaults, today);
        tracing::debug!(changed, "pre-filled task assignments from defaults");
    }

    fn ensure_active(&self) -> Result<(), AppError> {
        match &self.outcome {
            None => Ok(()),
            Some(outcome) => Err(AppError::new(
                ErrorCategory::ValidationError,
                format!("wizard already finished: {:?}", outcome),
            )
            .with_code("WIZ-DONE-001")),
        }
    }
}
