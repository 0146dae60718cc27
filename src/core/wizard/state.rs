#![allow(clippy::result_large_err)]

use crate::core::assignment::{AssignmentDefaults, AssignmentStore};
use crate::core::error::AppError;
use crate::core::task_filter::{ApplicableTask, TaskFilter, TaskKey};
use crate::core::types::ErrorCategory;
use crate::core::wizard::step::WizardStep;
use chrono::NaiveDate;
use indexmap::IndexMap;
use plantflow_types::{CreatorRole, Phase, Plant, WorkflowTemplate};
use std::collections::BTreeSet;

/// How the workflow's tasks are sourced. The two modes exclude each other.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSelection {
    /// One full-workflow template, once chosen.
    Single(Option<WorkflowTemplate>),
    /// Phase name to phase-template id, in the order phases were mapped.
    Phases(IndexMap<Phase, String>),
}

impl Default for TemplateSelection {
    fn default() -> Self {
        TemplateSelection::Single(None)
    }
}

/// Metadata collected on the Configure step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowDetails {
    pub name: String,
    pub description: String,
    pub responsible: String,
    pub due_date: Option<NaiveDate>,
    pub notes: String,
}

/// Snapshot of everything the wizard has collected so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardState {
    pub plant: Option<Plant>,
    pub selection: TemplateSelection,
    pub details: WorkflowDetails,
    pub assignments: AssignmentStore,
    pub defaults: AssignmentDefaults,
    pub has_heritage_constraints: bool,
    pub use_simplified_process: bool,
    pub creator_role: CreatorRole,
    pub document_templates: BTreeSet<String>,
}

impl WizardState {
    pub fn use_phase_templates(&self) -> bool {
        matches!(self.selection, TemplateSelection::Phases(_))
    }

    pub fn selected_template(&self) -> Option<&WorkflowTemplate> {
        match &self.selection {
            TemplateSelection::Single(template) => template.as_ref(),
            TemplateSelection::Phases(_) => None,
        }
    }

    pub fn phase_templates(&self) -> Option<&IndexMap<Phase, String>> {
        match &self.selection {
            TemplateSelection::Phases(phases) => Some(phases),
            TemplateSelection::Single(_) => None,
        }
    }

    /// Tasks of the selected template that apply to the selected plant.
    ///
    /// Empty in phase mode or while plant or template are missing.
    pub fn applicable_tasks(&self, filter: &TaskFilter) -> Vec<ApplicableTask> {
        match (self.selected_template(), &self.plant) {
            (Some(template), Some(plant)) => {
                filter.apply(template, plant.power, self.has_heritage_constraints)
            }
            _ => Vec::new(),
        }
    }

    /// Reasons `step` cannot be left yet; empty when the step is valid.
    pub fn step_issues(&self, step: WizardStep, filter: &TaskFilter) -> Vec<String> {
        let mut issues = Vec::new();
        match step {
            WizardStep::SelectPlant => {
                if self.plant.is_none() {
                    issues.push("no plant selected".to_string());
                }
            }
            WizardStep::SelectTemplate => match &self.selection {
                TemplateSelection::Phases(phases) if phases.is_empty() => {
                    issues.push("no phase mapped to a template".to_string());
                }
                TemplateSelection::Single(None) => {
                    issues.push("no template selected".to_string());
                }
                _ => {}
            },
            WizardStep::Configure => {
                if self.details.name.trim().is_empty() {
                    issues.push("workflow name is empty".to_string());
                }
                if self.details.responsible.trim().is_empty() {
                    issues.push("responsible is empty".to_string());
                }
                if self.details.due_date.is_none() {
                    issues.push("due date is missing".to_string());
                }
            }
            WizardStep::AssignTasks => {
                if !self.use_phase_templates() {
                    let tasks = self.applicable_tasks(filter);
                    for key in self.assignments.unassigned(&tasks) {
                        issues.push(format!("task '{}' needs an assignee and a due date", key));
                    }
                }
            }
            WizardStep::DocumentTemplates | WizardStep::Review => {}
        }
        issues
    }

    pub fn is_step_valid(&self, step: WizardStep, filter: &TaskFilter) -> bool {
        self.step_issues(step, filter).is_empty()
    }
}

/// State change requested by one of the wizard screens.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardAction {
    SelectPlant(Plant),
    SetUsePhaseTemplates(bool),
    SelectTemplate(WorkflowTemplate),
    SetPhaseTemplate { phase: Phase, template_id: String },
    ClearPhaseTemplate(Phase),
    Configure(WorkflowDetails),
    SetHeritageConstraints(bool),
    SetSimplifiedProcess(bool),
    SetCreatorRole(CreatorRole),
    SetDefaults(AssignmentDefaults),
    AssignTask { key: TaskKey, assignee: String },
    SetTaskDueDate { key: TaskKey, due_date: Option<NaiveDate> },
    ApplyDefaultsToAll,
    ToggleDocumentTemplate(String),
}

impl WizardAction {
    /// Steps whose screen issues this action.
    pub fn steps(&self) -> &'static [WizardStep] {
        match self {
            WizardAction::SelectPlant(_) => &[WizardStep::SelectPlant],
            WizardAction::SetUsePhaseTemplates(_)
            | WizardAction::SelectTemplate(_)
            | WizardAction::SetPhaseTemplate { .. }
            | WizardAction::ClearPhaseTemplate(_) => &[WizardStep::SelectTemplate],
            WizardAction::Configure(_)
            | WizardAction::SetHeritageConstraints(_)
            | WizardAction::SetSimplifiedProcess(_)
            | WizardAction::SetCreatorRole(_) => &[WizardStep::Configure],
            WizardAction::SetDefaults(_) => &[WizardStep::Configure, WizardStep::AssignTasks],
            WizardAction::AssignTask { .. }
            | WizardAction::SetTaskDueDate { .. }
            | WizardAction::ApplyDefaultsToAll => &[WizardStep::AssignTasks],
            WizardAction::ToggleDocumentTemplate(_) => &[WizardStep::DocumentTemplates],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WizardAction::SelectPlant(_) => "select_plant",
            WizardAction::SetUsePhaseTemplates(_) => "set_use_phase_templates",
            WizardAction::SelectTemplate(_) => "select_template",
            WizardAction::SetPhaseTemplate { .. } => "set_phase_template",
            WizardAction::ClearPhaseTemplate(_) => "clear_phase_template",
            WizardAction::Configure(_) => "configure",
            WizardAction::SetHeritageConstraints(_) => "set_heritage_constraints",
            WizardAction::SetSimplifiedProcess(_) => "set_simplified_process",
            WizardAction::SetCreatorRole(_) => "set_creator_role",
            WizardAction::SetDefaults(_) => "set_defaults",
            WizardAction::AssignTask { .. } => "assign_task",
            WizardAction::SetTaskDueDate { .. } => "set_task_due_date",
            WizardAction::ApplyDefaultsToAll => "apply_defaults_to_all",
            WizardAction::ToggleDocumentTemplate(_) => "toggle_document_template",
        }
    }
}

/// Inputs a reduction may consult besides the state itself.
pub struct ReduceContext<'a> {
    pub filter: &'a TaskFilter,
    pub today: NaiveDate,
}

/// Produce the state that follows `state` once `action` is applied.
pub fn reduce(
    mut state: WizardState,
    action: WizardAction,
    ctx: &ReduceContext<'_>,
) -> Result<WizardState, AppError> {
    match action {
        WizardAction::SelectPlant(plant) => {
            state.plant = Some(plant);
            prune_assignments(&mut state, ctx.filter);
        }
        WizardAction::SetUsePhaseTemplates(enabled) => {
            if enabled != state.use_phase_templates() {
                state.selection = if enabled {
                    TemplateSelection::Phases(IndexMap::new())
                } else {
                    TemplateSelection::Single(None)
                };
                state.assignments.clear();
            }
        }
        WizardAction::SelectTemplate(template) => {
            let TemplateSelection::Single(current) = &mut state.selection else {
                return Err(mode_error("a single template cannot be selected in phase mode"));
            };
            let changed = current.as_ref().map(|t| t.id != template.id).unwrap_or(true);
            *current = Some(template);
            if changed {
                state.assignments.clear();
            }
        }
        WizardAction::SetPhaseTemplate { phase, template_id } => {
            let TemplateSelection::Phases(phases) = &mut state.selection else {
                return Err(mode_error("phase templates require phase mode"));
            };
            let template_id = template_id.trim();
            if template_id.is_empty() {
                return Err(AppError::new(
                    ErrorCategory::ValidationError,
                    format!("phase '{}' needs a template id", phase),
                )
                .with_code("WIZ-SEL-002"));
            }
            phases.insert(phase, template_id.to_string());
        }
        WizardAction::ClearPhaseTemplate(phase) => {
            if let TemplateSelection::Phases(phases) = &mut state.selection {
                phases.shift_remove(&phase);
            }
        }
        WizardAction::Configure(details) => {
            state.details = details;
        }
        WizardAction::SetHeritageConstraints(flag) => {
            state.has_heritage_constraints = flag;
            prune_assignments(&mut state, ctx.filter);
        }
        WizardAction::SetSimplifiedProcess(flag) => {
            state.use_simplified_process = flag;
        }
        WizardAction::SetCreatorRole(role) => {
            state.creator_role = role;
        }
        WizardAction::SetDefaults(defaults) => {
            state.defaults = defaults;
        }
        WizardAction::AssignTask { key, assignee } => {
            ensure_known_task(&state, &key, ctx.filter)?;
            state.assignments.assign(key, &assignee);
        }
        WizardAction::SetTaskDueDate { key, due_date } => {
            ensure_known_task(&state, &key, ctx.filter)?;
            state.assignments.set_due_date(key, due_date);
        }
        WizardAction::ApplyDefaultsToAll => {
            let tasks = state.applicable_tasks(ctx.filter);
            let changed = state
                .assignments
                .apply_defaults_to_all(&tasks, &state.defaults, ctx.today);
            tracing::debug!(changed, "applied defaults to all tasks");
        }
        WizardAction::ToggleDocumentTemplate(template_id) => {
            if !state.document_templates.remove(&template_id) {
                state.document_templates.insert(template_id);
            }
        }
    }
    Ok(state)
}

fn prune_assignments(state: &mut WizardState, filter: &TaskFilter) {
    if state.selected_template().is_some() {
        let tasks = state.applicable_tasks(filter);
        state.assignments.retain(&tasks);
    }
}

fn ensure_known_task(state: &WizardState, key: &TaskKey, filter: &TaskFilter) -> Result<(), AppError> {
    if state
        .applicable_tasks(filter)
        .iter()
        .any(|applicable| &applicable.key == key)
    {
        return Ok(());
    }
    Err(AppError::new(
        ErrorCategory::ValidationError,
        format!("task '{}' is not part of the filtered task list", key),
    )
    .with_code("WIZ-TASK-001"))
}

fn mode_error(message: &str) -> AppError {
    AppError::new(ErrorCategory::ValidationError, message).with_code("WIZ-SEL-001")
}
