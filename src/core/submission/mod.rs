#![allow(clippy::result_large_err)]

//! Conversion of a finished wizard into the workflow-creation request body.

use crate::core::error::AppError;
use crate::core::task_filter::{ApplicableTask, TaskKey};
use crate::core::types::ErrorCategory;
use crate::core::wizard::{TemplateSelection, WizardState};
use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use plantflow_types::{CreatorRole, Entity, Phase};
use serde::Serialize;
use std::collections::BTreeMap;

/// Body accepted by `POST /api/workflows`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SubmissionPayload {
    PhaseComposed(PhaseComposedPayload),
    SingleTemplate(SingleTemplatePayload),
}

impl SubmissionPayload {
    pub fn common(&self) -> &CommonFields {
        match self {
            SubmissionPayload::PhaseComposed(payload) => &payload.common,
            SubmissionPayload::SingleTemplate(payload) => &payload.common,
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, AppError> {
        serde_json::to_value(self).map_err(|err| {
            AppError::new(
                ErrorCategory::SerializationError,
                format!("failed to encode submission payload: {}", err),
            )
        })
    }
}

/// Fields sent in both payload shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonFields {
    pub plant_id: String,
    pub name: String,
    pub description: String,
    pub responsible: String,
    pub due_date: NaiveDate,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    pub created_by_role: CreatorRole,
    pub has_heritage_constraints: bool,
    pub use_simplified_process: bool,
    pub document_templates: Vec<String>,
}

/// Workflow assembled from one template per phase; tasks are assigned later.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseComposedPayload {
    pub use_phase_templates: bool,
    pub phase_templates: IndexMap<Phase, String>,
    #[serde(flatten)]
    pub common: CommonFields,
}

/// Workflow created from a single template with per-task assignments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleTemplatePayload {
    pub template_id: String,
    pub task_assignments: BTreeMap<TaskKey, String>,
    pub task_due_dates: BTreeMap<TaskKey, NaiveDate>,
    pub enti_coinvolti: Vec<Entity>,
    #[serde(flatten)]
    pub common: CommonFields,
}

/// Package `state` for submission. `tasks` is the filtered task list.
pub fn build_payload(
    state: &WizardState,
    tasks: &[ApplicableTask],
) -> Result<SubmissionPayload, AppError> {
    let common = common_fields(state)?;

    match &state.selection {
        TemplateSelection::Phases(phases) => {
            if phases.is_empty() {
                return Err(incomplete("no phase template selected"));
            }
            Ok(SubmissionPayload::PhaseComposed(PhaseComposedPayload {
                use_phase_templates: true,
                phase_templates: phases.clone(),
                common,
            }))
        }
        TemplateSelection::Single(None) => Err(incomplete("no template selected")),
        TemplateSelection::Single(Some(template)) => {
            let mut task_assignments = BTreeMap::new();
            let mut task_due_dates = BTreeMap::new();
            let mut entities = IndexSet::new();
            for applicable in tasks {
                if let Some(assignee) = state.assignments.assignee(&applicable.key) {
                    task_assignments.insert(applicable.key.clone(), assignee.to_string());
                }
                if let Some(due_date) = state.assignments.due_date(&applicable.key) {
                    task_due_dates.insert(applicable.key.clone(), due_date);
                }
                if let Some(entity) = &applicable.task.ente_responsabile {
                    entities.insert(entity.clone());
                }
            }

            Ok(SubmissionPayload::SingleTemplate(SingleTemplatePayload {
                template_id: template.id.clone(),
                task_assignments,
                task_due_dates,
                enti_coinvolti: entities.into_iter().collect(),
                common,
            }))
        }
    }
}

fn common_fields(state: &WizardState) -> Result<CommonFields, AppError> {
    let plant = state
        .plant
        .as_ref()
        .ok_or_else(|| incomplete("no plant selected"))?;
    let due_date = state
        .details
        .due_date
        .ok_or_else(|| incomplete("workflow due date is missing"))?;

    Ok(CommonFields {
        plant_id: plant.id.clone(),
        name: state.details.name.trim().to_string(),
        description: state.details.description.trim().to_string(),
        responsible: state.details.responsible.trim().to_string(),
        due_date,
        notes: state.details.notes.trim().to_string(),
        created_by_role: state.creator_role,
        has_heritage_constraints: state.has_heritage_constraints,
        use_simplified_process: state.use_simplified_process,
        document_templates: state.document_templates.iter().cloned().collect(),
    })
}

fn incomplete(message: &str) -> AppError {
    AppError::new(
        ErrorCategory::ValidationError,
        format!("wizard state is incomplete: {}", message),
    )
    .with_code("WIZ-SUBMIT-002")
}
