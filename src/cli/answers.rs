#![allow(clippy::result_large_err)]

use crate::api::ComplianceBackend;
use crate::core::assignment::AssignmentDefaults;
use crate::core::error::AppError;
use crate::core::task_filter::TaskKey;
use crate::core::types::ErrorCategory;
use crate::core::wizard::{WizardAction, WizardSession, WizardStep, WorkflowDetails};
use chrono::NaiveDate;
use indexmap::IndexMap;
use plantflow_types::{CreatorRole, Phase, Plant};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Scripted answers for every wizard screen, read from YAML or JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WizardAnswers {
    #[serde(default)]
    pub plant_id: Option<String>,
    /// Full plant record, used instead of fetching `plant_id`.
    #[serde(default)]
    pub plant: Option<Plant>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub phase_templates: IndexMap<Phase, String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub responsible: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub has_heritage_constraints: bool,
    #[serde(default)]
    pub use_simplified_process: bool,
    #[serde(default)]
    pub creator_role: Option<CreatorRole>,
    #[serde(default)]
    pub default_assignee: Option<String>,
    #[serde(default)]
    pub default_due_offset_days: Option<u32>,
    #[serde(default)]
    pub apply_defaults_to_all: bool,
    /// Per-task overrides keyed by task id or `task-{n}`.
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskAnswer>,
    #[serde(default)]
    pub document_templates: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskAnswer {
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl WizardAnswers {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read answers file {}: {}", path.display(), e),
            )
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let answers: WizardAnswers = if is_json {
            serde_json::from_str(&content).map_err(|e| answers_error(path, e))?
        } else {
            serde_yaml::from_str(&content).map_err(|e| answers_error(path, e))?
        };
        answers.validate()?;
        Ok(answers)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.plant_id.is_none() && self.plant.is_none() {
            return Err(invalid("answers need either plant_id or plant"));
        }
        match (self.template_id.is_some(), self.phase_templates.is_empty()) {
            (true, false) => Err(invalid(
                "template_id and phase_templates are mutually exclusive",
            )),
            (false, true) => Err(invalid("answers need template_id or phase_templates")),
            _ => Ok(()),
        }
    }

    pub fn uses_phase_templates(&self) -> bool {
        !self.phase_templates.is_empty()
    }

    /// Defaults from the answers, falling back to `base` field by field.
    pub fn defaults(&self, base: &AssignmentDefaults) -> AssignmentDefaults {
        AssignmentDefaults {
            assignee: self.default_assignee.clone().or_else(|| base.assignee.clone()),
            due_offset_days: self.default_due_offset_days.or(base.due_offset_days),
        }
    }

    /// Walk the session from its current step up to Review.
    pub async fn drive<B>(&self, session: &mut WizardSession<B>) -> Result<(), AppError>
    where
        B: ComplianceBackend + ?Sized,
    {
        expect_step(session, WizardStep::SelectPlant)?;
        if let Some(plant) = &self.plant {
            session
                .controller_mut()
                .dispatch(WizardAction::SelectPlant(plant.clone()))?;
        } else if let Some(plant_id) = &self.plant_id {
            session.select_plant(plant_id).await?;
        }
        session.controller_mut().next()?;

        if self.uses_phase_templates() {
            session
                .controller_mut()
                .dispatch(WizardAction::SetUsePhaseTemplates(true))?;
            for (phase, template_id) in &self.phase_templates {
                session.controller_mut().dispatch(WizardAction::SetPhaseTemplate {
                    phase: *phase,
                    template_id: template_id.clone(),
                })?;
            }
        } else if let Some(template_id) = &self.template_id {
            session.select_template(template_id)?;
        }
        session.controller_mut().next()?;

        let defaults = self.defaults(&session.controller().state().defaults);
        let controller = session.controller_mut();
        controller.dispatch(WizardAction::Configure(WorkflowDetails {
            name: self.name.clone(),
            description: self.description.clone(),
            responsible: self.responsible.clone(),
            due_date: Some(self.due_date),
            notes: self.notes.clone(),
        }))?;
        controller.dispatch(WizardAction::SetHeritageConstraints(
            self.has_heritage_constraints,
        ))?;
        controller.dispatch(WizardAction::SetSimplifiedProcess(
            self.use_simplified_process,
        ))?;
        if let Some(role) = self.creator_role {
            controller.dispatch(WizardAction::SetCreatorRole(role))?;
        }
        controller.dispatch(WizardAction::SetDefaults(defaults))?;
        controller.next()?;

        if !controller.state().use_phase_templates() {
            if self.apply_defaults_to_all {
                controller.dispatch(WizardAction::ApplyDefaultsToAll)?;
            }
            for (key, answer) in &self.tasks {
                let key = TaskKey::from(key.as_str());
                if let Some(assignee) = &answer.assignee {
                    controller.dispatch(WizardAction::AssignTask {
                        key: key.clone(),
                        assignee: assignee.clone(),
                    })?;
                }
                if let Some(due_date) = answer.due_date {
                    controller.dispatch(WizardAction::SetTaskDueDate {
                        key,
                        due_date: Some(due_date),
                    })?;
                }
            }
        }
        controller.next()?;

        for template_id in &self.document_templates {
            controller.dispatch(WizardAction::ToggleDocumentTemplate(template_id.clone()))?;
        }
        controller.next()?;
        Ok(())
    }
}

fn expect_step<B>(session: &WizardSession<B>, step: WizardStep) -> Result<(), AppError>
where
    B: ComplianceBackend + ?Sized,
{
    let current = session.controller().step();
    if current != step {
        return Err(AppError::new(
            ErrorCategory::InternalError,
            format!("answers expect the wizard on {}, found {}", step, current),
        ));
    }
    Ok(())
}

fn invalid(message: &str) -> AppError {
    AppError::new(ErrorCategory::ValidationError, message).with_code("ANS-VAL-001")
}

fn answers_error(path: &Path, err: impl std::fmt::Display) -> AppError {
    AppError::new(
        ErrorCategory::SerializationError,
        format!("Failed to parse answers file {}: {}", path.display(), err),
    )
    .with_code("ANS-PARSE-001")
}
