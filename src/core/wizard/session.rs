use crate::api::{ComplianceBackend, TemplateQuery};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use crate::core::wizard::{WizardAction, WizardController};
use plantflow_types::{DocumentTemplateRef, Plant, WorkflowTemplate};
use std::sync::Arc;

/// Wizard bound to a backend: listings for the selection screens plus submission.
///
/// Listing failures are logged and leave previously loaded data in place.
pub struct WizardSession<B: ComplianceBackend + ?Sized> {
    backend: Arc<B>,
    controller: WizardController,
    plants: Vec<Plant>,
    templates: Vec<WorkflowTemplate>,
    document_templates: Vec<DocumentTemplateRef>,
}

impl<B: ComplianceBackend + ?Sized> WizardSession<B> {
    pub fn new(backend: Arc<B>, controller: WizardController) -> Self {
        WizardSession {
            backend,
            controller,
            plants: Vec::new(),
            templates: Vec::new(),
            document_templates: Vec::new(),
        }
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut WizardController {
        &mut self.controller
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn templates(&self) -> &[WorkflowTemplate] {
        &self.templates
    }

    pub fn document_templates(&self) -> &[DocumentTemplateRef] {
        &self.document_templates
    }

    /// Replace the template list, e.g. with a local catalog.
    pub fn set_templates(&mut self, templates: Vec<WorkflowTemplate>) {
        self.templates = templates;
    }

    pub async fn load_plants(&mut self, page: u32, per_page: u32) -> &[Plant] {
        match self.backend.list_plants(page, per_page).await {
            Ok(listing) => self.plants = listing.items,
            Err(err) => tracing::error!("plant listing failed: {}", err),
        }
        &self.plants
    }

    pub async fn load_templates(&mut self, query: TemplateQuery) -> &[WorkflowTemplate] {
        match self.backend.list_templates(query).await {
            Ok(templates) => self.templates = templates,
            Err(err) => tracing::error!("template listing failed: {}", err),
        }
        &self.templates
    }

    pub async fn load_document_templates(&mut self) -> &[DocumentTemplateRef] {
        match self.backend.list_document_templates().await {
            Ok(templates) => self.document_templates = templates,
            Err(err) => tracing::error!("document template listing failed: {}", err),
        }
        &self.document_templates
    }

    /// Select a plant from the loaded listing, fetching it when absent.
    pub async fn select_plant(&mut self, plant_id: &str) -> Result<(), AppError> {
        let plant = match self.plants.iter().find(|plant| plant.id == plant_id) {
            Some(plant) => plant.clone(),
            None => self.backend.get_plant(plant_id).await.map_err(|err| {
                AppError::from(err).with_context(format!("loading plant {}", plant_id))
            })?,
        };
        self.controller.dispatch(WizardAction::SelectPlant(plant))
    }

    /// Select one of the loaded templates by id.
    pub fn select_template(&mut self, template_id: &str) -> Result<(), AppError> {
        let template = self
            .templates
            .iter()
            .find(|template| template.id == template_id)
            .cloned()
            .ok_or_else(|| {
                AppError::new(
                    ErrorCategory::ValidationError,
                    format!("template '{}' is not in the loaded catalog", template_id),
                )
                .with_code("WIZ-SEL-003")
            })?;
        self.controller.dispatch(WizardAction::SelectTemplate(template))
    }

    /// Send the payload to the workflow service and close the wizard.
    ///
    /// On failure the wizard stays on Review with its state intact.
    pub async fn submit(&mut self) -> Result<String, AppError> {
        let payload = self.controller.payload()?;
        match self.backend.create_workflow(&payload).await {
            Ok(created) => {
                self.controller.complete(created.id.clone())?;
                Ok(created.id)
            }
            Err(err) => {
                tracing::error!("workflow submission failed: {}", err);
                Err(AppError::from(err).with_context("submitting workflow"))
            }
        }
    }
}
