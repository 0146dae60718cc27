//! Preview and generation of documents from workflow document templates.

use crate::api::ComplianceBackend;
use plantflow_types::{DocumentFormat, DocumentPreview, GeneratedDocument};

/// Message shown when preview or generation fails.
pub const GENERATION_ERROR_MESSAGE: &str =
    "Document generation failed. Check the workflow data and try again.";

/// Progress of one document request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenerationStatus {
    #[default]
    Idle,
    Loading,
    Previewed(DocumentPreview),
    Ready(GeneratedDocument),
    Error(&'static str),
}

impl GenerationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GenerationStatus::Idle => "idle",
            GenerationStatus::Loading => "loading",
            GenerationStatus::Previewed(_) => "previewed",
            GenerationStatus::Ready(_) => "ready",
            GenerationStatus::Error(_) => "error",
        }
    }
}

/// Tracks the preview/generate exchange for one workflow and template.
#[derive(Debug, Clone)]
pub struct DocumentGeneration {
    workflow_id: String,
    template_id: String,
    status: GenerationStatus,
}

impl DocumentGeneration {
    pub fn new(workflow_id: impl Into<String>, template_id: impl Into<String>) -> Self {
        DocumentGeneration {
            workflow_id: workflow_id.into(),
            template_id: template_id.into(),
            status: GenerationStatus::Idle,
        }
    }

    pub fn status(&self) -> &GenerationStatus {
        &self.status
    }

    /// Fetch the placeholder preview.
    pub async fn preview<B>(&mut self, backend: &B) -> &GenerationStatus
    where
        B: ComplianceBackend + ?Sized,
    {
        self.status = GenerationStatus::Loading;
        self.status = match backend
            .preview_document(&self.workflow_id, &self.template_id)
            .await
        {
            Ok(preview) => {
                if !preview.is_complete() {
                    tracing::warn!(
                        workflow = %self.workflow_id,
                        template = %self.template_id,
                        missing = ?preview.missing,
                        "document preview has unfilled placeholders"
                    );
                }
                GenerationStatus::Previewed(preview)
            }
            Err(err) => {
                tracing::error!(
                    workflow = %self.workflow_id,
                    template = %self.template_id,
                    "document preview failed: {}",
                    err
                );
                GenerationStatus::Error(GENERATION_ERROR_MESSAGE)
            }
        };
        &self.status
    }

    /// Generate the document in `format`.
    pub async fn generate<B>(&mut self, backend: &B, format: DocumentFormat) -> &GenerationStatus
    where
        B: ComplianceBackend + ?Sized,
    {
        self.status = GenerationStatus::Loading;
        self.status = match backend
            .generate_document(&self.workflow_id, &self.template_id, format)
            .await
        {
            Ok(document) => {
                tracing::info!(
                    workflow = %self.workflow_id,
                    document = %document.id,
                    %format,
                    "document generated"
                );
                GenerationStatus::Ready(document)
            }
            Err(err) => {
                tracing::error!(
                    workflow = %self.workflow_id,
                    template = %self.template_id,
                    "document generation failed: {}",
                    err
                );
                GenerationStatus::Error(GENERATION_ERROR_MESSAGE)
            }
        };
        &self.status
    }

    pub fn reset(&mut self) {
        self.status = GenerationStatus::Idle;
    }
}
