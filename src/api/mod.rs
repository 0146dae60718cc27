//! Compliance backend access: the `ComplianceBackend` seam and its HTTP implementation.
pub mod client;

pub use client::HttpBackend;

use crate::core::submission::SubmissionPayload;
use async_trait::async_trait;
use plantflow_types::{
    CreatedWorkflow, DocumentFormat, DocumentPreview, DocumentTemplateRef, GeneratedDocument, Page,
    Phase, Plant, WorkflowTemplate,
};

/// Query accepted by the template listing service.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TemplateQuery {
    pub phase: Option<Phase>,
    pub min_power: Option<f64>,
}

/// Remote services the wizard consumes.
#[async_trait]
pub trait ComplianceBackend: Send + Sync {
    async fn list_plants(&self, page: u32, per_page: u32) -> Result<Page<Plant>, ApiError>;

    async fn get_plant(&self, plant_id: &str) -> Result<Plant, ApiError>;

    async fn list_templates(&self, query: TemplateQuery) -> Result<Vec<WorkflowTemplate>, ApiError>;

    async fn list_document_templates(&self) -> Result<Vec<DocumentTemplateRef>, ApiError>;

    async fn preview_document(
        &self,
        workflow_id: &str,
        template_id: &str,
    ) -> Result<DocumentPreview, ApiError>;

    async fn generate_document(
        &self,
        workflow_id: &str,
        template_id: &str,
        format: DocumentFormat,
    ) -> Result<GeneratedDocument, ApiError>;

    async fn create_workflow(&self, payload: &SubmissionPayload) -> Result<CreatedWorkflow, ApiError>;
}

/// Error types for backend operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Server error: {status} {body}")]
    Server { status: u16, body: String },
    #[error("Deserialization error: {0}")]
    Decode(String),
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}
