use crate::api::{ApiError, ComplianceBackend, TemplateQuery};
use crate::core::config::ApiConfig;
use crate::core::submission::SubmissionPayload;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use plantflow_types::{
    CreatedWorkflow, DocumentFormat, DocumentPreview, DocumentTemplateRef, GeneratedDocument, Page,
    Plant, WorkflowTemplate,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// ASCII set for encoding path segments (slashes included).
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS.add(b' ').add(b'/').add(b'?').add(b'#');

/// HTTP client targeting the compliance REST backend.
#[derive(Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Build a client with the given base URL and request timeout.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpBackend { http, base_url })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|err| ApiError::InvalidUrl(err.to_string()))?;
        Self::new(base_url, Duration::from_secs(config.timeout_seconds))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> String {
        join_path(&self.base_url, segments)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");
        let resp = self.http.get(&url).query(query).send().await?;
        decode(resp).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T, ApiError> {
        tracing::debug!(%url, "POST");
        let resp = self.http.post(&url).json(body).send().await?;
        decode(resp).await
    }
}

#[async_trait]
impl ComplianceBackend for HttpBackend {
    async fn list_plants(&self, page: u32, per_page: u32) -> Result<Page<Plant>, ApiError> {
        let url = self.endpoint(&["api", "plants"]);
        let query = [("page", page.to_string()), ("per_page", per_page.to_string())];
        let value: Value = self.get_json(url, &query).await?;

        // Older deployments answer with a bare array instead of a page envelope.
        if value.is_array() {
            let items: Vec<Plant> = from_value(value)?;
            tracing::debug!("Fetched {} plants (unpaginated format)", items.len());
            return Ok(Page {
                total: items.len(),
                page: 1,
                per_page: items.len() as u32,
                items,
            });
        }
        from_value(value)
    }

    async fn get_plant(&self, plant_id: &str) -> Result<Plant, ApiError> {
        let encoded = encode_segment(plant_id);
        let url = self.endpoint(&["api", "plants", &encoded]);
        self.get_json(url, &[]).await
    }

    async fn list_templates(&self, query: TemplateQuery) -> Result<Vec<WorkflowTemplate>, ApiError> {
        let url = self.endpoint(&["api", "workflow-templates"]);
        let mut params = Vec::new();
        if let Some(phase) = query.phase {
            params.push(("phase", phase.to_string()));
        }
        if let Some(min_power) = query.min_power {
            params.push(("min_power", min_power.to_string()));
        }
        let value: Value = self.get_json(url, &params).await?;

        if let Some(entries) = value.get("templates").cloned() {
            return from_value(entries);
        }
        from_value(value)
    }

    async fn list_document_templates(&self) -> Result<Vec<DocumentTemplateRef>, ApiError> {
        let url = self.endpoint(&["api", "document-templates"]);
        self.get_json(url, &[]).await
    }

    async fn preview_document(
        &self,
        workflow_id: &str,
        template_id: &str,
    ) -> Result<DocumentPreview, ApiError> {
        let encoded = encode_segment(workflow_id);
        let url = self.endpoint(&["api", "workflows", &encoded, "documents", "preview"]);
        let body = DocumentRequest {
            template_id,
            format: None,
        };
        self.post_json(url, &body).await
    }

    async fn generate_document(
        &self,
        workflow_id: &str,
        template_id: &str,
        format: DocumentFormat,
    ) -> Result<GeneratedDocument, ApiError> {
        let encoded = encode_segment(workflow_id);
        let url = self.endpoint(&["api", "workflows", &encoded, "documents", "generate"]);
        let body = DocumentRequest {
            template_id,
            format: Some(format),
        };
        self.post_json(url, &body).await
    }

    async fn create_workflow(&self, payload: &SubmissionPayload) -> Result<CreatedWorkflow, ApiError> {
        let url = self.endpoint(&["api", "workflows"]);
        self.post_json(url, payload).await
    }
}

#[derive(Serialize)]
struct DocumentRequest<'a> {
    template_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<DocumentFormat>,
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(ApiError::Server {
            status: status.as_u16(),
            body: text,
        });
    }
    serde_json::from_str(&text).map_err(|err| ApiError::Decode(err.to_string()))
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT_ENCODE_SET).to_string()
}

fn join_path(base: &Url, segments: &[&str]) -> String {
    let mut url = base.as_str().trim_end_matches('/').to_string();
    for segment in segments {
        if !segment.is_empty() {
            url.push('/');
            url.push_str(segment);
        }
    }
    url
}
