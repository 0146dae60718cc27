#![allow(clippy::result_large_err)]

//! In-memory template catalog, filled from the template service or a local file.

use crate::api::TemplateQuery;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use indexmap::IndexMap;
use plantflow_types::{Phase, WorkflowTemplate};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<WorkflowTemplate>,
}

impl TemplateCatalog {
    /// Build a catalog; duplicate ids are rejected.
    pub fn new(templates: Vec<WorkflowTemplate>) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        for template in &templates {
            if !seen.insert(template.id.as_str()) {
                return Err(AppError::new(
                    ErrorCategory::ValidationError,
                    format!("duplicate template id '{}' in catalog", template.id),
                )
                .with_code("CAT-DUP-001"));
            }
        }
        Ok(TemplateCatalog { templates })
    }

    /// Load a catalog from a YAML (`.yaml`/`.yml`) or JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read template catalog {}: {}", path.display(), e),
            )
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let templates: Vec<WorkflowTemplate> = if is_json {
            serde_json::from_str(&content).map_err(|e| parse_error(path, e))?
        } else {
            serde_yaml::from_str(&content).map_err(|e| parse_error(path, e))?
        };

        tracing::debug!(
            "Loaded {} templates from {}",
            templates.len(),
            path.display()
        );
        Self::new(templates)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn templates(&self) -> &[WorkflowTemplate] {
        &self.templates
    }

    pub fn get(&self, template_id: &str) -> Option<&WorkflowTemplate> {
        self.templates.iter().find(|template| template.id == template_id)
    }

    /// Templates matching the same query the template service accepts.
    pub fn query(&self, query: TemplateQuery) -> Vec<&WorkflowTemplate> {
        self.templates
            .iter()
            .filter(|template| query.phase.is_none() || template.phase == query.phase)
            .filter(|template| {
                query
                    .min_power
                    .map(|power| template.applies_to_power(power))
                    .unwrap_or(true)
            })
            .collect()
    }

    /// Phase templates grouped by phase, in canonical phase order.
    pub fn by_phase(&self) -> IndexMap<Phase, Vec<&WorkflowTemplate>> {
        let mut grouped = IndexMap::new();
        for phase in Phase::ALL {
            let templates: Vec<&WorkflowTemplate> = self
                .templates
                .iter()
                .filter(|template| template.phase == Some(phase))
                .collect();
            if !templates.is_empty() {
                grouped.insert(phase, templates);
            }
        }
        grouped
    }

    /// Check that `template_id` exists and belongs to `phase`.
    pub fn resolve_phase_template(
        &self,
        phase: Phase,
        template_id: &str,
    ) -> Result<&WorkflowTemplate, AppError> {
        let template = self.get(template_id).ok_or_else(|| {
            AppError::new(
                ErrorCategory::ValidationError,
                format!("template '{}' not found in catalog", template_id),
            )
            .with_code("CAT-MISS-001")
        })?;
        if template.phase.is_some_and(|own| own != phase) {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                format!(
                    "template '{}' covers phase {:?}, not {}",
                    template_id, template.phase, phase
                ),
            )
            .with_code("CAT-PHASE-001"));
        }
        Ok(template)
    }
}

fn parse_error(path: &Path, err: impl std::fmt::Display) -> AppError {
    AppError::new(
        ErrorCategory::SerializationError,
        format!("Failed to parse template catalog {}: {}", path.display(), err),
    )
    .with_code("CAT-PARSE-001")
}
