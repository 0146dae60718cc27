use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::entity::UnknownValue;

/// Document template that can be attached to a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTemplateRef {
    #[serde(deserialize_with = "crate::string_or_number")]
    pub id: String,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "categoria", default)]
    pub category: Option<String>,
}

/// Placeholder fill preview for a document template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentPreview {
    #[serde(default)]
    pub placeholders: BTreeMap<String, String>,
    #[serde(default)]
    pub missing: Vec<String>,
}

impl DocumentPreview {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Output format requested from the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Docx,
    Pdf,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Docx => f.write_str("docx"),
            DocumentFormat::Pdf => f.write_str("pdf"),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "docx" => Ok(DocumentFormat::Docx),
            "pdf" => Ok(DocumentFormat::Pdf),
            _ => Err(UnknownValue {
                kind: "document format",
                value: value.to_string(),
            }),
        }
    }
}

/// Reference to a generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    #[serde(deserialize_with = "crate::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub format: DocumentFormat,
}

/// Response of the workflow creation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedWorkflow {
    #[serde(deserialize_with = "crate::string_or_number")]
    pub id: String,
}
