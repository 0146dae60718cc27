use plantflow_types::CreatorRole;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration loaded from plantflow.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlantflowConfig {
    /// Backend connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Wizard defaults
    #[serde(default)]
    pub wizard: WizardConfig,

    /// Local template catalog
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the compliance REST backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Wizard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Assignee pre-filled on every task
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_assignee: Option<String>,

    /// Days from today used for pre-filled due dates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_due_offset_days: Option<u32>,

    /// Role recorded as workflow creator
    #[serde(default)]
    pub creator_role: CreatorRole,

    /// Interpret task applicability expressions instead of only the entity rules
    #[serde(default)]
    pub evaluate_conditions: bool,
}

/// Catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// YAML or JSON file used instead of the template service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        WizardConfig {
            default_assignee: None,
            default_due_offset_days: None,
            creator_role: CreatorRole::default(),
            evaluate_conditions: false,
        }
    }
}


pub mod loader;
pub mod validation;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;
