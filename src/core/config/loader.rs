#![allow(clippy::result_large_err)]

use super::PlantflowConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::env;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "plantflow.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from workspace root (workspace/plantflow.toml)
    /// Environment variables override config file values
    pub fn load_from_workspace(workspace_path: &Path) -> Result<PlantflowConfig, AppError> {
        let config_path = workspace_path.join(CONFIG_FILE_NAME);
        let config_file = Self::load_from_file(&config_path)?;

        let mut config = config_file.unwrap_or_default();
        Self::apply_env_overrides(&mut config)?;

        // Relative catalog paths are anchored to the workspace, whichever source set them.
        if let Some(catalog) = config.catalog.file.as_mut() {
            if catalog.is_relative() {
                *catalog = workspace_path.join(&*catalog);
            }
        }

        Ok(config)
    }

    /// Load config from specific file path
    /// Returns Ok(None) if file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<PlantflowConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read config file {}: {}", path.display(), e),
            )
        })?;

        let config: PlantflowConfig = toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
            .with_code("CFG-PARSE-001")
        })?;

        Ok(Some(config))
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(config: &mut PlantflowConfig) -> Result<(), AppError> {
        if let Ok(base_url) = env::var("PLANTFLOW_API_BASE_URL") {
            config.api.base_url = base_url;
        }

        if let Ok(timeout) = env::var("PLANTFLOW_API_TIMEOUT_SECONDS") {
            config.api.timeout_seconds = parse_env("PLANTFLOW_API_TIMEOUT_SECONDS", &timeout)?;
        }

        if let Ok(assignee) = env::var("PLANTFLOW_DEFAULT_ASSIGNEE") {
            config.wizard.default_assignee = Some(assignee).filter(|value| !value.trim().is_empty());
        }

        if let Ok(offset) = env::var("PLANTFLOW_DEFAULT_DUE_OFFSET_DAYS") {
            config.wizard.default_due_offset_days =
                Some(parse_env("PLANTFLOW_DEFAULT_DUE_OFFSET_DAYS", &offset)?);
        }

        if let Ok(role) = env::var("PLANTFLOW_CREATOR_ROLE") {
            config.wizard.creator_role = parse_env("PLANTFLOW_CREATOR_ROLE", &role)?;
        }

        if let Ok(flag) = env::var("PLANTFLOW_EVALUATE_CONDITIONS") {
            config.wizard.evaluate_conditions = parse_env("PLANTFLOW_EVALUATE_CONDITIONS", &flag)?;
        }

        if let Ok(catalog) = env::var("PLANTFLOW_CATALOG_FILE") {
            config.catalog.file = Some(PathBuf::from(catalog));
        }

        Ok(())
    }
}

fn parse_env<T>(name: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|err| {
        AppError::new(
            ErrorCategory::ConfigError,
            format!("Invalid value '{}' for {}: {}", raw, name, err),
        )
        .with_code("CFG-ENV-001")
    })
}
