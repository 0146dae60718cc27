#![allow(clippy::result_large_err)]

use super::PlantflowConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use url::Url;

/// Longest due offset accepted for pre-filled task deadlines.
pub const MAX_DUE_OFFSET_DAYS: u32 = 3650;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration rules
    pub fn validate(config: &PlantflowConfig) -> Result<(), AppError> {
        let parsed = Url::parse(&config.api.base_url).map_err(|err| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!("api.base_url is not a valid URL: {}", err),
            )
            .with_code("CFG-VAL-001")
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                "api.base_url must use http or https",
            )
            .with_code("CFG-VAL-001"));
        }

        if config.api.timeout_seconds == 0 {
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                "api.timeout_seconds must be greater than zero",
            )
            .with_code("CFG-VAL-002"));
        }

        if let Some(offset) = config.wizard.default_due_offset_days {
            if offset > MAX_DUE_OFFSET_DAYS {
                return Err(AppError::new(
                    ErrorCategory::ConfigError,
                    format!(
                        "wizard.default_due_offset_days must not exceed {}",
                        MAX_DUE_OFFSET_DAYS
                    ),
                )
                .with_code("CFG-VAL-003"));
            }
        }

        Ok(())
    }
}
