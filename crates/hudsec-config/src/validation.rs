// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::path::Path;

use crate::diagnostic::ConfigError;
use crate::model::HudsecConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &HudsecConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.log.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let layout = [
        ("layout.credentials_file", &config.layout.credentials_file),
        ("layout.master_key_file", &config.layout.master_key_file),
        (
            "layout.confidentiality_key_file",
            &config.layout.confidentiality_key_file,
        ),
    ];
    for (key, value) in layout {
        if value.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        } else if Path::new(value).is_absolute() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be relative to the server home, got `{value}`"),
            });
        }
    }

    if config.extract.all_tags().next().is_none() {
        errors.push(ConfigError::Validation {
            message: "extract.field_tags and extract.extra_field_tags are both empty".to_string(),
        });
    }

    for tag in config.extract.all_tags() {
        if tag.is_empty() {
            errors.push(ConfigError::Validation {
                message: "extract field tags must not be empty strings".to_string(),
            });
        } else if let Some(c) = tag
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, '<' | '>' | '/'))
        {
            errors.push(ConfigError::Validation {
                message: format!("extract field tag `{tag}` contains invalid character {c:?}"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
