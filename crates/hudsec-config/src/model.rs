// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for hudsec.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a mistyped key is an
//! error at startup instead of a silently ignored setting.

use hudsec_core::DEFAULT_FIELD_TAGS;
use serde::{Deserialize, Serialize};

/// Top-level hudsec configuration.
///
/// Every section is optional and falls back to the layout and field names of
/// a stock server installation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HudsecConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// File names inside a server home directory.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Token extraction settings.
    #[serde(default)]
    pub extract: ExtractConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Base level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Paths of the input files, relative to the server home directory.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Document holding the encrypted credentials.
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,

    /// Random master key, stored as text.
    #[serde(default = "default_master_key_file")]
    pub master_key_file: String,

    /// Confidentiality key wrapped under the master key.
    #[serde(default = "default_confidentiality_key_file")]
    pub confidentiality_key_file: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            credentials_file: default_credentials_file(),
            master_key_file: default_master_key_file(),
            confidentiality_key_file: default_confidentiality_key_file(),
        }
    }
}

fn default_credentials_file() -> String {
    "credentials.xml".to_string()
}

fn default_master_key_file() -> String {
    "secrets/master.key".to_string()
}

fn default_confidentiality_key_file() -> String {
    "secrets/hudson.util.Secret".to_string()
}

/// Token extraction configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractConfig {
    /// Element names whose bodies hold encrypted values. Replaces the
    /// built-in list when set.
    #[serde(default = "default_field_tags")]
    pub field_tags: Vec<String>,

    /// Element names searched in addition to `field_tags`.
    #[serde(default)]
    pub extra_field_tags: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            field_tags: default_field_tags(),
            extra_field_tags: Vec::new(),
        }
    }
}

impl ExtractConfig {
    /// `field_tags` followed by `extra_field_tags`.
    pub fn all_tags(&self) -> impl Iterator<Item = &str> {
        self.field_tags
            .iter()
            .chain(self.extra_field_tags.iter())
            .map(String::as_str)
    }
}

fn default_field_tags() -> Vec<String> {
    DEFAULT_FIELD_TAGS.iter().map(|s| s.to_string()).collect()
}
