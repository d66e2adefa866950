// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./hudsec.toml` > `~/.config/hudsec/hudsec.toml` >
//! `/etc/hudsec/hudsec.toml`.
//! There is no environment variable layer; log filtering via `RUST_LOG` is
//! handled by the binary.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};

use crate::model::HudsecConfig;

pub(crate) const SYSTEM_CONFIG_PATH: &str = "/etc/hudsec/hudsec.toml";
pub(crate) const LOCAL_CONFIG_PATH: &str = "hudsec.toml";

pub(crate) fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("hudsec/hudsec.toml"))
        .unwrap_or_default()
}

/// Load configuration from the standard XDG hierarchy.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/hudsec/hudsec.toml` (system-wide)
/// 3. `~/.config/hudsec/hudsec.toml` (user XDG config)
/// 4. `./hudsec.toml` (local directory)
pub fn load_config() -> Result<HudsecConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string on top of the defaults.
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<HudsecConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HudsecConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one specific file on top of the defaults.
///
/// The XDG hierarchy is skipped. Figment treats a missing file as empty;
/// [`crate::load_and_validate_path`] rejects it first.
pub fn load_config_from_path(path: &Path) -> Result<HudsecConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HudsecConfig::default()))
        .merge(Toml::file(path))
        .extract()
}

/// Build the Figment used for hierarchy loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HudsecConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
}
