// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for hudsec integration tests.
//!
//! Produces key files and encrypted secrets the same way the host server
//! does, so recovery can be exercised without a real server installation.
//!
//! # Components
//!
//! - [`fixtures`] - encryption helpers for both secret formats and the wrapped key
//! - [`ServerHome`] - a temporary server home directory with key files on disk

pub mod fixtures;
pub mod home;

pub use fixtures::{
    encrypt_new_format, encrypt_old_format, wrap_confidentiality_key, TEST_MASTER_KEY,
};
pub use home::{default_key_material, ServerHome};
