// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offline decryption of secrets stored by the automation server.
//!
//! The server protects stored secrets with a two-tier key hierarchy: a random
//! `master.key` unwraps the confidentiality key in `hudson.util.Secret`, and
//! the confidentiality key encrypts every secret in the configuration files.
//! This crate reproduces both tiers:
//!
//! - [`kdf`] turns the two key files into a [`ConfidentialityKey`]
//! - [`codec`] decrypts individual secret tokens in either storage format

pub mod block;
pub mod codec;
pub mod kdf;
pub mod key;

pub use codec::{decrypt, DecryptedSecret, SecretFormat};
pub use kdf::{derive, load_confidentiality_key};
pub use key::ConfidentialityKey;

/// Offset of the first magic marker in `haystack`, if any.
pub(crate) fn find_magic(haystack: &[u8]) -> Option<usize> {
    let magic = hudsec_core::MAGIC_MARKER.as_slice();
    haystack.windows(magic.len()).position(|w| w == magic)
}
