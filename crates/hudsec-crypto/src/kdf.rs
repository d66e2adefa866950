// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Confidentiality key derivation from the two on-disk key files.
//!
//! `master.key` is hashed with SHA-256 and truncated to 16 bytes (the server
//! caps itself at AES-128 for export-control reasons). That value is the
//! AES-128-ECB key for `hudson.util.Secret`, whose plaintext carries the
//! magic marker and starts with the confidentiality key.

use std::path::Path;

use hudsec_core::{HudsecError, KEY_SIZE};
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::Zeroizing;

use crate::block::ecb_decrypt;
use crate::find_magic;
use crate::key::ConfidentialityKey;

/// Drop one trailing `\n` left behind by copy/paste or base64 tooling.
///
/// Only applies when the length is odd, so a genuine even-length key that
/// happens to end in `0x0a` is left alone. At most one byte is removed.
pub fn strip_newline_artifact(bytes: &[u8]) -> &[u8] {
    match bytes.split_last() {
        Some((b'\n', rest)) if bytes.len() % 2 != 0 => rest,
        _ => bytes,
    }
}

/// Derive the confidentiality key from raw key file contents.
///
/// Fails with [`HudsecError::KeyDerivation`] when the wrapped key is not
/// block-aligned or its plaintext lacks the magic marker.
pub fn derive(master_key: &[u8], wrapped_key: &[u8]) -> Result<ConfidentialityKey, HudsecError> {
    let master_key = strip_newline_artifact(master_key);
    let wrapped_key = strip_newline_artifact(wrapped_key);

    let digest = Sha256::digest(master_key);
    let mut unwrap_key = Zeroizing::new([0u8; KEY_SIZE]);
    unwrap_key.copy_from_slice(&digest[..KEY_SIZE]);

    let unwrapped = Zeroizing::new(
        ecb_decrypt(&unwrap_key, wrapped_key)
            .map_err(|e| HudsecError::KeyDerivation(format!("wrapped key: {e}")))?,
    );

    if find_magic(&unwrapped).is_none() {
        return Err(HudsecError::KeyDerivation(
            "magic marker not found; master key and wrapped key do not belong together"
                .to_string(),
        ));
    }

    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&unwrapped[..KEY_SIZE]);
    debug!(wrapped_len = wrapped_key.len(), "confidentiality key unwrapped");
    Ok(ConfidentialityKey::from_bytes(key))
}

/// Read both key files and derive the confidentiality key.
pub fn load_confidentiality_key(
    master_key_path: &Path,
    wrapped_key_path: &Path,
) -> Result<ConfidentialityKey, HudsecError> {
    let master_key = Zeroizing::new(
        std::fs::read(master_key_path).map_err(|e| HudsecError::file_access(master_key_path, e))?,
    );
    let wrapped_key = std::fs::read(wrapped_key_path)
        .map_err(|e| HudsecError::file_access(wrapped_key_path, e))?;

    derive(&master_key, &wrapped_key)
}
