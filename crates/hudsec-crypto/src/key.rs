// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The 16-byte confidentiality key.

use hudsec_core::KEY_SIZE;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES-128 key the server uses for every stored secret.
///
/// Derived once per run and never mutated afterwards. The bytes are zeroed
/// when the value is dropped and never appear in `Debug` output.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ConfidentialityKey([u8; KEY_SIZE]);

impl ConfidentialityKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw key bytes for a cipher.
    pub fn expose(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for ConfidentialityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ConfidentialityKey([REDACTED])")
    }
}
