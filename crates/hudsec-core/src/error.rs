// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for offline secret recovery.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across the hudsec crates.
///
/// Per-token variants ([`TokenDecode`](HudsecError::TokenDecode),
/// [`SecretDecryption`](HudsecError::SecretDecryption)) are reported and
/// skipped by the batch driver. Everything else stops the run, see
/// [`HudsecError::is_fatal`].
#[derive(Debug, Error)]
pub enum HudsecError {
    /// The confidentiality key could not be unwrapped from the key files.
    ///
    /// Raised when the wrapped key is not block-aligned or the magic marker is
    /// absent after decryption. Which of the two files is wrong cannot be told
    /// apart.
    #[error("failed decrypting confidentiality key: {0}")]
    KeyDerivation(String),

    /// A secret token is not valid base64.
    #[error("failed base64 decoding the input with error: {reason}")]
    TokenDecode { token: String, reason: String },

    /// A decoded token did not decrypt to a well-formed secret.
    #[error("failed decrypting secret: {0}")]
    SecretDecryption(String),

    /// A required input file is missing or unreadable.
    #[error("cannot read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid configuration (bad field tag, unusable layout).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HudsecError {
    /// Whether this error halts the whole run.
    ///
    /// Only failures tied to a single token are recoverable; a batch keeps
    /// going past them.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            HudsecError::TokenDecode { .. } | HudsecError::SecretDecryption(_)
        )
    }

    /// Build a [`HudsecError::FileAccess`] for `path`.
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HudsecError::FileAccess {
            path: path.into(),
            source,
        }
    }
}
