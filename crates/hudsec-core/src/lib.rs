// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for hudsec.
//!
//! Holds the error taxonomy shared by the key derivation, secret codec and
//! token extraction crates, plus the constants that describe the host
//! system's on-disk secret format.

pub mod error;

pub use error::HudsecError;

/// Marker the host system appends to plaintext before ECB encryption.
///
/// Its presence after decryption is the only signal that the right key was
/// used.
pub const MAGIC_MARKER: &[u8; 13] = b"::::MAGIC::::";

/// Element names the server uses for encrypted values.
pub const DEFAULT_FIELD_TAGS: &[&str] = &[
    "apiToken",
    "password",
    "privateKey",
    "passphrase",
    "secret",
    "secretId",
    "value",
    "defaultValue",
];

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Length of the confidentiality key (AES-128).
pub const KEY_SIZE: usize = 16;
