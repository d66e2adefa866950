// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret token decoding and decryption.
//!
//! The server has stored secrets in two layouts over time:
//!
//! | Format | Layout (after base64)                                        |
//! |--------|--------------------------------------------------------------|
//! | new    | `0x01`, 8 header bytes, 16-byte IV, AES-128-CBC ciphertext   |
//! | old    | AES-128-ECB of `plaintext || ::::MAGIC:::: || padding`       |
//!
//! The first decoded byte picks the layout. Each layout is decrypted by a
//! pure function over the decoded bytes.

use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use hudsec_core::{HudsecError, BLOCK_SIZE};
use tracing::debug;

use crate::block::{cbc_decrypt, ecb_decrypt};
use crate::find_magic;
use crate::key::ConfidentialityKey;

/// Version byte that marks the CBC layout.
pub const NEW_FORMAT_VERSION: u8 = 1;

/// Version byte plus the IV and data length fields.
const NEW_FORMAT_HEADER_LEN: usize = 9;

/// Start of the ciphertext in the CBC layout.
const NEW_FORMAT_PAYLOAD_OFFSET: usize = NEW_FORMAT_HEADER_LEN + BLOCK_SIZE;

/// Standard alphabet, padding required, stray low bits in the last symbol
/// tolerated.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Storage layout of a decoded secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretFormat {
    /// Versioned AES-128-CBC with an embedded IV.
    New,
    /// Headerless AES-128-ECB with the magic marker as integrity check.
    Old,
}

impl SecretFormat {
    /// Classify decoded bytes by their first byte. `None` for empty input.
    pub fn detect(decoded: &[u8]) -> Option<Self> {
        decoded.first().map(|&version| {
            if version == NEW_FORMAT_VERSION {
                SecretFormat::New
            } else {
                SecretFormat::Old
            }
        })
    }
}

impl std::fmt::Display for SecretFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretFormat::New => f.write_str("new"),
            SecretFormat::Old => f.write_str("old"),
        }
    }
}

/// Plaintext recovered from a token.
///
/// Bytes are not assumed to be UTF-8. An empty secret means the field held
/// no value.
#[derive(Clone, PartialEq, Eq)]
pub struct DecryptedSecret(Vec<u8>);

impl DecryptedSecret {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The secret as text, if it is valid UTF-8.
    pub fn as_utf8(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.0)
    }
}

impl std::fmt::Debug for DecryptedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DecryptedSecret({} bytes)", self.0.len())
    }
}

/// Base64-decode a token.
///
/// ASCII whitespace inside the token is ignored. Any other character outside
/// the standard alphabet fails the token rather than being skipped.
pub fn decode_token(token: &str) -> Result<Vec<u8>, HudsecError> {
    let compact: String = token.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    TOKEN_ENGINE
        .decode(compact.as_bytes())
        .map_err(|e| HudsecError::TokenDecode {
            token: token.to_string(),
            reason: e.to_string(),
        })
}

/// Decode and decrypt one secret token.
pub fn decrypt(token: &str, key: &ConfidentialityKey) -> Result<DecryptedSecret, HudsecError> {
    let decoded = decode_token(token)?;
    decrypt_bytes(&decoded, key)
}

/// Decrypt an already decoded token, dispatching on its version byte.
pub fn decrypt_bytes(
    decoded: &[u8],
    key: &ConfidentialityKey,
) -> Result<DecryptedSecret, HudsecError> {
    let format = SecretFormat::detect(decoded).ok_or_else(|| {
        HudsecError::SecretDecryption("token decodes to zero bytes".to_string())
    })?;
    debug!(%format, decoded_len = decoded.len(), "decrypting secret");

    match format {
        SecretFormat::New => decrypt_new_format(decoded, key),
        SecretFormat::Old => decrypt_old_format(decoded, key),
    }
}

/// CBC layout: skip the 9-byte header, read the IV, decrypt the rest.
///
/// The header's length fields are not checked.
pub fn decrypt_new_format(
    decoded: &[u8],
    key: &ConfidentialityKey,
) -> Result<DecryptedSecret, HudsecError> {
    if decoded.len() < NEW_FORMAT_PAYLOAD_OFFSET {
        return Err(HudsecError::SecretDecryption(format!(
            "new-format secret is {} bytes, shorter than its {}-byte header",
            decoded.len(),
            NEW_FORMAT_PAYLOAD_OFFSET
        )));
    }

    let mut iv = [0u8; BLOCK_SIZE];
    iv.copy_from_slice(&decoded[NEW_FORMAT_HEADER_LEN..NEW_FORMAT_PAYLOAD_OFFSET]);

    let plain = cbc_decrypt(key.expose(), &iv, &decoded[NEW_FORMAT_PAYLOAD_OFFSET..])
        .map_err(|e| HudsecError::SecretDecryption(format!("new-format {e}")))?;

    Ok(DecryptedSecret(strip_lenient_padding(plain)))
}

/// ECB layout: the secret is everything before the first magic marker.
pub fn decrypt_old_format(
    decoded: &[u8],
    key: &ConfidentialityKey,
) -> Result<DecryptedSecret, HudsecError> {
    let mut plain = ecb_decrypt(key.expose(), decoded)
        .map_err(|e| HudsecError::SecretDecryption(format!("old-format {e}")))?;

    let end = find_magic(&plain).ok_or_else(|| {
        HudsecError::SecretDecryption(
            "magic marker not found; secret was not encrypted with this key".to_string(),
        )
    })?;
    plain.truncate(end);
    Ok(DecryptedSecret(plain))
}

/// Remove PKCS#7 padding the way the server's own tooling tolerates it.
///
/// The last byte is the pad length. A value above 16 means the buffer is
/// returned untouched rather than rejected; a value of 0 removes nothing.
/// The pad bytes themselves are not inspected.
pub fn strip_lenient_padding(mut plain: Vec<u8>) -> Vec<u8> {
    let Some(&pad) = plain.last() else {
        return plain;
    };
    let pad = usize::from(pad);
    if pad > BLOCK_SIZE {
        return plain;
    }
    plain.truncate(plain.len().saturating_sub(pad));
    plain
}

#[cfg(test)]
mod tests {
    use super::*;
    use hudsec_test_utils::fixtures::{encrypt_new_format, encrypt_old_format, new_format_bytes};

    const KEY: [u8; 16] = *b"0123456789abcdef";
    const IV: [u8; 16] = *b"fedcba9876543210";

    fn key() -> ConfidentialityKey {
        ConfidentialityKey::from_bytes(KEY)
    }

    #[test]
    fn detect_picks_format_from_first_byte() {
        assert_eq!(SecretFormat::detect(&[1, 0, 0]), Some(SecretFormat::New));
        assert_eq!(SecretFormat::detect(&[0]), Some(SecretFormat::Old));
        assert_eq!(SecretFormat::detect(&[2, 1]), Some(SecretFormat::Old));
        assert_eq!(SecretFormat::detect(&[]), None);
    }

    #[test]
    fn old_format_roundtrip() {
        let token = encrypt_old_format(&KEY, b"hunter2");
        let secret = decrypt(&token, &key()).unwrap();
        assert_eq!(secret.as_bytes(), b"hunter2");
    }

    #[test]
    fn old_format_stops_at_first_magic() {
        let token = encrypt_old_format(&KEY, b"a::::MAGIC::::b");
        let secret = decrypt(&token, &key()).unwrap();
        assert_eq!(secret.as_bytes(), b"a");
    }

    #[test]
    fn old_format_with_wrong_key_fails() {
        let token = encrypt_old_format(&[0x11; 16], b"hunter2");
        let err = decrypt(&token, &key()).unwrap_err();
        assert!(matches!(err, HudsecError::SecretDecryption(_)));
    }

    #[test]
    fn old_format_shorter_than_a_block_fails() {
        // First byte is not the new-format version, so the old path handles it.
        let err = decrypt_bytes(&[0x42; 10], &key()).unwrap_err();
        assert!(matches!(err, HudsecError::SecretDecryption(_)));
    }

    #[test]
    fn new_format_roundtrip() {
        let token = encrypt_new_format(&KEY, &IV, b"correct horse battery staple");
        let secret = decrypt(&token, &key()).unwrap();
        assert_eq!(secret.as_bytes(), b"correct horse battery staple");
    }

    #[test]
    fn new_format_empty_plaintext_is_empty_secret() {
        let token = encrypt_new_format(&KEY, &IV, b"");
        let secret = decrypt(&token, &key()).unwrap();
        assert!(secret.is_empty());
    }

    #[test]
    fn new_format_padding_above_sixteen_is_kept() {
        let mut padded = vec![b'x'; 31];
        padded.push(17);
        let bytes = new_format_bytes(&KEY, &IV, &padded);

        let secret = decrypt_bytes(&bytes, &key()).unwrap();
        assert_eq!(secret.as_bytes(), padded.as_slice());
    }

    #[test]
    fn new_format_shorter_than_header_fails() {
        let mut bytes = vec![NEW_FORMAT_VERSION];
        bytes.extend_from_slice(&[0u8; 20]);

        let err = decrypt_bytes(&bytes, &key()).unwrap_err();
        assert!(matches!(err, HudsecError::SecretDecryption(_)));
    }

    #[test]
    fn new_format_without_ciphertext_fails() {
        let mut bytes = vec![NEW_FORMAT_VERSION];
        bytes.extend_from_slice(&[0u8; 24]);

        let err = decrypt_bytes(&bytes, &key()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn new_format_misaligned_ciphertext_fails() {
        let mut bytes = new_format_bytes(&KEY, &IV, &[4u8; 16]);
        bytes.push(0);

        let err = decrypt_bytes(&bytes, &key()).unwrap_err();
        assert!(matches!(err, HudsecError::SecretDecryption(_)));
    }

    #[test]
    fn empty_token_fails() {
        let err = decrypt("", &key()).unwrap_err();
        assert!(matches!(err, HudsecError::SecretDecryption(_)));
    }

    #[test]
    fn invalid_base64_carries_the_token() {
        let err = decrypt("not*base64!", &key()).unwrap_err();
        match err {
            HudsecError::TokenDecode { token, .. } => assert_eq!(token, "not*base64!"),
            other => panic!("expected TokenDecode, got {other:?}"),
        }
    }

    #[test]
    fn decode_ignores_embedded_whitespace() {
        assert_eq!(decode_token("QU\nJD ").unwrap(), b"ABC");
    }

    #[test]
    fn decode_rejects_characters_outside_the_alphabet() {
        let err = decode_token("QUJD!").unwrap_err();
        assert!(matches!(err, HudsecError::TokenDecode { .. }));
        assert!(decode_token("QU-JD").is_err());
    }

    #[test]
    fn decode_requires_padding() {
        assert!(decode_token("QUI").is_err());
        assert_eq!(decode_token("QUI=").unwrap(), b"AB");
    }

    #[test]
    fn strip_padding_edge_values() {
        assert_eq!(strip_lenient_padding(vec![]), Vec::<u8>::new());
        assert_eq!(strip_lenient_padding(vec![b'a', 0]), vec![b'a', 0]);
        assert_eq!(strip_lenient_padding(vec![b'a', 1]), vec![b'a']);
        let mut full_block = vec![b'a'];
        full_block.extend_from_slice(&[16; 16]);
        assert_eq!(strip_lenient_padding(full_block), vec![b'a']);
        assert_eq!(strip_lenient_padding(vec![200]), vec![200]);
        assert_eq!(strip_lenient_padding(vec![5]), Vec::<u8>::new());
    }

    #[test]
    fn debug_hides_plaintext() {
        let secret = DecryptedSecret(b"hunter2".to_vec());
        assert_eq!(format!("{secret:?}"), "DecryptedSecret(7 bytes)");
    }
}
