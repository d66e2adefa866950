// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encryption side of the host system's secret formats.
//!
//! Only tests need this direction. Helpers panic on misuse instead of
//! returning errors.

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use base64::{engine::general_purpose::STANDARD, Engine};
use cbc::cipher::{block_padding::NoPadding, BlockEncryptMut, KeyIvInit};
use hudsec_core::{BLOCK_SIZE, KEY_SIZE, MAGIC_MARKER};
use sha2::{Digest, Sha256};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

/// A master key in the shape the host system writes: lowercase hex text.
pub const TEST_MASTER_KEY: &[u8] =
    b"4f1c7a3e9b2d8c6a0e5f1b3d7c9a2e4f6b8d0c1e3a5f7b9d2c4e6a8f0b1d3c5e\
      9a7b5c3d1e2f4a6b8c0d2e4f6a8b0c1d3e5f7a9b1c3d5e7f9a0b2c4d6e8f0a1b";

/// Append PKCS#7 padding up to the next block boundary.
pub fn pkcs7_pad(data: &[u8]) -> Vec<u8> {
    let pad = BLOCK_SIZE - data.len() % BLOCK_SIZE;
    let mut out = data.to_vec();
    out.resize(data.len() + pad, pad as u8);
    out
}

/// AES-128-ECB over block-aligned input.
pub fn ecb_encrypt(key: &[u8; KEY_SIZE], data: &[u8]) -> Vec<u8> {
    assert_eq!(data.len() % BLOCK_SIZE, 0, "ECB input must be block aligned");
    let cipher = aes::Aes128::new(GenericArray::from_slice(key));
    let mut out = data.to_vec();
    for block in out.chunks_mut(BLOCK_SIZE) {
        cipher.encrypt_block(GenericArray::from_mut_slice(block));
    }
    out
}

/// AES-128-CBC over block-aligned input.
pub fn cbc_encrypt(key: &[u8; KEY_SIZE], iv: &[u8; BLOCK_SIZE], data: &[u8]) -> Vec<u8> {
    assert_eq!(data.len() % BLOCK_SIZE, 0, "CBC input must be block aligned");
    let encryptor = Aes128CbcEnc::new(GenericArray::from_slice(key), GenericArray::from_slice(iv));
    let mut out = data.to_vec();
    encryptor
        .encrypt_padded_mut::<NoPadding>(&mut out, data.len())
        .expect("block-aligned input needs no padding");
    out
}

/// The AES key the host derives from `master.key`: SHA-256 truncated to 16 bytes.
pub fn master_derived_key(master_key: &[u8]) -> [u8; KEY_SIZE] {
    let digest = Sha256::digest(master_key);
    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&digest[..KEY_SIZE]);
    key
}

/// Build the contents of `hudson.util.Secret` for `key_material`.
///
/// The host stores random key material followed by the magic marker, PKCS#7
/// padded and ECB-encrypted under the key derived from `master_key`. The first
/// 16 bytes of `key_material` become the confidentiality key.
pub fn wrap_confidentiality_key(master_key: &[u8], key_material: &[u8]) -> Vec<u8> {
    let mut plain = key_material.to_vec();
    plain.extend_from_slice(MAGIC_MARKER);
    ecb_encrypt(&master_derived_key(master_key), &pkcs7_pad(&plain))
}

/// Old format: `base64(AES-128-ECB(plaintext || magic || padding))`.
pub fn encrypt_old_format(key: &[u8; KEY_SIZE], plaintext: &[u8]) -> String {
    let mut plain = plaintext.to_vec();
    plain.extend_from_slice(MAGIC_MARKER);
    STANDARD.encode(ecb_encrypt(key, &pkcs7_pad(&plain)))
}

/// New format: `base64(0x01 || iv_len || data_len || iv || AES-128-CBC(pkcs7(plaintext)))`.
///
/// Both lengths are 4-byte big-endian integers.
pub fn encrypt_new_format(key: &[u8; KEY_SIZE], iv: &[u8; BLOCK_SIZE], plaintext: &[u8]) -> String {
    STANDARD.encode(new_format_bytes(key, iv, &pkcs7_pad(plaintext)))
}

/// New-format envelope around an already padded buffer.
///
/// Lets tests control the final padding byte directly.
pub fn new_format_bytes(key: &[u8; KEY_SIZE], iv: &[u8; BLOCK_SIZE], padded: &[u8]) -> Vec<u8> {
    let data = cbc_encrypt(key, iv, padded);
    let mut out = Vec::with_capacity(9 + BLOCK_SIZE + data.len());
    out.push(1u8);
    out.extend_from_slice(&(BLOCK_SIZE as u32).to_be_bytes());
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(iv);
    out.extend_from_slice(&data);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pkcs7_pad_always_adds_a_byte() {
        assert_eq!(pkcs7_pad(&[0u8; 16]).len(), 32);
        assert_eq!(pkcs7_pad(b"abc").len(), 16);
        assert_eq!(pkcs7_pad(b"abc")[15], 13);
    }

    #[test]
    fn new_format_header_is_nine_bytes() {
        let bytes = new_format_bytes(&[7u8; 16], &[9u8; 16], &[0u8; 32]);
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[9..25], &[9u8; 16]);
        assert_eq!(bytes.len(), 25 + 32);
    }
}
