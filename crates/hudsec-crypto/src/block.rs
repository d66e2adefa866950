// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw AES-128 decryption in the two block modes the server uses.
//!
//! No padding is removed here. Callers decide what a valid plaintext looks
//! like.

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, KeyInit};
use cbc::cipher::{block_padding::NoPadding, BlockDecryptMut, KeyIvInit};
use hudsec_core::{BLOCK_SIZE, KEY_SIZE};
use thiserror::Error;

type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Ciphertext that cannot be fed to a block cipher.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockError {
    #[error("ciphertext is empty")]
    Empty,

    #[error("ciphertext length {len} is not a multiple of 16 bytes")]
    Misaligned { len: usize },
}

fn check_aligned(data: &[u8]) -> Result<(), BlockError> {
    if data.is_empty() {
        return Err(BlockError::Empty);
    }
    if data.len() % BLOCK_SIZE != 0 {
        return Err(BlockError::Misaligned { len: data.len() });
    }
    Ok(())
}

/// Decrypt with AES-128 in ECB mode.
pub fn ecb_decrypt(key: &[u8; KEY_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>, BlockError> {
    check_aligned(ciphertext)?;

    let cipher = aes::Aes128::new(GenericArray::from_slice(key));
    let mut out = ciphertext.to_vec();
    for block in out.chunks_mut(BLOCK_SIZE) {
        cipher.decrypt_block(GenericArray::from_mut_slice(block));
    }
    Ok(out)
}

/// Decrypt with AES-128 in CBC mode.
pub fn cbc_decrypt(
    key: &[u8; KEY_SIZE],
    iv: &[u8; BLOCK_SIZE],
    ciphertext: &[u8],
) -> Result<Vec<u8>, BlockError> {
    check_aligned(ciphertext)?;

    let decryptor = Aes128CbcDec::new(GenericArray::from_slice(key), GenericArray::from_slice(iv));
    let mut out = ciphertext.to_vec();
    let plain_len = decryptor
        .decrypt_padded_mut::<NoPadding>(&mut out)
        .map_err(|_| BlockError::Misaligned {
            len: ciphertext.len(),
        })?
        .len();
    out.truncate(plain_len);
    Ok(out)
}
