//! NEA2 (128-NEA2 / 128-EEA2) ciphering algorithm
//!
//! AES-128 in counter mode with the initial counter block
//! `COUNT || BEARER || DIRECTION || 0^90`. Encryption and decryption are the
//! same keystream XOR. Buffers are taken by value and returned so the caller
//! never shares a slice with the cipher.

use aes::Aes128;
use ctr::cipher::{KeyIvInit, StreamCipher};

/// AES-128 key size in bytes
pub const KEY_SIZE: usize = 16;

/// Counter block size
pub const IV_SIZE: usize = 16;

type Aes128Ctr = ctr::Ctr128BE<Aes128>;

/// Builds the initial counter block.
///
/// ```text
/// | COUNT (32 bits) | BEARER (5 bits) | DIRECTION (1 bit) | 0...0 (90 bits) |
/// ```
pub fn build_nea2_iv(count: u32, bearer: u8, direction: u8) -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    iv[..4].copy_from_slice(&count.to_be_bytes());
    iv[4] = ((bearer & 0x1F) << 3) | ((direction & 0x01) << 2);
    iv
}

/// Encrypts `data` with NEA2 and returns the ciphertext
pub fn nea2_encrypt(
    count: u32,
    bearer: u8,
    direction: u8,
    key: &[u8; KEY_SIZE],
    mut data: Vec<u8>,
) -> Vec<u8> {
    let iv = build_nea2_iv(count, bearer, direction);
    let mut cipher = Aes128Ctr::new(key.into(), &iv.into());
    cipher.apply_keystream(&mut data);
    data
}

/// Decrypts `data` with NEA2 and returns the plaintext
pub fn nea2_decrypt(
    count: u32,
    bearer: u8,
    direction: u8,
    key: &[u8; KEY_SIZE],
    data: Vec<u8>,
) -> Vec<u8> {
    nea2_encrypt(count, bearer, direction, key, data)
}
