//! NIA2 (128-NIA2 / 128-EIA2) integrity algorithm
//!
//! AES-CMAC over `COUNT || BEARER || DIRECTION || 0^26 || MESSAGE`,
//! truncated to 32 bits. Reference: 3GPP TS 33.401 Annex B.2.3.

use crate::error::CryptoError;
use crate::mac_engine::MacEngine;

/// NIA2 key size in bytes
pub const KEY_SIZE: usize = 16;

/// MAC-I size in bytes
pub const MAC_SIZE: usize = 4;

/// Length of the COUNT/BEARER/DIRECTION prefix in bytes
pub const HEADER_SIZE: usize = 8;

/// Builds the 64-bit NIA2 prefix.
///
/// ```text
/// | COUNT (32) | BEARER (5) | DIRECTION (1) | 0 (26) |
/// ```
pub fn build_nia2_header(count: u32, bearer: u8, direction: u8) -> [u8; HEADER_SIZE] {
    let c = count.to_be_bytes();
    [
        c[0],
        c[1],
        c[2],
        c[3],
        ((bearer & 0x1F) << 3) | ((direction & 0x01) << 2),
        0,
        0,
        0,
    ]
}

/// NIA2 over the first `bit_len` bits of `data`
pub fn nia2_compute_mac_bits(
    count: u32,
    bearer: u8,
    direction: u8,
    key: &[u8; KEY_SIZE],
    data: &[u8],
    bit_len: u32,
) -> Result<[u8; MAC_SIZE], CryptoError> {
    let mut input = Vec::with_capacity(HEADER_SIZE + data.len());
    input.extend_from_slice(&build_nia2_header(count, bearer, direction));
    input.extend_from_slice(data);

    let total_bits = bit_len
        .checked_add((HEADER_SIZE * 8) as u32)
        .ok_or(CryptoError::InvalidBitLength {
            bit_len: u64::from(bit_len),
            available: (data.len() as u64) * 8,
        })?;

    let tag = MacEngine::new(key).compute(&input, total_bits)?;
    let mut mac = [0u8; MAC_SIZE];
    mac.copy_from_slice(&tag[..MAC_SIZE]);
    Ok(mac)
}

/// NIA2 over a whole-byte message
pub fn nia2_compute_mac(
    count: u32,
    bearer: u8,
    direction: u8,
    key: &[u8; KEY_SIZE],
    data: &[u8],
) -> Result<[u8; MAC_SIZE], CryptoError> {
    let bit_len = u32::try_from(data.len() * 8).map_err(|_| CryptoError::InvalidBitLength {
        bit_len: (data.len() as u64) * 8,
        available: u64::from(u32::MAX),
    })?;
    nia2_compute_mac_bits(count, bearer, direction, key, data, bit_len)
}
