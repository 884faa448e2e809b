//! Generic key derivation function for 5G security
//!
//! HMAC-SHA-256 based KDF from 3GPP TS 33.220 Annex B, with the function
//! codes of TS 33.501 Annex A used by the AMF key hierarchy.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CryptoError;

/// HMAC-SHA256 output size in bytes
pub const HMAC_SHA256_SIZE: usize = 32;

/// Key size for 256-bit keys
pub const KEY_256_SIZE: usize = 32;

/// Key size for 128-bit keys
pub const KEY_128_SIZE: usize = 16;

/// FC values used by the AMF (3GPP TS 33.501 Annex A)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FcValue {
    /// FC = 0x69: KNASint / KNASenc from KAMF
    AlgorithmKey = 0x69,
    /// FC = 0x6D: KAMF from KSEAF
    Kamf = 0x6D,
    /// FC = 0x6E: KgNB / KN3IWF from KAMF
    AnKey = 0x6E,
    /// FC = 0x6F: NH from KAMF
    Nh = 0x6F,
}

impl From<FcValue> for u8 {
    fn from(fc: FcValue) -> Self {
        fc as u8
    }
}

/// Algorithm type distinguisher for NAS key derivation (TS 33.501 A.8)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlgorithmTypeDistinguisher {
    /// NAS encryption algorithm
    NasEnc = 0x01,
    /// NAS integrity algorithm
    NasInt = 0x02,
}

/// Compute HMAC-SHA256
pub fn hmac_sha256(key: &[u8], input: &[u8]) -> [u8; HMAC_SHA256_SIZE] {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .unwrap_or_else(|_| unreachable!("HMAC-SHA256 accepts keys of any size"));
    mac.update(input);
    let mut output = [0u8; HMAC_SHA256_SIZE];
    output.copy_from_slice(&mac.finalize().into_bytes());
    output
}

/// Builds the KDF input string `S = FC || P0 || L0 || P1 || L1 || ...`
///
/// Each `Li` is the byte length of `Pi` as a 2-octet big-endian integer, so
/// a parameter longer than 65535 bytes is rejected.
pub fn build_kdf_input(fc: u8, parameters: &[&[u8]]) -> Result<Vec<u8>, CryptoError> {
    let capacity = 1 + parameters.iter().map(|p| p.len() + 2).sum::<usize>();
    let mut input = Vec::with_capacity(capacity);
    input.push(fc);
    for param in parameters {
        let len = u16::try_from(param.len())
            .map_err(|_| CryptoError::KdfParameterTooLong { len: param.len() })?;
        input.extend_from_slice(param);
        input.extend_from_slice(&len.to_be_bytes());
    }
    Ok(input)
}

/// KDF(key, S) = HMAC-SHA-256(key, S)
pub fn calculate_kdf_key(
    key: &[u8; KEY_256_SIZE],
    fc: u8,
    parameters: &[&[u8]],
) -> Result<[u8; KEY_256_SIZE], CryptoError> {
    Ok(hmac_sha256(key, &build_kdf_input(fc, parameters)?))
}

/// KDF truncated to the low-order 128 bits, as used for algorithm keys
pub fn calculate_kdf_key_128(
    key: &[u8; KEY_256_SIZE],
    fc: u8,
    parameters: &[&[u8]],
) -> Result<[u8; KEY_128_SIZE], CryptoError> {
    let full = calculate_kdf_key(key, fc, parameters)?;
    let mut out = [0u8; KEY_128_SIZE];
    out.copy_from_slice(&full[KEY_256_SIZE - KEY_128_SIZE..]);
    Ok(out)
}
