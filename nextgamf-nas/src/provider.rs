//! Ciphering seam
//!
//! The codec does not call a cipher directly; it goes through a
//! [`CipheringProvider`]. The default provider implements NEA0 and NEA2.
//! Deployments that need NEA1/NEA3 or a hardware engine plug in their own.

use nextgamf_common::CipheringAlgorithm;
use nextgamf_crypto::nea::nea2_encrypt;
use nextgamf_crypto::Key128;

use crate::enums::NasDirection;
use crate::error::SecurityError;

/// Stream cipher over NAS payloads
pub trait CipheringProvider: Send + Sync {
    /// Encrypts `data`, returning the ciphertext
    fn encrypt(
        &self,
        algorithm: CipheringAlgorithm,
        key: &Key128,
        count: u32,
        bearer: u8,
        direction: NasDirection,
        data: Vec<u8>,
    ) -> Result<Vec<u8>, SecurityError>;

    /// Decrypts `data`, returning the plaintext. Defaults to
    /// [`encrypt`](Self::encrypt) since every NEA is a keystream XOR.
    fn decrypt(
        &self,
        algorithm: CipheringAlgorithm,
        key: &Key128,
        count: u32,
        bearer: u8,
        direction: NasDirection,
        data: Vec<u8>,
    ) -> Result<Vec<u8>, SecurityError> {
        self.encrypt(algorithm, key, count, bearer, direction, data)
    }
}

/// NEA0 and NEA2
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCipheringProvider;

impl CipheringProvider for DefaultCipheringProvider {
    fn encrypt(
        &self,
        algorithm: CipheringAlgorithm,
        key: &Key128,
        count: u32,
        bearer: u8,
        direction: NasDirection,
        data: Vec<u8>,
    ) -> Result<Vec<u8>, SecurityError> {
        match algorithm {
            CipheringAlgorithm::Nea0 => Ok(data),
            CipheringAlgorithm::Nea2 => Ok(nea2_encrypt(
                count,
                bearer,
                direction.into(),
                key.as_bytes(),
                data,
            )),
            CipheringAlgorithm::Nea1 | CipheringAlgorithm::Nea3 => {
                Err(SecurityError::UnsupportedAlgorithm(algorithm.name()))
            }
        }
    }
}
