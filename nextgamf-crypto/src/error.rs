//! Crypto error types

use thiserror::Error;

/// Errors raised by the primitives in this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key material has the wrong size
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Requested bit length exceeds the supplied message
    #[error("Invalid bit length: {bit_len} bits requested, {available} available")]
    InvalidBitLength { bit_len: u64, available: u64 },

    /// KDF parameter does not fit its 2-octet length field
    #[error("KDF parameter too long: {len} bytes")]
    KdfParameterTooLong { len: usize },
}
