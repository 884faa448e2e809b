//! NAS security error types

use nextgamf_crypto::CryptoError;
use thiserror::Error;

use crate::header::HeaderError;

/// Security-related errors
///
/// A failed integrity check is not an error: it is reported through the
/// `mac_failed` flag so the calling procedure can decide what to do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    /// SUPI does not normalize to 5-15 digits
    #[error("Invalid subscriber identity")]
    InvalidIdentity,

    /// Key material has the wrong size
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// A parent key needed for a derivation has not been established
    #[error("Missing root key: {0} not established")]
    MissingRootKey(&'static str),

    /// The negotiated algorithm has no implementation
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(&'static str),

    /// PDU too short or with an invalid header
    #[error("Malformed NAS PDU: {0}")]
    MalformedPdu(#[from] HeaderError),

    /// Plain NAS message received while a security context is in use
    #[error("Unexpected plain NAS message with an established security context")]
    UnexpectedPlainMessage,

    /// Invalid ciphering algorithm value
    #[error("Invalid ciphering algorithm: 0x{0:02X}")]
    InvalidCipheringAlgorithm(u8),

    /// Invalid integrity algorithm value
    #[error("Invalid integrity algorithm: 0x{0:02X}")]
    InvalidIntegrityAlgorithm(u8),

    /// Invalid security context type value
    #[error("Invalid security context type: {0}")]
    InvalidSecurityContextType(u8),

    /// Other failures of the underlying primitives
    #[error("Crypto error: {0}")]
    Crypto(CryptoError),
}

impl From<CryptoError> for SecurityError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidKeyLength { expected, actual } => {
                SecurityError::InvalidKeyLength { expected, actual }
            }
            other => SecurityError::Crypto(other),
        }
    }
}
