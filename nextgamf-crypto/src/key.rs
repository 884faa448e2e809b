//! Fixed-size secret key containers
//!
//! Keys are wiped when dropped and never printed by `Debug`.

use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// A secret key of `N` bytes
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Key<const N: usize>([u8; N]);

/// 128-bit key (KNASenc, KNASint)
pub type Key128 = Key<16>;

/// 256-bit key (KSEAF, KAMF, KgNB, KN3IWF, NH)
pub type Key256 = Key<32>;

impl<const N: usize> Key<N> {
    /// Key length in bytes
    pub const LEN: usize = N;

    /// Wraps an owned array
    pub fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Copies a key from a slice, failing unless it is exactly `N` bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; N] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: N,
            actual: bytes.len(),
        })?;
        Ok(Self(array))
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> AsRef<[u8]> for Key<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> From<[u8; N]> for Key<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> PartialEq for Key<N> {
    fn eq(&self, other: &Self) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

impl<const N: usize> Eq for Key<N> {}

impl<const N: usize> fmt::Debug for Key<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key<{N}>(..)")
    }
}

/// Compares two byte slices in constant time. Lengths are public, so a
/// length mismatch returns early.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
