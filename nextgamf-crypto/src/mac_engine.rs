//! AES-CMAC message authentication (NIST SP 800-38B, RFC 4493)
//!
//! Implemented directly on top of the AES-128 block cipher rather than the
//! RustCrypto `cmac` crate because NAS integrity needs a *bit* length: the
//! last block may end mid-byte, and any bits after `bit_len` must not affect
//! the tag. The `cmac` crate only accepts whole bytes.
//!
//! # Algorithm
//!
//! ```text
//! L  = AES-K(0^128)
//! K1 = L << 1           (xor Rb if msb(L) = 1)
//! K2 = K1 << 1          (xor Rb if msb(K1) = 1)
//!
//! n  = max(1, ceil(bit_len / 128))
//! M_last = M_n xor K1                    if M_n is a complete block
//!        = (M_n || 1 || 0...0) xor K2    otherwise
//! X_0 = 0^128, X_i = AES-K(X_(i-1) xor M_i), T = AES-K(X_(n-1) xor M_last)
//! ```

use zeroize::Zeroize;

use crate::aes::{xor_block, Aes128Block, Block, BLOCK_SIZE, KEY_SIZE};
use crate::error::CryptoError;

/// Full CMAC tag size in bytes
pub const TAG_SIZE: usize = 16;

/// Bits per block
const BLOCK_BITS: usize = BLOCK_SIZE * 8;

/// Rb constant for 128-bit block ciphers
const RB: u8 = 0x87;

/// Shifts a block left by one bit. Returns the shifted block and the bit
/// shifted out of the most significant position.
fn shift_left_one(block: &Block) -> (Block, bool) {
    let mut out = [0u8; BLOCK_SIZE];
    let mut carry = 0u8;
    for i in (0..BLOCK_SIZE).rev() {
        out[i] = (block[i] << 1) | carry;
        carry = block[i] >> 7;
    }
    (out, carry == 1)
}

/// One subkey doubling step in GF(2^128)
fn double(block: &Block) -> Block {
    let (mut out, msb) = shift_left_one(block);
    if msb {
        out[BLOCK_SIZE - 1] ^= RB;
    }
    out
}

fn subkeys_for(cipher: &Aes128Block) -> (Block, Block) {
    let mut l = cipher.encrypt(&[0u8; BLOCK_SIZE]);
    let k1 = double(&l);
    let k2 = double(&k1);
    l.zeroize();
    (k1, k2)
}

/// Derives the CMAC subkeys `(K1, K2)` for an AES-128 key.
pub fn generate_subkeys(key: &[u8; KEY_SIZE]) -> (Block, Block) {
    subkeys_for(&Aes128Block::new(key))
}

/// AES-CMAC engine bound to one key
///
/// Holds the expanded cipher and both subkeys so repeated MACs under the same
/// key (one per NAS message) skip the subkey derivation. Subkeys are wiped
/// on drop.
pub struct MacEngine {
    cipher: Aes128Block,
    k1: Block,
    k2: Block,
}

impl MacEngine {
    /// Creates an engine for a 16-byte key
    pub fn new(key: &[u8; KEY_SIZE]) -> Self {
        let cipher = Aes128Block::new(key);
        let (k1, k2) = subkeys_for(&cipher);
        Self { cipher, k1, k2 }
    }

    /// Creates an engine from a key slice, rejecting anything but 16 bytes
    pub fn from_slice(key: &[u8]) -> Result<Self, CryptoError> {
        let key: &[u8; KEY_SIZE] = key.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: key.len(),
        })?;
        Ok(Self::new(key))
    }

    /// The derived subkeys `(K1, K2)`
    pub fn subkeys(&self) -> (&Block, &Block) {
        (&self.k1, &self.k2)
    }

    /// Computes the full 128-bit tag over the first `bit_len` bits of
    /// `message`.
    ///
    /// Bits of `message` beyond `bit_len` are ignored. Fails with
    /// [`CryptoError::InvalidBitLength`] if `message` holds fewer than
    /// `bit_len` bits.
    pub fn compute(&self, message: &[u8], bit_len: u32) -> Result<[u8; TAG_SIZE], CryptoError> {
        let bit_len = bit_len as usize;
        let available = message.len().saturating_mul(8);
        if bit_len > available {
            return Err(CryptoError::InvalidBitLength {
                bit_len: bit_len as u64,
                available: available as u64,
            });
        }

        let n = bit_len.div_ceil(BLOCK_BITS).max(1);
        let last_start = (n - 1) * BLOCK_SIZE;

        let mut x = [0u8; BLOCK_SIZE];
        for chunk in message[..last_start].chunks_exact(BLOCK_SIZE) {
            for (xi, mi) in x.iter_mut().zip(chunk) {
                *xi ^= mi;
            }
            x = self.cipher.encrypt(&x);
        }

        let last = self.last_block(&message[last_start..], bit_len - last_start * 8);
        xor_block(&mut x, &last);
        Ok(self.cipher.encrypt(&x))
    }

    /// Builds the masked final block from the `rem_bits` (0..=128) bits at
    /// the start of `tail`.
    fn last_block(&self, tail: &[u8], rem_bits: usize) -> Block {
        let mut block = [0u8; BLOCK_SIZE];
        if rem_bits == BLOCK_BITS {
            block.copy_from_slice(&tail[..BLOCK_SIZE]);
            xor_block(&mut block, &self.k1);
            return block;
        }

        let rem_bytes = rem_bits.div_ceil(8);
        block[..rem_bytes].copy_from_slice(&tail[..rem_bytes]);
        let partial = rem_bits % 8;
        if partial != 0 {
            // clear bits past the end of the message in the last used byte
            block[rem_bytes - 1] &= 0xFFu8 << (8 - partial);
        }
        block[rem_bits / 8] |= 0x80u8 >> partial;
        xor_block(&mut block, &self.k2);
        block
    }
}

impl Drop for MacEngine {
    fn drop(&mut self) {
        self.k1.zeroize();
        self.k2.zeroize();
    }
}

/// Computes the full AES-CMAC tag of the first `bit_len` bits of `message`.
///
/// `key` must be exactly 16 bytes.
pub fn compute_mac(key: &[u8], message: &[u8], bit_len: u32) -> Result<[u8; TAG_SIZE], CryptoError> {
    MacEngine::from_slice(key)?.compute(message, bit_len)
}

/// Like [`compute_mac`] but returns only the first 4 bytes, the 32-bit MAC-I
/// used by NAS integrity protection.
pub fn compute_mac_i(key: &[u8], message: &[u8], bit_len: u32) -> Result<[u8; 4], CryptoError> {
    let tag = compute_mac(key, message, bit_len)?;
    Ok([tag[0], tag[1], tag[2], tag[3]])
}
