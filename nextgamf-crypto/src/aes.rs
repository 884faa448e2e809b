//! AES-128 block cipher wrapper
//!
//! Single-block encryption is all the CMAC engine needs; NEA2 drives the
//! `ctr` crate directly.

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;

/// AES-128 block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// AES-128 key size in bytes
pub const KEY_SIZE: usize = 16;

/// One 128-bit block
pub type Block = [u8; BLOCK_SIZE];

/// AES-128 block cipher for single-block operations
#[derive(Clone)]
pub struct Aes128Block {
    cipher: Aes128,
}

impl Aes128Block {
    /// Create a new AES-128 block cipher with the given key
    pub fn new(key: &[u8; KEY_SIZE]) -> Self {
        Self {
            cipher: Aes128::new(GenericArray::from_slice(key)),
        }
    }

    /// Encrypt a block, returning the ciphertext
    pub fn encrypt(&self, block: &Block) -> Block {
        let mut ga = GenericArray::clone_from_slice(block);
        self.cipher.encrypt_block(&mut ga);
        let mut out = [0u8; BLOCK_SIZE];
        out.copy_from_slice(&ga);
        out
    }
}

/// XOR `b` into `a`
#[inline]
pub fn xor_block(a: &mut Block, b: &Block) {
    for (x, y) in a.iter_mut().zip(b) {
        *x ^= y;
    }
}
