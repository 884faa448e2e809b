//! Cryptographic primitives for nextgamf
//!
//! - AES-CMAC with bit-granular message lengths ([`mac_engine`])
//! - NIA2 integrity and NEA2 ciphering
//! - The HMAC-SHA-256 key derivation function
//! - Zeroizing key containers

pub mod aes;
pub mod error;
pub mod kdf;
pub mod key;
pub mod mac_engine;
pub mod nea;
pub mod nia;

pub use error::CryptoError;
pub use key::{constant_time_eq, Key, Key128, Key256};
pub use mac_engine::{compute_mac, compute_mac_i, generate_subkeys, MacEngine};
