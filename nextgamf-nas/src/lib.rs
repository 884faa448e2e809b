//! 5G NAS security for the AMF
//!
//! Implements the network side of NAS security as defined in 3GPP TS 24.501
//! and TS 33.501:
//! - the per-UE [`NasSecurityContext`] and its key hierarchy
//! - NAS COUNT handling ([`NasCount`])
//! - integrity/ciphering algorithm negotiation ([`AlgorithmNegotiator`])
//! - the protected message codec ([`NasSecurityCodec`])
//!
//! # Example
//!
//! ```rust
//! use nextgamf_common::{CipheringAlgorithm, IntegrityAlgorithm};
//! use nextgamf_nas::{NasSecurityCodec, NasSecurityContext, SecurityHeaderType};
//!
//! let mut ctx = NasSecurityContext::new();
//! ctx.set_abba(vec![0x00, 0x00]);
//! ctx.set_kseaf(&[0x11; 32]).unwrap();
//! ctx.derive_kamf("imsi-001010000000001").unwrap();
//! ctx.apply_algorithms(CipheringAlgorithm::Nea2, IntegrityAlgorithm::Nia2).unwrap();
//! ctx.activate().unwrap();
//!
//! let codec = NasSecurityCodec::new();
//! let pdu = codec
//!     .encode(&mut ctx, SecurityHeaderType::IntegrityProtectedAndCiphered, vec![0x7E, 0x00, 0x42])
//!     .unwrap();
//! assert_eq!(pdu.len(), 7 + 3);
//! assert_eq!(ctx.dl_count().packed(), 1);
//! ```

pub mod algorithm;
pub mod codec;
pub mod context;
pub mod count;
pub mod enums;
pub mod error;
pub mod header;
pub mod integrity;
pub mod keys;
pub mod provider;

pub use algorithm::{select_algorithms, AlgorithmNegotiator, NasSecuritySelection, UeSecurityCapability};
pub use codec::{DecodedNasMessage, NasSecurityCodec};
pub use context::{NasKeySetIdentifier, NasSecurityContext, SecurityContextType};
pub use count::NasCount;
pub use enums::{
    ExtendedProtocolDiscriminator, MmMessageType, NasDirection, SecurityHeaderType, SmMessageType,
};
pub use error::SecurityError;
pub use header::{
    security_header_type_of, HeaderError, PlainHeader, PlainMmHeader, PlainNasMessage,
    PlainSmHeader, SecuredHeader,
};
pub use integrity::compute_nas_mac;
pub use provider::{CipheringProvider, DefaultCipheringProvider};
