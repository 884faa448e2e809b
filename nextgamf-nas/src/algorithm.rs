//! NAS security algorithm negotiation
//!
//! Picks the integrity and ciphering algorithms for a UE from the operator's
//! preference lists and the UE security capability IE (3GPP TS 24.501
//! Section 9.11.3.54). The two families are chosen independently.

use nextgamf_common::{CipheringAlgorithm, IntegrityAlgorithm, SecurityConfig};
use tracing::{debug, warn};

use crate::error::SecurityError;
use crate::header::HeaderError;

/// Capability bit for algorithm `id`: bit 8 of the octet is id 0.
fn capability_bit(id: u8) -> u8 {
    0x80 >> id
}

/// 5G NR algorithm support advertised by the UE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UeSecurityCapability {
    /// 5G-EA0..5G-EA7 bitmap
    pub nr_ea: u8,
    /// 5G-IA0..5G-IA7 bitmap
    pub nr_ia: u8,
}

impl UeSecurityCapability {
    /// Create from the two NR capability octets
    pub fn new(nr_ea: u8, nr_ia: u8) -> Self {
        Self { nr_ea, nr_ia }
    }

    /// Decodes the value part of the IE. Only the two NR octets are read;
    /// trailing EPS octets are ignored.
    pub fn decode(value: &[u8]) -> Result<Self, SecurityError> {
        match value {
            [nr_ea, nr_ia, ..] => Ok(Self::new(*nr_ea, *nr_ia)),
            _ => Err(HeaderError::BufferTooShort {
                expected: 2,
                actual: value.len(),
            }
            .into()),
        }
    }

    /// Whether the UE supports `alg`
    pub fn supports_ciphering(&self, alg: CipheringAlgorithm) -> bool {
        self.nr_ea & capability_bit(alg.id()) != 0
    }

    /// Whether the UE supports `alg`
    pub fn supports_integrity(&self, alg: IntegrityAlgorithm) -> bool {
        self.nr_ia & capability_bit(alg.id()) != 0
    }
}

/// Result of a negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NasSecuritySelection {
    pub integrity: IntegrityAlgorithm,
    pub ciphering: CipheringAlgorithm,
}

impl NasSecuritySelection {
    /// Octet of the NAS security algorithms IE (TS 24.501 Section 9.11.3.34):
    /// ciphering in the high nibble, integrity in the low nibble.
    pub fn encode(&self) -> u8 {
        (self.ciphering.id() << 4) | self.integrity.id()
    }

    /// Decodes the NAS security algorithms IE octet.
    pub fn decode(value: u8) -> Result<Self, SecurityError> {
        let ea = value >> 4;
        let ia = value & 0x0F;
        let ciphering = CipheringAlgorithm::try_from(ea)
            .map_err(|_| SecurityError::InvalidCipheringAlgorithm(ea))?;
        let integrity = IntegrityAlgorithm::try_from(ia)
            .map_err(|_| SecurityError::InvalidIntegrityAlgorithm(ia))?;
        Ok(Self {
            integrity,
            ciphering,
        })
    }

    pub fn is_null_integrity(&self) -> bool {
        self.integrity.is_null()
    }

    pub fn is_null_ciphering(&self) -> bool {
        self.ciphering.is_null()
    }
}

/// Returns the first algorithm of each priority list that the UE bitmap
/// advertises. A family with no match falls back to its null algorithm.
pub fn select_algorithms(
    integrity_priority: &[IntegrityAlgorithm],
    ciphering_priority: &[CipheringAlgorithm],
    ue_integrity: u8,
    ue_ciphering: u8,
) -> (IntegrityAlgorithm, CipheringAlgorithm) {
    let integrity = integrity_priority
        .iter()
        .copied()
        .find(|alg| ue_integrity & capability_bit(alg.id()) != 0)
        .unwrap_or(IntegrityAlgorithm::Nia0);
    let ciphering = ciphering_priority
        .iter()
        .copied()
        .find(|alg| ue_ciphering & capability_bit(alg.id()) != 0)
        .unwrap_or(CipheringAlgorithm::Nea0);
    (integrity, ciphering)
}

/// Applies the configured operator preferences to UE capabilities
#[derive(Debug, Clone, Default)]
pub struct AlgorithmNegotiator {
    config: SecurityConfig,
}

impl AlgorithmNegotiator {
    pub fn new(config: SecurityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SecurityConfig {
        &self.config
    }

    /// Selects the algorithms to put in the Security Mode Command
    pub fn negotiate(&self, ue: &UeSecurityCapability) -> NasSecuritySelection {
        let (integrity, ciphering) = select_algorithms(
            &self.config.integrity_order,
            &self.config.ciphering_order,
            ue.nr_ia,
            ue.nr_ea,
        );
        let selection = NasSecuritySelection {
            integrity,
            ciphering,
        };

        if selection.is_null_integrity() {
            warn!(
                ue_ia = format_args!("0x{:02X}", ue.nr_ia),
                "No common integrity algorithm, falling back to NIA0"
            );
        }
        debug!(%integrity, %ciphering, "NAS security algorithms selected");
        selection
    }
}
