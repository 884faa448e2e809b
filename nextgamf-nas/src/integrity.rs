//! Integrity algorithm dispatch for NAS messages

use nextgamf_common::IntegrityAlgorithm;
use nextgamf_crypto::nia::{nia2_compute_mac, MAC_SIZE};
use nextgamf_crypto::Key128;

use crate::enums::NasDirection;
use crate::error::SecurityError;

/// Computes the NAS-MAC of `data` with the given integrity algorithm.
///
/// NIA0 yields an all-zero MAC. NIA1 and NIA3 are recognized but not
/// implemented.
pub fn compute_nas_mac(
    algorithm: IntegrityAlgorithm,
    key: &Key128,
    count: u32,
    bearer: u8,
    direction: NasDirection,
    data: &[u8],
) -> Result<[u8; MAC_SIZE], SecurityError> {
    match algorithm {
        IntegrityAlgorithm::Nia0 => Ok([0u8; MAC_SIZE]),
        IntegrityAlgorithm::Nia2 => Ok(nia2_compute_mac(
            count,
            bearer,
            direction.into(),
            key.as_bytes(),
            data,
        )?),
        IntegrityAlgorithm::Nia1 | IntegrityAlgorithm::Nia3 => {
            Err(SecurityError::UnsupportedAlgorithm(algorithm.name()))
        }
    }
}
