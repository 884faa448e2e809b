//! AMF key hierarchy (3GPP TS 33.501 Annex A)
//!
//! ```text
//! KSEAF ──(SUPI, ABBA)──> KAMF ─┬─(alg type, alg id)──> KNASenc / KNASint
//!                               ├─(UL COUNT, access)──> KgNB / KN3IWF
//!                               └─(sync input)────────> NH
//! ```
//!
//! All functions are pure; [`NasSecurityContext`](crate::NasSecurityContext)
//! decides which inputs to feed them and where the results go.

use nextgamf_common::{AccessType, CipheringAlgorithm, IntegrityAlgorithm, Supi};
use nextgamf_crypto::kdf::{calculate_kdf_key, calculate_kdf_key_128, AlgorithmTypeDistinguisher, FcValue};
use nextgamf_crypto::{Key128, Key256};

use crate::error::SecurityError;

fn parent_key(bytes: &[u8]) -> Result<Key256, SecurityError> {
    Ok(Key256::from_slice(bytes)?)
}

/// KAMF = KDF(KSEAF, 0x6D, SUPI digits, ABBA)
pub fn derive_kamf(supi: &str, abba: &[u8], kseaf: &[u8]) -> Result<Key256, SecurityError> {
    let supi = Supi::parse(supi).ok_or(SecurityError::InvalidIdentity)?;
    let kseaf = parent_key(kseaf)?;
    Ok(Key256::new(calculate_kdf_key(
        kseaf.as_bytes(),
        FcValue::Kamf.into(),
        &[supi.digits().as_bytes(), abba],
    )?))
}

/// Derives `(KNASenc, KNASint)` for the selected algorithms.
///
/// Each key is the low 128 bits of
/// `KDF(KAMF, 0x69, algorithm type distinguisher, algorithm id)`.
pub fn derive_alg_keys(
    kamf: &[u8],
    ciphering: CipheringAlgorithm,
    integrity: IntegrityAlgorithm,
) -> Result<(Key128, Key128), SecurityError> {
    let kamf = parent_key(kamf)?;
    let enc_type = [AlgorithmTypeDistinguisher::NasEnc as u8];
    let enc_id = [ciphering.id()];
    let knas_enc = calculate_kdf_key_128(
        kamf.as_bytes(),
        FcValue::AlgorithmKey.into(),
        &[&enc_type, &enc_id],
    )?;
    let int_type = [AlgorithmTypeDistinguisher::NasInt as u8];
    let int_id = [integrity.id()];
    let knas_int = calculate_kdf_key_128(
        kamf.as_bytes(),
        FcValue::AlgorithmKey.into(),
        &[&int_type, &int_id],
    )?;
    Ok((Key128::new(knas_enc), Key128::new(knas_int)))
}

/// KgNB or KN3IWF = KDF(KAMF, 0x6E, UL NAS COUNT, access type distinguisher)
pub fn derive_an_key(
    kamf: &[u8],
    ul_count: u32,
    access_type: AccessType,
) -> Result<Key256, SecurityError> {
    let kamf = parent_key(kamf)?;
    let count_bytes = ul_count.to_be_bytes();
    let access = [access_type.kdf_selector()];
    Ok(Key256::new(calculate_kdf_key(
        kamf.as_bytes(),
        FcValue::AnKey.into(),
        &[&count_bytes[..], &access[..]],
    )?))
}

/// NH = KDF(KAMF, 0x6F, sync input)
///
/// The sync input is the freshly derived KgNB/KN3IWF for the first NH and
/// the previous NH afterwards. Both are 256-bit keys.
pub fn derive_nh(kamf: &[u8], sync_input: &[u8]) -> Result<Key256, SecurityError> {
    let kamf = parent_key(kamf)?;
    let sync_input = parent_key(sync_input)?;
    Ok(Key256::new(calculate_kdf_key(
        kamf.as_bytes(),
        FcValue::Nh.into(),
        &[sync_input.as_bytes()],
    )?))
}
