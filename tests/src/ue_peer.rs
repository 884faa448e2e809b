//! UE side of NAS security
//!
//! Mirrors what a UE does with its own copy of the keys: protects uplink
//! messages and verifies/deciphers downlink ones. It is built from the key
//! hierarchy and primitive functions rather than the codec, so the codec is
//! checked against an independent peer.

use nextgamf_common::{AccessType, CipheringAlgorithm, IntegrityAlgorithm};
use nextgamf_crypto::{constant_time_eq, Key128};
use nextgamf_nas::keys::{derive_alg_keys, derive_kamf};
use nextgamf_nas::{
    compute_nas_mac, CipheringProvider, DefaultCipheringProvider, NasCount, NasDirection,
    NasSecuritySelection, SecuredHeader, SecurityHeaderType,
};
use tracing::debug;

use crate::test_fixtures::TestSubscriber;
use crate::test_utils::TestResult;

/// Downlink message as seen by the UE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub plain: Vec<u8>,
    pub security_header_type: SecurityHeaderType,
    pub mac_valid: bool,
    pub count: NasCount,
}

/// UE-side NAS security state
#[derive(Debug)]
pub struct UePeer {
    ciphering: CipheringAlgorithm,
    integrity: IntegrityAlgorithm,
    knas_enc: Key128,
    knas_int: Key128,
    access_type: AccessType,
    ul_count: NasCount,
    dl_count: NasCount,
    cipher: DefaultCipheringProvider,
}

impl UePeer {
    /// Derives the UE's NAS keys from the subscriber's KSEAF for the
    /// algorithms the network selected.
    pub fn new(subscriber: &TestSubscriber, selection: NasSecuritySelection) -> TestResult<Self> {
        let kamf = derive_kamf(&subscriber.supi, &subscriber.abba, &subscriber.kseaf)?;
        let (knas_enc, knas_int) =
            derive_alg_keys(kamf.as_bytes(), selection.ciphering, selection.integrity)?;
        Ok(Self {
            ciphering: selection.ciphering,
            integrity: selection.integrity,
            knas_enc,
            knas_int,
            access_type: subscriber.access_type,
            ul_count: NasCount::default(),
            dl_count: NasCount::default(),
            cipher: DefaultCipheringProvider,
        })
    }

    pub fn ul_count(&self) -> NasCount {
        self.ul_count
    }

    pub fn dl_count(&self) -> NasCount {
        self.dl_count
    }

    /// Forces the next uplink COUNT (for wrap and replay scenarios)
    pub fn set_ul_count(&mut self, count: NasCount) {
        self.ul_count = count;
    }

    /// Protects an uplink message and advances the uplink COUNT.
    pub fn protect(&mut self, sht: SecurityHeaderType, plain: Vec<u8>) -> TestResult<Vec<u8>> {
        if sht.is_new_security_context() {
            self.ul_count.reset();
        }
        let count = self.ul_count;
        let bearer = self.access_type.nas_bearer();

        let payload = if sht.is_ciphered() {
            self.cipher.encrypt(
                self.ciphering,
                &self.knas_enc,
                count.packed(),
                bearer,
                NasDirection::Uplink,
                plain,
            )?
        } else {
            plain
        };

        let mut pdu = vec![0x7E, u8::from(sht), 0, 0, 0, 0, count.sqn];
        pdu.extend_from_slice(&payload);
        let mac = compute_nas_mac(
            self.integrity,
            &self.knas_int,
            count.packed(),
            bearer,
            NasDirection::Uplink,
            &pdu[SecuredHeader::SEQUENCE_NUMBER_OFFSET..],
        )?;
        pdu[2..6].copy_from_slice(&mac);

        self.ul_count.add_one();
        debug!(ul_count = count.packed(), "UE protected uplink message");
        Ok(pdu)
    }

    /// Verifies and deciphers a downlink PDU.
    pub fn unprotect(&mut self, pdu: &[u8]) -> TestResult<Received> {
        let header = SecuredHeader::decode(&mut &pdu[..])?;
        let sht = header.security_header_type;
        if sht.is_new_security_context() {
            self.dl_count.reset();
            self.ul_count.reset();
        }
        self.dl_count.update_from_sqn(header.sequence_number);
        let count = self.dl_count;
        let bearer = self.access_type.nas_bearer();

        let expected = compute_nas_mac(
            self.integrity,
            &self.knas_int,
            count.packed(),
            bearer,
            NasDirection::Downlink,
            &pdu[SecuredHeader::SEQUENCE_NUMBER_OFFSET..],
        )?;
        let mac_valid = constant_time_eq(&expected, &header.mac);

        let body = pdu[SecuredHeader::SIZE..].to_vec();
        let plain = if sht.is_ciphered() {
            self.cipher.decrypt(
                self.ciphering,
                &self.knas_enc,
                count.packed(),
                bearer,
                NasDirection::Downlink,
                body,
            )?
        } else {
            body
        };

        Ok(Received {
            plain,
            security_header_type: sht,
            mac_valid,
            count,
        })
    }
}
