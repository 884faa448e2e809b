//! Protected NAS message codec
//!
//! Turns plain NAS messages into security protected PDUs for the downlink
//! and back for the uplink (3GPP TS 24.501 Section 4.4 and 9.1.1):
//!
//! ```text
//! +------+-----+---------+-----+----------------------------+
//! | 0x7E | SHT | MAC (4) | SQN | NAS message (maybe ciphered)|
//! +------+-----+---------+-----+----------------------------+
//!                          |<------- MAC input ------------>|
//! ```
//!
//! The codec holds no per-UE state. Everything it reads and advances lives in
//! the [`NasSecurityContext`] passed to each call.

use nextgamf_common::{log_nas_message, AccessType, Direction, RrcEstablishmentCause};
use nextgamf_crypto::constant_time_eq;
use tracing::{debug, warn};

use crate::context::NasSecurityContext;
use crate::count::NasCount;
use crate::enums::{NasDirection, SecurityHeaderType};
use crate::error::SecurityError;
use crate::header::{PlainNasMessage, SecuredHeader};
use crate::integrity::compute_nas_mac;
use crate::provider::{CipheringProvider, DefaultCipheringProvider};

/// Result of decoding an uplink NAS PDU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedNasMessage {
    /// The plain message carried by the PDU
    pub message: PlainNasMessage,
    /// Security header type the PDU was received with
    pub security_header_type: SecurityHeaderType,
    /// Whether integrity verification failed or could not be performed
    pub mac_failed: bool,
    /// Uplink COUNT the message was verified against
    pub count: NasCount,
}

/// Encoder/decoder for security protected NAS messages
#[derive(Debug, Clone, Default)]
pub struct NasSecurityCodec<P = DefaultCipheringProvider> {
    provider: P,
}

impl NasSecurityCodec {
    /// Codec backed by [`DefaultCipheringProvider`]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: CipheringProvider> NasSecurityCodec<P> {
    /// Codec backed by a custom ciphering provider
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    /// The ciphering provider in use
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Protects a downlink NAS message.
    ///
    /// Returns `plain` untouched when the context is not yet available or
    /// when `security_header_type` is [`SecurityHeaderType::NotProtected`].
    /// A header type "with new security context" restarts both COUNTs before
    /// the message is protected. The downlink COUNT advances once per
    /// protected message. COUNTs are left untouched when an error is
    /// returned.
    pub fn encode(
        &self,
        ctx: &mut NasSecurityContext,
        security_header_type: SecurityHeaderType,
        plain: Vec<u8>,
    ) -> Result<Vec<u8>, SecurityError> {
        if !ctx.is_available() || !security_header_type.is_protected() {
            log_nas_message(Direction::Tx, "plain message", &plain);
            return Ok(plain);
        }

        let new_context = security_header_type.is_new_security_context();
        let mut count = ctx.dl_count;
        if new_context {
            count.reset();
        }
        let bearer = ctx.access_type().nas_bearer();
        let ciphering = ctx.ciphering_algorithm();

        let payload = if security_header_type.is_ciphered() && !ciphering.is_null() {
            self.provider.encrypt(
                ciphering,
                ctx.require_knas_enc()?,
                count.packed(),
                bearer,
                NasDirection::Downlink,
                plain,
            )?
        } else {
            plain
        };

        let mut pdu = Vec::with_capacity(SecuredHeader::SIZE + payload.len());
        SecuredHeader::new(security_header_type, [0u8; 4], count.sqn).encode(&mut pdu);
        pdu.extend_from_slice(&payload);

        let mac = compute_nas_mac(
            ctx.integrity_algorithm(),
            ctx.require_knas_int()?,
            count.packed(),
            bearer,
            NasDirection::Downlink,
            &pdu[SecuredHeader::SEQUENCE_NUMBER_OFFSET..],
        )?;
        pdu[2..SecuredHeader::SEQUENCE_NUMBER_OFFSET].copy_from_slice(&mac);

        if new_context {
            ctx.reset_counts();
        }
        ctx.dl_count = count;
        ctx.dl_count.add_one();

        debug!(
            ?security_header_type,
            dl_count = count.packed(),
            "Protected downlink NAS message"
        );
        log_nas_message(Direction::Tx, "protected message", &pdu);
        Ok(pdu)
    }

    /// Removes the protection of an uplink NAS PDU.
    ///
    /// A plain message is refused with
    /// [`SecurityError::UnexpectedPlainMessage`] once the context is
    /// available, unless the RRC connection was established for an
    /// emergency. For protected messages the uplink COUNT is re-synchronized
    /// from the received sequence number and the MAC is verified. A MAC
    /// mismatch does not abort decoding: it is reported through
    /// [`DecodedNasMessage::mac_failed`] and the context's flag. The uplink
    /// COUNT is only stored once the keys and algorithms have been applied
    /// without error.
    pub fn decode(
        &self,
        ctx: &mut NasSecurityContext,
        access_type: AccessType,
        security_header_type: SecurityHeaderType,
        establishment_cause: Option<RrcEstablishmentCause>,
        raw: Vec<u8>,
    ) -> Result<DecodedNasMessage, SecurityError> {
        log_nas_message(Direction::Rx, "message", &raw);

        if !security_header_type.is_protected() {
            let emergency = establishment_cause.is_some_and(RrcEstablishmentCause::is_emergency);
            if ctx.is_available() && !emergency {
                warn!("Plain NAS message received with an active security context");
                return Err(SecurityError::UnexpectedPlainMessage);
            }
            let message = PlainNasMessage::parse(raw)?;
            ctx.mac_failed = false;
            return Ok(DecodedNasMessage {
                message,
                security_header_type,
                mac_failed: false,
                count: ctx.ul_count,
            });
        }

        let header = SecuredHeader::decode(&mut raw.as_slice())?;

        let mut count = ctx.ul_count;
        if security_header_type.is_new_security_context() {
            count.reset();
        }
        count.update_from_sqn(header.sequence_number);
        let bearer = access_type.nas_bearer();

        let mut payload = raw[SecuredHeader::SIZE..].to_vec();
        let mac_failed = if ctx.is_available() {
            let expected = compute_nas_mac(
                ctx.integrity_algorithm(),
                ctx.require_knas_int()?,
                count.packed(),
                bearer,
                NasDirection::Uplink,
                &raw[SecuredHeader::SEQUENCE_NUMBER_OFFSET..],
            )?;
            let mac_failed = !constant_time_eq(&expected, &header.mac);
            if mac_failed {
                warn!(
                    ul_count = count.packed(),
                    "NAS MAC verification failed"
                );
            }

            if security_header_type.is_ciphered() {
                payload = self.provider.decrypt(
                    ctx.ciphering_algorithm(),
                    ctx.require_knas_enc()?,
                    count.packed(),
                    bearer,
                    NasDirection::Uplink,
                    payload,
                )?;
            }
            mac_failed
        } else {
            // nothing to verify against
            true
        };
        ctx.ul_count = count;
        ctx.mac_failed = mac_failed;

        let message = PlainNasMessage::parse(payload)?;
        debug!(
            ?security_header_type,
            ul_count = count.packed(),
            mac_failed = ctx.mac_failed,
            "Unprotected uplink NAS message"
        );
        Ok(DecodedNasMessage {
            message,
            security_header_type,
            mac_failed: ctx.mac_failed,
            count,
        })
    }
}
