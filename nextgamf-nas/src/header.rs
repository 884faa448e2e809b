//! NAS message header structures
//!
//! ## Plain 5GMM Header (3 bytes)
//! ```text
//! +------------------+------------------+------------------+
//! |       EPD        |  Security Header |   Message Type   |
//! |     (1 byte)     |  Type (4 bits)   |    (1 byte)      |
//! |                  |  Spare (4 bits)  |                  |
//! +------------------+------------------+------------------+
//! ```
//!
//! ## Plain 5GSM Header (4 bytes)
//! ```text
//! +------------------+------------------+------------------+------------------+
//! |       EPD        | PDU Session ID   |       PTI        |   Message Type   |
//! +------------------+------------------+------------------+------------------+
//! ```
//!
//! ## Security Protected Header (7 bytes)
//! ```text
//! +------------------+------------------+------------------+------------------+
//! |       EPD        |  Security Header |        Message Authentication      |
//! |     (1 byte)     |  Type (1 byte)   |           Code (4 bytes)           |
//! +------------------+------------------+------------------+------------------+
//! |  Sequence Number |         Plain or ciphered NAS message                 |
//! |     (1 byte)     |                      (variable)                       |
//! +------------------+-------------------------------------------------------+
//! ```

use crate::enums::{ExtendedProtocolDiscriminator, MmMessageType, SecurityHeaderType, SmMessageType};
use bytes::{Buf, BufMut};
use thiserror::Error;

/// NAS header decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("Buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Invalid extended protocol discriminator: 0x{0:02X}")]
    InvalidEpd(u8),

    #[error("Invalid security header type: 0x{0:02X}")]
    InvalidSecurityHeaderType(u8),

    #[error("Invalid message type: 0x{0:02X}")]
    InvalidMessageType(u8),

    #[error("Expected a plain NAS message, found security header type 0x{0:02X}")]
    NotPlain(u8),
}

fn ensure_len<B: Buf>(buf: &B, expected: usize) -> Result<(), HeaderError> {
    if buf.remaining() < expected {
        return Err(HeaderError::BufferTooShort {
            expected,
            actual: buf.remaining(),
        });
    }
    Ok(())
}

fn decode_epd(byte: u8) -> Result<ExtendedProtocolDiscriminator, HeaderError> {
    ExtendedProtocolDiscriminator::try_from(byte).map_err(|_| HeaderError::InvalidEpd(byte))
}

fn decode_sht(byte: u8) -> Result<SecurityHeaderType, HeaderError> {
    // security header type in the low nibble, spare in the high nibble
    SecurityHeaderType::try_from(byte & 0x0F).map_err(|_| HeaderError::InvalidSecurityHeaderType(byte))
}

/// Reads the security header type of a received PDU without consuming it.
///
/// 5GSM messages are never sent with a security header of their own, so they
/// always report [`SecurityHeaderType::NotProtected`].
pub fn security_header_type_of(pdu: &[u8]) -> Result<SecurityHeaderType, HeaderError> {
    if pdu.len() < 2 {
        return Err(HeaderError::BufferTooShort {
            expected: 2,
            actual: pdu.len(),
        });
    }
    match decode_epd(pdu[0])? {
        ExtendedProtocolDiscriminator::MobilityManagement => decode_sht(pdu[1]),
        ExtendedProtocolDiscriminator::SessionManagement => Ok(SecurityHeaderType::NotProtected),
    }
}

/// Plain 5GMM NAS message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainMmHeader {
    /// Security header type (NotProtected for a plain message)
    pub security_header_type: SecurityHeaderType,
    /// Message type
    pub message_type: MmMessageType,
}

impl PlainMmHeader {
    /// Size of the plain MM header in bytes
    pub const SIZE: usize = 3;

    /// Create a new plain MM header
    pub fn new(message_type: MmMessageType) -> Self {
        Self {
            security_header_type: SecurityHeaderType::NotProtected,
            message_type,
        }
    }

    /// Decode a plain MM header, EPD included
    pub fn decode<B: Buf>(buf: &mut B) -> Result<Self, HeaderError> {
        ensure_len(buf, Self::SIZE)?;

        let epd_byte = buf.get_u8();
        if decode_epd(epd_byte)? != ExtendedProtocolDiscriminator::MobilityManagement {
            return Err(HeaderError::InvalidEpd(epd_byte));
        }
        let security_header_type = decode_sht(buf.get_u8())?;

        let mt_byte = buf.get_u8();
        let message_type =
            MmMessageType::try_from(mt_byte).map_err(|_| HeaderError::InvalidMessageType(mt_byte))?;

        Ok(Self {
            security_header_type,
            message_type,
        })
    }

    /// Encode the header to bytes
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(ExtendedProtocolDiscriminator::MobilityManagement.into());
        buf.put_u8(u8::from(self.security_header_type) & 0x0F);
        buf.put_u8(self.message_type.into());
    }
}

/// Plain 5GSM NAS message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainSmHeader {
    /// PDU Session Identity
    pub pdu_session_id: u8,
    /// Procedure Transaction Identity
    pub pti: u8,
    /// Message type
    pub message_type: SmMessageType,
}

impl PlainSmHeader {
    /// Size of the plain SM header in bytes
    pub const SIZE: usize = 4;

    /// Create a new plain SM header
    pub fn new(pdu_session_id: u8, pti: u8, message_type: SmMessageType) -> Self {
        Self {
            pdu_session_id,
            pti,
            message_type,
        }
    }

    /// Decode a plain SM header, EPD included
    pub fn decode<B: Buf>(buf: &mut B) -> Result<Self, HeaderError> {
        ensure_len(buf, Self::SIZE)?;

        let epd_byte = buf.get_u8();
        if decode_epd(epd_byte)? != ExtendedProtocolDiscriminator::SessionManagement {
            return Err(HeaderError::InvalidEpd(epd_byte));
        }
        let pdu_session_id = buf.get_u8();
        let pti = buf.get_u8();

        let mt_byte = buf.get_u8();
        let message_type =
            SmMessageType::try_from(mt_byte).map_err(|_| HeaderError::InvalidMessageType(mt_byte))?;

        Ok(Self {
            pdu_session_id,
            pti,
            message_type,
        })
    }

    /// Encode the header to bytes
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(ExtendedProtocolDiscriminator::SessionManagement.into());
        buf.put_u8(self.pdu_session_id);
        buf.put_u8(self.pti);
        buf.put_u8(self.message_type.into());
    }
}

/// Security protected NAS message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecuredHeader {
    /// Security header type
    pub security_header_type: SecurityHeaderType,
    /// Message Authentication Code (MAC-I)
    pub mac: [u8; 4],
    /// Sequence number (low byte of the NAS COUNT)
    pub sequence_number: u8,
}

impl SecuredHeader {
    /// Size of the secured header in bytes, sequence number included
    pub const SIZE: usize = 7;

    /// Offset of the sequence number; the MAC covers everything from here on
    pub const SEQUENCE_NUMBER_OFFSET: usize = 6;

    /// Create a new secured header
    pub fn new(security_header_type: SecurityHeaderType, mac: [u8; 4], sequence_number: u8) -> Self {
        Self {
            security_header_type,
            mac,
            sequence_number,
        }
    }

    /// Decode a secured header from bytes
    pub fn decode<B: Buf>(buf: &mut B) -> Result<Self, HeaderError> {
        ensure_len(buf, Self::SIZE)?;

        let epd_byte = buf.get_u8();
        if decode_epd(epd_byte)? != ExtendedProtocolDiscriminator::MobilityManagement {
            return Err(HeaderError::InvalidEpd(epd_byte));
        }
        let security_header_type = decode_sht(buf.get_u8())?;

        let mut mac = [0u8; 4];
        buf.copy_to_slice(&mut mac);
        let sequence_number = buf.get_u8();

        Ok(Self {
            security_header_type,
            mac,
            sequence_number,
        })
    }

    /// Encode the header to bytes
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(ExtendedProtocolDiscriminator::MobilityManagement.into());
        buf.put_u8(u8::from(self.security_header_type) & 0x0F);
        buf.put_slice(&self.mac);
        buf.put_u8(self.sequence_number);
    }
}

/// Header of a plain NAS message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlainHeader {
    /// 5GMM message
    Mm(PlainMmHeader),
    /// 5GSM message
    Sm(PlainSmHeader),
}

/// A plain (unprotected) NAS message: the parsed header plus the full
/// encoded bytes, header included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainNasMessage {
    /// Parsed header
    pub header: PlainHeader,
    /// The complete message as received
    pub bytes: Vec<u8>,
}

impl PlainNasMessage {
    /// Parses the header of a plain NAS message.
    ///
    /// The message body beyond the header is left to the procedure handlers.
    pub fn parse(bytes: Vec<u8>) -> Result<Self, HeaderError> {
        let mut buf = bytes.as_slice();
        ensure_len(&buf, 1)?;
        let header = match decode_epd(bytes[0])? {
            ExtendedProtocolDiscriminator::MobilityManagement => {
                let mm = PlainMmHeader::decode(&mut buf)?;
                if mm.security_header_type.is_protected() {
                    return Err(HeaderError::NotPlain(mm.security_header_type.into()));
                }
                PlainHeader::Mm(mm)
            }
            ExtendedProtocolDiscriminator::SessionManagement => {
                PlainHeader::Sm(PlainSmHeader::decode(&mut buf)?)
            }
        };
        Ok(Self { header, bytes })
    }

    /// The 5GMM message type, if this is a 5GMM message
    pub fn mm_message_type(&self) -> Option<MmMessageType> {
        match self.header {
            PlainHeader::Mm(h) => Some(h.message_type),
            PlainHeader::Sm(_) => None,
        }
    }

    /// Consumes the message, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
