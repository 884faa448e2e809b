//! Common types used across nextgamf crates
//!
//! Algorithm identifiers, access types, RRC establishment causes and the
//! subscriber permanent identifier (SUPI).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// 5G NAS ciphering algorithm
///
/// 3GPP TS 24.501 Section 9.11.3.34. The numeric value is the algorithm
/// identifier used as P1 when deriving KNASenc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CipheringAlgorithm {
    /// 5G-EA0 (null ciphering)
    #[default]
    #[serde(rename = "NEA0")]
    Nea0 = 0x00,
    /// 128-5G-EA1 (SNOW3G based)
    #[serde(rename = "NEA1")]
    Nea1 = 0x01,
    /// 128-5G-EA2 (AES based)
    #[serde(rename = "NEA2")]
    Nea2 = 0x02,
    /// 128-5G-EA3 (ZUC based)
    #[serde(rename = "NEA3")]
    Nea3 = 0x03,
}

impl CipheringAlgorithm {
    /// Algorithm identifier as carried on the wire and in the KDF
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Returns true for the null algorithm
    pub fn is_null(self) -> bool {
        self == CipheringAlgorithm::Nea0
    }

    /// Short name, e.g. "NEA2"
    pub fn name(self) -> &'static str {
        match self {
            CipheringAlgorithm::Nea0 => "NEA0",
            CipheringAlgorithm::Nea1 => "NEA1",
            CipheringAlgorithm::Nea2 => "NEA2",
            CipheringAlgorithm::Nea3 => "NEA3",
        }
    }
}

impl TryFrom<u8> for CipheringAlgorithm {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(CipheringAlgorithm::Nea0),
            0x01 => Ok(CipheringAlgorithm::Nea1),
            0x02 => Ok(CipheringAlgorithm::Nea2),
            0x03 => Ok(CipheringAlgorithm::Nea3),
            _ => Err(Error::UnknownAlgorithm {
                kind: "ciphering",
                value,
            }),
        }
    }
}

impl fmt::Display for CipheringAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 5G NAS integrity protection algorithm
///
/// 3GPP TS 24.501 Section 9.11.3.34
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum IntegrityAlgorithm {
    /// 5G-IA0 (null integrity)
    #[default]
    #[serde(rename = "NIA0")]
    Nia0 = 0x00,
    /// 128-5G-IA1 (SNOW3G based)
    #[serde(rename = "NIA1")]
    Nia1 = 0x01,
    /// 128-5G-IA2 (AES-CMAC based)
    #[serde(rename = "NIA2")]
    Nia2 = 0x02,
    /// 128-5G-IA3 (ZUC based)
    #[serde(rename = "NIA3")]
    Nia3 = 0x03,
}

impl IntegrityAlgorithm {
    /// Algorithm identifier as carried on the wire and in the KDF
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Returns true for the null algorithm
    pub fn is_null(self) -> bool {
        self == IntegrityAlgorithm::Nia0
    }

    /// Short name, e.g. "NIA2"
    pub fn name(self) -> &'static str {
        match self {
            IntegrityAlgorithm::Nia0 => "NIA0",
            IntegrityAlgorithm::Nia1 => "NIA1",
            IntegrityAlgorithm::Nia2 => "NIA2",
            IntegrityAlgorithm::Nia3 => "NIA3",
        }
    }
}

impl TryFrom<u8> for IntegrityAlgorithm {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(IntegrityAlgorithm::Nia0),
            0x01 => Ok(IntegrityAlgorithm::Nia1),
            0x02 => Ok(IntegrityAlgorithm::Nia2),
            0x03 => Ok(IntegrityAlgorithm::Nia3),
            _ => Err(Error::UnknownAlgorithm {
                kind: "integrity",
                value,
            }),
        }
    }
}

impl fmt::Display for IntegrityAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Access network over which the UE is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum AccessType {
    /// NG-RAN (gNB)
    #[default]
    #[serde(rename = "3GPP")]
    ThreeGpp = 0x01,
    /// Untrusted non-3GPP access via N3IWF
    #[serde(rename = "NON_3GPP")]
    NonThreeGpp = 0x02,
}

impl AccessType {
    /// 5-bit BEARER input of the NAS integrity and ciphering algorithms
    pub fn nas_bearer(self) -> u8 {
        match self {
            AccessType::ThreeGpp => 0x01,
            AccessType::NonThreeGpp => 0x02,
        }
    }

    /// Access type distinguisher (P1) for KgNB / KN3IWF derivation
    pub fn kdf_selector(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessType::ThreeGpp => write!(f, "3GPP"),
            AccessType::NonThreeGpp => write!(f, "non-3GPP"),
        }
    }
}

/// RRC establishment cause reported by the RAN with the initial NAS message
///
/// Values follow the NGAP RRCEstablishmentCause enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RrcEstablishmentCause {
    Emergency = 0,
    HighPriorityAccess = 1,
    MtAccess = 2,
    MoSignalling = 3,
    MoData = 4,
    MoVoiceCall = 5,
    MoVideoCall = 6,
    MoSms = 7,
    MpsPriorityAccess = 8,
    McsPriorityAccess = 9,
}

impl RrcEstablishmentCause {
    /// Returns true for the emergency cause
    pub fn is_emergency(self) -> bool {
        self == RrcEstablishmentCause::Emergency
    }
}

impl TryFrom<u8> for RrcEstablishmentCause {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use RrcEstablishmentCause::*;
        Ok(match value {
            0 => Emergency,
            1 => HighPriorityAccess,
            2 => MtAccess,
            3 => MoSignalling,
            4 => MoData,
            5 => MoVoiceCall,
            6 => MoVideoCall,
            7 => MoSms,
            8 => MpsPriorityAccess,
            9 => McsPriorityAccess,
            _ => {
                return Err(Error::Config(format!(
                    "invalid RRC establishment cause: {value}"
                )))
            }
        })
    }
}

/// Subscription Permanent Identifier (SUPI)
///
/// Only the IMSI form is accepted: an optional `imsi-` or `supi-` prefix
/// followed by 5 to 15 decimal digits. The digit string is what the key
/// hierarchy feeds into the KAMF derivation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Supi {
    digits: String,
}

impl Supi {
    /// Minimum number of digits
    pub const MIN_DIGITS: usize = 5;
    /// Maximum number of digits
    pub const MAX_DIGITS: usize = 15;

    /// Parses a SUPI string such as `imsi-001010000000001`.
    ///
    /// Returns `None` if the string does not normalize to 5-15 digits.
    pub fn parse(s: &str) -> Option<Self> {
        let digits = strip_prefix(s);
        let valid_len = (Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len());
        if !valid_len || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            digits: digits.to_string(),
        })
    }

    /// The normalized digit string
    pub fn digits(&self) -> &str {
        &self.digits
    }
}

fn strip_prefix(s: &str) -> &str {
    for prefix in ["imsi-", "supi-"] {
        if let Some(head) = s.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                return &s[prefix.len()..];
            }
        }
    }
    s
}

impl FromStr for Supi {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Supi::parse(s).ok_or_else(|| Error::Config(format!("invalid SUPI: {s}")))
    }
}

impl fmt::Debug for Supi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Supi(imsi-{})", self.digits)
    }
}

impl fmt::Display for Supi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "imsi-{}", self.digits)
    }
}
