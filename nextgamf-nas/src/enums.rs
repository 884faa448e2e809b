//! NAS protocol enumerations
//!
//! Based on 3GPP TS 24.501 specification

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Extended Protocol Discriminator (EPD)
/// 3GPP TS 24.501 Section 9.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ExtendedProtocolDiscriminator {
    /// 5GS Mobility Management messages
    MobilityManagement = 0x7E,
    /// 5GS Session Management messages
    SessionManagement = 0x2E,
}

/// Security Header Type
/// 3GPP TS 24.501 Section 9.3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, Default)]
#[repr(u8)]
pub enum SecurityHeaderType {
    /// Plain NAS message, not security protected
    #[default]
    NotProtected = 0x00,
    /// Integrity protected
    IntegrityProtected = 0x01,
    /// Integrity protected and ciphered
    IntegrityProtectedAndCiphered = 0x02,
    /// Integrity protected with new 5G NAS security context
    IntegrityProtectedWithNewSecurityContext = 0x03,
    /// Integrity protected and ciphered with new 5G NAS security context
    IntegrityProtectedAndCipheredWithNewSecurityContext = 0x04,
}

impl SecurityHeaderType {
    /// Returns true if the message is security protected
    pub fn is_protected(&self) -> bool {
        !matches!(self, SecurityHeaderType::NotProtected)
    }

    /// Returns true if the message body is ciphered
    pub fn is_ciphered(&self) -> bool {
        matches!(
            self,
            SecurityHeaderType::IntegrityProtectedAndCiphered
                | SecurityHeaderType::IntegrityProtectedAndCipheredWithNewSecurityContext
        )
    }

    /// Returns true if this indicates a new security context, which restarts
    /// the NAS COUNTs
    pub fn is_new_security_context(&self) -> bool {
        matches!(
            self,
            SecurityHeaderType::IntegrityProtectedWithNewSecurityContext
                | SecurityHeaderType::IntegrityProtectedAndCipheredWithNewSecurityContext
        )
    }
}

/// Direction input (1 bit) of the NAS security algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive)]
#[repr(u8)]
pub enum NasDirection {
    /// UE to network
    Uplink = 0,
    /// Network to UE
    Downlink = 1,
}

/// 5GMM Message Type
/// 3GPP TS 24.501 Section 9.7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum MmMessageType {
    RegistrationRequest = 0x41,
    RegistrationAccept = 0x42,
    RegistrationComplete = 0x43,
    RegistrationReject = 0x44,
    DeregistrationRequestUeOriginating = 0x45,
    DeregistrationAcceptUeOriginating = 0x46,
    DeregistrationRequestUeTerminated = 0x47,
    DeregistrationAcceptUeTerminated = 0x48,
    ServiceRequest = 0x4C,
    ServiceReject = 0x4D,
    ServiceAccept = 0x4E,
    ConfigurationUpdateCommand = 0x54,
    ConfigurationUpdateComplete = 0x55,
    AuthenticationRequest = 0x56,
    AuthenticationResponse = 0x57,
    AuthenticationReject = 0x58,
    AuthenticationFailure = 0x59,
    AuthenticationResult = 0x5A,
    IdentityRequest = 0x5B,
    IdentityResponse = 0x5C,
    SecurityModeCommand = 0x5D,
    SecurityModeComplete = 0x5E,
    SecurityModeReject = 0x5F,
    FiveGMmStatus = 0x64,
    Notification = 0x65,
    NotificationResponse = 0x66,
    UlNasTransport = 0x67,
    DlNasTransport = 0x68,
}

/// 5GSM Message Type
/// 3GPP TS 24.501 Section 9.7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum SmMessageType {
    PduSessionEstablishmentRequest = 0xC1,
    PduSessionEstablishmentAccept = 0xC2,
    PduSessionEstablishmentReject = 0xC3,
    PduSessionAuthenticationCommand = 0xC5,
    PduSessionAuthenticationComplete = 0xC6,
    PduSessionAuthenticationResult = 0xC7,
    PduSessionModificationRequest = 0xC9,
    PduSessionModificationReject = 0xCA,
    PduSessionModificationCommand = 0xCB,
    PduSessionModificationComplete = 0xCC,
    PduSessionModificationCommandReject = 0xCD,
    PduSessionReleaseRequest = 0xD1,
    PduSessionReleaseReject = 0xD2,
    PduSessionReleaseCommand = 0xD3,
    PduSessionReleaseComplete = 0xD4,
    FiveGSmStatus = 0xD6,
}
