//! Test fixtures
//!
//! Subscriber credentials as they would arrive from authentication, and a
//! handful of plain NAS messages to carry through the codec.

use nextgamf_common::AccessType;
use nextgamf_nas::UeSecurityCapability;

/// Subscriber data shared by the AMF and the UE peer
#[derive(Debug, Clone)]
pub struct TestSubscriber {
    /// SUPI (IMSI)
    pub supi: String,
    /// KSEAF produced by primary authentication
    pub kseaf: [u8; 32],
    /// ABBA from the registration procedure
    pub abba: Vec<u8>,
    /// Advertised UE security capability
    pub capability: UeSecurityCapability,
    /// Access the UE registers over
    pub access_type: AccessType,
}

impl Default for TestSubscriber {
    fn default() -> Self {
        Self {
            supi: "imsi-001010000000001".to_string(),
            kseaf: core::array::from_fn(|i| i as u8),
            abba: vec![0x00, 0x00],
            // EA0-EA3 and IA0-IA3
            capability: UeSecurityCapability::new(0xF0, 0xF0),
            access_type: AccessType::ThreeGpp,
        }
    }
}

impl TestSubscriber {
    /// Same subscriber with a different IMSI
    pub fn with_imsi(mut self, imsi: &str) -> Self {
        self.supi = format!("imsi-{imsi}");
        self
    }

    /// Same subscriber with a different capability
    pub fn with_capability(mut self, nr_ea: u8, nr_ia: u8) -> Self {
        self.capability = UeSecurityCapability::new(nr_ea, nr_ia);
        self
    }

    /// Same subscriber over another access
    pub fn with_access_type(mut self, access_type: AccessType) -> Self {
        self.access_type = access_type;
        self
    }
}

/// Plain Registration Request header with a short body
pub fn registration_request() -> Vec<u8> {
    vec![0x7E, 0x00, 0x41, 0x79, 0x00, 0x0D, 0x01, 0x00, 0xF1, 0x10]
}

/// Security Mode Command header with selected algorithms and ngKSI
pub fn security_mode_command() -> Vec<u8> {
    vec![0x7E, 0x00, 0x5D, 0x22, 0x00, 0x02, 0xF0, 0xF0]
}

/// Security Mode Complete
pub fn security_mode_complete() -> Vec<u8> {
    vec![0x7E, 0x00, 0x5E]
}

/// Registration Accept with a 5G-GUTI
pub fn registration_accept() -> Vec<u8> {
    hex::decode("7e0042010177000bf200f1100200400102030454").unwrap_or_default()
}

/// Registration Complete
pub fn registration_complete() -> Vec<u8> {
    vec![0x7E, 0x00, 0x43]
}

/// UL NAS Transport carrying a 5GSM container
pub fn ul_nas_transport() -> Vec<u8> {
    vec![0x7E, 0x00, 0x67, 0x01, 0x00, 0x04, 0x2E, 0x01, 0x01, 0xC1]
}
