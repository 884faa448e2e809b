//! Per-subscriber NAS security context
//!
//! Holds the key hierarchy, the negotiated algorithms, both NAS COUNTs and the
//! status flags for one UE. The context is owned by the UE's session and is
//! mutated only by that session, so it carries no locking of its own.
//!
//! # Lifecycle
//!
//! ```text
//! new() ─> set_kseaf() ─> derive_kamf() ─> apply_algorithms() ─> activate()
//!                                                                    │
//!        Encode/Decode per NAS message, derive_an_key() on demand <──┘
//!                                                                    │
//!                                               clear() on teardown <┘
//! ```
//!
//! Every key is held in a zeroizing container, so replacing or clearing a
//! key wipes the old value.

use nextgamf_common::{AccessType, CipheringAlgorithm, IntegrityAlgorithm};
use nextgamf_crypto::{Key128, Key256};
use tracing::debug;

use crate::count::NasCount;
use crate::error::SecurityError;
use crate::keys;

/// Type of security context
///
/// 3GPP TS 24.501 Section 9.11.3.32
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum SecurityContextType {
    /// Native security context
    #[default]
    Native = 0,
    /// Mapped security context (from EPS)
    Mapped = 1,
}

impl TryFrom<u8> for SecurityContextType {
    type Error = SecurityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SecurityContextType::Native),
            1 => Ok(SecurityContextType::Mapped),
            _ => Err(SecurityError::InvalidSecurityContextType(value)),
        }
    }
}

/// NAS Key Set Identifier (ngKSI)
///
/// 3GPP TS 24.501 Section 9.11.3.32
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NasKeySetIdentifier {
    /// Type of security context
    pub tsc: SecurityContextType,
    /// Key set identifier (0-6, 7 = no key available)
    pub ksi: u8,
}

impl NasKeySetIdentifier {
    /// Value indicating no key is available
    pub const NO_KEY_AVAILABLE: u8 = 0x07;

    /// Create a new NAS key set identifier
    pub fn new(tsc: SecurityContextType, ksi: u8) -> Self {
        Self { tsc, ksi: ksi & 0x07 }
    }

    /// Create a "no key available" identifier
    pub fn no_key() -> Self {
        Self::new(SecurityContextType::Native, Self::NO_KEY_AVAILABLE)
    }

    /// Returns true if no key is available
    pub fn is_no_key(&self) -> bool {
        self.ksi == Self::NO_KEY_AVAILABLE
    }

    /// Encode to a half octet
    pub fn encode(&self) -> u8 {
        ((self.tsc as u8) << 3) | (self.ksi & 0x07)
    }

    /// Decode from a half octet
    pub fn decode(value: u8) -> Result<Self, SecurityError> {
        let tsc = SecurityContextType::try_from((value >> 3) & 0x01)?;
        Ok(Self::new(tsc, value))
    }

    /// Next KSI to assign on a fresh authentication (0..=6, skipping 7)
    pub fn next(&self) -> Self {
        let ksi = if self.ksi >= 6 { 0 } else { self.ksi + 1 };
        Self::new(SecurityContextType::Native, ksi)
    }
}

impl Default for NasKeySetIdentifier {
    fn default() -> Self {
        Self::no_key()
    }
}

/// NAS Security Context
#[derive(Debug, Clone, Default)]
pub struct NasSecurityContext {
    ciphering_algorithm: CipheringAlgorithm,
    integrity_algorithm: IntegrityAlgorithm,

    kseaf: Option<Key256>,
    kamf: Option<Key256>,
    knas_enc: Option<Key128>,
    knas_int: Option<Key128>,
    kgnb: Option<Key256>,
    kn3iwf: Option<Key256>,
    nh: Option<Key256>,
    ncc: u8,

    pub(crate) ul_count: NasCount,
    pub(crate) dl_count: NasCount,

    security_context_available: bool,
    pub(crate) mac_failed: bool,

    ng_ksi: NasKeySetIdentifier,
    abba: Vec<u8>,
    access_type: AccessType,
}

impl NasSecurityContext {
    /// Creates an empty context (no keys, null algorithms, not available)
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty context for the given access type
    pub fn with_access_type(access_type: AccessType) -> Self {
        Self {
            access_type,
            ..Self::default()
        }
    }

    // ---- root keys -------------------------------------------------------

    /// Stores KSEAF received from authentication. Any previously derived
    /// keys are discarded and the context becomes unavailable.
    pub fn set_kseaf(&mut self, kseaf: &[u8]) -> Result<(), SecurityError> {
        let key = Key256::from_slice(kseaf)?;
        self.invalidate_kamf();
        self.kseaf = Some(key);
        Ok(())
    }

    /// Stores the ABBA parameter from the registration procedure
    pub fn set_abba(&mut self, abba: Vec<u8>) {
        self.abba = abba;
    }

    /// ABBA parameter
    pub fn abba(&self) -> &[u8] {
        &self.abba
    }

    /// Derives KAMF from KSEAF, the SUPI and the stored ABBA.
    pub fn derive_kamf(&mut self, supi: &str) -> Result<(), SecurityError> {
        let kseaf = self.kseaf.as_ref().ok_or(SecurityError::MissingRootKey("KSEAF"))?;
        let kamf = keys::derive_kamf(supi, &self.abba, kseaf.as_bytes())?;
        self.invalidate_kamf();
        self.kamf = Some(kamf);
        debug!("KAMF derived");
        Ok(())
    }

    /// Installs a KAMF obtained elsewhere (e.g. transferred from the old
    /// AMF). Derived keys are discarded.
    pub fn set_kamf(&mut self, kamf: &[u8]) -> Result<(), SecurityError> {
        let key = Key256::from_slice(kamf)?;
        self.invalidate_kamf();
        self.kamf = Some(key);
        Ok(())
    }

    /// Drops KAMF and everything derived from it, for a full
    /// re-authentication. KSEAF is kept.
    pub fn invalidate_kamf(&mut self) {
        self.kamf = None;
        self.knas_enc = None;
        self.knas_int = None;
        self.kgnb = None;
        self.kn3iwf = None;
        self.nh = None;
        self.ncc = 0;
        self.security_context_available = false;
    }

    /// KSEAF, if received
    pub fn kseaf(&self) -> Option<&Key256> {
        self.kseaf.as_ref()
    }

    /// KAMF, if derived
    pub fn kamf(&self) -> Option<&Key256> {
        self.kamf.as_ref()
    }

    // ---- algorithms and NAS keys ------------------------------------------

    /// Records the negotiated algorithms and derives KNASenc/KNASint.
    ///
    /// Keys are re-derived when either algorithm changes or when they are
    /// missing (after a new KAMF). Returns whether a derivation happened.
    pub fn apply_algorithms(
        &mut self,
        ciphering: CipheringAlgorithm,
        integrity: IntegrityAlgorithm,
    ) -> Result<bool, SecurityError> {
        let unchanged = ciphering == self.ciphering_algorithm
            && integrity == self.integrity_algorithm
            && self.knas_enc.is_some()
            && self.knas_int.is_some();
        if unchanged {
            return Ok(false);
        }

        let kamf = self.kamf.as_ref().ok_or(SecurityError::MissingRootKey("KAMF"))?;
        let (knas_enc, knas_int) = keys::derive_alg_keys(kamf.as_bytes(), ciphering, integrity)?;
        self.knas_enc = Some(knas_enc);
        self.knas_int = Some(knas_int);
        self.ciphering_algorithm = ciphering;
        self.integrity_algorithm = integrity;
        debug!(%ciphering, %integrity, "NAS keys derived");
        Ok(true)
    }

    /// Selected ciphering algorithm
    pub fn ciphering_algorithm(&self) -> CipheringAlgorithm {
        self.ciphering_algorithm
    }

    /// Selected integrity algorithm
    pub fn integrity_algorithm(&self) -> IntegrityAlgorithm {
        self.integrity_algorithm
    }

    /// KNASenc, if derived
    pub fn knas_enc(&self) -> Option<&Key128> {
        self.knas_enc.as_ref()
    }

    /// KNASint, if derived
    pub fn knas_int(&self) -> Option<&Key128> {
        self.knas_int.as_ref()
    }

    pub(crate) fn require_knas_enc(&self) -> Result<&Key128, SecurityError> {
        self.knas_enc.as_ref().ok_or(SecurityError::MissingRootKey("KNASenc"))
    }

    pub(crate) fn require_knas_int(&self) -> Result<&Key128, SecurityError> {
        self.knas_int.as_ref().ok_or(SecurityError::MissingRootKey("KNASint"))
    }

    // ---- access network keys ------------------------------------------------

    /// Derives KgNB or KN3IWF from KAMF and the current uplink COUNT.
    pub fn derive_an_key(&mut self, access_type: AccessType) -> Result<&Key256, SecurityError> {
        let kamf = self.kamf.as_ref().ok_or(SecurityError::MissingRootKey("KAMF"))?;
        let key = keys::derive_an_key(kamf.as_bytes(), self.ul_count.packed(), access_type)?;
        debug!(%access_type, ul_count = self.ul_count.packed(), "AN key derived");
        let slot = match access_type {
            AccessType::ThreeGpp => &mut self.kgnb,
            AccessType::NonThreeGpp => &mut self.kn3iwf,
        };
        Ok(&*slot.insert(key))
    }

    /// Derives NH from KAMF and `sync_input`, advancing NCC (mod 8).
    pub fn derive_nh(&mut self, sync_input: &[u8]) -> Result<(), SecurityError> {
        let kamf = self.kamf.as_ref().ok_or(SecurityError::MissingRootKey("KAMF"))?;
        self.nh = Some(keys::derive_nh(kamf.as_bytes(), sync_input)?);
        self.ncc = (self.ncc + 1) % 8;
        Ok(())
    }

    /// Initial AN key setup: derives the AN key for `access_type`, then the
    /// first NH from it. NCC ends at 1.
    pub fn update_security_context(&mut self, access_type: AccessType) -> Result<(), SecurityError> {
        let an_key = self.derive_an_key(access_type)?.clone();
        self.ncc = 0;
        self.derive_nh(an_key.as_bytes())
    }

    /// Next-hop chaining for handover: NH from the previous NH.
    pub fn update_nh(&mut self) -> Result<(), SecurityError> {
        let previous = self.nh.clone().ok_or(SecurityError::MissingRootKey("NH"))?;
        self.derive_nh(previous.as_bytes())
    }

    /// KgNB, if derived
    pub fn kgnb(&self) -> Option<&Key256> {
        self.kgnb.as_ref()
    }

    /// KN3IWF, if derived
    pub fn kn3iwf(&self) -> Option<&Key256> {
        self.kn3iwf.as_ref()
    }

    /// Next hop key, if derived
    pub fn nh(&self) -> Option<&Key256> {
        self.nh.as_ref()
    }

    /// NH chaining counter (0..=7)
    pub fn ncc(&self) -> u8 {
        self.ncc
    }

    // ---- counts and flags ----------------------------------------------------

    /// Uplink NAS COUNT
    pub fn ul_count(&self) -> NasCount {
        self.ul_count
    }

    /// Downlink NAS COUNT
    pub fn dl_count(&self) -> NasCount {
        self.dl_count
    }

    /// Overrides the uplink NAS COUNT (context transfer)
    pub fn set_ul_count(&mut self, count: NasCount) {
        self.ul_count = count;
    }

    /// Overrides the downlink NAS COUNT (context transfer)
    pub fn set_dl_count(&mut self, count: NasCount) {
        self.dl_count = count;
    }

    /// Sets both COUNTs to zero
    pub fn reset_counts(&mut self) {
        self.ul_count.reset();
        self.dl_count.reset();
    }

    /// Marks the context usable for protection. Requires the NAS keys.
    pub fn activate(&mut self) -> Result<(), SecurityError> {
        self.require_knas_enc()?;
        self.require_knas_int()?;
        self.security_context_available = true;
        Ok(())
    }

    /// Whether protected messages can be produced and verified
    pub fn is_available(&self) -> bool {
        self.security_context_available
    }

    /// Result of the last integrity check
    pub fn mac_failed(&self) -> bool {
        self.mac_failed
    }

    /// ngKSI of the active key set
    pub fn ng_ksi(&self) -> NasKeySetIdentifier {
        self.ng_ksi
    }

    /// Sets the ngKSI
    pub fn set_ng_ksi(&mut self, ng_ksi: NasKeySetIdentifier) {
        self.ng_ksi = ng_ksi;
    }

    /// Access type the UE is attached over
    pub fn access_type(&self) -> AccessType {
        self.access_type
    }

    /// Sets the access type
    pub fn set_access_type(&mut self, access_type: AccessType) {
        self.access_type = access_type;
    }

    /// Wipes all key material and returns to the empty state. Used on
    /// session teardown.
    pub fn clear(&mut self) {
        let access_type = self.access_type;
        // dropping the old keys zeroizes them
        *self = Self::with_access_type(access_type);
        debug!("NAS security context cleared");
    }
}

#[cfg(test)]
impl NasSecurityContext {
    /// Replaces the derived NAS keys with fixed ones for wire-level tests
    pub(crate) fn override_nas_keys(&mut self, knas_enc: Key128, knas_int: Key128) {
        self.knas_enc = Some(knas_enc);
        self.knas_int = Some(knas_int);
    }

    pub(crate) fn force_available(&mut self) {
        self.security_context_available = true;
    }
}
