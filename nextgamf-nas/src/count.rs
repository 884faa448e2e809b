//! NAS COUNT
//!
//! 3GPP TS 24.501 Section 4.4.3.1. A 24-bit value made of a 16-bit overflow
//! counter and the 8-bit sequence number carried in every protected PDU:
//!
//! ```text
//! | 0x00 (8) | overflow (16) | sqn (8) |
//! ```

/// NAS COUNT for one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NasCount {
    /// Overflow counter, incremented when `sqn` wraps
    pub overflow: u16,
    /// Sequence number, sent in the clear with each message
    pub sqn: u8,
}

impl NasCount {
    /// Largest packed value
    pub const MAX: u32 = 0x00FF_FFFF;

    /// Create a new NAS count with specified overflow and sequence number
    pub fn new(overflow: u16, sqn: u8) -> Self {
        Self { overflow, sqn }
    }

    /// Packed 32-bit value used as the COUNT input of NIA/NEA and the KDF
    pub fn packed(&self) -> u32 {
        (u32::from(self.overflow) << 8) | u32::from(self.sqn)
    }

    /// Inverse of [`packed`](Self::packed); bits above 24 are dropped
    pub fn from_packed(value: u32) -> Self {
        Self {
            overflow: ((value >> 8) & 0xFFFF) as u16,
            sqn: (value & 0xFF) as u8,
        }
    }

    /// Advances by one after a message is sent. Wraps to zero past
    /// [`MAX`](Self::MAX).
    pub fn add_one(&mut self) {
        self.sqn = self.sqn.wrapping_add(1);
        if self.sqn == 0 {
            self.overflow = self.overflow.wrapping_add(1);
        }
    }

    /// Estimates the full COUNT of a received message from its sequence
    /// number. A sequence number below the stored one is taken as a wrap.
    pub fn estimate_from_sqn(&self, received_sqn: u8) -> NasCount {
        let mut estimated = *self;
        if self.sqn > received_sqn {
            estimated.overflow = self.overflow.wrapping_add(1);
        }
        estimated.sqn = received_sqn;
        estimated
    }

    /// Applies [`estimate_from_sqn`](Self::estimate_from_sqn) in place.
    ///
    /// A replayed message also lands here; only the MAC check that follows
    /// tells a replay from a genuine wrap.
    pub fn update_from_sqn(&mut self, received_sqn: u8) {
        *self = self.estimate_from_sqn(received_sqn);
    }

    /// Resets to zero (new security context)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
