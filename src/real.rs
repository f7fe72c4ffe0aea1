//! Bit-pattern wrapper for real-valued keys.

use crate::hashing;
use core::fmt;

// Every NaN is stored as this quiet NaN.
const CANONICAL_NAN: u64 = 0x7ff8_0000_0000_0000;

/// A real number as used for keying: compared by IEEE-754 bit pattern.
///
/// `RealKey::new(0.0) != RealKey::new(-0.0)` although the floats compare
/// equal, and every NaN equals every other NaN. Arithmetic on reals stays
/// with plain `f64`; this type exists only for hashing and key identity.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct RealKey(u64);

impl RealKey {
    /// Key for `v`; any NaN becomes the canonical quiet NaN.
    pub fn new(v: f64) -> Self {
        if v.is_nan() {
            RealKey(CANONICAL_NAN)
        } else {
            RealKey(v.to_bits())
        }
    }

    /// Raw bit pattern (canonical for NaN).
    #[inline]
    pub fn to_bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn value(self) -> f64 {
        f64::from_bits(self.0)
    }

    #[inline]
    pub fn hash(self) -> u32 {
        hashing::hash_real(self.0)
    }
}

impl From<f64> for RealKey {
    fn from(v: f64) -> Self {
        RealKey::new(v)
    }
}

impl fmt::Debug for RealKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RealKey({:?})", self.value())
    }
}

impl fmt::Display for RealKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug keeps the sign of zero and the trailing `.0`.
        fmt::Debug::fmt(&self.value(), f)
    }
}
