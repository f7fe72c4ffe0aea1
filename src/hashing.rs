//! Primitive key hashing.
//!
//! These functions are bit-exact: script code observes `hash` and `hint`
//! directly, and test suites assert the constants below.

/// Hash of the `void` value.
pub const VOID_HASH: u32 = 0x8f84_b331;
/// Hash of the `null` value.
pub const NULL_HASH: u32 = 0x9b37_1c72;
/// Hash of boolean `true`.
pub const TRUE_HASH: u32 = 0xab2e_d843;
/// Hash of boolean `false`.
pub const FALSE_HASH: u32 = 0xbd8b_88c4;
/// Constant mixed into every integer hash.
pub const INTEGER_SEED: u32 = 0xf234_5678;
/// Hash shared by every NaN, regardless of sign or payload.
pub const NAN_HASH: u32 = 1;
/// Hash of positive infinity.
pub const POSITIVE_INFINITY_HASH: u32 = 2;
/// Hash of negative infinity.
pub const NEGATIVE_INFINITY_HASH: u32 = 3;
/// A string hash never evaluates to zero; zero is remapped to this.
pub const STRING_ZERO_SUBSTITUTE: u32 = 0xffff_ffff;

// Number of leading code points the string hint looks at.
const HINT_SPAN: usize = 8;

/// Hash of a boolean: [`TRUE_HASH`] or [`FALSE_HASH`].
#[inline]
pub fn hash_bool(b: bool) -> u32 {
    if b {
        TRUE_HASH
    } else {
        FALSE_HASH
    }
}

/// Hash of a 64-bit integer: fold to 32 bits, spread the high bits down,
/// then mix in [`INTEGER_SEED`].
#[inline]
pub fn hash_integer(n: i64) -> u32 {
    let u = n as u64;
    let mut v = (u ^ (u >> 32)) as u32;
    v ^= (v >> 20) ^ (v >> 12);
    v ^ (v >> 7) ^ (v >> 4) ^ INTEGER_SEED
}

/// Hash of a real given its IEEE-754 bit pattern.
///
/// NaNs and infinities map to small fixed constants; finite values
/// (including both zeros) XOR-fold the raw bits, so `+0.0` and `-0.0`
/// hash differently.
#[inline]
pub fn hash_real(bits: u64) -> u32 {
    let v = f64::from_bits(bits);
    if v.is_nan() {
        NAN_HASH
    } else if v == f64::INFINITY {
        POSITIVE_INFINITY_HASH
    } else if v == f64::NEG_INFINITY {
        NEGATIVE_INFINITY_HASH
    } else {
        (bits ^ (bits >> 32) ^ (bits >> 48)) as u32
    }
}

/// One-at-a-time hash over the string's code points.
pub fn hash_str(s: &str) -> u32 {
    let mut h: u32 = 0;
    for c in s.chars() {
        h = h.wrapping_add(c as u32);
        h = h.wrapping_add(h << 10);
        h ^= h >> 6;
    }
    h = h.wrapping_add(h << 3);
    h ^= h >> 11;
    h = h.wrapping_add(h << 15);
    if h == 0 {
        STRING_ZERO_SUBSTITUTE
    } else {
        h
    }
}

/// Cheap string digest: UTF-8 length plus a short prefix. Constant time
/// in the string's length.
///
/// Equal strings always share a hint; nothing else is promised, in
/// particular it is not equal to [`hash_str`].
pub fn hint_str(s: &str) -> u32 {
    let mut h = (s.len() as u32).wrapping_mul(0x9e37_79b9);
    for c in s.chars().take(HINT_SPAN) {
        h = (h ^ c as u32).wrapping_mul(0x0100_0193);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: integer hashes match the reference points.
    #[test]
    fn integer_reference_points() {
        assert_eq!(hash_integer(0), 0xf234_5678);
        assert_eq!(hash_integer(17), 0xf234_5668);
    }

    /// Invariant: integer hashing only depends on the 32-bit fold of the
    /// two's complement pattern, so -1 collides with 0 and MIN with MAX.
    #[test]
    fn folding_collisions() {
        assert_eq!(hash_integer(-1), hash_integer(0));
        assert_eq!(hash_integer(i64::MIN), hash_integer(i64::MAX));
        assert_ne!(hash_integer(1), hash_integer(2));
    }

    /// Invariant: every NaN shares one hash; infinities have their own.
    #[test]
    fn special_reals() {
        assert_eq!(hash_real(f64::NAN.to_bits()), 1);
        assert_eq!(hash_real((-f64::NAN).to_bits()), 1);
        assert_eq!(hash_real(0x7ff0_0000_0000_0001), 1);
        assert_eq!(hash_real(f64::INFINITY.to_bits()), 2);
        assert_eq!(hash_real(f64::NEG_INFINITY.to_bits()), 3);
    }

    /// Invariant: finite reals fold `b ^ b>>32 ^ b>>48`; the zeros differ.
    #[test]
    fn finite_reals_fold_bits() {
        let b: u64 = 0x4002_0000_0000_0000; // 2.25
        assert_eq!(hash_real(b), ((b ^ (b >> 32) ^ (b >> 48)) & 0xffff_ffff) as u32);
        assert_eq!(hash_real(0.0f64.to_bits()), 0);
        assert_eq!(hash_real((-0.0f64).to_bits()), 0x8000_8000);
    }

    /// Invariant: string hashes match the reference points; empty maps to all-ones.
    #[test]
    fn string_reference_points() {
        assert_eq!(hash_str(""), 0xffff_ffff);
        assert_eq!(hash_str("0"), 0x6e3c_5c6b);
        assert_eq!(hash_str("1"), 0x806b_80c9);
        assert_eq!(hash_str("expression"), 0x7a5b_a1cb);
    }

    /// Invariant: equal strings share a hint; the hint tells strings of
    /// different length apart even with a shared prefix.
    #[test]
    fn string_hint_is_deterministic() {
        assert_eq!(hint_str("expression"), hint_str("expression"));
        assert_ne!(hint_str("abcdefghij"), hint_str("abcdefghijk"));
    }

    /// Invariant: the hint reads only the length and the first code points,
    /// so a differing tail goes unnoticed while the hash still sees it.
    #[test]
    fn string_hint_ignores_the_tail() {
        assert_eq!(hint_str("abcdefgh-tail-1"), hint_str("abcdefgh-tail-2"));
        assert_ne!(hash_str("abcdefgh-tail-1"), hash_str("abcdefgh-tail-2"));
    }
}
