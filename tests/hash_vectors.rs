// Reference hash vectors.
//
// Script code reads `hash`/`hint` directly, so these are regression
// oracles: every constant here must match bit for bit.
// - hint == hash for every non-string primitive kind.
// - String hints are deliberately not compared against string hashes.
use script_dictionary::hashing;
use script_dictionary::Key;

fn hash(k: impl Into<Key>) -> u32 {
    k.into().hash().expect("primitive keys never fail")
}

fn hint(k: impl Into<Key>) -> u32 {
    k.into().hint().expect("primitive keys never fail")
}

#[test]
fn void_and_null() {
    assert_eq!(Key::Void.hash().unwrap(), 0x8f84_b331);
    assert_eq!(Key::Void.hint().unwrap(), 0x8f84_b331);
    assert_eq!(Key::Null.hash().unwrap(), 0x9b37_1c72);
    assert_eq!(Key::Null.hint().unwrap(), 0x9b37_1c72);
    assert_eq!(hash(()), hashing::VOID_HASH);
}

#[test]
fn booleans() {
    assert_eq!(hash(true), 0xab2e_d843);
    assert_eq!(hint(true), 0xab2e_d843);
    assert_eq!(hash(false), 0xbd8b_88c4);
    assert_eq!(hint(false), 0xbd8b_88c4);
}

#[test]
fn integers() {
    assert_eq!(hash(0i64), 0xf234_5678);
    assert_eq!(hint(0i64), hash(0i64));
    assert_eq!(hash(17i64), 0xf234_5668);
    assert_eq!(hint(17i64), hash(17i64));
    for n in [-5i64, 1, 1 << 40, i64::MIN, i64::MAX] {
        assert_eq!(hash(n), hint(n), "hint of {}", n);
    }
}

#[test]
fn reals() {
    // 2.25 is 0x4002000000000000 in IEEE-754.
    let b: u64 = 0x4002_0000_0000_0000;
    let expected = ((b ^ (b >> 32) ^ (b >> 48)) & 0xffff_ffff) as u32;
    assert_eq!(hash(2.25), expected);
    assert_eq!(hint(2.25), hash(2.25));

    assert_eq!(hash(f64::NAN), 1);
    assert_eq!(hint(f64::NAN), 1);
    assert_eq!(hash(-f64::NAN), 1);
    assert_eq!(hint(-f64::NAN), 1);
    assert_eq!(hash(f64::INFINITY), 2);
    assert_eq!(hint(f64::INFINITY), 2);
    assert_eq!(hash(f64::NEG_INFINITY), 3);
    assert_eq!(hint(f64::NEG_INFINITY), 3);
}

#[test]
fn signed_zeros_hash_apart() {
    assert_eq!(hash(0.0), 0);
    assert_eq!(hash(-0.0), 0x8000_8000);
}

#[test]
fn strings() {
    assert_eq!(hash(""), 0xffff_ffff);
    assert_eq!(hash("0"), 0x6e3c_5c6b);
    assert_eq!(hash("1"), 0x806b_80c9);
    assert_eq!(hash("expression"), 0x7a5b_a1cb);
    // Only self-consistency is promised for the string hint.
    assert_eq!(hint("expression"), hint(String::from("expression")));
}
