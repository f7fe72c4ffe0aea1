#![cfg(test)]

// Property tests for Dictionary kept inside the crate so the collision
// variant can share the scenario generator.

use crate::dictionary::Dictionary;
use crate::key::Key;
use crate::real::RealKey;
use core::hash::BuildHasher;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hasher;

// Model-side key with derived equality. Reals go through `RealKey`, so the
// model shares the bit-pattern rule (and NaN canonicalization) by value.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
enum ModelKey {
    Void,
    Null,
    Bool(bool),
    Int(i64),
    Real(u64),
    Str(String),
}

impl ModelKey {
    fn to_key(&self) -> Key {
        match self {
            ModelKey::Void => Key::Void,
            ModelKey::Null => Key::Null,
            ModelKey::Bool(b) => Key::Boolean(*b),
            ModelKey::Int(n) => Key::Integer(*n),
            ModelKey::Real(bits) => Key::Real(RealKey::new(f64::from_bits(*bits))),
            ModelKey::Str(s) => Key::string(s.as_str()),
        }
    }

    fn from_key(k: &Key) -> ModelKey {
        match k {
            Key::Void => ModelKey::Void,
            Key::Null => ModelKey::Null,
            Key::Boolean(b) => ModelKey::Bool(*b),
            Key::Integer(n) => ModelKey::Int(*n),
            Key::Real(r) => ModelKey::Real(r.to_bits()),
            Key::String(s) => ModelKey::Str(s.to_string()),
            Key::Object(_) => unreachable!("no object keys in this model"),
        }
    }
}

fn arb_real() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        Just(-0.0),
        Just(f64::NAN),
        Just(-f64::NAN),
        Just(f64::from_bits(0x7ff0_0000_0000_0001)),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(2.25),
        any::<f64>(),
    ]
}

fn arb_model_key() -> impl Strategy<Value = ModelKey> {
    prop_oneof![
        Just(ModelKey::Void),
        Just(ModelKey::Null),
        any::<bool>().prop_map(ModelKey::Bool),
        prop_oneof![-3i64..=3, any::<i64>()].prop_map(ModelKey::Int),
        arb_real().prop_map(|v| ModelKey::Real(RealKey::new(v).to_bits())),
        "[a-z]{0,5}".prop_map(ModelKey::Str),
    ]
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Set(usize, i32),
    Remove(usize),
    Get(usize),
    Has(usize),
    Mutate(usize, i32),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<ModelKey>, Vec<Op>)> {
    proptest::collection::vec(arb_model_key(), 1..=10).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Set(i, v)),
            2 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => idx.clone().prop_map(Op::Has),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Clear),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drives one scenario against the model and returns the first mismatch.
fn run_scenario<S: BuildHasher>(
    sut: &mut Dictionary<i32, S>,
    pool: &[ModelKey],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<ModelKey, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Set(i, v) => {
                let k = &pool[i];
                let prev = sut.set(k.to_key(), v).expect("primitive keys never fail");
                prop_assert_eq!(prev, model.insert(k.clone(), v));
            }
            Op::Remove(i) => {
                let k = &pool[i];
                let removed = sut.remove(&k.to_key()).expect("primitive keys never fail");
                prop_assert_eq!(removed, model.remove(k));
            }
            Op::Get(i) => {
                let k = &pool[i];
                let got = sut.get(&k.to_key()).ok().copied();
                prop_assert_eq!(got, model.get(k).copied());
            }
            Op::Has(i) => {
                let k = &pool[i];
                let has = sut.has(&k.to_key()).expect("primitive keys never fail");
                prop_assert_eq!(has, model.contains_key(k));
            }
            Op::Mutate(i, d) => {
                let k = &pool[i];
                if let Ok(v) = sut.get_mut(&k.to_key()) {
                    *v = v.saturating_add(d);
                    let mv = model.get_mut(k).expect("present in model");
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(!model.contains_key(k));
                }
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
            Op::Iterate => {
                let s_keys: BTreeSet<ModelKey> = sut.keys().map(ModelKey::from_key).collect();
                let m_keys: BTreeSet<ModelKey> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys.len(), sut.len(), "iteration yields each entry once");
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        // Size parity after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }

    // Every surviving entry reads back its model value.
    for (k, v) in &model {
        prop_assert_eq!(sut.get(&k.to_key()).ok(), Some(v));
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `set` returns the replaced value exactly when the model had the key.
// - `remove` returns the stored value and forgets the key; absent keys are no-ops.
// - `get`/`has` parity with the model; ±0.0 stay apart and NaNs collapse.
// - `keys()` yields each live entry exactly once; `len`/`is_empty` parity.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: Dictionary<i32> = Dictionary::new();
        run_scenario(&mut sut, &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: Same state-machine invariants as above, with every key in one
// bucket so only the stored hash and `Key::equal` tell entries apart.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let mut sut: Dictionary<i32, ConstBuildHasher> = Dictionary::with_hasher(ConstBuildHasher);
        run_scenario(&mut sut, &pool, ops)?;
    }
}
