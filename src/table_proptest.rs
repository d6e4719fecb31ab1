#![cfg(test)]

// Property tests for TsbHashTable kept inside the crate so they can inspect
// the slot array directly.

use crate::prime::is_prime;
use crate::slot::Slot;
use crate::{AssociativeMap, TsbHashTable};
use core::hash::{BuildHasher, Hash};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// Pool-indexed operations so shrinking moves towards earlier keys.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
    ContainsValue(i32),
    Clear,
    Iterate,
    // Remove every entry with an even value through a pair cursor.
    SweepEven,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            6 => (idx.clone(), -50i32..50).prop_map(|(i, v)| Op::Put(i, v)),
            3 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => (-50i32..50).prop_map(Op::ContainsValue),
            1 => Just(Op::Clear),
            1 => Just(Op::Iterate),
            1 => Just(Op::SweepEven),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn check_structure<S: BuildHasher>(
    sut: &TsbHashTable<Key, i32, S>,
    model: &hashbrown::HashMap<Key, i32>,
) -> Result<(), TestCaseError> {
    let capacity = sut.capacity();
    prop_assert!(is_prime(capacity), "capacity {} is not prime", capacity);
    prop_assert!(sut.len() <= capacity / 2, "{} live in {}", sut.len(), capacity);

    let live: Vec<&Key> = sut
        .slots()
        .iter()
        .filter_map(|s| match s {
            Slot::Occupied(e) => Some(&e.key),
            _ => None,
        })
        .collect();
    prop_assert_eq!(live.len(), sut.len());
    let distinct: BTreeSet<&Key> = live.iter().copied().collect();
    prop_assert_eq!(distinct.len(), live.len(), "duplicate live key");

    prop_assert_eq!(sut.len(), model.len());
    prop_assert_eq!(sut.is_empty(), model.is_empty());
    prop_assert!(sut.map_eq(model));
    Ok(())
}

fn run<S: BuildHasher>(
    mut sut: TsbHashTable<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: hashbrown::HashMap<Key, i32> = hashbrown::HashMap::new();
    for op in ops {
        let mods = sut.modification_count();
        let capacity = sut.capacity();
        match op {
            Op::Put(i, v) => {
                let k = Key(pool[i].clone());
                let expected = AssociativeMap::put(&mut model, k.clone(), v);
                let was_new = expected.is_none();
                prop_assert_eq!(sut.put(k.clone(), v), expected);
                prop_assert_eq!(sut.get(&k), Some(&v));
                // New key: one bump, plus one for a rehash. Overwrite: none.
                let grew = u64::from(sut.capacity() != capacity);
                let delta = if was_new { 1 + grew } else { 0 };
                prop_assert_eq!(sut.modification_count(), mods + delta);
            }
            Op::Remove(i) => {
                let k = Key(pool[i].clone());
                let expected = model.remove(&k);
                let present = expected.is_some();
                prop_assert_eq!(sut.remove(&k), expected);
                prop_assert_eq!(sut.get(&k), None);
                prop_assert_eq!(sut.remove(&k), None);
                prop_assert_eq!(sut.modification_count(), mods + u64::from(present));
                prop_assert_eq!(sut.capacity(), capacity);
            }
            Op::Get(i) => {
                let k = Key(pool[i].clone());
                prop_assert_eq!(sut.get(&k), model.get(&k));
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
                prop_assert_eq!(sut.modification_count(), mods);
            }
            Op::ContainsValue(v) => {
                prop_assert_eq!(sut.contains_value(&v), model.values().any(|m| *m == v));
            }
            Op::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), 11);
                prop_assert_eq!(sut.modification_count(), mods + 1);
            }
            Op::Iterate => {
                let s: BTreeSet<(Key, i32)> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let m: BTreeSet<(Key, i32)> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s, m);
            }
            Op::SweepEven => {
                let mut cursor = sut.pairs().cursor();
                let mut removed = 0u64;
                while cursor.has_next(&sut) {
                    let (k, v) = cursor
                        .next(&sut)
                        .map(|(k, v)| (k.clone(), *v))
                        .map_err(|e| TestCaseError::fail(e.to_string()))?;
                    if v % 2 == 0 {
                        prop_assert_eq!(cursor.remove(&mut sut), Ok(v));
                        model.remove(&k);
                        removed += 1;
                    }
                }
                prop_assert_eq!(sut.modification_count(), mods + removed);
            }
        }
        check_structure(&sut, &model)?;
    }
    Ok(())
}

// Property: state-machine equivalence against hashbrown::HashMap.
// After every operation:
// - the capacity is prime and at most half of it is live;
// - live slots hold distinct keys and their number is `len`;
// - contents equal the model's;
// - the modification counter moved exactly by the structural changes made.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run(TsbHashTable::new(), pool, ops)?;
    }
}

// Collision variant: every key hashes to the same home slot, so all
// lookups walk the full quadratic path past live entries and tombstones.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl core::hash::Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run(TsbHashTable::with_hasher(ConstBuildHasher), pool, ops)?;
    }
}

// Tables holding the same pairs are equal and hash equally, whatever the
// insertion order, hasher or tombstone history.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_equality_ignores_layout(
        pairs in proptest::collection::hash_map("[a-z]{1,4}", any::<i16>(), 0..30),
        noise in proptest::collection::vec("[A-Z]{1,3}", 0..10),
    ) {
        let mut forward: TsbHashTable<String, i16> = TsbHashTable::new();
        for (k, v) in &pairs {
            forward.put(k.clone(), *v);
        }

        let mut ordered: Vec<_> = pairs.iter().collect();
        ordered.sort();
        ordered.reverse();
        let mut backward: TsbHashTable<String, i16, ConstBuildHasher> =
            TsbHashTable::with_hasher(ConstBuildHasher);
        for k in &noise {
            backward.put(k.clone(), 0);
        }
        for (k, v) in ordered {
            backward.put(k.clone(), *v);
        }
        for k in &noise {
            backward.remove(k);
        }

        prop_assert!(forward == backward);
        prop_assert!(backward == forward);
        prop_assert_eq!(table_hash(&forward), table_hash(&backward));
    }
}

fn table_hash<T: Hash>(t: &T) -> u64 {
    let mut h = std::collections::hash_map::DefaultHasher::new();
    t.hash(&mut h);
    core::hash::Hasher::finish(&h)
}
