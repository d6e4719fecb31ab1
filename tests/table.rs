mod common;

use common::{initialize_logger, Identity};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tsb_hashtable::{AssociativeMap, TableConfig, TableError, TsbHashTable};

fn hash_of<T: Hash>(t: &T) -> u64 {
    let mut h = DefaultHasher::new();
    t.hash(&mut h);
    h.finish()
}

#[test]
fn put_get_remove_round_trip() {
    initialize_logger();
    let mut t: TsbHashTable<String, u32> = TsbHashTable::new();
    assert_eq!(t.put("Drama".to_string(), 2), None);
    assert_eq!(t.get("Drama"), Some(&2));
    assert!(t.contains_key("Drama"));
    assert_eq!(t.len(), 1);

    assert_eq!(t.remove("Drama"), Some(2));
    assert_eq!(t.get("Drama"), None);
    assert_eq!(t.remove("Drama"), None);
    assert!(t.is_empty());
}

#[test]
fn overwrite_keeps_size_and_is_not_structural() {
    let mut t: TsbHashTable<&str, u32> = TsbHashTable::new();
    t.put("Comedy", 1);
    let before = t.modification_count();

    assert_eq!(t.put("Comedy", 5), Some(1));
    assert_eq!(t.len(), 1);
    assert_eq!(t.get("Comedy"), Some(&5));
    assert_eq!(t.modification_count(), before);

    *t.get_mut("Comedy").unwrap() += 1;
    assert_eq!(t.get("Comedy"), Some(&6));
    assert_eq!(t.modification_count(), before);
}

#[test]
fn sixth_key_grows_default_table_to_23() {
    initialize_logger();
    let mut t: TsbHashTable<u64, u64> = TsbHashTable::new();
    assert_eq!(t.capacity(), 11);
    for k in 0..5 {
        t.put(k, k * 10);
    }
    assert_eq!(t.capacity(), 11);
    let before = t.modification_count();

    t.put(5, 50);
    assert_eq!(t.capacity(), 23);
    // One bump for the new key, one for the rehash.
    assert_eq!(t.modification_count(), before + 2);
    for k in 0..6 {
        assert_eq!(t.get(&k), Some(&(k * 10)));
    }
}

#[test]
fn growth_keeps_at_most_half_the_slots_live() {
    let mut t: TsbHashTable<u64, ()> = TsbHashTable::new();
    for k in 0..2_000 {
        t.put(k, ());
        assert!(t.len() <= t.capacity() / 2);
        assert!(tsb_hashtable::prime::is_prime(t.capacity()));
    }
    assert_eq!(t.len(), 2_000);
}

#[test]
fn colliding_keys_stay_reachable_across_removals() {
    // With identity hashing 0, 11 and 22 share home slot 0 in an 11-slot
    // table and settle at offsets 0, 1 and 4.
    let mut t: TsbHashTable<u64, &str, Identity> = TsbHashTable::with_hasher(Identity::default());
    t.put(0, "a");
    t.put(11, "b");
    t.put(22, "c");
    assert_eq!(t.capacity(), 11);

    assert_eq!(t.remove(&11), Some("b"));
    assert_eq!(t.get(&22), Some(&"c"));
    assert_eq!(t.remove(&0), Some("a"));
    assert_eq!(t.get(&22), Some(&"c"));

    // The reinserted key reclaims the first tombstone on its path.
    t.put(33, "d");
    assert_eq!(t.get(&33), Some(&"d"));
    assert_eq!(t.len(), 2);
}

#[test]
fn configured_capacity_and_load_factor() {
    initialize_logger();
    let t: TsbHashTable<u32, u32> = TsbHashTable::with_capacity(100);
    assert_eq!(t.capacity(), 101);

    let t: TsbHashTable<u32, u32> = TsbHashTable::with_capacity(0);
    assert_eq!(t.capacity(), 11);

    // Above the probing bound: clamped.
    let t: TsbHashTable<u32, u32> = TsbHashTable::with_capacity_and_load_factor(11, 0.9);
    assert_eq!(t.load_factor(), 0.5);

    let mut t: TsbHashTable<u32, u32, Identity> = TsbHashTable::with_config(
        TableConfig::default()
            .with_initial_capacity(11)
            .with_load_factor(0.25),
        Identity::default(),
    );
    assert_eq!(t.load_factor(), 0.25);
    t.put(1, 1);
    t.put(2, 2);
    assert_eq!(t.capacity(), 11);
    t.put(3, 3);
    assert_eq!(t.capacity(), 23);
}

#[test]
fn checked_calls_reject_missing_arguments() {
    let mut t: TsbHashTable<&str, u32> = TsbHashTable::new();
    assert!(matches!(
        t.put_checked(None, Some(1)),
        Err(TableError::InvalidArgument(_))
    ));
    assert!(matches!(
        t.put_checked(Some("Drama"), None),
        Err(TableError::InvalidArgument(_))
    ));
    assert!(matches!(
        t.remove_checked::<&str>(None),
        Err(TableError::InvalidArgument(_))
    ));
    assert!(t.is_empty());
    assert_eq!(t.modification_count(), 0);

    assert_eq!(t.put_checked(Some("Drama"), Some(2)), Ok(None));
    assert_eq!(t.remove_checked(Some(&"Drama")), Ok(Some(2)));
}

#[test]
fn equality_and_hash_ignore_insertion_order() {
    let a: TsbHashTable<&str, u32> = [("Drama", 2), ("Comedy", 5), ("Action", 5)]
        .into_iter()
        .collect();
    let mut b: TsbHashTable<&str, u32> = TsbHashTable::with_capacity(50);
    b.put("Action", 5);
    b.put("Horror", 0);
    b.put("Comedy", 5);
    b.put("Drama", 2);
    b.remove("Horror");

    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    b.put("Drama", 3);
    assert_ne!(a, b);
    b.put("Drama", 2);
    b.put("Western", 1);
    assert_ne!(a, b);
}

#[test]
fn clear_restores_a_fresh_table() {
    let mut t: TsbHashTable<u64, u64> = TsbHashTable::with_capacity(7);
    t.extend((0..40).map(|k| (k, k)));
    assert!(t.capacity() > 7);
    let before = t.modification_count();

    t.clear();
    assert!(t.is_empty());
    assert_eq!(t.capacity(), 7);
    assert_eq!(t.modification_count(), before + 1);
    assert_eq!(t.get(&3), None);
    t.put(3, 3);
    assert_eq!(t.get(&3), Some(&3));
}

#[test]
fn clone_is_independent() {
    let mut t: TsbHashTable<String, u32> = TsbHashTable::new();
    t.put("Drama".into(), 2);
    t.put("Comedy".into(), 5);
    t.remove("Comedy");

    let mut c = t.clone();
    assert_eq!(c, t);
    assert_eq!(c.capacity(), t.capacity());
    assert_eq!(c.modification_count(), 0);

    c.put("Action".into(), 7);
    assert_eq!(t.len(), 1);
    assert_eq!(c.len(), 2);
}

#[test]
fn display_lists_pairs() {
    let mut t: TsbHashTable<&str, u32> = TsbHashTable::new();
    assert_eq!(t.to_string(), "{\n}");
    t.put("Drama", 2);
    assert_eq!(t.to_string(), "{\n(Drama, 2),\n}");
    assert_eq!(format!("{t:?}"), "{\"Drama\": 2}");
}

#[test]
fn owned_iteration_yields_every_pair() {
    let t: TsbHashTable<u32, u32> = (0..10).map(|k| (k, k * k)).collect();
    let mut pairs: Vec<(u32, u32)> = t.into_iter().collect();
    pairs.sort();
    assert_eq!(pairs, (0..10).map(|k| (k, k * k)).collect::<Vec<_>>());
}

#[test]
fn iter_mut_updates_in_place() {
    let mut t: TsbHashTable<u32, u32> = (0..10).map(|k| (k, k)).collect();
    let before = t.modification_count();
    for (_, v) in &mut t {
        *v *= 2;
    }
    assert_eq!(t.modification_count(), before);
    assert!(t.iter().all(|(k, v)| *v == k * 2));
}

#[test]
fn associative_map_contract() {
    fn tally<M: AssociativeMap<&'static str, u32>>(m: &mut M, genres: &[&'static str]) {
        for g in genres {
            let n = m.get(g).copied().unwrap_or(0);
            m.put(*g, n + 1);
        }
    }

    let genres = ["Drama", "Comedy", "Drama", "Action", "Comedy", "Drama"];
    let mut t: TsbHashTable<&str, u32> = TsbHashTable::new();
    let mut h: hashbrown::HashMap<&str, u32> = hashbrown::HashMap::new();
    tally(&mut t, &genres);
    tally(&mut h, &genres);

    assert_eq!(t.size(), 3);
    assert_eq!(t.get("Drama"), Some(&3));
    assert!(t.map_eq(&h));
}
