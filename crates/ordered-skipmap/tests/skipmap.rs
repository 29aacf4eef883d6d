#![allow(unused_crate_dependencies, reason = "These are tests, not the main crate.")]

use std::collections::BTreeMap;

use oorandom::Rand32;
use proptest::prelude::*;

use ordered_skiplist::{OrdComparator, SkiplistConfig};
use ordered_skipmap::SkipMap;


#[test]
fn empty_map() {
    let map: SkipMap<u32, u32> = SkipMap::new();

    assert!(map.is_empty());
    assert_eq!(map.get(&0), None);
    assert_eq!(map.first(), None);
    assert!(map.iter().next().is_none());

    let _check_that_debug_works = format!("{map:?}");
}

#[test]
fn custom_key_order() {
    let mut map = SkipMap::new_seeded(|lhs: &i32, rhs: &i32| rhs.cmp(lhs), 2);
    map.extend([(1, "one"), (3, "three"), (2, "two")]);

    assert!(map.keys().eq(&[3, 2, 1]));
    assert_eq!(map.remove(&3), Some("three"));
    assert_eq!(map.first(), Some((&2, &"two")));
}

#[test]
fn values_can_be_changed_in_place() {
    let mut map = SkipMap::new_seeded(OrdComparator, 5);
    map.insert("counter", 0);

    for _ in 0..10 {
        if let Some(count) = map.get_mut(&"counter") {
            *count += 1;
        }
    }

    assert_eq!(map.get(&"counter"), Some(&10));
    assert_eq!(map.len(), 1);
}

#[test]
fn owned_iteration() {
    let mut map = SkipMap::new_seeded(OrdComparator, 3);
    map.insert(String::from("b"), vec![2]);
    map.insert(String::from("a"), vec![1]);

    let mut iter = map.clone().into_iter();
    assert_eq!(iter.len(), 2);
    assert_eq!(iter.next(), Some((String::from("a"), vec![1])));
    assert_eq!(iter.next(), Some((String::from("b"), vec![2])));
    assert_eq!(iter.next(), None);

    assert_eq!(map.remove_entry(&String::from("a")), Some((String::from("a"), vec![1])));
    map.clear();
    assert!(map.is_empty());
}

#[test]
fn invalid_config() {
    let config = SkiplistConfig::new().with_level_probability(0.0);
    assert!(SkipMap::<u8, u8>::with_config(OrdComparator, config).is_err());
}

#[test]
fn many_operations_match_btree_map() {
    let mut prng = Rand32::new(0x_dead_beef);
    let config = SkiplistConfig::new().with_max_level(10).with_seed(1);
    let mut map = SkipMap::with_config(OrdComparator, config).unwrap();
    let mut model = BTreeMap::new();

    for step in 0..4096_u32 {
        let key = prng.rand_range(0..512);

        match prng.rand_range(0..4) {
            0 => assert_eq!(map.remove(&key), model.remove(&key)),
            1 => assert_eq!(map.get(&key), model.get(&key)),
            _ => assert_eq!(map.insert(key, step), model.insert(key, step)),
        }
    }

    assert_eq!(map.len(), model.len());
    assert!(map.iter().eq(model.iter()));
    assert!(map.keys().eq(model.keys()));
    assert!(map.values().eq(model.values()));
}

proptest! {
    #[test]
    fn round_trip(seed in any::<u64>(), entries in prop::collection::vec((any::<u8>(), any::<u16>()), 0..200)) {
        let mut map = SkipMap::new_seeded(OrdComparator, seed);
        let mut model = BTreeMap::new();

        for (key, value) in entries {
            prop_assert_eq!(map.insert(key, value), model.insert(key, value));
            prop_assert_eq!(map.get(&key), Some(&value));
        }

        prop_assert!(map.into_iter().eq(model));
    }
}
