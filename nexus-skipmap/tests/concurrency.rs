use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use nexus_skipmap::SkipMap;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const WRITERS: u64 = 4;
const READERS: u64 = 4;
const KEYS_PER_WRITER: u64 = 2_000;

fn value_for(key: u64) -> u64 {
    key.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[test]
fn disjoint_writers() {
    let map: SkipMap<u64, u64> = SkipMap::with_rng(SmallRng::seed_from_u64(1));

    thread::scope(|s| {
        for w in 0..WRITERS {
            let map = &map;
            s.spawn(move || {
                let base = w * KEYS_PER_WRITER;
                for k in base..base + KEYS_PER_WRITER {
                    assert_eq!(map.insert(k, value_for(k)), None);
                }
                for k in (base..base + KEYS_PER_WRITER).step_by(2) {
                    assert!(map.delete(&k));
                }
            });
        }
    });

    assert_eq!(map.len() as u64, WRITERS * KEYS_PER_WRITER / 2);
    let expected: Vec<u64> = (0..WRITERS * KEYS_PER_WRITER).filter(|k| k % 2 == 1).collect();
    assert_eq!(map.levels()[0], expected);
    assert!(map.verify().is_ok());
}

#[test]
fn readers_see_whole_values_during_writes() {
    let map: SkipMap<u64, u64> = SkipMap::with_rng(SmallRng::seed_from_u64(2));
    let total = WRITERS * KEYS_PER_WRITER;

    // Even keys stay put for the whole test.
    for k in (0..total).step_by(2) {
        map.insert(k, value_for(k));
    }

    let stop = AtomicBool::new(false);
    let reads = AtomicUsize::new(0);

    thread::scope(|s| {
        for r in 0..READERS {
            let (map, stop, reads) = (&map, &stop, &reads);
            s.spawn(move || {
                let mut rng = SmallRng::seed_from_u64(100 + r);
                let mut local = 0;
                while !stop.load(Ordering::Relaxed) {
                    let k = rng.random_range(0..total);
                    match map.get(&k) {
                        Some(v) => assert_eq!(v, value_for(k), "torn value for {k}"),
                        None => assert_eq!(k % 2, 1, "stable key {k} vanished"),
                    }
                    local += 1;
                }
                reads.fetch_add(local, Ordering::Relaxed);
            });
        }

        let writers: Vec<_> = (0..WRITERS)
            .map(|w| {
                let map = &map;
                s.spawn(move || {
                    let odd = (w * KEYS_PER_WRITER..(w + 1) * KEYS_PER_WRITER).filter(|k| k % 2 == 1);
                    for round in 0..3 {
                        for k in odd.clone() {
                            map.insert(k, value_for(k));
                        }
                        if round < 2 {
                            for k in odd.clone() {
                                assert!(map.delete(&k));
                            }
                        }
                    }
                })
            })
            .collect();

        for handle in writers {
            handle.join().unwrap();
        }
        stop.store(true, Ordering::Relaxed);
    });

    assert!(reads.load(Ordering::Relaxed) > 0);
    assert_eq!(map.len() as u64, total);
    for k in 0..total {
        assert_eq!(map.get(&k), Some(value_for(k)));
    }
    assert!(map.verify().is_ok());
}

#[test]
fn mixed_workload_keeps_invariants() {
    let map: SkipMap<u64, u64> = SkipMap::with_rng(SmallRng::seed_from_u64(3));

    thread::scope(|s| {
        for t in 0..8u64 {
            let map = &map;
            s.spawn(move || {
                let mut rng = SmallRng::seed_from_u64(t);
                for _ in 0..10_000 {
                    let k = rng.random_range(0..512);
                    match rng.random_range(0..10) {
                        0..=5 => {
                            if let Some(v) = map.get(&k) {
                                assert_eq!(v, value_for(k));
                            }
                        }
                        6..=8 => {
                            map.insert(k, value_for(k));
                        }
                        _ => {
                            map.delete(&k);
                        }
                    }
                }
            });
        }
    });

    assert!(map.verify().is_ok());
    let keys = &map.levels()[0];
    assert_eq!(keys.len(), map.len());
    assert!(map.allocated() <= 512);
}

#[test]
fn concurrent_readers_without_writers() {
    let map: SkipMap<u64, u64> = SkipMap::with_rng(SmallRng::seed_from_u64(4));
    for k in 0..10_000 {
        map.insert(k, value_for(k));
    }

    thread::scope(|s| {
        for r in 0..8u64 {
            let map = &map;
            s.spawn(move || {
                for k in (r..10_000).step_by(8) {
                    assert_eq!(map.get(&k), Some(value_for(k)));
                    assert!(map.contains_key(&k));
                }
                assert_eq!(map.len(), 10_000);
            });
        }
    });

    assert!(map.verify().is_ok());
}
