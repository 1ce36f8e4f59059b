// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use approx_sketches::*;
use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::thread;

#[test]
fn test_bloom_filter() {
    let mut filter = BloomFilter::<str>::new(100);
    filter.insert("apple").unwrap();
    filter.insert("banana").unwrap();

    assert!(filter.search("apple").unwrap());
    assert!(filter.search("banana").unwrap());
    assert_eq!(filter.kind(), SketchKind::BloomFilter);
    assert!(!filter.is_empty());
}

#[test]
fn test_count_min_sketch() {
    let mut cms = CountMinSketch::<str>::new(10, 5);
    cms.insert("apple");
    cms.insert("apple");
    cms.insert("banana");

    assert!(cms.query("apple") >= 2);
    assert!(cms.query("banana") >= 1);
    assert_eq!(cms.kind(), SketchKind::CountMinSketch);
}

#[test]
fn test_hyperloglog() {
    let mut hll = HyperLogLog::<str>::new();
    hll.add("user1");
    hll.add("user2");
    hll.add("user3");
    hll.add("user1"); // Duplicate

    let count = hll.cardinality();
    assert!((2..=4).contains(&count));
    assert_eq!(hll.kind(), SketchKind::HyperLogLog);
}

/// Custom `Hash` that ignores `label`.
#[derive(Debug, Serialize)]
struct Tagged {
    id: u32,
    label: String,
}

impl Hash for Tagged {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[test]
fn test_hashing_strategies_differ() {
    let a = Tagged {
        id: 1,
        label: "first".into(),
    };
    let b = Tagged {
        id: 1,
        label: "second".into(),
    };

    // Same identity hash, so the frequency sketch cannot tell them apart.
    let mut cms = CountMinSketch::new(1000, 3);
    cms.insert(&a);
    assert_eq!(cms.query(&b), 1);

    // Different serialized content, so the filter can.
    let mut filter = BloomFilter::with_size(100_000, 3);
    filter.insert(&a).unwrap();
    assert!(filter.search(&a).unwrap());
    assert!(!filter.search(&b).unwrap());
}

#[test]
fn test_independent_filters_find_all_items() {
    let mut first = BloomFilter::<u64>::with_size(1 << 16, 4);
    let mut second = BloomFilter::<u64>::with_size(1 << 16, 4);
    for i in 0..100u64 {
        first.insert(&i).unwrap();
        second.insert(&i).unwrap();
    }
    for i in 0..100u64 {
        assert!(first.search(&i).unwrap() && second.search(&i).unwrap());
    }
}

#[test]
fn test_snapshot_and_merge_across_threads() {
    let shards: Vec<HyperLogLog<u32>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4u32)
            .map(|shard| {
                scope.spawn(move || {
                    let mut hll = HyperLogLog::new();
                    for i in 0..1_000 {
                        hll.add(&(shard * 1_000 + i));
                    }
                    hll
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let merged = HyperLogLog::merge_all(&shards);
    let estimate = merged.cardinality() as f64;
    assert!((estimate - 4_000.0).abs() / 4_000.0 < 0.05);
}

#[test]
fn test_externally_synchronized_counter() {
    let sketch = Mutex::new(CountMinSketch::<u32>::new(128, 3));
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for i in 0..250u32 {
                    sketch.lock().unwrap().insert(&(i % 10));
                }
            });
        }
    });

    let sketch = sketch.into_inner().unwrap();
    assert_eq!(sketch.total(), 1_000);
    for i in 0..10u32 {
        assert!(sketch.query(&i) >= 100);
    }
}
