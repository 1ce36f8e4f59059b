// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Probabilistic Data Structures (Sketches)
//!
//! These data structures provide approximate answers to queries (membership, frequency,
//! cardinality) using a fixed amount of memory chosen up front. Each one is an independent,
//! owned value; none of them call each other.

pub mod bloom_filter;
pub mod count_min_sketch;
pub mod hyperloglog;

pub use bloom_filter::BloomFilter;
pub use count_min_sketch::CountMinSketch;
pub use hyperloglog::HyperLogLog;
