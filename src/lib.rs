//! # approx-sketches
//!
//! Probabilistic approximate data structures: a Bloom filter for set membership, a
//! Count-Min sketch for frequency counting and a HyperLogLog estimator for distinct counts.
//!
//! All three trade exactness for a fixed memory footprint. Answers err in one direction
//! only: the filter may report false positives but never false negatives, and the sketch
//! may overestimate a count but never underestimate it.
//!
//! None of the structures lock internally. Mutation takes `&mut self`; wrap a sketch in a
//! `Mutex` to share it, or keep one HyperLogLog per thread and combine them with
//! [`HyperLogLog::merge`].

pub mod enums;
pub mod hashing;
pub mod probabilistic;
pub mod traits;

// Re-export core traits
pub use traits::{Sketch, SketchError};

pub use enums::SketchKind;
pub use probabilistic::{BloomFilter, CountMinSketch, HyperLogLog};
