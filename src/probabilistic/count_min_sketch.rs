// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::enums::SketchKind;
use crate::hashing::identity_hash;
use crate::traits::{Sketch, SketchError};
use std::f64::consts::E;
use std::hash::Hash;
use std::marker::PhantomData;
use tracing::debug;

/// Count-Min Sketch - Frequency Estimation
///
/// A probabilistic data structure for estimating the frequency of events in a stream of data.
/// It uses a matrix of counters; each row maps an item to one counter.
///
/// # Key Properties
///
/// - **Fixed Memory**: Uses a fixed size matrix (`width` × `num_hashes` × 8 bytes), regardless of the number of unique items.
/// - **Conservative**: Frequencies are never underestimated, but may be overestimated due to collisions.
/// - **Single Seed**: Every row is addressed from the same 32-bit identity hash, scaled by
///   `row + 1`. Rows are not independent hash functions, so collisions in one row tend to
///   repeat in others.
///
/// # Example
///
/// ```
/// use approx_sketches::CountMinSketch;
///
/// let mut cms = CountMinSketch::new(100, 5);
/// cms.insert("apple");
/// cms.insert("apple");
/// cms.insert("banana");
///
/// assert!(cms.query("apple") >= 2);
/// assert!(cms.query("banana") >= 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMinSketch<T: ?Sized> {
    /// Number of counters per row
    width: usize,
    /// Number of rows
    num_hashes: usize,
    /// The matrix of counters, row-major
    matrix: Vec<Vec<u64>>,
    /// Total number of insertions
    total: u64,
    _item: PhantomData<fn(&T)>,
}

impl<T: Hash + ?Sized> CountMinSketch<T> {
    /// Creates a sketch with explicit dimensions.
    ///
    /// # Panics
    ///
    /// A `width` of zero is accepted here but panics on the first insert or query.
    pub fn new(width: usize, num_hashes: usize) -> Self {
        debug!(
            kind = %SketchKind::CountMinSketch,
            width,
            num_hashes,
            "created sketch"
        );
        Self {
            width,
            num_hashes,
            matrix: vec![vec![0; width]; num_hashes],
            total: 0,
            _item: PhantomData,
        }
    }

    /// Creates a sketch from a target error rate `ε` and error probability `δ`:
    /// `width = ceil(e / ε)`, `num_hashes = ceil(ln(1 / δ))`.
    ///
    /// With probability at least `1 - δ`, a query overestimates by no more than
    /// `ε × total insertions`.
    pub fn with_error_bounds(error_rate: f64, error_prob: f64) -> Self {
        let width = (E / error_rate).ceil() as usize;
        let num_hashes = (1.0 / error_prob).ln().ceil() as usize;
        Self::new(width, num_hashes)
    }

    /// Checked variant of [`Self::new`].
    pub fn try_new(width: usize, num_hashes: usize) -> Result<Self, SketchError> {
        if width == 0 || num_hashes == 0 {
            return Err(SketchError::InvalidInput(format!(
                "CountMinSketch dimensions must be positive, got {} x {}",
                num_hashes, width
            )));
        }
        Ok(Self::new(width, num_hashes))
    }

    /// Checked variant of [`Self::with_error_bounds`]. Both arguments must lie in `(0, 1)`.
    pub fn try_with_error_bounds(error_rate: f64, error_prob: f64) -> Result<Self, SketchError> {
        for (name, value) in [("error rate", error_rate), ("error probability", error_prob)] {
            if !(value > 0.0 && value < 1.0) {
                return Err(SketchError::InvalidInput(format!(
                    "CountMinSketch {} must be in (0, 1), got {}",
                    name, value
                )));
            }
        }
        Ok(Self::with_error_bounds(error_rate, error_prob))
    }

    /// Records one occurrence of an item.
    pub fn insert(&mut self, item: &T) {
        let seed = identity_hash(item);
        for row in 0..self.num_hashes {
            let col = self.slot(row, seed);
            self.matrix[row][col] = self.matrix[row][col].saturating_add(1);
        }
        self.total = self.total.saturating_add(1);
    }

    /// Estimated number of times the item was inserted. Never below the true count.
    ///
    /// A sketch with no rows carries no information and answers `u64::MAX`.
    pub fn query(&self, item: &T) -> u64 {
        let seed = identity_hash(item);
        (0..self.num_hashes)
            .map(|row| self.matrix[row][self.slot(row, seed)])
            .min()
            .unwrap_or(u64::MAX)
    }

    fn slot(&self, row: usize, seed: u32) -> usize {
        ((row as u64 + 1) * seed as u64 % self.width as u64) as usize
    }
}

impl<T: ?Sized> CountMinSketch<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Total number of insertions.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Per-insertion overestimation factor `ε = e / width`.
    pub fn error_rate(&self) -> f64 {
        E / self.width as f64
    }

    /// Additive overestimation bound `ε × total` that holds with probability
    /// [`Self::confidence`].
    pub fn error_bound(&self) -> f64 {
        self.error_rate() * self.total as f64
    }

    /// Probability `1 - e^(-num_hashes)` that a query stays within [`Self::error_bound`].
    pub fn confidence(&self) -> f64 {
        1.0 - (-(self.num_hashes as f64)).exp()
    }
}

impl<T: ?Sized> Sketch for CountMinSketch<T> {
    fn kind(&self) -> SketchKind {
        SketchKind::CountMinSketch
    }

    fn validate(&self) -> Result<(), SketchError> {
        if self.matrix.len() != self.num_hashes {
            return Err(SketchError::Validation("Matrix depth mismatch".into()));
        }
        for row in &self.matrix {
            if row.len() != self.width {
                return Err(SketchError::Validation("Matrix width mismatch".into()));
            }
            // Every insertion lands exactly once per row.
            let row_sum = row.iter().fold(0u64, |acc, &x| acc.saturating_add(x));
            if row_sum != self.total {
                return Err(SketchError::Validation(format!(
                    "Row total {} does not match {} insertions",
                    row_sum, self.total
                )));
            }
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.total == 0
    }
}
