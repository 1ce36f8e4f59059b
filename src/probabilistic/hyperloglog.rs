// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::enums::SketchKind;
use crate::hashing::identity_hash;
use crate::traits::{Sketch, SketchError};
use roaring::RoaringBitmap;
use std::hash::Hash;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// Precision (number of bits for register index)
pub const PRECISION: u32 = 16;

/// Number of registers (2^16 = 65,536)
pub const NUM_REGISTERS: usize = 1 << PRECISION;

/// Bias correction constant. Fixed, not derived from `NUM_REGISTERS`.
pub const ALPHA: f64 = 0.673;

/// HyperLogLog - Cardinality Estimation
///
/// A probabilistic data structure for estimating the number of unique elements (cardinality)
/// in a stream. It uses significantly less memory than storing the elements themselves.
///
/// # Key Properties
///
/// - **Fixed Memory**: 65,536 one-byte registers plus a compressed set of touched registers.
/// - **Mergeable**: [`HyperLogLog::merge`] takes the element-wise maximum of the registers and
///   the union of the touched sets. Merging is commutative, associative and idempotent.
/// - **Idempotent**: Adding the same element multiple times does not change the estimate.
///
/// # Estimator
///
/// An item's 32-bit identity hash `h` picks a register from its top [`PRECISION`]
/// significant bits and contributes the position of its lowest set bit as the rank. The
/// estimate is `ceil(ALPHA * t * t / z)` where `t` counts touched registers and `z` sums
/// `2^-rank` over them. This is not the estimator from the HyperLogLog paper (which counts
/// leading zeros and scales by the full register count); the two are not interchangeable.
///
/// # Example
///
/// ```
/// use approx_sketches::HyperLogLog;
///
/// let mut hll = HyperLogLog::new();
/// for i in 1..=1000u32 {
///     hll.add(&i);
/// }
///
/// let count = hll.cardinality();
/// assert!(count >= 950 && count <= 1050);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HyperLogLog<T: ?Sized> {
    /// Maximum observed rank per register
    registers: Vec<u8>,
    /// Indices of registers that have seen at least one item
    touched: RoaringBitmap,
    _item: PhantomData<fn(&T)>,
}

impl<T: Hash + ?Sized> Default for HyperLogLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + ?Sized> HyperLogLog<T> {
    /// Create a new empty HyperLogLog
    pub fn new() -> Self {
        debug!(
            kind = %SketchKind::HyperLogLog,
            precision = PRECISION,
            registers = NUM_REGISTERS,
            "created sketch"
        );
        Self {
            registers: vec![0u8; NUM_REGISTERS],
            touched: RoaringBitmap::new(),
            _item: PhantomData,
        }
    }

    /// Add an element to the HyperLogLog
    ///
    /// Returns `true` if the internal state changed.
    pub fn add(&mut self, item: &T) -> bool {
        let hash = identity_hash(item);
        let idx = register_index(hash);
        let rank = rank(hash);

        let newly_touched = self.touched.insert(idx as u32);
        if rank > self.registers[idx] {
            self.registers[idx] = rank;
            true
        } else {
            newly_touched
        }
    }

    /// Estimate the number of distinct elements added.
    pub fn cardinality(&self) -> u64 {
        let touched = self.touched.len();
        if touched == 0 {
            return 0;
        }

        let z: f64 = self
            .touched
            .iter()
            .map(|idx| 2f64.powi(-(self.registers[idx as usize] as i32)))
            .sum();
        let t = touched as f64;
        (ALPHA * t * (t / z)).ceil() as u64
    }

    /// Returns a new estimator for the union of both input streams. Neither input changes.
    pub fn merge(first: &Self, second: &Self) -> Self {
        let registers = first
            .registers
            .iter()
            .zip(&second.registers)
            .map(|(&a, &b)| a.max(b))
            .collect();
        let touched = &first.touched | &second.touched;

        trace!(
            kind = %SketchKind::HyperLogLog,
            touched = touched.len(),
            "merged sketches"
        );

        Self {
            registers,
            touched,
            _item: PhantomData,
        }
    }

    /// Merges any number of estimators. An empty input yields an empty estimator.
    pub fn merge_all<'a, I>(sketches: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
        T: 'a,
    {
        sketches
            .into_iter()
            .fold(Self::new(), |acc, sketch| Self::merge(&acc, sketch))
    }
}

impl<T: ?Sized> HyperLogLog<T> {
    /// Raw register values.
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Number of registers that have seen at least one item.
    pub fn touched_registers(&self) -> u64 {
        self.touched.len()
    }

    /// Textbook relative standard error `1.04 / sqrt(m)` for this register count.
    pub fn standard_error(&self) -> f64 {
        1.04 / (NUM_REGISTERS as f64).sqrt()
    }
}

/// Top `PRECISION` significant bits of the hash; all of it if it is shorter.
fn register_index(hash: u32) -> usize {
    let significant = u32::BITS - hash.leading_zeros();
    if significant <= PRECISION {
        hash as usize
    } else {
        (hash >> (significant - PRECISION)) as usize
    }
}

/// Position of the lowest set bit, isolated as `h ^ (h & (h - 1))`. Zero has none; it still
/// touches its register but never raises it.
fn rank(hash: u32) -> u8 {
    let lowest = hash ^ (hash & hash.wrapping_sub(1));
    lowest.checked_ilog2().unwrap_or(0) as u8
}

impl<T: ?Sized> Sketch for HyperLogLog<T> {
    fn kind(&self) -> SketchKind {
        SketchKind::HyperLogLog
    }

    fn validate(&self) -> Result<(), SketchError> {
        if self.registers.len() != NUM_REGISTERS {
            return Err(SketchError::Validation(format!(
                "Invalid register count: expected {}, got {}",
                NUM_REGISTERS,
                self.registers.len()
            )));
        }
        if let Some(max) = self.touched.max() {
            if max as usize >= NUM_REGISTERS {
                return Err(SketchError::Validation(format!(
                    "Touched register {} out of range",
                    max
                )));
            }
        }
        for (idx, &value) in self.registers.iter().enumerate() {
            if value as u32 >= u32::BITS {
                return Err(SketchError::Validation(format!(
                    "Register {} holds impossible rank {}",
                    idx, value
                )));
            }
            if value != 0 && !self.touched.contains(idx as u32) {
                return Err(SketchError::Validation(format!(
                    "Register {} is set but not marked as touched",
                    idx
                )));
            }
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hashes_index_themselves() {
        assert_eq!(register_index(0), 0);
        assert_eq!(register_index(12_345), 12_345);
        assert_eq!(register_index(0xFFFF), 0xFFFF);
    }

    #[test]
    fn long_hashes_index_by_leading_bits() {
        assert_eq!(register_index(0x1_0000), 0x8000);
        assert_eq!(register_index(0x1_0001), 0x8000);
        assert_eq!(register_index(u32::MAX), 0xFFFF);
        assert_eq!(register_index(0x8000_0000), 0x8000);
    }

    #[test]
    fn rank_is_lowest_set_bit() {
        assert_eq!(rank(1), 0);
        assert_eq!(rank(2), 1);
        assert_eq!(rank(12), 2);
        assert_eq!(rank(0x8000_0000), 31);
        assert_eq!(rank(0), 0);
    }

    #[test]
    fn add_reports_state_changes() {
        let mut hll = HyperLogLog::<u32>::new();
        assert!(hll.is_empty());
        assert!(hll.add(&4));
        assert!(!hll.add(&4));
        assert_eq!(hll.registers()[4], 2);
        assert_eq!(hll.touched_registers(), 1);
        hll.validate().unwrap();
    }

    #[test]
    fn odd_value_touches_register_with_rank_zero() {
        let mut hll = HyperLogLog::<u32>::new();
        assert!(hll.add(&3));
        assert_eq!(hll.registers()[3], 0);
        assert_eq!(hll.touched_registers(), 1);
        // t = 1, z = 2^0
        assert_eq!(hll.cardinality(), 1);
    }

    #[test]
    fn zero_hash_counts_as_one_item() {
        let mut hll = HyperLogLog::<i32>::new();
        assert!(hll.add(&0));
        assert_eq!(hll.registers()[0], 0);
        assert_eq!(hll.cardinality(), 1);

        for i in 1..10 {
            hll.add(&i);
        }
        let estimate = hll.cardinality();
        assert!((8..=14).contains(&estimate), "estimate {}", estimate);
        hll.validate().unwrap();
    }

    #[test]
    fn validate_rejects_rank_past_top_bit() {
        let mut hll = HyperLogLog::<u32>::new();
        hll.add(&1);
        hll.registers[1] = 32;
        assert!(matches!(hll.validate(), Err(SketchError::Validation(_))));
    }

    #[test]
    fn empty_estimator_counts_zero() {
        let hll = HyperLogLog::<str>::new();
        assert_eq!(hll.cardinality(), 0);
    }

    #[test]
    fn cardinality_follows_touched_register_formula() {
        let mut hll = HyperLogLog::<u32>::new();
        hll.add(&1); // rank 0
        hll.add(&2); // rank 1
        hll.add(&4); // rank 2
        let z = 1.0 + 0.5 + 0.25;
        let expected = (ALPHA * 3.0 * (3.0 / z)).ceil() as u64;
        assert_eq!(hll.cardinality(), expected);
    }

    #[test]
    fn merge_leaves_inputs_untouched() {
        let mut a = HyperLogLog::<u32>::new();
        let mut b = HyperLogLog::<u32>::new();
        a.add(&8);
        b.add(&8);
        b.add(&16);
        let a_before = a.clone();
        let b_before = b.clone();

        let merged = HyperLogLog::merge(&a, &b);
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
        assert_eq!(merged.touched_registers(), 2);
        assert_eq!(merged.registers()[16], 4);
        merged.validate().unwrap();
    }

    #[test]
    fn merge_all_of_nothing_is_empty() {
        let merged = HyperLogLog::<u32>::merge_all(std::iter::empty());
        assert!(merged.is_empty());
    }

    #[test]
    fn validate_catches_untracked_register() {
        let mut hll = HyperLogLog::<u32>::new();
        hll.registers[10] = 3;
        assert!(matches!(hll.validate(), Err(SketchError::Validation(_))));
    }

    #[test]
    fn standard_error_for_sixteen_bits() {
        let hll = HyperLogLog::<u32>::new();
        assert!((hll.standard_error() - 0.0040625).abs() < 1e-12);
    }
}
