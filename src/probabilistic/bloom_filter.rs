// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::enums::SketchKind;
use crate::hashing::{salted_fnv1_64, structural_bytes};
use crate::traits::{Sketch, SketchError};
use rand::Rng;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::debug;

/// Bits of filter allocated per expected element.
pub const BITS_PER_ELEMENT: u32 = 8;

/// Approximation of `ln 2` used when deriving the number of hash rounds.
const LN_2_APPROX: f64 = 0.693;

/// Width of each per-round salt.
pub const SALT_LEN: usize = 4;

/// Bloom Filter - Approximate Set Membership
///
/// An append-only bit array probed by `k` salted hash rounds. Items are hashed by their
/// serialized content (see [`crate::hashing`]), so two values with the same fields are the
/// same item to the filter regardless of how they implement `Hash` or `PartialEq`.
///
/// # Key Properties
///
/// - **No False Negatives**: Every inserted item is always reported as present.
/// - **False Positives**: Items never inserted may be reported as present; the rate grows
///   with the number of insertions relative to `size_bits`.
/// - **Append-only**: Bits are set, never cleared. There is no delete.
/// - **Not Reproducible**: Salts are drawn from an unseeded generator, so two filters built
///   with the same parameters and inputs do not share a bit layout.
///
/// # Example
///
/// ```
/// use approx_sketches::BloomFilter;
///
/// let mut filter = BloomFilter::<String>::new(1000);
/// filter.insert(&"apple".to_string()).unwrap();
///
/// assert!(filter.search(&"apple".to_string()).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct BloomFilter<T: ?Sized> {
    /// Bit `i` lives in byte `i / 8` under mask `1 << (i % 8)`
    filter: Vec<u8>,
    size_bits: u32,
    /// One salt per hash round
    salts: Vec<[u8; SALT_LEN]>,
    insert_count: u64,
    _item: PhantomData<fn(&T)>,
}

impl<T: Serialize + ?Sized> BloomFilter<T> {
    /// Creates a filter sized for `expected_num_elements` items.
    ///
    /// The filter gets [`BITS_PER_ELEMENT`] bits per expected element. The number of hash
    /// rounds comes from [`Self::optimal_parameters`], where the element count cancels out
    /// and every non-zero count yields 6 rounds.
    ///
    /// No validation happens here: a zero count gives a filter with no bits and no hash
    /// rounds, which reports every item as present. Use [`Self::try_new`] to reject it.
    pub fn new(expected_num_elements: u32) -> Self {
        let (size_bits, num_hashes) = Self::optimal_parameters(expected_num_elements);
        let filter = vec![0u8; expected_num_elements as usize];
        Self::from_parts(filter, size_bits, num_hashes)
    }

    /// Creates a filter with an explicit size in bits and number of hash rounds.
    ///
    /// # Panics
    ///
    /// A `size_bits` of zero is accepted here but panics on the first insert or search
    /// when a slot is reduced modulo the size.
    pub fn with_size(size_bits: u32, num_hashes: u32) -> Self {
        let filter = vec![0u8; size_bits as usize / 8 + 1];
        Self::from_parts(filter, size_bits, num_hashes)
    }

    /// Checked variant of [`Self::new`].
    pub fn try_new(expected_num_elements: u32) -> Result<Self, SketchError> {
        if expected_num_elements == 0 {
            return Err(SketchError::InvalidInput(
                "BloomFilter expected element count must be positive".into(),
            ));
        }
        if expected_num_elements > u32::MAX / BITS_PER_ELEMENT {
            return Err(SketchError::InvalidInput(format!(
                "BloomFilter expected element count {} overflows a 32-bit bit index",
                expected_num_elements
            )));
        }
        Ok(Self::new(expected_num_elements))
    }

    /// Checked variant of [`Self::with_size`].
    pub fn try_with_size(size_bits: u32, num_hashes: u32) -> Result<Self, SketchError> {
        if size_bits == 0 {
            return Err(SketchError::InvalidInput(
                "BloomFilter size in bits must be positive".into(),
            ));
        }
        if num_hashes == 0 {
            return Err(SketchError::InvalidInput(
                "BloomFilter needs at least one hash round".into(),
            ));
        }
        Ok(Self::with_size(size_bits, num_hashes))
    }

    /// Returns `(size_bits, num_hashes)` for an expected element count.
    ///
    /// `k = ceil(ln2 * (m / n))` with `m = 8n`, so `n` cancels and `k` is constant.
    pub fn optimal_parameters(expected_num_elements: u32) -> (u32, u32) {
        let n = expected_num_elements as f64;
        let num_hashes = (LN_2_APPROX * BITS_PER_ELEMENT as f64 * n / n).ceil() as u32;
        let size_bits = expected_num_elements.saturating_mul(BITS_PER_ELEMENT);
        (size_bits, num_hashes)
    }

    fn from_parts(filter: Vec<u8>, size_bits: u32, num_hashes: u32) -> Self {
        let mut rng = rand::rng();
        let salts = (0..num_hashes)
            .map(|_| rng.random::<u32>().to_le_bytes())
            .collect();

        debug!(
            kind = %SketchKind::BloomFilter,
            size_bits,
            num_hashes,
            bytes = filter.len(),
            "created sketch"
        );

        Self {
            filter,
            size_bits,
            salts,
            insert_count: 0,
            _item: PhantomData,
        }
    }

    /// Marks an item as present.
    ///
    /// Fails only if the item cannot be serialized.
    pub fn insert(&mut self, item: &T) -> Result<(), SketchError> {
        for slot in self.slots(item)? {
            self.filter[slot / 8] |= 1 << (slot % 8);
        }
        self.insert_count += 1;
        Ok(())
    }

    /// Returns `true` if the item was possibly inserted, `false` if it definitely was not.
    pub fn search(&self, item: &T) -> Result<bool, SketchError> {
        Ok(self
            .slots(item)?
            .into_iter()
            .all(|slot| self.filter[slot / 8] & (1 << (slot % 8)) != 0))
    }

    /// Bit index for every hash round.
    fn slots(&self, item: &T) -> Result<Vec<usize>, SketchError> {
        let bytes = structural_bytes(item)?;
        let size_bits = self.size_bits as u64;
        Ok(self
            .salts
            .iter()
            .map(|salt| (salted_fnv1_64(salt, &bytes) % size_bits) as usize)
            .collect())
    }
}

impl<T: ?Sized> BloomFilter<T> {
    /// Number of addressable bits.
    pub fn size_bits(&self) -> u32 {
        self.size_bits
    }

    /// Number of hash rounds (`k`).
    pub fn num_hashes(&self) -> u32 {
        self.salts.len() as u32
    }

    /// Number of `insert` calls so far, duplicates included.
    pub fn insert_count(&self) -> u64 {
        self.insert_count
    }

    /// Number of bits currently set.
    pub fn bits_set(&self) -> u64 {
        self.filter.iter().map(|b| b.count_ones() as u64).sum()
    }

    /// Expected false-positive probability after the inserts seen so far:
    /// `(1 - e^(-k·n/m))^k`.
    ///
    /// Duplicate inserts count towards `n`, so this is an upper estimate when items repeat.
    pub fn expected_false_positive_rate(&self) -> f64 {
        if self.size_bits == 0 {
            return 1.0;
        }
        let k = self.salts.len() as f64;
        let n = self.insert_count as f64;
        let m = self.size_bits as f64;
        (1.0 - (-k * n / m).exp()).powf(k)
    }
}

impl<T: ?Sized> Sketch for BloomFilter<T> {
    fn kind(&self) -> SketchKind {
        SketchKind::BloomFilter
    }

    fn validate(&self) -> Result<(), SketchError> {
        let capacity = self.filter.len() as u64 * 8;
        if capacity < self.size_bits as u64 {
            return Err(SketchError::Validation(format!(
                "{}: {} bytes cannot hold {} bits",
                self.kind(),
                self.filter.len(),
                self.size_bits
            )));
        }
        // Bits at or past size_bits are unreachable and must stay clear.
        for bit in self.size_bits as u64..capacity {
            let bit = bit as usize;
            if self.filter[bit / 8] & (1 << (bit % 8)) != 0 {
                return Err(SketchError::Validation(format!(
                    "{}: bit {} set beyond size {}",
                    self.kind(),
                    bit,
                    self.size_bits
                )));
            }
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.insert_count == 0
    }
}
