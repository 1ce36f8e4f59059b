// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Hashing Primitives
//!
//! The sketches in this crate deliberately hash items in two different ways:
//!
//! - **Structural hashing** ([`structural_bytes`] + [`Fnv1Hasher`]): the item is serialized
//!   with `bincode` and the resulting bytes are digested with 64-bit FNV-1. Only field content
//!   matters, so a custom `Hash` or `PartialEq` implementation on the item has no effect.
//!   Used by [`BloomFilter`](crate::BloomFilter).
//! - **Identity hashing** ([`identity_hash`]): the item's own `Hash` implementation is fed
//!   through [`IdentityHasher`], which keeps integers as-is and folds everything else into a
//!   32-bit value. Used by [`CountMinSketch`](crate::CountMinSketch) and
//!   [`HyperLogLog`](crate::HyperLogLog).
//!
//! Two values that compare equal under `Hash` but differ in serialized content are therefore
//! the same item to the frequency and cardinality sketches and different items to the filter.

use serde::Serialize;
use siphasher::sip::SipHasher13;
use std::hash::{Hash, Hasher};

use crate::traits::SketchError;

/// 64-bit FNV offset basis.
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// 64-bit FNV prime.
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Multiplier used to combine successive writes in [`IdentityHasher`].
const COMBINE_PRIME: u64 = 31;

/// Streaming 64-bit FNV-1 hasher (multiply, then xor).
///
/// Note this is FNV-1, not FNV-1a: the byte is mixed in *after* the multiplication.
#[derive(Debug, Clone, Copy)]
pub struct Fnv1Hasher {
    state: u64,
}

impl Default for Fnv1Hasher {
    fn default() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1Hasher {
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state = self.state.wrapping_mul(FNV_PRIME);
            self.state ^= byte as u64;
        }
    }

    fn finish(&self) -> u64 {
        self.state
    }
}

/// One-shot FNV-1 digest of a byte slice.
pub fn fnv1_64(bytes: &[u8]) -> u64 {
    let mut hasher = Fnv1Hasher::default();
    hasher.write(bytes);
    hasher.finish()
}

/// FNV-1 digest of `salt ‖ payload`, without materializing the concatenation.
pub fn salted_fnv1_64(salt: &[u8], payload: &[u8]) -> u64 {
    let mut hasher = Fnv1Hasher::default();
    hasher.write(salt);
    hasher.write(payload);
    hasher.finish()
}

/// Serializes an item into its canonical structural byte sequence.
pub fn structural_bytes<T: Serialize + ?Sized>(item: &T) -> Result<Vec<u8>, SketchError> {
    Ok(bincode::serialize(item)?)
}

/// Hasher that preserves integer identity.
///
/// The first integer written becomes the state verbatim; later writes are combined with a
/// multiply-add, so tuples and derived `Hash` impls still depend on every field. Raw byte
/// writes (strings, byte slices) are folded to 64 bits with SipHash-1-3 under a fixed key
/// before combining, which keeps results stable across runs and processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHasher {
    state: u64,
    written: bool,
}

impl IdentityHasher {
    fn combine(&mut self, value: u64) {
        if self.written {
            self.state = self.state.wrapping_mul(COMBINE_PRIME).wrapping_add(value);
        } else {
            self.state = value;
            self.written = true;
        }
    }
}

impl Hasher for IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        let mut sip = SipHasher13::new();
        sip.write(bytes);
        self.combine(sip.finish());
    }

    fn write_u8(&mut self, i: u8) {
        self.combine(i as u64);
    }

    fn write_u16(&mut self, i: u16) {
        self.combine(i as u64);
    }

    fn write_u32(&mut self, i: u32) {
        self.combine(i as u64);
    }

    fn write_u64(&mut self, i: u64) {
        self.combine(i);
    }

    fn write_usize(&mut self, i: usize) {
        self.combine(i as u64);
    }

    // Signed integers keep their two's complement bit pattern at their own width, so
    // -1i32 hashes to 0xFFFF_FFFF rather than a sign-extended 64-bit value.
    fn write_i8(&mut self, i: i8) {
        self.combine(i as u8 as u64);
    }

    fn write_i16(&mut self, i: i16) {
        self.combine(i as u16 as u64);
    }

    fn write_i32(&mut self, i: i32) {
        self.combine(i as u32 as u64);
    }

    fn write_i64(&mut self, i: i64) {
        self.combine(i as u64);
    }

    fn write_isize(&mut self, i: isize) {
        self.combine(i as usize as u64);
    }

    fn finish(&self) -> u64 {
        self.state
    }
}

/// The item's 32-bit identity hash.
///
/// 32-bit and narrower integers hash to themselves; wider values are folded by xoring the
/// high and low halves.
pub fn identity_hash<T: Hash + ?Sized>(item: &T) -> u32 {
    let mut hasher = IdentityHasher::default();
    item.hash(&mut hasher);
    let wide = hasher.finish();
    (wide as u32) ^ ((wide >> 32) as u32)
}
