// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::traits::SketchError;
use std::fmt;
use std::str::FromStr;

/// Enumeration of the supported sketch types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SketchKind {
    BloomFilter,
    CountMinSketch,
    HyperLogLog,
}

impl fmt::Display for SketchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchKind::BloomFilter => write!(f, "BloomFilter"),
            SketchKind::CountMinSketch => write!(f, "CountMinSketch"),
            SketchKind::HyperLogLog => write!(f, "HyperLogLog"),
        }
    }
}

impl FromStr for SketchKind {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace(['_', '-'], "").to_lowercase().as_str() {
            "bloomfilter" | "bloom" => Ok(SketchKind::BloomFilter),
            "countminsketch" | "cms" => Ok(SketchKind::CountMinSketch),
            "hyperloglog" | "hll" => Ok(SketchKind::HyperLogLog),
            _ => Err(SketchError::InvalidInput(format!("Unknown sketch type: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_from_str() {
        for kind in [
            SketchKind::BloomFilter,
            SketchKind::CountMinSketch,
            SketchKind::HyperLogLog,
        ] {
            assert_eq!(kind.to_string().parse::<SketchKind>().unwrap(), kind);
        }
    }

    #[test]
    fn from_str_accepts_short_and_snake_case_names() {
        assert_eq!("hll".parse::<SketchKind>().unwrap(), SketchKind::HyperLogLog);
        assert_eq!(
            "count_min_sketch".parse::<SketchKind>().unwrap(),
            SketchKind::CountMinSketch
        );
        assert_eq!("Bloom-Filter".parse::<SketchKind>().unwrap(), SketchKind::BloomFilter);
        assert!("quotient_filter".parse::<SketchKind>().is_err());
    }
}
