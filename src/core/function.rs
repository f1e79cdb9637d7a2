//! Function address ranges.
//!
//! Compilers split hot/cold parts of one logical function into disjoint
//! address intervals. `FunctionRanges` holds those intervals in ascending
//! order; the range expander linearizes them into a single instruction
//! stream.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::Va;

/// Half-open `[start, end)` address interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRange {
    pub start: Va,
    pub end: Va,
}

impl AddressRange {
    /// Create a new range. `end` must not precede `start`.
    pub fn new(start: Va, end: Va) -> Self {
        debug_assert!(start <= end, "range end precedes start");
        Self { start, end }
    }

    /// Whether `va` falls inside this range.
    pub fn contains(&self, va: Va) -> bool {
        va >= self.start && va < self.end
    }

    /// Size of the range in bytes.
    pub fn size(&self) -> u64 {
        self.end - self.start
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#x}, {:#x})", self.start, self.end)
    }
}

/// Ordered, disjoint set of address ranges constituting one function's code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRanges {
    ranges: Vec<AddressRange>,
}

impl FunctionRanges {
    /// Build a range set. Ranges are sorted by start address; callers are
    /// expected to supply disjoint intervals.
    pub fn new(mut ranges: Vec<AddressRange>) -> Self {
        ranges.sort_by_key(|r| r.start);
        Self { ranges }
    }

    /// Ranges in ascending start order.
    pub fn iter(&self) -> impl Iterator<Item = &AddressRange> {
        self.ranges.iter()
    }

    /// Whether any range contains `va`.
    pub fn contains(&self, va: Va) -> bool {
        self.ranges.iter().any(|r| r.contains(va))
    }

    /// Number of ranges.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether the set holds no ranges.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
