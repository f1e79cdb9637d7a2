//! Host environment the pipeline queries.
//!
//! The pipeline never touches a live image directly: symbol resolution,
//! byte scanning, function-range lookup, and single-instruction decoding
//! all go through [`AnalysisHost`]. Threading the host through every call
//! keeps each stage a pure query and lets tests substitute synthetic
//! fixtures for the real analysis backend.

use std::cell::Cell;
use std::collections::HashMap;

use crate::core::signature::window_matches;
use crate::core::{AddressRange, FunctionRanges, Instruction, SigByte, Va};
use crate::error::{Error, Result};

/// Read-only view over an already-loaded binary image and its metadata.
///
/// All methods are pure queries; the underlying snapshot is treated as
/// append-only for the duration of a run.
pub trait AnalysisHost {
    /// Base address the module image is loaded at.
    fn image_base(&self) -> Va;

    /// Resolve a symbol name relative to the module base.
    fn resolve_symbol(&self, name: &str) -> Option<Va>;

    /// Scan the image for the first (lowest-address) window at or after
    /// `from` matching `pattern`; wildcard tokens match any byte.
    fn scan_bytes(&self, pattern: &[SigByte], from: Va) -> Option<Va>;

    /// Address ranges of the function owning `va`.
    ///
    /// `InvalidAddress` if no function owns `va`; `RangeResolution` if the
    /// owning function's ranges cannot be produced.
    fn function_ranges(&self, va: Va) -> Result<FunctionRanges>;

    /// Decode the single instruction at `va`, returning it together with
    /// its encoded length as reported by the decoder.
    fn decode_one(&self, va: Va) -> Result<(Instruction, i64)>;
}

/// Synthetic in-memory host backed by fixture data.
///
/// Used by the unit and integration tests in place of a live analysis
/// backend: a byte image, a symbol map, a function table, and canned
/// decode results keyed by address. Also counts `scan_bytes` invocations
/// so tests can assert the symbol-beats-signature policy.
#[derive(Debug, Default)]
pub struct FixtureHost {
    base: Va,
    image: Vec<u8>,
    symbols: HashMap<String, Va>,
    functions: Vec<FunctionRanges>,
    unresolvable: Vec<AddressRange>,
    decoded: HashMap<Va, (Instruction, i64)>,
    scan_calls: Cell<usize>,
}

impl FixtureHost {
    /// Create a host over `image` loaded at `base`.
    pub fn new(base: Va, image: Vec<u8>) -> Self {
        Self {
            base,
            image,
            ..Self::default()
        }
    }

    /// Register a symbol.
    pub fn with_symbol(mut self, name: &str, va: Va) -> Self {
        self.symbols.insert(name.to_string(), va);
        self
    }

    /// Register a function by its range set.
    pub fn with_function(mut self, ranges: FunctionRanges) -> Self {
        self.functions.push(ranges);
        self
    }

    /// Register a span whose owning function exists but whose ranges
    /// cannot be produced.
    pub fn with_unresolvable(mut self, span: AddressRange) -> Self {
        self.unresolvable.push(span);
        self
    }

    /// Register a canned decode result at the instruction's address.
    pub fn with_instruction(mut self, insn: Instruction, len: i64) -> Self {
        self.decoded.insert(insn.va, (insn, len));
        self
    }

    /// Number of `scan_bytes` calls made against this host.
    pub fn scan_count(&self) -> usize {
        self.scan_calls.get()
    }
}

impl AnalysisHost for FixtureHost {
    fn image_base(&self) -> Va {
        self.base
    }

    fn resolve_symbol(&self, name: &str) -> Option<Va> {
        self.symbols.get(name).copied()
    }

    fn scan_bytes(&self, pattern: &[SigByte], from: Va) -> Option<Va> {
        self.scan_calls.set(self.scan_calls.get() + 1);
        if pattern.is_empty() || self.image.len() < pattern.len() {
            return None;
        }
        let start = usize::try_from(from.checked_sub(self.base)?).ok()?;
        let last = self.image.len() - pattern.len();
        if start > last {
            return None;
        }

        // Anchor on the first literal token so memchr can skip through the
        // image instead of testing every window.
        let anchor = pattern.iter().enumerate().find_map(|(k, t)| match t {
            SigByte::Byte(b) => Some((k, *b)),
            SigByte::Wildcard => None,
        });
        match anchor {
            Some((k, b)) => {
                for pos in memchr::memchr_iter(b, &self.image) {
                    let Some(i) = pos.checked_sub(k) else { continue };
                    if i > last {
                        break;
                    }
                    if i >= start && window_matches(pattern, &self.image[i..]) {
                        return Some(self.base + i as Va);
                    }
                }
                None
            }
            // All-wildcard pattern matches the first window available.
            None => Some(self.base + start as Va),
        }
    }

    fn function_ranges(&self, va: Va) -> Result<FunctionRanges> {
        if self.unresolvable.iter().any(|span| span.contains(va)) {
            return Err(Error::RangeResolution(va));
        }
        self.functions
            .iter()
            .find(|f| f.contains(va))
            .cloned()
            .ok_or(Error::InvalidAddress(va))
    }

    fn decode_one(&self, va: Va) -> Result<(Instruction, i64)> {
        self.decoded
            .get(&va)
            .cloned()
            .ok_or(Error::Decode { va, len: 0 })
    }
}
