//! Expands a function entry into one linear decoded-instruction stream.

use tracing::trace;

use crate::analysis::host::AnalysisHost;
use crate::core::{Instruction, Va};
use crate::error::{Error, Result};

/// Decode the function owning `entry` into a single instruction sequence.
///
/// Ranges are decoded in ascending order, each sequentially from its start
/// until the cursor reaches its end, then concatenated. Downstream pattern
/// matching treats the flattened sequence as fully adjacent even across a
/// range boundary, although addresses are not contiguous there.
///
/// A decoder-reported length of zero or less is a [`Error::Decode`]; a
/// byte is never silently skipped.
pub fn expand<H: AnalysisHost>(host: &H, entry: Va) -> Result<Vec<Instruction>> {
    let ranges = host.function_ranges(entry)?;
    let mut instructions = Vec::new();
    for range in ranges.iter() {
        let mut cursor = range.start;
        while cursor < range.end {
            let (insn, len) = host.decode_one(cursor)?;
            if len <= 0 {
                return Err(Error::Decode { va: cursor, len });
            }
            cursor += len as u64;
            instructions.push(insn);
        }
    }
    trace!(
        "expanded function at {:#x}: {} ranges, {} instructions",
        entry,
        ranges.len(),
        instructions.len()
    );
    Ok(instructions)
}
