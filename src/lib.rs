//! sigscout: signature-driven recovery of code offsets and data-layout
//! facts from frequently rebuilt binaries.
//!
//! A discovery task locates a function by symbol name (preferred) or by a
//! wildcarded byte signature, linearizes the function's possibly split
//! address ranges into one decoded instruction stream, finds a known
//! opcode-category idiom in it, and reads concrete operand values out of
//! the unique match. The analysis backend itself (symbol table, byte scan,
//! function ranges, instruction decoding) stays behind the
//! [`analysis::AnalysisHost`] trait.

pub mod analysis;
pub mod core;
pub mod error;
pub mod logging;
pub mod tasks;

pub use error::{Error, Result};
