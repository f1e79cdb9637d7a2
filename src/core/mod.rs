//! Core data types for sigscout.
//!
//! This module contains the fundamental value types used throughout the
//! pipeline: decoded instructions and operands, wildcard byte signatures,
//! function address ranges, and the recovered offset descriptors.

pub mod descriptor;
pub mod function;
pub mod instruction;
pub mod signature;

pub use descriptor::OffsetDescriptor;
pub use function::{AddressRange, FunctionRanges};
pub use instruction::{Instruction, Operand, OpcodeCategory};
pub use signature::{SigByte, Signature};

/// Virtual address inside the loaded module image.
pub type Va = u64;
