//! Instruction and Operand types for decoded assembly instructions.
//!
//! An `Instruction` is the unit the pattern matcher and extractors work
//! over: an address, a classified opcode category, and up to a handful of
//! structured operands. Exact encodings and mnemonics stay with the host's
//! decoder; only the category and operand values survive into this model.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::Va;
use crate::error::{Error, Result};

/// Classified kind of operation an instruction performs.
///
/// Closed enumeration over the categories the shipped patterns use;
/// everything else decodes to `Other` and still occupies its slot in the
/// instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpcodeCategory {
    /// Compare
    Cmp,
    /// Jump if not zero
    Jnz,
    /// Jump if zero
    Jz,
    /// Jump if below
    Jb,
    /// Unconditional jump
    Jmp,
    /// Move
    Mov,
    /// Zero-extending move
    Movzx,
    /// Load effective address
    Lea,
    /// Increment
    Inc,
    /// Add
    Add,
    /// Call
    Call,
    /// Any category the pipeline does not pattern on
    Other,
}

impl fmt::Display for OpcodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpcodeCategory::Cmp => "cmp",
            OpcodeCategory::Jnz => "jnz",
            OpcodeCategory::Jz => "jz",
            OpcodeCategory::Jb => "jb",
            OpcodeCategory::Jmp => "jmp",
            OpcodeCategory::Mov => "mov",
            OpcodeCategory::Movzx => "movzx",
            OpcodeCategory::Lea => "lea",
            OpcodeCategory::Inc => "inc",
            OpcodeCategory::Add => "add",
            OpcodeCategory::Call => "call",
            OpcodeCategory::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Structured operand of a decoded instruction.
///
/// Exhaustive tagged variant: extraction sites match on the exact shape
/// they need and fail with `OperandShape` otherwise, instead of assuming a
/// field exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    /// Operand slot not populated
    None,
    /// Register operand, identified by the host decoder's register number
    Register(u16),
    /// Immediate value
    Immediate(u64),
    /// Memory or code reference. `addr` is the displacement or, for near
    /// branch/call operands, the target address; `value` carries any
    /// decoder-supplied constant alongside it.
    Memory { addr: u64, value: u64 },
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => write!(f, "-"),
            Operand::Register(r) => write!(f, "r{}", r),
            Operand::Immediate(v) => write!(f, "{:#x}", v),
            Operand::Memory { addr, .. } => write!(f, "[{:#x}]", addr),
        }
    }
}

/// Decoded instruction at a specific address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Address where this instruction is located
    pub va: Va,
    /// Classified opcode category
    pub category: OpcodeCategory,
    /// Structured operands, in encoding order
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Create a new Instruction.
    pub fn new(va: Va, category: OpcodeCategory, operands: Vec<Operand>) -> Self {
        Self {
            va,
            category,
            operands,
        }
    }

    /// Operand at `index`, or `Operand::None` if the slot is absent.
    pub fn operand(&self, index: usize) -> Operand {
        self.operands.get(index).copied().unwrap_or(Operand::None)
    }

    /// Address carried by the memory/code-reference operand at `index`.
    pub fn memory_addr(&self, index: usize) -> Result<u64> {
        match self.operand(index) {
            Operand::Memory { addr, .. } => Ok(addr),
            _ => Err(Error::OperandShape {
                va: self.va,
                index,
                expected: "a memory or code reference",
            }),
        }
    }

    /// Immediate value carried by the operand at `index`.
    pub fn immediate(&self, index: usize) -> Result<u64> {
        match self.operand(index) {
            Operand::Immediate(value) => Ok(value),
            _ => Err(Error::OperandShape {
                va: self.va,
                index,
                expected: "an immediate",
            }),
        }
    }

    /// Check if this instruction is a call.
    pub fn is_call(&self) -> bool {
        self.category == OpcodeCategory::Call
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}: {}", self.va, self.category)?;
        for (i, op) in self.operands.iter().enumerate() {
            if i == 0 {
                write!(f, " {}", op)?;
            } else {
                write!(f, ", {}", op)?;
            }
        }
        Ok(())
    }
}
