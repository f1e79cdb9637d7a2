//! Extraction policies: turn pattern matches into concrete operand values.
//!
//! Both policies require the pattern to match exactly once; zero or
//! multiple matches is [`Error::AmbiguousMatch`], never a silent best
//! guess. A match that moved or duplicated means the target binary changed
//! shape and the signature or pattern must be updated.

use crate::analysis::expand::expand;
use crate::analysis::host::AnalysisHost;
use crate::analysis::matcher::find_all;
use crate::core::{Instruction, OpcodeCategory, Va};
use crate::error::{Error, Result};

use OpcodeCategory::{Add, Call, Cmp, Inc, Jb, Jmp, Jnz, Jz, Lea, Mov, Movzx};

/// Guarded-field idiom: compare a field, branch away, store, jump out.
pub const FIELD_GUARD_PATTERN: [OpcodeCategory; 4] = [Cmp, Jnz, Mov, Jmp];

/// Argument-marshalling run that ends in the call of interest.
pub const CALL_SITE_PATTERN: [OpcodeCategory; 8] =
    [Movzx, Movzx, Mov, Movzx, Mov, Mov, Mov, Call];

/// Array-iteration idiom inside the callee: load the array base, test two
/// bounds, then advance index and element cursor against the array length.
pub const ARRAY_ITERATION_PATTERN: [OpcodeCategory; 8] =
    [Lea, Cmp, Jz, Cmp, Jb, Inc, Add, Cmp];

/// Array facts recovered by the chained policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayFacts {
    /// Base offset the iteration loads from.
    pub offset: u64,
    /// Bytes added per element step.
    pub element_size: u64,
    /// Bound the index is compared against.
    pub length: u64,
}

/// Index of the unique `pattern` match in `instructions`.
fn unique_match(
    instructions: &[Instruction],
    pattern: &[OpcodeCategory],
    what: &'static str,
) -> Result<usize> {
    let matches = find_all(instructions, pattern);
    match matches.as_slice() {
        [index] => Ok(*index),
        _ => Err(Error::AmbiguousMatch {
            what,
            found: matches.len(),
        }),
    }
}

/// Single-field policy: the unique [`FIELD_GUARD_PATTERN`] match's compare
/// instruction names the field; its first operand's displacement is the
/// field offset.
pub fn field_offset(instructions: &[Instruction]) -> Result<u64> {
    let index = unique_match(instructions, &FIELD_GUARD_PATTERN, "field-guard sequence")?;
    instructions[index].memory_addr(0)
}

/// Chained policy: the unique [`CALL_SITE_PATTERN`] match's call target is
/// expanded and searched for the unique [`ARRAY_ITERATION_PATTERN`] match,
/// whose operands carry the array base, element size, and length.
///
/// Failures past the call-site match are wrapped in
/// [`Error::ChainedStage`] tagged `"callee"`.
pub fn array_layout<H: AnalysisHost>(
    host: &H,
    instructions: &[Instruction],
) -> Result<ArrayFacts> {
    let index = unique_match(instructions, &CALL_SITE_PATTERN, "call-site sequence")?;
    let callee = instructions[index + 7].memory_addr(0)?;
    iteration_facts(host, callee).map_err(|e| Error::chained("callee", e))
}

fn iteration_facts<H: AnalysisHost>(host: &H, callee: Va) -> Result<ArrayFacts> {
    let body = expand(host, callee)?;
    let index = unique_match(&body, &ARRAY_ITERATION_PATTERN, "array-iteration sequence")?;
    Ok(ArrayFacts {
        offset: body[index].memory_addr(1)?,
        element_size: body[index + 6].immediate(1)?,
        length: body[index + 7].immediate(1)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::host::FixtureHost;
    use crate::core::{AddressRange, FunctionRanges, Operand};

    fn ins(va: Va, category: OpcodeCategory) -> Instruction {
        Instruction::new(va, category, vec![])
    }

    fn field_guard(va: Va, offset: u64) -> Vec<Instruction> {
        vec![
            Instruction::new(
                va,
                Cmp,
                vec![
                    Operand::Memory {
                        addr: offset,
                        value: 0,
                    },
                    Operand::Immediate(0),
                ],
            ),
            ins(va + 4, Jnz),
            ins(va + 8, Mov),
            ins(va + 12, Jmp),
        ]
    }

    #[test]
    fn test_field_offset_from_unique_match() {
        let mut insns = vec![ins(0x1000, Mov), ins(0x1004, OpcodeCategory::Other)];
        insns.extend(field_guard(0x1008, 0x330));
        insns.push(ins(0x1018, OpcodeCategory::Other));
        assert_eq!(field_offset(&insns).unwrap(), 0x330);
    }

    #[test]
    fn test_field_offset_zero_matches_is_ambiguous() {
        let insns = vec![ins(0x1000, Mov), ins(0x1004, Cmp)];
        assert!(matches!(
            field_offset(&insns),
            Err(Error::AmbiguousMatch { found: 0, .. })
        ));
    }

    #[test]
    fn test_field_offset_two_matches_is_ambiguous() {
        let mut insns = field_guard(0x1000, 0x330);
        insns.extend(field_guard(0x1010, 0x338));
        assert!(matches!(
            field_offset(&insns),
            Err(Error::AmbiguousMatch { found: 2, .. })
        ));
    }

    /// Callee fixture with the iteration idiom at `entry`.
    fn callee_host(entry: Va, element_size: u64, length: u64) -> FixtureHost {
        let mut host = FixtureHost::new(0, vec![]).with_function(FunctionRanges::new(vec![
            AddressRange::new(entry, entry + 32),
        ]));
        let body = [
            Instruction::new(
                entry,
                Lea,
                vec![
                    Operand::Register(0),
                    Operand::Memory {
                        addr: 0x2a8,
                        value: 0,
                    },
                ],
            ),
            ins(entry + 4, Cmp),
            ins(entry + 8, Jz),
            ins(entry + 12, Cmp),
            ins(entry + 16, Jb),
            Instruction::new(entry + 20, Inc, vec![Operand::Register(1)]),
            Instruction::new(
                entry + 24,
                Add,
                vec![Operand::Register(2), Operand::Immediate(element_size)],
            ),
            Instruction::new(
                entry + 28,
                Cmp,
                vec![Operand::Register(1), Operand::Immediate(length)],
            ),
        ];
        for insn in body {
            host = host.with_instruction(insn, 4);
        }
        host
    }

    fn call_site(callee: Va) -> Vec<Instruction> {
        let mut insns: Vec<Instruction> = [Movzx, Movzx, Mov, Movzx, Mov, Mov, Mov]
            .iter()
            .enumerate()
            .map(|(i, &c)| ins(0x1000 + 4 * i as u64, c))
            .collect();
        insns.push(Instruction::new(
            0x101c,
            Call,
            vec![Operand::Memory {
                addr: callee,
                value: 0,
            }],
        ));
        insns
    }

    #[test]
    fn test_array_layout_chained_extraction() {
        let host = callee_host(0x3000, 12, 40);
        let facts = array_layout(&host, &call_site(0x3000)).unwrap();
        assert_eq!(facts.offset, 0x2a8);
        assert_eq!(facts.element_size, 12);
        assert_eq!(facts.length, 40);
    }

    #[test]
    fn test_missing_call_site_is_ambiguous() {
        let host = callee_host(0x3000, 12, 40);
        let insns = vec![ins(0x1000, Mov), ins(0x1004, Call)];
        assert!(matches!(
            array_layout(&host, &insns),
            Err(Error::AmbiguousMatch { found: 0, .. })
        ));
    }

    #[test]
    fn test_callee_failure_names_the_stage() {
        // Callee address owned by no known function.
        let host = FixtureHost::new(0, vec![]);
        match array_layout(&host, &call_site(0x3000)).unwrap_err() {
            Error::ChainedStage { stage, source } => {
                assert_eq!(stage, "callee");
                assert!(matches!(*source, Error::InvalidAddress(0x3000)));
            }
            other => panic!("expected ChainedStage, got {other}"),
        }
    }

    #[test]
    fn test_callee_without_iteration_idiom() {
        let entry = 0x3000;
        let host = FixtureHost::new(0, vec![])
            .with_function(FunctionRanges::new(vec![AddressRange::new(
                entry,
                entry + 8,
            )]))
            .with_instruction(ins(entry, Mov), 4)
            .with_instruction(ins(entry + 4, Mov), 4);
        let err = array_layout(&host, &call_site(entry)).unwrap_err();
        assert!(matches!(
            err,
            Error::ChainedStage { stage: "callee", ref source }
                if matches!(**source, Error::AmbiguousMatch { found: 0, .. })
        ));
    }
}
